use std::sync::atomic::{AtomicU64, Ordering};

use bytemuck::{Pod, Zeroable};
use driftfield_platform::{ElementStyle, Extent};
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{BallOptions, Length};
use crate::error::{Error, Result};
use crate::palette::{random_color, Color, PALETTE};

/// Largest absolute value of a velocity component, in pixels per frame.
pub const MAX_SPEED: f32 = 0.75;

static NEXT_BALL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a ball, stable across transfers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BallId(u64);

impl BallId {
    fn next() -> Self {
        Self(NEXT_BALL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Packed per-ball record for renderers that upload instance buffers.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BallInstance {
    pub position: [f32; 2],
    pub size: f32,
    pub blur_px: f32,
    pub color: [f32; 4],
}

/// A single floating shape bouncing inside fixed bounds.
///
/// Not `Clone`: a ball has one identity and is owned by exactly one group.
#[derive(Debug, PartialEq)]
pub struct Ball {
    id: BallId,
    position: Vec2,
    velocity: Vec2,
    size: f32,
    rendered: Vec2,
    color: Color,
    blur: Length,
    bounds: Vec2,
}

impl Ball {
    /// Random ball fully inside a `container_width` x `container_height` area.
    ///
    /// Both dimensions must be positive. A ball larger than the container is
    /// placed at the origin on that axis.
    pub fn new<R: Rng + ?Sized>(
        container_width: f32,
        container_height: f32,
        options: &BallOptions,
        rng: &mut R,
    ) -> Result<Self> {
        let bounds = checked_bounds(container_width, container_height)?;
        options.validate()?;

        let size = rng.gen_range(options.min_size..=options.max_size);
        let position = Vec2::new(
            rng.gen_range(0.0..=(bounds.x - size).max(0.0)),
            rng.gen_range(0.0..=(bounds.y - size).max(0.0)),
        );
        let velocity = Vec2::new(
            rng.gen_range(-MAX_SPEED..=MAX_SPEED),
            rng.gen_range(-MAX_SPEED..=MAX_SPEED),
        );

        Ok(Self {
            id: BallId::next(),
            position,
            velocity,
            size,
            rendered: Vec2::splat(size),
            color: random_color(rng),
            blur: options.blur,
            bounds,
        })
    }

    /// Ball with an explicit state, e.g. restored by a host.
    pub fn at(bounds: Extent, position: Vec2, velocity: Vec2, size: f32) -> Result<Self> {
        let bounds = checked_bounds(bounds.width, bounds.height)?;
        if !size.is_finite() || size < 0.0 {
            return Err(Error::InvalidSizeRange { min: size, max: size });
        }
        Ok(Self {
            id: BallId::next(),
            position,
            velocity,
            size,
            rendered: Vec2::splat(size),
            color: PALETTE[0],
            blur: Length::default(),
            bounds,
        })
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_blur(mut self, blur: Length) -> Self {
        self.blur = blur;
        self
    }

    /// Move one step and reflect off any edge the ball has crossed.
    ///
    /// Reflection only flips the velocity; the position is not clamped, so a
    /// ball may sit past an edge until it has drifted back inside. A ball
    /// already heading back in is left alone.
    pub fn advance(&mut self) {
        self.position += self.velocity;

        // Only flip while heading further out, so a ball past an edge turns once.
        if (self.position.x < 0.0 && self.velocity.x < 0.0)
            || (self.position.x + self.rendered.x > self.bounds.x && self.velocity.x > 0.0)
        {
            self.velocity.x = -self.velocity.x;
        }
        if (self.position.y < 0.0 && self.velocity.y < 0.0)
            || (self.position.y + self.rendered.y > self.bounds.y && self.velocity.y > 0.0)
        {
            self.velocity.y = -self.velocity.y;
        }
    }

    pub fn id(&self) -> BallId {
        self.id
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Requested diameter.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Size the surface actually rendered, used for edge tests.
    pub fn rendered_extent(&self) -> Extent {
        Extent::new(self.rendered.x, self.rendered.y)
    }

    pub(crate) fn set_rendered_extent(&mut self, extent: Extent) {
        self.rendered = Vec2::new(extent.width, extent.height);
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn blur(&self) -> Length {
        self.blur
    }

    /// Container size captured at creation.
    pub fn bounds(&self) -> Extent {
        Extent::new(self.bounds.x, self.bounds.y)
    }

    pub fn style(&self) -> ElementStyle {
        ElementStyle {
            width: self.size,
            height: self.size,
            background: self.color.to_css(),
            blur: self.blur.to_string(),
        }
    }

    pub fn instance(&self) -> BallInstance {
        BallInstance {
            position: self.position.to_array(),
            size: self.size,
            blur_px: self.blur.as_px().unwrap_or(0.0),
            color: self.color.to_vec4().to_array(),
        }
    }
}

fn checked_bounds(width: f32, height: f32) -> Result<Vec2> {
    if Extent::new(width, height).is_degenerate() {
        return Err(Error::DegenerateContainer { width, height });
    }
    Ok(Vec2::new(width, height))
}
