use std::fmt;

use glam::Vec4;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A translucent fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Normalised RGBA for GPU consumers.
    pub fn to_vec4(self) -> Vec4 {
        Vec4::new(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a,
        )
    }

    /// CSS form, e.g. `rgba(200,100,255,0.5)`.
    pub fn to_css(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}

pub const PALETTE: [Color; 3] = [
    Color::rgba(200, 100, 255, 0.5),
    Color::rgba(255, 100, 100, 0.5),
    Color::rgba(100, 255, 180, 0.5),
];

pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    PALETTE[rng.gen_range(0..PALETTE.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn css_matches_page_palette() {
        let css: Vec<String> = PALETTE.iter().map(|c| c.to_css()).collect();
        assert_eq!(
            css,
            [
                "rgba(200,100,255,0.5)",
                "rgba(255,100,100,0.5)",
                "rgba(100,255,180,0.5)"
            ]
        );
    }

    #[test]
    fn random_pick_covers_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let color = random_color(&mut rng);
            let index = PALETTE.iter().position(|c| *c == color).unwrap();
            seen[index] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn vec4_is_normalised() {
        let v = Color::rgba(255, 0, 51, 0.5).to_vec4();
        assert_eq!(v, Vec4::new(1.0, 0.0, 0.2, 0.5));
    }
}
