//! Host abstraction so `driftfield-core` never touches a concrete rendering target.

use serde::{Deserialize, Serialize};

mod memory;
pub use memory::{MemoryElement, MemorySurface};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Layout size of a container or element, in layout pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when no ball can be placed: a side is zero, negative, or not finite.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }
}

/// Opaque identifier of an element attached to one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementHandle(pub u64);

/// Visual attributes requested for a ball element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    pub width: f32,
    pub height: f32,
    /// CSS colour, e.g. `rgba(200,100,255,0.5)`.
    pub background: String,
    /// CSS length used as blur radius, e.g. `30px`.
    pub blur: String,
}

/// A container balls are drawn into.
///
/// Implementations own the visual elements; the simulation only issues
/// attach/detach/translate commands and reads sizes back.
pub trait RenderSurface: Send {
    /// Current layout size of the container.
    fn extent(&self) -> Extent;
    fn attach(&mut self, style: &ElementStyle) -> Result<ElementHandle>;
    /// Detaching an unknown handle is a no-op.
    fn detach(&mut self, handle: ElementHandle) -> Result<()>;
    /// Rendered size after layout, which may differ from the requested style.
    fn measure(&self, handle: ElementHandle) -> Option<Extent>;
    fn translate(&mut self, handle: ElementHandle, x: f32, y: f32) -> Result<()>;
    fn set_visible(&mut self, _visible: bool) -> Result<()> { Ok(()) }
    /// Detach every element.
    fn clear(&mut self) -> Result<()>;
}

impl<S: RenderSurface + ?Sized> RenderSurface for Box<S> {
    fn extent(&self) -> Extent {
        (**self).extent()
    }
    fn attach(&mut self, style: &ElementStyle) -> Result<ElementHandle> {
        (**self).attach(style)
    }
    fn detach(&mut self, handle: ElementHandle) -> Result<()> {
        (**self).detach(handle)
    }
    fn measure(&self, handle: ElementHandle) -> Option<Extent> {
        (**self).measure(handle)
    }
    fn translate(&mut self, handle: ElementHandle, x: f32, y: f32) -> Result<()> {
        (**self).translate(handle, x, y)
    }
    fn set_visible(&mut self, visible: bool) -> Result<()> {
        (**self).set_visible(visible)
    }
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}
