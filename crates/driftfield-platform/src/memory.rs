use std::collections::BTreeMap;

use tracing::debug;

use crate::{ElementHandle, ElementStyle, Extent, RenderSurface, Result};

/// One element held by a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryElement {
    pub style: ElementStyle,
    pub rendered: Extent,
    pub x: f32,
    pub y: f32,
}

/// In-memory surface used by the headless runtime and by tests.
///
/// Optionally clamps element sizes to `max_element`, mimicking a layout engine
/// that renders elements smaller than requested.
#[derive(Debug)]
pub struct MemorySurface {
    name: String,
    extent: Extent,
    max_element: Option<Extent>,
    elements: BTreeMap<ElementHandle, MemoryElement>,
    next_handle: u64,
    visible: bool,
    pub attach_count: usize,
    pub detach_count: usize,
    pub translate_count: usize,
}

impl MemorySurface {
    pub fn new(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            name: name.into(),
            extent: Extent::new(width, height),
            max_element: None,
            elements: BTreeMap::new(),
            next_handle: 1,
            visible: true,
            attach_count: 0,
            detach_count: 0,
            translate_count: 0,
        }
    }

    pub fn with_max_element(mut self, max: Extent) -> Self {
        self.max_element = Some(max);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Simulates a container relayout; existing elements are untouched.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.extent = Extent::new(width, height);
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&MemoryElement> {
        self.elements.get(&handle)
    }

    pub fn elements(&self) -> impl Iterator<Item = (&ElementHandle, &MemoryElement)> {
        self.elements.iter()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl RenderSurface for MemorySurface {
    fn extent(&self) -> Extent {
        self.extent
    }

    fn attach(&mut self, style: &ElementStyle) -> Result<ElementHandle> {
        let handle = ElementHandle(self.next_handle);
        self.next_handle += 1;
        let rendered = match self.max_element {
            Some(max) => Extent::new(style.width.min(max.width), style.height.min(max.height)),
            None => Extent::new(style.width, style.height),
        };
        self.elements.insert(
            handle,
            MemoryElement {
                style: style.clone(),
                rendered,
                x: 0.0,
                y: 0.0,
            },
        );
        self.attach_count += 1;
        Ok(handle)
    }

    fn detach(&mut self, handle: ElementHandle) -> Result<()> {
        if self.elements.remove(&handle).is_some() {
            self.detach_count += 1;
        } else {
            debug!("{}: detach of unknown element {:?} ignored", self.name, handle);
        }
        Ok(())
    }

    fn measure(&self, handle: ElementHandle) -> Option<Extent> {
        self.elements.get(&handle).map(|e| e.rendered)
    }

    fn translate(&mut self, handle: ElementHandle, x: f32, y: f32) -> Result<()> {
        match self.elements.get_mut(&handle) {
            Some(element) => {
                element.x = x;
                element.y = y;
                self.translate_count += 1;
                Ok(())
            }
            None => Err(format!("{}: no element {:?} to translate", self.name, handle).into()),
        }
    }

    fn set_visible(&mut self, visible: bool) -> Result<()> {
        self.visible = visible;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.detach_count += self.elements.len();
        self.elements.clear();
        Ok(())
    }
}
