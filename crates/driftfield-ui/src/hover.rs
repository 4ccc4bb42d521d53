/// Ball wrappers stay hidden until the pointer is over their container.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverReveal {
    visible: bool,
}

impl HoverReveal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new visibility.
    pub fn pointer_enter(&mut self) -> bool {
        self.visible = true;
        self.visible
    }

    pub fn pointer_leave(&mut self) -> bool {
        self.visible = false;
        self.visible
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}
