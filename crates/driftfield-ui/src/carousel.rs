use serde::{Deserialize, Serialize};
use tracing::debug;

/// Horizontal room left of the active item so its neighbour peeks in.
pub const PEEK_OFFSET: f32 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Active,
    Prev,
    Next,
    Hidden,
}

/// Carousel with a wrapping active index. An empty carousel ignores navigation.
#[derive(Debug, Clone, Default)]
pub struct Carousel {
    len: usize,
    active: usize,
}

impl Carousel {
    pub fn new(len: usize) -> Self {
        Self { len, active: 0 }
    }

    pub fn active(&self) -> Option<usize> {
        (self.len > 0).then_some(self.active)
    }

    /// Jump to `index`, wrapping in both directions.
    pub fn goto(&mut self, index: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.active = index.rem_euclid(self.len as isize) as usize;
        debug!("carousel -> {}", self.active);
        Some(self.active)
    }

    pub fn next(&mut self) -> Option<usize> {
        self.goto(self.active as isize + 1)
    }

    pub fn prev(&mut self) -> Option<usize> {
        self.goto(self.active as isize - 1)
    }

    /// Role of item `index` relative to the active one. `Prev` wins over `Next`
    /// when both apply, as with two items.
    pub fn role(&self, index: usize) -> Role {
        if self.len == 0 || index >= self.len {
            return Role::Hidden;
        }
        let last = self.len - 1;
        if index == self.active {
            Role::Active
        } else if index + 1 == self.active || (self.active == 0 && index == last) {
            Role::Prev
        } else if index == self.active + 1 || (self.active == last && index == 0) {
            Role::Next
        } else {
            Role::Hidden
        }
    }

    /// Track translation that brings the active item into view, given each
    /// item's left offset inside the track.
    pub fn track_offset(&self, item_lefts: &[f32]) -> f32 {
        match (item_lefts.first(), item_lefts.get(self.active)) {
            (Some(first), Some(active)) => -(active - first - PEEK_OFFSET),
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Content shown in the side panel for one carousel item.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofDetails {
    pub title: String,
    pub demand: String,
    pub reflection: String,
    pub constraint: String,
    pub results: String,
    pub link: Option<String>,
    pub image: Option<String>,
}

/// Detail side panel with its overlays.
#[derive(Debug, Clone, Default)]
pub struct ProofPanel {
    details: Option<ProofDetails>,
    open: bool,
}

impl ProofPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, details: ProofDetails) {
        debug!("proof panel open: {:?}", details.title);
        self.details = Some(details);
        self.open = true;
    }

    /// Content stays loaded after closing.
    pub fn close(&mut self) {
        self.open = false;
    }

    /// A click that landed outside both the panel and the carousel track closes it.
    pub fn click(&mut self, inside_panel: bool, inside_track: bool) -> bool {
        if self.open && !inside_panel && !inside_track {
            self.close();
            return true;
        }
        false
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn details(&self) -> Option<&ProofDetails> {
        self.details.as_ref()
    }

    /// Whether the external link button should be shown.
    pub fn shows_link(&self) -> bool {
        self.details
            .as_ref()
            .is_some_and(|d| d.link.as_deref().is_some_and(|l| !l.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps() {
        let mut carousel = Carousel::new(4);
        assert_eq!(carousel.prev(), Some(3));
        assert_eq!(carousel.next(), Some(0));
        assert_eq!(carousel.goto(9), Some(1));
        assert_eq!(carousel.goto(-6), Some(2));
    }

    #[test]
    fn empty_carousel_is_inert() {
        let mut carousel = Carousel::new(0);
        assert_eq!(carousel.next(), None);
        assert_eq!(carousel.active(), None);
        assert_eq!(carousel.role(0), Role::Hidden);
        assert_eq!(carousel.track_offset(&[]), 0.0);
    }

    #[test]
    fn neighbour_roles_wrap() {
        let mut carousel = Carousel::new(5);
        let roles: Vec<Role> = (0..5).map(|i| carousel.role(i)).collect();
        assert_eq!(
            roles,
            [Role::Active, Role::Next, Role::Hidden, Role::Hidden, Role::Prev]
        );

        carousel.goto(4);
        assert_eq!(carousel.role(0), Role::Next);
        assert_eq!(carousel.role(3), Role::Prev);

        let mut pair = Carousel::new(2);
        assert_eq!(pair.role(1), Role::Prev);
        pair.goto(1);
        assert_eq!(pair.role(0), Role::Prev);
    }

    #[test]
    fn track_offset_keeps_peek() {
        let mut carousel = Carousel::new(3);
        let lefts = [20.0, 320.0, 620.0];
        assert_eq!(carousel.track_offset(&lefts), 150.0);
        carousel.goto(2);
        assert_eq!(carousel.track_offset(&lefts), -450.0);
    }

    #[test]
    fn panel_open_close() {
        let mut panel = ProofPanel::new();
        assert!(!panel.click(false, false));

        panel.open(ProofDetails {
            title: "Renderer".into(),
            link: Some("https://example.org".into()),
            ..ProofDetails::default()
        });
        assert!(panel.is_open());
        assert!(panel.shows_link());

        assert!(!panel.click(true, false));
        assert!(!panel.click(false, true));
        assert!(panel.click(false, false));
        assert!(!panel.is_open());
        assert_eq!(panel.details().unwrap().title, "Renderer");
    }
}
