//! Scroll-driven timeline highlighter.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Quiet period after the last scroll event before the user counts as idle.
pub const SCROLL_SETTLE: Duration = Duration::from_millis(150);

/// Items whose centre is this close to the viewport centre (as a fraction of
/// half the viewport) are highlighted.
pub const ACTIVE_THRESHOLD: f32 = 0.8;

/// Vertical extent in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    pub top: f32,
    pub height: f32,
}

impl Span {
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// The same span seen from a document scrolled down by `scroll_y`.
    pub fn scrolled_by(self, scroll_y: f32) -> Self {
        Self::new(self.top - scroll_y, self.height)
    }

    fn center(&self) -> f32 {
        self.top + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ItemState {
    pub dot_active: bool,
    pub content_active: bool,
    pub completed: bool,
}

/// Result of one layout pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimelineUpdate {
    /// Items the view should scroll to centre.
    pub snap_to: Vec<usize>,
    /// Height of the progress bar, in percent.
    pub progress_percent: f32,
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    items: Vec<ItemState>,
    last_scroll: Option<Duration>,
    progress_percent: f32,
}

impl Timeline {
    pub fn new(items: usize) -> Self {
        Self {
            items: vec![ItemState::default(); items],
            last_scroll: None,
            progress_percent: 0.0,
        }
    }

    /// Record a scroll event at host time `now`.
    pub fn on_scroll(&mut self, now: Duration) {
        self.last_scroll = Some(now);
    }

    pub fn is_scrolling(&self, now: Duration) -> bool {
        self.last_scroll
            .is_some_and(|at| now.saturating_sub(at) < SCROLL_SETTLE)
    }

    /// Recompute highlight state from the current layout.
    ///
    /// `timeline` and `items` are viewport-relative; `scroll_y` is the document
    /// scroll offset. Extra or missing item spans are ignored.
    pub fn update(
        &mut self,
        now: Duration,
        viewport_height: f32,
        scroll_y: f32,
        timeline: Span,
        items: &[Span],
    ) -> TimelineUpdate {
        let scrolling = self.is_scrolling(now);
        let center = viewport_height / 2.0;
        let mut snap_to = Vec::new();

        for (index, (state, span)) in self.items.iter_mut().zip(items).enumerate() {
            let distance = (span.center() - center).abs();
            let progress = if center > 0.0 {
                1.0 - (distance / center).min(1.0)
            } else {
                0.0
            };

            if progress > ACTIVE_THRESHOLD {
                if !scrolling {
                    snap_to.push(index);
                }
                state.dot_active = true;
                state.content_active = true;
                if span.top < center {
                    state.completed = true;
                    state.content_active = false;
                }
            } else {
                state.dot_active = false;
                state.content_active = false;
                if span.top > center {
                    state.completed = false;
                }
            }
        }

        self.progress_percent = if timeline.height > 0.0 {
            ((scroll_y - timeline.top + center) / timeline.height * 100.0).clamp(0.0, 100.0)
        } else {
            0.0
        };

        TimelineUpdate {
            snap_to,
            progress_percent: self.progress_percent,
        }
    }

    pub fn item(&self, index: usize) -> Option<ItemState> {
        self.items.get(index).copied()
    }

    pub fn progress_percent(&self) -> f32 {
        self.progress_percent
    }
}
