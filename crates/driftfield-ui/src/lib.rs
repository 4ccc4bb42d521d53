//! State of the page widgets around the ball background, kept as plain values
//! instead of class toggles on a document.

use std::time::Duration;

use tracing::info;

pub mod carousel;
pub mod filter;
pub mod hover;
pub mod productions;
pub mod timeline;

pub use carousel::{Carousel, ProofDetails, ProofPanel, Role};
pub use filter::{CardFilter, SHOW_ALL};
pub use hover::HoverReveal;
pub use productions::ProductionList;
pub use timeline::{Span, Timeline, TimelineUpdate};

/// Input the host forwards from its event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    FilterClicked(String),
    ProductionHeaderClicked(usize),
    CarouselPrev,
    CarouselNext,
    CarouselItemClicked { index: usize, details: ProofDetails },
    PanelCloseClicked,
    DocumentClicked { inside_panel: bool, inside_track: bool },
    Scrolled { at: Duration, scroll_y: f32 },
    PointerEnteredBalls(usize),
    PointerLeftBalls(usize),
}

/// Requests back to the host for effects the widgets cannot apply themselves.
#[derive(Debug, Clone, PartialEq)]
pub enum UiCommand {
    SetBallsVisible { container: usize, visible: bool },
    /// Re-run the timeline layout pass for the document scrolled to `scroll_y`.
    RefreshTimeline { at: Duration, scroll_y: f32 },
}

/// Every widget on the page.
#[derive(Debug, Clone, Default)]
pub struct Page {
    pub filter: CardFilter,
    pub productions: ProductionList,
    pub carousel: Carousel,
    pub panel: ProofPanel,
    pub timeline: Timeline,
    pub hover: Vec<HoverReveal>,
}

impl Page {
    pub fn new(
        card_categories: Vec<String>,
        productions: usize,
        carousel_items: usize,
        timeline_items: usize,
        ball_containers: usize,
    ) -> Self {
        info!(
            "page: {} cards, {} productions, {} carousel items, {} timeline items",
            card_categories.len(),
            productions,
            carousel_items,
            timeline_items
        );
        Self {
            filter: CardFilter::new(card_categories),
            productions: ProductionList::new(productions),
            carousel: Carousel::new(carousel_items),
            panel: ProofPanel::new(),
            timeline: Timeline::new(timeline_items),
            hover: vec![HoverReveal::new(); ball_containers],
        }
    }

    pub fn handle(&mut self, event: UiEvent) -> Vec<UiCommand> {
        match event {
            UiEvent::FilterClicked(filter) => {
                self.filter.select(&filter);
            }
            UiEvent::ProductionHeaderClicked(card) => {
                self.productions.toggle(card);
            }
            UiEvent::CarouselPrev => {
                self.carousel.prev();
            }
            UiEvent::CarouselNext => {
                self.carousel.next();
            }
            UiEvent::CarouselItemClicked { index, details } => {
                if self.carousel.goto(index as isize).is_some() {
                    self.panel.open(details);
                }
            }
            UiEvent::PanelCloseClicked => self.panel.close(),
            UiEvent::DocumentClicked {
                inside_panel,
                inside_track,
            } => {
                self.panel.click(inside_panel, inside_track);
            }
            UiEvent::Scrolled { at, scroll_y } => {
                self.timeline.on_scroll(at);
                return vec![UiCommand::RefreshTimeline { at, scroll_y }];
            }
            UiEvent::PointerEnteredBalls(container) => {
                if let Some(hover) = self.hover.get_mut(container) {
                    let visible = hover.pointer_enter();
                    return vec![UiCommand::SetBallsVisible { container, visible }];
                }
            }
            UiEvent::PointerLeftBalls(container) => {
                if let Some(hover) = self.hover.get_mut(container) {
                    let visible = hover.pointer_leave();
                    return vec![UiCommand::SetBallsVisible { container, visible }];
                }
            }
        }
        Vec::new()
    }
}
