//! Headless host for the ball background: owns in-memory surfaces and drives
//! the frame source and the transfer timer from one thread.
use std::time::Duration;

use crossbeam_channel::{after, never, select, tick};
use driftfield_core::{BallGroupPool, TransferOutcome};
use driftfield_platform::{MemorySurface, Result};
use driftfield_ui::{Page, Span, TimelineUpdate, UiCommand, UiEvent};
use tracing::{debug, info, warn};

mod config;
pub use config::{ContainerConfig, PageConfig, RuntimeConfig};

/// Counters collected while running.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub transfers: u64,
    pub skipped_transfers: u64,
    pub final_counts: Vec<usize>,
}

/// Pool plus page state, fed by whatever clock the caller has.
pub struct Host {
    pool: BallGroupPool<MemorySurface>,
    page: Page,
    layout: PageConfig,
    timeline: TimelineUpdate,
    summary: RunSummary,
}

impl Host {
    pub fn new(config: &RuntimeConfig) -> Result<Self> {
        let surfaces = config
            .containers
            .iter()
            .map(|c| MemorySurface::new(c.name.clone(), c.width, c.height));
        let mut pool = BallGroupPool::new(surfaces, config.background.clone())?;

        let layout = config.page.clone();
        let hover_targets = if config.hover_reveal { pool.len() } else { 0 };
        let page = Page::new(
            layout.card_categories.clone(),
            layout.productions,
            layout.carousel_items,
            layout.timeline_items.len(),
            hover_targets,
        );
        for index in 0..hover_targets {
            if let Some(group) = pool.group_mut(index) {
                group.set_visible(false)?;
            }
        }

        Ok(Self {
            pool,
            page,
            layout,
            timeline: TimelineUpdate::default(),
            summary: RunSummary::default(),
        })
    }

    /// One display frame.
    pub fn on_frame(&mut self) {
        self.pool.frame();
        self.summary.frames += 1;
    }

    /// One firing of the transfer timer.
    pub fn on_transfer(&mut self) -> TransferOutcome {
        let outcome = self.pool.transfer_tick();
        self.record(outcome);
        outcome
    }

    /// Single-clock driving: one frame, then any transfers that became due.
    pub fn step(&mut self, elapsed: Duration) {
        self.on_frame();
        for outcome in self.pool.advance_clock(elapsed) {
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: TransferOutcome) {
        match outcome {
            TransferOutcome::Moved { from, to, ball } => {
                self.summary.transfers += 1;
                debug!("ball {} moved {} -> {}", ball.get(), from, to);
            }
            other => {
                self.summary.skipped_transfers += 1;
                debug!("transfer skipped: {other:?}");
            }
        }
    }

    /// Forward a page event and apply whatever it asks of the ball groups.
    pub fn on_ui(&mut self, event: UiEvent) -> Result<()> {
        for command in self.page.handle(event) {
            match command {
                UiCommand::SetBallsVisible { container, visible } => {
                    if let Some(group) = self.pool.group_mut(container) {
                        group.set_visible(visible)?;
                    }
                }
                UiCommand::RefreshTimeline { at, scroll_y } => self.refresh_timeline(at, scroll_y),
            }
        }
        Ok(())
    }

    fn refresh_timeline(&mut self, at: Duration, scroll_y: f32) {
        let items: Vec<Span> = self
            .layout
            .timeline_items
            .iter()
            .map(|span| span.scrolled_by(scroll_y))
            .collect();
        self.timeline = self.page.timeline.update(
            at,
            self.layout.viewport_height,
            scroll_y,
            self.layout.timeline.scrolled_by(scroll_y),
            &items,
        );
        if !self.timeline.snap_to.is_empty() {
            debug!("timeline wants to centre items {:?}", self.timeline.snap_to);
        }
    }

    pub fn pool(&self) -> &BallGroupPool<MemorySurface> {
        &self.pool
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Outcome of the most recent timeline pass.
    pub fn timeline(&self) -> &TimelineUpdate {
        &self.timeline
    }

    /// Stop both periodic sources and report.
    pub fn finish(mut self) -> RunSummary {
        self.pool.dispose();
        log_layout(&self.pool, "shutdown");
        self.summary.final_counts = self.pool.counts();
        self.summary
    }
}

/// Log container sizes and ball counts.
pub fn log_layout(pool: &BallGroupPool<MemorySurface>, reason: &str) {
    if pool.is_empty() {
        info!("Ball layout ({}) -> no containers", reason);
        return;
    }
    let mut details = Vec::new();
    for group in pool.groups() {
        let extent = group.extent();
        details.push(format!(
            "{}: {}x{}, {} balls{}",
            group.surface().name(),
            extent.width,
            extent.height,
            group.len(),
            if group.surface().is_visible() { "" } else { " (hidden)" }
        ));
    }
    info!("Ball layout ({}) -> {}", reason, details.join("; "));
}

/// Run the background until the configured duration elapses (or forever).
pub fn run_app(config: RuntimeConfig) -> Result<RunSummary> {
    let mut host = Host::new(&config)?;
    log_layout(host.pool(), "initial layout");

    let frames = tick(config.frame_interval());
    let transfers = tick(host.pool().transfer_interval());
    let deadline = match config.run_for() {
        Some(duration) => after(duration),
        None => never(),
    };

    loop {
        select! {
            recv(frames) -> _ => host.on_frame(),
            recv(transfers) -> _ => {
                if let TransferOutcome::NotEnoughGroups = host.on_transfer() {
                    warn!("fewer than two containers; transfers are idle");
                }
            }
            recv(deadline) -> _ => break,
        }
    }

    let summary = host.finish();
    info!(
        "ran {} frames, {} transfers ({} skipped)",
        summary.frames, summary.transfers, summary.skipped_transfers
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(containers: usize) -> RuntimeConfig {
        let mut config = RuntimeConfig::default();
        config.containers = (0..containers)
            .map(|i| ContainerConfig::new(format!("c{i}"), 1000.0, 700.0))
            .collect();
        config.background.num_balls = 6;
        config.background.transfer_interval_ms = 100;
        config.background.seed = Some(5);
        config
    }

    #[test]
    fn stepping_runs_frames_and_transfers() {
        let mut host = Host::new(&config(2)).unwrap();
        for _ in 0..60 {
            host.step(Duration::from_millis(20));
        }
        let summary = host.finish();
        assert_eq!(summary.frames, 60);
        // 1200 ms at one transfer per 100 ms.
        assert_eq!(summary.transfers + summary.skipped_transfers, 12);
        assert_eq!(summary.final_counts.iter().sum::<usize>(), 12);
    }

    #[test]
    fn hover_reveal_toggles_surface_visibility() {
        let mut config = config(2);
        config.hover_reveal = true;
        let mut host = Host::new(&config).unwrap();
        assert!(host.pool().groups().iter().all(|g| !g.surface().is_visible()));

        host.on_ui(UiEvent::PointerEnteredBalls(0)).unwrap();
        assert!(host.pool().group(0).unwrap().surface().is_visible());
        assert!(!host.pool().group(1).unwrap().surface().is_visible());

        host.on_ui(UiEvent::PointerLeftBalls(0)).unwrap();
        assert!(!host.pool().group(0).unwrap().surface().is_visible());
    }

    #[test]
    fn page_layout_drives_widgets() {
        let mut config = config(2);
        config.page = PageConfig {
            card_categories: vec!["web".into(), "game".into(), "web".into()],
            productions: 2,
            carousel_items: 3,
            viewport_height: 800.0,
            timeline: Span::new(1000.0, 2000.0),
            timeline_items: vec![Span::new(1380.0, 40.0), Span::new(2400.0, 40.0)],
        };
        let mut host = Host::new(&config).unwrap();
        assert_eq!(host.page().filter.len(), 3);
        assert_eq!(host.page().carousel.len(), 3);

        host.on_ui(UiEvent::FilterClicked("web".into())).unwrap();
        assert_eq!(host.page().filter.visible_cards(), vec![0, 2]);
        host.on_ui(UiEvent::CarouselPrev).unwrap();
        assert_eq!(host.page().carousel.active(), Some(2));

        // Scrolled so the first item sits on the viewport centre.
        let at = Duration::from_secs(2);
        host.on_ui(UiEvent::Scrolled { at, scroll_y: 1000.0 }).unwrap();
        let first = host.page().timeline.item(0).unwrap();
        assert!(first.dot_active);
        assert!(!host.page().timeline.item(1).unwrap().dot_active);
        // (1000 - 0 + 400) / 2000
        assert!((host.timeline().progress_percent - 70.0).abs() < 1e-3);
        // Still inside the scroll settle window, so nothing snaps.
        assert!(host.timeline().snap_to.is_empty());
    }

    #[test]
    fn hover_targets_follow_the_flag() {
        let mut host = Host::new(&config(2)).unwrap();
        host.on_ui(UiEvent::PointerLeftBalls(0)).unwrap();
        assert!(host.pool().groups().iter().all(|g| g.surface().is_visible()));
    }

    #[test]
    fn single_container_never_transfers() {
        let mut host = Host::new(&config(1)).unwrap();
        assert_eq!(host.on_transfer(), TransferOutcome::NotEnoughGroups);
        let summary = host.finish();
        assert_eq!(summary.transfers, 0);
        assert_eq!(summary.final_counts, vec![6]);
    }

    #[test]
    fn run_app_stops_at_deadline() {
        let mut config = config(2);
        config.frame_rate_hz = 200;
        config.run_for_ms = Some(150);
        let summary = run_app(config).unwrap();
        assert!(summary.frames > 0);
        assert_eq!(summary.final_counts.iter().sum::<usize>(), 12);
    }
}
