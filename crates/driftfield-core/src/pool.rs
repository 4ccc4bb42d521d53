use std::time::Duration;

use driftfield_platform::RenderSurface;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::ball::BallId;
use crate::config::BackgroundOptions;
use crate::error::Result;
use crate::group::{BallGroup, Rejected};
use crate::schedule::RepeatingTimer;

/// What one transfer tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferOutcome {
    /// The transfer timer is stopped.
    Stopped,
    /// Fewer than two groups, so no distinct destination exists.
    NotEnoughGroups,
    /// Indices out of range or equal.
    InvalidPair { from: usize, to: usize },
    EmptySource { from: usize },
    Moved { from: usize, to: usize, ball: BallId },
    /// The destination refused the ball; it never left its source.
    Returned { from: usize, to: usize, ball: BallId },
}

impl TransferOutcome {
    pub fn moved(&self) -> bool {
        matches!(self, TransferOutcome::Moved { .. })
    }
}

/// Several groups sharing options, with a timer that migrates balls between them.
pub struct BallGroupPool<S: RenderSurface> {
    groups: Vec<BallGroup<S>>,
    options: BackgroundOptions,
    timer: RepeatingTimer,
    rng: StdRng,
}

impl<S: RenderSurface> BallGroupPool<S> {
    /// One group per surface, in order. The transfer timer starts immediately.
    pub fn new(surfaces: impl IntoIterator<Item = S>, options: BackgroundOptions) -> Result<Self> {
        options.validate()?;
        let mut rng = match options.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let groups = surfaces
            .into_iter()
            .map(|surface| {
                let group_rng = StdRng::seed_from_u64(rng.gen());
                BallGroup::with_rng(surface, options.clone(), group_rng)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut timer = RepeatingTimer::new(options.transfer_interval())?;
        timer.start();

        if groups.len() < 2 {
            info!(
                "ball pool with {} group(s): transfers have no destination and will be skipped",
                groups.len()
            );
        } else {
            info!(
                "ball pool ready: {} groups, transfer every {} ms",
                groups.len(),
                options.transfer_interval_ms
            );
        }

        Ok(Self {
            groups,
            options,
            timer,
            rng,
        })
    }

    /// Advance every group by one display frame.
    pub fn frame(&mut self) {
        for (index, group) in self.groups.iter_mut().enumerate() {
            if let Err(err) = group.frame() {
                warn!("group {index}: frame update failed: {err}");
            }
        }
    }

    /// One firing of the transfer timer: move a random ball from a random group
    /// to a different random group.
    pub fn transfer_tick(&mut self) -> TransferOutcome {
        if !self.timer.is_running() {
            return TransferOutcome::Stopped;
        }
        let count = self.groups.len();
        if count < 2 {
            return TransferOutcome::NotEnoughGroups;
        }
        let from = self.rng.gen_range(0..count);
        // Uniform over every index except `from`.
        let mut to = self.rng.gen_range(0..count - 1);
        if to >= from {
            to += 1;
        }
        self.transfer_between(from, to)
    }

    /// Move a uniformly chosen ball from group `from` to group `to`.
    pub fn transfer_between(&mut self, from: usize, to: usize) -> TransferOutcome {
        let count = self.groups.len();
        if from == to || from >= count || to >= count {
            return TransferOutcome::InvalidPair { from, to };
        }
        let source_len = self.groups[from].len();
        if source_len == 0 {
            debug!("transfer skipped: group {from} is empty");
            return TransferOutcome::EmptySource { from };
        }
        let pick = self.rng.gen_range(0..source_len);
        let Some(id) = self.groups[from].ball_id_at(pick) else {
            return TransferOutcome::EmptySource { from };
        };
        // The source keeps its element until the destination has accepted the
        // ball, so a refusal can be undone without touching either surface.
        let Some((ball, element)) = self.groups[from].take_member(id) else {
            return TransferOutcome::EmptySource { from };
        };

        match self.groups[to].add_ball(ball) {
            Ok(()) => {
                self.groups[from].release_element(element);
                debug!("transferred {:?} from group {from} to group {to}", id);
                TransferOutcome::Moved { from, to, ball: id }
            }
            Err(Rejected { ball, source }) => {
                warn!("group {to} refused {:?}: {source}; it stays in group {from}", id);
                self.groups[from].restore_member(ball, element);
                TransferOutcome::Returned { from, to, ball: id }
            }
        }
    }

    /// Feed elapsed time to the transfer timer and run every tick that became due.
    pub fn advance_clock(&mut self, elapsed: Duration) -> Vec<TransferOutcome> {
        let due = self.timer.advance(elapsed);
        (0..due).map(|_| self.transfer_tick()).collect()
    }

    /// Restart the transfer timer.
    pub fn start(&mut self) {
        self.timer.start();
    }

    /// Stop the transfer timer; frame loops keep running.
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn is_transferring(&self) -> bool {
        self.timer.is_running()
    }

    /// Stop the transfer timer and every frame loop. Balls stay in place.
    pub fn dispose(&mut self) {
        self.timer.stop();
        for group in &mut self.groups {
            group.dispose();
        }
        info!("ball pool disposed with {} balls", self.total_balls());
    }

    pub fn transfer_interval(&self) -> Duration {
        self.timer.interval()
    }

    pub fn total_balls(&self) -> usize {
        self.groups.iter().map(BallGroup::len).sum()
    }

    pub fn counts(&self) -> Vec<usize> {
        self.groups.iter().map(BallGroup::len).collect()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn groups(&self) -> &[BallGroup<S>] {
        &self.groups
    }

    pub fn group(&self, index: usize) -> Option<&BallGroup<S>> {
        self.groups.get(index)
    }

    pub fn group_mut(&mut self, index: usize) -> Option<&mut BallGroup<S>> {
        self.groups.get_mut(index)
    }

    pub fn options(&self) -> &BackgroundOptions {
        &self.options
    }
}

impl<S: RenderSurface + std::fmt::Debug> std::fmt::Debug for BallGroupPool<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BallGroupPool")
            .field("groups", &self.groups)
            .field("timer", &self.timer)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftfield_platform::{ElementHandle, ElementStyle, Extent, MemorySurface};

    fn options(num_balls: usize, seed: u64) -> BackgroundOptions {
        BackgroundOptions {
            num_balls,
            seed: Some(seed),
            ..BackgroundOptions::default()
        }
    }

    fn surfaces(n: usize) -> Vec<MemorySurface> {
        (0..n)
            .map(|i| MemorySurface::new(format!("c{i}"), 1200.0, 800.0))
            .collect()
    }

    #[test]
    fn one_group_per_surface() {
        let pool = BallGroupPool::new(surfaces(3), options(5, 1)).unwrap();
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.counts(), vec![5, 5, 5]);
        assert!(pool.is_transferring());
        assert_eq!(pool.transfer_interval(), Duration::from_millis(5000));
    }

    #[test]
    fn transfers_conserve_ball_count() {
        let mut pool = BallGroupPool::new(surfaces(3), options(4, 2)).unwrap();
        let mut moved = 0;
        for _ in 0..500 {
            let outcome = pool.transfer_tick();
            if let TransferOutcome::Moved { from, to, .. } = outcome {
                assert_ne!(from, to);
                moved += 1;
            }
            assert_eq!(pool.total_balls(), 12);
            pool.frame();
        }
        assert!(moved > 0);
        for group in pool.groups() {
            assert_eq!(group.len(), group.surface().element_count());
        }
    }

    #[test]
    fn destination_never_equals_source() {
        let mut pool = BallGroupPool::new(surfaces(2), options(50, 3)).unwrap();
        for _ in 0..200 {
            match pool.transfer_tick() {
                TransferOutcome::Moved { from, to, .. } => assert_ne!(from, to),
                TransferOutcome::EmptySource { .. } => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
    }

    #[test]
    fn single_group_pool_is_inert() {
        let mut pool = BallGroupPool::new(surfaces(1), options(3, 4)).unwrap();
        for _ in 0..10 {
            assert_eq!(pool.transfer_tick(), TransferOutcome::NotEnoughGroups);
        }
        assert_eq!(pool.counts(), vec![3]);
    }

    #[test]
    fn empty_pool_is_inert() {
        let mut pool = BallGroupPool::new(Vec::<MemorySurface>::new(), options(3, 5)).unwrap();
        assert!(pool.is_empty());
        assert_eq!(pool.transfer_tick(), TransferOutcome::NotEnoughGroups);
        pool.frame();
        assert_eq!(pool.total_balls(), 0);
    }

    #[test]
    fn empty_source_is_a_noop() {
        // A collapsed container starts with no balls.
        let surfaces = vec![
            MemorySurface::new("hero", 800.0, 600.0),
            MemorySurface::new("collapsed", 0.0, 0.0),
        ];
        let mut pool = BallGroupPool::new(surfaces, options(3, 6)).unwrap();
        assert_eq!(pool.counts(), vec![3, 0]);

        assert_eq!(pool.transfer_between(1, 0), TransferOutcome::EmptySource { from: 1 });
        assert_eq!(pool.counts(), vec![3, 0]);

        assert!(pool.transfer_between(0, 1).moved());
        assert_eq!(pool.counts(), vec![2, 1]);
    }

    #[test]
    fn invalid_pairs_are_rejected() {
        let mut pool = BallGroupPool::new(surfaces(2), options(1, 7)).unwrap();
        assert_eq!(
            pool.transfer_between(0, 0),
            TransferOutcome::InvalidPair { from: 0, to: 0 }
        );
        assert_eq!(
            pool.transfer_between(0, 9),
            TransferOutcome::InvalidPair { from: 0, to: 9 }
        );
        assert_eq!(pool.counts(), vec![1, 1]);
    }

    #[test]
    fn transfer_preserves_ball_state() {
        let mut pool = BallGroupPool::new(surfaces(2), options(1, 8)).unwrap();
        let source = pool.group(0).unwrap();
        let id = source.ball_ids()[0];
        let ball = source.ball(id).unwrap();
        let state = (ball.position(), ball.velocity(), ball.size(), ball.color());

        assert_eq!(
            pool.transfer_between(0, 1),
            TransferOutcome::Moved { from: 0, to: 1, ball: id }
        );
        let moved = pool.group(1).unwrap().ball(id).unwrap();
        assert_eq!(
            (moved.position(), moved.velocity(), moved.size(), moved.color()),
            state
        );
        assert!(pool.group(0).unwrap().ball(id).is_none());
    }

    #[test]
    fn stopped_timer_skips_ticks() {
        let mut pool = BallGroupPool::new(surfaces(2), options(2, 9)).unwrap();
        pool.stop();
        assert_eq!(pool.transfer_tick(), TransferOutcome::Stopped);
        assert!(pool.advance_clock(Duration::from_secs(60)).is_empty());

        pool.start();
        let outcomes = pool.advance_clock(Duration::from_millis(10_500));
        assert_eq!(outcomes.len(), 2);
        assert_eq!(pool.total_balls(), 4);
    }

    #[test]
    fn dispose_stops_everything_and_keeps_balls() {
        let mut pool = BallGroupPool::new(surfaces(2), options(2, 10)).unwrap();
        pool.dispose();
        assert!(!pool.is_transferring());
        assert!(pool.groups().iter().all(|g| !g.is_running()));
        assert_eq!(pool.total_balls(), 4);
        assert_eq!(pool.transfer_tick(), TransferOutcome::Stopped);
    }

    /// Surface that refuses every attachment.
    #[derive(Debug)]
    struct Refusing {
        inner: MemorySurface,
        refuse: bool,
    }

    impl RenderSurface for Refusing {
        fn extent(&self) -> Extent {
            self.inner.extent()
        }
        fn attach(&mut self, style: &ElementStyle) -> driftfield_platform::Result<ElementHandle> {
            if self.refuse {
                return Err("surface is gone".into());
            }
            self.inner.attach(style)
        }
        fn detach(&mut self, handle: ElementHandle) -> driftfield_platform::Result<()> {
            self.inner.detach(handle)
        }
        fn measure(&self, handle: ElementHandle) -> Option<Extent> {
            self.inner.measure(handle)
        }
        fn translate(&mut self, handle: ElementHandle, x: f32, y: f32) -> driftfield_platform::Result<()> {
            self.inner.translate(handle, x, y)
        }
        fn clear(&mut self) -> driftfield_platform::Result<()> {
            self.inner.clear()
        }
    }

    #[test]
    fn refused_ball_returns_to_source() {
        let surfaces = vec![
            Refusing {
                inner: MemorySurface::new("ok", 800.0, 600.0),
                refuse: false,
            },
            Refusing {
                inner: MemorySurface::new("broken", 800.0, 600.0),
                refuse: false,
            },
        ];
        let mut pool = BallGroupPool::new(surfaces, options(2, 11)).unwrap();
        pool.group_mut(1).unwrap().surface_mut().refuse = true;

        let outcome = pool.transfer_between(0, 1);
        assert!(matches!(outcome, TransferOutcome::Returned { from: 0, to: 1, .. }));
        assert_eq!(pool.counts(), vec![2, 2]);
    }

    #[test]
    fn refusal_on_both_sides_keeps_every_ball() {
        let surfaces = vec![
            Refusing {
                inner: MemorySurface::new("a", 800.0, 600.0),
                refuse: false,
            },
            Refusing {
                inner: MemorySurface::new("b", 800.0, 600.0),
                refuse: false,
            },
        ];
        let mut pool = BallGroupPool::new(surfaces, options(2, 12)).unwrap();
        for index in 0..2 {
            pool.group_mut(index).unwrap().surface_mut().refuse = true;
        }

        for _ in 0..20 {
            let outcome = pool.transfer_tick();
            assert!(matches!(outcome, TransferOutcome::Returned { .. }), "{outcome:?}");
            assert_eq!(pool.total_balls(), 4);
        }
        assert_eq!(pool.counts(), vec![2, 2]);
        for group in pool.groups() {
            assert_eq!(group.surface().inner.element_count(), 2);
            for id in group.ball_ids() {
                let element = group.element_of(id).unwrap();
                assert!(group.surface().inner.element(element).is_some());
            }
        }

        // Once the destination accepts again, the old element is released.
        pool.group_mut(1).unwrap().surface_mut().refuse = false;
        assert!(pool.transfer_between(0, 1).moved());
        assert_eq!(pool.counts(), vec![1, 3]);
        assert_eq!(pool.group(0).unwrap().surface().inner.element_count(), 1);
    }
}
