//! Cancellable handles for the two periodic sources: the per-frame update and
//! the transfer timer. The host owns the actual clock and calls into these.

use std::time::Duration;

use crate::error::{Error, Result};

/// Per-display-frame update loop.
#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    running: bool,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Frames actually processed while running.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Returns whether this frame should be processed.
    pub(crate) fn begin_frame(&mut self) -> bool {
        if self.running {
            self.frames += 1;
        }
        self.running
    }
}

/// Fixed-interval timer.
///
/// Hosts with their own interval source just check [`is_running`](Self::is_running);
/// hosts with a single clock feed elapsed time through [`advance`](Self::advance).
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    interval: Duration,
    elapsed: Duration,
    running: bool,
}

impl RepeatingTimer {
    pub fn new(interval: Duration) -> Result<Self> {
        if interval.is_zero() {
            return Err(Error::ZeroInterval);
        }
        Ok(Self {
            interval,
            elapsed: Duration::ZERO,
            running: false,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stopping discards any partially elapsed interval.
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add elapsed time and return how many ticks became due.
    pub fn advance(&mut self, delta: Duration) -> u32 {
        if !self.running {
            return 0;
        }
        self.elapsed += delta;
        let mut due = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            due += 1;
        }
        due
    }
}
