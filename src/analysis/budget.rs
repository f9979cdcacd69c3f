//! Soft wall-clock budget for a survey run
//!
//! Advisory only: nothing is cancelled when the budget runs out, callers
//! check [`TimeBudget::should_continue`] before starting optional work.

use std::time::{Duration, Instant};

/// Wall-clock budget measured from creation
#[derive(Clone, Copy, Debug)]
pub struct TimeBudget {
    start: Instant,
    /// Total time allowed for the run
    allowed: Duration,
    /// Time kept back for cleanup and presentation
    reserve: Duration,
}

impl TimeBudget {
    /// Start a budget now
    ///
    /// # Arguments
    /// * `allowed` - Total time the run may take
    /// * `reserve` - Portion of `allowed` kept for finishing up
    pub fn start(allowed: Duration, reserve: Duration) -> Self {
        Self::started_at(Instant::now(), allowed, reserve)
    }

    /// Budget measured from an explicit start time
    pub fn started_at(start: Instant, allowed: Duration, reserve: Duration) -> Self {
        Self {
            start,
            allowed,
            reserve: reserve.min(allowed),
        }
    }

    /// Time since the budget started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Time left before the whole budget is spent (zero once exceeded)
    pub fn remaining(&self) -> Duration {
        self.allowed.saturating_sub(self.elapsed())
    }

    /// Whether optional work may still start without eating into the reserve
    pub fn should_continue(&self) -> bool {
        self.elapsed() <= self.allowed - self.reserve
    }
}
