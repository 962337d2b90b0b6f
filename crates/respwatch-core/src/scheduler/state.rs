//! Scheduler state and phases.

use super::ExitReason;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Where the scheduler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting out the configured initial sleep.
    InitialSleep,
    /// Next step sends the request (and classifies and reports on success).
    Requesting,
    /// The transport failed; wait the current delay, then request again.
    RetryWait,
    /// A cycle was reported; wait the current delay, then grow it.
    Sleeping,
    Terminated(ExitReason),
}

/// Mutable state owned by the scheduler for the length of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerState {
    pub current_delay: Duration,
    /// Index the next reported cycle will carry (1-based).
    pub cycle_index: u64,
    pub started_at: DateTime<Local>,
}

impl SchedulerState {
    pub fn new(initial_delay: Duration) -> Self {
        Self {
            current_delay: initial_delay,
            cycle_index: 1,
            started_at: Local::now(),
        }
    }

    /// Number of cycles reported so far.
    pub fn reported(&self) -> u64 {
        self.cycle_index - 1
    }

    pub(crate) fn grow_delay(&mut self, increment: Duration) {
        self.current_delay = self.current_delay.saturating_add(increment);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_at_cycle_one() {
        let s = SchedulerState::new(Duration::from_secs(300));
        assert_eq!(s.cycle_index, 1);
        assert_eq!(s.reported(), 0);
        assert_eq!(s.current_delay, Duration::from_secs(300));
    }

    #[test]
    fn grow_delay_saturates() {
        let mut s = SchedulerState::new(Duration::MAX);
        s.grow_delay(Duration::from_secs(1));
        assert_eq!(s.current_delay, Duration::MAX);
    }
}
