//! Polling scheduler with incremental backoff.
//!
//! One request at a time: send, classify, report, then wait a delay that grows
//! by a fixed increment after every reported cycle. Transport failures are
//! retried after the current delay without counting as a cycle. The loop ends
//! only when a configured request or delay limit is reached.

mod run;
mod state;


use std::fmt;
use std::time::Duration;

pub use run::PollScheduler;
pub use state::{Phase, SchedulerState};

/// Timing and matching parameters for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// Slept once before the first request; zero skips it.
    pub initial_sleep: Duration,
    /// Delay following the first reported cycle.
    pub initial_delay: Duration,
    /// Added to the delay after every reported cycle.
    pub increment_delay: Duration,
    /// Stop once this many cycles were reported.
    pub max_requests: Option<u64>,
    /// Stop once the delay used by a cycle exceeds this.
    pub max_delay: Option<Duration>,
    pub body_only: bool,
    pub case_sensitive: bool,
}

/// Why the scheduler stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    RequestLimit { max: u64 },
    /// `delay` is the delay of the last reported cycle.
    DelayLimit { delay: Duration, max: Duration },
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::RequestLimit { max } => {
                write!(f, "reached maximum requests limit ({})", max)
            }
            ExitReason::DelayLimit { delay, max } => write!(
                f,
                "next delay ({:.1} minutes) would exceed maximum delay limit ({} minutes)",
                delay.as_secs_f64() / 60.0,
                max.as_secs() / 60
            ),
        }
    }
}

/// Blocking wait between cycles.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Sleeps the current thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

impl<S: Sleeper + ?Sized> Sleeper for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration)
    }
}
