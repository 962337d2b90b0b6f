//! Per-cycle classification results and the sink they are reported to.

use chrono::{DateTime, Local};
use std::time::Duration;

/// Timestamp layout used in result rows and the response log.
pub const TIMESTAMP_FORMAT: &str = "%Y.%d.%m-%H:%M:%S";

/// Outcome of one successful cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// 1-based, increases by one per reported cycle.
    pub cycle_index: u64,
    pub issued_at: DateTime<Local>,
    /// `issued_at + delay`.
    pub next_issue_at: DateTime<Local>,
    /// Delay in effect for this cycle.
    pub delay: Duration,
    /// One flag per pattern, in ordinal order.
    pub matches: Vec<bool>,
}

impl ClassificationResult {
    pub fn any_match(&self) -> bool {
        self.matches.iter().any(|m| *m)
    }
}

/// Receives results in cycle order.
pub trait ResultSink {
    fn report(&mut self, result: &ClassificationResult);
}

impl<F: FnMut(&ClassificationResult)> ResultSink for F {
    fn report(&mut self, result: &ClassificationResult) {
        self(result)
    }
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Whole minutes and seconds, `MM:SS`. Minutes are not wrapped into hours.
pub fn format_delay(delay: Duration) -> String {
    let secs = delay.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
