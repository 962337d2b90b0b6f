//! The polling loop.

use super::state::{Phase, SchedulerState};
use super::{ExitReason, SchedulerSettings, Sleeper, ThreadSleeper};
use crate::classify::Classifier;
use crate::pattern::PatternSet;
use crate::report::{ClassificationResult, ResultSink};
use crate::request::RequestSpec;
use crate::response::{serialize, Response};
use crate::response_log::ResponseLog;
use crate::token::TokenSideChannel;
use crate::transport::Transport;
use chrono::{DateTime, Local};
use std::time::Duration;

/// Drives request → classify → report cycles until an exit condition holds.
pub struct PollScheduler<T, S = ThreadSleeper> {
    request: RequestSpec,
    classifier: Classifier,
    settings: SchedulerSettings,
    transport: T,
    sleeper: S,
    token: Option<TokenSideChannel>,
    response_log: Option<ResponseLog>,
    state: SchedulerState,
    phase: Phase,
}

impl<T: Transport> PollScheduler<T, ThreadSleeper> {
    pub fn new(
        request: RequestSpec,
        patterns: &PatternSet,
        settings: SchedulerSettings,
        transport: T,
    ) -> Self {
        Self::with_sleeper(request, patterns, settings, transport, ThreadSleeper)
    }
}

impl<T: Transport, S: Sleeper> PollScheduler<T, S> {
    pub fn with_sleeper(
        request: RequestSpec,
        patterns: &PatternSet,
        settings: SchedulerSettings,
        transport: T,
        sleeper: S,
    ) -> Self {
        let classifier = Classifier::new(patterns, settings.case_sensitive);
        let state = SchedulerState::new(settings.initial_delay);
        let phase = if settings.initial_sleep.is_zero() {
            Phase::Requesting
        } else {
            Phase::InitialSleep
        };
        Self {
            request,
            classifier,
            settings,
            transport,
            sleeper,
            token: None,
            response_log: None,
            state,
            phase,
        }
    }

    pub fn with_token_side_channel(mut self, token: TokenSideChannel) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_response_log(mut self, log: ResponseLog) -> Self {
        self.response_log = Some(log);
        self
    }

    pub fn state(&self) -> &SchedulerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Run until a request or delay limit is reached. Without limits this
    /// never returns.
    pub fn run<R: ResultSink + ?Sized>(&mut self, sink: &mut R) -> ExitReason {
        tracing::info!(
            method = %self.request.method,
            url = %self.request.url,
            patterns = self.classifier.len(),
            "polling started"
        );
        loop {
            if let Phase::Terminated(reason) = self.step(sink) {
                tracing::info!(reported = self.state.reported(), "polling stopped: {}", reason);
                return reason;
            }
        }
    }

    /// Perform the work of the current phase and move to the next one.
    pub fn step<R: ResultSink + ?Sized>(&mut self, sink: &mut R) -> Phase {
        self.phase = match self.phase {
            Phase::InitialSleep => {
                tracing::debug!(secs = self.settings.initial_sleep.as_secs(), "initial sleep");
                self.sleeper.sleep(self.settings.initial_sleep);
                Phase::Requesting
            }
            Phase::Requesting => self.request_cycle(sink),
            Phase::RetryWait => {
                self.sleeper.sleep(self.state.current_delay);
                Phase::Requesting
            }
            Phase::Sleeping => {
                self.sleeper.sleep(self.state.current_delay);
                self.state.grow_delay(self.settings.increment_delay);
                Phase::Requesting
            }
            terminated @ Phase::Terminated(_) => terminated,
        };
        self.phase
    }

    fn request_cycle<R: ResultSink + ?Sized>(&mut self, sink: &mut R) -> Phase {
        let delay = self.state.current_delay;
        let issued_at = Local::now();

        let response = match self.transport.send(&self.request) {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(
                    cycle = self.state.cycle_index,
                    retry_in_secs = delay.as_secs(),
                    "request failed: {}",
                    e
                );
                return Phase::RetryWait;
            }
        };

        let result = self.classify(&response, issued_at, delay);
        sink.report(&result);
        self.state.cycle_index += 1;

        match self.exit_check(delay) {
            Some(reason) => Phase::Terminated(reason),
            None => Phase::Sleeping,
        }
    }

    fn classify(
        &mut self,
        response: &Response,
        issued_at: DateTime<Local>,
        delay: Duration,
    ) -> ClassificationResult {
        let text = serialize(response, self.settings.body_only);
        let matches = self.classifier.classify(&text);
        tracing::debug!(
            cycle = self.state.cycle_index,
            status = response.status_code,
            matched = matches.iter().filter(|m| **m).count(),
            "response classified"
        );

        self.capture_token(&text);
        if let Some(log) = self.response_log.as_mut() {
            if let Err(e) = log.record(&issued_at, &text) {
                tracing::warn!(path = %log.path().display(), "could not write response log: {}", e);
            }
        }

        ClassificationResult {
            cycle_index: self.state.cycle_index,
            issued_at,
            next_issue_at: next_issue(issued_at, delay),
            delay,
            matches,
        }
    }

    fn capture_token(&mut self, text: &str) {
        let Some(token) = self.token.as_ref() else {
            return;
        };
        match token.capture(text) {
            Ok(Some(_)) => {
                tracing::info!(path = %token.destination().display(), "session token extracted");
                if let Some(log) = self.response_log.as_mut() {
                    if let Err(e) = log.record_token(token.destination()) {
                        tracing::warn!("could not write response log: {}", e);
                    }
                }
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(path = %token.destination().display(), "could not write session token: {}", e);
            }
        }
    }

    /// Limits are checked after reporting: first the request count, then the
    /// delay that was just used (before it grows for the next cycle).
    fn exit_check(&self, delay_used: Duration) -> Option<ExitReason> {
        if let Some(max) = self.settings.max_requests {
            if self.state.cycle_index > max {
                return Some(ExitReason::RequestLimit { max });
            }
        }
        if let Some(max) = self.settings.max_delay {
            if delay_used > max {
                return Some(ExitReason::DelayLimit {
                    delay: delay_used,
                    max,
                });
            }
        }
        None
    }
}

fn next_issue(issued_at: DateTime<Local>, delay: Duration) -> DateTime<Local> {
    chrono::Duration::from_std(delay)
        .ok()
        .and_then(|d| issued_at.checked_add_signed(d))
        .unwrap_or(issued_at)
}
