//! Integration test: full polling run over curl against a local server.

mod common;

use common::http_server::{self, response};
use respwatch_core::pattern::PatternSet;
use respwatch_core::report::ClassificationResult;
use respwatch_core::request::RequestSpec;
use respwatch_core::response_log::ResponseLog;
use respwatch_core::scheduler::{ExitReason, PollScheduler, SchedulerSettings};
use respwatch_core::token::TokenSideChannel;
use respwatch_core::transport::{CurlTransport, TransportOptions};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const GREP: &str = "\
:: what we watch for
[red]
error
[green-regex]
status:\\s*200
[yellow]
x-served-by: edge
";

fn fast_settings() -> SchedulerSettings {
    SchedulerSettings {
        initial_sleep: Duration::ZERO,
        initial_delay: Duration::from_millis(10),
        increment_delay: Duration::from_millis(5),
        max_requests: Some(3),
        max_delay: None,
        body_only: false,
        case_sensitive: false,
    }
}

#[test]
fn polls_until_request_limit_and_writes_side_outputs() {
    let hits = Arc::new(AtomicUsize::new(0));
    let hits_srv = Arc::clone(&hits);
    let server = http_server::start_with(move |_| {
        let n = hits_srv.fetch_add(1, Ordering::SeqCst) + 1;
        let body = if n == 2 {
            "{\"error\": \"busy\"}".to_string()
        } else {
            format!("status: 200\n{{\"token\": \"tok-{}\"}}", n)
        };
        response("200 OK", &[("X-Served-By", "edge")], &body)
    });

    let dir = tempdir().unwrap();
    let token_path = dir.path().join("session.token");
    let log_path = dir.path().join("responses.log");

    let patterns = PatternSet::load(GREP).unwrap();
    let mut request = RequestSpec::parse("GET /poll HTTP/1.1\nHost: target.test\n").unwrap();
    request.url = format!("{}/poll", server.base_url());

    let mut rows: Vec<ClassificationResult> = Vec::new();
    let mut scheduler = PollScheduler::new(
        request,
        &patterns,
        fast_settings(),
        CurlTransport::new(TransportOptions::default()),
    )
    .with_token_side_channel(TokenSideChannel::new(&token_path))
    .with_response_log(ResponseLog::open(&log_path).unwrap());

    let reason = scheduler.run(&mut |r: &ClassificationResult| rows.push(r.clone()));

    assert_eq!(reason, ExitReason::RequestLimit { max: 3 });
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    let indices: Vec<u64> = rows.iter().map(|r| r.cycle_index).collect();
    assert_eq!(indices, vec![1, 2, 3]);
    assert_eq!(rows[0].matches, vec![false, true, true]);
    assert_eq!(rows[1].matches, vec![true, false, true]);
    assert_eq!(rows[2].matches, vec![false, true, true]);
    assert_eq!(rows[2].delay, Duration::from_millis(20));

    assert_eq!(std::fs::read_to_string(&token_path).unwrap(), "tok-3");
    let log = std::fs::read_to_string(&log_path).unwrap();
    assert_eq!(log.matches("HTTP/1.1 200 OK").count(), 3);
    assert_eq!(log.matches("Session token extracted").count(), 2);
}

#[test]
fn garbage_reply_then_recovery_keeps_indices_contiguous() {
    // The first reply is not HTTP, so that attempt fails in the transport.
    let attempts = Arc::new(AtomicUsize::new(0));
    let attempts_srv = Arc::clone(&attempts);
    let server = http_server::start_with(move |_| {
        if attempts_srv.fetch_add(1, Ordering::SeqCst) == 0 {
            b"not http at all\r\n\r\n".to_vec()
        } else {
            response("200 OK", &[], "status: 200")
        }
    });

    let patterns = PatternSet::load(GREP).unwrap();
    let mut request = RequestSpec::parse("GET / HTTP/1.1\nHost: target.test\n").unwrap();
    request.url = format!("{}/", server.base_url());

    let mut settings = fast_settings();
    settings.max_requests = Some(2);
    let mut rows: Vec<u64> = Vec::new();
    let mut scheduler = PollScheduler::new(
        request,
        &patterns,
        settings,
        CurlTransport::default(),
    );
    let reason = scheduler.run(&mut |r: &ClassificationResult| rows.push(r.cycle_index));

    assert_eq!(reason, ExitReason::RequestLimit { max: 2 });
    assert_eq!(rows, vec![1, 2]);
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}
