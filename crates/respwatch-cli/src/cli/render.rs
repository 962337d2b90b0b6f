//! Console output: settings banner, legend, result table.

use chrono::{DateTime, Local};
use console::style;
use respwatch_core::config::PollConfig;
use respwatch_core::pattern::{Pattern, PatternSet, Severity};
use respwatch_core::report::{format_delay, format_timestamp, ClassificationResult, ResultSink};
use respwatch_core::scheduler::ExitReason;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;

const SNO_WIDTH: usize = 5;
const TIMESTAMP_WIDTH: usize = 19;
const DELAY_WIDTH: usize = 8;
const RULE_WIDTH: usize = 50;

/// Inputs and outputs shown in the settings banner.
pub struct RunSummary<'a> {
    pub started_at: DateTime<Local>,
    pub req_file: &'a Path,
    pub grep_file: &'a Path,
    pub log_resp: Option<&'a Path>,
    pub token_file: Option<&'a Path>,
    pub cfg: &'a PollConfig,
}

fn enabled_path(p: Option<&Path>) -> String {
    p.map(|p| format!("Enabled -> {}", p.display()))
        .unwrap_or_else(|| "Disabled".to_string())
}

pub fn settings_banner(s: &RunSummary<'_>) -> String {
    let cfg = s.cfg;
    let limit = |v: Option<u64>| match v {
        Some(n) if n > 0 => n.to_string(),
        _ => "Unlimited".to_string(),
    };
    let mut out = String::new();
    let _ = writeln!(out, "\nSettings:");
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "Start Time: {}", format_timestamp(&s.started_at));
    let _ = writeln!(out, "Request File: {}", s.req_file.display());
    let _ = writeln!(out, "Grep File: {}", s.grep_file.display());
    let _ = writeln!(
        out,
        "Proxy: {}",
        cfg.proxy.as_deref().unwrap_or("Not configured")
    );
    let _ = writeln!(out, "Initial Sleep: {} minutes", cfg.init_sleep_minutes);
    let _ = writeln!(out, "Delay between requests: {} minutes", cfg.delay_minutes);
    let _ = writeln!(out, "Delay increment: {} minutes", cfg.increment_delay_minutes);
    let _ = writeln!(out, "Look only body: {}", cfg.body_only);
    let _ = writeln!(out, "Case sensitive grep: {}", cfg.case_sensitive);
    let _ = writeln!(out, "Verify TLS: {}", cfg.verify_tls);
    let _ = writeln!(out, "Response logging: {}", enabled_path(s.log_resp));
    let _ = writeln!(out, "Max requests: {}", limit(cfg.max_requests));
    let _ = writeln!(out, "Max delay: {} minutes", limit(cfg.max_delay_minutes));
    let _ = writeln!(out, "Write session token: {}", enabled_path(s.token_file));
    let _ = write!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}

fn paint(text: &str, severity: Severity) -> String {
    match severity {
        Severity::Info => style(text).green().to_string(),
        Severity::Warning => style(text).yellow().to_string(),
        Severity::Critical => style(text).red().to_string(),
    }
}

fn legend_line(p: &Pattern) -> String {
    paint(
        &format!("{:2}.{} {}", p.ordinal, p.kind_tag(), p.text),
        p.severity,
    )
}

pub fn legend(patterns: &PatternSet) -> String {
    let mut out = String::from("\nLegend:");
    for p in patterns {
        out.push('\n');
        out.push_str(&legend_line(p));
    }
    out
}

/// Cell content for one pattern: blank, or a colored `+` / `?` / `X`.
pub fn match_glyph(matched: bool, severity: Severity) -> String {
    if !matched {
        return " ".to_string();
    }
    let glyph = match severity {
        Severity::Info => "+",
        Severity::Warning => "?",
        Severity::Critical => "X",
    };
    paint(glyph, severity)
}

pub fn table_header(patterns: &PatternSet) -> String {
    let time_header = format!(
        "{:^sno$} | {:^ts$} | {:^d$} | {:^ts$}",
        " S.No",
        "Current Time",
        "Delay",
        "Next Request Time",
        sno = SNO_WIDTH,
        ts = TIMESTAMP_WIDTH,
        d = DELAY_WIDTH
    );
    let total_width = time_header.len() + 3 + patterns.len() * 4;
    let rule = "-".repeat(total_width);
    let mut header = format!("{} ", time_header);
    for p in patterns {
        let _ = write!(header, "|{:^3}", p.ordinal);
    }
    header.push('|');
    format!("{}\n{}\n{}", rule, header, rule)
}

pub fn table_row(result: &ClassificationResult, severities: &[Severity]) -> String {
    let mut row = format!(
        "{:>sno$} | {:<ts$} | {:^d$} | {:<ts$} |",
        result.cycle_index,
        format_timestamp(&result.issued_at),
        format_delay(result.delay),
        format_timestamp(&result.next_issue_at),
        sno = SNO_WIDTH,
        ts = TIMESTAMP_WIDTH,
        d = DELAY_WIDTH
    );
    for (matched, severity) in result.matches.iter().zip(severities) {
        let _ = write!(row, " {} |", match_glyph(*matched, *severity));
    }
    row
}

pub fn exit_message(at: &DateTime<Local>, reason: &ExitReason) -> String {
    let ts = format_timestamp(at);
    match reason {
        ExitReason::RequestLimit { max } => format!(
            "\n{}: Reached maximum requests limit ({}). Exiting...",
            ts, max
        ),
        ExitReason::DelayLimit { delay, max } => format!(
            "\n{}: Next delay ({:.1} minutes) would exceed maximum delay limit ({} minutes). Exiting...",
            ts,
            delay.as_secs_f64() / 60.0,
            max.as_secs() / 60
        ),
    }
}

/// Prints one table row per reported cycle.
pub struct TableWriter<W: Write> {
    out: W,
    severities: Vec<Severity>,
    last_issued_at: Option<DateTime<Local>>,
}

impl<W: Write> TableWriter<W> {
    pub fn new(out: W, patterns: &PatternSet) -> Self {
        Self {
            out,
            severities: patterns.iter().map(|p| p.severity).collect(),
            last_issued_at: None,
        }
    }

    pub fn last_issued_at(&self) -> Option<DateTime<Local>> {
        self.last_issued_at
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ResultSink for TableWriter<W> {
    fn report(&mut self, result: &ClassificationResult) {
        self.last_issued_at = Some(result.issued_at);
        let row = table_row(result, &self.severities);
        if let Err(e) = writeln!(self.out, "{}", row).and_then(|_| self.out.flush()) {
            tracing::warn!("could not print result row: {}", e);
        }
    }
}
