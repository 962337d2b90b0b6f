//! `respwatch run` – replay the request until a limit is reached.

use anyhow::Result;
use chrono::Local;
use respwatch_core::config::PollConfig;
use respwatch_core::pattern::PatternSet;
use respwatch_core::request::RequestSpec;
use respwatch_core::response_log::ResponseLog;
use respwatch_core::scheduler::PollScheduler;
use respwatch_core::token::TokenSideChannel;
use respwatch_core::transport::CurlTransport;
use std::io;

use crate::cli::render::{self, RunSummary, TableWriter};
use crate::cli::RunArgs;

pub fn run_poll(args: &RunArgs, cfg: &PollConfig) -> Result<()> {
    let started_at = Local::now();

    // Input errors are fatal and surface before anything is sent.
    let patterns = PatternSet::load_path(&args.grep_file)?;
    let request = RequestSpec::load_path(&args.req_file)?;
    let response_log = args
        .log_resp
        .as_deref()
        .map(ResponseLog::open)
        .transpose()?;

    println!(
        "{}",
        render::settings_banner(&RunSummary {
            started_at,
            req_file: &args.req_file,
            grep_file: &args.grep_file,
            log_resp: args.log_resp.as_deref(),
            token_file: args.write_session_token.as_deref(),
            cfg,
        })
    );
    println!("{}", render::legend(&patterns));
    println!("\nRequest: {}", request.request_line());
    println!("{}", render::table_header(&patterns));

    let transport = CurlTransport::new(cfg.transport_options());
    let mut scheduler =
        PollScheduler::new(request, &patterns, cfg.scheduler_settings(), transport);
    if let Some(path) = &args.write_session_token {
        scheduler = scheduler.with_token_side_channel(TokenSideChannel::new(path));
    }
    if let Some(log) = response_log {
        scheduler = scheduler.with_response_log(log);
    }

    let mut table = TableWriter::new(io::stdout(), &patterns);
    let reason = scheduler.run(&mut table);

    let at = table.last_issued_at().unwrap_or_else(Local::now);
    println!("{}", render::exit_message(&at, &reason));
    tracing::info!(reported = scheduler.state().reported(), "run finished: {}", reason);
    Ok(())
}
