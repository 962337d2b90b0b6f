//! CLI for respwatch.

mod commands;
mod render;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use respwatch_core::config::{self, PollConfig};
use std::path::PathBuf;

use commands::{run_check, run_completions, run_man, run_poll};

/// Top-level CLI for respwatch.
#[derive(Debug, Parser)]
#[command(name = "respwatch", version)]
#[command(
    about = "respwatch: replay an HTTP request on a growing delay and grep every response",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Replay the request until a request or delay limit is reached.
    Run(RunArgs),

    /// Parse the request and grep files, print the legend, send nothing.
    Check {
        /// File containing the raw HTTP request.
        #[arg(long, value_name = "FILE")]
        req_file: PathBuf,
        /// File containing grep patterns.
        #[arg(long, value_name = "FILE")]
        grep_file: PathBuf,
    },

    /// Print a shell completion script.
    Completions {
        /// Target shell.
        shell: clap_complete::Shell,
    },

    /// Print the man page (roff).
    Man,
}

/// Options of `respwatch run`. Unset values come from the config file.
#[derive(Debug, Args)]
pub struct RunArgs {
    /// File containing the raw HTTP request.
    #[arg(long, value_name = "FILE")]
    pub req_file: PathBuf,

    /// File containing grep patterns.
    #[arg(long, value_name = "FILE")]
    pub grep_file: PathBuf,

    /// Proxy for the request (HTTP and HTTPS).
    #[arg(long, value_name = "URL")]
    pub proxy: Option<String>,

    /// Initial sleep before the first request, in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub init_sleep: Option<u64>,

    /// Delay between requests, in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub delay: Option<u64>,

    /// Added to the delay after each request, in minutes.
    #[arg(long, value_name = "MINUTES")]
    pub increment_delay: Option<u64>,

    /// Grep only the response body.
    #[arg(long)]
    pub look_only_body: bool,

    /// Append every response to this file.
    #[arg(long, value_name = "FILE")]
    pub log_resp: Option<PathBuf>,

    /// Case sensitive grep.
    #[arg(long)]
    pub case_sensitive_grep: bool,

    /// Exit after this many requests (0 = unlimited).
    #[arg(long, value_name = "N")]
    pub max_requests: Option<u64>,

    /// Exit once the delay exceeds this many minutes (0 = unlimited).
    #[arg(long, value_name = "MINUTES")]
    pub max_delay: Option<u64>,

    /// Write the session token found in responses to this file.
    #[arg(long, value_name = "FILE")]
    pub write_session_token: Option<PathBuf>,

    /// Verify TLS certificates (disabled by default).
    #[arg(long)]
    pub verify_tls: bool,
}

impl RunArgs {
    /// Overlay the flags that were given on top of the file configuration.
    pub fn apply_to(&self, cfg: &mut PollConfig) {
        if let Some(proxy) = &self.proxy {
            cfg.proxy = Some(proxy.clone());
        }
        if let Some(m) = self.init_sleep {
            cfg.init_sleep_minutes = m;
        }
        if let Some(m) = self.delay {
            cfg.delay_minutes = m;
        }
        if let Some(m) = self.increment_delay {
            cfg.increment_delay_minutes = m;
        }
        if let Some(n) = self.max_requests {
            cfg.max_requests = Some(n);
        }
        if let Some(m) = self.max_delay {
            cfg.max_delay_minutes = Some(m);
        }
        cfg.body_only |= self.look_only_body;
        cfg.case_sensitive |= self.case_sensitive_grep;
        cfg.verify_tls |= self.verify_tls;
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Run(args) => {
                let mut cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                args.apply_to(&mut cfg);
                run_poll(&args, &cfg)?;
            }
            CliCommand::Check {
                req_file,
                grep_file,
            } => run_check(&req_file, &grep_file)?,
            CliCommand::Completions { shell } => run_completions(shell)?,
            CliCommand::Man => run_man()?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
