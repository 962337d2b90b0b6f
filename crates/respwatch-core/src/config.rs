//! Run configuration.
//!
//! Defaults live in `~/.config/respwatch/config.toml` (created on first run);
//! command-line flags override them field by field. All delays are whole
//! minutes on the outside and [`Duration`]s inside the scheduler.

use crate::scheduler::SchedulerSettings;
use crate::transport::TransportOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SECS_PER_MINUTE: u64 = 60;

pub fn minutes(m: u64) -> Duration {
    Duration::from_secs(m.saturating_mul(SECS_PER_MINUTE))
}

/// Polling and transport settings loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Sleep once before the first request, in minutes.
    pub init_sleep_minutes: u64,
    /// Delay after the first request, in minutes.
    pub delay_minutes: u64,
    /// Added to the delay after every reported cycle, in minutes.
    pub increment_delay_minutes: u64,
    /// Stop after this many reported cycles (0 or missing = unlimited).
    pub max_requests: Option<u64>,
    /// Stop once a cycle's delay exceeds this many minutes (0 or missing = unlimited).
    pub max_delay_minutes: Option<u64>,
    /// Search only the response body instead of status line + headers + body.
    pub body_only: bool,
    pub case_sensitive: bool,
    /// Forward proxy for HTTP and HTTPS.
    pub proxy: Option<String>,
    /// Verify TLS certificates (off by default: targets are often test hosts).
    pub verify_tls: bool,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            init_sleep_minutes: 0,
            delay_minutes: 5,
            increment_delay_minutes: 2,
            max_requests: None,
            max_delay_minutes: None,
            body_only: false,
            case_sensitive: false,
            proxy: None,
            verify_tls: false,
            request_timeout_secs: 120,
        }
    }
}

impl PollConfig {
    /// Scheduler view with limits of 0 treated as unlimited.
    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            initial_sleep: minutes(self.init_sleep_minutes),
            initial_delay: minutes(self.delay_minutes),
            increment_delay: minutes(self.increment_delay_minutes),
            max_requests: self.max_requests.filter(|n| *n > 0),
            max_delay: self.max_delay_minutes.filter(|m| *m > 0).map(minutes),
            body_only: self.body_only,
            case_sensitive: self.case_sensitive,
        }
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            proxy: self.proxy.clone().filter(|p| !p.trim().is_empty()),
            verify_tls: self.verify_tls,
            timeout: Duration::from_secs(self.request_timeout_secs.max(1)),
            ..TransportOptions::default()
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("respwatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PollConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = PollConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

pub fn load_from_path(path: &Path) -> Result<PollConfig> {
    let data = fs::read_to_string(path)?;
    let cfg: PollConfig = toml::from_str(&data)?;
    Ok(cfg)
}
