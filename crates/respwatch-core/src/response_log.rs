//! Append-only log of every serialized response.

use crate::report::format_timestamp;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "==================================================";

/// File that receives one block per classified response.
#[derive(Debug)]
pub struct ResponseLog {
    path: PathBuf,
    file: File,
}

impl ResponseLog {
    /// Open (creating if needed) `path` for appending.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open response log {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the text a cycle was classified against.
    pub fn record(&mut self, issued_at: &DateTime<Local>, text: &str) -> io::Result<()> {
        write!(
            self.file,
            "\n{sep}\n{}\n{}\n{sep}\n",
            format_timestamp(issued_at),
            text,
            sep = SEPARATOR
        )?;
        self.file.flush()
    }

    /// Note that a session token was written to `destination`.
    pub fn record_token(&mut self, destination: &Path) -> io::Result<()> {
        writeln!(
            self.file,
            "\nSession token extracted and written to {}",
            destination.display()
        )?;
        self.file.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn record_appends_blocks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("responses.log");
        let ts = Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        {
            let mut log = ResponseLog::open(&path).unwrap();
            log.record(&ts, "first").unwrap();
        }
        {
            let mut log = ResponseLog::open(&path).unwrap();
            log.record_token(Path::new("/tmp/tok")).unwrap();
            log.record(&ts, "second").unwrap();
        }
        let data = std::fs::read_to_string(&path).unwrap();
        let expected_first = format!("\n{SEPARATOR}\n2024.02.01-03:04:05\nfirst\n{SEPARATOR}\n");
        assert!(data.starts_with(&expected_first));
        assert!(data.contains("Session token extracted and written to /tmp/tok"));
        assert!(data.ends_with(&format!("second\n{SEPARATOR}\n")));
    }

    #[test]
    fn open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ResponseLog::open(&dir.path().join("no/such/dir.log")).is_err());
    }
}
