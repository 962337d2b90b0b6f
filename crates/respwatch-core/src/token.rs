//! Session token side channel.
//!
//! After each classified response the scheduler can look for a
//! `"token": "<value>"` fragment and store the value in a file, so another
//! tool can pick up the freshest session token. A response without a token is
//! not an error.

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const TOKEN_PATTERN: &str = r#""token":\s*"([^"]+)""#;

/// Extracts a token from response text and overwrites a destination file with it.
#[derive(Debug, Clone)]
pub struct TokenSideChannel {
    destination: PathBuf,
    pattern: Regex,
}

impl TokenSideChannel {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
            pattern: Regex::new(TOKEN_PATTERN).expect("token pattern is a valid regex"),
        }
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// First token value in `text`, verbatim (no escape processing).
    pub fn extract(&self, text: &str) -> Option<String> {
        self.pattern
            .captures(text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Extract and, when found, overwrite the destination with the raw token.
    /// Returns the token that was written.
    pub fn capture(&self, text: &str) -> io::Result<Option<String>> {
        let Some(token) = self.extract(text) else {
            return Ok(None);
        };
        fs::write(&self.destination, token.as_bytes())?;
        tracing::debug!(path = %self.destination.display(), "session token written");
        Ok(Some(token))
    }
}
