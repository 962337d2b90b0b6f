//! The request being replayed.
//!
//! A request file is plain HTTP text: request line, headers, blank line, body.
//! It is parsed once into an immutable [`RequestSpec`]; the target URL is
//! always `https://{Host}{path}`, whatever authority the request line carries.

mod headers;
mod parse;

use anyhow::{Context, Result};
use std::path::Path;

pub use headers::HeaderMap;
pub use parse::MalformedRequestError;

/// Version assumed when the request line has no third token.
pub const DEFAULT_HTTP_VERSION: &str = "HTTP/1.1";

/// Parsed request file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    /// Path (with query) exactly as written on the request line.
    pub path: String,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    pub http_version: String,
}

impl RequestSpec {
    /// Parse the contents of a request file.
    pub fn parse(source: &str) -> Result<Self, MalformedRequestError> {
        parse::parse_request(source)
    }

    /// Read and parse a request file from disk.
    pub fn load_path(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read request file {}", path.display()))?;
        let spec = Self::parse(&data)
            .with_context(|| format!("parse request file {}", path.display()))?;
        tracing::debug!(method = %spec.method, url = %spec.url, "loaded request");
        Ok(spec)
    }

    /// `Host` header value, empty if the request file has none.
    pub fn host(&self) -> &str {
        self.headers.get("Host").unwrap_or("")
    }

    /// Request line as it would appear on the wire.
    pub fn request_line(&self) -> String {
        format!("{} {} {}", self.method, self.path, self.http_version)
    }

    /// Render back into request-file form. Parsing the output again yields an
    /// equal `RequestSpec`.
    pub fn to_request_text(&self) -> String {
        let mut out = self.request_line();
        out.push('\n');
        for (name, value) in self.headers.iter() {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        if let Some(body) = &self.body {
            out.push('\n');
            out.push_str(&String::from_utf8_lossy(body));
        }
        out
    }
}

pub(crate) fn build_url(host: &str, path: &str) -> String {
    format!("https://{}{}", host, path)
}
