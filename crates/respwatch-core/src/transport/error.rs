//! Transport error type.

use thiserror::Error;

/// A request attempt that produced no usable response.
///
/// The scheduler treats every variant the same way: log, wait, retry.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, TLS, proxy, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// The server answered with something that is not an HTTP status line.
    #[error("malformed status line {line:?}")]
    MalformedStatus { line: String },
    /// The transfer completed without any response head.
    #[error("no response received")]
    NoResponse,
    /// Anything a non-curl transport wants to report.
    #[error("{0}")]
    Other(String),
}
