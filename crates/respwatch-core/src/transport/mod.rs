//! Sending the replayed request.
//!
//! The scheduler only sees the [`Transport`] trait; [`CurlTransport`] is the
//! libcurl-backed implementation used by the CLI. Tests substitute scripted
//! transports.

mod libcurl;
mod error;
mod parse;

use crate::request::RequestSpec;
use crate::response::Response;
use std::time::Duration;

pub use libcurl::CurlTransport;
pub use error::TransportError;

/// Sends one request and returns the final response.
pub trait Transport {
    fn send(&mut self, request: &RequestSpec) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, request: &RequestSpec) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, request: &RequestSpec) -> Result<Response, TransportError> {
        (**self).send(request)
    }
}

/// Connection settings shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Forward proxy for both HTTP and HTTPS, e.g. `http://127.0.0.1:8080`.
    pub proxy: Option<String>,
    /// Verify the server certificate and host name. Off unless asked for.
    pub verify_tls: bool,
    pub connect_timeout: Duration,
    /// Upper bound on a whole request/response exchange.
    pub timeout: Duration,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            verify_tls: false,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(120),
        }
    }
}
