//! Request replay over libcurl.
//!
//! A fresh easy handle per request keeps cycles independent: no pooled
//! connection, cookie or header state survives from one cycle to the next.

use super::parse::parse_head;
use super::{Transport, TransportError, TransportOptions};
use crate::request::RequestSpec;
use crate::response::Response;
use curl::easy::{Easy, HttpVersion, List};
use std::str;

/// [`Transport`] backed by the curl crate.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: TransportOptions,
}

impl CurlTransport {
    pub fn new(options: TransportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn configure(&self, easy: &mut Easy, request: &RequestSpec) -> Result<(), TransportError> {
        easy.url(&request.url)?;
        easy.http_version(HttpVersion::V11)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        // Empty string: advertise and decode every encoding libcurl supports.
        easy.accept_encoding("")?;

        if let Some(proxy) = &self.options.proxy {
            easy.proxy(proxy)?;
        }
        if !self.options.verify_tls {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }

        if request.method.eq_ignore_ascii_case("HEAD") {
            easy.nobody(true)?;
        }
        if let Some(body) = &request.body {
            easy.post_fields_copy(body)?;
        }
        easy.custom_request(&request.method)?;

        easy.http_headers(header_list(request)?)?;
        Ok(())
    }
}

/// Headers exactly as the request file has them. curl's own defaults for
/// bodies (`Content-Type`, `Expect`) are blanked unless the file sets them.
fn header_list(request: &RequestSpec) -> Result<List, TransportError> {
    let mut list = List::new();
    for (name, value) in request.headers.iter() {
        list.append(&format!("{}: {}", name, value))?;
    }
    if request.body.is_some() {
        for implicit in ["Content-Type", "Expect"] {
            if !request.headers.contains(implicit) {
                list.append(&format!("{}:", implicit))?;
            }
        }
    }
    Ok(list)
}

impl Transport for CurlTransport {
    fn send(&mut self, request: &RequestSpec) -> Result<Response, TransportError> {
        let mut easy = Easy::new();
        self.configure(&mut easy, request)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let head = parse_head(&header_lines)?;
        tracing::debug!(
            method = %request.method,
            url = %request.url,
            status = head.status_code,
            bytes = body.len(),
            "response received"
        );
        Ok(Response {
            http_version: head.http_version,
            status_code: head.status_code,
            reason_phrase: head.reason_phrase,
            headers: head.headers,
            body,
        })
    }
}
