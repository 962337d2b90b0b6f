//! Transport-agnostic HTTP response and its canonical searchable text.

/// A received response. Every transport produces this shape so classification
/// never depends on the HTTP client in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Version token from the status line, e.g. `HTTP/1.1` or `HTTP/2`.
    pub http_version: String,
    pub status_code: u32,
    pub reason_phrase: String,
    /// Headers in the order the transport received them.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    /// Body decoded as UTF-8, invalid sequences replaced.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn status_line(&self) -> String {
        format!(
            "{} {} {}",
            self.http_version, self.status_code, self.reason_phrase
        )
    }

    pub fn header_block(&self) -> String {
        self.headers
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Canonical text patterns are searched in.
///
/// With `body_only` this is exactly the body text; otherwise the status line,
/// the header block, a blank line and the body.
pub fn serialize(response: &Response, body_only: bool) -> String {
    if body_only {
        return response.body_text();
    }
    format!(
        "{}\n{}\n\n{}",
        response.status_line(),
        response.header_block(),
        response.body_text()
    )
}

#[cfg(test)]
pub(crate) fn sample_response(body: &str) -> Response {
    Response {
        http_version: "HTTP/1.1".to_string(),
        status_code: 200,
        reason_phrase: "OK".to_string(),
        headers: vec![
            ("Content-Type".to_string(), "text/plain".to_string()),
            ("X-Request-Id".to_string(), "42".to_string()),
        ],
        body: body.as_bytes().to_vec(),
    }
}
