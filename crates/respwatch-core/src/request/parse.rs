//! Request file parsing.

use super::{build_url, HeaderMap, RequestSpec, DEFAULT_HTTP_VERSION};
use thiserror::Error;

/// Request file could not be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedRequestError {
    /// The request line needs at least a method and a path.
    #[error("malformed request line {line:?}: expected `METHOD PATH [VERSION]`")]
    RequestLine { line: String },
}

pub(crate) fn parse_request(source: &str) -> Result<RequestSpec, MalformedRequestError> {
    // split_inclusive keeps line terminators so the body stays byte-exact.
    let mut lines = source.split_inclusive('\n');

    let first = lines.next().unwrap_or("").trim();
    let tokens: Vec<&str> = first.split_whitespace().collect();
    if tokens.len() < 2 {
        return Err(MalformedRequestError::RequestLine {
            line: first.to_string(),
        });
    }
    let method = tokens[0].to_string();
    let path = tokens[1].to_string();
    let http_version = tokens
        .get(2)
        .map(|v| v.to_string())
        .unwrap_or_else(|| DEFAULT_HTTP_VERSION.to_string());

    let mut headers = HeaderMap::new();
    let mut body = String::new();
    let mut reading_body = false;
    for line in lines {
        if reading_body {
            body.push_str(line);
        } else if line.trim().is_empty() {
            reading_body = true;
        } else if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim(), value.trim());
        }
    }

    let url = build_url(headers.get("Host").unwrap_or(""), &path);

    Ok(RequestSpec {
        method,
        path,
        url,
        headers,
        body: (!body.is_empty()).then(|| body.into_bytes()),
        http_version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_headers_and_body() {
        let src = "PUT /items/7 HTTP/1.0\nHost: api.test:8443\nContent-Type: text/plain\n\nline one\n\nline three\n";
        let spec = parse_request(src).unwrap();
        assert_eq!(spec.method, "PUT");
        assert_eq!(spec.path, "/items/7");
        assert_eq!(spec.http_version, "HTTP/1.0");
        assert_eq!(spec.url, "https://api.test:8443/items/7");
        assert_eq!(spec.headers.get("content-type"), Some("text/plain"));
        assert_eq!(
            spec.body.as_deref(),
            Some(b"line one\n\nline three\n".as_slice())
        );
    }

    #[test]
    fn version_defaults_to_http11() {
        let spec = parse_request("GET /\nHost: h\n").unwrap();
        assert_eq!(spec.http_version, "HTTP/1.1");
        assert!(spec.body.is_none());
    }

    #[test]
    fn absolute_form_target_is_not_used_as_authority() {
        let spec = parse_request("GET http://other.test/x HTTP/1.1\nHost: real.test\n").unwrap();
        assert_eq!(spec.url, "https://real.testhttp://other.test/x");
        let spec = parse_request("GET /x HTTP/1.1\nHost: real.test\n").unwrap();
        assert_eq!(spec.url, "https://real.test/x");
    }

    #[test]
    fn missing_host_gives_empty_authority() {
        let spec = parse_request("GET /x\nAccept: */*\n").unwrap();
        assert_eq!(spec.url, "https:///x");
    }

    #[test]
    fn header_split_at_first_colon_and_trimmed() {
        let spec = parse_request("GET /\nHost:  h.test \nReferer: https://a.test:1/b\nnot a header\n").unwrap();
        assert_eq!(spec.headers.get("Host"), Some("h.test"));
        assert_eq!(spec.headers.get("Referer"), Some("https://a.test:1/b"));
        assert_eq!(spec.headers.len(), 2);
    }

    #[test]
    fn connection_absent_stays_absent() {
        let spec = parse_request("GET /\nHost: h\n").unwrap();
        assert!(!spec.headers.contains("Connection"));
        let spec = parse_request("GET /\nHost: h\nConnection: close\n").unwrap();
        assert_eq!(spec.headers.get("connection"), Some("close"));
    }

    #[test]
    fn crlf_body_is_kept_verbatim() {
        let spec = parse_request("POST /\r\nHost: h\r\n\r\na=1\r\nb=2").unwrap();
        assert_eq!(spec.body.as_deref(), Some(b"a=1\r\nb=2".as_slice()));
    }

    #[test]
    fn short_request_line_is_error() {
        assert!(matches!(
            parse_request("GET\nHost: h\n"),
            Err(MalformedRequestError::RequestLine { .. })
        ));
        assert!(parse_request("").is_err());
        assert!(parse_request("\n\n").is_err());
    }
}
