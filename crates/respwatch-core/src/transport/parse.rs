//! Parse collected response header lines into a status line and headers.

use super::TransportError;

/// Response head: version token, status code, reason phrase, ordered headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub http_version: String,
    pub status_code: u32,
    pub reason_phrase: String,
    pub headers: Vec<(String, String)>,
}

/// Parse header lines as delivered by curl's header callback.
///
/// Redirects and `100 Continue` produce several heads in one transfer; only
/// the last one describes the body we received.
pub(crate) fn parse_head(lines: &[String]) -> Result<ResponseHead, TransportError> {
    let start = lines
        .iter()
        .rposition(|l| l.starts_with("HTTP/"))
        .ok_or(TransportError::NoResponse)?;
    let (version, code, reason) = parse_status_line(&lines[start])?;

    let mut headers = Vec::new();
    for line in &lines[start + 1..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    Ok(ResponseHead {
        http_version: version,
        status_code: code,
        reason_phrase: reason,
        headers,
    })
}

fn parse_status_line(line: &str) -> Result<(String, u32, String), TransportError> {
    let line = line.trim();
    let malformed = || TransportError::MalformedStatus {
        line: line.to_string(),
    };
    let mut parts = line.splitn(3, ' ');
    let version = parts.next().filter(|v| !v.is_empty()).ok_or_else(malformed)?;
    let code = parts
        .next()
        .and_then(|c| c.parse::<u32>().ok())
        .ok_or_else(malformed)?;
    let reason = parts.next().unwrap_or("").trim();
    Ok((version.to_string(), code, reason.to_string()))
}
