//! Minimal HTTP/1.1 request parsing and response encoding.
//!
//! One request is served per connection; every response carries
//! `Connection: close`.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::HttpError;
use crate::constants::{MAX_REQUEST_BODY_BYTES, MAX_REQUEST_HEAD_BYTES};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    /// Percent-decoded path, without the query string.
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Request {
    /// First value of a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses a request line such as `GET /api/torrents?q=x HTTP/1.1`.
    pub fn parse_request_line(line: &str) -> Result<Self, HttpError> {
        let mut parts = line.split_whitespace();
        let (Some(method), Some(target), Some(version), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(HttpError::Malformed("request line"));
        };

        if !version.starts_with("HTTP/1.") {
            return Err(HttpError::Malformed("http version"));
        }
        if !target.starts_with('/') {
            return Err(HttpError::Malformed("request target"));
        }

        let (path, query) = target.split_once('?').unwrap_or((target, ""));

        Ok(Self {
            method: method.to_ascii_uppercase(),
            path: percent_decode(path, false),
            query: parse_query_string(query),
        })
    }
}

/// Reads a request head and discards any body.
pub async fn read_request<R>(reader: &mut R) -> Result<Request, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let mut head_len = 0;

    let request_line = read_line(reader, &mut head_len)
        .await?
        .ok_or(HttpError::ConnectionClosed)?;
    let request = Request::parse_request_line(&request_line)?;

    let mut content_length = 0usize;
    loop {
        let line = read_line(reader, &mut head_len)
            .await?
            .ok_or(HttpError::Malformed("unterminated headers"))?;

        if line.is_empty() {
            break;
        }

        let (name, value) = line
            .split_once(':')
            .ok_or(HttpError::Malformed("header"))?;

        if name.trim().eq_ignore_ascii_case("content-length") {
            content_length = value
                .trim()
                .parse()
                .map_err(|_| HttpError::Malformed("content-length"))?;
        }
    }

    if content_length > MAX_REQUEST_BODY_BYTES {
        return Err(HttpError::BodyTooLarge(MAX_REQUEST_BODY_BYTES));
    }
    if content_length > 0 {
        let mut body = (&mut *reader).take(content_length as u64);
        tokio::io::copy(&mut body, &mut tokio::io::sink()).await?;
    }

    Ok(request)
}

/// Reads one CRLF- or LF-terminated line. Returns `None` at end of input.
async fn read_line<R>(
    reader: &mut R,
    head_len: &mut usize,
) -> Result<Option<String>, HttpError>
where
    R: AsyncBufRead + Unpin,
{
    let remaining = MAX_REQUEST_HEAD_BYTES.saturating_sub(*head_len) + 1;
    let mut buf = Vec::new();
    let n = (&mut *reader)
        .take(remaining as u64)
        .read_until(b'\n', &mut buf)
        .await?;

    if n == 0 {
        return Ok(None);
    }

    *head_len += n;
    if *head_len > MAX_REQUEST_HEAD_BYTES {
        return Err(HttpError::HeadTooLarge(MAX_REQUEST_HEAD_BYTES));
    }
    if buf.last() != Some(&b'\n') {
        return Err(HttpError::Malformed("truncated line"));
    }

    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }

    String::from_utf8(buf)
        .map(Some)
        .map_err(|_| HttpError::Malformed("non-utf8 header"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: vec![("Content-Type", content_type.to_string())],
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, "application/json", body)
    }

    pub fn xml(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, "application/xml", body)
    }

    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, "text/html; charset=utf-8", body)
    }

    pub fn text(status: u16, body: impl Into<String>) -> Self {
        let mut body = body.into();
        body.push('\n');
        Self::new(status, "text/plain; charset=utf-8", body)
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 page not found")
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Serializes the status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!("HTTP/1.1 {} {}\r\n", self.status, reason_phrase(self.status));
        for (name, value) in &self.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str(&format!("Content-Length: {}\r\n", self.body.len()));
        head.push_str("Connection: close\r\n\r\n");

        let mut out = head.into_bytes();
        out.extend_from_slice(&self.body);
        out
    }

    pub async fn write_to<W>(&self, writer: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        writer.write_all(&self.to_bytes()).await?;
        writer.flush().await
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        431 => "Request Header Fields Too Large",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

fn parse_query_string(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            (percent_decode(key, true), percent_decode(value, true))
        })
        .collect()
}

/// Decodes `%XX` escapes, and `+` as a space when `plus_as_space` is set.
///
/// Invalid escapes are kept literally; invalid UTF-8 is replaced.
pub fn percent_decode(s: &str, plus_as_space: bool) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'%' => match bytes.get(i + 1..i + 3).and_then(|h| hex_pair(h[0], h[1])) {
                Some(byte) => {
                    out.push(byte);
                    i += 3;
                }
                None => {
                    out.push(b'%');
                    i += 1;
                }
            },
            b'+' if plus_as_space => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

fn hex_pair(hi: u8, lo: u8) -> Option<u8> {
    let hi = (hi as char).to_digit(16)?;
    let lo = (lo as char).to_digit(16)?;
    Some((hi * 16 + lo) as u8)
}
