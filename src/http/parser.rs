use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite};

use crate::http::request::{Header, Request};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("empty request line")]
    EmptyRequestLine,
    #[error("request line has no target")]
    MissingUri,
    #[error("malformed header line: {0:?}")]
    MalformedHeader(String),
    #[error("failed to read request: {0}")]
    Io(#[from] std::io::Error),
}

/// Method, target and query extracted from a request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: String,
    pub uri: String,
    pub query: String,
}

/// Parses `METHOD URI[?QUERY] VERSION`.
///
/// The version token is not inspected; only the method and target are
/// required. The target is split at the first `?`.
pub fn parse_request_line(line: &str) -> Result<RequestLine, ParseError> {
    let mut parts = line.split_whitespace();

    let method = parts.next().ok_or(ParseError::EmptyRequestLine)?;
    let target = parts.next().ok_or(ParseError::MissingUri)?;

    let (uri, query) = target.split_once('?').unwrap_or((target, ""));

    Ok(RequestLine {
        method: method.to_string(),
        uri: uri.to_string(),
        query: query.to_string(),
    })
}

/// Parses a single `Name: value` line. Leading whitespace is dropped from
/// both the line and the value.
pub fn parse_header_line(line: &str) -> Result<Header, ParseError> {
    let line = chomp(line).trim_start();

    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| ParseError::MalformedHeader(line.to_string()))?;

    Ok(Header::new(name, value.trim_start()))
}

/// Reads the request line and header block from the request's stream and
/// records them on `request`.
///
/// Header parsing stops at the first empty line or at end of stream. No
/// limit is placed on the number or size of headers.
pub async fn parse_request<S>(request: &mut Request<S>) -> Result<(), ParseError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut line = String::new();
    request.stream.read_line(&mut line).await?;

    let RequestLine { method, uri, query } = parse_request_line(&line)?;
    request.method = method;
    request.uri = uri;
    request.query = query;

    tracing::debug!(
        method = %request.method,
        uri = %request.uri,
        query = %request.query,
        "Parsed request line"
    );

    loop {
        line.clear();
        let n = request.stream.read_line(&mut line).await?;
        if n == 0 || chomp(&line).is_empty() {
            break;
        }

        let header = parse_header_line(&line)?;
        tracing::debug!(name = %header.name, value = %header.value, "Parsed header");
        request.headers.push(header);
    }

    Ok(())
}

fn chomp(line: &str) -> &str {
    line.trim_end_matches(['\r', '\n'])
}
