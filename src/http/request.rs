use std::path::PathBuf;

use tokio::io::{AsyncRead, AsyncWrite, BufStream};

/// A single `Name: value` request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Request headers in the order they arrived on the wire.
///
/// Lookups are exact and case-sensitive. When a name repeats, the most
/// recently parsed occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<Header>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, header: Header) {
        self.entries.push(header);
    }

    /// Retrieves a header value by its exact name.
    ///
    /// # Example
    ///
    /// ```
    /// # use spidey::http::request::{Header, Headers};
    /// let mut headers = Headers::new();
    /// headers.push(Header::new("Host", "example.com"));
    /// assert_eq!(headers.get("Host"), Some("example.com"));
    /// assert_eq!(headers.get("host"), None);
    /// ```
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|h| h.name == name)
            .map(|h| h.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// One in-flight request, bound to the connection it arrived on.
///
/// The request owns its stream: every read and write of the cycle goes
/// through `stream`, and dropping the request closes the connection.
#[derive(Debug)]
pub struct Request<S> {
    /// Request method token, as sent (e.g. "GET")
    pub method: String,
    /// Request target with the query string removed (e.g. "/index.html")
    pub uri: String,
    /// Everything after the first `?`, or empty
    pub query: String,
    /// Canonical filesystem path, set once it has passed the root check
    pub path: Option<PathBuf>,
    pub headers: Headers,
    /// Peer address
    pub host: String,
    /// Peer port
    pub port: String,
    pub stream: BufStream<S>,
}

impl<S> Request<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Wraps a freshly accepted connection. Method, target and headers stay
    /// empty until the parser fills them in.
    pub fn new(stream: S, host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            method: String::new(),
            uri: String::new(),
            query: String::new(),
            path: None,
            headers: Headers::new(),
            host: host.into(),
            port: port.into(),
            stream: BufStream::new(stream),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }
}
