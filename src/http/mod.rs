//! HTTP/1.0 protocol layer.
//!
//! This module covers the wire side of a request cycle: reading the request
//! off the stream and writing status lines and header blocks back.
//!
//! # Architecture
//!
//! - **`request`**: the per-connection request model and its header collection
//! - **`parser`**: parses the request line and header lines from the stream
//! - **`response`**: the closed set of statuses a request cycle can end in
//! - **`writer`**: serializes status lines and header blocks
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Wire format
//!
//! ```text
//! GET /cgi-bin/env.sh?q=foo HTTP/1.0\r\n      ← request line
//! Host: localhost:9898\r\n                    ← header lines
//! \r\n                                        ← terminator
//!
//! HTTP/1.0 200 OK\r\n                         ← status line
//! Content-Type: text/html\r\n
//! \r\n
//! <body bytes>
//! ```
//!
//! CGI responses are the exception: the script writes its own header block
//! and the server forwards it untouched.

pub mod mime;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
