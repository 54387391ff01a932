//! Request dispatch
//!
//! This module drives one request cycle from parsing to the final status,
//! classifying the resolved resource and handing it to one of the response
//! strategies.
//!
//! ```text
//!   Parsed ──► PathResolved ──► Classified ──► Responded(Ok)
//!     │             │               │
//!     └─────────────┴───────────────┴────────► Responded(error) ──► error page
//! ```

pub mod browse;
pub mod cgi;
pub mod error;
pub mod file;
pub mod path;

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::Config;
use crate::http::mime::MimeTypes;
use crate::http::parser::parse_request;
use crate::http::request::Request;
use crate::http::response::Status;

/// Chunk size used when streaming file and subprocess output
pub const BUFFER_SIZE: usize = 8192;

/// What a resolved path turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Served as an HTML listing
    Directory,
    /// Regular file, readable and executable: run as a CGI script
    CgiExecutable,
    /// Regular file, readable but not executable: streamed verbatim
    StaticFile,
    /// Anything else (unreadable, sockets, devices, fifos)
    Unreadable,
}

/// Where a request cycle currently stands.
#[derive(Debug)]
pub enum CycleState {
    Parsed,
    PathResolved(PathBuf),
    Classified(Resource, PathBuf),
    Responded(Status),
}

/// Inspects `path` and decides which strategy serves it.
///
/// A missing path is `NotFound`; any other failure to stat it is
/// `InternalServerError`. Readability and executability are checked for
/// the server's effective identity.
pub async fn classify(path: &Path) -> Result<Resource, Status> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(Status::NotFound),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to stat resource");
            return Err(Status::InternalServerError);
        }
    };

    if metadata.is_dir() {
        return Ok(Resource::Directory);
    }

    if metadata.is_file() && access(path, libc::R_OK) {
        if access(path, libc::X_OK) {
            return Ok(Resource::CgiExecutable);
        }
        return Ok(Resource::StaticFile);
    }

    Ok(Resource::Unreadable)
}

fn access(path: &Path, mode: libc::c_int) -> bool {
    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    unsafe { libc::access(c_path.as_ptr(), mode) == 0 }
}

/// Copies `reader` into `writer` in `BUFFER_SIZE` chunks until end of input.
///
/// Returns the number of bytes copied. An error leaves whatever was already
/// written in place.
pub async fn copy_in_chunks<R, W>(reader: &mut R, writer: &mut W) -> std::io::Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    let mut total = 0u64;

    loop {
        buffer.clear();
        let n = reader.read_buf(&mut buffer).await?;
        if n == 0 {
            return Ok(total);
        }

        writer.write_all(&buffer).await?;
        total += n as u64;
    }
}

/// Serves requests against the configured document root.
#[derive(Debug, Clone)]
pub struct RequestHandler {
    config: Config,
    document_root: PathBuf,
    mime_types: MimeTypes,
}

impl RequestHandler {
    /// The configured root is canonicalized once here. If that fails the
    /// root is kept as configured and every request resolves to `BadRequest`.
    pub fn new(config: Config, mime_types: MimeTypes) -> Self {
        let document_root = match std::fs::canonicalize(&config.root) {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(root = %config.root.display(), error = %e, "Failed to resolve document root");
                config.root.clone()
            }
        };

        Self {
            config,
            document_root,
            mime_types,
        }
    }

    /// Absolute document root, as exported to CGI scripts.
    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    /// Runs one complete request cycle and returns its final status.
    ///
    /// Any status other than `Ok` is rendered as an error page before this
    /// returns. The request, and with it the connection, is closed on return.
    pub async fn handle<S>(&self, mut request: Request<S>) -> Status
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let mut state = match parse_request(&mut request).await {
            Ok(()) => CycleState::Parsed,
            Err(e) => {
                tracing::debug!(error = %e, "Failed to parse request");
                CycleState::Responded(Status::BadRequest)
            }
        };

        loop {
            state = match state {
                CycleState::Parsed => {
                    match path::resolve_path(&self.document_root, &request.uri).await {
                        Ok(path) => {
                            tracing::debug!(path = %path.display(), "Resolved request path");
                            request.path = Some(path.clone());
                            CycleState::PathResolved(path)
                        }
                        Err(e) => {
                            tracing::debug!(uri = %request.uri, error = %e, "Failed to resolve request path");
                            CycleState::Responded(Status::BadRequest)
                        }
                    }
                }

                CycleState::PathResolved(path) => match classify(&path).await {
                    Ok(Resource::Unreadable) => CycleState::Responded(Status::NotFound),
                    Ok(resource) => CycleState::Classified(resource, path),
                    Err(status) => CycleState::Responded(status),
                },

                CycleState::Classified(resource, path) => {
                    let status = match resource {
                        Resource::Directory => browse::handle_browse_request(&mut request, &path).await,
                        Resource::CgiExecutable => {
                            let port = self.config.port;
                            cgi::handle_cgi_request(&mut request, &path, &self.document_root, port).await
                        }
                        Resource::StaticFile => {
                            file::handle_file_request(&mut request, &path, &self.mime_types).await
                        }
                        Resource::Unreadable => Status::NotFound,
                    };
                    CycleState::Responded(status)
                }

                CycleState::Responded(status) => {
                    if !status.is_ok() {
                        error::handle_error(&mut request, status).await;
                    }

                    tracing::info!(
                        method = %request.method,
                        uri = %request.uri,
                        status = status.as_u16(),
                        "HTTP request status: {}",
                        status
                    );

                    finish(&mut request).await;
                    return status;
                }
            };
        }
    }
}

async fn finish<S>(request: &mut Request<S>)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if let Err(e) = request.stream.flush().await {
        tracing::debug!(error = %e, "Failed to flush response");
        return;
    }
    if let Err(e) = request.stream.shutdown().await {
        tracing::debug!(error = %e, "Failed to close connection");
    }
}
