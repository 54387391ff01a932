use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::handler::copy_in_chunks;
use crate::http::mime::MimeTypes;
use crate::http::request::Request;
use crate::http::response::Status;
use crate::http::writer::write_head;

/// Streams the regular file at `path` as the response body.
///
/// The status line and `Content-Type` are written before any of the file is
/// read. A read error after that point leaves a truncated response behind
/// and is reported as `InternalServerError`.
pub async fn handle_file_request<S>(
    request: &mut Request<S>,
    path: &Path,
    mime_types: &MimeTypes,
) -> Status
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::debug!(path = %path.display(), "Handling file request");

    let mut file = match File::open(path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open file");
            return Status::InternalServerError;
        }
    };

    let mime_type = mime_types.lookup(path);

    if let Err(e) = write_head(&mut request.stream, Status::Ok, mime_type).await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to write response head");
        return Status::InternalServerError;
    }

    match copy_in_chunks(&mut file, &mut request.stream).await {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes, mime_type, "File sent");
            Status::Ok
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "File response truncated");
            Status::InternalServerError
        }
    }
}
