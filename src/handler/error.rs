use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::request::Request;
use crate::http::response::Status;
use crate::http::writer::serialize_head;

/// Renders the error page body for `status`.
pub fn error_page(status: Status) -> String {
    format!(
        "<html>\n<head><title>{status}</title></head>\n<body>\n<h1>{status}</h1>\n<p>{}</p>\n</body>\n</html>\n",
        status.reason_phrase()
    )
}

/// Writes the error page for `status` to `stream` and hands `status` back.
///
/// Anything already written to the stream stays there; a late failure
/// therefore produces a second status line after a partial response.
pub async fn render_error<W>(stream: &mut W, status: Status) -> Status
where
    W: AsyncWrite + Unpin,
{
    let mut response = serialize_head(status, "text/html");
    response.extend_from_slice(error_page(status).as_bytes());

    if let Err(e) = stream.write_all(&response).await {
        tracing::debug!(status = status.as_u16(), error = %e, "Failed to write error page");
    }

    status
}

pub async fn handle_error<S>(request: &mut Request<S>, status: Status) -> Status
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    render_error(&mut request.stream, status).await
}
