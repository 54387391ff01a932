use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Status;

const HTTP_VERSION: &str = "HTTP/1.0";

/// Serializes a status line, a `Content-Type` header and the blank line that
/// ends the header block.
pub fn serialize_head(status: Status, content_type: &str) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    buf.extend_from_slice(b"Content-Type: ");
    buf.extend_from_slice(content_type.as_bytes());
    buf.extend_from_slice(b"\r\n");

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes the head of a response. Once this returns the status is committed
/// on the wire.
pub async fn write_head<W>(stream: &mut W, status: Status, content_type: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    stream.write_all(&serialize_head(status, content_type)).await
}
