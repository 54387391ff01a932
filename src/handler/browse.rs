//! HTML directory listings.

use std::path::Path;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::request::Request;
use crate::http::response::Status;
use crate::http::writer::write_head;

/// Lists the directory at `path` as an HTML page of links.
pub async fn handle_browse_request<S>(request: &mut Request<S>, path: &Path) -> Status
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::debug!(path = %path.display(), "Handling directory request");

    let entries = match list_entries(path).await {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to scan directory");
            return Status::InternalServerError;
        }
    };

    let body = render_listing(&request.uri, &entries);

    let written = async {
        write_head(&mut request.stream, Status::Ok, "text/html").await?;
        request.stream.write_all(body.as_bytes()).await
    };
    if let Err(e) = written.await {
        tracing::warn!(path = %path.display(), error = %e, "Failed to write directory listing");
        return Status::InternalServerError;
    }

    Status::Ok
}

/// Entry names of `path` in byte-wise lexicographic order.
///
/// `.` is left out and `..` is always listed, so a listing always links
/// back to its parent.
pub async fn list_entries(path: &Path) -> std::io::Result<Vec<String>> {
    let mut dir = tokio::fs::read_dir(path).await?;
    let mut names = vec!["..".to_string()];

    while let Some(entry) = dir.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }

    names.sort();
    Ok(names)
}

/// Renders the listing body for a directory requested as `uri`.
pub fn render_listing(uri: &str, entries: &[String]) -> String {
    let mut html = String::from("<ul>\n");
    for name in entries {
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a></li>\n",
            escape_html(&link_target(uri, name)),
            escape_html(name)
        ));
    }
    html.push_str("</ul>\n");
    html
}

/// Link for `name` inside the directory at `uri`. At the root the name is
/// used alone so the link does not start with `//`.
pub fn link_target(uri: &str, name: &str) -> String {
    if uri == "/" {
        name.to_string()
    } else {
        format!("{uri}/{name}")
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
