//! CGI script execution.
//!
//! The script is run with an environment built for this request alone; the
//! server's own environment is never modified. Its standard output is
//! forwarded to the client untouched, so the script is responsible for
//! writing the status line and header block itself.

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::Command;

use crate::handler::copy_in_chunks;
use crate::http::request::Request;
use crate::http::response::Status;

/// Request headers exported to scripts, by exact header name.
pub const HEADER_VARIABLES: [(&str, &str); 6] = [
    ("Host", "HTTP_HOST"),
    ("Accept", "HTTP_ACCEPT"),
    ("Accept-Language", "HTTP_ACCEPT_LANGUAGE"),
    ("Accept-Encoding", "HTTP_ACCEPT_ENCODING"),
    ("Connection", "HTTP_CONNECTION"),
    ("User-Agent", "HTTP_USER_AGENT"),
];

/// Builds the CGI variables for running the script at `path` below
/// `document_root`, for a server listening on `server_port`.
///
/// A request without any headers is rejected with `BadRequest`. Header
/// variables are only present when the matching header was sent.
pub fn cgi_environment<S>(
    request: &Request<S>,
    path: &Path,
    document_root: &Path,
    server_port: u16,
) -> Result<BTreeMap<&'static str, String>, Status> {
    if request.headers.is_empty() {
        return Err(Status::BadRequest);
    }

    let mut env = BTreeMap::new();
    env.insert("DOCUMENT_ROOT", document_root.display().to_string());
    env.insert("QUERY_STRING", request.query.clone());
    env.insert("REMOTE_ADDR", request.host.clone());
    env.insert("REMOTE_PORT", request.port.clone());
    env.insert("REQUEST_METHOD", request.method.clone());
    env.insert("REQUEST_URI", request.uri.clone());
    env.insert("SCRIPT_FILENAME", path.display().to_string());
    env.insert("SERVER_PORT", server_port.to_string());

    for (header, variable) in HEADER_VARIABLES {
        if let Some(value) = request.headers.get(header) {
            env.insert(variable, value.to_string());
        }
    }

    Ok(env)
}

/// Runs the script at `path` and forwards its output as the response.
pub async fn handle_cgi_request<S>(
    request: &mut Request<S>,
    path: &Path,
    document_root: &Path,
    server_port: u16,
) -> Status
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    tracing::debug!(path = %path.display(), "Handling CGI request");

    let env = match cgi_environment(&*request, path, document_root, server_port) {
        Ok(env) => env,
        Err(status) => {
            tracing::debug!(path = %path.display(), "CGI request carried no headers");
            return status;
        }
    };

    let mut cmd = Command::new(path);
    cmd.env_clear();
    cmd.envs(&env);
    if let Some(search_path) = std::env::var_os("PATH") {
        cmd.env("PATH", search_path);
    }
    if let Some(dir) = path.parent() {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::inherit());
    cmd.kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to spawn CGI script");
            return Status::InternalServerError;
        }
    };

    let Some(mut stdout) = child.stdout.take() else {
        tracing::warn!(path = %path.display(), "CGI script has no stdout handle");
        return Status::InternalServerError;
    };

    let copied = copy_in_chunks(&mut stdout, &mut request.stream).await;
    drop(stdout);

    if copied.is_err() {
        if let Err(e) = child.start_kill() {
            tracing::debug!(path = %path.display(), error = %e, "Failed to kill CGI script");
        }
    }

    match child.wait().await {
        Ok(exit) if !exit.success() => {
            tracing::warn!(path = %path.display(), status = %exit, "CGI script exited unsuccessfully");
        }
        Ok(_) => {}
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to wait for CGI script");
        }
    }

    match copied {
        Ok(bytes) => {
            tracing::debug!(path = %path.display(), bytes, "CGI output forwarded");
            Status::Ok
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "CGI response truncated");
            Status::InternalServerError
        }
    }
}
