use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::handler::RequestHandler;
use crate::http::request::Request;

pub async fn run(cfg: &Config, handler: &RequestHandler) -> anyhow::Result<()> {
    let listener = TcpListener::bind(cfg.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", cfg.listen_addr()))?;
    info!(root = %cfg.root.display(), "Listening on {}", cfg.listen_addr());

    serve(listener, handler).await
}

/// Accepts connections on `listener` and handles them one at a time: the
/// next connection is not accepted until the current cycle has finished.
pub async fn serve(listener: TcpListener, handler: &RequestHandler) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "Unable to accept connection");
                continue;
            }
        };
        info!("Accepted connection from {}", peer);

        let request = Request::new(socket, peer.ip().to_string(), peer.port().to_string());
        handler.handle(request).await;
    }
}
