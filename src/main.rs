use anyhow::Context;
use spidey::config::Config;
use spidey::handler::RequestHandler;
use spidey::http::mime::MimeTypes;
use spidey::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = Config::load().context("failed to load configuration")?;

    let mime_types = match MimeTypes::load(&cfg.mime_types_path, &cfg.default_mime_type).await {
        Ok(table) => table,
        Err(e) => {
            tracing::warn!(
                path = %cfg.mime_types_path.display(),
                error = %e,
                "MIME table unavailable, serving everything as the default type"
            );
            MimeTypes::empty(&cfg.default_mime_type)
        }
    };

    let handler = RequestHandler::new(cfg.clone(), mime_types);

    tokio::select! {
        res = server::listener::run(&cfg, &handler) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
