use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::{TcpListener, TcpStream};
use tracing::info;

use crate::config::{ConcurrencyMode, Config};
use crate::handler;
use crate::http::connection::{self, Connection};
use crate::server::ServerContext;

/// Pause after a failed accept so persistent errors (e.g. EMFILE) do not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

pub async fn run(cfg: Config) -> anyhow::Result<()> {
    let listener = TcpListener::bind((cfg.server.bind.as_str(), cfg.server.port))
        .await
        .with_context(|| format!("failed to listen on {}", cfg.listen_addr()))?;
    serve(listener, cfg).await
}

/// Accepts connections on `listener` forever using the configured mode.
///
/// The configuration is frozen here: the actual bound port is recorded,
/// then the context is shared read-only with every connection.
pub async fn serve(listener: TcpListener, mut cfg: Config) -> anyhow::Result<()> {
    cfg.server.port = listener.local_addr()?.port();
    let ctx = Arc::new(ServerContext::new(cfg));

    info!(
        addr = %listener.local_addr()?,
        mode = %ctx.config.server.mode,
        root = %ctx.config.documents.root.display(),
        "Listening"
    );
    tracing::debug!(
        mime_types = %ctx.config.documents.mime_types.display(),
        default_mimetype = %ctx.config.documents.default_mimetype,
        known_extensions = ctx.mime_types.len(),
        "Mime table loaded"
    );

    match ctx.config.server.mode {
        ConcurrencyMode::Serial => serve_serial(&listener, &ctx).await,
        ConcurrencyMode::Forking => serve_forking(&listener, &ctx).await,
    }
}

/// One request in flight: the next accept waits until the previous
/// response is flushed and its connection closed.
async fn serve_serial(listener: &TcpListener, ctx: &ServerContext) -> anyhow::Result<()> {
    loop {
        if let Some(conn) = accept_or_back_off(listener).await {
            handle_connection(conn, ctx).await;
        }
    }
}

/// Each connection moves into its own task, which owns it until the
/// response is written. Tasks share nothing but the read-only context, and a
/// panicking task takes down only its own connection.
async fn serve_forking(listener: &TcpListener, ctx: &Arc<ServerContext>) -> anyhow::Result<()> {
    loop {
        if let Some(conn) = accept_or_back_off(listener).await {
            let ctx = Arc::clone(ctx);
            tokio::spawn(async move {
                handle_connection(conn, &ctx).await;
            });
        }
    }
}

async fn accept_or_back_off(listener: &TcpListener) -> Option<Connection<TcpStream>> {
    settle_accept(connection::accept(listener).await).await
}

/// Logs a failed accept and waits [`ACCEPT_BACKOFF`] before the caller retries.
async fn settle_accept<T>(accepted: anyhow::Result<T>) -> Option<T> {
    match accepted {
        Ok(conn) => Some(conn),
        Err(e) => {
            tracing::error!(error = %e, "Failed to accept connection");
            tokio::time::sleep(ACCEPT_BACKOFF).await;
            None
        }
    }
}

async fn handle_connection(mut conn: Connection<TcpStream>, ctx: &ServerContext) {
    handler::handle_request(&mut conn, ctx).await;
    if let Err(e) = conn.close().await {
        tracing::debug!(peer = %conn.peer, error = %e, "Error closing connection");
    }
}
