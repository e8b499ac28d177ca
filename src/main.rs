use std::path::PathBuf;

use clap::Parser;
use spire::config::{ConcurrencyMode, Config};
use spire::server;

/// Minimal HTTP/1.0 server for static files, directory listings and CGI scripts.
#[derive(Debug, Parser)]
#[command(name = "spire", version)]
struct Cli {
    /// YAML configuration file (defaults to $SPIRE_CONFIG when set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Concurrency mode: serial or forking
    #[arg(short = 'c', long = "concurrency")]
    mode: Option<ConcurrencyMode>,

    /// Path to the mime.types table
    #[arg(short = 'm', long)]
    mime_types: Option<PathBuf>,

    /// Mimetype used when an extension is unknown
    #[arg(short = 'M', long)]
    default_mimetype: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Document root
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::load()?,
        };

        if let Some(mode) = self.mode {
            cfg.server.mode = mode;
        }
        if let Some(path) = self.mime_types {
            cfg.documents.mime_types = path;
        }
        if let Some(mimetype) = self.default_mimetype {
            cfg.documents.default_mimetype = mimetype;
        }
        if let Some(port) = self.port {
            cfg.server.port = port;
        }
        if let Some(root) = self.root {
            cfg.documents.root = root;
        }

        cfg.canonicalize_root()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_max_level(level)
        .init();

    let cfg = cli.into_config()?;

    tokio::select! {
        res = server::listener::run(cfg) => {
            res?;
        }

        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received");
        }
    }

    Ok(())
}
