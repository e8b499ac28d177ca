//! Listening socket and the concurrency drivers.

pub mod listener;

use crate::config::Config;
use crate::http::mime::MimeTable;

/// Read-only state every request sees: the frozen configuration and the
/// mime table loaded from it.
#[derive(Debug, Clone)]
pub struct ServerContext {
    pub config: Config,
    pub mime_types: MimeTable,
}

impl ServerContext {
    pub fn new(config: Config) -> Self {
        let mime_types = MimeTable::load(
            &config.documents.mime_types,
            config.documents.default_mimetype.clone(),
        );
        Self { config, mime_types }
    }

    pub fn with_mime_table(config: Config, mime_types: MimeTable) -> Self {
        Self { config, mime_types }
    }
}
