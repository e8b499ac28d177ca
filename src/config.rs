use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use serde::Deserialize;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "SPIRE_CONFIG";

/// How accepted connections are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConcurrencyMode {
    /// One request at a time; the next accept waits for the previous response.
    #[default]
    #[serde(alias = "single")]
    Serial,
    /// Every connection is handed to its own task that owns it exclusively.
    Forking,
}

impl FromStr for ConcurrencyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "serial" | "single" => Ok(ConcurrencyMode::Serial),
            "forking" => Ok(ConcurrencyMode::Forking),
            other => Err(format!("unknown concurrency mode `{other}` (expected serial or forking)")),
        }
    }
}

impl fmt::Display for ConcurrencyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyMode::Serial => f.write_str("serial"),
            ConcurrencyMode::Forking => f.write_str("forking"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    pub mode: ConcurrencyMode,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 9898,
            mode: ConcurrencyMode::Serial,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Directory below which everything served must live.
    pub root: PathBuf,
    /// Path of the `mime.types` table.
    pub mime_types: PathBuf,
    pub default_mimetype: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("www"),
            mime_types: PathBuf::from("/etc/mime.types"),
            default_mimetype: "text/plain".to_string(),
        }
    }
}

/// Process-wide settings, frozen before the listener starts accepting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub documents: DocumentConfig,
}

impl Config {
    /// Loads the file named by `SPIRE_CONFIG`, or the defaults when unset.
    pub fn load() -> anyhow::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Replaces the document root with its canonical absolute path.
    ///
    /// The sandbox check compares resolved paths against this exact string,
    /// so it must run once before any request is served.
    pub fn canonicalize_root(mut self) -> anyhow::Result<Self> {
        let root = std::fs::canonicalize(&self.documents.root).with_context(|| {
            format!("document root {} is not accessible", self.documents.root.display())
        })?;
        self.documents.root = root;
        Ok(self)
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.bind, self.server.port)
    }
}
