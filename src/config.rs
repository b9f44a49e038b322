//! Configuration for a directory-backed tinydns source.

use std::fs;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use tracing::debug;

use crate::rr::TimeToLive;

/// Configuration for a [`TinyDnsFileSource`](crate::source::TinyDnsFileSource).
///
/// ```toml
/// directory = "/etc/tinydns/root/data"
/// default_ttl = 3600
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    /// Directory holding the tinydns-data files.
    pub directory: Utf8PathBuf,

    /// TTL for records whose lines do not carry one.
    #[serde(default)]
    pub default_ttl: TimeToLive,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SourceConfig {
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            default_ttl: TimeToLive::default(),
        }
    }

    pub fn with_default_ttl(mut self, ttl: TimeToLive) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration from a TOML file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        debug!("loading config from {path}");
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
