use std::io;

use camino::Utf8PathBuf;

use crate::config::ConfigError;
use crate::rr::RecordError;
use crate::source::Symbol;
use crate::store::ZoneError;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("reading {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path} is not valid UTF-8")]
    NonUtf8Path { path: std::path::PathBuf },

    #[error("zone rejected record: {0}")]
    Zone(#[from] ZoneError),

    #[error("invalid record data: {0}")]
    Record(#[from] RecordError),

    #[error("'{0}' lines are not implemented here")]
    Unimplemented(Symbol),

    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
}

impl SourceError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }
}
