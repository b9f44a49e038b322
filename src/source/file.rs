//! Reading tinydns-data from a directory of files.

use std::fs;
use std::sync::OnceLock;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, trace};

use crate::error::SourceError;

use super::LineSource;

/// Every line of every visible file in a directory.
///
/// tinydns data for a zone can live in any file, so the whole directory is read.
/// Files whose name starts with `.` are ignored, as are empty lines. The result is
/// cached after the first successful read.
#[derive(Debug)]
pub struct DirectoryLines {
    directory: Utf8PathBuf,
    cache: OnceLock<Vec<String>>,
}

impl DirectoryLines {
    pub fn new(directory: impl Into<Utf8PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            cache: OnceLock::new(),
        }
    }

    pub fn directory(&self) -> &Utf8Path {
        &self.directory
    }

    fn read(&self) -> Result<Vec<String>, SourceError> {
        let entries = self
            .directory
            .read_dir_utf8()
            .map_err(|error| SourceError::io(&self.directory, error))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|error| SourceError::io(&self.directory, error))?;
            if entry.file_name().starts_with('.') {
                trace!("ignoring hidden file {}", entry.path());
                continue;
            }
            let file_type = entry
                .file_type()
                .map_err(|error| SourceError::io(entry.path(), error))?;
            if !file_type.is_file() {
                debug!("ignoring {}, not a file", entry.path());
                continue;
            }
            paths.push(entry.into_path());
        }
        paths.sort();

        let mut lines = Vec::new();
        for path in paths {
            let data = fs::read_to_string(&path).map_err(|error| SourceError::io(&path, error))?;
            let before = lines.len();
            lines.extend(
                data.split('\n')
                    .filter(|line| !line.is_empty())
                    .map(str::to_owned),
            );
            debug!("read {} lines from {path}", lines.len() - before);
        }

        Ok(lines)
    }
}

impl LineSource for DirectoryLines {
    fn lines(&self) -> Result<&[String], SourceError> {
        if let Some(lines) = self.cache.get() {
            return Ok(lines);
        }
        let lines = self.read()?;
        Ok(self.cache.get_or_init(|| lines))
    }
}
