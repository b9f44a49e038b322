//! Populating zones from tinydns-data lines.
//!
//! The forward pipeline tokenizes lines, groups them by symbol and owner, asks each
//! [`Symbol`] for the records it implies, merges those by record type and owner, and
//! finally inserts one record set per group. Zones under `in-addr.arpa.` use the
//! [`reverse`] path instead.

use std::collections::BTreeSet;
use std::path::Path;

use camino::Utf8PathBuf;
use tracing::{debug, info};

use crate::config::SourceConfig;
use crate::error::SourceError;
use crate::rr::{NameExt as _, RecordType, TimeToLive};
use crate::store::ZoneStore;

pub mod aggregate;
pub mod file;
pub mod line;
pub mod reverse;
pub mod symbol;

pub use self::aggregate::TypeGroups;
pub use self::file::DirectoryLines;
pub use self::line::{Fields, RawLine, SymbolGroups};
pub use self::reverse::Pointer;
pub use self::symbol::{
    HandlerContext, SUPPORTED_TYPES, Symbol, Synthesis, decode_txt, expand_ipv6, resolve_ttl,
};

/// Supplies raw tinydns-data lines.
///
/// Lines from one file keep their order. No order is promised across files.
pub trait LineSource {
    fn lines(&self) -> Result<&[String], SourceError>;
}

impl LineSource for Vec<String> {
    fn lines(&self) -> Result<&[String], SourceError> {
        Ok(self)
    }
}

impl<L: LineSource + ?Sized> LineSource for &L {
    fn lines(&self) -> Result<&[String], SourceError> {
        (**self).lines()
    }
}

/// A tinydns source reading every file in one directory.
pub type TinyDnsFileSource = TinyDnsSource<DirectoryLines>;

/// Imports tinydns-data lines into zones.
#[derive(Debug)]
pub struct TinyDnsSource<L> {
    id: String,
    lines: L,
    default_ttl: TimeToLive,
}

impl<L> TinyDnsSource<L> {
    pub fn new(id: impl Into<String>, lines: L) -> Self {
        Self {
            id: id.into(),
            lines,
            default_ttl: TimeToLive::default(),
        }
    }

    pub fn with_default_ttl(mut self, ttl: TimeToLive) -> Self {
        self.default_ttl = ttl;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn default_ttl(&self) -> TimeToLive {
        self.default_ttl
    }

    pub fn line_source(&self) -> &L {
        &self.lines
    }

    /// Record types this source can produce.
    pub fn supports() -> &'static [RecordType] {
        &SUPPORTED_TYPES
    }
}

impl TinyDnsFileSource {
    pub fn from_config(id: impl Into<String>, config: &SourceConfig) -> Self {
        TinyDnsSource::new(id, DirectoryLines::new(config.directory.clone()))
            .with_default_ttl(config.default_ttl)
    }

    pub fn from_directory(id: impl Into<String>, directory: &Path) -> Result<Self, SourceError> {
        let directory = Utf8PathBuf::try_from(directory.to_path_buf()).map_err(|error| {
            SourceError::NonUtf8Path {
                path: error.into_path_buf(),
            }
        })?;
        Ok(TinyDnsSource::new(id, DirectoryLines::new(directory)))
    }
}

impl<L: LineSource> TinyDnsSource<L> {
    /// Add every record the source holds for `zone`.
    ///
    /// Returns the number of record sets inserted. With `lenient`, invalid values
    /// are dropped instead of failing the import, and the zone relaxes its own
    /// consistency checks.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(source = %self.id, zone = %zone.name())
    )]
    pub fn populate<Z>(&self, zone: &mut Z, lenient: bool) -> Result<usize, SourceError>
    where
        Z: ZoneStore + ?Sized,
    {
        debug!("populate: name={}, lenient={lenient}", zone.name());

        let added = if zone.name().is_in_addr_arpa() {
            self.populate_in_addr_arpa(zone, lenient)?
        } else {
            self.populate_normal(zone, lenient)?
        };

        info!("populate: found {added} records");
        Ok(added)
    }

    fn populate_normal<Z>(&self, zone: &mut Z, lenient: bool) -> Result<usize, SourceError>
    where
        Z: ZoneStore + ?Sized,
    {
        let lines = self.lines.lines()?;
        let symbols = SymbolGroups::collect(&*zone, lines.iter().map(String::as_str));

        let ctx = HandlerContext::new(&*zone, self.default_ttl);
        let mut types = TypeGroups::default();
        let mut unsupported = BTreeSet::new();
        for (c, name, group) in symbols.iter() {
            let Some(symbol) = Symbol::from_char(c) else {
                if unsupported.insert(c) {
                    info!("skipping type {c:?}, not supported");
                }
                continue;
            };
            types.extend(symbol.records(&ctx, name, group)?);
        }

        types.materialize(zone, lenient)
    }

    fn populate_in_addr_arpa<Z>(&self, zone: &mut Z, lenient: bool) -> Result<usize, SourceError>
    where
        Z: ZoneStore + ?Sized,
    {
        let lines = self.lines.lines()?;
        reverse::populate(zone, lines.iter().map(String::as_str), self.default_ttl, lenient)
    }
}
