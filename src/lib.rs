//! Import legacy tinydns-data (djbdns) records into a DNS zone.

pub mod config;
pub mod error;
pub mod rr;
pub mod source;
pub mod store;

pub use self::config::{ConfigError, SourceConfig};
pub use self::error::SourceError;
pub use self::source::{LineSource, TinyDnsFileSource, TinyDnsSource};
pub use self::store::{ZoneError, ZoneStore};
