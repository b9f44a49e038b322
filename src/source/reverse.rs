//! PTR records for `in-addr.arpa.` zones.
//!
//! Reverse zones do not go through symbol grouping. Every `=`, `^` and `&` line is
//! looked at on its own, and its PTR owner is either written out already or derived
//! from the line's IPv4 address.

use std::net::Ipv4Addr;

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::rr::{
    RecordDescriptor, RecordSet, RecordType, TimeToLive, Value, ZoneSuffix, ensure_fqdn,
    reverse_pointer,
};
use crate::store::{ZoneError, ZoneStore};

use super::line::RawLine;
use super::symbol::Symbol;

/// A PTR record derived from one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer {
    /// Owner, relative to the reverse zone.
    pub name: String,
    pub ttl: TimeToLive,
    /// Fully-qualified target host name.
    pub target: String,
}

impl Pointer {
    /// Derive the PTR record a line implies for the zone described by `suffix`.
    ///
    /// Returns `None` for lines that do not carry a PTR, or whose pointer lies
    /// outside the zone.
    pub fn from_line(line: &RawLine, suffix: &ZoneSuffix, default_ttl: TimeToLive) -> Option<Self> {
        if !Symbol::from_char(line.symbol()).is_some_and(Symbol::is_reverse) {
            return None;
        }

        let fields = line.fields();
        let owner = fields[0].as_str();
        let Some(second) = fields.get(1).map(String::as_str) else {
            warn!("skipping {owner:?}, line has no second field");
            return None;
        };

        let (reverse, target) = if is_reverse_name(owner) {
            (owner.to_owned(), second)
        } else {
            let Ok(addr) = second.parse::<Ipv4Addr>() else {
                warn!("skipping {owner:?}, {second:?} is not an IPv4 address");
                return None;
            };
            (reverse_pointer(addr), owner)
        };

        let Some(name) = suffix.strict_relative(&reverse) else {
            debug!("{reverse} is not in {}", suffix.as_str());
            return None;
        };

        let ttl = fields
            .get(2)
            .and_then(|ttl| ttl.parse().ok())
            .unwrap_or(default_ttl);

        Some(Pointer {
            name: name.to_owned(),
            ttl,
            target: ensure_fqdn(target),
        })
    }

    pub fn descriptor(&self) -> RecordDescriptor {
        RecordDescriptor::new(RecordType::PTR, self.ttl, vec![Value::text(&self.target)])
    }
}

fn is_reverse_name(name: &str) -> bool {
    let name = name.strip_suffix('.').unwrap_or(name);
    name.len() >= "in-addr.arpa".len()
        && name.is_char_boundary(name.len() - "in-addr.arpa".len())
        && name[name.len() - "in-addr.arpa".len()..].eq_ignore_ascii_case("in-addr.arpa")
}

/// Insert a PTR record for every matching line. Duplicate PTRs are logged and skipped.
pub fn populate<'l, Z, I>(
    zone: &mut Z,
    lines: I,
    default_ttl: TimeToLive,
    lenient: bool,
) -> Result<usize, SourceError>
where
    Z: ZoneStore + ?Sized,
    I: IntoIterator<Item = &'l str>,
{
    let suffix = ZoneSuffix::new(zone.name());
    let mut added = 0;

    for line in lines {
        let Some(line) = RawLine::parse(line) else {
            continue;
        };
        let Some(pointer) = Pointer::from_line(&line, &suffix, default_ttl) else {
            continue;
        };

        let descriptor = pointer.descriptor();
        let rrset =
            RecordSet::from_descriptor(zone.name(), &pointer.name, &descriptor, lenient)?;
        let Some(rrset) = rrset else {
            continue;
        };

        match zone.add_record(rrset, lenient) {
            Ok(()) => added += 1,
            Err(ZoneError::Duplicate { name, .. }) => {
                warn!("duplicate PTR record for {name}, skipping");
            }
            Err(error) => return Err(error.into()),
        }
    }

    Ok(added)
}
