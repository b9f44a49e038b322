//! Helpers for moving between fully-qualified and zone-relative names.

use std::net::Ipv4Addr;

use hickory_proto::ProtoError;

use super::Name;

/// The suffix of a zone, used to decide whether a textual owner name belongs to it.
///
/// Matching is ASCII case-insensitive and tolerates a missing trailing dot on the
/// candidate name, since tinydns data rarely writes fully-qualified names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSuffix {
    suffix: String,
}

impl ZoneSuffix {
    pub fn new(origin: &Name) -> Self {
        let ascii = origin.to_ascii();
        let suffix = ascii.strip_suffix('.').unwrap_or(&ascii).to_ascii_lowercase();
        Self { suffix }
    }

    /// The zone name, without the trailing dot.
    pub fn as_str(&self) -> &str {
        &self.suffix
    }

    /// Strip the zone from `name`.
    ///
    /// Returns `Some("")` for the zone apex, the leading labels for a name inside
    /// the zone, and `None` for anything else.
    pub fn relative<'n>(&self, name: &'n str) -> Option<&'n str> {
        let name = name.strip_suffix('.').unwrap_or(name);
        if name.eq_ignore_ascii_case(&self.suffix) {
            return Some("");
        }
        self.strict_relative(name)
    }

    /// Like [`ZoneSuffix::relative`], but the zone apex itself does not match.
    pub fn strict_relative<'n>(&self, name: &'n str) -> Option<&'n str> {
        let name = name.strip_suffix('.').unwrap_or(name);
        let n = self.suffix.len();
        if self.suffix.is_empty() {
            return (!name.is_empty()).then_some(name);
        }
        if name.len() <= n + 1 || !name.is_char_boundary(name.len() - n) {
            return None;
        }

        let (head, tail) = name.split_at(name.len() - n);
        if !tail.eq_ignore_ascii_case(&self.suffix) {
            return None;
        }
        head.strip_suffix('.').filter(|head| !head.is_empty())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.relative(name).is_some()
    }
}

/// Extension methods for [`Name`].
pub trait NameExt {
    /// Build an absolute name from a zone-relative one. The empty string is the apex.
    fn from_relative(origin: &Name, relative: &str) -> Result<Name, ProtoError>;

    /// Whether this name sits under `in-addr.arpa.`.
    fn is_in_addr_arpa(&self) -> bool;
}

impl NameExt for Name {
    fn from_relative(origin: &Name, relative: &str) -> Result<Name, ProtoError> {
        if relative.is_empty() {
            return Ok(origin.clone());
        }
        Name::from_ascii(relative)?.append_domain(origin)
    }

    fn is_in_addr_arpa(&self) -> bool {
        let name = self.to_ascii().to_ascii_lowercase();
        name.trim_end_matches('.').ends_with("in-addr.arpa")
    }
}

/// Append a trailing dot to `name` unless it already has one.
pub fn ensure_fqdn(name: &str) -> String {
    if name.ends_with('.') {
        name.to_owned()
    } else {
        format!("{name}.")
    }
}

/// The reverse-pointer form of an IPv4 address, e.g. `5.2.0.192.in-addr.arpa`.
pub fn reverse_pointer(addr: Ipv4Addr) -> String {
    let [a, b, c, d] = addr.octets();
    format!("{d}.{c}.{b}.{a}.in-addr.arpa")
}
