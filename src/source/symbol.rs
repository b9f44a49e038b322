//! Per-symbol record synthesis.
//!
//! Each tinydns-data symbol maps to a handler that turns every line for one owner
//! name into zero or more [`Synthesis`] events. Handlers do not touch the zone; the
//! aggregator merges their output and the materializer inserts it.

use std::fmt;

use tracing::{debug, warn};

use crate::error::SourceError;
use crate::rr::{RecordType, TimeToLive, Value, ensure_fqdn};
use crate::store::ZoneStore;

use super::line::Fields;

/// The first character of a tinydns-data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// `+fqdn:ip:ttl:timestamp:lo`, an A record.
    Plus,
    /// `=fqdn:ip:ttl:timestamp:lo`, an A record plus its PTR.
    Equal,
    /// `^fqdn:p:ttl:timestamp:lo`, a PTR record.
    Caret,
    /// `.fqdn:ip:x:ttl:timestamp:lo`, NS (and SOA in tinydns) with an optional A.
    Dot,
    /// `&fqdn:ip:x:ttl:timestamp:lo`, NS with an optional A.
    Ampersand,
    /// `@fqdn:ip:x:dist:ttl:timestamp:lo`, MX with an optional A.
    At,
    /// `Cfqdn:p:ttl:timestamp:lo`, a CNAME record.
    Cname,
    /// `'fqdn:s:ttl:timestamp:lo`, a TXT record.
    Quote,
    /// `3fqdn:ip:ttl:timestamp:lo`, an AAAA record.
    Three,
    /// `6fqdn:ip:ttl:timestamp:lo`, an AAAA record plus its PTR.
    Six,
}

impl Symbol {
    /// Map a line's first character to a symbol, or `None` for types we do not import.
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '+' => Symbol::Plus,
            '=' => Symbol::Equal,
            '^' => Symbol::Caret,
            '.' => Symbol::Dot,
            '&' => Symbol::Ampersand,
            '@' => Symbol::At,
            'C' => Symbol::Cname,
            '\'' => Symbol::Quote,
            '3' => Symbol::Three,
            '6' => Symbol::Six,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Plus => '+',
            Symbol::Equal => '=',
            Symbol::Caret => '^',
            Symbol::Dot => '.',
            Symbol::Ampersand => '&',
            Symbol::At => '@',
            Symbol::Cname => 'C',
            Symbol::Quote => '\'',
            Symbol::Three => '3',
            Symbol::Six => '6',
        }
    }

    /// Whether lines with this symbol carry a PTR in a reverse zone.
    pub fn is_reverse(self) -> bool {
        matches!(self, Symbol::Equal | Symbol::Caret | Symbol::Ampersand)
    }

    /// Produce the records implied by `lines`, all of which belong to owner `name`.
    pub fn records<Z>(
        self,
        ctx: &HandlerContext<'_, Z>,
        name: &str,
        lines: &[Fields],
    ) -> Result<Vec<Synthesis>, SourceError>
    where
        Z: ZoneStore + ?Sized,
    {
        match self {
            Symbol::Plus => Ok(ctx.address(name, lines)),
            Symbol::Equal => {
                let mut records = ctx.address(name, lines);
                records.extend(ctx.pointer(self)?);
                Ok(records)
            }
            Symbol::Caret => ctx.pointer(self),
            Symbol::Dot | Symbol::Ampersand => Ok(ctx.nameserver(name, lines)),
            Symbol::At => Ok(ctx.mail_exchanger(name, lines)),
            Symbol::Cname => Ok(ctx.canonical_name(name, lines)),
            Symbol::Quote => Ok(ctx.text(name, lines)),
            Symbol::Three => Ok(ctx.ipv6_address(name, lines)),
            Symbol::Six => {
                let mut records = ctx.ipv6_address(name, lines);
                records.extend(ctx.pointer(self)?);
                Ok(records)
            }
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Values for one record type and owner name, contributed by one group of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesis {
    pub record_type: RecordType,
    pub name: String,
    pub ttl: TimeToLive,
    pub values: Vec<Value>,
}

impl Synthesis {
    pub fn new(
        record_type: RecordType,
        name: impl Into<String>,
        ttl: TimeToLive,
        values: Vec<Value>,
    ) -> Self {
        Self {
            record_type,
            name: name.into(),
            ttl,
            values,
        }
    }
}

/// What every handler needs to know besides its lines.
#[derive(Debug)]
pub struct HandlerContext<'z, Z: ?Sized> {
    pub zone: &'z Z,
    pub default_ttl: TimeToLive,
    pub in_addr: bool,
}

impl<'z, Z> HandlerContext<'z, Z>
where
    Z: ZoneStore + ?Sized,
{
    pub fn new(zone: &'z Z, default_ttl: TimeToLive) -> Self {
        Self {
            zone,
            default_ttl,
            in_addr: false,
        }
    }

    fn address(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let ips: Vec<Value> = lines
            .iter()
            .filter_map(|line| required(line, 1, "address"))
            .filter(|ip| *ip != "0.0.0.0")
            .map(Value::text)
            .collect();

        if ips.is_empty() {
            debug!("no usable addresses for {name:?}");
            return Vec::new();
        }

        let ttl = resolve_ttl(lines, 2, self.default_ttl);
        vec![Synthesis::new(RecordType::A, name, ttl, ips)]
    }

    fn pointer(&self, symbol: Symbol) -> Result<Vec<Synthesis>, SourceError> {
        if !self.in_addr {
            return Ok(Vec::new());
        }
        Err(SourceError::Unimplemented(symbol))
    }

    fn canonical_name(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let Some(target) = lines.first().and_then(|line| required(line, 1, "target")) else {
            return Vec::new();
        };
        if lines.len() > 1 {
            debug!("{name:?} has {} CNAME lines, using the first", lines.len());
        }

        let ttl = resolve_ttl(lines, 2, self.default_ttl);
        vec![Synthesis::new(
            RecordType::CNAME,
            name,
            ttl,
            vec![Value::text(ensure_fqdn(target))],
        )]
    }

    fn nameserver(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let ttl = resolve_ttl(lines, 3, self.default_ttl);
        let mut records = Vec::new();
        let mut values = Vec::new();
        for line in lines {
            let Some(host) = required(line, 2, "nameserver") else {
                continue;
            };
            let ns = self.expand_host(host);
            records.extend(self.glue(line, &ns, ttl));
            values.push(Value::text(ns));
        }

        if !values.is_empty() {
            records.push(Synthesis::new(RecordType::NS, name, ttl, values));
        }
        records
    }

    fn mail_exchanger(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let ttl = resolve_ttl(lines, 4, self.default_ttl);
        let mut records = Vec::new();
        let mut values = Vec::new();
        for line in lines {
            let Some(host) = required(line, 2, "mail exchanger") else {
                continue;
            };
            let mx = self.expand_host(host);
            let preference = optional(line, 3).unwrap_or("0");
            records.extend(self.glue(line, &mx, ttl));
            values.push(Value::exchange(preference, mx));
        }

        if !values.is_empty() {
            records.push(Synthesis::new(RecordType::MX, name, ttl, values));
        }
        records
    }

    fn text(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let values: Vec<Value> = lines
            .iter()
            .filter_map(|line| required(line, 1, "text"))
            .map(|text| Value::text(decode_txt(text)))
            .collect();
        if values.is_empty() {
            return Vec::new();
        }

        let ttl = resolve_ttl(lines, 2, self.default_ttl);
        vec![Synthesis::new(RecordType::TXT, name, ttl, values)]
    }

    fn ipv6_address(&self, name: &str, lines: &[Fields]) -> Vec<Synthesis> {
        if self.in_addr {
            return Vec::new();
        }

        let ips: Vec<Value> = lines
            .iter()
            .filter_map(|line| required(line, 1, "address"))
            .map(|ip| Value::text(expand_ipv6(ip)))
            .collect();
        if ips.is_empty() {
            return Vec::new();
        }

        let ttl = resolve_ttl(lines, 2, self.default_ttl);
        vec![Synthesis::new(RecordType::AAAA, name, ttl, ips)]
    }

    /// Expand the `x` field of NS and MX lines into a fully-qualified host name.
    ///
    /// A bare label becomes `x.ns.<zone>`; anything with a dot is used as written.
    fn expand_host(&self, host: &str) -> String {
        if !host.contains('.') {
            format!("{host}.ns.{}", ensure_fqdn(&self.zone.name().to_ascii()))
        } else {
            ensure_fqdn(host)
        }
    }

    /// The A record implied by the address on an NS or MX line, if it has one.
    fn glue(&self, line: &Fields, host: &str, ttl: TimeToLive) -> Option<Synthesis> {
        let ip = optional(line, 1)?;
        let Some(host_name) = self.zone.hostname_from_fqdn(host) else {
            debug!("{host} is outside of {}, not adding its address", self.zone.name());
            return None;
        };
        Some(Synthesis::new(
            RecordType::A,
            host_name,
            ttl,
            vec![Value::text(ip)],
        ))
    }
}

/// The TTL of a group of lines: the first field at `index` that parses wins.
pub fn resolve_ttl(lines: &[Fields], index: usize, default: TimeToLive) -> TimeToLive {
    lines
        .iter()
        .find_map(|line| line.get(index).and_then(|ttl| ttl.parse().ok()))
        .unwrap_or(default)
}

/// A field that may be absent or empty.
fn optional(line: &Fields, index: usize) -> Option<&str> {
    line.get(index)
        .map(String::as_str)
        .filter(|field| !field.is_empty())
}

/// A field the line is useless without.
fn required<'l>(line: &'l Fields, index: usize, what: &str) -> Option<&'l str> {
    let field = optional(line, index);
    if field.is_none() {
        warn!("skipping line for {:?}, missing {what}: {line:?}", line[0]);
    }
    field
}

/// Insert a colon after every fourth character of a colon-less IPv6 address.
///
/// No `::` compression is applied.
pub fn expand_ipv6(compact: &str) -> String {
    let chars: Vec<char> = compact.chars().collect();
    chars
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(":")
}

/// Decode the backslash escapes tinydns-data uses in TXT data, then escape `;` as `\;`.
///
/// `\ooo` octal and `\xhh` hex escapes produce raw bytes. Each run of consecutive
/// escaped bytes is read as UTF-8 when possible and as Latin-1 otherwise; literal
/// text is kept as written. Unknown escapes are kept as written.
pub fn decode_txt(text: &str) -> String {
    let mut decoded = String::with_capacity(text.len());
    let mut bytes = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_escaped(&mut bytes, &mut decoded);
            decoded.push(c);
            continue;
        }

        let Some(&next) = chars.peek() else {
            flush_escaped(&mut bytes, &mut decoded);
            decoded.push('\\');
            break;
        };

        match next {
            '0'..='7' => {
                let mut value = 0u32;
                for _ in 0..3 {
                    match chars.peek().and_then(|c| c.to_digit(8)) {
                        Some(digit) => {
                            value = value * 8 + digit;
                            chars.next();
                        }
                        None => break,
                    }
                }
                match u8::try_from(value) {
                    Ok(byte) => bytes.push(byte),
                    Err(_) => {
                        flush_escaped(&mut bytes, &mut decoded);
                        decoded.push(char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER));
                    }
                }
            }
            'x' => {
                chars.next();
                let hex: String = chars.clone().take(2).collect();
                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) if hex.len() == 2 => {
                        bytes.push(byte);
                        chars.next();
                        chars.next();
                    }
                    _ => {
                        flush_escaped(&mut bytes, &mut decoded);
                        decoded.push_str("\\x");
                    }
                }
            }
            _ => {
                chars.next();
                match simple_escape(next) {
                    Some(byte) => bytes.push(byte),
                    None => {
                        flush_escaped(&mut bytes, &mut decoded);
                        decoded.push('\\');
                        decoded.push(next);
                    }
                }
            }
        }
    }
    flush_escaped(&mut bytes, &mut decoded);

    decoded.replace(';', "\\;")
}

/// Append a run of escaped bytes, as UTF-8 if it is valid and as Latin-1 otherwise.
fn flush_escaped(bytes: &mut Vec<u8>, out: &mut String) {
    if bytes.is_empty() {
        return;
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => out.push_str(text),
        Err(_) => out.extend(bytes.iter().map(|&b| char::from(b))),
    }
    bytes.clear();
}

fn simple_escape(c: char) -> Option<u8> {
    Some(match c {
        '\\' => b'\\',
        '\'' => b'\'',
        '"' => b'"',
        'a' => 0x07,
        'b' => 0x08,
        'f' => 0x0c,
        'n' => b'\n',
        'r' => b'\r',
        't' => b'\t',
        'v' => 0x0b,
        _ => return None,
    })
}

/// Record types a forward or reverse populate can produce.
pub const SUPPORTED_TYPES: [RecordType; 7] = [
    RecordType::A,
    RecordType::AAAA,
    RecordType::CNAME,
    RecordType::MX,
    RecordType::NS,
    RecordType::PTR,
    RecordType::TXT,
];
