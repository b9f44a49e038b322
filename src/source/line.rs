//! Tokenizing tinydns-data lines and grouping them by symbol and owner.

use indexmap::IndexMap;
use tracing::info;

use crate::store::ZoneStore;

/// The colon-separated fields of one line, trimmed. Field 0 is the owner name.
pub type Fields = Vec<String>;

/// A single tinydns-data line, split into its symbol and fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine {
    symbol: char,
    fields: Fields,
}

impl RawLine {
    /// Split a line into its symbol and fields.
    ///
    /// Everything after the first `#` is a comment. Escaped colons are not
    /// recognised: `::` yields an empty field like any other pair of colons.
    /// Returns `None` for blank lines.
    pub fn parse(line: &str) -> Option<Self> {
        let mut chars = line.chars();
        let symbol = chars.next().filter(|c| !c.is_whitespace())?;
        let rest = chars.as_str();
        let data = rest.split_once('#').map_or(rest, |(data, _)| data);

        let fields = data.split(':').map(|field| field.trim().to_owned()).collect();
        Some(RawLine { symbol, fields })
    }

    pub fn symbol(&self) -> char {
        self.symbol
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn into_fields(self) -> Fields {
        self.fields
    }
}

/// Lines grouped first by symbol and then by zone-relative owner name.
///
/// Every level keeps first-insertion order, and the lines in a group keep
/// the order they were read in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolGroups {
    groups: IndexMap<char, IndexMap<String, Vec<Fields>>>,
}

impl SymbolGroups {
    /// Tokenize `lines` and group those whose owner belongs to `zone`.
    pub fn collect<'l, Z, I>(zone: &Z, lines: I) -> Self
    where
        Z: ZoneStore + ?Sized,
        I: IntoIterator<Item = &'l str>,
    {
        let mut groups = SymbolGroups::default();
        for line in lines {
            let Some(line) = RawLine::parse(line) else {
                continue;
            };

            let owner = &line.fields()[0];
            let Some(name) = zone.hostname_from_fqdn(owner) else {
                info!("skipping name {owner}, not a match for {}", zone.name());
                continue;
            };

            let symbol = line.symbol();
            let mut fields = line.into_fields();
            fields[0] = name.clone();
            groups.push(symbol, name, fields);
        }
        groups
    }

    pub fn push(&mut self, symbol: char, name: String, fields: Fields) {
        self.groups
            .entry(symbol)
            .or_default()
            .entry(name)
            .or_default()
            .push(fields);
    }

    /// Iterate over `(symbol, owner, lines)` groups.
    pub fn iter(&self) -> impl Iterator<Item = (char, &str, &[Fields])> {
        self.groups.iter().flat_map(|(symbol, names)| {
            names
                .iter()
                .map(move |(name, lines)| (*symbol, name.as_str(), lines.as_slice()))
        })
    }

    pub fn get(&self, symbol: char, name: &str) -> Option<&[Fields]> {
        self.groups
            .get(&symbol)
            .and_then(|names| names.get(name))
            .map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rr::{Name, Zone};

    fn zone() -> Zone {
        Zone::new(Name::from_ascii("example.com.").unwrap())
    }

    #[test]
    fn parse_strips_symbol_comment_and_whitespace() {
        let line = RawLine::parse("+www.example.com: 192.0.2.1 :3600 # web server").unwrap();
        assert_eq!(line.symbol(), '+');
        assert_eq!(line.fields(), ["www.example.com", "192.0.2.1", "3600"]);
    }

    #[test]
    fn parse_blank_lines() {
        assert_eq!(RawLine::parse(""), None);
        assert_eq!(RawLine::parse("   "), None);
    }

    #[test]
    fn parse_does_not_honour_escaped_colons() {
        let line = RawLine::parse("'txt.example.com:a::b").unwrap();
        assert_eq!(line.fields(), ["txt.example.com", "a", "", "b"]);
    }

    #[test]
    fn parse_comment_only_line() {
        let line = RawLine::parse("#just a comment").unwrap();
        assert_eq!(line.symbol(), '#');
        assert_eq!(line.fields(), [""]);
    }

    #[test]
    fn collect_filters_and_relativizes() {
        let lines = [
            "+www.example.com:192.0.2.1",
            "+www.example.com:192.0.2.2:60",
            "+example.com:192.0.2.3",
            "+www.example.net:192.0.2.4",
            "+wwwexample.com:192.0.2.5",
            "",
            "Cmail.example.com:www.example.com",
        ];
        let groups = SymbolGroups::collect(&zone(), lines);

        assert_eq!(
            groups.get('+', "www").unwrap(),
            [
                vec!["www".to_owned(), "192.0.2.1".to_owned()],
                vec!["www".to_owned(), "192.0.2.2".to_owned(), "60".to_owned()],
            ]
        );
        assert_eq!(groups.get('+', "").unwrap().len(), 1);
        assert_eq!(groups.get('C', "mail").unwrap().len(), 1);
        assert_eq!(groups.iter().count(), 3);
        assert!(groups.get('+', "www.example.net").is_none());
    }

    #[test]
    fn collect_keeps_insertion_order() {
        let lines = ["+b.example.com:192.0.2.1", "'a.example.com:x", "+a.example.com:192.0.2.2"];
        let groups = SymbolGroups::collect(&zone(), lines);
        let order: Vec<_> = groups.iter().map(|(symbol, name, _)| (symbol, name)).collect();
        assert_eq!(order, [('+', "b"), ('+', "a"), ('\'', "a")]);
    }
}
