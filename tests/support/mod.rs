#![allow(unused)]

use std::fs;
use std::path::Path;
use std::sync::Once;

use tinydns_source::TinyDnsSource;
use tinydns_source::rr::{Name, RecordSet, RecordType, Zone};

/// Registers a global default tracing subscriber when called for the first time. This is intended
/// for use in tests.
pub fn subscribe() {
    static INSTALL_TRACING_SUBSCRIBER: Once = Once::new();
    INSTALL_TRACING_SUBSCRIBER.call_once(|| {
        let subscriber = tracing_subscriber::FmtSubscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .finish();
        tracing::subscriber::set_global_default(subscriber).unwrap();
    });
}

pub fn name(name: &str) -> Name {
    Name::from_ascii(name).unwrap()
}

pub fn zone(origin: &str) -> Zone {
    Zone::new(name(origin))
}

/// An in-memory source over the given lines.
pub fn source(lines: &[&str]) -> TinyDnsSource<Vec<String>> {
    TinyDnsSource::new("test", lines.iter().map(|line| line.to_string()).collect())
}

/// Look up a record set, failing the test when it is missing.
pub fn rrset<'z>(zone: &'z Zone, owner: &str, record_type: RecordType) -> &'z RecordSet {
    zone.lookup(&name(owner), record_type)
        .unwrap_or_else(|| panic!("no {record_type} record for {owner}"))
}

/// The record data of a record set in presentation format.
pub fn rdata_strings(rrset: &RecordSet) -> Vec<String> {
    rrset.rdatas().map(|rdata| rdata.to_string()).collect()
}

/// The zone's records in presentation format, sorted.
pub fn presentation(zone: &Zone) -> Vec<String> {
    let mut records: Vec<String> = zone.records().map(|record| record.to_string()).collect();
    records.sort();
    records
}

pub fn write_data(dir: &Path, file: &str, lines: &[&str]) {
    let mut data = lines.join("\n");
    data.push('\n');
    fs::write(dir.join(file), data).unwrap();
}
