use camino::Utf8PathBuf;
use static_assertions::assert_impl_all;
use tinydns_source::rr::{RecordType, TimeToLive};
use tinydns_source::source::DirectoryLines;
use tinydns_source::{LineSource, SourceConfig, SourceError, TinyDnsFileSource};

mod support;
use support::{presentation, rdata_strings, rrset, subscribe, write_data, zone};

assert_impl_all!(TinyDnsFileSource: Send, Sync);
assert_impl_all!(DirectoryLines: LineSource, Send, Sync);
assert_impl_all!(SourceError: std::error::Error, Send, Sync);

fn config(dir: &tempfile::TempDir) -> SourceConfig {
    SourceConfig::new(Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap())
}

#[test]
fn reads_every_visible_file() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    write_data(
        dir.path(),
        "forward",
        &["+www.example.com:192.0.2.1", "", "+www.example.com:192.0.2.2"],
    );
    write_data(dir.path(), "reverse", &["=host.example.com:192.0.2.5:600"]);
    write_data(dir.path(), ".swap", &["+www.example.com:192.0.2.3"]);

    let source = TinyDnsFileSource::from_config("files", &config(&dir));

    let mut forward = zone("example.com.");
    assert_eq!(source.populate(&mut forward, false).unwrap(), 2);
    let www = rrset(&forward, "www.example.com.", RecordType::A);
    assert_eq!(rdata_strings(www), ["192.0.2.1", "192.0.2.2"]);

    let mut reverse = zone("2.0.192.in-addr.arpa.");
    assert_eq!(source.populate(&mut reverse, false).unwrap(), 1);
    let ptr = rrset(&reverse, "5.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(ptr.ttl(), TimeToLive::from(600));
}

#[test]
fn lines_are_read_once() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    write_data(dir.path(), "data", &["+www.example.com:192.0.2.1"]);

    let source = TinyDnsFileSource::from_config("files", &config(&dir));
    let mut first = zone("example.com.");
    source.populate(&mut first, false).unwrap();

    write_data(dir.path(), "later", &["+mail.example.com:192.0.2.25"]);
    let mut second = zone("example.com.");
    source.populate(&mut second, false).unwrap();

    assert_eq!(presentation(&first), presentation(&second));
    assert_eq!(source.line_source().lines().unwrap().len(), 1);
}

#[test]
fn configured_default_ttl() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    write_data(dir.path(), "data", &["'www.example.com:hello"]);

    let config = config(&dir).with_default_ttl(TimeToLive::from(86400));
    let source = TinyDnsFileSource::from_config("files", &config);
    assert_eq!(source.default_ttl(), TimeToLive::from(86400));

    let mut zone = zone("example.com.");
    source.populate(&mut zone, false).unwrap();
    assert_eq!(
        rrset(&zone, "www.example.com.", RecordType::TXT).ttl(),
        TimeToLive::from(86400)
    );
}

#[test]
fn missing_directory() {
    subscribe();
    let dir = tempfile::tempdir().unwrap();
    let source = TinyDnsFileSource::from_directory("files", &dir.path().join("nope")).unwrap();

    let mut zone = zone("example.com.");
    let error = source.populate(&mut zone, false).unwrap_err();
    assert!(matches!(error, SourceError::Io { .. }));
    assert!(error.to_string().contains("nope"));
}
