use tinydns_source::rr::{RecordType, TimeToLive};

mod support;
use support::{name, rdata_strings, rrset, source, subscribe, zone};

const DATA: &[&str] = &[
    "=host.example.com:192.0.2.5",
    "=web.example.com:192.0.2.6:300",
    "^7.2.0.192.in-addr.arpa:mail.example.com.:60",
    "^8.2.0.192.IN-ADDR.ARPA.:upper.example.com",
    "&example.com:192.0.2.53:ns1.example.com",
    "+www.example.com:192.0.2.9",
    "Cftp.example.com:www.example.com",
    "=other.example.com:198.51.100.5",
    "=dup.example.com:192.0.2.5",
    "=broken.example.com:192.0.2",
    "^2.0.192.in-addr.arpa:apex.example.com",
];

#[test]
fn pointers_from_addresses_and_names() {
    subscribe();
    let mut zone = zone("2.0.192.in-addr.arpa.");
    let added = source(DATA).populate(&mut zone, false).unwrap();

    assert_eq!(added, 5);

    let host = rrset(&zone, "5.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(rdata_strings(host), ["host.example.com."]);
    assert_eq!(host.ttl(), TimeToLive::DEFAULT);

    let web = rrset(&zone, "6.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(web.ttl(), TimeToLive::from(300));

    let mail = rrset(&zone, "7.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(rdata_strings(mail), ["mail.example.com."]);
    assert_eq!(mail.ttl(), TimeToLive::from(60));

    let upper = rrset(&zone, "8.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(rdata_strings(upper), ["upper.example.com."]);

    let ns = rrset(&zone, "53.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(rdata_strings(ns), ["example.com."]);
}

#[test]
fn forward_only_lines_are_ignored() {
    subscribe();
    let mut zone = zone("2.0.192.in-addr.arpa.");
    source(DATA).populate(&mut zone, false).unwrap();

    assert!(zone.lookup(&name("9.2.0.192.in-addr.arpa."), RecordType::PTR).is_none());
    assert!(zone.lookup(&name("2.0.192.in-addr.arpa."), RecordType::PTR).is_none());
    for rrset in zone.record_sets() {
        assert_eq!(rrset.record_type(), RecordType::PTR);
    }
}

#[test]
fn first_pointer_wins() {
    subscribe();
    let mut zone = zone("2.0.192.in-addr.arpa.");
    source(DATA).populate(&mut zone, false).unwrap();

    let host = rrset(&zone, "5.2.0.192.in-addr.arpa.", RecordType::PTR);
    assert_eq!(host.len(), 1);
    assert_eq!(rdata_strings(host), ["host.example.com."]);
}

#[test]
fn wider_reverse_zone() {
    subscribe();
    let mut zone = zone("192.in-addr.arpa.");
    let added = source(&["=host.example.com:192.0.2.5", "=other.example.com:198.51.100.5"])
        .populate(&mut zone, false)
        .unwrap();

    assert_eq!(added, 1);
    assert!(
        zone.lookup(&name("5.2.0.192.in-addr.arpa."), RecordType::PTR)
            .is_some()
    );
}
