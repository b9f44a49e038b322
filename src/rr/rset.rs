use hickory_proto::rr::{DNSClass, LowerName, RData, RecordData, RecordType, RrKey};
use tracing::{trace, warn};

use super::{
    Name, NameExt as _, RecordDescriptor, RecordError, record::Record, ttl::TimeToLive,
};

/// All records sharing one owner name and record type.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    name: Name,
    record_type: RecordType,
    dns_class: DNSClass,
    ttl: TimeToLive,
    records: Vec<Record>,
}

impl RecordSet {
    pub fn new(name: Name, record_type: RecordType, ttl: TimeToLive) -> Self {
        Self {
            name,
            record_type,
            dns_class: DNSClass::IN,
            ttl,
            records: Vec::new(),
        }
    }

    pub fn from_record<R: RecordData>(record: Record<R>) -> Self {
        let record = record.into_record_rdata();
        Self {
            name: record.name().clone(),
            record_type: record.record_type(),
            dns_class: record.dns_class(),
            ttl: record.ttl(),
            records: vec![record],
        }
    }

    /// Build a record set for the zone-relative `name` from untyped record data.
    ///
    /// Every value is validated. When `lenient` is set, invalid values are logged and
    /// dropped instead of failing the whole set, and `Ok(None)` is returned if nothing
    /// valid remains.
    pub fn from_descriptor(
        origin: &Name,
        name: &str,
        descriptor: &RecordDescriptor,
        lenient: bool,
    ) -> Result<Option<Self>, RecordError> {
        let owner = Name::from_relative(origin, name).map_err(|error| RecordError::InvalidName {
            value: name.to_owned(),
            reason: error.to_string(),
        })?;

        if descriptor.values.is_empty() {
            return Err(RecordError::Empty {
                record_type: descriptor.record_type,
                name: owner.to_string(),
            });
        }

        let mut rrset = RecordSet::new(owner, descriptor.record_type, descriptor.ttl);
        for value in descriptor.values.iter() {
            match value.to_rdata(descriptor.record_type) {
                Ok(rdata) => {
                    rrset.push(rdata);
                }
                Err(error) if lenient => {
                    warn!("dropping invalid value at {}: {error}", rrset.name);
                }
                Err(error) => return Err(error),
            }
        }

        if rrset.is_empty() {
            return Ok(None);
        }
        Ok(Some(rrset))
    }

    /// Label of the Resource Record Set
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// `RecordType` of the Resource Record Set
    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    /// `DNSClass` of the RecordSet
    pub fn dns_class(&self) -> DNSClass {
        self.dns_class
    }

    /// Time to Live for this RecordSet
    pub fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    /// Sets the TTL, in seconds, to the specified value
    ///
    /// This will traverse every record and associate with it the specified ttl
    pub fn set_ttl(&mut self, ttl: TimeToLive) {
        self.ttl = ttl;
        for r in &mut self.records {
            r.set_ttl(ttl);
        }
    }
}

impl RecordSet {
    /// Record Lookup Key for this Record Set
    pub(crate) fn rrkey(&self) -> RrKey {
        RrKey::new(LowerName::new(self.name()), self.record_type())
    }

    /// Returns an iterator over all records in the set.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Returns an iterator over the record data of every record in the set.
    pub fn rdatas(&self) -> impl Iterator<Item = &RData> {
        self.records.iter().map(|record| record.rdata())
    }

    /// Returns an IntoIterator over all records in the set.
    pub fn into_records(self) -> impl Iterator<Item = Record> {
        self.records.into_iter()
    }

    /// Returns true if there are no records in this set
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records in this set
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Add record data to this set, returning `false` if it was already present.
    pub fn push(&mut self, rdata: RData) -> bool {
        let record = Record::from_rdata(self.name.clone(), self.ttl, rdata);
        self.insert(record)
    }

    fn insert(&mut self, record: Record) -> bool {
        debug_assert_eq!(record.record_type(), self.record_type);

        // CNAME  compare only NAME, CLASS, and TYPE -- it is not possible
        //         to have more than one CNAME RR, even if their data fields
        //         differ.
        if matches!(record.record_type(), RecordType::CNAME | RecordType::ANAME) {
            self.records.clear();
        }

        if self.records.iter().any(|target| target.rdata() == record.rdata()) {
            trace!(
                "{} {} already holds {}, dropping the duplicate",
                self.name,
                self.record_type,
                record.rdata()
            );
            return false;
        }

        self.records.push(record);
        true
    }
}
