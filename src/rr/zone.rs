use std::collections::{BTreeMap, BTreeSet};

use hickory_proto::rr::{LowerName, RecordType, RrKey};
use tracing::trace;

use crate::store::{ZoneError, ZoneStore};

use super::{Name, NameExt as _, Record, RecordSet, ZoneSuffix};

/// An in-memory zone: a name, the subzones delegated away from it, and its record sets.
#[derive(Debug, Clone)]
pub struct Zone {
    name: Name,
    origin: LowerName,
    suffix: ZoneSuffix,
    sub_zones: BTreeSet<LowerName>,
    records: BTreeMap<RrKey, RecordSet>,
}

impl Zone {
    /// Create a new empty zone.
    pub fn new(name: Name) -> Self {
        let origin = LowerName::new(&name);
        let suffix = ZoneSuffix::new(&name);

        Self {
            name,
            origin,
            suffix,
            sub_zones: BTreeSet::new(),
            records: BTreeMap::new(),
        }
    }

    /// Declare subzones that are managed elsewhere.
    ///
    /// Relative names are interpreted relative to this zone.
    pub fn with_sub_zones<I, S>(mut self, sub_zones: I) -> Result<Self, hickory_proto::ProtoError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for sub_zone in sub_zones {
            let sub_zone = sub_zone.as_ref();
            let name = if sub_zone.ends_with('.') {
                Name::from_ascii(sub_zone)?
            } else {
                Name::from_relative(&self.name, sub_zone)?
            };
            self.sub_zones.insert(LowerName::new(&name));
        }
        Ok(self)
    }
}

impl Zone {
    /// The name of this zone.
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// The name of this zone, in lowercase.
    pub fn origin(&self) -> &LowerName {
        &self.origin
    }

    /// Whether this is a reverse-DNS zone under `in-addr.arpa.`.
    pub fn is_reverse(&self) -> bool {
        self.name.is_in_addr_arpa()
    }

    /// Every record in the zone, in canonical order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values().flat_map(|rrset| rrset.records())
    }

    /// Every record set in the zone.
    pub fn record_sets(&self) -> impl Iterator<Item = &RecordSet> {
        self.records.values()
    }

    /// Find the record set for an owner name and type.
    pub fn lookup(&self, name: &Name, record_type: RecordType) -> Option<&RecordSet> {
        self.records
            .get(&RrKey::new(LowerName::new(name), record_type))
    }

    /// Number of record sets in the zone.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn check_sub_zones(&self, rrset: &RecordSet) -> Result<(), ZoneError> {
        let name = LowerName::new(rrset.name());
        for sub_zone in &self.sub_zones {
            if &name == sub_zone {
                if rrset.record_type() != RecordType::NS {
                    return Err(ZoneError::Subzone {
                        name: rrset.name().clone(),
                        reason: "only NS records may sit at a subzone apex",
                    });
                }
            } else if sub_zone.zone_of(&name) {
                return Err(ZoneError::Subzone {
                    name: rrset.name().clone(),
                    reason: "record is below a subzone apex",
                });
            }
        }
        Ok(())
    }

    fn check_cname(&self, rrset: &RecordSet) -> Result<(), ZoneError> {
        let name = LowerName::new(rrset.name());
        let conflict = self
            .records
            .keys()
            .filter(|key| key.name == name)
            .any(|key| {
                (rrset.record_type() == RecordType::CNAME) != (key.record_type == RecordType::CNAME)
            });

        if conflict {
            return Err(ZoneError::CnameCoexistence {
                name: rrset.name().clone(),
            });
        }
        Ok(())
    }
}

impl ZoneStore for Zone {
    fn name(&self) -> &Name {
        &self.name
    }

    fn hostname_from_fqdn(&self, fqdn: &str) -> Option<String> {
        self.suffix.relative(fqdn).map(str::to_owned)
    }

    fn add_record(&mut self, rrset: RecordSet, lenient: bool) -> Result<(), ZoneError> {
        if !self.origin.zone_of(&LowerName::new(rrset.name())) {
            return Err(ZoneError::OutOfZone {
                name: rrset.name().clone(),
                zone: self.name.clone(),
            });
        }

        if !lenient {
            self.check_sub_zones(&rrset)?;
        }

        let key = rrset.rrkey();
        if self.records.contains_key(&key) {
            return Err(ZoneError::Duplicate {
                name: rrset.name().clone(),
                record_type: rrset.record_type(),
            });
        }

        if !lenient {
            self.check_cname(&rrset)?;
        }

        trace!(
            "adding {} {} with {} records",
            rrset.name(),
            rrset.record_type(),
            rrset.len()
        );
        self.records.insert(key, rrset);
        Ok(())
    }
}
