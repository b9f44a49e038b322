//! Merging synthesized values into record sets and inserting them into the zone.

use indexmap::IndexMap;
use tracing::{debug, info, trace};

use crate::error::SourceError;
use crate::rr::{RecordDescriptor, RecordSet, RecordType, TimeToLive, Value};
use crate::store::{ZoneError, ZoneStore};

use super::symbol::Synthesis;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Group {
    ttl: TimeToLive,
    values: Vec<Value>,
}

/// Values accumulated per `(record type, owner name)`, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeGroups {
    groups: IndexMap<(RecordType, String), Group>,
}

impl TypeGroups {
    /// Add the values of one event. The first event for a key decides its TTL.
    pub fn push(&mut self, synthesis: Synthesis) {
        let Synthesis {
            record_type,
            name,
            ttl,
            values,
        } = synthesis;

        trace!("{record_type} {name:?}: +{} values", values.len());
        self.groups
            .entry((record_type, name))
            .or_insert_with(|| Group {
                ttl,
                values: Vec::new(),
            })
            .values
            .extend(values);
    }

    pub fn values(&self, record_type: RecordType, name: &str) -> Option<&[Value]> {
        self.groups
            .get(&(record_type, name.to_owned()))
            .map(|group| group.values.as_slice())
    }

    pub fn ttl(&self, record_type: RecordType, name: &str) -> Option<TimeToLive> {
        self.groups
            .get(&(record_type, name.to_owned()))
            .map(|group| group.ttl)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// One descriptor per group, single-valued when the group holds one value.
    pub fn descriptors(&self) -> impl Iterator<Item = (&str, RecordDescriptor)> + '_ {
        self.groups
            .iter()
            .filter(|(_, group)| !group.values.is_empty())
            .map(|((record_type, name), group)| {
                (
                    name.as_str(),
                    RecordDescriptor::new(*record_type, group.ttl, group.values.clone()),
                )
            })
    }

    /// Build and insert a record set for every group.
    ///
    /// Records that fall into a delegated subzone are skipped; every other
    /// rejection is returned. Returns the number of record sets inserted.
    pub fn materialize<Z>(&self, zone: &mut Z, lenient: bool) -> Result<usize, SourceError>
    where
        Z: ZoneStore + ?Sized,
    {
        let mut added = 0;
        for (name, descriptor) in self.descriptors() {
            let Some(rrset) = RecordSet::from_descriptor(zone.name(), name, &descriptor, lenient)?
            else {
                info!(
                    "no valid {} values left for {name:?}, skipping",
                    descriptor.record_type
                );
                continue;
            };

            match zone.add_record(rrset, lenient) {
                Ok(()) => added += 1,
                Err(error @ ZoneError::Subzone { .. }) => {
                    debug!("skipping subzone record: {error}");
                }
                Err(error) => return Err(error.into()),
            }
        }
        Ok(added)
    }
}

impl FromIterator<Synthesis> for TypeGroups {
    fn from_iter<T: IntoIterator<Item = Synthesis>>(iter: T) -> Self {
        let mut groups = TypeGroups::default();
        for synthesis in iter {
            groups.push(synthesis);
        }
        groups
    }
}

impl Extend<Synthesis> for TypeGroups {
    fn extend<T: IntoIterator<Item = Synthesis>>(&mut self, iter: T) {
        for synthesis in iter {
            self.push(synthesis);
        }
    }
}
