//! The zone a source populates.
//!
//! Sources only see a zone through [`ZoneStore`]: its name, a way to strip that
//! name off a fully-qualified owner, and record insertion. Insertion reports
//! conflicts as distinct [`ZoneError`] variants so that callers can decide which
//! of them are recoverable.

use hickory_proto::rr::RecordType;
use thiserror::Error;

use crate::rr::{Name, RecordSet};

/// A zone that records can be added to.
pub trait ZoneStore {
    /// The fully-qualified name of the zone.
    fn name(&self) -> &Name;

    /// Strip the zone name from `fqdn`.
    ///
    /// Returns the empty string for the apex and `None` for names outside the zone.
    fn hostname_from_fqdn(&self, fqdn: &str) -> Option<String>;

    /// Insert a record set.
    ///
    /// With `lenient` set, structural checks (delegated subzones, CNAME exclusivity)
    /// are skipped. Duplicates are always reported.
    fn add_record(&mut self, rrset: RecordSet, lenient: bool) -> Result<(), ZoneError>;
}

/// Conflicts reported when inserting into a zone.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// A record set already exists for this name and type.
    #[error("duplicate {record_type} record for {name}")]
    Duplicate { name: Name, record_type: RecordType },

    /// The record belongs to a delegated subzone.
    #[error("{name} is under a managed subzone: {reason}")]
    Subzone { name: Name, reason: &'static str },

    /// A CNAME would share its owner name with another record type.
    #[error("CNAME at {name} cannot coexist with other records")]
    CnameCoexistence { name: Name },

    /// The record is not inside the zone at all.
    #[error("{name} is not within zone {zone}")]
    OutOfZone { name: Name, zone: Name },
}

impl ZoneError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ZoneError::Duplicate { .. })
    }

    pub fn is_subzone(&self) -> bool {
        matches!(self, ZoneError::Subzone { .. })
    }
}
