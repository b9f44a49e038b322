//! Resource Record Definitions for DNS

mod descriptor;
mod name;
mod record;
mod rset;
mod ttl;
mod zone;

pub use self::descriptor::{RecordDescriptor, RecordError, Value, Values};
pub use self::name::{NameExt, ZoneSuffix, ensure_fqdn, reverse_pointer};
pub use self::record::Record;
pub use self::rset::RecordSet;
pub use self::ttl::TimeToLive;
pub use self::zone::Zone;

/// DNS Name with case preserved.
///
pub use hickory_proto::rr::Name;

/// DNS Name converted to the canonical lowercase form.
///
pub use hickory_proto::rr::LowerName;

pub use hickory_proto::rr::RecordType;
