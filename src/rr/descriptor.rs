//! Untyped record data, as produced by a zone source before validation.
//!
//! A [`RecordDescriptor`] carries the record type, the TTL and one or more textual
//! values. Turning it into typed record data is where validation happens, see
//! [`RecordSet::from_descriptor`](super::RecordSet::from_descriptor).

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_proto::rr::{
    Name, RData, RecordType,
    rdata::{A, AAAA, CNAME, MX, NS, PTR, TXT},
};
use thiserror::Error;

use super::TimeToLive;

/// A single record value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// Address, target name or text, depending on the record type.
    Text(String),

    /// Mail exchanger with its preference, kept as written until validation.
    Exchange { preference: String, exchange: String },
}

impl Value {
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(value.into())
    }

    pub fn exchange(preference: impl Into<String>, exchange: impl Into<String>) -> Self {
        Value::Exchange {
            preference: preference.into(),
            exchange: exchange.into(),
        }
    }

    /// Convert this value into typed record data for `record_type`.
    pub fn to_rdata(&self, record_type: RecordType) -> Result<RData, RecordError> {
        match (record_type, self) {
            (RecordType::A, Value::Text(addr)) => addr
                .parse::<Ipv4Addr>()
                .map(|addr| RData::A(A(addr)))
                .map_err(|_| RecordError::InvalidAddress {
                    record_type,
                    value: addr.clone(),
                }),
            (RecordType::AAAA, Value::Text(addr)) => addr
                .parse::<Ipv6Addr>()
                .map(|addr| RData::AAAA(AAAA(addr)))
                .map_err(|_| RecordError::InvalidAddress {
                    record_type,
                    value: addr.clone(),
                }),
            (RecordType::CNAME, Value::Text(target)) => {
                target_name(record_type, target).map(|name| RData::CNAME(CNAME(name)))
            }
            (RecordType::NS, Value::Text(target)) => {
                target_name(record_type, target).map(|name| RData::NS(NS(name)))
            }
            (RecordType::PTR, Value::Text(target)) => {
                target_name(record_type, target).map(|name| RData::PTR(PTR(name)))
            }
            (RecordType::TXT, Value::Text(text)) => {
                unescape_txt(text).map(|text| RData::TXT(TXT::new(vec![text])))
            }
            (
                RecordType::MX,
                Value::Exchange {
                    preference,
                    exchange,
                },
            ) => {
                let preference =
                    preference
                        .parse::<u16>()
                        .map_err(|_| RecordError::InvalidPreference {
                            value: preference.clone(),
                        })?;
                let exchange = target_name(record_type, exchange)?;
                Ok(RData::MX(MX::new(preference, exchange)))
            }
            (
                RecordType::A
                | RecordType::AAAA
                | RecordType::CNAME
                | RecordType::NS
                | RecordType::PTR
                | RecordType::TXT
                | RecordType::MX,
                value,
            ) => Err(RecordError::ValueKind {
                record_type,
                value: value.to_string(),
            }),
            (record_type, _) => Err(RecordError::UnsupportedType(record_type)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(text) => f.write_str(text),
            Value::Exchange {
                preference,
                exchange,
            } => write!(f, "{preference} {exchange}"),
        }
    }
}

fn target_name(record_type: RecordType, target: &str) -> Result<Name, RecordError> {
    if !target.ends_with('.') {
        return Err(RecordError::MissingTrailingDot {
            record_type,
            value: target.to_owned(),
        });
    }

    Name::from_utf8(target).map_err(|error| RecordError::InvalidName {
        value: target.to_owned(),
        reason: error.to_string(),
    })
}

/// Undo the `\;` escaping used for TXT values, rejecting bare semicolons.
///
/// A `;` is accepted whenever a backslash comes directly before it, and that
/// backslash is dropped. Every other backslash is kept as written.
fn unescape_txt(text: &str) -> Result<String, RecordError> {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == ';' {
            if !out.ends_with('\\') {
                return Err(RecordError::UnescapedSemicolon {
                    value: text.to_owned(),
                });
            }
            out.pop();
        }
        out.push(c);
    }
    Ok(out)
}

/// One value, or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
    One(Value),
    Many(Vec<Value>),
}

impl Values {
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        match self {
            Values::One(value) => std::slice::from_ref(value).iter(),
            Values::Many(values) => values.iter(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Values::One(_) => 1,
            Values::Many(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Vec<Value>> for Values {
    fn from(mut values: Vec<Value>) -> Self {
        if values.len() == 1 {
            Values::One(values.remove(0))
        } else {
            Values::Many(values)
        }
    }
}

/// Everything needed to build a record set for one owner name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordDescriptor {
    pub record_type: RecordType,
    pub ttl: TimeToLive,
    pub values: Values,
}

impl RecordDescriptor {
    pub fn new(record_type: RecordType, ttl: TimeToLive, values: impl Into<Values>) -> Self {
        Self {
            record_type,
            ttl,
            values: values.into(),
        }
    }
}

/// Record data that could not be turned into a valid record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("invalid {record_type} address {value:?}")]
    InvalidAddress {
        record_type: RecordType,
        value: String,
    },

    #[error("invalid name {value:?}: {reason}")]
    InvalidName { value: String, reason: String },

    #[error("{record_type} value {value:?} is missing a trailing dot")]
    MissingTrailingDot {
        record_type: RecordType,
        value: String,
    },

    #[error("invalid MX preference {value:?}")]
    InvalidPreference { value: String },

    #[error("unescaped ';' in TXT value {value:?}")]
    UnescapedSemicolon { value: String },

    #[error("{record_type} cannot hold the value {value:?}")]
    ValueKind {
        record_type: RecordType,
        value: String,
    },

    #[error("record type {0} is not supported")]
    UnsupportedType(RecordType),

    #[error("{record_type} record at {name} has no values")]
    Empty {
        record_type: RecordType,
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_values() {
        assert_eq!(
            Value::text("192.0.2.1").to_rdata(RecordType::A).unwrap(),
            RData::A(A::new(192, 0, 2, 1))
        );
        assert_eq!(
            Value::text("2001:0db8:0000:0000:0000:0000:0000:0001")
                .to_rdata(RecordType::AAAA)
                .unwrap(),
            RData::AAAA(AAAA::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1))
        );
        assert!(matches!(
            Value::text("192.0.2").to_rdata(RecordType::A),
            Err(RecordError::InvalidAddress { .. })
        ));
    }

    #[test]
    fn target_values_need_trailing_dot() {
        assert!(Value::text("www.example.com.").to_rdata(RecordType::CNAME).is_ok());
        assert!(matches!(
            Value::text("www.example.com").to_rdata(RecordType::NS),
            Err(RecordError::MissingTrailingDot { .. })
        ));
    }

    #[test]
    fn mx_values() {
        let rdata = Value::exchange("10", "mx.example.com.")
            .to_rdata(RecordType::MX)
            .unwrap();
        let mx = rdata.as_mx().unwrap();
        assert_eq!(mx.preference(), 10);
        assert_eq!(mx.exchange(), &Name::from_ascii("mx.example.com.").unwrap());

        assert!(matches!(
            Value::exchange("ten", "mx.example.com.").to_rdata(RecordType::MX),
            Err(RecordError::InvalidPreference { .. })
        ));
        assert!(matches!(
            Value::text("mx.example.com.").to_rdata(RecordType::MX),
            Err(RecordError::ValueKind { .. })
        ));
    }

    #[test]
    fn txt_semicolons() {
        let rdata = Value::text(r"v=spf1 a\; b")
            .to_rdata(RecordType::TXT)
            .unwrap();
        let txt = rdata.as_txt().unwrap();
        assert_eq!(&*txt.txt_data()[0], b"v=spf1 a; b");

        assert!(matches!(
            Value::text("v=spf1 a; b").to_rdata(RecordType::TXT),
            Err(RecordError::UnescapedSemicolon { .. })
        ));
    }

    #[test]
    fn txt_escaped_backslash_before_semicolon() {
        assert_eq!(unescape_txt(r"v=DKIM1\\; k=rsa").unwrap(), r"v=DKIM1\; k=rsa");
        assert_eq!(unescape_txt(r"a\\b").unwrap(), r"a\\b");
        assert_eq!(unescape_txt(r"trailing\").unwrap(), r"trailing\");
        assert!(matches!(
            unescape_txt(r"a\\b;"),
            Err(RecordError::UnescapedSemicolon { .. })
        ));
    }

    #[test]
    fn unsupported_types() {
        assert_eq!(
            Value::text("x").to_rdata(RecordType::SRV),
            Err(RecordError::UnsupportedType(RecordType::SRV))
        );
    }

    #[test]
    fn values_from_vec() {
        assert_eq!(
            Values::from(vec![Value::text("a")]),
            Values::One(Value::text("a"))
        );
        let many = Values::from(vec![Value::text("a"), Value::text("b")]);
        assert_eq!(many.len(), 2);
        assert_eq!(many.iter().count(), 2);
    }
}
