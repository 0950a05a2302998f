use std_alloc::string::String;
use std_alloc::vec::Vec;

use crate::Uri;

/// The declared type of an LwM2M resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LwM2mType {
  #[allow(missing_docs)]
  String,
  #[allow(missing_docs)]
  Opaque,
  #[allow(missing_docs)]
  Integer,
  #[allow(missing_docs)]
  UnsignedInteger,
  #[allow(missing_docs)]
  Float,
  #[allow(missing_docs)]
  Boolean,
  /// A reference to an object instance
  ObjectLink,
  /// Seconds since the Unix epoch
  Time,
  /// `application/link-format`
  CoreLink,
}

/// A resource value
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
  /// Bytes of a TLV resource that have not been given a type yet
  Undefined(Vec<u8>),
  #[allow(missing_docs)]
  String(String),
  #[allow(missing_docs)]
  Opaque(Vec<u8>),
  #[allow(missing_docs)]
  Integer(i64),
  #[allow(missing_docs)]
  UnsignedInteger(u64),
  #[allow(missing_docs)]
  Float(f64),
  #[allow(missing_docs)]
  Boolean(bool),
  #[allow(missing_docs)]
  ObjectLink { object_id: u16, instance_id: u16 },
  /// Seconds since the Unix epoch
  Time(i64),
  #[allow(missing_docs)]
  CoreLink(String),
  /// No value; the path exists
  /// (e.g. an object instance or multiple resource with no children)
  UriOnly,
}

impl Value {
  /// The type of this value, if it has one
  pub fn ty(&self) -> Option<LwM2mType> {
    match self {
      | Self::Undefined(_) | Self::UriOnly => None,
      | Self::String(_) => Some(LwM2mType::String),
      | Self::Opaque(_) => Some(LwM2mType::Opaque),
      | Self::Integer(_) => Some(LwM2mType::Integer),
      | Self::UnsignedInteger(_) => Some(LwM2mType::UnsignedInteger),
      | Self::Float(_) => Some(LwM2mType::Float),
      | Self::Boolean(_) => Some(LwM2mType::Boolean),
      | Self::ObjectLink { .. } => Some(LwM2mType::ObjectLink),
      | Self::Time(_) => Some(LwM2mType::Time),
      | Self::CoreLink(_) => Some(LwM2mType::CoreLink),
    }
  }
}

/// A value and the path to it
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Data {
  #[allow(missing_docs)]
  pub uri: Uri,
  #[allow(missing_docs)]
  pub value: Value,
}

impl Data {
  /// Create a data element
  pub fn new(uri: Uri, value: Value) -> Self {
    Self { uri, value }
  }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
  use super::*;

  #[test]
  fn serde_round_trip() {
    let data = Data::new(Uri::object(3).instance(0).resource(0),
                         Value::ObjectLink { object_id: 3,
                                             instance_id: 1 });
    let json = serde_json::to_string(&data).unwrap();
    assert_eq!(serde_json::from_str::<Data>(&json).unwrap(), data);
  }
}
