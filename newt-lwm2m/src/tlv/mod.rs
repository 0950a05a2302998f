//! Every TLV element starts with a 1-byte type header:
//!
//! ```text
//!   7   6   5   4   3   2   1   0
//! +-------+---+-------+-----------+
//! | kind  |id |length | length    |
//! |       |16 |class  | (inline)  |
//! +-------+---+-------+-----------+
//! ```
//!
//! followed by an 8 or 16 bit id, then 0 to 3 bytes of length
//! (only when the length class is not inline), then the value.
//!
//! Object Instances and Multiple Resources contain more elements;
//! Resources and Resource Instances contain a value.

use std_alloc::vec::Vec;

use crate::Error;

mod de;
mod ser;

pub use de::deserialize;
pub use ser::serialize;

/// Type of a TLV element
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
  /// Contains resources
  ObjectInstance,
  /// A value within a Multiple Resource
  ResourceInstance,
  /// Contains resource instances
  MultipleResource,
  /// A value
  Resource,
}

impl Kind {
  fn bits(self) -> u8 {
    match self {
      | Kind::ObjectInstance => 0b00,
      | Kind::ResourceInstance => 0b01,
      | Kind::MultipleResource => 0b10,
      | Kind::Resource => 0b11,
    }
  }

  fn from_bits(b: u8) -> Self {
    match b & 0b11 {
      | 0b00 => Kind::ObjectInstance,
      | 0b01 => Kind::ResourceInstance,
      | 0b10 => Kind::MultipleResource,
      | _ => Kind::Resource,
    }
  }
}

/// A parsed element header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Header {
  pub(crate) kind: Kind,
  pub(crate) id: u16,
  /// Bytes the header occupies
  pub(crate) len: usize,
  /// Bytes the value occupies
  pub(crate) value_len: usize,
}

/// Largest value a 24-bit length can express
pub const MAX_VALUE_LEN: usize = 0xFF_FFFF;

/// Encode the header of an element whose value is `value_len` bytes
pub(crate) fn header(kind: Kind, id: u16, value_len: usize) -> Result<Vec<u8>, Error> {
  if value_len > MAX_VALUE_LEN {
    return Err(Error::TooLarge(value_len));
  }

  let (class, len_bytes) = match value_len {
    | 0..=7 => (0b00, 0),
    | 8..=0xFF => (0b01, 1),
    | 0x100..=0xFFFF => (0b10, 2),
    | _ => (0b11, 3),
  };
  let wide = id > 0xFF;

  let mut out = Vec::with_capacity(1 + 2 + 3);
  out.push(kind.bits() << 6
           | (wide as u8) << 5
           | class << 3
           | if class == 0 { value_len as u8 } else { 0 });

  match wide {
    | true => out.extend(id.to_be_bytes()),
    | false => out.push(id as u8),
  }

  out.extend(&(value_len as u32).to_be_bytes()[4 - len_bytes..]);
  Ok(out)
}

/// Parse the header of the element at the start of `buf`,
/// checking that its value fits in `buf`
pub(crate) fn parse_header(buf: &[u8]) -> Result<Header, Error> {
  let (&ty, rest) = buf.split_first().ok_or(Error::Malformed)?;

  let kind = Kind::from_bits(ty >> 6);
  let id_len = if ty & 0b0010_0000 != 0 { 2 } else { 1 };
  let len_bytes = ((ty >> 3) & 0b11) as usize;

  let id = match rest.get(..id_len).ok_or(Error::Malformed)? {
    | [a] => *a as u16,
    | [a, b] => u16::from_be_bytes([*a, *b]),
    | _ => return Err(Error::Malformed),
  };

  let value_len = match len_bytes {
    | 0 => (ty & 0b111) as usize,
    | n => rest.get(id_len..id_len + n)
               .ok_or(Error::Malformed)?
               .iter()
               .fold(0usize, |len, b| len << 8 | *b as usize),
  };

  let len = 1 + id_len + len_bytes;
  if buf.len() - len < value_len {
    return Err(Error::Malformed);
  }

  Ok(Header { kind,
              id,
              len,
              value_len })
}
