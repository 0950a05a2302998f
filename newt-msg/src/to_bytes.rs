use newt_common::GetSize;
use std_alloc::vec::Vec;

use crate::msg::{opt, Byte1};
use crate::*;

/// Trait allowing fallible conversion into bytes
pub trait TryIntoBytes {
  /// Error type yielded if conversion fails
  type Error;

  /// Try to convert into a collection of bytes
  ///
  /// ```
  /// use newt_msg::{Code, Id, Message, Token, TryIntoBytes, Type};
  ///
  /// let msg = Message::new(Type::Con, Code::GET, Id(107), Token::default());
  /// let bytes: Vec<u8> = msg.try_into_bytes().unwrap();
  ///
  /// assert_eq!(bytes, vec![0x40, 0x01, 0x00, 0x6B]);
  /// ```
  fn try_into_bytes(self) -> Result<Vec<u8>, Self::Error>;
}

/// Errors encounterable serializing to bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageToBytesError {
  /// Options were not in non-decreasing number order
  #[allow(missing_docs)]
  OptionsNotSorted { prev: OptNumber, next: OptNumber },

  /// An option value was too long for its length to be encoded
  #[allow(missing_docs)]
  OptionValueTooLong { number: OptNumber, len: usize },
}

impl<'a, 'b> TryIntoBytes for &'b Message<'a> {
  type Error = MessageToBytesError;

  fn try_into_bytes(self) -> Result<Vec<u8>, Self::Error> {
    let mut bytes = Vec::with_capacity(self.get_size());

    let byte1: u8 = Byte1 { tkl: self.token.0.len() as u8,
                            ver: self.ver,
                            ty: self.ty }.into();
    let code: u8 = self.code.into();
    let id: [u8; 2] = self.id.into();

    bytes.push(byte1);
    bytes.push(code);
    bytes.extend(id);
    bytes.extend_from_slice(&self.token.0);

    opt::serialize(&self.opts, &mut bytes)?;

    if !self.payload.0.is_empty() {
      bytes.push(0b11111111);
      bytes.extend_from_slice(&self.payload.0);
    }

    Ok(bytes)
  }
}

impl<'a> TryIntoBytes for Message<'a> {
  type Error = MessageToBytesError;

  fn try_into_bytes(self) -> Result<Vec<u8>, Self::Error> {
    (&self).try_into_bytes()
  }
}

impl From<Id> for [u8; 2] {
  fn from(id: Id) -> [u8; 2] {
    id.0.to_be_bytes()
  }
}

impl From<Byte1> for u8 {
  fn from(b: Byte1) -> u8 {
    let ver = (b.ver.0 & 0b11) << 6;
    let ty = u8::from(b.ty) << 4;
    let tkl = b.tkl;

    ver | ty | tkl
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{assert_eqb, assert_eqb_iter};

  #[test]
  fn msg() {
    let (msg, expected) = test_msg();
    let actual: Vec<u8> = msg.try_into_bytes().unwrap();
    assert_eqb_iter!(actual, expected);
  }

  #[test]
  fn size_is_computed_up_front() {
    let (msg, expected) = test_msg();
    assert_eq!(msg.get_size(), expected.len());
  }

  #[test]
  fn byte_1() {
    let byte = Byte1 { ver: Version(1),
                       ty: Type::Ack,
                       tkl: 3 };
    let actual: u8 = byte.into();
    let expected = 0b_01_10_0011u8;
    assert_eqb!(actual, expected)
  }

  #[test]
  fn id() {
    let id = Id(16);
    let actual = u16::from_be_bytes(id.into());
    assert_eqb!(actual, 16)
  }

  #[test]
  fn no_payload_marker() {
    let msg = Message::new(Type::Con, Code::CONTENT, Id(0), Token::default());

    assert_ne!(msg.try_into_bytes().unwrap().last(), Some(&0b11111111));
  }

  #[test]
  fn unsorted_options_fail() {
    let mut msg = Message::new(Type::Con, Code::GET, Id(0), Token::default());
    msg.opts = vec![Opt::new(OptNumber(12), 0u32), Opt::new(OptNumber(11), "a")];

    assert_eq!(msg.try_into_bytes(),
               Err(MessageToBytesError::OptionsNotSorted { prev: OptNumber(12),
                                                           next: OptNumber(11) }));
  }
}
