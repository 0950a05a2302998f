//! Low-level representation of CoAP messages.
//!
//! The most notable item in `newt_msg` is [`Message`];
//! a CoAP message very close to the actual byte layout.
//!
//! ## Allocation
//! Options and option values live in `Vec`s, the token is a fixed
//! 8-byte [`tinyvec::ArrayVec`], and the payload is a
//! [`Cow`](std_alloc::borrow::Cow) so that parsing can lend it straight
//! out of the receive buffer.
//!
//! ```
//! use newt_msg::{Code, Message, TryFromBytes, TryIntoBytes, Type};
//!
//! let bytes = [0x40, 0x01, 0x00, 0x6B];
//! let msg = Message::try_from_bytes(&bytes[..]).unwrap();
//!
//! assert_eq!(msg.ty, Type::Con);
//! assert_eq!(msg.code, Code::GET);
//! assert_eq!(msg.id.0, 107);
//! assert!(msg.token.0.is_empty());
//!
//! assert_eq!(msg.try_into_bytes().unwrap(), bytes.to_vec());
//! ```

// x-release-please-start-version
#![doc(html_root_url = "https://docs.rs/newt-msg/0.3.0")]
// x-release-please-end
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code, missing_copy_implementations))]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
#![deny(missing_docs)]

extern crate alloc as std_alloc;

#[doc(hidden)]
pub mod from_bytes;
#[doc(hidden)]
pub mod msg;
#[doc(hidden)]
pub mod to_bytes;

#[doc(inline)]
pub use from_bytes::TryFromBytes;
#[doc(inline)]
pub use msg::*;
#[doc(inline)]
pub use to_bytes::{MessageToBytesError, TryIntoBytes};

#[cfg(test)]
pub(crate) fn test_msg() -> (Message<'static>, Vec<u8>) {
  let header: [u8; 4] = 0b0100_0001_0100_0101_0000_0000_0000_0001_u32.to_be_bytes();
  let token: [u8; 1] = [254u8];
  let path: &[u8] = b"sensors_humidity";
  let options: [&[u8]; 2] = [&[0b_1011_1101u8, 0b00000011u8], path];
  let payload: [&[u8]; 2] = [&[0b1111_1111_u8], b"hello, world!"];
  let bytes = [header.as_ref(),
               token.as_ref(),
               options.concat().as_ref(),
               payload.concat().as_ref()].concat();

  let msg = Message { id: Id(1),
                      ty: Type::Con,
                      ver: Version(1),
                      token: Token(tinyvec::array_vec!([u8; 8] => 254)),
                      opts: vec![Opt { number: OptNumber(11),
                                       value: OptValue::Bytes(path.to_vec()) }],
                      code: Code { class: 2,
                                   detail: 5 },
                      payload: Payload::from(b"hello, world!".to_vec()) };
  (msg, bytes)
}

#[cfg(test)]
pub(crate) mod tests {
  /// Assert two values are equal, printing them in binary on failure
  #[macro_export]
  macro_rules! assert_eqb {
    ($actual:expr, $expected:expr) => {
      if $actual != $expected {
        panic!("expected {:08b} to equal {:08b}", $actual, $expected)
      }
    };
  }

  /// Assert two byte iterables are equal, printing them in binary on failure
  #[macro_export]
  macro_rules! assert_eqb_iter {
    ($actual:expr, $expected:expr) => {
      if $actual.iter().ne($expected.iter()) {
        panic!("expected {:?} to equal {:?}",
               $actual.into_iter()
                      .map(|b| format!("{:08b}", b))
                      .collect::<Vec<_>>(),
               $expected.into_iter()
                        .map(|b| format!("{:08b}", b))
                        .collect::<Vec<_>>())
      }
    };
  }
}
