#[allow(unused_imports)]
use crate::Token;

/// # Message ID
///
/// 16-bit unsigned integer in network byte order.  Used to
/// detect message duplication and to match messages of type
/// Acknowledgement/Reset to messages of type Confirmable/Non-
/// confirmable.  The rules for generating a Message ID and matching
/// messages are defined in RFC7252 Section 4
///
/// For a little more context and the difference between [`Id`] and [`Token`], see [`Token`].
///
/// See [RFC7252 - Message Details](https://datatracker.ietf.org/doc/html/rfc7252#section-3) for context
#[derive(Copy, Clone, Hash, PartialEq, PartialOrd, Debug, Eq, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Id(pub u16);

impl Id {
  /// Create an Id from a big-endian 2-byte unsigned int
  pub fn from_be_bytes(bs: [u8; 2]) -> Self {
    Self(u16::from_be_bytes(bs))
  }

  /// The id following this one, wrapping around
  /// and never yielding 0.
  ///
  /// ```
  /// use newt_msg::Id;
  ///
  /// assert_eq!(Id(107).next(), Id(108));
  /// assert_eq!(Id(u16::MAX).next(), Id(1));
  /// ```
  pub fn next(&self) -> Self {
    match self.0.wrapping_add(1) {
      | 0 => Id(1),
      | n => Id(n),
    }
  }
}
