use newt_common::Cursor;
use std_alloc::vec::Vec;
use tinyvec::ArrayVec;

use crate::from_bytes::TryConsumeBytes;
use crate::to_bytes::MessageToBytesError;

#[allow(missing_docs)]
pub mod parse_error;
pub use parse_error::*;

/// Well-known option numbers, content formats and block values
pub mod known;

/// The largest value length an option header can describe
pub const MAX_OPT_VALUE_LEN: usize = u16::MAX as usize + 269;

const PAYLOAD_MARKER: u8 = 0b11111111;

pub(crate) fn parse_opt_len_or_delta<A: AsRef<[u8]>>(head: u8,
                                                     bytes: &mut Cursor<A>,
                                                     reserved_err: OptParseError)
                                                     -> Result<u32, OptParseError> {
  match head {
    | 13 => {
      let n = bytes.next().ok_or_else(OptParseError::eof)?;
      Ok((n as u32) + 13)
    },
    | 14 => match bytes.take_exact(2) {
      | Some(&[a, b]) => Ok(u16::from_be_bytes([a, b]) as u32 + 269),
      | _ => Err(OptParseError::eof()),
    },
    | 15 => Err(reserved_err),
    | _ => Ok(head as u32),
  }
}

/// Split a delta or length into its header nibble and extension bytes.
///
/// Callers must ensure `val` is at most [`MAX_OPT_VALUE_LEN`].
pub(crate) fn opt_len_or_delta(val: usize) -> (u8, ArrayVec<[u8; 2]>) {
  match val {
    | n if n >= 269 => {
      let mut bytes = ArrayVec::new();
      bytes.extend(((n - 269) as u16).to_be_bytes());
      (14, bytes)
    },
    | n if n >= 13 => {
      let mut bytes = ArrayVec::new();
      bytes.push((n - 13) as u8);
      (13, bytes)
    },
    | n => (n as u8, ArrayVec::new()),
  }
}

fn ext_len(val: usize) -> usize {
  match val {
    | n if n >= 269 => 2,
    | n if n >= 13 => 1,
    | _ => 0,
  }
}

/// Whether options of this number carry an unsigned integer
/// (as opposed to a string or opaque bytes).
///
/// ```
/// use newt_msg::opt::known::no_repeat::{CONTENT_FORMAT, URI_HOST};
/// use newt_msg::opt::is_integer_option;
///
/// assert!(is_integer_option(CONTENT_FORMAT));
/// assert!(!is_integer_option(URI_HOST));
/// ```
pub fn is_integer_option(number: OptNumber) -> bool {
  use known::no_repeat::*;

  [OBSERVE,
   URI_PORT,
   CONTENT_FORMAT,
   MAX_AGE,
   ACCEPT,
   BLOCK2,
   BLOCK1,
   SIZE2,
   SIZE1,
   NO_RESPONSE].contains(&number)
}

/// # Option Numbers
/// Identifies which option is being set (e.g. Content-Format has a Number of 12).
///
/// On the wire only the difference from the previous option's number
/// (the "delta") is written; see [RFC7252 - Option Format](https://datatracker.ietf.org/doc/html/rfc7252#section-3.1).
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct OptNumber(pub u16);

/// Whether an option must be understood by the recipient
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum OptionMustBeProcessed {
  /// This option must be processed,
  /// and a response that ignores it
  /// will be rejected.
  ///
  /// Corresponds to the option being "critical"
  /// in strict CoAP terms
  Yes,
  /// This option does not _need_ to
  /// be processed,
  /// and a response that ignores it
  /// will be processed anyway.
  ///
  /// Corresponds to the option being "elective"
  /// in strict CoAP terms
  No,
}

/// Whether a proxy that doesn't understand an option may forward it
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum WhenOptionUnsupportedByProxy {
  /// This option /must be/ processed & understood by proxies
  /// and may not be forwarded blindly to their destination.
  ///
  /// Corresponds to the option being "UnSafe" to forward
  /// in strict CoAP terms
  Error,
  /// This option may not be processed & understood by proxies
  /// and may be forwarded blindly to their destination.
  ///
  /// Corresponds to the option being "SafeToForward"
  /// in strict CoAP terms
  Forward,
}

impl OptNumber {
  /// Whether or not this option may be ignored by a server
  pub fn must_be_processed(&self) -> OptionMustBeProcessed {
    match self.0 & 0b1 {
      | 1 => OptionMustBeProcessed::Yes,
      | _ => OptionMustBeProcessed::No,
    }
  }

  /// Whether or not this option may be forwarded blindly by
  /// a proxy that does not support processing it
  pub fn when_unsupported_by_proxy(&self) -> WhenOptionUnsupportedByProxy {
    match (self.0 & 0b10) >> 1 {
      | 1 => WhenOptionUnsupportedByProxy::Error,
      | _ => WhenOptionUnsupportedByProxy::Forward,
    }
  }
}

/// # Option Value
/// Either a minimal big-endian unsigned integer or an opaque byte string
/// (UTF-8 strings are stored as bytes).
///
/// Which one a parsed option gets is decided by [`is_integer_option`].
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum OptValue {
  /// Unsigned integer, encoded with leading zero bytes stripped
  /// (0 encodes as an empty value)
  Int(u32),
  /// Opaque bytes or a string
  Bytes(Vec<u8>),
}

impl Default for OptValue {
  fn default() -> Self {
    Self::Bytes(Vec::new())
  }
}

impl OptValue {
  /// Number of bytes this value occupies on the wire
  ///
  /// ```
  /// use newt_msg::OptValue;
  ///
  /// assert_eq!(OptValue::Int(0).len(), 0);
  /// assert_eq!(OptValue::Int(255).len(), 1);
  /// assert_eq!(OptValue::Int(256).len(), 2);
  /// assert_eq!(OptValue::Int(0x01_00_00_00).len(), 4);
  /// assert_eq!(OptValue::Bytes(b"abc".to_vec()).len(), 3);
  /// ```
  pub fn len(&self) -> usize {
    match self {
      | Self::Int(n) => 4 - (n.leading_zeros() / 8) as usize,
      | Self::Bytes(b) => b.len(),
    }
  }

  /// Is this value encoded with zero bytes?
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Interpret this value as an unsigned integer
  ///
  /// Byte values of up to 4 bytes are read big-endian.
  pub fn as_int(&self) -> Option<u32> {
    match self {
      | Self::Int(n) => Some(*n),
      | Self::Bytes(b) if b.len() <= 4 => Some(b.iter().fold(0u32, |n, b| (n << 8) | *b as u32)),
      | Self::Bytes(_) => None,
    }
  }

  /// Get the bytes of a non-integer value
  pub fn as_bytes(&self) -> Option<&[u8]> {
    match self {
      | Self::Bytes(b) => Some(b),
      | Self::Int(_) => None,
    }
  }

  fn extend_bytes(&self, bytes: &mut Vec<u8>) {
    match self {
      | Self::Int(n) => bytes.extend_from_slice(&n.to_be_bytes()[4 - self.len()..]),
      | Self::Bytes(b) => bytes.extend_from_slice(b),
    }
  }
}

impl From<u32> for OptValue {
  fn from(n: u32) -> Self {
    Self::Int(n)
  }
}

impl From<Vec<u8>> for OptValue {
  fn from(b: Vec<u8>) -> Self {
    Self::Bytes(b)
  }
}

impl<'a> From<&'a str> for OptValue {
  fn from(s: &'a str) -> Self {
    Self::Bytes(s.as_bytes().to_vec())
  }
}

/// # CoAP Option
/// An option number and its value.
///
/// In a message options are kept ordered by number. Repeatable options
/// (e.g. Uri-Path segments) appear once per value, in order.
///
/// ## Binary format
/// ```text
///   0   1   2   3   4   5   6   7
/// +---------------+---------------+
/// |  Option Delta | Option Length |   1 byte
/// +---------------+---------------+
/// /         Option Delta          /   0-2 bytes
/// \          (extended)           \
/// +-------------------------------+
/// /         Option Length         /   0-2 bytes
/// \          (extended)           \
/// +-------------------------------+
/// /         Option Value          /   0 or more bytes
/// +-------------------------------+
/// ```
#[derive(Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Opt {
  /// See [`OptNumber`]
  pub number: OptNumber,
  /// See [`OptValue`]
  pub value: OptValue,
}

impl Opt {
  /// Create a new option
  pub fn new(number: OptNumber, value: impl Into<OptValue>) -> Self {
    Self { number,
           value: value.into() }
  }

  /// Number of bytes this option occupies when it follows an option numbered `prev`
  ///
  /// ```
  /// use newt_msg::{Opt, OptNumber};
  ///
  /// assert_eq!(Opt::new(OptNumber(1), vec![1u8]).serialized_length(OptNumber(0)), 2);
  /// assert_eq!(Opt::new(OptNumber(24), vec![1u8]).serialized_length(OptNumber(0)), 3);
  /// assert_eq!(Opt::new(OptNumber(300), Vec::<u8>::new()).serialized_length(OptNumber(0)), 3);
  /// assert_eq!(Opt::new(OptNumber(12), 0u32).serialized_length(OptNumber(11)), 1);
  /// ```
  pub fn serialized_length(&self, prev: OptNumber) -> usize {
    let delta = self.number.0.saturating_sub(prev.0) as usize;
    let len = self.value.len();
    1 + ext_len(delta) + ext_len(len) + len
  }

  /// Append this option's bytes (header, extensions, value) to `bytes`
  pub(crate) fn extend_bytes(&self, prev: OptNumber, bytes: &mut Vec<u8>) {
    let (del, del_bytes) = opt_len_or_delta((self.number.0 - prev.0) as usize);
    let (len, len_bytes) = opt_len_or_delta(self.value.len());

    bytes.push((del << 4) | len);
    bytes.extend_from_slice(&del_bytes);
    bytes.extend_from_slice(&len_bytes);
    self.value.extend_bytes(bytes);
  }
}

/// Number of bytes a sorted list of options occupies on the wire
pub fn serialized_length(opts: &[Opt]) -> usize {
  opts.iter()
      .fold((OptNumber(0), 0), |(prev, size), opt| {
        (opt.number, size + opt.serialized_length(prev))
      })
      .1
}

/// Serialize a list of options, yielding the number of bytes written.
///
/// Options must be sorted by number.
pub fn serialize(opts: &[Opt], bytes: &mut Vec<u8>) -> Result<usize, MessageToBytesError> {
  let start = bytes.len();
  let mut prev = OptNumber(0);

  for opt in opts {
    if opt.number < prev {
      bytes.truncate(start);
      return Err(MessageToBytesError::OptionsNotSorted { prev,
                                                         next: opt.number });
    }

    if opt.value.len() > MAX_OPT_VALUE_LEN {
      bytes.truncate(start);
      return Err(MessageToBytesError::OptionValueTooLong { number: opt.number,
                                                           len: opt.value.len() });
    }

    opt.extend_bytes(prev, bytes);
    prev = opt.number;
  }

  Ok(bytes.len() - start)
}

/// Parse options until the payload marker or the end of `bytes`,
/// yielding the options and the number of bytes consumed.
///
/// The payload marker is not consumed.
///
/// ```
/// use newt_msg::opt::parse;
/// use newt_msg::{Opt, OptNumber};
///
/// let (opts, consumed) = parse(&[0b1011_0010, b'h', b'i', 0xFF, 0]).unwrap();
/// assert_eq!(opts, vec![Opt::new(OptNumber(11), "hi")]);
/// assert_eq!(consumed, 3);
/// ```
pub fn parse(bytes: &[u8]) -> Result<(Vec<Opt>, usize), OptParseError> {
  let mut cur = Cursor::new(bytes);
  let opts = Vec::<Opt>::try_consume_bytes(&mut cur)?;
  Ok((opts, cur.position()))
}

fn consume_opt<A: AsRef<[u8]>>(prev: OptNumber, bytes: &mut Cursor<A>) -> Result<Opt, OptParseError> {
  let byte1 = match bytes.peek_exact(1) {
    | None | Some(&[PAYLOAD_MARKER]) => Err(OptParseError::OptionsExhausted),
    | Some(_) => bytes.next().ok_or(OptParseError::OptionsExhausted),
  }?;

  // NOTE: Delta **MUST** be consumed before Value Length, their extended bytes are written in that order
  let delta = parse_opt_len_or_delta(byte1 >> 4,
                                     bytes,
                                     OptParseError::OptionDeltaReservedValue(15))?;

  let len = parse_opt_len_or_delta(byte1 & 0b00001111,
                                   bytes,
                                   OptParseError::ValueLengthReservedValue(15))?
            as usize;

  let number = prev.0 as u32 + delta;
  let number = u16::try_from(number).map(OptNumber)
                                    .map_err(|_| OptParseError::OptionNumberOverflow(number))?;

  let value = bytes.take_exact(len).ok_or_else(OptParseError::eof)?;

  let value = if is_integer_option(number) {
    if len > 4 {
      return Err(OptParseError::IntegerValueTooLong { number, len });
    }

    OptValue::Int(value.iter().fold(0u32, |n, b| (n << 8) | *b as u32))
  } else {
    OptValue::Bytes(value.to_vec())
  };

  Ok(Opt { number, value })
}

impl<Bytes: AsRef<[u8]>> TryConsumeBytes<Bytes> for Vec<Opt> {
  type Error = OptParseError;

  fn try_consume_bytes(bytes: &mut Cursor<Bytes>) -> Result<Self, Self::Error> {
    let mut opts = Vec::new();

    loop {
      let prev = opts.last().map(|o: &Opt| o.number).unwrap_or_default();
      match consume_opt(prev, bytes) {
        | Ok(opt) => opts.push(opt),
        | Err(OptParseError::OptionsExhausted) => break Ok(opts),
        | Err(e) => break Err(e),
      }
    }
  }
}
