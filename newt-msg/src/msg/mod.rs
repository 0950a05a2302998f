use std_alloc::borrow::Cow;
use std_alloc::vec::Vec;

use newt_common::{Cursor, GetSize};

#[allow(unused_imports)]
use crate::TryIntoBytes;
use crate::from_bytes::{TryConsumeBytes, TryFromBytes};

/// Message Code
pub mod code;

/// Message parsing errors
pub mod parse_error;

/// Message ID
pub mod id;

/// Message Options
pub mod opt;

/// Message Type
pub mod ty;

/// Message Token
pub mod token;

/// Message Version
pub mod ver;

pub use code::*;
pub use id::*;
pub use opt::known::{Block, ContentFormat};
pub use opt::{is_integer_option, Opt, OptNumber, OptParseError, OptValue};
pub use parse_error::*;
pub use token::*;
pub use ty::*;
pub use ver::*;

use opt::known::no_repeat::{BLOCK1, BLOCK2, CONTENT_FORMAT};
use opt::known::repeat::{URI_PATH, URI_QUERY};

const PAYLOAD_MARKER: u8 = 0b11111111;

/// Message that will be sent or has been received;
/// the payload ("body") is borrowed from the receive buffer
/// when parsed, and owned when constructed.
///
/// See [RFC7252 - Message Details](https://datatracker.ietf.org/doc/html/rfc7252#section-3) for context
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
pub struct Payload<'a>(pub Cow<'a, [u8]>);

impl<'a> Payload<'a> {
  /// Payload bytes
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }

  /// Copy the payload if it is borrowed
  pub fn into_owned(self) -> Payload<'static> {
    Payload(Cow::Owned(self.0.into_owned()))
  }
}

impl<'a> From<&'a [u8]> for Payload<'a> {
  fn from(b: &'a [u8]) -> Self {
    Payload(Cow::Borrowed(b))
  }
}

impl From<Vec<u8>> for Payload<'static> {
  fn from(b: Vec<u8>) -> Self {
    Payload(Cow::Owned(b))
  }
}

/// Struct representing the first byte of a message.
///
/// ```text
/// CoAP version
/// |
/// |  Message type (request, response, empty)
/// |  |
/// |  |  Length of token, in bytes. (4-bit integer)
/// |  |  |
/// vv vv vvvv
/// 01 00 0000
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) struct Byte1 {
  pub(crate) ver: Version,
  pub(crate) ty: Type,
  pub(crate) tkl: u8,
}

impl From<u8> for Byte1 {
  fn from(b: u8) -> Self {
    let ver = b >> 6; // bits 0 & 1
    let ty = b >> 4 & 0b11; // bits 2 & 3
    let tkl = b & 0b1111u8; // last 4 bits

    Byte1 { ver: Version(ver),
            ty: Type::from(ty),
            tkl }
  }
}

/// The fixed-size part of a message; the 4-byte header and the token.
///
/// Useful when the rest of a datagram cannot be trusted
/// (e.g. it was truncated), but a reply must still be addressed.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Header {
  #[allow(missing_docs)]
  pub ver: Version,
  #[allow(missing_docs)]
  pub ty: Type,
  #[allow(missing_docs)]
  pub code: Code,
  #[allow(missing_docs)]
  pub id: Id,
  #[allow(missing_docs)]
  pub token: Token,
}

impl Header {
  /// Number of bytes the header & token occupy
  pub fn len(&self) -> usize {
    4 + self.token.0.len()
  }

  /// Never empty
  pub fn is_empty(&self) -> bool {
    false
  }
}

/// Parse and validate the header & token of a datagram
///
/// ```
/// use newt_msg::{parse_header, Code, Id, MessageParseError, Type};
///
/// let hdr = parse_header(&[0x41, 0x01, 0x00, 0x6B, 0xAA, 0xFF]).unwrap();
/// assert_eq!(hdr.ty, Type::Con);
/// assert_eq!(hdr.code, Code::GET);
/// assert_eq!(hdr.id, Id(107));
/// assert_eq!(hdr.token.as_bytes(), &[0xAA]);
///
/// assert_eq!(parse_header(&[0x81, 0x01, 0x00, 0x6B, 0xAA]),
///            Err(MessageParseError::InvalidVersion(2)));
/// assert_eq!(parse_header(&[0x49, 0x01, 0x00, 0x6B]),
///            Err(MessageParseError::InvalidTokenLength(9)));
/// assert_eq!(parse_header(&[0x42, 0x01, 0x00, 0x6B, 0xAA]),
///            Err(MessageParseError::UnexpectedEndOfStream));
/// ```
pub fn parse_header(bytes: &[u8]) -> Result<Header, MessageParseError> {
  Header::try_consume_bytes(&mut Cursor::new(bytes))
}

impl<Bytes: AsRef<[u8]>> TryConsumeBytes<Bytes> for Header {
  type Error = MessageParseError;

  fn try_consume_bytes(bytes: &mut Cursor<Bytes>) -> Result<Self, Self::Error> {
    let (byte1, code, id) = match bytes.take_exact(4) {
      | Some(&[b1, code, id0, id1]) => (Byte1::from(b1), Code::from(code), Id::from_be_bytes([id0, id1])),
      | _ => return Err(MessageParseError::eof()),
    };

    if byte1.ver != Version(1) {
      return Err(MessageParseError::InvalidVersion(byte1.ver.0));
    }

    if byte1.tkl > 8 {
      return Err(MessageParseError::InvalidTokenLength(byte1.tkl));
    }

    let token = bytes.take_exact(byte1.tkl as usize)
                     .and_then(Token::from_slice)
                     .ok_or_else(MessageParseError::eof)?;

    Ok(Header { ver: byte1.ver,
                ty: byte1.ty,
                code,
                id,
                token })
  }
}

/// # CoAP Messages
/// This struct provides a high-level API for manipulating requests & responses,
/// while still being cheaply serializable to & from the byte layout of CoAP messages on the wire.
///
/// ## Options
/// Options are kept sorted by [`OptNumber`]; repeated options keep the
/// order they were added in. Prefer [`Message::add_opt`] over pushing
/// to `opts` directly.
///
/// ## Constructing
/// ```
/// use newt_msg::{Code, Id, Message, Token, Type};
///
/// let mut req = Message::new(Type::Con, Code::GET, Id(1), Token::from_slice(&[1]).unwrap());
/// req.set_uri_path("3/0/1");
///
/// assert_eq!(req.uri_path().collect::<Vec<_>>(), vec![&b"3"[..], b"0", b"1"]);
/// ```
///
/// ## Sending
/// [`TryIntoBytes::try_into_bytes`]
///
/// ## Receiving
/// [`TryFromBytes::try_from_bytes`]
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Message<'a> {
  /// see [`Id`] for details
  pub id: Id,
  /// see [`Type`] for details
  pub ty: Type,
  /// see [`Version`] for details
  pub ver: Version,
  /// see [`Token`] for details
  pub token: Token,
  /// see [`Code`] for details
  pub code: Code,
  /// see [`Opt`] for details
  pub opts: Vec<Opt>,
  /// see [`Payload`]
  pub payload: Payload<'a>,
}

impl<'a> Message<'a> {
  /// Create a message with no options and no payload
  pub fn new(ty: Type, code: Code, id: Id, token: Token) -> Message<'static> {
    Message { id,
              ty,
              ver: Version::default(),
              token,
              code,
              opts: Vec::new(),
              payload: Payload::default() }
  }

  /// Create an empty Acknowledgement for this message
  ///
  /// ```
  /// use newt_msg::{Code, Id, Message, Token, Type};
  ///
  /// let req = Message::new(Type::Con, Code::GET, Id(1), Token::from_slice(&[1]).unwrap());
  /// let ack = req.ack();
  ///
  /// assert_eq!(ack.ty, Type::Ack);
  /// assert_eq!(ack.id, Id(1));
  /// assert_eq!(ack.code, Code::EMPTY);
  /// assert!(ack.token.0.is_empty());
  /// ```
  pub fn ack(&self) -> Message<'static> {
    Message::new(Type::Ack, Code::EMPTY, self.id, Token::default())
  }

  /// Create an empty Reset for this message
  pub fn reset(&self) -> Message<'static> {
    Message::new(Type::Reset, Code::EMPTY, self.id, Token::default())
  }

  /// Copy the payload if it is borrowed
  pub fn into_owned(self) -> Message<'static> {
    Message { id: self.id,
              ty: self.ty,
              ver: self.ver,
              token: self.token,
              code: self.code,
              opts: self.opts,
              payload: self.payload.into_owned() }
  }

  /// The header & token of this message
  pub fn header(&self) -> Header {
    Header { ver: self.ver,
             ty: self.ty,
             code: self.code,
             id: self.id,
             token: self.token }
  }

  /// See [`Code::kind`]
  pub fn is_request(&self) -> bool {
    self.code.kind() == CodeKind::Request
  }

  /// See [`Code::kind`]
  pub fn is_response(&self) -> bool {
    self.code.kind() == CodeKind::Response
  }

  /// See [`Code::kind`]
  pub fn is_empty(&self) -> bool {
    self.code.kind() == CodeKind::Empty
  }

  /// Insert an option, after any options with the same number
  ///
  /// ```
  /// use newt_msg::opt::known::no_repeat::CONTENT_FORMAT;
  /// use newt_msg::opt::known::repeat::URI_PATH;
  /// use newt_msg::{Code, Id, Message, Opt, Token, Type};
  ///
  /// let mut msg = Message::new(Type::Non, Code::PUT, Id(1), Token::default());
  /// msg.add_opt(Opt::new(CONTENT_FORMAT, 0u32));
  /// msg.add_opt(Opt::new(URI_PATH, "a"));
  /// msg.add_opt(Opt::new(URI_PATH, "b"));
  ///
  /// let nums = msg.opts.iter().map(|o| o.number.0).collect::<Vec<_>>();
  /// assert_eq!(nums, vec![11, 11, 12]);
  /// assert_eq!(msg.uri_path().collect::<Vec<_>>(), vec![&b"a"[..], b"b"]);
  /// ```
  pub fn add_opt(&mut self, opt: Opt) {
    let ix = self.opts.partition_point(|o| o.number <= opt.number);
    self.opts.insert(ix, opt);
  }

  /// Replace all values of an option with a single value
  pub fn set_opt(&mut self, opt: Opt) {
    self.remove(opt.number);
    self.add_opt(opt);
  }

  /// Iterate over every value of an option
  pub fn get(&self, number: OptNumber) -> impl Iterator<Item = &OptValue> {
    self.opts
        .iter()
        .filter(move |o| o.number == number)
        .map(|o| &o.value)
  }

  /// Get the first value of an option
  pub fn get_first(&self, number: OptNumber) -> Option<&OptValue> {
    self.get(number).next()
  }

  /// Get the first value of an option as an integer
  pub fn get_int(&self, number: OptNumber) -> Option<u32> {
    self.get_first(number).and_then(OptValue::as_int)
  }

  /// Remove every value of an option, yielding the number removed
  pub fn remove(&mut self, number: OptNumber) -> usize {
    let before = self.opts.len();
    self.opts.retain(|o| o.number != number);
    before - self.opts.len()
  }

  /// Replace the Uri-Path options with the `/`-separated segments of `path`
  ///
  /// Empty segments (leading, trailing or doubled slashes) are skipped.
  pub fn set_uri_path(&mut self, path: &str) {
    self.remove(URI_PATH);
    path.split('/')
        .filter(|seg| !seg.is_empty())
        .for_each(|seg| self.add_opt(Opt::new(URI_PATH, seg)));
  }

  /// Iterate over Uri-Path segments
  pub fn uri_path(&self) -> impl Iterator<Item = &[u8]> {
    self.get(URI_PATH).filter_map(OptValue::as_bytes)
  }

  /// Append a Uri-Query argument
  pub fn add_uri_query(&mut self, query: &str) {
    self.add_opt(Opt::new(URI_QUERY, query));
  }

  /// Iterate over Uri-Query arguments
  pub fn uri_query(&self) -> impl Iterator<Item = &[u8]> {
    self.get(URI_QUERY).filter_map(OptValue::as_bytes)
  }

  /// Get the Content-Format of the payload
  pub fn content_format(&self) -> Option<ContentFormat> {
    self.get_int(CONTENT_FORMAT)
        .and_then(|n| u16::try_from(n).ok())
        .map(ContentFormat::from)
  }

  /// Set the Content-Format of the payload
  pub fn set_content_format(&mut self, format: ContentFormat) {
    self.set_opt(Opt::new(CONTENT_FORMAT, u16::from(format) as u32));
  }

  /// Get the Block1 option
  pub fn block1(&self) -> Option<Block> {
    self.get_int(BLOCK1).map(Block::from)
  }

  /// Get the Block2 option
  pub fn block2(&self) -> Option<Block> {
    self.get_int(BLOCK2).map(Block::from)
  }

  /// Set the payload
  pub fn set_payload(&mut self, payload: impl Into<Payload<'a>>) {
    self.payload = payload.into();
  }
}

impl<'a> GetSize for Message<'a> {
  fn get_size(&self) -> usize {
    let header_size = 4;
    let payload_size = match self.payload.0.len() {
      | 0 => 0,
      | n => n + 1,
    };
    let token_size = self.token.0.len();
    let opts_size = opt::serialized_length(&self.opts);

    header_size + payload_size + token_size + opts_size
  }
}

impl<'a> TryFromBytes<&'a [u8]> for Message<'a> {
  type Error = MessageParseError;

  fn try_from_bytes(bytes: &'a [u8]) -> Result<Self, Self::Error> {
    let mut cur = Cursor::new(bytes);

    let Header { ver,
                 ty,
                 code,
                 id,
                 token, } = Header::try_consume_bytes(&mut cur)?;
    let opts = Vec::<Opt>::try_consume_bytes(&mut cur)?;

    let payload = match cur.next() {
      | None => Payload::default(),
      | Some(PAYLOAD_MARKER) if cur.is_exhausted() => return Err(MessageParseError::EmptyPayload),
      | Some(PAYLOAD_MARKER) => Payload::from(&bytes[cur.position()..]),
      | Some(_) => return Err(MessageParseError::MissingPayloadMarker),
    };

    Ok(Message { id,
                 ty,
                 ver,
                 code,
                 token,
                 opts,
                 payload })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::to_bytes::TryIntoBytes;

  #[test]
  fn parse_msg() {
    let (expect, msg) = crate::test_msg();
    assert_eq!(Message::try_from_bytes(&msg[..]).unwrap(), expect)
  }

  #[test]
  fn payload_is_borrowed() {
    let (_, bytes) = crate::test_msg();
    let msg = Message::try_from_bytes(&bytes[..]).unwrap();
    assert!(matches!(msg.payload.0, Cow::Borrowed(_)));
    assert_eq!(msg.payload.as_bytes(), b"hello, world!");
  }

  #[test]
  fn parse_byte1() {
    let byte = 0b_01_10_0011u8;
    let byte = Byte1::from(byte);
    assert_eq!(byte,
               Byte1 { ver: Version(1),
                       ty: Type::Ack,
                       tkl: 3 })
  }

  #[test]
  fn parse_minimal_get() {
    let bytes = [0x40, 0x01, 0x00, 0x6B];
    let msg = Message::try_from_bytes(&bytes[..]).unwrap();
    assert_eq!(msg.ty, Type::Con);
    assert_eq!(msg.code, Code::GET);
    assert_eq!(msg.id, Id(107));
    assert!(msg.token.0.is_empty());
    assert!(msg.opts.is_empty());
    assert!(msg.payload.0.is_empty());
  }

  #[test]
  fn empty_payload_after_marker_is_rejected() {
    let bytes = [0x40, 0x01, 0x00, 0x6B, 0xFF];
    assert_eq!(Message::try_from_bytes(&bytes[..]),
               Err(MessageParseError::EmptyPayload));
  }

  #[test]
  fn single_byte_payload() {
    let bytes = [0x40, 0x01, 0x00, 0x6B, 0xFF, 0x2A];
    let msg = Message::try_from_bytes(&bytes[..]).unwrap();
    assert_eq!(msg.payload.as_bytes(), &[0x2A]);
  }

  #[test]
  fn truncated_options_are_an_error() {
    let bytes = [0x40, 0x01, 0x00, 0x6B, 0b1011_0100, b'a'];
    assert_eq!(Message::try_from_bytes(&bytes[..]),
               Err(MessageParseError::OptParseError(OptParseError::UnexpectedEndOfStream)));
    assert_eq!(Message::try_from_bytes(&bytes[..]).unwrap_err().code(),
               Code::REQUEST_ENTITY_TOO_LARGE);
    assert!(parse_header(&bytes).is_ok());
  }

  #[test]
  fn round_trip() {
    let mut msg = Message::new(Type::Non,
                               Code::CONTENT,
                               Id(9),
                               Token::from_slice(&[1, 2, 3]).unwrap());
    msg.set_uri_path("/3303/0/5700");
    msg.add_uri_query("ep=dev");
    msg.set_content_format(ContentFormat::LwM2mTlv);
    msg.add_opt(Opt::new(opt::known::no_repeat::BLOCK2, u32::from(Block::new(1, false, 6))));
    msg.set_payload(b"21.5".to_vec());

    let bytes = msg.clone().try_into_bytes().unwrap();
    assert_eq!(bytes.len(), msg.get_size());

    let parsed = Message::try_from_bytes(&bytes[..]).unwrap();
    assert_eq!(parsed, msg);
    assert_eq!(parsed.content_format(), Some(ContentFormat::LwM2mTlv));
    assert_eq!(parsed.block2().map(|b| (b.num(), b.size())), Some((1, 1024)));
    assert_eq!(parsed.uri_query().collect::<Vec<_>>(), vec![&b"ep=dev"[..]]);
  }

  #[test]
  fn option_accessors() {
    let mut msg = Message::new(Type::Con, Code::GET, Id(1), Token::default());
    msg.set_uri_path("a/b");
    msg.set_uri_path("c");
    assert_eq!(msg.uri_path().collect::<Vec<_>>(), vec![&b"c"[..]]);
    assert_eq!(msg.remove(URI_PATH), 1);
    assert_eq!(msg.get_first(URI_PATH), None);
    assert_eq!(msg.content_format(), None);
  }
}
