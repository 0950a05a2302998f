use newt_msg::Code;

use crate::Uri;

/// Errors encounterable while encoding or decoding LwM2M data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// The payload is not valid in its content format
  /// (a TLV header or value ran past the end of the buffer,
  /// or a plain text payload was not UTF-8)
  Malformed,
  /// A TLV element appeared where LwM2M does not allow it,
  /// e.g. an Object Instance inside an Object Instance
  IllegalNesting,
  /// A TLV value is longer than a 24-bit length can express
  TooLarge(usize),
  /// A path was not `/object/instance/resource/resource-instance`,
  /// or did not name enough levels for what was asked of it
  InvalidUri,
  /// The content format is not TLV, plain text or opaque
  UnsupportedContentFormat(u16),
  /// The value at this path does not fit the declared type of its resource
  NotAcceptable(Uri),
  /// The resource at this path has no declared type
  NotFound(Uri),
}

impl Error {
  /// The response code that best describes this error
  ///
  /// ```
  /// use newt_lwm2m::{Error, Uri};
  /// use newt_msg::Code;
  ///
  /// assert_eq!(Error::NotAcceptable(Uri::default()).code(), Code::NOT_ACCEPTABLE);
  /// ```
  pub fn code(&self) -> Code {
    match self {
      | Self::Malformed | Self::IllegalNesting | Self::InvalidUri => Code::BAD_REQUEST,
      | Self::TooLarge(_) => Code::REQUEST_ENTITY_TOO_LARGE,
      | Self::UnsupportedContentFormat(_) => Code::UNSUPPORTED_CONTENT_FORMAT,
      | Self::NotAcceptable(_) => Code::NOT_ACCEPTABLE,
      | Self::NotFound(_) => Code::NOT_FOUND,
    }
  }
}
