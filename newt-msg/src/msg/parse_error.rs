use super::opt::OptParseError;
use crate::Code;

/// Errors encounterable while parsing a message from bytes
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum MessageParseError {
  /// Reached end of stream before parsing was finished
  UnexpectedEndOfStream,

  /// Version bits were not 1
  InvalidVersion(u8),

  /// Token length was > 8
  InvalidTokenLength(u8),

  /// Error parsing option
  OptParseError(OptParseError),

  /// Bytes following the options did not start with the payload marker (0xFF)
  MissingPayloadMarker,

  /// Payload marker was present, but nothing followed it
  EmptyPayload,
}

impl MessageParseError {
  /// Shorthand for [`MessageParseError::UnexpectedEndOfStream`]
  pub fn eof() -> Self {
    Self::UnexpectedEndOfStream
  }

  /// The response code that best describes this failure
  ///
  /// ```
  /// use newt_msg::{Code, MessageParseError, OptParseError};
  ///
  /// assert_eq!(MessageParseError::eof().code(), Code::BAD_REQUEST);
  /// assert_eq!(MessageParseError::OptParseError(OptParseError::UnexpectedEndOfStream).code(),
  ///            Code::REQUEST_ENTITY_TOO_LARGE);
  /// ```
  pub fn code(&self) -> Code {
    match self {
      | Self::OptParseError(e) => e.code(),
      | Self::UnexpectedEndOfStream
      | Self::InvalidVersion(_)
      | Self::InvalidTokenLength(_)
      | Self::MissingPayloadMarker
      | Self::EmptyPayload => Code::BAD_REQUEST,
    }
  }
}

impl From<OptParseError> for MessageParseError {
  fn from(e: OptParseError) -> Self {
    Self::OptParseError(e)
  }
}
