use crate::{Code, OptNumber};

/// Errors encounterable while parsing an option from bytes
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Eq, Ord)]
pub enum OptParseError {
  /// An option header claimed more bytes than were left in the message
  UnexpectedEndOfStream,

  /// Option Delta was set to 15, which is invalid.
  OptionDeltaReservedValue(u8),

  /// Value Length was set to 15, which is invalid.
  ValueLengthReservedValue(u8),

  /// The sum of deltas overflowed a 16-bit option number
  OptionNumberOverflow(u32),

  /// An integer-valued option was longer than 4 bytes
  #[allow(missing_docs)]
  IntegerValueTooLong { number: OptNumber, len: usize },

  /// Not a true failure case; only means we tried to read the payload marker byte (0xFF)
  /// as an option header.
  OptionsExhausted,
}

impl OptParseError {
  /// Shorthand for [`OptParseError::UnexpectedEndOfStream`]
  pub fn eof() -> Self {
    Self::UnexpectedEndOfStream
  }

  /// The response code that best describes this failure
  pub fn code(&self) -> Code {
    match self {
      | Self::UnexpectedEndOfStream => Code::REQUEST_ENTITY_TOO_LARGE,
      | Self::IntegerValueTooLong { .. } => Code::INTERNAL_SERVER_ERROR,
      | Self::OptionDeltaReservedValue(_)
      | Self::ValueLengthReservedValue(_)
      | Self::OptionNumberOverflow(_)
      | Self::OptionsExhausted => Code::BAD_REQUEST,
    }
  }
}
