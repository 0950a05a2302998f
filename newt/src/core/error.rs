use newt_msg::{Code, Id, MessageParseError, MessageToBytesError};

use super::PeerId;
use crate::net::ConnectionType;

/// The context that an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum When {
  /// We were creating a peer
  Connecting,
  /// We were tearing down a peer
  Disconnecting(PeerId),
  /// We were sending a message
  SendingMessage(PeerId, Id),
  /// We were receiving a message
  Receiving(PeerId),
  /// We were generating a token
  GeneratingToken(PeerId),
  /// We were checking retransmission deadlines
  Polling,
}

impl When {
  /// Construct a specific error from the context the error occurred in
  pub fn what(self, what: What) -> Error {
    Error { when: self, what }
  }
}

/// An error encounterable from within the [`Context`](super::Context)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
  /// What happened?
  pub what: What,
  /// What were we doing when it happened?
  pub when: When,
}

impl Error {
  /// The response code that best describes this error
  ///
  /// ```
  /// use newt::msg::Code;
  /// use newt::{What, When};
  ///
  /// assert_eq!(When::Connecting.what(What::ClockError).code(),
  ///            Code::INTERNAL_SERVER_ERROR);
  /// ```
  pub fn code(&self) -> Code {
    self.what.code()
  }

  /// Is this error `FromBytes`?
  pub fn message_parse_error(&self) -> Option<&MessageParseError> {
    match self.what {
      | What::FromBytes(ref e) => Some(e),
      | _ => None,
    }
  }
}

/// A contextless error with some additional debug data attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum What {
  /// The peer does not exist (it may have been deleted by a callback)
  NoSuchPeer(PeerId),
  /// Only [`ConnectionType::Udp`] is supported
  NotImplemented(ConnectionType),
  /// The session failed to connect, send or receive
  ///
  /// (the session's error is logged)
  SessionError,
  /// The session could not accept a datagram right now
  SessionBusy,
  /// Parsing a message from bytes failed
  FromBytes(MessageParseError),
  /// Serializing a message to bytes failed
  ToBytes(MessageToBytesError),
  /// A message was larger than the session's MTU
  #[allow(missing_docs)]
  TooLarge { size: usize, mtu: usize },
  /// The peer already has [`Config::max_exchanges`](crate::config::Config::max_exchanges)
  /// requests awaiting responses
  TooManyExchanges,
  /// The clock failed to provide timing.
  ///
  /// See [`embedded_time::clock::Error`]
  ClockError,
}

impl What {
  /// The response code that best describes this error
  pub fn code(&self) -> Code {
    match self {
      | What::NotImplemented(_) => Code::NOT_IMPLEMENTED,
      | What::NoSuchPeer(_)
      | What::SessionError
      | What::SessionBusy
      | What::TooManyExchanges => Code::SERVICE_UNAVAILABLE,
      | What::FromBytes(e) => e.code(),
      | What::ToBytes(_) => Code::BAD_REQUEST,
      | What::TooLarge { .. } => Code::REQUEST_ENTITY_TOO_LARGE,
      | What::ClockError => Code::INTERNAL_SERVER_ERROR,
    }
  }
}
