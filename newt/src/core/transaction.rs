use ::core::fmt;

use newt_msg::{Id, Token};
use std_alloc::vec::Vec;

use super::Callback;
use crate::net::Session;
use crate::retry::RetryTimer;
use crate::time::Clock;

/// What to do when a Confirmable message is acknowledged,
/// reset, or never acknowledged
pub(crate) enum Completion<C: Clock, S: Session> {
  /// Nobody is waiting
  None,
  /// Invoke a callback
  Callback(Callback<C, S>),
  /// The message is a request with a pending [`Exchange`](super::exchange::Exchange);
  /// a reset or abandoned transaction resolves that exchange
  Exchange(Token),
}

impl<C: Clock, S: Session> fmt::Debug for Completion<C, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::None => f.write_str("None"),
      | Self::Callback(_) => f.write_str("Callback(..)"),
      | Self::Exchange(t) => f.debug_tuple("Exchange").field(t).finish(),
    }
  }
}

/// A Confirmable message we sent that has not been acknowledged
pub(crate) struct Transaction<C: Clock, S: Session> {
  pub(crate) id: Id,
  /// Sent again unchanged on every retransmission
  pub(crate) bytes: Vec<u8>,
  pub(crate) timer: RetryTimer,
  pub(crate) completion: Completion<C, S>,
}

impl<C: Clock, S: Session> fmt::Debug for Transaction<C, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Transaction")
     .field("id", &self.id)
     .field("len", &self.bytes.len())
     .field("timer", &self.timer)
     .field("completion", &self.completion)
     .finish()
  }
}

/// An ACK or RST we sent, replayed when the message it answered arrives again
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AckEntry {
  pub(crate) id: Id,
  pub(crate) bytes: Vec<u8>,
  /// Millis since the clock's epoch
  pub(crate) expires_at: u64,
}
