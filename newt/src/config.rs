use embedded_time::duration::Milliseconds;
use newt_msg::Id;

use crate::retry::Attempts;
use crate::time::Millis;

/// Runtime config
///
/// The defaults are the transmission parameters of
/// [RFC7252 section 4.8](https://datatracker.ietf.org/doc/html/rfc7252#section-4.8)
/// without the random factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
  /// How long to wait for an ACK before the first retransmission
  /// of a Confirmable message. Each retransmission doubles the wait.
  ///
  /// Defaults to 2 seconds.
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use newt::config::Config;
  ///
  /// assert_eq!(Config::default().ack_timeout, Milliseconds(2_000u64));
  /// ```
  #[cfg_attr(feature = "serde", serde(with = "millis"))]
  pub ack_timeout: Millis,

  /// Number of times a Confirmable message is retransmitted
  /// before its sender is told the peer is unavailable.
  ///
  /// Defaults to 4.
  /// ```
  /// use newt::config::Config;
  /// use newt::retry::Attempts;
  ///
  /// assert_eq!(Config::default().max_retransmit, Attempts(4));
  /// ```
  pub max_retransmit: Attempts,

  /// How long an ACK or RST we sent is remembered, so that
  /// duplicates of the message it answered get the same answer.
  ///
  /// Defaults to `ack_timeout * (2^(max_retransmit + 1) - 1) * 1.5`
  /// (93 seconds):
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use newt::config::Config;
  ///
  /// assert_eq!(Config::default().max_transmit_wait, Milliseconds(93_000u64));
  /// ```
  #[cfg_attr(feature = "serde", serde(with = "millis"))]
  pub max_transmit_wait: Millis,

  /// Length of tokens generated for outbound requests
  ///
  /// Defaults to 4 bytes.
  /// ```
  /// use newt::config::Config;
  ///
  /// assert_eq!(Config::default().token_len, 4);
  /// ```
  pub token_len: u8,

  /// Maximum number of requests per peer that may be
  /// waiting for a response at once. Sending past this fails with 5.03.
  ///
  /// Exchanges for NON requests, and for CON requests the peer acknowledged
  /// with an empty ACK, never time out. They end on a response or when the
  /// peer is deleted, so a peer that stops answering can hold every slot.
  ///
  /// Defaults to 32.
  /// ```
  /// use newt::config::Config;
  ///
  /// assert_eq!(Config::default().max_exchanges, 32);
  /// ```
  pub max_exchanges: usize,

  /// The message ID a new peer starts counting from
  ///
  /// Defaults to 107.
  /// ```
  /// use newt::config::Config;
  /// use newt::msg::Id;
  ///
  /// assert_eq!(Config::default().first_message_id, Id(107));
  /// ```
  pub first_message_id: Id,
}

impl Config {
  /// `ack_timeout * (2^(retransmits + 1) - 1) * 1.5`
  pub fn transmit_wait(ack_timeout: Millis, retransmits: Attempts) -> Millis {
    let Milliseconds(ack_timeout) = ack_timeout;
    let factor = (1u64 << (retransmits.0 as u32 + 1).min(63)) - 1;
    Milliseconds(ack_timeout.saturating_mul(factor).saturating_mul(3) / 2)
  }

  /// Time from the first transmission of a Confirmable message
  /// to its last retransmission:
  /// `ack_timeout * (2^max_retransmit - 1) * 1.5`
  ///
  /// ```
  /// use embedded_time::duration::Milliseconds;
  /// use newt::config::Config;
  ///
  /// assert_eq!(Config::default().max_transmit_span(), Milliseconds(45_000u64));
  /// ```
  pub fn max_transmit_span(&self) -> Millis {
    let Milliseconds(ack_timeout) = self.ack_timeout;
    let factor = (1u64 << (self.max_retransmit.0 as u32).min(63)) - 1;
    Milliseconds(ack_timeout.saturating_mul(factor).saturating_mul(3) / 2)
  }
}

impl Default for Config {
  fn default() -> Self {
    let ack_timeout = Milliseconds(2_000);
    let max_retransmit = Attempts(4);

    Config { ack_timeout,
             max_retransmit,
             max_transmit_wait: Config::transmit_wait(ack_timeout, max_retransmit),
             token_len: 4,
             max_exchanges: 32,
             first_message_id: Id(107) }
  }
}

#[cfg(feature = "serde")]
mod millis {
  use serde::{Deserialize, Deserializer, Serializer};

  use crate::time::Millis;

  pub(super) fn serialize<S: Serializer>(ms: &Millis, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(ms.0)
  }

  pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Millis, D::Error> {
    u64::deserialize(d).map(embedded_time::duration::Milliseconds)
  }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
  use super::*;

  #[test]
  fn serde_round_trip() {
    let cfg = Config { token_len: 8,
                       ..Config::default() };
    let json = serde_json::to_string(&cfg).unwrap();
    assert!(json.contains("\"ack_timeout\":2000"));
    assert_eq!(serde_json::from_str::<Config>(&json).unwrap(), cfg);
  }
}
