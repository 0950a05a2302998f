use ::core::convert::Infallible;

use embedded_time::duration::Milliseconds;

use crate::time::Millis;

/// A number of attempts
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attempts(pub u16);

/// Result of [`RetryTimer::what_should_i_do`].
///
/// This tells you if a retry should be attempted or not.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum YouShould {
  /// Attempts have been exhausted and the work that is
  /// being retried should be considered poisoned.
  Cry,
  /// A retry should be performed
  Retry,
}

/// A non-blocking timer for exponential-backoff retransmission,
/// that lives alongside some operation to retry.
///
/// The first deadline is `start + init`. Each retry doubles the
/// delay, measured from the moment the retry was granted:
/// with `init = 3` and 4 attempts, retries are granted after
/// waiting 3, 6, 12 and 24, and the timer gives up after a further 48.
///
/// It does not _contain_ the work to be done (e.g. `Box<fn()>`);
/// its owner keeps that alongside it.
///
/// ```
/// use embedded_time::duration::Milliseconds;
/// use newt::retry::{Attempts, RetryTimer, YouShould};
///
/// let mut retry = RetryTimer::new(Milliseconds(0), Milliseconds(3), Attempts(1));
///
/// assert_eq!(retry.what_should_i_do(Milliseconds(2)), Err(nb::Error::WouldBlock));
/// assert_eq!(retry.what_should_i_do(Milliseconds(3)), Ok(YouShould::Retry));
/// assert_eq!(retry.what_should_i_do(Milliseconds(8)), Err(nb::Error::WouldBlock));
/// assert_eq!(retry.what_should_i_do(Milliseconds(9)), Ok(YouShould::Cry));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryTimer {
  init: u64,
  next_attempt_at: u64,
  attempts: Attempts,
  max_attempts: Attempts,
}

impl RetryTimer {
  /// Create a new retrier
  pub fn new(Milliseconds(start): Millis, Milliseconds(init): Millis, max_attempts: Attempts) -> Self {
    Self { init,
           next_attempt_at: start.saturating_add(init),
           attempts: Attempts(0),
           max_attempts }
  }

  /// When the thing we keep trying has not succeeded, invoke this to
  /// tell the retrytimer "it hasn't worked yet! what do I do??"
  ///
  /// Returns `nb::Error::WouldBlock` when we have not yet
  /// waited the appropriate amount of time to retry.
  pub fn what_should_i_do(&mut self, Milliseconds(now): Millis) -> nb::Result<YouShould, Infallible> {
    if now < self.next_attempt_at {
      Err(nb::Error::WouldBlock)
    } else if self.attempts >= self.max_attempts {
      Ok(YouShould::Cry)
    } else {
      self.attempts.0 += 1;
      let delay = self.init
                      .saturating_mul(1u64 << (self.attempts.0 as u32).min(63));
      self.next_attempt_at = now.saturating_add(delay);
      Ok(YouShould::Retry)
    }
  }

  /// Time left until [`RetryTimer::what_should_i_do`] will stop blocking
  pub fn remaining(&self, Milliseconds(now): Millis) -> Millis {
    Milliseconds(self.next_attempt_at.saturating_sub(now))
  }

  /// Number of retries granted so far
  pub fn attempts(&self) -> Attempts {
    self.attempts
  }
}

#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn exponential_backoff() {
    let mut retry = RetryTimer::new(Milliseconds(0), Milliseconds(3), Attempts(4));
    let mut now = 0u64;
    let mut last = 0u64;
    let mut intervals = vec![];

    while retry.attempts() < Attempts(4) {
      now += 1;
      if retry.what_should_i_do(Milliseconds(now)) == Ok(YouShould::Retry) {
        intervals.push(now - last);
        last = now;
      }
    }

    assert_eq!(intervals, vec![3, 6, 12, 24]);
    assert_eq!(retry.remaining(Milliseconds(now)), Milliseconds(48u64));
    assert_eq!(retry.what_should_i_do(Milliseconds(now + 47)),
               Err(nb::Error::WouldBlock));
    assert_eq!(retry.what_should_i_do(Milliseconds(now + 48)),
               Ok(YouShould::Cry));
  }

  #[test]
  fn zero_attempts_gives_up_at_first_deadline() {
    let mut retry = RetryTimer::new(Milliseconds(10), Milliseconds(5), Attempts(0));
    assert_eq!(retry.remaining(Milliseconds(12)), Milliseconds(3u64));
    assert_eq!(retry.what_should_i_do(Milliseconds(14)),
               Err(nb::Error::WouldBlock));
    assert_eq!(retry.what_should_i_do(Milliseconds(15)), Ok(YouShould::Cry));
  }
}
