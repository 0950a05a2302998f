use ::core::fmt;

use newt_msg::Token;

use super::Callback;
use crate::net::Session;
use crate::time::Clock;

/// A request we sent that is waiting for a response
pub(crate) struct Exchange<C: Clock, S: Session> {
  pub(crate) token: Token,
  pub(crate) callback: Callback<C, S>,
}

impl<C: Clock, S: Session> fmt::Debug for Exchange<C, S> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Exchange")
     .field("token", &self.token)
     .finish_non_exhaustive()
  }
}

/// Add 1 to a big-endian counter, wrapping on overflow
pub(crate) fn increment(bytes: &mut [u8]) {
  for b in bytes.iter_mut().rev() {
    let (n, carry) = b.overflowing_add(1);
    *b = n;
    if !carry {
      break;
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn increment_carries() {
    let mut bs = [0x00, 0xFF];
    increment(&mut bs);
    assert_eq!(bs, [0x01, 0x00]);

    let mut bs = [0xFF, 0xFF];
    increment(&mut bs);
    assert_eq!(bs, [0x00, 0x00]);

    let mut bs: [u8; 0] = [];
    increment(&mut bs);
  }
}
