use embedded_time::rate::Fraction;

mod net;
pub use net::UdpSession;

/// Implement [`embedded_time::Clock`] using [`std::time`] primitives
#[derive(Debug, Clone, Copy)]
pub struct Clock(::std::time::Instant);

impl Default for Clock {
  fn default() -> Self {
    Self::new()
  }
}

impl Clock {
  /// Create a new clock; its epoch is now
  pub fn new() -> Self {
    Self(::std::time::Instant::now())
  }
}

impl embedded_time::Clock for Clock {
  type T = u64;

  // microseconds
  const SCALING_FACTOR: Fraction = Fraction::new(1, 1_000_000);

  fn try_now(&self) -> Result<embedded_time::Instant<Self>, embedded_time::clock::Error> {
    let elapsed = ::std::time::Instant::now().duration_since(self.0);
    Ok(embedded_time::Instant::new(elapsed.as_micros() as u64))
  }
}

#[cfg(test)]
mod tests {
  use embedded_time::duration::Milliseconds;

  use super::*;

  #[test]
  fn clock_is_monotonic() {
    let clock = Clock::new();
    let Milliseconds(a) = crate::time::since_epoch(&clock).unwrap();
    ::std::thread::sleep(::std::time::Duration::from_millis(5));
    let Milliseconds(b) = crate::time::since_epoch(&clock).unwrap();

    assert!(b >= a + 5);
  }
}
