use embedded_time::duration::Milliseconds;

/// A duration, in milliseconds
pub type Millis = Milliseconds<u64>;

/// Supertrait of [`embedded_time::Clock`] pinning the
/// type of "ticks" to u64
pub trait Clock: embedded_time::Clock<T = u64> {}
impl<C: embedded_time::Clock<T = u64>> Clock for C {}

/// Milliseconds elapsed since the clock's epoch,
/// or `None` if the clock failed.
///
/// ```
/// use embedded_time::duration::Milliseconds;
///
/// let clock = newt::std::Clock::new();
/// let Milliseconds(now) = newt::time::since_epoch(&clock).unwrap();
/// assert!(now < 1_000);
/// ```
pub fn since_epoch<C: Clock>(clock: &C) -> Option<Millis> {
  clock.try_now()
       .ok()
       .and_then(|now| Millis::try_from(now.duration_since_epoch()).ok())
}
