use core::fmt::Display;
use core::ops::{Deref, DerefMut};

use tinyvec::ArrayVec;

/// A writeable byte buffer
///
/// (allows using `write!` and `format!` without allocations)
///
/// ```
/// use core::fmt::Write as _;
///
/// use newt_common::Writable;
///
/// let mut faux_string = Writable::from(tinyvec::ArrayVec::<[u8; 16]>::new());
/// write!(faux_string, "{}", 123).unwrap();
///
/// assert_eq!(faux_string.as_str(), "123");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Writable<A: tinyvec::Array<Item = u8>>(ArrayVec<A>);

impl<A: tinyvec::Array<Item = u8>> Writable<A> {
  /// Attempt to read the data in the buffer
  /// as a UTF8 string slice.
  ///
  /// Yields an empty string if a write was cut off
  /// in the middle of a multi-byte character.
  pub fn as_str(&self) -> &str {
    core::str::from_utf8(&self.0).unwrap_or_default()
  }

  /// Get the collection wrapped by this `Writable`
  pub fn unwrap(self) -> ArrayVec<A> {
    self.0
  }
}

impl<A> Display for Writable<A> where A: tinyvec::Array<Item = u8>
{
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl<A: tinyvec::Array<Item = u8>> From<ArrayVec<A>> for Writable<A> {
  fn from(a: ArrayVec<A>) -> Self {
    Self(a)
  }
}

impl<A: tinyvec::Array<Item = u8>> Deref for Writable<A> {
  type Target = ArrayVec<A>;

  fn deref(&self) -> &ArrayVec<A> {
    &self.0
  }
}

impl<A: tinyvec::Array<Item = u8>> DerefMut for Writable<A> {
  fn deref_mut(&mut self) -> &mut ArrayVec<A> {
    &mut self.0
  }
}

impl<A: tinyvec::Array<Item = u8>> AsRef<str> for Writable<A> {
  fn as_ref(&self) -> &str {
    self.as_str()
  }
}

impl<A: tinyvec::Array<Item = u8>> core::fmt::Write for Writable<A> {
  fn write_str(&mut self, s: &str) -> core::fmt::Result {
    if self.0.capacity() < self.0.len() + s.len() {
      Err(core::fmt::Error)
    } else {
      self.0.extend(s.bytes());
      Ok(())
    }
  }
}

#[cfg(test)]
mod tests {
  use core::fmt::Write;

  use super::*;

  #[test]
  fn overflow_is_an_error() {
    let mut w = Writable::from(ArrayVec::<[u8; 4]>::new());
    assert!(write!(w, "abcd").is_ok());
    assert!(write!(w, "e").is_err());
    assert_eq!(w.as_str(), "abcd");
  }
}
