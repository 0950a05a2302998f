use core::fmt;
use core::str::FromStr;

use newt_msg::Message;
use std_alloc::string::ToString;

use crate::Error;

/// Path to an LwM2M object, object instance, resource or resource instance.
///
/// Levels below the first unset one are always unset.
/// 65535 is reserved by LwM2M and is never a valid id.
///
/// ```
/// use newt_lwm2m::Uri;
///
/// let uri: Uri = "/3/0/7".parse().unwrap();
/// assert_eq!(uri.object_id, Some(3));
/// assert_eq!(uri.instance_id, Some(0));
/// assert_eq!(uri.resource_id, Some(7));
/// assert_eq!(uri.resource_instance_id, None);
/// assert_eq!(uri.to_string(), "/3/0/7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Uri {
  #[allow(missing_docs)]
  pub object_id: Option<u16>,
  #[allow(missing_docs)]
  pub instance_id: Option<u16>,
  #[allow(missing_docs)]
  pub resource_id: Option<u16>,
  #[allow(missing_docs)]
  pub resource_instance_id: Option<u16>,
}

impl Uri {
  /// The root path `/`
  pub const ROOT: Uri = Uri { object_id: None,
                              instance_id: None,
                              resource_id: None,
                              resource_instance_id: None };

  /// Path to an object
  pub fn object(object_id: u16) -> Self {
    Self { object_id: Some(object_id),
           ..Self::ROOT }
  }

  /// Path to an instance of this object
  pub fn instance(self, instance_id: u16) -> Self {
    Self { instance_id: Some(instance_id),
           ..self }
  }

  /// Path to a resource of this instance
  pub fn resource(self, resource_id: u16) -> Self {
    Self { resource_id: Some(resource_id),
           ..self }
  }

  /// Path to an instance of this resource
  pub fn resource_instance(self, resource_instance_id: u16) -> Self {
    Self { resource_instance_id: Some(resource_instance_id),
           ..self }
  }

  /// Number of levels that are set
  pub fn depth(&self) -> usize {
    self.ids().count()
  }

  /// Does this path name `other` or something above it?
  ///
  /// ```
  /// use newt_lwm2m::Uri;
  ///
  /// let inst: Uri = "/3/0".parse().unwrap();
  /// assert!(inst.contains(&"/3/0/1".parse().unwrap()));
  /// assert!(!inst.contains(&"/3/1/1".parse().unwrap()));
  /// ```
  pub fn contains(&self, other: &Uri) -> bool {
    self.ids().zip(other.ids().map(Some).chain(core::iter::repeat(None)))
        .all(|(a, b)| Some(a) == b)
  }

  fn ids(&self) -> impl Iterator<Item = u16> {
    [self.object_id,
     self.instance_id,
     self.resource_id,
     self.resource_instance_id].into_iter()
                               .map_while(|id| id)
  }

  /// Build a path from its segments, e.g. the Uri-Path options of a request
  pub fn from_segments<'a>(segments: impl IntoIterator<Item = &'a [u8]>) -> Result<Self, Error> {
    let mut ids = [None; 4];
    let mut n = 0;

    for seg in segments.into_iter().filter(|s| !s.is_empty()) {
      let slot = ids.get_mut(n).ok_or(Error::InvalidUri)?;
      let id = core::str::from_utf8(seg).ok()
                                        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
                                        .and_then(|s| s.parse::<u16>().ok())
                                        .filter(|id| *id != u16::MAX)
                                        .ok_or(Error::InvalidUri)?;
      *slot = Some(id);
      n += 1;
    }

    let [object_id, instance_id, resource_id, resource_instance_id] = ids;
    Ok(Self { object_id,
              instance_id,
              resource_id,
              resource_instance_id })
  }

  /// The path a request is addressed to
  pub fn from_message(msg: &Message<'_>) -> Result<Self, Error> {
    Self::from_segments(msg.uri_path())
  }

  /// Address a message to this path, replacing its Uri-Path
  ///
  /// ```
  /// use newt_lwm2m::Uri;
  /// use newt_msg::{Code, Id, Message, Token, Type};
  ///
  /// let mut req = Message::new(Type::Con, Code::GET, Id(1), Token::default());
  /// Uri::object(3).instance(0).resource(1).set_message_path(&mut req);
  ///
  /// assert_eq!(Uri::from_message(&req), Ok("/3/0/1".parse().unwrap()));
  /// ```
  pub fn set_message_path(&self, msg: &mut Message<'_>) {
    msg.set_uri_path(&self.to_string());
  }
}

impl FromStr for Uri {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Error> {
    let s = s.strip_prefix('/').unwrap_or(s);
    let s = s.strip_suffix('/').unwrap_or(s);

    if s.is_empty() {
      return Ok(Self::ROOT);
    }

    let segments = s.split('/').map(str::as_bytes);
    if segments.clone().any(|seg| seg.is_empty()) {
      return Err(Error::InvalidUri);
    }

    Self::from_segments(segments)
  }
}

impl fmt::Display for Uri {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.object_id.is_none() {
      return f.write_str("/");
    }

    self.ids().try_for_each(|id| write!(f, "/{}", id))
  }
}

#[cfg(test)]
mod tests {
  use newt_msg::{Code, Id, Token, Type};

  use super::*;

  #[test]
  fn parse() {
    assert_eq!("/".parse::<Uri>(), Ok(Uri::ROOT));
    assert_eq!("".parse::<Uri>(), Ok(Uri::ROOT));
    assert_eq!("3".parse::<Uri>(), Ok(Uri::object(3)));
    assert_eq!("/3/0/".parse::<Uri>(), Ok(Uri::object(3).instance(0)));
    assert_eq!("/3/0/7/1".parse::<Uri>(),
               Ok(Uri::object(3).instance(0).resource(7).resource_instance(1)));
  }

  #[test]
  fn parse_rejects() {
    for bad in ["/3//1", "/a", "/3/0/1/2/3", "/65535", "/70000", "/-1", "/+1"] {
      assert_eq!(bad.parse::<Uri>(), Err(Error::InvalidUri), "{}", bad);
    }
  }

  #[test]
  fn display() {
    assert_eq!(Uri::ROOT.to_string(), "/");
    assert_eq!(Uri::object(1).instance(2).to_string(), "/1/2");
  }

  #[test]
  fn depth() {
    assert_eq!(Uri::ROOT.depth(), 0);
    assert_eq!(Uri::object(3).instance(0).resource(1).depth(), 3);
  }

  #[test]
  fn message_path() {
    let mut msg = Message::new(Type::Con, Code::GET, Id(1), Token::default());
    Uri::object(5).instance(0).resource(3).set_message_path(&mut msg);

    assert_eq!(msg.uri_path().collect::<Vec<_>>(),
               vec![&b"5"[..], b"0", b"3"]);

    Uri::ROOT.set_message_path(&mut msg);
    assert_eq!(msg.uri_path().count(), 0);
    assert_eq!(Uri::from_message(&msg), Ok(Uri::ROOT));
  }
}
