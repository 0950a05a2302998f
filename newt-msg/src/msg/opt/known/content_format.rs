/// Content-Format
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentFormat {
  /// `text/plain; charset=utf-8`
  Text,
  /// `application/link-format`
  LinkFormat,
  /// `application/xml`
  Xml,
  /// `application/octet-stream`
  OctetStream,
  /// `application/exi`
  Exi,
  /// `application/json`
  Json,
  /// `application/cbor`
  Cbor,
  /// `application/vnd.oma.lwm2m+tlv`
  LwM2mTlv,
  /// `application/vnd.oma.lwm2m+json`
  LwM2mJson,
  /// Another content format
  Other(u16),
}

impl ContentFormat {
  /// Convert this content format to the CoAP byte value
  pub fn bytes(&self) -> [u8; 2] {
    u16::from(self).to_be_bytes()
  }
}

impl<'a> From<&'a ContentFormat> for u16 {
  fn from(f: &'a ContentFormat) -> Self {
    use ContentFormat::*;
    match *f {
      | Text => 0,
      | LinkFormat => 40,
      | Xml => 41,
      | OctetStream => 42,
      | Exi => 47,
      | Json => 50,
      | Cbor => 60,
      | LwM2mTlv => 11542,
      | LwM2mJson => 11543,
      | Other(n) => n,
    }
  }
}

impl From<ContentFormat> for u16 {
  fn from(f: ContentFormat) -> Self {
    (&f).into()
  }
}

impl From<u16> for ContentFormat {
  fn from(n: u16) -> Self {
    use ContentFormat::*;
    match n {
      | 0 => Text,
      | 40 => LinkFormat,
      | 41 => Xml,
      | 42 => OctetStream,
      | 47 => Exi,
      | 50 => Json,
      | 60 => Cbor,
      | 11542 => LwM2mTlv,
      | 11543 => LwM2mJson,
      | n => Other(n),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn known_formats_round_trip_through_u16() {
    [0u16, 40, 41, 42, 47, 50, 60, 11542, 11543].into_iter()
                                                .for_each(|n| {
                                                  let f = ContentFormat::from(n);
                                                  assert!(!matches!(f, ContentFormat::Other(_)));
                                                  assert_eq!(u16::from(f), n);
                                                });

    assert_eq!(ContentFormat::from(1541), ContentFormat::Other(1541));
    assert_eq!(ContentFormat::LwM2mTlv.bytes(), [0x2D, 0x16]);
  }
}
