use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use newt_msg::ContentFormat;
use std_alloc::string::{String, ToString};
use std_alloc::vec::Vec;

use crate::{consolidate, text, tlv, Data, Error, LwM2mType, Uri, Value, TARGET};

/// Content format used when a request does not ask for one
pub const DEFAULT_FORMAT: ContentFormat = ContentFormat::LwM2mTlv;

/// The single resource in `data`, if that is all there is
fn single(data: &[Data]) -> Option<&Data> {
  match data {
    | [d] if d.uri.resource_id.is_some() => Some(d),
    | _ => None,
  }
}

/// Plain text of a value, `Ok(None)` if it has no text form
fn value_to_text(d: &Data) -> Result<Option<String>, Error> {
  let text = match &d.value {
    | Value::Integer(n) | Value::Time(n) => text::int_to_text(*n, false),
    | Value::UnsignedInteger(n) => n.to_string(),
    | Value::Float(f) => text::float_to_text(*f).ok_or(Error::NotAcceptable(d.uri))?,
    | Value::Boolean(b) => text::bool_to_text(*b).into(),
    | Value::ObjectLink { object_id,
                          instance_id, } => text::object_link_to_text(*object_id, *instance_id),
    | Value::Opaque(b) => STANDARD.encode(b),
    | Value::String(s) | Value::CoreLink(s) => s.clone(),
    | Value::Undefined(_) | Value::UriOnly => return Ok(None),
  };

  Ok(Some(text))
}

/// Encode `data`, read from `base`, as `format`.
///
/// Plain text and opaque can only carry a single resource (opaque
/// only an opaque one); when `data` doesn't fit them it is encoded as TLV instead.
/// The format actually used is returned alongside the payload.
///
/// ```
/// use newt_lwm2m::{serialize, Data, Uri, Value};
/// use newt_msg::ContentFormat;
///
/// let res = Uri::object(3).instance(0).resource(9);
/// let data = [Data::new(res, Value::Integer(87))];
/// let (format, bytes) = serialize(res, &data, ContentFormat::Text).unwrap();
///
/// assert_eq!(format, ContentFormat::Text);
/// assert_eq!(bytes, b"87".to_vec());
/// ```
pub fn serialize(base: Uri,
                 data: &[Data],
                 format: ContentFormat)
                 -> Result<(ContentFormat, Vec<u8>), Error> {
  let fallback = |format: ContentFormat| {
    log::debug!(target: TARGET,
                "{:?} can't carry {} values under {}; using {:?}",
                format,
                data.len(),
                base,
                DEFAULT_FORMAT);
    tlv::serialize(base, data).map(|bytes| (DEFAULT_FORMAT, bytes))
  };

  match format {
    | ContentFormat::LwM2mTlv => tlv::serialize(base, data).map(|bytes| (format, bytes)),
    | ContentFormat::Text => match single(data).map(value_to_text).transpose()?.flatten() {
      | Some(text) => Ok((format, text.into_bytes())),
      | None => fallback(format),
    },
    | ContentFormat::OctetStream => match single(data).map(|d| &d.value) {
      | Some(Value::Opaque(bytes)) => Ok((format, bytes.clone())),
      | _ => fallback(format),
    },
    | other => Err(Error::UnsupportedContentFormat(other.into())),
  }
}

/// Decode a `format` payload read from `base`, then [`consolidate`] it
/// using `type_lookup`.
///
/// Plain text and opaque payloads are the value of `base`, which must name a resource.
pub fn deserialize(buf: &[u8],
                   format: ContentFormat,
                   base: Uri,
                   type_lookup: impl FnMut(u16, u16) -> Option<LwM2mType>)
                   -> Result<Vec<Data>, Error> {
  let value_of_base = |value: Value| match base.resource_id {
    | Some(_) => Ok(Vec::from([Data::new(base, value)])),
    | None => Err(Error::InvalidUri),
  };

  let mut data = match format {
    | ContentFormat::LwM2mTlv => tlv::deserialize(buf, base)?,
    | ContentFormat::Text => {
      let text = ::core::str::from_utf8(buf).map_err(|_| Error::Malformed)?;
      value_of_base(Value::String(text.into()))?
    },
    | ContentFormat::OctetStream => value_of_base(Value::Opaque(buf.to_vec()))?,
    | other => return Err(Error::UnsupportedContentFormat(other.into())),
  };

  consolidate(&mut data, type_lookup)?;
  Ok(data)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn init_logging() {
    simple_logger::SimpleLogger::new().with_level(log::LevelFilter::Trace)
                                      .init()
                                      .ok();
  }

  fn res() -> Uri {
    Uri::object(3).instance(0).resource(1)
  }

  fn types(_: u16, r: u16) -> Option<LwM2mType> {
    match r {
      | 0 => Some(LwM2mType::String),
      | 1 => Some(LwM2mType::Float),
      | 2 => Some(LwM2mType::Opaque),
      | 3 => Some(LwM2mType::Boolean),
      | 4 => Some(LwM2mType::Integer),
      | _ => None,
    }
  }

  #[test]
  fn text() {
    let data = [Data::new(res(), Value::Float(2.5))];
    assert_eq!(serialize(res(), &data, ContentFormat::Text),
               Ok((ContentFormat::Text, b"2.5".to_vec())));

    assert_eq!(deserialize(b"2.5", ContentFormat::Text, res(), types),
               Ok(data.to_vec()));
  }

  #[test]
  fn text_opaque_is_base64() {
    let res = Uri::object(3).instance(0).resource(2);
    let data = [Data::new(res, Value::Opaque(b"hi".to_vec()))];

    assert_eq!(serialize(res, &data, ContentFormat::Text),
               Ok((ContentFormat::Text, b"aGk=".to_vec())));
    assert_eq!(deserialize(b"aGk=", ContentFormat::Text, res, types),
               Ok(data.to_vec()));
  }

  #[test]
  fn text_float_into_integer() {
    let res = Uri::object(3).instance(0).resource(4);
    assert_eq!(deserialize(b"2.0000003", ContentFormat::Text, res, types),
               Ok(vec![Data::new(res, Value::Integer(2))]));
    assert_eq!(deserialize(b"2.6", ContentFormat::Text, res, types),
               Err(Error::NotAcceptable(res)));
  }

  #[test]
  fn text_needs_resource() {
    let inst = Uri::object(3).instance(0);
    assert_eq!(deserialize(b"1", ContentFormat::Text, inst, types),
               Err(Error::InvalidUri));
    assert_eq!(deserialize(&[0xC3, 0x28], ContentFormat::Text, res(), types),
               Err(Error::Malformed));
  }

  #[test]
  fn nan_has_no_text() {
    let data = [Data::new(res(), Value::Float(f64::NAN))];
    assert_eq!(serialize(res(), &data, ContentFormat::Text),
               Err(Error::NotAcceptable(res())));
  }

  #[test]
  fn opaque() {
    let res = Uri::object(3).instance(0).resource(2);
    let data = [Data::new(res, Value::Opaque(vec![0, 1, 2]))];

    assert_eq!(serialize(res, &data, ContentFormat::OctetStream),
               Ok((ContentFormat::OctetStream, vec![0, 1, 2])));
    assert_eq!(deserialize(&[0, 1, 2], ContentFormat::OctetStream, res, types),
               Ok(data.to_vec()));

    // not an opaque resource
    assert_eq!(deserialize(&[1], ContentFormat::OctetStream, res.resource(3), types),
               Err(Error::NotAcceptable(res.resource(3))));
  }

  #[test]
  fn downgrades_to_tlv() {
    init_logging();

    let inst = Uri::object(3).instance(0);
    let data = [Data::new(inst.resource(3), Value::Boolean(true)),
                Data::new(inst.resource(4), Value::Integer(-1))];

    let tlv = vec![0b11_0_00_001, 3, 1, 0b11_0_00_001, 4, 0xFF];
    assert_eq!(serialize(inst, &data, ContentFormat::Text),
               Ok((ContentFormat::LwM2mTlv, tlv.clone())));
    assert_eq!(serialize(inst, &data[..1], ContentFormat::OctetStream),
               Ok((ContentFormat::LwM2mTlv, tlv[..3].to_vec())));

    assert_eq!(deserialize(&tlv, ContentFormat::LwM2mTlv, inst, types),
               Ok(data.to_vec()));
  }

  #[test]
  fn unsupported_format() {
    assert_eq!(serialize(res(), &[], ContentFormat::Json),
               Err(Error::UnsupportedContentFormat(50)));
    assert_eq!(deserialize(&[], ContentFormat::Other(1), res(), types),
               Err(Error::UnsupportedContentFormat(1)));
  }

  #[test]
  fn undeclared_resource() {
    let inst = Uri::object(3).instance(0);
    assert_eq!(deserialize(&[0b11_0_00_001, 9, 1], ContentFormat::LwM2mTlv, inst, types),
               Err(Error::NotFound(inst.resource(9))));
  }

  #[test]
  fn tlv_nesting() {
    let inst = Uri::object(3).instance(0);
    assert_eq!(deserialize(&[0b00_0_00_000, 1], ContentFormat::LwM2mTlv, inst, types),
               Err(Error::IllegalNesting));
    assert_eq!(deserialize(&[0b01_0_00_001, 0, 1], ContentFormat::LwM2mTlv, inst, types),
               Err(Error::IllegalNesting));
  }
}
