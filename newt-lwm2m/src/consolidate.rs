use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std_alloc::string::String;
use std_alloc::vec::Vec;

use crate::text;
use crate::{Data, Error, LwM2mType, Uri, Value};

/// Coerce every value into the declared type of its resource.
///
/// `type_lookup(object_id, resource_id)` yields the declared type;
/// `None` rejects the data with [`Error::NotFound`].
/// Elements without a value ([`Value::UriOnly`]) are left alone.
///
/// On error, the contents of `data` are unspecified and must be discarded.
pub fn consolidate(data: &mut [Data],
                   mut type_lookup: impl FnMut(u16, u16) -> Option<LwM2mType>)
                   -> Result<(), Error> {
  for d in data.iter_mut() {
    if matches!(d.value, Value::UriOnly) {
      continue;
    }

    let (object_id, resource_id) = match (d.uri.object_id, d.uri.resource_id) {
      | (Some(o), Some(r)) => (o, r),
      | _ => return Err(Error::InvalidUri),
    };

    let ty = type_lookup(object_id, resource_id).ok_or(Error::NotFound(d.uri))?;
    let value = ::core::mem::replace(&mut d.value, Value::UriOnly);
    d.value = coerce(value, ty, d.uri)?;
  }

  Ok(())
}

fn abs(f: f64) -> f64 {
  if f < 0.0 {
    -f
  } else {
    f
  }
}

/// The integer nearest a float, if the float is within
/// `min(max(|f| / 2^20, ε), 0.5)` of it
pub(crate) fn float_to_int(f: f64) -> Option<i64> {
  // i64::MIN and MAX as f64 are ±2^63; MAX itself is out of range
  if !f.is_finite() || f >= 9_223_372_036_854_775_808.0 || f < -9_223_372_036_854_775_808.0 {
    return None;
  }

  let trunc = f as i64;
  let frac = f - trunc as f64;
  let nearest = match frac {
    | x if x >= 0.5 => trunc.checked_add(1)?,
    | x if x <= -0.5 => trunc.checked_sub(1)?,
    | _ => trunc,
  };

  let tolerance = (abs(f) / (1u64 << 20) as f64).max(f64::EPSILON).min(0.5);
  match abs(f - nearest as f64) <= tolerance {
    | true => Some(nearest),
    | false => None,
  }
}

fn int_from_be(bytes: &[u8]) -> Option<i64> {
  match bytes.len() {
    | 1 => Some(i8::from_be_bytes([bytes[0]]) as i64),
    | 2 => Some(i16::from_be_bytes([bytes[0], bytes[1]]) as i64),
    | 4 => Some(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as i64),
    | 8 => {
      let mut b = [0u8; 8];
      b.copy_from_slice(bytes);
      Some(i64::from_be_bytes(b))
    },
    | _ => None,
  }
}

fn float_from_be(bytes: &[u8]) -> Option<f64> {
  match bytes.len() {
    | 4 => Some(f32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as f64),
    | 8 => {
      let mut b = [0u8; 8];
      b.copy_from_slice(bytes);
      Some(f64::from_be_bytes(b))
    },
    | _ => None,
  }
}

/// Decode the bytes of a TLV resource as `ty`
fn from_tlv(bytes: Vec<u8>, ty: LwM2mType) -> Option<Value> {
  match ty {
    | LwM2mType::String => String::from_utf8(bytes).ok().map(Value::String),
    | LwM2mType::CoreLink => String::from_utf8(bytes).ok().map(Value::CoreLink),
    | LwM2mType::Opaque => Some(Value::Opaque(bytes)),
    | LwM2mType::Integer => int_from_be(&bytes).map(Value::Integer),
    | LwM2mType::Time => int_from_be(&bytes).map(Value::Time),
    | LwM2mType::UnsignedInteger => int_from_be(&bytes).and_then(|n| u64::try_from(n).ok())
                                                       .map(Value::UnsignedInteger),
    | LwM2mType::Float => float_from_be(&bytes).map(Value::Float),
    | LwM2mType::Boolean => match bytes.as_slice() {
      | [0] => Some(Value::Boolean(false)),
      | [1] => Some(Value::Boolean(true)),
      | _ => None,
    },
    | LwM2mType::ObjectLink => match bytes.as_slice() {
      | [a, b, c, d] => Some(Value::ObjectLink { object_id: u16::from_be_bytes([*a, *b]),
                                                 instance_id: u16::from_be_bytes([*c, *d]) }),
      | _ => None,
    },
  }
}

/// Parse plain text as `ty`
fn from_text(s: String, ty: LwM2mType) -> Option<Value> {
  let b = s.as_bytes();
  // integers may be written as floats, e.g. "2.0000003"
  let int = || text::text_to_int(b).or_else(|| text::text_to_float(b).and_then(float_to_int));

  match ty {
    | LwM2mType::Integer => int().map(Value::Integer),
    | LwM2mType::Time => int().map(Value::Time),
    | LwM2mType::UnsignedInteger => {
      text::text_to_uint(b).or_else(|| {
                             text::text_to_float(b).and_then(float_to_int)
                                                   .and_then(|n| u64::try_from(n).ok())
                           })
                           .map(Value::UnsignedInteger)
    },
    | LwM2mType::Float => text::text_to_float(b).map(Value::Float),
    | LwM2mType::Boolean => text::text_to_bool(b).map(Value::Boolean),
    | LwM2mType::ObjectLink => {
      text::text_to_object_link(b).map(|(object_id, instance_id)| Value::ObjectLink { object_id,
                                                                                     instance_id })
    },
    | LwM2mType::Opaque => STANDARD.decode(b).ok().map(Value::Opaque),
    | LwM2mType::String => Some(Value::String(s)),
    | LwM2mType::CoreLink => Some(Value::CoreLink(s)),
  }
}

fn coerce(value: Value, ty: LwM2mType, uri: Uri) -> Result<Value, Error> {
  use LwM2mType as T;

  let coerced = match (value, ty) {
    | (Value::UriOnly, _) => Some(Value::UriOnly),
    | (Value::Undefined(bytes), ty) => from_tlv(bytes, ty),
    | (Value::String(s), ty) => from_text(s, ty),

    | (Value::Integer(n), T::Integer) | (Value::Time(n), T::Integer) => Some(Value::Integer(n)),
    | (Value::Integer(n), T::Time) | (Value::Time(n), T::Time) => Some(Value::Time(n)),
    | (Value::Integer(n), T::UnsignedInteger) | (Value::Time(n), T::UnsignedInteger) => {
      u64::try_from(n).ok().map(Value::UnsignedInteger)
    },
    | (Value::Integer(n), T::Float) | (Value::Time(n), T::Float) => Some(Value::Float(n as f64)),

    | (Value::UnsignedInteger(n), T::UnsignedInteger) => Some(Value::UnsignedInteger(n)),
    | (Value::UnsignedInteger(n), T::Integer) => i64::try_from(n).ok().map(Value::Integer),
    | (Value::UnsignedInteger(n), T::Time) => i64::try_from(n).ok().map(Value::Time),
    | (Value::UnsignedInteger(n), T::Float) => Some(Value::Float(n as f64)),

    | (Value::Float(f), T::Float) => Some(Value::Float(f)),
    | (Value::Float(f), T::Integer) => float_to_int(f).map(Value::Integer),
    | (Value::Float(f), T::Time) => float_to_int(f).map(Value::Time),
    | (Value::Float(f), T::UnsignedInteger) => {
      float_to_int(f).and_then(|n| u64::try_from(n).ok())
                     .map(Value::UnsignedInteger)
    },

    | (Value::CoreLink(s), T::CoreLink) | (Value::CoreLink(s), T::String) => {
      Some(if ty == T::String { Value::String(s) } else { Value::CoreLink(s) })
    },
    | (v @ Value::Opaque(_), T::Opaque)
    | (v @ Value::Boolean(_), T::Boolean)
    | (v @ Value::ObjectLink { .. }, T::ObjectLink) => Some(v),

    | _ => None,
  };

  coerced.ok_or(Error::NotAcceptable(uri))
}

#[cfg(test)]
mod tests {
  use super::*;

  fn uri() -> Uri {
    Uri::object(3).instance(0).resource(1)
  }

  fn coerce_ok(v: Value, ty: LwM2mType) -> Value {
    coerce(v, ty, uri()).unwrap()
  }

  fn coerce_err(v: Value, ty: LwM2mType) {
    assert_eq!(coerce(v, ty, uri()), Err(Error::NotAcceptable(uri())));
  }

  #[test]
  fn float_to_integer() {
    assert_eq!(coerce_ok(Value::Float(2.0000003), LwM2mType::Integer),
               Value::Integer(2));
    assert_eq!(coerce_ok(Value::Float(-7.0), LwM2mType::Integer),
               Value::Integer(-7));
    coerce_err(Value::Float(2.6), LwM2mType::Integer);
    coerce_err(Value::Float(2.0001), LwM2mType::Integer);
    coerce_err(Value::Float(f64::NAN), LwM2mType::Integer);
    coerce_err(Value::Float(1e300), LwM2mType::Integer);
  }

  #[test]
  fn float_tolerance_caps_at_one_half() {
    assert_eq!(float_to_int(3e9 + 0.4), Some(3_000_000_000));
    assert_eq!(float_to_int(0.0), Some(0));
    assert_eq!(float_to_int(1e-20), Some(0));
    assert_eq!(float_to_int(1e-3), None);
  }

  #[test]
  fn unsigned_rejects_negatives() {
    coerce_err(Value::Float(-1.0), LwM2mType::UnsignedInteger);
    coerce_err(Value::Integer(-1), LwM2mType::UnsignedInteger);
    coerce_err(Value::String("-1".into()), LwM2mType::UnsignedInteger);
    coerce_err(Value::Undefined(vec![0xFF]), LwM2mType::UnsignedInteger);
    assert_eq!(coerce_ok(Value::Undefined(vec![0x7F]), LwM2mType::UnsignedInteger),
               Value::UnsignedInteger(127));
  }

  #[test]
  fn from_text() {
    let s = |s: &str| Value::String(s.into());

    assert_eq!(coerce_ok(s("-12"), LwM2mType::Integer), Value::Integer(-12));
    assert_eq!(coerce_ok(s("1.5e1"), LwM2mType::Float), Value::Float(15.0));
    assert_eq!(coerce_ok(s("1"), LwM2mType::Boolean), Value::Boolean(true));
    assert_eq!(coerce_ok(s("3:2"), LwM2mType::ObjectLink),
               Value::ObjectLink { object_id: 3,
                                   instance_id: 2 });
    assert_eq!(coerce_ok(s("aGk="), LwM2mType::Opaque),
               Value::Opaque(b"hi".to_vec()));
    assert_eq!(coerce_ok(s("</3/0>"), LwM2mType::CoreLink),
               Value::CoreLink("</3/0>".into()));

    assert_eq!(coerce_ok(s("2.0000003"), LwM2mType::Integer), Value::Integer(2));
    assert_eq!(coerce_ok(s("-4e2"), LwM2mType::Time), Value::Time(-400));
    assert_eq!(coerce_ok(s("7.0"), LwM2mType::UnsignedInteger),
               Value::UnsignedInteger(7));

    coerce_err(s("1.5"), LwM2mType::Integer);
    coerce_err(s("2.6"), LwM2mType::Integer);
    coerce_err(s("-1.0"), LwM2mType::UnsignedInteger);
    coerce_err(s("yes"), LwM2mType::Boolean);
    coerce_err(s("not base64!"), LwM2mType::Opaque);
  }

  #[test]
  fn from_tlv_fixed_width() {
    let u = |b: &[u8]| Value::Undefined(b.to_vec());

    assert_eq!(coerce_ok(u(&[0xFF]), LwM2mType::Integer), Value::Integer(-1));
    assert_eq!(coerce_ok(u(&[0x01, 0x00]), LwM2mType::Integer),
               Value::Integer(256));
    assert_eq!(coerce_ok(u(&[0, 0, 0, 0, 0x5F, 0x5E, 0x10, 0x00]), LwM2mType::Time),
               Value::Time(1_600_000_000));
    assert_eq!(coerce_ok(u(&1.5f32.to_be_bytes()), LwM2mType::Float),
               Value::Float(1.5));
    assert_eq!(coerce_ok(u(&0.1f64.to_be_bytes()), LwM2mType::Float),
               Value::Float(0.1));
    assert_eq!(coerce_ok(u(&[1]), LwM2mType::Boolean), Value::Boolean(true));
    assert_eq!(coerce_ok(u(&[0, 3, 0, 1]), LwM2mType::ObjectLink),
               Value::ObjectLink { object_id: 3,
                                   instance_id: 1 });
    assert_eq!(coerce_ok(u(b"newt"), LwM2mType::String),
               Value::String("newt".into()));

    coerce_err(u(&[0, 0, 1]), LwM2mType::Integer);
    coerce_err(u(&[0, 0]), LwM2mType::Float);
    coerce_err(u(&[2]), LwM2mType::Boolean);
    coerce_err(u(&[0, 3, 0]), LwM2mType::ObjectLink);
    coerce_err(u(&[0xC3, 0x28]), LwM2mType::String);
  }

  #[test]
  fn mismatch_is_not_acceptable() {
    coerce_err(Value::Boolean(true), LwM2mType::Integer);
    coerce_err(Value::Opaque(vec![1]), LwM2mType::String);
    coerce_err(Value::Integer(1), LwM2mType::Boolean);
  }

  #[test]
  fn consolidate_looks_up_types() {
    let inst = Uri::object(3).instance(0);
    let mut data = vec![Data::new(inst.resource(9), Value::String("87".into())),
                        Data::new(inst.resource(4), Value::UriOnly)];

    consolidate(&mut data, |o, r| match (o, r) {
      | (3, 9) => Some(LwM2mType::Integer),
      | _ => None,
    }).unwrap();

    assert_eq!(data[0].value, Value::Integer(87));
    assert_eq!(data[1].value, Value::UriOnly);

    let mut data = vec![Data::new(inst.resource(1), Value::String("x".into()))];
    assert_eq!(consolidate(&mut data, |_, _| None),
               Err(Error::NotFound(inst.resource(1))));
  }
}
