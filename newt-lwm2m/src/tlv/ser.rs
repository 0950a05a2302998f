use std_alloc::vec::Vec;

use super::{header, Kind};
use crate::{Data, Error, Uri, Value};

/// Insert the header of an element whose value is `out[start..]`
fn wrap(out: &mut Vec<u8>, start: usize, kind: Kind, id: u16) -> Result<(), Error> {
  let hdr = header(kind, id, out.len() - start)?;
  out.splice(start..start, hdr);
  Ok(())
}

fn write_int(n: i64, out: &mut Vec<u8>) {
  if let Ok(n) = i8::try_from(n) {
    out.extend(n.to_be_bytes())
  } else if let Ok(n) = i16::try_from(n) {
    out.extend(n.to_be_bytes())
  } else if let Ok(n) = i32::try_from(n) {
    out.extend(n.to_be_bytes())
  } else {
    out.extend(n.to_be_bytes())
  }
}

/// Write the bytes of a resource value
fn write_value(uri: Uri, value: &Value, out: &mut Vec<u8>) -> Result<(), Error> {
  match value {
    | Value::Undefined(b) | Value::Opaque(b) => out.extend_from_slice(b),
    | Value::String(s) | Value::CoreLink(s) => out.extend_from_slice(s.as_bytes()),
    | Value::Integer(n) | Value::Time(n) => write_int(*n, out),
    | Value::UnsignedInteger(n) => {
      write_int(i64::try_from(*n).map_err(|_| Error::NotAcceptable(uri))?, out)
    },
    | Value::Float(f) => match *f as f32 {
      | short if short as f64 == *f => out.extend(short.to_be_bytes()),
      | _ => out.extend(f.to_be_bytes()),
    },
    | Value::Boolean(b) => out.push(*b as u8),
    | Value::ObjectLink { object_id,
                          instance_id, } => {
      out.extend(object_id.to_be_bytes());
      out.extend(instance_id.to_be_bytes());
    },
    | Value::UriOnly => (),
  }

  Ok(())
}

/// Write the resources of one object instance
fn write_resources(base: Uri, data: &[Data], out: &mut Vec<u8>) -> Result<(), Error> {
  let mut rest = data;

  while let Some(first) = rest.first() {
    let resource_id = match first.uri.resource_id {
      | Some(id) => id,
      | None => {
        // the instance itself; its wrapper is all there is to write
        rest = &rest[1..];
        continue;
      },
    };

    if first.uri.resource_instance_id.is_none() {
      let start = out.len();
      match first.value {
        | Value::UriOnly => wrap(out, start, Kind::MultipleResource, resource_id)?,
        | ref value => {
          write_value(first.uri, value, out)?;
          wrap(out, start, Kind::Resource, resource_id)?;
        },
      }

      rest = &rest[1..];
      continue;
    }

    let n = rest.iter()
                .take_while(|d| {
                  d.uri.resource_id == Some(resource_id) && d.uri.resource_instance_id.is_some()
                })
                .count();
    let (instances, tail) = rest.split_at(n);

    let start = out.len();
    for d in instances {
      let instance_start = out.len();
      write_value(d.uri, &d.value, out)?;
      wrap(out,
           instance_start,
           Kind::ResourceInstance,
           d.uri.resource_instance_id.unwrap_or_default())?;
    }

    if base.resource_instance_id.is_none() {
      wrap(out, start, Kind::MultipleResource, resource_id)?;
    }

    rest = tail;
  }

  Ok(())
}

/// Encode data as TLV.
///
/// `data` must be sorted by object instance, and the instances of a
/// multiple resource must be adjacent. Consecutive elements of the same object
/// instance are wrapped in an Object Instance (unless `base` names an instance)
/// and consecutive resource instances of the same resource in a Multiple
/// Resource (unless `base` names a resource instance).
///
/// ```
/// use newt_lwm2m::{tlv, Data, Uri, Value};
///
/// let inst = Uri::object(3).instance(0);
/// let data = [Data::new(inst.resource(7).resource_instance(0), Value::Integer(3800)),
///             Data::new(inst.resource(7).resource_instance(1), Value::Integer(5000))];
///
/// assert_eq!(tlv::serialize(inst, &data).unwrap(),
///            vec![0b10_0_01_000, 7, 8, // multiple resource 7, 8 bytes
///                 0b01_0_00_010, 0, 0x0E, 0xD8, // instance 0: 3800
///                 0b01_0_00_010, 1, 0x13, 0x88]); // instance 1: 5000
/// ```
pub fn serialize(base: Uri, data: &[Data]) -> Result<Vec<u8>, Error> {
  let mut out = Vec::new();
  let mut rest = data;

  while let Some(first) = rest.first() {
    let instance_id = first.uri.instance_id.ok_or(Error::InvalidUri)?;
    let n = rest.iter()
                .take_while(|d| {
                  d.uri.object_id == first.uri.object_id && d.uri.instance_id == Some(instance_id)
                })
                .count();
    let (instance, tail) = rest.split_at(n);

    let start = out.len();
    write_resources(base, instance, &mut out)?;
    if base.instance_id.is_none() {
      wrap(&mut out, start, Kind::ObjectInstance, instance_id)?;
    }

    rest = tail;
  }

  Ok(out)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn inst() -> Uri {
    Uri::object(3).instance(0)
  }

  #[test]
  fn integer_widths() {
    let cases: [(i64, &[u8]); 6] = [(0, &[0]),
                                    (-128, &[0x80]),
                                    (128, &[0x00, 0x80]),
                                    (-32769, &[0xFF, 0xFF, 0x7F, 0xFF]),
                                    (1 << 31, &[0, 0, 0, 0, 0x80, 0, 0, 0]),
                                    (i64::MIN, &[0x80, 0, 0, 0, 0, 0, 0, 0])];

    for (n, bytes) in cases {
      let mut out = vec![];
      write_int(n, &mut out);
      assert_eq!(out, bytes, "{}", n);
    }
  }

  #[test]
  fn floats_shrink_when_exact() {
    let mut out = vec![];
    write_value(inst(), &Value::Float(1.5), &mut out).unwrap();
    assert_eq!(out, 1.5f32.to_be_bytes());

    let mut out = vec![];
    write_value(inst(), &Value::Float(0.1), &mut out).unwrap();
    assert_eq!(out, 0.1f64.to_be_bytes());
  }

  #[test]
  fn unsigned_too_large() {
    let mut out = vec![];
    assert_eq!(write_value(inst(), &Value::UnsignedInteger(u64::MAX), &mut out),
               Err(Error::NotAcceptable(inst())));
  }

  #[test]
  fn instances_are_wrapped() {
    let obj = Uri::object(3);
    let data = [Data::new(obj.instance(0).resource(0), Value::String("a".into())),
                Data::new(obj.instance(0).resource(1), Value::Boolean(true)),
                Data::new(obj.instance(1).resource(0), Value::String("b".into())),
                Data::new(obj.instance(2), Value::UriOnly)];

    assert_eq!(serialize(obj, &data).unwrap(),
               vec![0b00_0_00_110, 0, // instance 0, 6 bytes
                    0b11_0_00_001, 0, b'a', //
                    0b11_0_00_001, 1, 1, //
                    0b00_0_00_011, 1, // instance 1, 3 bytes
                    0b11_0_00_001, 0, b'b', //
                    0b00_0_00_000, 2]); // instance 2, empty
  }

  #[test]
  fn instance_wrapper_omitted_under_instance() {
    let data = [Data::new(inst().resource(300), Value::Boolean(false))];

    assert_eq!(serialize(inst(), &data).unwrap(),
               vec![0b11_1_00_001, 0x01, 0x2C, 0]);
  }

  #[test]
  fn single_resource_instance() {
    let ri = inst().resource(7).resource_instance(2);
    let data = [Data::new(ri, Value::Integer(1))];

    assert_eq!(serialize(ri, &data).unwrap(), vec![0b01_0_00_001, 2, 1]);
  }

  #[test]
  fn multiple_resource_length_byte() {
    let data = [Data::new(inst().resource(7).resource_instance(0), Value::Integer(3800)),
                Data::new(inst().resource(7).resource_instance(1), Value::Integer(5000))];

    assert_eq!(serialize(inst(), &data).unwrap(),
               vec![0b10_0_01_000, 7, 8, // multiple resource 7, 8 bytes
                    0b01_0_00_010, 0, 0x0E, 0xD8, //
                    0b01_0_00_010, 1, 0x13, 0x88]);
  }

  #[test]
  fn empty_multiple_resource() {
    let data = [Data::new(inst().resource(7), Value::UriOnly)];

    assert_eq!(serialize(inst(), &data).unwrap(), vec![0b10_0_00_000, 7]);
  }

  #[test]
  fn missing_instance() {
    let data = [Data::new(Uri::object(3), Value::Integer(1))];
    assert_eq!(serialize(Uri::object(3), &data), Err(Error::InvalidUri));
  }
}
