use std_alloc::vec::Vec;

use super::{parse_header, Kind};
use crate::{Data, Error, Uri, Value};

/// Visit every element under `uri` in `buf`.
///
/// Leaves are visited with their value bytes, empty containers with `None`.
fn walk<F>(buf: &[u8], uri: Uri, in_multiple: bool, visit: &mut F) -> Result<(), Error>
  where F: FnMut(Uri, Option<&[u8]>)
{
  let mut rest = buf;

  while !rest.is_empty() {
    let hdr = parse_header(rest)?;
    let end = hdr.len + hdr.value_len;
    let value = &rest[hdr.len..end];
    rest = &rest[end..];

    match hdr.kind {
      | Kind::ObjectInstance if uri.instance_id.is_some() => return Err(Error::IllegalNesting),
      | Kind::ObjectInstance if value.is_empty() => visit(uri.instance(hdr.id), None),
      | Kind::ObjectInstance => walk(value, uri.instance(hdr.id), false, visit)?,

      | Kind::Resource | Kind::MultipleResource
        if uri.instance_id.is_none()
           || in_multiple
           || uri.resource_instance_id.is_some()
           || uri.resource_id.map_or(false, |id| id != hdr.id) =>
      {
        return Err(Error::IllegalNesting)
      },
      | Kind::Resource => visit(uri.resource(hdr.id), Some(value)),
      | Kind::MultipleResource if value.is_empty() => visit(uri.resource(hdr.id), None),
      | Kind::MultipleResource => walk(value, uri.resource(hdr.id), true, visit)?,

      | Kind::ResourceInstance if uri.instance_id.is_none() || uri.resource_id.is_none() => {
        return Err(Error::IllegalNesting)
      },
      | Kind::ResourceInstance => visit(uri.resource_instance(hdr.id), Some(value)),
    }
  }

  Ok(())
}

/// Decode TLV read from `base`.
///
/// Resource values come out as [`Value::Undefined`] until
/// [`consolidate`](crate::consolidate)d, and empty Object Instances
/// or Multiple Resources as [`Value::UriOnly`].
///
/// An element may only appear where `base` and its parents leave room for it:
/// Object Instances only when `base` has no instance, Resources only inside an instance
/// (and only the resource `base` names, if any) and Resource Instances only inside a resource.
/// Anything else is [`Error::IllegalNesting`].
///
/// ```
/// use newt_lwm2m::{tlv, Error, Uri, Value};
///
/// let base = Uri::object(3).instance(0);
/// let data = tlv::deserialize(&[0b11_0_00_001, 9, 87], base).unwrap();
/// assert_eq!(data[0].uri, base.resource(9));
/// assert_eq!(data[0].value, Value::Undefined(vec![87]));
///
/// // an object instance within an object instance
/// assert_eq!(tlv::deserialize(&[0b00_0_00_000, 1], base),
///            Err(Error::IllegalNesting));
/// ```
pub fn deserialize(buf: &[u8], base: Uri) -> Result<Vec<Data>, Error> {
  if base.object_id.is_none() {
    return Err(Error::InvalidUri);
  }

  let mut count = 0usize;
  walk(buf, base, false, &mut |_, _| count += 1)?;

  let mut data = Vec::with_capacity(count);
  walk(buf, base, false, &mut |uri, value| {
    let value = match value {
      | Some(bytes) => Value::Undefined(bytes.to_vec()),
      | None => Value::UriOnly,
    };
    data.push(Data::new(uri, value));
  })?;

  Ok(data)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tlv;

  #[test]
  fn object_instances() {
    let obj = Uri::object(3);
    let bytes = [0b00_0_00_101, 0, // instance 0
                 0b11_0_00_011, 0, b'a', b'b', b'c', //
                 0b00_0_00_000, 1]; // instance 1, empty

    assert_eq!(deserialize(&bytes, obj).unwrap(),
               vec![Data::new(obj.instance(0).resource(0), Value::Undefined(b"abc".to_vec())),
                    Data::new(obj.instance(1), Value::UriOnly)]);
  }

  #[test]
  fn multiple_resource() {
    let inst = Uri::object(3).instance(0);
    let bytes = [0b10_0_00_110, 7, // multiple resource 7
                 0b01_0_00_001, 0, 1, //
                 0b01_0_00_001, 1, 2, //
                 0b10_0_00_000, 8]; // multiple resource 8, empty

    assert_eq!(deserialize(&bytes, inst).unwrap(),
               vec![Data::new(inst.resource(7).resource_instance(0), Value::Undefined(vec![1])),
                    Data::new(inst.resource(7).resource_instance(1), Value::Undefined(vec![2])),
                    Data::new(inst.resource(8), Value::UriOnly)]);
  }

  #[test]
  fn resource_instance_under_resource_base() {
    let res = Uri::object(3).instance(0).resource(7);
    let data = deserialize(&[0b01_0_00_001, 4, 9], res).unwrap();

    assert_eq!(data,
               vec![Data::new(res.resource_instance(4), Value::Undefined(vec![9]))]);
  }

  #[test]
  fn illegal_nesting() {
    let obj = Uri::object(3);
    let inst = obj.instance(0);

    // resource without an instance
    assert_eq!(deserialize(&[0b11_0_00_000, 1], obj),
               Err(Error::IllegalNesting));
    // resource instance outside a multiple resource
    assert_eq!(deserialize(&[0b01_0_00_000, 1], inst),
               Err(Error::IllegalNesting));
    // resource inside a multiple resource
    assert_eq!(deserialize(&[0b10_0_00_010, 7, 0b11_0_00_000, 1], inst),
               Err(Error::IllegalNesting));
    // object instance inside an object instance
    assert_eq!(deserialize(&[0b00_0_00_010, 0, 0b00_0_00_000, 1], obj),
               Err(Error::IllegalNesting));
  }

  #[test]
  fn resource_must_match_base() {
    let res = Uri::object(3).instance(0).resource(7);

    assert_eq!(deserialize(&[0b11_0_00_001, 7, 1], res).unwrap(),
               vec![Data::new(res, Value::Undefined(vec![1]))]);
    // a different resource
    assert_eq!(deserialize(&[0b11_0_00_001, 9, 1], res),
               Err(Error::IllegalNesting));
    // a resource under a resource instance
    assert_eq!(deserialize(&[0b11_0_00_001, 9, 1], res.resource_instance(2)),
               Err(Error::IllegalNesting));
    assert_eq!(deserialize(&[0b10_0_00_000, 7], res.resource_instance(2)),
               Err(Error::IllegalNesting));
  }

  #[test]
  fn base_needs_object() {
    assert_eq!(deserialize(&[], Uri::ROOT), Err(Error::InvalidUri));
    assert_eq!(deserialize(&[], Uri::object(3)), Ok(vec![]));
  }

  #[test]
  fn truncated() {
    let inst = Uri::object(3).instance(0);
    assert_eq!(deserialize(&[0b11_0_00_011, 0, 1, 2], inst),
               Err(Error::Malformed));
    // child runs past its parent
    assert_eq!(deserialize(&[0b10_0_00_010, 7, 0b01_0_00_001, 0, 1], inst),
               Err(Error::Malformed));
  }

  #[test]
  fn reads_what_serialize_writes() {
    let obj = Uri::object(3);
    let data = vec![Data::new(obj.instance(0).resource(0), Value::Undefined(b"newt".to_vec())),
                    Data::new(obj.instance(0).resource(6).resource_instance(0),
                              Value::Undefined(vec![1])),
                    Data::new(obj.instance(0).resource(6).resource_instance(5),
                              Value::Undefined(vec![5])),
                    Data::new(obj.instance(1).resource(300),
                              Value::Undefined(vec![0xAB; 300]))];

    let bytes = tlv::serialize(obj, &data).unwrap();
    assert_eq!(deserialize(&bytes, obj).unwrap(), data);
  }
}
