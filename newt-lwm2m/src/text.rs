//! Plain text is the LwM2M text format's grammar:
//! - integers are an optional sign and a run of digits
//! - floats are an integer, optionally followed by `.` and a run of digits,
//!   optionally followed by `e` or `E` and an integer
//! - booleans are `0` or `1`
//! - object links are `object:instance`

use core::fmt::Write;

use std_alloc::string::String;
use std_alloc::vec::Vec;

/// Write an integer in decimal.
///
/// With `compress`, a number ending in 3 or more zeros is written
/// with an exponent instead. [`text_to_int`] does not accept
/// exponents, so this is only for display.
///
/// ```
/// use newt_lwm2m::text::int_to_text;
///
/// assert_eq!(int_to_text(-12000, false), "-12000");
/// assert_eq!(int_to_text(-12000, true), "-12e3");
/// assert_eq!(int_to_text(1200, true), "1200");
/// ```
pub fn int_to_text(n: i64, compress: bool) -> String {
  let mut out = String::new();

  let (mut mantissa, mut zeros) = (n, 0u32);
  while compress && mantissa != 0 && mantissa % 10 == 0 {
    mantissa /= 10;
    zeros += 1;
  }

  // String's fmt::Write never fails
  match zeros {
    | z if z >= 3 => write!(out, "{}e{}", mantissa, z).ok(),
    | _ => write!(out, "{}", n).ok(),
  };

  out
}

fn split_sign(text: &[u8]) -> (bool, &[u8]) {
  match text.split_first() {
    | Some((b'-', rest)) => (true, rest),
    | Some((b'+', rest)) => (false, rest),
    | _ => (false, text),
  }
}

fn is_digits(text: &[u8]) -> bool {
  !text.is_empty() && text.iter().all(u8::is_ascii_digit)
}

/// Parse an optionally signed run of digits
///
/// ```
/// use newt_lwm2m::text::text_to_int;
///
/// assert_eq!(text_to_int(b"-42"), Some(-42));
/// assert_eq!(text_to_int(b"+42"), Some(42));
/// assert_eq!(text_to_int(b"12e3"), None);
/// ```
pub fn text_to_int(text: &[u8]) -> Option<i64> {
  let (_, digits) = split_sign(text);
  if !is_digits(digits) {
    return None;
  }

  core::str::from_utf8(text).ok()?.parse().ok()
}

/// Parse a run of digits with an optional `+`
pub fn text_to_uint(text: &[u8]) -> Option<u64> {
  let (negative, digits) = split_sign(text);
  if negative || !is_digits(digits) {
    return None;
  }

  core::str::from_utf8(digits).ok()?.parse().ok()
}

/// Parse a float
///
/// ```
/// use newt_lwm2m::text::text_to_float;
///
/// assert_eq!(text_to_float(b"2.5"), Some(2.5));
/// assert_eq!(text_to_float(b"-25e-1"), Some(-2.5));
/// assert_eq!(text_to_float(b".5"), None);
/// assert_eq!(text_to_float(b"inf"), None);
/// ```
pub fn text_to_float(text: &[u8]) -> Option<f64> {
  let (_, rest) = split_sign(text);

  let int_len = rest.iter().take_while(|b| b.is_ascii_digit()).count();
  let (int, rest) = rest.split_at(int_len);
  if int.is_empty() {
    return None;
  }

  let rest = match rest.split_first() {
    | Some((b'.', frac)) => {
      let frac_len = frac.iter().take_while(|b| b.is_ascii_digit()).count();
      if frac_len == 0 {
        return None;
      }
      &frac[frac_len..]
    },
    | _ => rest,
  };

  match rest.split_first() {
    | None => (),
    | Some((b'e' | b'E', exp)) if is_digits(split_sign(exp).1) => (),
    | Some(_) => return None,
  }

  core::str::from_utf8(text).ok()?.parse().ok()
}

fn abs(f: f64) -> f64 {
  if f < 0.0 {
    -f
  } else {
    f
  }
}

/// Split a magnitude into a mantissa and a power of ten.
///
/// Only magnitudes that would need a long run of digits
/// (at least 10<sup>18</sup>, or below 10<sup>-6</sup>) are split.
fn normalize(f: f64) -> (f64, i32) {
  if f >= 1e18 {
    let (mut scale, mut exp) = (1.0, 0);
    while f / scale >= 10.0 {
      scale *= 10.0;
      exp += 1;
    }
    (f / scale, exp)
  } else if f != 0.0 && f < 1e-6 {
    // keeps `scale` finite for subnormals
    let (f, mut exp) = if f < 1e-300 { (f * 1e300, -300) } else { (f, 0) };
    let mut scale = 1.0;
    while f * scale < 1.0 {
      scale *= 10.0;
      exp -= 1;
    }
    (f * scale, exp)
  } else {
    (f, 0)
  }
}

/// Write a float as an integer part and decimal digits.
///
/// Digits stop once the remaining fraction is smaller than the noise
/// the float carries (its magnitude times [`f64::EPSILON`]), so values
/// like `0.1 + 0.2` come out short.
///
/// Magnitudes of 10<sup>18</sup> and above or below 10<sup>-6</sup>
/// are written with one integer digit and an exponent.
/// NaN and infinity cannot be written.
///
/// ```
/// use newt_lwm2m::text::float_to_text;
///
/// assert_eq!(float_to_text(2.5).as_deref(), Some("2.5"));
/// assert_eq!(float_to_text(0.1 + 0.2).as_deref(), Some("0.3"));
/// assert_eq!(float_to_text(-3.0).as_deref(), Some("-3"));
/// assert_eq!(float_to_text(1.5e-12).as_deref(), Some("1.5e-12"));
/// assert_eq!(float_to_text(f64::NAN), None);
/// ```
pub fn float_to_text(f: f64) -> Option<String> {
  if !f.is_finite() {
    return None;
  }

  let mut out = String::new();
  if f < 0.0 {
    out.push('-');
  }

  let (f, mut exp) = normalize(abs(f));
  let mut int = f as u64;
  let mut frac = f - int as f64;
  let mut noise = f64::EPSILON * f;

  let mut digits = Vec::new();
  while frac > noise && digits.len() < 24 {
    frac *= 10.0;
    noise *= 10.0;

    let d = frac as u8;
    digits.push(d.min(9));
    frac -= d as f64;

    if 1.0 - frac <= noise {
      // remainder is within noise of the next digit up; carry it
      let mut carry = true;
      for d in digits.iter_mut().rev() {
        if *d == 9 {
          *d = 0;
        } else {
          *d += 1;
          carry = false;
          break;
        }
      }
      if carry {
        int += 1;
      }
      break;
    }
  }

  while digits.last() == Some(&0) {
    digits.pop();
  }

  // a mantissa of 9.99.. carried into 10
  if exp != 0 && int >= 10 {
    int /= 10;
    exp += 1;
  }

  write!(out, "{}", int).ok()?;
  if !digits.is_empty() {
    out.push('.');
    digits.iter().for_each(|d| out.push((b'0' + d) as char));
  }
  if exp != 0 {
    write!(out, "e{}", exp).ok()?;
  }

  Some(out)
}

/// `1` or `0`
pub fn bool_to_text(b: bool) -> &'static str {
  match b {
    | true => "1",
    | false => "0",
  }
}

/// Parse `1` or `0`
pub fn text_to_bool(text: &[u8]) -> Option<bool> {
  match text {
    | b"1" => Some(true),
    | b"0" => Some(false),
    | _ => None,
  }
}

/// Write an object link as `object:instance`
pub fn object_link_to_text(object_id: u16, instance_id: u16) -> String {
  let mut out = String::new();
  write!(out, "{}:{}", object_id, instance_id).ok();
  out
}

/// Parse `object:instance`
///
/// ```
/// use newt_lwm2m::text::text_to_object_link;
///
/// assert_eq!(text_to_object_link(b"3:0"), Some((3, 0)));
/// assert_eq!(text_to_object_link(b"3"), None);
/// ```
pub fn text_to_object_link(text: &[u8]) -> Option<(u16, u16)> {
  let colon = text.iter().position(|b| *b == b':')?;
  let (obj, inst) = (&text[..colon], &text[colon + 1..]);

  let parse = |t: &[u8]| {
    text_to_uint(t).filter(|_| is_digits(t))
                   .and_then(|n| u16::try_from(n).ok())
  };

  Some((parse(obj)?, parse(inst)?))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn int_round_trip() {
    for n in [0, 1, -1, 1000, i64::MAX, i64::MIN] {
      assert_eq!(text_to_int(int_to_text(n, false).as_bytes()), Some(n));
    }
  }

  #[test]
  fn int_compress() {
    assert_eq!(int_to_text(0, true), "0");
    assert_eq!(int_to_text(5_000_000, true), "5e6");
    assert_eq!(int_to_text(i64::MIN, true), "-9223372036854775808");
  }

  #[test]
  fn int_rejects() {
    for bad in [&b""[..], b"-", b"1.0", b"1e3", b" 1", b"0x10", b"99999999999999999999"] {
      assert_eq!(text_to_int(bad), None);
    }
  }

  #[test]
  fn uint() {
    assert_eq!(text_to_uint(b"18446744073709551615"), Some(u64::MAX));
    assert_eq!(text_to_uint(b"+7"), Some(7));
    assert_eq!(text_to_uint(b"-0"), None);
  }

  #[test]
  fn float_parse() {
    assert_eq!(text_to_float(b"2"), Some(2.0));
    assert_eq!(text_to_float(b"+2.0000003"), Some(2.0000003));
    assert_eq!(text_to_float(b"1E3"), Some(1000.0));
    assert_eq!(text_to_float(b"1e+3"), Some(1000.0));

    for bad in [&b"1."[..], b"1e", b"e3", b"-", b"1.2.3", b"NaN", b"1e3.0"] {
      assert_eq!(text_to_float(bad), None);
    }
  }

  #[test]
  fn float_write() {
    let cases: [(f64, &str); 13] = [(0.0, "0"),
                                    (0.5, "0.5"),
                                    (-0.25, "-0.25"),
                                    (2.6, "2.6"),
                                    (123.456, "123.456"),
                                    (0.3, "0.3"),
                                    (1e20, "1e20"),
                                    (1e-3, "0.001"),
                                    (1e-6, "0.000001"),
                                    (1e-7, "1e-7"),
                                    (1e-17, "1e-17"),
                                    (3e-20, "3e-20"),
                                    (1.23456789012e-12, "1.23456789012e-12")];

    for (f, text) in cases {
      assert_eq!(float_to_text(f).as_deref(), Some(text), "{}", f);
    }
  }

  #[test]
  fn float_round_trip_is_close() {
    for f in [3.14159, -2.5e-4, 98765.4321, 1.0 / 3.0, 2.5e-11, -7.77e-300, 5e-324] {
      let back = text_to_float(float_to_text(f).unwrap().as_bytes()).unwrap();
      assert!(abs(back - f) <= abs(f) * 1e-12, "{} -> {}", f, back);
    }
  }

  #[test]
  fn object_link() {
    assert_eq!(object_link_to_text(3, 1), "3:1");
    assert_eq!(text_to_object_link(b"65535:0"), Some((65535, 0)));
    assert_eq!(text_to_object_link(b"65536:0"), None);
    assert_eq!(text_to_object_link(b"+1:0"), None);
    assert_eq!(text_to_object_link(b":0"), None);
  }

  #[test]
  fn bool() {
    assert_eq!(text_to_bool(bool_to_text(true).as_bytes()), Some(true));
    assert_eq!(text_to_bool(b"true"), None);
  }
}
