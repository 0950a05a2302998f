use ::core::fmt::Write;

use newt_common::*;
use newt_msg::Message;
use tinyvec::ArrayVec;

pub(crate) const TARGET: &str = "newt";

pub(crate) fn msg_summary(msg: &Message<'_>) -> Writable<[u8; 64]> {
  let mut buf = Writable::from(ArrayVec::new());
  write!(buf,
         "{:?} {:?} {} with {} byte payload",
         msg.code.kind(),
         msg.ty,
         msg.code,
         msg.payload.0.len()).ok();
  buf
}

#[cfg(test)]
mod tests {
  use newt_msg::{Code, Id, Token, Type};

  use super::*;

  #[test]
  fn summary() {
    let mut msg = Message::new(Type::Con, Code::CONTENT, Id(1), Token::default());
    msg.set_payload(b"abc".to_vec());
    assert_eq!(msg_summary(&msg).as_str(),
               "Response Con 2.05 with 3 byte payload");
  }
}
