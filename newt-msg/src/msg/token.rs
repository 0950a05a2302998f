use tinyvec::ArrayVec;

/// # Token
///
/// The Token is used to match a response with a request. The token
/// value is a sequence of 0 to 8 bytes. (Note that every message
/// carries a token, even if it is of zero length.) Every request
/// carries a client-generated token that the server MUST echo
/// (without modification) in any resulting response.
///
/// Unlike the [`Id`](crate::Id), which matches an ACK or RST to the
/// Confirmable message it answers, the token survives separate
/// responses and retransmissions.
///
/// See [RFC7252 - Token](https://datatracker.ietf.org/doc/html/rfc7252#section-5.3.1) for context
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct Token(pub ArrayVec<[u8; 8]>);

impl Token {
  /// Copy a token out of a slice, yielding `None`
  /// if the slice is longer than 8 bytes.
  ///
  /// ```
  /// use newt_msg::Token;
  ///
  /// assert_eq!(Token::from_slice(&[1, 2]).map(|t| t.0.len()), Some(2));
  /// assert!(Token::from_slice(&[0; 9]).is_none());
  /// ```
  pub fn from_slice(bytes: &[u8]) -> Option<Token> {
    if bytes.len() > 8 {
      None
    } else {
      let mut arr = ArrayVec::new();
      arr.extend_from_slice(bytes);
      Some(Token(arr))
    }
  }

  /// Take an arbitrary-length sequence of bytes and turn it into an opaque message token
  ///
  /// Currently uses the BLAKE2 hashing algorithm, but this may change in the future.
  ///
  /// ```
  /// use newt_msg::Token;
  ///
  /// let my_token = Token::opaque(&[0, 1, 2]);
  /// assert_eq!(my_token.0.len(), 8);
  /// ```
  pub fn opaque(data: &[u8]) -> Token {
    use blake2::digest::consts::U8;
    use blake2::{Blake2b, Digest};

    let mut digest = Blake2b::<U8>::new();
    digest.update(data);
    Token(Into::<[u8; 8]>::into(digest.finalize()).into())
  }

  /// The token bytes
  pub fn as_bytes(&self) -> &[u8] {
    &self.0
  }
}

