use core::fmt;

/// Whether a code is for a request, response, or empty message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CodeKind {
  /// A request code (0.xx)
  Request,
  /// A response code ([2-5].xx)
  Response,
  /// EMPTY (0.00)
  Empty,
}

/// # Message Code
///
/// 8-bit unsigned integer split into a 3-bit class (most
/// significant bits) and a 5-bit detail (least significant bits),
/// documented as "c.dd" where "c" is a digit from 0 to 7 for the
/// 3-bit subfield and "dd" are two digits from 00 to 31 for the 5-bit
/// subfield.
///
/// See [RFC7252 - Message Details](https://datatracker.ietf.org/doc/html/rfc7252#section-3) for context
///
/// ```
/// use newt_msg::Code;
///
/// assert_eq!(Code { class: 2, detail: 5 }.to_string(), "2.05".to_string())
/// ```
#[derive(Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Code {
  /// The "class" of message codes identify it as a request or response, and provides the class of response status:
  ///
  /// |class|meaning|
  /// |---|---|
  /// |`0`|Message is a request|
  /// |`2`|Message is a success response|
  /// |`4`|Message is a client error response|
  /// |`5`|Message is a server error response|
  pub class: u8,

  /// 2-digit integer (range `[0, 32)`) that provides granular information about the response status.
  ///
  /// Will always be `0` for requests.
  pub detail: u8,
}

macro_rules! code {
  ($doc:literal $name:ident = $c:literal . $d:literal) => {
    #[doc = $doc]
    #[allow(clippy::zero_prefixed_literal)]
    pub const $name: Code = Code::new($c, $d);
  };
}

impl Code {
  /// Create a new Code
  ///
  /// ```
  /// use newt_msg::Code;
  ///
  /// let content = Code::new(2, 05);
  /// ```
  pub const fn new(class: u8, detail: u8) -> Self {
    Self { class, detail }
  }

  code!("Empty message (ACK, RST, ping)" EMPTY = 0 . 00);

  code!("GET" GET = 0 . 01);
  code!("POST" POST = 0 . 02);
  code!("PUT" PUT = 0 . 03);
  code!("DELETE" DELETE = 0 . 04);
  code!("FETCH (RFC 8132)" FETCH = 0 . 05);
  code!("PATCH (RFC 8132)" PATCH = 0 . 06);
  code!("iPATCH (RFC 8132)" IPATCH = 0 . 07);

  code!("2.01 Created" CREATED = 2 . 01);
  code!("2.02 Deleted" DELETED = 2 . 02);
  code!("2.03 Valid" VALID = 2 . 03);
  code!("2.04 Changed" CHANGED = 2 . 04);
  code!("2.05 Content" CONTENT = 2 . 05);
  code!("2.31 Continue (RFC 7959)" CONTINUE = 2 . 31);

  code!("4.00 Bad Request" BAD_REQUEST = 4 . 00);
  code!("4.01 Unauthorized" UNAUTHORIZED = 4 . 01);
  code!("4.02 Bad Option" BAD_OPTION = 4 . 02);
  code!("4.03 Forbidden" FORBIDDEN = 4 . 03);
  code!("4.04 Not Found" NOT_FOUND = 4 . 04);
  code!("4.05 Method Not Allowed" METHOD_NOT_ALLOWED = 4 . 05);
  code!("4.06 Not Acceptable" NOT_ACCEPTABLE = 4 . 06);
  code!("4.08 Request Entity Incomplete (RFC 7959)" REQUEST_ENTITY_INCOMPLETE = 4 . 08);
  code!("4.09 Conflict (RFC 8132)" CONFLICT = 4 . 09);
  code!("4.12 Precondition Failed" PRECONDITION_FAILED = 4 . 12);
  code!("4.13 Request Entity Too Large" REQUEST_ENTITY_TOO_LARGE = 4 . 13);
  code!("4.15 Unsupported Content-Format" UNSUPPORTED_CONTENT_FORMAT = 4 . 15);
  code!("4.22 Unprocessable Entity (RFC 8132)" UNPROCESSABLE_ENTITY = 4 . 22);

  code!("5.00 Internal Server Error" INTERNAL_SERVER_ERROR = 5 . 00);
  code!("5.01 Not Implemented" NOT_IMPLEMENTED = 5 . 01);
  code!("5.02 Bad Gateway" BAD_GATEWAY = 5 . 02);
  code!("5.03 Service Unavailable" SERVICE_UNAVAILABLE = 5 . 03);
  code!("5.04 Gateway Timeout" GATEWAY_TIMEOUT = 5 . 04);
  code!("5.05 Proxying Not Supported" PROXYING_NOT_SUPPORTED = 5 . 05);

  /// Get the human string representation of a message code
  ///
  /// # Returns
  /// A `char` array
  ///
  /// This is to avoid unnecessary heap allocation,
  /// you can create a `String` with `FromIterator::<String>::from_iter`,
  /// or use the [`fmt::Display`] implementation.
  /// ```
  /// use newt_msg::Code;
  ///
  /// let code = Code { class: 2, detail: 5 };
  /// let chars = code.to_human();
  /// let string = String::from_iter(chars);
  /// assert_eq!(string, "2.05".to_string());
  /// ```
  pub fn to_human(&self) -> [char; 4] {
    let to_char = |d: u8| char::from_digit(d.into(), 10).unwrap_or('?');
    [to_char(self.class),
     '.',
     to_char(self.detail / 10),
     to_char(self.detail % 10)]
  }

  /// Get whether this code is for a request, response, or empty message
  ///
  /// ```
  /// use newt_msg::{Code, CodeKind};
  ///
  /// assert_eq!(Code::EMPTY.kind(), CodeKind::Empty);
  /// assert_eq!(Code::GET.kind(), CodeKind::Request);
  /// assert_eq!(Code::CONTENT.kind(), CodeKind::Response);
  /// ```
  pub fn kind(&self) -> CodeKind {
    match (self.class, self.detail) {
      | (0, 0) => CodeKind::Empty,
      | (0, _) => CodeKind::Request,
      | _ => CodeKind::Response,
    }
  }

  /// Is this a 2.xx code?
  pub fn is_success(&self) -> bool {
    self.class == 2
  }

  /// Is this a 4.xx or 5.xx code?
  pub fn is_error(&self) -> bool {
    self.class == 4 || self.class == 5
  }
}

impl fmt::Display for Code {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    self.to_human().iter().try_for_each(|c| write!(f, "{}", c))
  }
}

impl From<u8> for Code {
  fn from(b: u8) -> Self {
    let class = b >> 5;
    let detail = b & 0b0011111;

    Code { class, detail }
  }
}

impl From<Code> for u8 {
  fn from(code: Code) -> u8 {
    let class = (code.class & 0b111) << 5;
    let detail = code.detail & 0b11111;

    class | detail
  }
}
