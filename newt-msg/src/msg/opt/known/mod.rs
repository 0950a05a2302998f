/// Content-Format values
pub mod content_format;
pub use content_format::*;

/// Block1 / Block2 values
pub mod block;
pub use block::*;

macro_rules! opt {
  ($doc:literal $name:ident = $n:literal) => {
    #[doc = $doc]
    pub const $name: crate::OptNumber = crate::OptNumber($n);
  };
}

pub(crate) use opt;

/// Non-repeatable options
pub mod no_repeat {
  use super::opt;

  opt!("Uri-Host: the Internet host of the resource being requested (RFC7252 5.10.1)" URI_HOST = 3);
  opt!("If-None-Match: makes a request conditional on the nonexistence of the target resource (RFC7252 5.10.8.2)" IF_NONE_MATCH = 5);
  opt!("Observe registration / notification sequence number (RFC7641)" OBSERVE = 6);
  opt!("Uri-Port: the transport-layer port of the resource (RFC7252 5.10.1)" URI_PORT = 7);
  opt!("OSCORE (RFC8613)" OSCORE = 9);
  opt!("Content-Format: the representation format of the payload (RFC7252 5.10.3)" CONTENT_FORMAT = 12);
  opt!("Max-Age: seconds a response may be cached (RFC7252 5.10.5)" MAX_AGE = 14);
  opt!("Accept: which Content-Format is acceptable to the client (RFC7252 5.10.4)" ACCEPT = 17);
  opt!("Block2: block-wise transfer of a response payload (RFC7959)" BLOCK2 = 23);
  opt!("Block1: block-wise transfer of a request payload (RFC7959)" BLOCK1 = 27);
  opt!("Size2: total size of a response representation (RFC7959)" SIZE2 = 28);
  opt!("Proxy-Uri (RFC7252 5.10.2)" PROXY_URI = 35);
  opt!("Proxy-Scheme (RFC7252 5.10.2)" PROXY_SCHEME = 39);
  opt!("Size1: size of a request representation (RFC7252 5.10.9)" SIZE1 = 60);
  opt!("No-Response: suppress responses of a class (RFC7967)" NO_RESPONSE = 258);
}

/// Repeatable options
pub mod repeat {
  use super::opt;

  opt!("If-Match: makes a request conditional on the current ETag (RFC7252 5.10.8.1)" IF_MATCH = 1);
  opt!("ETag: resource-local identifier for a representation (RFC7252 5.10.6)" ETAG = 4);
  opt!("Location-Path: one segment of the location of a created resource (RFC7252 5.10.7)" LOCATION_PATH = 8);
  opt!("Uri-Path: one segment of the absolute path to the resource (RFC7252 5.10.1)" URI_PATH = 11);
  opt!("Uri-Query: one argument parameterizing the resource (RFC7252 5.10.1)" URI_QUERY = 15);
  opt!("Location-Query (RFC7252 5.10.7)" LOCATION_QUERY = 20);
}
