//! LwM2M data model codec.
//!
//! Resource values travel between an LwM2M client and server in one of
//! a few content formats; this crate converts between those and typed [`Data`].
//!
//! | format | [`ContentFormat`](newt_msg::ContentFormat) | shape |
//! |--------|------|-------|
//! | TLV | `LwM2mTlv` (11542) | any number of values |
//! | plain text | `Text` (0) | exactly one resource |
//! | opaque | `OctetStream` (42) | exactly one opaque resource |
//!
//! ## Consolidation
//! TLV leaves carry no type and text is just text, so [`deserialize`]
//! asks the caller for each resource's declared [`LwM2mType`] and coerces
//! every value into it. If any value does not fit its type the whole payload
//! is rejected with [`Error::NotAcceptable`].
//!
//! ```
//! use newt_lwm2m::{deserialize, serialize, Data, LwM2mType, Uri, Value};
//! use newt_msg::ContentFormat;
//!
//! let base: Uri = "/3/0".parse().unwrap();
//! let data = vec![Data::new("/3/0/0".parse().unwrap(), Value::String("newt".into())),
//!                 Data::new("/3/0/9".parse().unwrap(), Value::Integer(87))];
//!
//! let (format, bytes) = serialize(base, &data, ContentFormat::LwM2mTlv).unwrap();
//! assert_eq!(format, ContentFormat::LwM2mTlv);
//!
//! let types = |_obj: u16, res: u16| match res {
//!   | 0 => Some(LwM2mType::String),
//!   | 9 => Some(LwM2mType::Integer),
//!   | _ => None,
//! };
//!
//! assert_eq!(deserialize(&bytes, format, base, types).unwrap(), data);
//! ```

// x-release-please-start-version
#![doc(html_root_url = "https://docs.rs/newt-lwm2m/0.3.0")]
// x-release-please-end
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code, missing_copy_implementations))]
#![deny(missing_docs)]

extern crate alloc as std_alloc;

pub(crate) const TARGET: &str = "newt";

mod codec;
mod consolidate;
mod error;
mod uri;
mod value;

/// Integer, float, boolean & object link conversions to and from plain text
pub mod text;

/// `application/vnd.oma.lwm2m+tlv`
pub mod tlv;

pub use codec::{deserialize, serialize, DEFAULT_FORMAT};
pub use consolidate::consolidate;
pub use error::Error;
pub use uri::Uri;
pub use value::{Data, LwM2mType, Value};
