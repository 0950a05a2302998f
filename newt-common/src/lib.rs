//! Common structs and abstractions used by `newt`

// x-release-please-start-version
#![doc(html_root_url = "https://docs.rs/newt-common/0.3.0")]
// x-release-please-end
#![cfg_attr(not(test), forbid(missing_debug_implementations, unreachable_pub))]
#![cfg_attr(not(test), deny(unsafe_code, missing_copy_implementations))]
#![allow(clippy::unused_unit)]
#![deny(missing_docs)]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc as std_alloc;

/// Cursor
pub mod cursor;
pub use cursor::*;

/// Writable
pub mod writable;
pub use writable::*;

/// Runtime size of data structures
pub mod size;
pub use size::*;
