//! `newt` is a CoAP message engine for constrained devices.
//!
//! It sits between a datagram transport (see [`net::Session`]) and an
//! application such as an LwM2M client, and takes care of:
//! - assigning message IDs (the first is 107, 0 is never used)
//! - retransmitting Confirmable messages with exponential backoff until they are acknowledged
//! - answering duplicate Confirmable messages from a cache of the ACKs already sent
//! - matching responses to requests by [`Token`](newt_msg::Token)
//!
//! ## Driving it
//! `newt` never blocks. The host owns the event loop, calls
//! [`Context::step`](core::Context::step) with a receive buffer whenever
//! a session may have data or a timeout elapsed, and waits for at most
//! the duration `step` returns.
//!
//! Replies and failures arrive through callbacks that receive a
//! [`PeerId`](core::PeerId) rather than a reference to the peer; a callback
//! that wants to use the peer again goes through the [`Context`](core::Context).

// x-release-please-start-version
#![doc(html_root_url = "https://docs.rs/newt/0.3.0")]
// x-release-please-end
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
// -
// style
#![allow(clippy::unused_unit)]
// -
// deny
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![deny(missing_copy_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
// -
// warnings
#![cfg_attr(not(test), warn(unreachable_pub))]
// -
// features
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc as std_alloc;


pub(crate) mod logging;

/// Runtime configuration
pub mod config;

/// The message engine
pub mod core;

/// Transport abstraction
pub mod net;

/// Exponential backoff for Confirmable retransmission
pub mod retry;

/// Time abstractions
pub mod time;

/// `std`-only implementations of the platform abstractions
#[cfg(feature = "std")]
#[cfg_attr(any(docsrs, feature = "docs"), doc(cfg(feature = "std")))]
pub mod std;

pub use newt_msg as msg;

pub use crate::core::{Callback, Context, Error, PeerId, RequestHandler, Sent, What, When};
