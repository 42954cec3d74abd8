//! Data structures of the IBC packet forward middleware, which forwards
//! ICS-20 transfers through intermediate chains and refunds the original
//! sender when a hop ultimately fails.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod genesis;
mod in_flight;
mod metadata;
mod params;

pub mod error;
pub mod events;
pub mod proto;

pub use genesis::*;
pub use in_flight::*;
pub use metadata::*;
pub use params::*;

/// Module identifier of the packet forward middleware.
pub const MODULE_ID_STR: &str = "packetfowardmiddleware";

/// Key of the forward instructions object inside an ICS-20 memo.
pub const FORWARD_MEMO_KEY: &str = "forward";

/// Number of retries applied when the forward metadata does not specify one.
pub const DEFAULT_FORWARD_RETRIES: u8 = 0;

/// Relative timeout, in nanoseconds, applied to forwarded transfers when the
/// forward metadata does not specify one (5 minutes).
pub const DEFAULT_FORWARD_TIMEOUT: u64 = 5 * 60 * ibc_middleware_primitives::NANOS_PER_SECOND;
