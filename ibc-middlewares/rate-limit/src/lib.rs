//! Implementation of the IBC rate limit middleware.
//!
//! Every ICS-20 transfer sent or received on a channel is counted against
//! the quota of its denom on that channel, if any. A transfer that would
//! push the flow of the current window past the quota is denied. Sends that
//! later fail are taken back out of the flow, provided their window is
//! still the current one.
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

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod context;
pub mod genesis;
pub mod keeper;
pub mod module;
pub mod packet;
pub mod rate_limiter;

/// Re-exports the rate limit middleware data structures from the
/// `ibc-middleware-rate-limit-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_middleware_rate_limit_types::*;
}
