//! Implementation of the IBC packet forward middleware.
//!
//! The middleware wraps an ICS-20 application. A transfer received with
//! forward instructions in its memo is credited to an intermediate account
//! and forwarded to the next hop. The acknowledgement of the original packet
//! is written once the next hop resolves the forwarded one; on failure the
//! forward is retried or the original sender is refunded.
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
pub mod handler;
pub mod module;
pub mod registry;
pub mod state_machine;

/// Re-exports the packet forward middleware data structures from the
/// `ibc-middleware-packet-forward-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_middleware_packet_forward_types::*;
}
