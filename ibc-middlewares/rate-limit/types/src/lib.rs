//! Data structures of the IBC rate limit middleware, which bounds the amount
//! of a denom flowing through a channel within a time window to a share of
//! the denom's total supply.
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

mod direction;
mod flow;
mod genesis;
mod keys;
mod quota;
mod rate_limit;
mod whitelist;

pub mod error;
pub mod events;
pub mod proto;

pub use direction::*;
pub use flow::*;
pub use genesis::*;
pub use keys::*;
pub use quota::*;
pub use rate_limit::*;
pub use whitelist::*;

/// Module identifier of the rate limit middleware.
pub const MODULE_ID_STR: &str = "ratelimit";
