//! Contains primitive types and helpers common to the IBC packet middlewares.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod dec;
mod denom;
mod duration;

pub use dec::*;
pub use denom::*;
pub use duration::*;

/// Re-exports the `alloc` prelude used across the middleware crates.
pub mod prelude {
    pub use ibc_primitives::prelude::*;
}

/// Re-exports `U256` from `primitive-types` crate for convenience.
pub use primitive_types::U256;
