//! Ordered key-value store abstraction the IBC packet middlewares persist
//! their state through.
//!
//! Hosts implement [`Store`] over their own backend. [`InMemoryStore`]
//! together with [`RevertibleStore`] is a complete backend for tests and
//! simple hosts.
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

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod context;
pub mod error;
pub mod impls;
pub mod types;
pub mod utils;

pub use context::Store;
pub use error::StoreError;
pub use impls::*;
pub use types::*;
pub use utils::codec::{Codec, NullCodec, ProtobufCodec, U64Codec};
