use displaydoc::Display;
use ibc_middleware_primitives::prelude::*;

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum StoreError {
    /// store backend error: `{description}`
    Backend { description: String },
    /// failed to decode stored value at `{path}`: `{description}`
    Decoding { path: String, description: String },
}

impl StoreError {
    pub fn backend<E: core::fmt::Display>(err: E) -> Self {
        Self::Backend {
            description: err.to_string(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for StoreError {}
