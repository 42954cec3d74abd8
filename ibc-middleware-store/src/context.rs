use core::fmt::{Debug, Display};

use ibc_middleware_primitives::prelude::*;

use crate::types::Path;

/// An ordered key-value store over byte paths.
pub trait Store {
    /// Error type - expected to envelope all possible errors of the backend
    type Error: Debug + Display;

    /// Set `value` for `path`, returning the previous value if any
    fn set(&mut self, path: Path, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Get the `value` associated with `path`
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Delete `path`, returning the removed value if any
    fn delete(&mut self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Make the accumulated changes permanent
    fn apply(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Discard the accumulated changes
    fn reset(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Return all keys that start with `key_prefix`, in ascending byte order
    fn get_keys(&self, key_prefix: &Path) -> Result<Vec<Path>, Self::Error>;
}
