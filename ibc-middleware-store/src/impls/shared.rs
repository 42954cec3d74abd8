use core::ops::{Deref, DerefMut};
use std::sync::{Arc, RwLock};

use ibc_middleware_primitives::prelude::*;

use crate::context::Store;
use crate::types::Path;
use crate::utils::{SharedRw, SharedRwExt};

/// Wraps a store to make it shareable by cloning
#[derive(Clone, Debug)]
pub struct SharedStore<S>(SharedRw<S>);

impl<S> SharedStore<S> {
    pub fn new(store: S) -> Self {
        Self(Arc::new(RwLock::new(store)))
    }

    pub fn share(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<S> Default for SharedStore<S>
where
    S: Default + Store,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store for SharedStore<S>
where
    S: Store,
{
    type Error = S::Error;

    #[inline]
    fn set(&mut self, path: Path, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error> {
        self.write_access().set(path, value)
    }

    #[inline]
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        self.read_access().get(path)
    }

    #[inline]
    fn delete(&mut self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        self.write_access().delete(path)
    }

    #[inline]
    fn apply(&mut self) -> Result<(), Self::Error> {
        self.write_access().apply()
    }

    #[inline]
    fn reset(&mut self) -> Result<(), Self::Error> {
        self.write_access().reset()
    }

    #[inline]
    fn get_keys(&self, key_prefix: &Path) -> Result<Vec<Path>, Self::Error> {
        self.read_access().get_keys(key_prefix)
    }
}

impl<S> Deref for SharedStore<S> {
    type Target = Arc<RwLock<S>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S> DerefMut for SharedStore<S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
