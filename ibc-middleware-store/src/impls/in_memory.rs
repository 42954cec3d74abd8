use alloc::collections::BTreeMap;
use core::convert::Infallible;
use core::ops::Bound;

use ibc_middleware_primitives::prelude::*;
use tracing::trace;

use crate::context::Store;
use crate::types::Path;

/// An in-memory store backed by a `BTreeMap`.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    state: BTreeMap<Path, Vec<u8>>,
}

impl InMemoryStore {
    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }
}

impl Store for InMemoryStore {
    type Error = Infallible; // underlying store ops are infallible

    fn set(&mut self, path: Path, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error> {
        trace!("set at path = {path}");
        Ok(self.state.insert(path, value))
    }

    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        trace!("get at path = {path}");
        Ok(self.state.get(path).cloned())
    }

    fn delete(&mut self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        trace!("delete at path = {path}");
        Ok(self.state.remove(path))
    }

    fn get_keys(&self, key_prefix: &Path) -> Result<Vec<Path>, Self::Error> {
        Ok(self
            .state
            .range((Bound::Included(key_prefix), Bound::Unbounded))
            .map(|(path, _)| path)
            .take_while(|path| path.starts_with(key_prefix))
            .cloned()
            .collect())
    }
}
