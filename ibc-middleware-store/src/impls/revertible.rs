use ibc_middleware_primitives::prelude::*;
use tracing::trace;

use crate::context::Store;
use crate::types::Path;

/// A wrapper store that implements rudimentary `apply()`/`reset()` support for other stores
#[derive(Clone, Debug)]
pub struct RevertibleStore<S> {
    /// backing store
    store: S,
    /// operation log for recording rollback operations in preserved order
    op_log: Vec<RevertOp>,
}

#[derive(Clone, Debug)]
enum RevertOp {
    Delete(Path),
    Set(Path, Vec<u8>),
}

impl<S> RevertibleStore<S>
where
    S: Store,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            op_log: vec![],
        }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    fn record(&mut self, path: Path, old_value: Option<Vec<u8>>) {
        match old_value {
            // no old value means the path did not exist before
            None => self.op_log.push(RevertOp::Delete(path)),
            Some(old_value) => self.op_log.push(RevertOp::Set(path, old_value)),
        }
    }
}

impl<S> Default for RevertibleStore<S>
where
    S: Default + Store,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store for RevertibleStore<S>
where
    S: Store,
{
    type Error = S::Error;

    #[inline]
    fn set(&mut self, path: Path, value: Vec<u8>) -> Result<Option<Vec<u8>>, Self::Error> {
        let old_value = self.store.set(path.clone(), value)?;
        self.record(path, old_value.clone());
        Ok(old_value)
    }

    #[inline]
    fn get(&self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        self.store.get(path)
    }

    #[inline]
    fn delete(&mut self, path: &Path) -> Result<Option<Vec<u8>>, Self::Error> {
        let old_value = self.store.delete(path)?;
        if let Some(ref old_value) = old_value {
            self.op_log.push(RevertOp::Set(path.clone(), old_value.clone()));
        }
        Ok(old_value)
    }

    #[inline]
    fn apply(&mut self) -> Result<(), Self::Error> {
        // note that we do NOT call the backing store's apply here - this allows users to create
        // multilayered stores
        self.op_log.clear();
        Ok(())
    }

    #[inline]
    fn reset(&mut self) -> Result<(), Self::Error> {
        // reverts go straight to the backing store so they are not logged again
        trace!("Rollback operation log changes");
        while let Some(op) = self.op_log.pop() {
            match op {
                RevertOp::Delete(path) => {
                    self.store.delete(&path)?;
                }
                RevertOp::Set(path, value) => {
                    self.store.set(path, value)?;
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn get_keys(&self, key_prefix: &Path) -> Result<Vec<Path>, Self::Error> {
        self.store.get_keys(key_prefix)
    }
}
