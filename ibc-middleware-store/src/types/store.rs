use core::marker::PhantomData;

use ibc_middleware_primitives::prelude::*;
use tracing::trace;

use crate::context::Store;
use crate::error::StoreError;
#[cfg(feature = "std")]
use crate::impls::{RevertibleStore, SharedStore};
use crate::types::Path;
use crate::utils::codec::{NullCodec, ProtobufCodec};
use crate::utils::Codec;

#[cfg(feature = "std")]
pub type MainStore<S> = SharedStore<RevertibleStore<S>>;

/// A `TypedStore` that uses the `ProtobufCodec`
pub type ProtobufStore<K, V, R> = TypedStore<K, ProtobufCodec<V, R>>;

/// A `TypedSet` that stores only paths and no values
pub type TypedSet<K> = TypedStore<K, NullCodec>;

/// Typed access to the values stored under the paths of key type `K`,
/// encoded with the codec `C`.
///
/// The accessor holds no store; every operation takes the store it works on.
#[derive(Clone, Debug)]
pub struct TypedStore<K, C> {
    _key: PhantomData<K>,
    _codec: PhantomData<C>,
}

impl<K, C, V> TypedStore<K, C>
where
    C: Codec<Type = V>,
    K: Into<Path>,
{
    #[inline]
    pub fn set<S: Store>(store: &mut S, key: K, value: &V) -> Result<(), StoreError> {
        let path = key.into();
        trace!("typed set at path = {path}");
        store
            .set(path, C::encode(value))
            .map(|_| ())
            .map_err(StoreError::backend)
    }

    #[inline]
    pub fn get<S: Store>(store: &S, key: K) -> Result<Option<V>, StoreError> {
        let path = key.into();
        store
            .get(&path)
            .map_err(StoreError::backend)?
            .map(|bytes| decode::<C>(&path, &bytes))
            .transpose()
    }

    /// Removes the value under `key`. Returns whether one was present.
    #[inline]
    pub fn delete<S: Store>(store: &mut S, key: K) -> Result<bool, StoreError> {
        let path = key.into();
        trace!("typed delete at path = {path}");
        store
            .delete(&path)
            .map(|removed| removed.is_some())
            .map_err(StoreError::backend)
    }

    /// Returns every entry under `prefix` in ascending path order.
    pub fn get_all<S: Store>(store: &S, prefix: &Path) -> Result<Vec<(K, V)>, StoreError>
    where
        K: TryFrom<Path, Error = StoreError>,
    {
        let keys = store.get_keys(prefix).map_err(StoreError::backend)?;
        let mut entries = Vec::with_capacity(keys.len());
        for path in keys {
            let Some(bytes) = store.get(&path).map_err(StoreError::backend)? else {
                continue;
            };
            let value = decode::<C>(&path, &bytes)?;
            entries.push((K::try_from(path)?, value));
        }
        Ok(entries)
    }
}

impl<K> TypedStore<K, NullCodec>
where
    K: Into<Path>,
{
    #[inline]
    pub fn set_path<S: Store>(store: &mut S, key: K) -> Result<(), StoreError> {
        Self::set(store, key, &())
    }

    #[inline]
    pub fn is_path_set<S: Store>(store: &S, key: K) -> Result<bool, StoreError> {
        Self::get(store, key).map(|value| value.is_some())
    }

    /// Returns every key under `prefix` in ascending path order.
    pub fn get_all_keys<S: Store>(store: &S, prefix: &Path) -> Result<Vec<K>, StoreError>
    where
        K: TryFrom<Path, Error = StoreError>,
    {
        store
            .get_keys(prefix)
            .map_err(StoreError::backend)?
            .into_iter()
            .map(K::try_from)
            .collect()
    }
}

fn decode<C: Codec>(path: &Path, bytes: &[u8]) -> Result<C::Type, StoreError> {
    C::decode(bytes).map_err(|e| StoreError::Decoding {
        path: path.to_string(),
        description: e.to_string(),
    })
}
