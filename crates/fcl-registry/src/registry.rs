use std::fmt;
use std::marker::PhantomData;

use fcl_store::KvStore;
use fcl_types::{scan_range, validate_identifier, Entity, EntityKind, TypeError};
use tracing::trace;

use crate::codec;
use crate::error::{RegistryError, RegistryResult};

/// Register / get / list-all for one entity kind.
///
/// A `Registry` is a thin typed view over a store: it fixes the key prefix
/// and record type, and owns nothing but the store handle. Several
/// registries can share one store through `Arc<S>` or `&S`.
pub struct Registry<T, S> {
    store: S,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Entity, S: KvStore> Registry<T, S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            _kind: PhantomData,
        }
    }

    /// The entity kind this registry stores.
    pub fn kind(&self) -> EntityKind {
        T::KIND
    }

    /// The key prefix for this registry's records.
    pub fn prefix(&self) -> &'static str {
        T::KIND.prefix()
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Store a new record for `id`, overwriting any record already there.
    ///
    /// The stored record's `id` is the full prefixed key. Returns the record
    /// exactly as written.
    pub fn register(&self, id: &str, attributes: T::Attributes) -> RegistryResult<T> {
        check_identifier(id)?;
        let key = T::KIND.key_for(id);
        let record = T::assemble(key, attributes);
        let payload = codec::encode(&record)?;
        self.store.put(record.key(), &payload)?;
        trace!(kind = %T::KIND, key = record.key(), "registered");
        Ok(record)
    }

    /// Load the record stored for `id`.
    pub fn get(&self, id: &str) -> RegistryResult<T> {
        check_identifier(id)?;
        let key = T::KIND.key_for(id);
        match self.store.get(&key)? {
            Some(payload) => codec::decode(&key, &payload),
            None => Err(RegistryError::NotFound { kind: T::KIND, key }),
        }
    }

    /// Every record of this kind in ascending key order.
    ///
    /// The first undecodable record or cursor failure aborts the whole
    /// listing; no partial result is returned. The cursor is released on
    /// every path.
    pub fn list_all(&self) -> RegistryResult<Vec<T>> {
        let range = scan_range(T::KIND.prefix());
        let scan = self.store.scan(&range.lo, &range.hi)?;

        let mut records = Vec::new();
        for pair in scan {
            let pair = pair?;
            records.push(codec::decode(&pair.key, &pair.value)?);
        }

        trace!(kind = %T::KIND, count = records.len(), "listed");
        Ok(records)
    }
}

impl<T, S: Clone> Clone for Registry<T, S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _kind: PhantomData,
        }
    }
}

impl<T: Entity, S> fmt::Debug for Registry<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &T::KIND)
            .field("prefix", &T::KIND.prefix())
            .finish()
    }
}

fn check_identifier(id: &str) -> RegistryResult<()> {
    validate_identifier(id).map_err(|e| match e {
        TypeError::InvalidIdentifier { id, reason } => {
            RegistryError::InvalidIdentifier { id, reason }
        }
        other => RegistryError::InvalidIdentifier {
            id: id.to_string(),
            reason: other.to_string(),
        },
    })
}
