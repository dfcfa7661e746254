use std::sync::Arc;

use crate::error::StoreResult;
use crate::scan::RangeScan;

/// Ordered key-value store.
///
/// All implementations must satisfy these invariants:
/// - Keys are totally ordered by byte value.
/// - A write is visible to every read issued after it returns
///   (read-your-writes).
/// - `get` returns `Ok(None)` only when no value exists; a stored empty
///   value is `Ok(Some(vec![]))`.
/// - `put` is an unconditional upsert with no version check.
/// - The store never interprets values.
pub trait KvStore: Send + Sync {
    /// Point lookup.
    ///
    /// Returns `Ok(None)` if the key does not exist.
    /// Returns `Err` on I/O or backend failure.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Write `value` at `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Open a cursor over the half-open range `[lo, hi)`.
    ///
    /// An inverted or empty range yields an empty cursor, not an error.
    fn scan(&self, lo: &str, hi: &str) -> StoreResult<RangeScan<'_>>;

    /// Check whether a key exists.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<S: KvStore + ?Sized> KvStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn scan(&self, lo: &str, hi: &str) -> StoreResult<RangeScan<'_>> {
        (**self).scan(lo, hi)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn scan(&self, lo: &str, hi: &str) -> StoreResult<RangeScan<'_>> {
        (**self).scan(lo, hi)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }
}
