use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::scan::{KvPair, RangeScan};
use crate::traits::KvStore;

/// In-memory, `BTreeMap`-based ordered store.
///
/// Intended for tests and embedding. Values live behind a `RwLock`; a scan
/// copies its range out when opened, so a cursor never holds the lock and
/// writes issued while it is open do not affect it.
pub struct InMemoryKvStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_scans: Arc<AtomicUsize>,
}

impl InMemoryKvStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            open_scans: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        let map = self.entries.read().map_err(StoreError::poisoned)?;
        Ok(map.keys().cloned().collect())
    }

    /// Number of scan cursors that have been opened and not yet released.
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let map = self.entries.read().map_err(StoreError::poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.entries.write().map_err(StoreError::poisoned)?;
        map.insert(key.to_string(), value.to_vec());
        trace!(key, len = value.len(), "put");
        Ok(())
    }

    fn scan(&self, lo: &str, hi: &str) -> StoreResult<RangeScan<'_>> {
        let pairs = {
            let map = self.entries.read().map_err(StoreError::poisoned)?;
            snapshot_range(&map, lo, hi)
        };
        Ok(tracked_scan(pairs, &self.open_scans))
    }
}

impl std::fmt::Debug for InMemoryKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryKvStore")
            .field("key_count", &self.len())
            .field("open_scans", &self.open_scans())
            .finish()
    }
}

/// Copy every pair in `[lo, hi)` out of an ordered map.
pub(crate) fn snapshot_range(map: &BTreeMap<String, Vec<u8>>, lo: &str, hi: &str) -> Vec<KvPair> {
    // `BTreeMap::range` panics on an inverted range.
    if lo >= hi {
        return Vec::new();
    }
    map.range::<str, _>((Bound::Included(lo), Bound::Excluded(hi)))
        .map(|(k, v)| KvPair::new(k.clone(), v.clone()))
        .collect()
}

/// Wrap a snapshot as a cursor that is counted in `open` until released.
pub(crate) fn tracked_scan<'a>(pairs: Vec<KvPair>, open: &Arc<AtomicUsize>) -> RangeScan<'a> {
    let count = pairs.len();
    let open = Arc::clone(open);
    open.fetch_add(1, Ordering::SeqCst);
    trace!(count, "scan opened");
    RangeScan::new(pairs.into_iter().map(Ok)).on_release(move || {
        open.fetch_sub(1, Ordering::SeqCst);
        trace!("scan released");
    })
}
