//! Scoped range-scan cursors.

use std::fmt;

use crate::error::StoreResult;

/// One key-value pair yielded by a range scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KvPair {
    pub key: String,
    pub value: Vec<u8>,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

type Cursor<'a> = Box<dyn Iterator<Item = StoreResult<KvPair>> + Send + 'a>;
type ReleaseHook<'a> = Box<dyn FnOnce() + Send + 'a>;

/// An open cursor over `[lo, hi)` yielding pairs in ascending key order.
///
/// The cursor holds backend resources until it is released. Release
/// happens exactly once: either explicitly through [`RangeScan::close`] or
/// implicitly when the cursor is dropped, so early returns and `?` paths
/// never leak it.
pub struct RangeScan<'a> {
    cursor: Option<Cursor<'a>>,
    on_release: Option<ReleaseHook<'a>>,
}

impl<'a> RangeScan<'a> {
    /// Wrap a backend iterator as a scan cursor.
    pub fn new<I>(cursor: I) -> Self
    where
        I: Iterator<Item = StoreResult<KvPair>> + Send + 'a,
    {
        Self {
            cursor: Some(Box::new(cursor)),
            on_release: None,
        }
    }

    /// A cursor that yields nothing.
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// Register a hook that runs once when the cursor is released.
    pub fn on_release<F>(mut self, hook: F) -> Self
    where
        F: FnOnce() + Send + 'a,
    {
        self.on_release = Some(Box::new(hook));
        self
    }

    /// Returns `true` until the cursor has been released.
    pub fn is_open(&self) -> bool {
        self.cursor.is_some()
    }

    /// Release the cursor now instead of at drop.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        self.cursor = None;
        if let Some(hook) = self.on_release.take() {
            hook();
        }
    }
}

impl Iterator for RangeScan<'_> {
    type Item = StoreResult<KvPair>;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.as_mut()?.next()
    }
}

impl Drop for RangeScan<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for RangeScan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeScan")
            .field("open", &self.is_open())
            .finish()
    }
}
