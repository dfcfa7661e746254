//! Ordered key-value storage for the FarmChain Ledger.
//!
//! The registry never talks to a concrete database. It consumes the narrow
//! [`KvStore`] capability defined here: point reads, unconditional writes,
//! and half-open range scans in ascending byte order.
//!
//! # Storage Backends
//!
//! - [`InMemoryKvStore`] - `BTreeMap`-based store for tests and embedding
//! - [`FileKvStore`] - append-only, CRC-framed log replayed into an ordered
//!   index on open
//!
//! # Design Rules
//!
//! 1. Keys are ordered by byte value; scans yield keys in ascending order.
//! 2. `get` distinguishes an absent key from a zero-length value.
//! 3. `put` overwrites unconditionally. Last writer wins.
//! 4. A scan cursor is released when dropped, on every exit path.
//! 5. The store never interprets values.
//! 6. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod scan;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::{FileKvStore, FileStoreConfig, SyncMode, DEFAULT_LOG_FILE};
pub use memory::InMemoryKvStore;
pub use scan::{KvPair, RangeScan};
pub use traits::KvStore;
