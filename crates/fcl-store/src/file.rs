//! Durable ordered store backed by an append-only log.
//!
//! Every `put` appends one framed record to the log before it becomes
//! visible in the in-memory index. Opening the store replays the log front
//! to back, so the latest record for a key wins.
//!
//! On-disk format, repeated per record:
//! ```text
//! [4 bytes: payload length (little-endian u32)]
//! [4 bytes: CRC32 of payload (little-endian u32)]
//! [N bytes: payload (bincode-serialized LogRecord)]
//! ```
//!
//! Recovery rules:
//! - A record that fails its CRC check or does not decode fails `open`.
//!   The log is left untouched.
//! - A frame that is cut short at the very end of the log is a torn write
//!   and is cut off. If an intact record follows it, the header is corrupt
//!   instead and `open` fails.
//! - A failed append is rolled back, so the log never holds a record the
//!   caller was told did not land.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicUsize;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::memory::{snapshot_range, tracked_scan};
use crate::scan::RangeScan;
use crate::traits::KvStore;

/// File name of the log inside a data directory.
pub const DEFAULT_LOG_FILE: &str = "ledger.log";

/// Header size: 4 bytes length + 4 bytes CRC.
const HEADER_SIZE: usize = 8;

/// Flush/sync strategy for the log.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SyncMode {
    /// `fsync` after every write.
    EveryWrite,
    /// Hand every write to the OS and rely on its page cache.
    #[default]
    OsDefault,
}

/// Configuration for [`FileKvStore`].
#[derive(Clone, Debug, Default)]
pub struct FileStoreConfig {
    pub sync_mode: SyncMode,
}

#[derive(Debug, Serialize, Deserialize)]
struct LogRecord {
    key: String,
    value: Vec<u8>,
}

/// The log as the writer sees it.
trait LogFile: Write {
    fn truncate(&mut self, len: u64) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
}

impl LogFile for File {
    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// Unbuffered appender. Each record goes out in one `write_all`, so a
/// failed append leaves nothing queued for a later one to flush.
struct LogWriter<F = File> {
    file: F,
    /// Length of the valid log in bytes.
    offset: u64,
    /// Set when a failed append could not be rolled back.
    broken: Option<String>,
}

impl<F: LogFile> LogWriter<F> {
    fn new(file: F, offset: u64) -> Self {
        Self {
            file,
            offset,
            broken: None,
        }
    }

    /// Append one record and return the new log length.
    ///
    /// On failure the log is cut back to its previous length. If that also
    /// fails, the writer refuses every later append.
    fn append(&mut self, key: &str, value: &[u8], sync: bool) -> StoreResult<u64> {
        if let Some(reason) = &self.broken {
            return Err(StoreError::Backend(format!(
                "log writer disabled after failed rollback: {reason}"
            )));
        }

        let frame = encode_frame(key, value)?;
        if let Err(e) = self.write_frame(&frame, sync) {
            if let Err(rollback) = self.file.truncate(self.offset) {
                warn!(offset = self.offset, error = %rollback, "log rollback failed");
                self.broken = Some(rollback.to_string());
            }
            return Err(e.into());
        }

        self.offset += frame.len() as u64;
        Ok(self.offset)
    }

    fn write_frame(&mut self, frame: &[u8], sync: bool) -> io::Result<()> {
        self.file.write_all(frame)?;
        self.file.flush()?;
        if sync {
            self.file.sync()?;
        }
        Ok(())
    }
}

/// Ordered store persisted as a CRC-framed append-only log.
pub struct FileKvStore {
    path: PathBuf,
    index: RwLock<BTreeMap<String, Vec<u8>>>,
    writer: Mutex<LogWriter>,
    config: FileStoreConfig,
    open_scans: Arc<AtomicUsize>,
}

impl FileKvStore {
    /// Open (or create) the log at `path` and replay it into memory.
    ///
    /// A torn record at the tail (from a crash mid-write) is cut off so new
    /// records append cleanly after the last complete one. Any other damage
    /// fails with the offset of the bad record and leaves the file as it is.
    pub fn open(path: &Path, config: FileStoreConfig) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(path)?;

        let Replay { index, valid_len } = replay(path)?;
        let file_len = file.metadata()?.len();
        if valid_len < file_len {
            warn!(
                path = %path.display(),
                valid_len,
                file_len,
                "discarding torn log tail"
            );
            file.set_len(valid_len)?;
        }

        debug!(path = %path.display(), keys = index.len(), "log store opened");

        Ok(Self {
            path: path.to_path_buf(),
            index: RwLock::new(index),
            writer: Mutex::new(LogWriter::new(file, valid_len)),
            config,
            open_scans: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current length of the log in bytes.
    pub fn log_len(&self) -> StoreResult<u64> {
        let w = self.writer.lock().map_err(StoreError::poisoned)?;
        Ok(w.offset)
    }

    /// Number of live keys.
    pub fn len(&self) -> usize {
        self.index.read().map(|m| m.len()).unwrap_or(0)
    }

    /// Returns `true` if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of scan cursors that have been opened and not yet released.
    pub fn open_scans(&self) -> usize {
        self.open_scans.load(std::sync::atomic::Ordering::SeqCst)
    }

    /// Rewrite the log so it holds exactly one record per live key.
    ///
    /// The new log is written beside the old one and renamed over it, so a
    /// crash during compaction leaves the previous log intact. Returns the
    /// number of records written.
    pub fn compact(&self) -> StoreResult<usize> {
        let mut w = self.writer.lock().map_err(StoreError::poisoned)?;
        let index = self.index.read().map_err(StoreError::poisoned)?;

        let tmp_path = self.path.with_extension("compact");
        let mut offset = 0u64;
        {
            let mut tmp = BufWriter::new(File::create(&tmp_path)?);
            for (key, value) in index.iter() {
                let frame = encode_frame(key, value)?;
                tmp.write_all(&frame)?;
                offset += frame.len() as u64;
            }
            tmp.flush()?;
            tmp.get_ref().sync_all()?;
        }
        fs::rename(&tmp_path, &self.path)?;

        let file = OpenOptions::new().read(true).append(true).open(&self.path)?;
        let before = w.offset;
        *w = LogWriter::new(file, offset);

        debug!(records = index.len(), before, after = offset, "log compacted");
        Ok(index.len())
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let index = self.index.read().map_err(StoreError::poisoned)?;
        Ok(index.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut w = self.writer.lock().map_err(StoreError::poisoned)?;
        let offset = w.append(key, value, self.config.sync_mode == SyncMode::EveryWrite)?;

        // Publish only after the record is in the log.
        let mut index = self.index.write().map_err(StoreError::poisoned)?;
        index.insert(key.to_string(), value.to_vec());

        debug!(key, len = value.len(), offset, "log append");
        Ok(())
    }

    fn scan(&self, lo: &str, hi: &str) -> StoreResult<RangeScan<'_>> {
        let pairs = {
            let index = self.index.read().map_err(StoreError::poisoned)?;
            snapshot_range(&index, lo, hi)
        };
        Ok(tracked_scan(pairs, &self.open_scans))
    }
}

impl std::fmt::Debug for FileKvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileKvStore")
            .field("path", &self.path)
            .field("key_count", &self.len())
            .finish()
    }
}

/// Serialize and frame one record.
fn encode_frame(key: &str, value: &[u8]) -> StoreResult<Vec<u8>> {
    let record = LogRecord {
        key: key.to_string(),
        value: value.to_vec(),
    };
    let payload =
        bincode::serialize(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
    let length = u32::try_from(payload.len())
        .map_err(|_| StoreError::Serialization(format!("record for {key} exceeds 4 GiB")))?;
    let crc = crc32fast::hash(&payload);

    let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
    frame.extend_from_slice(&length.to_le_bytes());
    frame.extend_from_slice(&crc.to_le_bytes());
    frame.extend_from_slice(&payload);
    Ok(frame)
}

/// Length field of the header at the start of `bytes`, or 0 if the header
/// is cut short.
fn declared_length(bytes: &[u8]) -> u32 {
    match bytes.get(..4) {
        Some(b) => u32::from_le_bytes([b[0], b[1], b[2], b[3]]),
        None => 0,
    }
}

/// Split the frame at the start of `bytes` into its stored CRC and payload.
///
/// Returns `None` for a short header, a zero length, or a payload running
/// past the end of `bytes`.
fn split_frame(bytes: &[u8]) -> Option<(u32, &[u8])> {
    let header = bytes.get(..HEADER_SIZE)?;
    let length = declared_length(header) as usize;
    let crc = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    if length == 0 {
        return None;
    }
    let payload = bytes.get(HEADER_SIZE..HEADER_SIZE.checked_add(length)?)?;
    Some((crc, payload))
}

/// First offset at or after `from` holding a complete, checksummed,
/// decodable record.
fn next_intact_frame(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&pos| match split_frame(&bytes[pos..]) {
        Some((crc, payload)) => {
            crc32fast::hash(payload) == crc && bincode::deserialize::<LogRecord>(payload).is_ok()
        }
        None => false,
    })
}

struct Replay {
    index: BTreeMap<String, Vec<u8>>,
    /// Length of the intact log. Bytes past it are a torn tail.
    valid_len: u64,
}

fn replay(path: &Path) -> StoreResult<Replay> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;
    replay_bytes(&bytes)
}

/// Replay a log image into an ordered index.
fn replay_bytes(bytes: &[u8]) -> StoreResult<Replay> {
    let mut index = BTreeMap::new();
    let mut offset = 0usize;

    while offset < bytes.len() {
        let Some((expected, payload)) = split_frame(&bytes[offset..]) else {
            let length = declared_length(&bytes[offset..]);
            if let Some(next) = next_intact_frame(bytes, offset + 1) {
                return Err(StoreError::InvalidRecordLength {
                    offset: offset as u64,
                    length,
                    next: next as u64,
                });
            }
            warn!(offset, length, tail = bytes.len() - offset, "torn record at end of log");
            break;
        };

        let actual = crc32fast::hash(payload);
        if actual != expected {
            return Err(StoreError::CrcMismatch {
                offset: offset as u64,
                expected,
                actual,
            });
        }

        let record: LogRecord = bincode::deserialize(payload).map_err(|e| {
            StoreError::Serialization(format!("log record at offset {offset}: {e}"))
        })?;
        index.insert(record.key, record.value);
        offset += HEADER_SIZE + payload.len();
    }

    debug!(keys = index.len(), valid_len = offset, "log replay complete");
    Ok(Replay {
        index,
        valid_len: offset as u64,
    })
}
