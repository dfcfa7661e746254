//! Key construction and prefix scan ranges.
//!
//! A stored key is the kind prefix followed by the caller-supplied
//! identifier, with no escaping. A kind is enumerated by scanning the
//! half-open range `[prefix, prefix + "~")`.
//!
//! Valid identifiers:
//! - Must be non-empty
//! - Must not contain `~` or any byte that sorts after it (DEL and every
//!   byte of a non-ASCII UTF-8 sequence)
//!
//! An identifier that breaks the second rule would be stored outside the
//! scan range and silently disappear from enumeration, so it is rejected.

use crate::error::{TypeError, TypeResult};

/// Exclusive upper-bound suffix appended to a prefix for range scans.
pub const SCAN_SENTINEL: char = '~';

/// Half-open key range `[lo, hi)` in lexicographic byte order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyRange {
    pub lo: String,
    pub hi: String,
}

impl KeyRange {
    /// Returns `true` if `key` falls inside `[lo, hi)`.
    pub fn contains(&self, key: &str) -> bool {
        key >= self.lo.as_str() && key < self.hi.as_str()
    }
}

/// Build the storage key for `id` under `prefix`.
///
/// # Examples
///
/// ```
/// use fcl_types::key::make_key;
///
/// assert_eq!(make_key("farmer-", "1"), "farmer-1");
/// ```
pub fn make_key(prefix: &str, id: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + id.len());
    key.push_str(prefix);
    key.push_str(id);
    key
}

/// The scan range covering every key that starts with `prefix`.
pub fn scan_range(prefix: &str) -> KeyRange {
    let mut hi = String::with_capacity(prefix.len() + 1);
    hi.push_str(prefix);
    hi.push(SCAN_SENTINEL);
    KeyRange {
        lo: prefix.to_string(),
        hi,
    }
}

/// Validate a caller-supplied identifier, returning `Ok(())` if it is safe
/// to embed in a key.
///
/// # Examples
///
/// ```
/// use fcl_types::key::validate_identifier;
///
/// assert!(validate_identifier("42").is_ok());
/// assert!(validate_identifier("").is_err());
/// assert!(validate_identifier("a~b").is_err());
/// ```
pub fn validate_identifier(id: &str) -> TypeResult<()> {
    if id.is_empty() {
        return Err(TypeError::InvalidIdentifier {
            id: id.to_string(),
            reason: "identifier must not be empty".into(),
        });
    }

    let sentinel = SCAN_SENTINEL as u8;
    if let Some(pos) = id.bytes().position(|b| b >= sentinel) {
        return Err(TypeError::InvalidIdentifier {
            id: id.to_string(),
            reason: format!("byte at offset {pos} sorts at or after the scan sentinel '~'"),
        });
    }

    Ok(())
}

/// Returns `true` if no prefix in `prefixes` is a prefix of another.
///
/// Overlapping prefixes would make one kind's scan range swallow the
/// other kind's keys.
pub fn prefixes_are_disjoint(prefixes: &[&str]) -> bool {
    prefixes.iter().enumerate().all(|(i, a)| {
        prefixes
            .iter()
            .enumerate()
            .all(|(j, b)| i == j || !b.starts_with(a))
    })
}
