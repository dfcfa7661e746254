//! Foundation types for the FarmChain Ledger (FCL).
//!
//! This crate provides the record and key types shared by every other FCL
//! crate. It has no knowledge of storage: it only describes what is stored
//! and under which key.
//!
//! # Key Types
//!
//! - [`EntityKind`] - The four registered entity kinds and their key prefixes
//! - [`Entity`] - Trait tying a record type to its kind and attribute set
//! - [`Farmer`], [`Consumer`], [`Product`], [`Transaction`] - Stored records
//! - [`KeyRange`] - Half-open scan range over one kind's keys
//!
//! # Key Scheme
//!
//! Every record lives at `<prefix><caller id>`. Enumerating a kind scans
//! `[<prefix>, <prefix>~)`, which is only complete when caller identifiers
//! avoid `~` and every byte that sorts after it. See [`key`].

pub mod entity;
pub mod error;
pub mod key;
pub mod records;

pub use entity::{Entity, EntityKind};
pub use error::{TypeError, TypeResult};
pub use key::{
    make_key, prefixes_are_disjoint, scan_range, validate_identifier, KeyRange, SCAN_SENTINEL,
};
pub use records::{
    Consumer, ConsumerAttributes, Farmer, FarmerAttributes, Product, ProductAttributes,
    Transaction, TransactionAttributes,
};
