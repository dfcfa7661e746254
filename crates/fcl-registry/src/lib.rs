//! Prefixed entity registry for the FarmChain Ledger (FCL).
//!
//! This crate is the core of FCL. It provides:
//! - A generic [`Registry`] implementing register / get / list-all for any
//!   [`Entity`](fcl_types::Entity) over any [`KvStore`](fcl_store::KvStore)
//! - The JSON payload codec used for every stored record
//! - A typed error taxonomy separating "missing" from "corrupt" from
//!   "storage failed"
//! - The [`FarmChain`] facade with the named per-kind operations
//!
//! The registry holds no state of its own. Every call computes its key,
//! touches the store, and returns; errors are propagated to the caller
//! without logging, retry, or partial results.

pub mod codec;
pub mod error;
pub mod facade;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use facade::FarmChain;
pub use registry::Registry;
