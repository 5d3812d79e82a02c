//! LMDB storage backend for the auditor election contract.
//!
//! Implements all storage traits from `auditor-store` using the `heed` LMDB bindings.
//! Each collection maps to one LMDB database within a single environment;
//! values are `bincode`-encoded records.

pub mod bio;
pub mod candidate;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod roster;
pub mod vote;
pub mod write_batch;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use meta::SCHEMA_VERSION;
