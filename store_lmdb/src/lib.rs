//! LMDB storage backend for the HushVote protocol.
//!
//! Implements all storage traits from `hush-store` using the `heed` LMDB bindings.
//! Each logical store maps to one LMDB database within a single environment,
//! and every [`hush_store::WriteBatch`] is applied in exactly one write transaction.

pub mod credit;
pub mod environment;
pub mod error;
pub mod integrity;
pub mod meta;
pub mod migration;
pub mod voter;
pub mod voting;
pub mod write_batch;

pub use environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
pub use error::LmdbError;
pub use integrity::{check_data_dir, check_integrity, IntegrityReport};
pub use migration::{Migrator, CURRENT_SCHEMA_VERSION};
