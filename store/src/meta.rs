//! Metadata storage trait.

use crate::StoreError;

/// Next voting id to assign (u64 big-endian).
pub const NEXT_VOTING_ID_KEY: &str = "next_voting_id";
/// Current owner address (UTF-8).
pub const OWNER_KEY: &str = "owner";
/// Emergency pause flag (one byte).
pub const PAUSED_KEY: &str = "paused";

/// Trait for storing ledger-wide metadata (counters, ownership, schema version).
///
/// This is a generic key-value store for internal bookkeeping that doesn't
/// belong in any domain-specific store.
pub trait MetaStore {
    /// Store a metadata value outside of a batch.
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Retrieve a metadata value.
    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Get the current database schema version (0 for a fresh database).
    fn get_schema_version(&self) -> Result<u32, StoreError>;

    /// Set the database schema version.
    fn set_schema_version(&self, version: u32) -> Result<(), StoreError>;
}
