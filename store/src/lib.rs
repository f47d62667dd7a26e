//! Abstract storage traits for the HushVote protocol.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits. The rest of the codebase depends only on the traits.
//!
//! Values are opaque bytes: the voting engine serialises its own records, so
//! this crate never depends on `hush-voting`. Reads go through the per-area
//! traits; every write goes through a [`WriteBatch`] handed to
//! [`LedgerStore::commit`], which applies it atomically.

pub mod batch;
pub mod credit;
pub mod error;
pub mod keys;
pub mod meta;
pub mod voter;
pub mod voting;

pub use batch::{BatchOp, WriteBatch};
pub use credit::CreditStore;
pub use error::StoreError;
pub use meta::MetaStore;
pub use voter::VoterStore;
pub use voting::VotingStore;

/// A complete ledger backend.
///
/// `commit` must apply every operation of the batch or none of them.
pub trait LedgerStore: VotingStore + VoterStore + CreditStore + MetaStore + Send + Sync {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError>;
}
