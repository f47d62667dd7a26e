//! Voting storage trait.

use crate::StoreError;
use hush_types::VotingId;

/// Trait for reading voting aggregates.
pub trait VotingStore {
    /// Serialised voting record, if the id was ever assigned.
    fn get_voting(&self, id: VotingId) -> Result<Option<Vec<u8>>, StoreError>;

    /// All votings in ascending id order.
    fn iter_votings(&self) -> Result<Vec<(VotingId, Vec<u8>)>, StoreError>;

    /// Number of stored votings.
    fn voting_count(&self) -> Result<u64, StoreError>;

    /// The voting a decryption request was issued for.
    fn get_decryption_request(&self, request_id: u64) -> Result<Option<VotingId>, StoreError>;
}
