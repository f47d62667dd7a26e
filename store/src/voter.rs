//! Voter record and public key storage trait.

use crate::StoreError;
use hush_types::{VoterAddress, VotingId};

/// Trait for per-(voting, voter) records and the voter public key registry.
pub trait VoterStore {
    fn get_voter(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// All voter records of one voting.
    fn iter_voters(&self, voting: VotingId) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError>;

    fn get_public_key(&self, voter: &VoterAddress) -> Result<Option<[u8; 32]>, StoreError>;
}
