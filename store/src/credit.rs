//! Quadratic credit storage trait.

use crate::StoreError;
use hush_types::{VoterAddress, VotingId};

/// Trait for credit balances and recorded quadratic allocations.
///
/// A missing balance means the voting's default allocation still applies.
pub trait CreditStore {
    fn get_credit_balance(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    fn get_allocation(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError>;

    /// All recorded allocations of one voting.
    fn iter_allocations(
        &self,
        voting: VotingId,
    ) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError>;
}
