//! LMDB implementation of CreditStore.

use hush_store::keys::{decode_voter_key, voter_key, voting_key};
use hush_store::{CreditStore, StoreError};
use hush_types::{VoterAddress, VotingId};

use crate::{LmdbEnvironment, LmdbError};

impl CreditStore for LmdbEnvironment {
    fn get_credit_balance(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .credits_db
            .get(&rtxn, &voter_key(voting, voter))
            .map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }

    fn get_allocation(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .allocations_db
            .get(&rtxn, &voter_key(voting, voter))
            .map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }

    fn iter_allocations(
        &self,
        voting: VotingId,
    ) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let prefix = voting_key(voting);
        let mut result = Vec::new();
        for item in self
            .allocations_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            let (key, value) = item.map_err(LmdbError::from)?;
            let (_, voter) = decode_voter_key(key)?;
            result.push((voter, value.to_vec()));
        }
        Ok(result)
    }
}
