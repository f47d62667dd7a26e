//! LMDB implementation of VoterStore.

use hush_store::keys::{decode_voter_key, voter_key, voting_key};
use hush_store::{StoreError, VoterStore};
use hush_types::{VoterAddress, VotingId};

use crate::{LmdbEnvironment, LmdbError};

impl VoterStore for LmdbEnvironment {
    fn get_voter(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .voters_db
            .get(&rtxn, &voter_key(voting, voter))
            .map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }

    fn iter_voters(&self, voting: VotingId) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let prefix = voting_key(voting);
        let mut result = Vec::new();
        for item in self
            .voters_db
            .prefix_iter(&rtxn, &prefix)
            .map_err(LmdbError::from)?
        {
            let (key, value) = item.map_err(LmdbError::from)?;
            let (_, voter) = decode_voter_key(key)?;
            result.push((voter, value.to_vec()));
        }
        Ok(result)
    }

    fn get_public_key(&self, voter: &VoterAddress) -> Result<Option<[u8; 32]>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .public_keys_db
            .get(&rtxn, voter.as_str().as_bytes())
            .map_err(LmdbError::from)?;
        match val {
            Some(bytes) => {
                let key: [u8; 32] = bytes.try_into().map_err(|_| {
                    StoreError::Corruption(format!("public key of {} bytes", bytes.len()))
                })?;
                Ok(Some(key))
            }
            None => Ok(None),
        }
    }
}
