//! LMDB implementation of VotingStore.

use hush_store::keys::{decode_voting_key, request_key, voting_key};
use hush_store::{StoreError, VotingStore};
use hush_types::VotingId;

use crate::{LmdbEnvironment, LmdbError};

impl VotingStore for LmdbEnvironment {
    fn get_voting(&self, id: VotingId) -> Result<Option<Vec<u8>>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .votings_db
            .get(&rtxn, &voting_key(id))
            .map_err(LmdbError::from)?;
        Ok(val.map(|bytes| bytes.to_vec()))
    }

    fn iter_votings(&self) -> Result<Vec<(VotingId, Vec<u8>)>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let mut result = Vec::new();
        for item in self.votings_db.iter(&rtxn).map_err(LmdbError::from)? {
            let (key, value) = item.map_err(LmdbError::from)?;
            result.push((decode_voting_key(key)?, value.to_vec()));
        }
        Ok(result)
    }

    fn voting_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        Ok(self.votings_db.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn get_decryption_request(&self, request_id: u64) -> Result<Option<VotingId>, StoreError> {
        let rtxn = self.env().read_txn().map_err(LmdbError::from)?;
        let val = self
            .decryption_requests_db
            .get(&rtxn, &request_key(request_id))
            .map_err(LmdbError::from)?;
        val.map(decode_voting_key).transpose()
    }
}
