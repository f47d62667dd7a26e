//! Applies a [`WriteBatch`] inside a single LMDB write transaction.
//!
//! If any put fails the transaction is dropped without commit, which aborts
//! it, so a batch is either fully visible or not at all.

use hush_store::keys::{request_key, voter_key, voting_key};
use hush_store::{BatchOp, LedgerStore, StoreError, WriteBatch};

use crate::{LmdbEnvironment, LmdbError};

impl LedgerStore for LmdbEnvironment {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        let op_count = batch.len();
        let mut wtxn = self.env().write_txn().map_err(LmdbError::from)?;

        for op in batch.into_ops() {
            match op {
                BatchOp::PutVoting { id, data } => {
                    self.votings_db
                        .put(&mut wtxn, &voting_key(id), &data)
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutVoter {
                    voting,
                    voter,
                    data,
                } => {
                    self.voters_db
                        .put(&mut wtxn, &voter_key(voting, &voter), &data)
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutCreditBalance {
                    voting,
                    voter,
                    data,
                } => {
                    self.credits_db
                        .put(&mut wtxn, &voter_key(voting, &voter), &data)
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutAllocation {
                    voting,
                    voter,
                    data,
                } => {
                    self.allocations_db
                        .put(&mut wtxn, &voter_key(voting, &voter), &data)
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutPublicKey { voter, key } => {
                    self.public_keys_db
                        .put(&mut wtxn, voter.as_str().as_bytes(), &key)
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutDecryptionRequest { request_id, voting } => {
                    self.decryption_requests_db
                        .put(&mut wtxn, &request_key(request_id), &voting_key(voting))
                        .map_err(LmdbError::from)?;
                }
                BatchOp::PutMeta { key, value } => {
                    self.meta_db
                        .put(&mut wtxn, key.as_bytes(), &value)
                        .map_err(LmdbError::from)?;
                }
            }
        }

        wtxn.commit().map_err(LmdbError::from)?;
        tracing::trace!(ops = op_count, "committed write batch");
        Ok(())
    }
}
