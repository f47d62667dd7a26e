//! Nullable store: thread-safe in-memory ledger for testing.

use hush_store::keys::{voter_key, voting_key, VOTING_KEY_LEN};
use hush_store::{
    BatchOp, CreditStore, LedgerStore, MetaStore, StoreError, VoterStore, VotingStore, WriteBatch,
};
use hush_types::{VoterAddress, VotingId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct Tables {
    votings: BTreeMap<VotingId, Vec<u8>>,
    voters: BTreeMap<Vec<u8>, (VoterAddress, Vec<u8>)>,
    credits: HashMap<Vec<u8>, Vec<u8>>,
    allocations: BTreeMap<Vec<u8>, (VoterAddress, Vec<u8>)>,
    public_keys: HashMap<VoterAddress, [u8; 32]>,
    decryption_requests: HashMap<u64, VotingId>,
    meta: HashMap<String, Vec<u8>>,
    schema_version: u32,
}

/// An in-memory implementation of every ledger trait.
///
/// All tables sit behind one mutex so a batch commit is atomic with respect
/// to concurrent readers. Thread-safe for use with tokio's multi-threaded runtime.
pub struct NullStore {
    tables: Mutex<Tables>,
    commits: Mutex<usize>,
    commits_failing: AtomicBool,
}

impl NullStore {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            commits: Mutex::new(0),
            commits_failing: AtomicBool::new(false),
        }
    }

    /// Number of batches committed so far.
    pub fn commit_count(&self) -> usize {
        *self.commits.lock().unwrap()
    }

    /// Make subsequent commits fail without applying anything, as if the
    /// disk were full.
    pub fn set_commits_failing(&self, failing: bool) {
        self.commits_failing.store(failing, Ordering::SeqCst);
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new()
    }
}

fn prefixed<'a>(
    table: &'a BTreeMap<Vec<u8>, (VoterAddress, Vec<u8>)>,
    voting: VotingId,
) -> impl Iterator<Item = (VoterAddress, Vec<u8>)> + 'a {
    let prefix = voting_key(voting);
    table
        .range(prefix.to_vec()..)
        .take_while(move |(key, _)| key.len() >= VOTING_KEY_LEN && key[..VOTING_KEY_LEN] == prefix)
        .map(|(_, (voter, data))| (voter.clone(), data.clone()))
}

impl VotingStore for NullStore {
    fn get_voting(&self, id: VotingId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables.lock().unwrap().votings.get(&id).cloned())
    }

    fn iter_votings(&self) -> Result<Vec<(VotingId, Vec<u8>)>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .votings
            .iter()
            .map(|(id, data)| (*id, data.clone()))
            .collect())
    }

    fn voting_count(&self) -> Result<u64, StoreError> {
        Ok(self.tables.lock().unwrap().votings.len() as u64)
    }

    fn get_decryption_request(&self, request_id: u64) -> Result<Option<VotingId>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .decryption_requests
            .get(&request_id)
            .copied())
    }
}

impl VoterStore for NullStore {
    fn get_voter(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .voters
            .get(&voter_key(voting, voter))
            .map(|(_, data)| data.clone()))
    }

    fn iter_voters(&self, voting: VotingId) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(prefixed(&tables.voters, voting).collect())
    }

    fn get_public_key(&self, voter: &VoterAddress) -> Result<Option<[u8; 32]>, StoreError> {
        Ok(self.tables.lock().unwrap().public_keys.get(voter).copied())
    }
}

impl CreditStore for NullStore {
    fn get_credit_balance(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .credits
            .get(&voter_key(voting, voter))
            .cloned())
    }

    fn get_allocation(
        &self,
        voting: VotingId,
        voter: &VoterAddress,
    ) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .allocations
            .get(&voter_key(voting, voter))
            .map(|(_, data)| data.clone()))
    }

    fn iter_allocations(
        &self,
        voting: VotingId,
    ) -> Result<Vec<(VoterAddress, Vec<u8>)>, StoreError> {
        let tables = self.tables.lock().unwrap();
        Ok(prefixed(&tables.allocations, voting).collect())
    }
}

impl MetaStore for NullStore {
    fn put_meta(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.tables
            .lock()
            .unwrap()
            .meta
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_meta(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.tables.lock().unwrap().meta.get(key).cloned())
    }

    fn get_schema_version(&self) -> Result<u32, StoreError> {
        Ok(self.tables.lock().unwrap().schema_version)
    }

    fn set_schema_version(&self, version: u32) -> Result<(), StoreError> {
        self.tables.lock().unwrap().schema_version = version;
        Ok(())
    }
}

impl LedgerStore for NullStore {
    fn commit(&self, batch: WriteBatch) -> Result<(), StoreError> {
        if self.commits_failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("commit refused".to_string()));
        }
        let mut tables = self.tables.lock().unwrap();
        for op in batch.into_ops() {
            match op {
                BatchOp::PutVoting { id, data } => {
                    tables.votings.insert(id, data);
                }
                BatchOp::PutVoter {
                    voting,
                    voter,
                    data,
                } => {
                    tables
                        .voters
                        .insert(voter_key(voting, &voter), (voter, data));
                }
                BatchOp::PutCreditBalance {
                    voting,
                    voter,
                    data,
                } => {
                    tables.credits.insert(voter_key(voting, &voter), data);
                }
                BatchOp::PutAllocation {
                    voting,
                    voter,
                    data,
                } => {
                    tables
                        .allocations
                        .insert(voter_key(voting, &voter), (voter, data));
                }
                BatchOp::PutPublicKey { voter, key } => {
                    tables.public_keys.insert(voter, key);
                }
                BatchOp::PutDecryptionRequest { request_id, voting } => {
                    tables.decryption_requests.insert(request_id, voting);
                }
                BatchOp::PutMeta { key, value } => {
                    tables.meta.insert(key, value);
                }
            }
        }
        *self.commits.lock().unwrap() += 1;
        Ok(())
    }
}
