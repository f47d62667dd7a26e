//! Write batching: groups every write of one protocol operation so the
//! backend can apply them as a unit.
//!
//! ```ignore
//! let mut batch = WriteBatch::new();
//! batch.put_voting(id, &voting_bytes);
//! batch.put_voter(id, &voter, &record_bytes);
//! store.commit(batch)?;
//! ```
//!
//! A batch that is dropped without being committed has no effect.

use hush_types::{VoterAddress, VotingId};

/// One pending write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    PutVoting {
        id: VotingId,
        data: Vec<u8>,
    },
    PutVoter {
        voting: VotingId,
        voter: VoterAddress,
        data: Vec<u8>,
    },
    PutCreditBalance {
        voting: VotingId,
        voter: VoterAddress,
        data: Vec<u8>,
    },
    PutAllocation {
        voting: VotingId,
        voter: VoterAddress,
        data: Vec<u8>,
    },
    PutPublicKey {
        voter: VoterAddress,
        key: [u8; 32],
    },
    PutDecryptionRequest {
        request_id: u64,
        voting: VotingId,
    },
    PutMeta {
        key: String,
        value: Vec<u8>,
    },
}

/// An ordered list of writes, applied atomically by [`crate::LedgerStore::commit`].
#[derive(Clone, Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_voting(&mut self, id: VotingId, data: &[u8]) {
        self.ops.push(BatchOp::PutVoting {
            id,
            data: data.to_vec(),
        });
    }

    pub fn put_voter(&mut self, voting: VotingId, voter: &VoterAddress, data: &[u8]) {
        self.ops.push(BatchOp::PutVoter {
            voting,
            voter: voter.clone(),
            data: data.to_vec(),
        });
    }

    pub fn put_credit_balance(&mut self, voting: VotingId, voter: &VoterAddress, data: &[u8]) {
        self.ops.push(BatchOp::PutCreditBalance {
            voting,
            voter: voter.clone(),
            data: data.to_vec(),
        });
    }

    pub fn put_allocation(&mut self, voting: VotingId, voter: &VoterAddress, data: &[u8]) {
        self.ops.push(BatchOp::PutAllocation {
            voting,
            voter: voter.clone(),
            data: data.to_vec(),
        });
    }

    pub fn put_public_key(&mut self, voter: &VoterAddress, key: [u8; 32]) {
        self.ops.push(BatchOp::PutPublicKey {
            voter: voter.clone(),
            key,
        });
    }

    pub fn put_decryption_request(&mut self, request_id: u64, voting: VotingId) {
        self.ops
            .push(BatchOp::PutDecryptionRequest { request_id, voting });
    }

    pub fn put_meta(&mut self, key: &str, value: &[u8]) {
        self.ops.push(BatchOp::PutMeta {
            key: key.to_string(),
            value: value.to_vec(),
        });
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> &[BatchOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ops_keep_insertion_order() {
        let voter = VoterAddress::from_bytes([1; 20]);
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());

        batch.put_voting(VotingId::new(0), b"v");
        batch.put_voter(VotingId::new(0), &voter, b"r");
        batch.put_meta("paused", &[1]);

        assert_eq!(batch.len(), 3);
        assert!(matches!(batch.ops()[0], BatchOp::PutVoting { .. }));
        assert!(matches!(batch.ops()[1], BatchOp::PutVoter { .. }));
        assert!(matches!(batch.ops()[2], BatchOp::PutMeta { .. }));
    }
}
