//! Input proofs: evidence that submitted ciphertexts are well-formed and were
//! encrypted by the submitting voter for this particular voting.

use crate::hash::blake2b_256_multi;
use crate::Ciphertext;
use hush_types::{VoterAddress, VotingId};
use serde::{Deserialize, Serialize};

/// Domain separator mixed into every binding digest.
const PROOF_DOMAIN: &[u8] = b"hushvote-input-proof-v1";

/// Opaque proof bytes accompanying a ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputProof(Vec<u8>);

impl InputProof {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// What a proof is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProofContext {
    pub voting_id: VotingId,
    pub voter: VoterAddress,
}

impl ProofContext {
    pub fn new(voting_id: VotingId, voter: VoterAddress) -> Self {
        Self { voting_id, voter }
    }

    /// Digest binding a list of ciphertexts to this context.
    ///
    /// Each ciphertext is length-prefixed so that different splits of the same
    /// bytes produce different digests.
    pub fn binding_digest(&self, ciphertexts: &[Ciphertext]) -> [u8; 32] {
        let voting_key = self.voting_id.to_key();
        let lengths: Vec<[u8; 8]> = ciphertexts
            .iter()
            .map(|ct| (ct.len() as u64).to_be_bytes())
            .collect();

        let mut parts: Vec<&[u8]> = Vec::with_capacity(3 + ciphertexts.len() * 2);
        parts.push(PROOF_DOMAIN);
        parts.push(&voting_key);
        parts.push(self.voter.as_str().as_bytes());
        for (ct, len) in ciphertexts.iter().zip(lengths.iter()) {
            parts.push(len);
            parts.push(ct.as_bytes());
        }
        blake2b_256_multi(&parts)
    }
}

/// Verifies input proofs.
pub trait InputVerifier: Send + Sync {
    fn verify(&self, ciphertexts: &[Ciphertext], proof: &InputProof, context: &ProofContext)
        -> bool;
}
