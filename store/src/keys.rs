//! Key encodings shared by all backends.
//!
//! Voting keys are the big-endian id, so byte order equals creation order.
//! Per-voter keys are the voting key followed by the normalised address
//! string, which makes "all voters of a voting" a prefix scan.

use crate::StoreError;
use hush_types::{VoterAddress, VotingId};

/// Length of the voting-id prefix in composite keys.
pub const VOTING_KEY_LEN: usize = 8;

pub fn voting_key(id: VotingId) -> [u8; VOTING_KEY_LEN] {
    id.to_key()
}

pub fn voter_key(voting: VotingId, voter: &VoterAddress) -> Vec<u8> {
    let mut key = Vec::with_capacity(VOTING_KEY_LEN + voter.as_str().len());
    key.extend_from_slice(&voting.to_key());
    key.extend_from_slice(voter.as_str().as_bytes());
    key
}

pub fn decode_voting_key(bytes: &[u8]) -> Result<VotingId, StoreError> {
    let arr: [u8; VOTING_KEY_LEN] = bytes
        .get(..VOTING_KEY_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| StoreError::Corruption(format!("voting key of {} bytes", bytes.len())))?;
    Ok(VotingId::from_key(arr))
}

/// Split a composite key back into its parts.
pub fn decode_voter_key(bytes: &[u8]) -> Result<(VotingId, VoterAddress), StoreError> {
    let voting = decode_voting_key(bytes)?;
    let addr = std::str::from_utf8(&bytes[VOTING_KEY_LEN..])
        .map_err(|e| StoreError::Corruption(format!("voter key: {}", e)))?;
    let voter = VoterAddress::parse(addr)
        .map_err(|e| StoreError::Corruption(format!("voter key: {}", e)))?;
    Ok((voting, voter))
}

pub fn request_key(request_id: u64) -> [u8; 8] {
    request_id.to_be_bytes()
}
