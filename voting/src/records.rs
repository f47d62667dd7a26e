//! Per-voter records and their byte encoding.

use crate::VotingError;
use hush_types::Timestamp;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Participation record keyed by (voting, voter).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterRecord {
    /// Flips false → true exactly once.
    pub has_voted: bool,
    pub whitelisted: bool,
    /// Assigned on whitelisting; caps the weight of a weighted ballot.
    pub voting_power: u32,
    pub voted_at: Option<Timestamp>,
}

/// Remaining quadratic budget keyed by (voting, voter).
///
/// Absent from the store until the voter receives a custom allocation,
/// spends, or is refunded; until then the voting's default applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditBalance {
    pub allocated: u32,
    pub remaining: u32,
    pub custom: bool,
}

impl CreditBalance {
    pub fn from_default(amount: u32) -> Self {
        Self {
            allocated: amount,
            remaining: amount,
            custom: false,
        }
    }

    pub fn custom(amount: u32) -> Self {
        Self {
            allocated: amount,
            remaining: amount,
            custom: true,
        }
    }
}

/// The plaintext side of a quadratic ballot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteAllocation {
    /// Credits spent on each option.
    pub credits: Vec<u32>,
    /// Votes those credits buy: `isqrt(credits[i])`.
    pub votes: Vec<u32>,
    pub total_credits_used: u64,
    /// The voter's budget at the moment the ballot was cast.
    pub credits_allocated: u32,
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, VotingError> {
    bincode::serialize(value).map_err(|e| VotingError::Codec(e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, VotingError> {
    bincode::deserialize(bytes).map_err(|e| VotingError::Codec(e.to_string()))
}
