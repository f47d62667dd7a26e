//! The voting aggregate and its read projections.

use crate::config::VotingConfig;
use hush_crypto::{Ciphertext, DecryptionRequestId};
use hush_types::{Timestamp, VoterAddress, VotingId, VotingStatus, VotingType};
use serde::{Deserialize, Serialize};

/// One choice on the ballot, identified by its position.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingOption {
    pub name: String,
    pub description: String,
}

/// Where a voting stands in the public-decryption handshake.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecryptionState {
    NotRequested,
    /// At least one request is in flight. Every id stays valid until the
    /// first fulfilment lands.
    Pending {
        request_ids: Vec<DecryptionRequestId>,
        /// When the most recent request was issued.
        requested_at: Timestamp,
        attempts: u32,
        /// Set once the watchdog has used up its attempts. The creator may
        /// then renew the request.
        stalled: bool,
    },
    Revealed {
        results: Vec<u64>,
        revealed_at: Timestamp,
    },
}

/// Aggregate root: configuration, options, encrypted accumulators and tally state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Voting {
    pub id: VotingId,
    pub config: VotingConfig,
    pub options: Vec<VotingOption>,
    /// One encrypted running total per option.
    pub accumulators: Vec<Ciphertext>,
    pub total_voters: u32,
    pub creator: VoterAddress,
    pub created_at: Timestamp,
    /// Budget of quadratic voters without a custom allocation.
    pub default_credits: u32,
    pub decryption: DecryptionState,
}

impl Voting {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn voting_type(&self) -> VotingType {
        self.config.voting_type
    }

    pub fn is_tallied(&self) -> bool {
        matches!(self.decryption, DecryptionState::Revealed { .. })
    }

    /// Pending with no retries left; only the creator can move it forward.
    pub fn is_stalled(&self) -> bool {
        matches!(
            self.decryption,
            DecryptionState::Pending { stalled: true, .. }
        )
    }

    pub fn results(&self) -> Option<&[u64]> {
        match &self.decryption {
            DecryptionState::Revealed { results, .. } => Some(results),
            _ => None,
        }
    }

    pub fn quorum_reached(&self) -> bool {
        self.total_voters >= self.config.quorum
    }
}

/// Lightweight listing entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingSummary {
    pub id: VotingId,
    pub name: String,
    pub voting_type: VotingType,
    pub status: VotingStatus,
    pub option_count: usize,
    pub total_voters: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub quorum: u32,
    pub quorum_reached: bool,
    pub creator: VoterAddress,
}

/// Everything a client needs to render one voting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingFull {
    pub id: VotingId,
    pub config: VotingConfig,
    pub options: Vec<VotingOption>,
    pub status: VotingStatus,
    pub total_voters: u32,
    pub creator: VoterAddress,
    pub results: Option<Vec<u64>>,
}

impl VotingSummary {
    pub fn of(voting: &Voting, status: VotingStatus) -> Self {
        Self {
            id: voting.id,
            name: voting.config.name.clone(),
            voting_type: voting.config.voting_type,
            status,
            option_count: voting.option_count(),
            total_voters: voting.total_voters,
            start_time: voting.config.start_time,
            end_time: voting.config.end_time,
            quorum: voting.config.quorum,
            quorum_reached: voting.quorum_reached(),
            creator: voting.creator.clone(),
        }
    }
}

impl VotingFull {
    pub fn of(voting: &Voting, status: VotingStatus) -> Self {
        Self {
            id: voting.id,
            config: voting.config.clone(),
            options: voting.options.clone(),
            status,
            total_voters: voting.total_voters,
            creator: voting.creator.clone(),
            results: voting.results().map(|r| r.to_vec()),
        }
    }
}
