//! Events queued by the engine for the node to fan out.

use hush_crypto::DecryptionRequestId;
use hush_types::{Timestamp, VoterAddress, VotingId, VotingType};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum VotingEvent {
    VotingCreated {
        id: VotingId,
        creator: VoterAddress,
        voting_type: VotingType,
        start_time: Timestamp,
        end_time: Timestamp,
    },
    VoteCast {
        id: VotingId,
        voter: VoterAddress,
        voting_type: VotingType,
    },
    VotersWhitelisted {
        id: VotingId,
        count: usize,
    },
    DefaultCreditsSet {
        id: VotingId,
        amount: u32,
    },
    CreditsAllocated {
        id: VotingId,
        voter: VoterAddress,
        amount: u32,
    },
    QuadraticVoteAllocated {
        id: VotingId,
        voter: VoterAddress,
        total_credits: u64,
    },
    CreditsRefunded {
        id: VotingId,
        voter: VoterAddress,
        amount: u32,
    },
    DecryptionRequested {
        id: VotingId,
        request_id: DecryptionRequestId,
    },
    DecryptionReissued {
        id: VotingId,
        request_id: DecryptionRequestId,
        attempt: u32,
    },
    /// Every automatic retry went unanswered.
    DecryptionStalled {
        id: VotingId,
        attempts: u32,
    },
    /// The creator re-requested a stalled decryption.
    DecryptionRenewed {
        id: VotingId,
        request_id: DecryptionRequestId,
    },
    VotingTallied {
        id: VotingId,
        results: Vec<u64>,
    },
    Paused {
        by: VoterAddress,
    },
    Unpaused {
        by: VoterAddress,
    },
    OwnershipTransferred {
        previous: VoterAddress,
        new_owner: VoterAddress,
    },
    PublicKeyRegistered {
        user: VoterAddress,
    },
}

impl VotingEvent {
    /// Stable snake_case name, used as a metrics label.
    pub fn name(&self) -> &'static str {
        match self {
            Self::VotingCreated { .. } => "voting_created",
            Self::VoteCast { .. } => "vote_cast",
            Self::VotersWhitelisted { .. } => "voters_whitelisted",
            Self::DefaultCreditsSet { .. } => "default_credits_set",
            Self::CreditsAllocated { .. } => "credits_allocated",
            Self::QuadraticVoteAllocated { .. } => "quadratic_vote_allocated",
            Self::CreditsRefunded { .. } => "credits_refunded",
            Self::DecryptionRequested { .. } => "decryption_requested",
            Self::DecryptionReissued { .. } => "decryption_reissued",
            Self::DecryptionStalled { .. } => "decryption_stalled",
            Self::DecryptionRenewed { .. } => "decryption_renewed",
            Self::VotingTallied { .. } => "voting_tallied",
            Self::Paused { .. } => "paused",
            Self::Unpaused { .. } => "unpaused",
            Self::OwnershipTransferred { .. } => "ownership_transferred",
            Self::PublicKeyRegistered { .. } => "public_key_registered",
        }
    }

    /// The voting this event concerns, if any.
    pub fn voting_id(&self) -> Option<VotingId> {
        match self {
            Self::VotingCreated { id, .. }
            | Self::VoteCast { id, .. }
            | Self::VotersWhitelisted { id, .. }
            | Self::DefaultCreditsSet { id, .. }
            | Self::CreditsAllocated { id, .. }
            | Self::QuadraticVoteAllocated { id, .. }
            | Self::CreditsRefunded { id, .. }
            | Self::DecryptionRequested { id, .. }
            | Self::DecryptionReissued { id, .. }
            | Self::DecryptionStalled { id, .. }
            | Self::DecryptionRenewed { id, .. }
            | Self::VotingTallied { id, .. } => Some(*id),
            Self::Paused { .. }
            | Self::Unpaused { .. }
            | Self::OwnershipTransferred { .. }
            | Self::PublicKeyRegistered { .. } => None,
        }
    }
}
