//! Voting-type and lifecycle enums.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The counting rule of a voting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VotingType {
    /// One encrypted option index per ballot; the chosen option gains 1.
    SingleChoice,
    /// Any subset of options may gain 1 from a single ballot.
    MultipleChoice,
    /// One encrypted option index plus a plaintext weight.
    Weighted,
    /// Per-option encrypted vote counts paid for with credits at cost votes².
    Quadratic,
}

impl VotingType {
    /// Numeric tag used by external clients (0..=3).
    pub fn tag(&self) -> u8 {
        match self {
            Self::SingleChoice => 0,
            Self::MultipleChoice => 1,
            Self::Weighted => 2,
            Self::Quadratic => 3,
        }
    }

    pub fn from_tag(tag: u8) -> Result<Self, TypeError> {
        match tag {
            0 => Ok(Self::SingleChoice),
            1 => Ok(Self::MultipleChoice),
            2 => Ok(Self::Weighted),
            3 => Ok(Self::Quadratic),
            other => Err(TypeError::UnknownVotingType(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleChoice => "single_choice",
            Self::MultipleChoice => "multiple_choice",
            Self::Weighted => "weighted",
            Self::Quadratic => "quadratic",
        }
    }
}

impl fmt::Display for VotingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a voting.
///
/// Variants are declared in lifecycle order, so `Ord` reflects progression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VotingStatus {
    /// Before the start time.
    NotStarted,
    /// Inside the voting window.
    Active,
    /// Past the end time, results not yet revealed.
    Ended,
    /// Results have been decrypted and stored.
    Tallied,
}

impl VotingStatus {
    /// Whether ballots may be cast.
    pub fn accepts_ballots(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Whether the voting window has closed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Ended | Self::Tallied)
    }

    /// Numeric code used by external clients (0..=3).
    pub fn code(&self) -> u8 {
        match self {
            Self::NotStarted => 0,
            Self::Active => 1,
            Self::Ended => 2,
            Self::Tallied => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for tag in 0..4u8 {
            assert_eq!(VotingType::from_tag(tag).unwrap().tag(), tag);
        }
        assert_eq!(VotingType::from_tag(4), Err(TypeError::UnknownVotingType(4)));
    }

    #[test]
    fn status_order_follows_lifecycle() {
        assert!(VotingStatus::NotStarted < VotingStatus::Active);
        assert!(VotingStatus::Active < VotingStatus::Ended);
        assert!(VotingStatus::Ended < VotingStatus::Tallied);
        assert!(VotingStatus::Tallied.is_closed());
        assert!(!VotingStatus::Ended.accepts_ballots());
    }
}
