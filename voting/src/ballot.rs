//! Ballot processing: folds one encrypted ballot into a voting's accumulators.
//!
//! Every path computes a complete new accumulator vector before anything is
//! assigned, so a failing homomorphic operation leaves the voting untouched.

use crate::error::VotingError;
use crate::records::VoterRecord;
use crate::voting::Voting;
use hush_crypto::{Ciphertext, FheBackend};
use hush_types::VotingType;

/// A voter's submission. Each variant carries only what its rule needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Ballot {
    /// Encrypted option index.
    Single { choice: Ciphertext },
    /// One encrypted 0/1 flag per option.
    Multiple { selections: Vec<Ciphertext> },
    /// Encrypted option index with a plaintext weight. The weight's magnitude
    /// is visible to the ledger.
    Weighted { choice: Ciphertext, weight: u32 },
    /// Encrypted vote count per option, plus the credits paid for each.
    Quadratic {
        votes: Vec<Ciphertext>,
        credits: Vec<u32>,
    },
}

impl Ballot {
    /// The voting type this ballot was built for.
    pub fn kind(&self) -> VotingType {
        match self {
            Self::Single { .. } => VotingType::SingleChoice,
            Self::Multiple { .. } => VotingType::MultipleChoice,
            Self::Weighted { .. } => VotingType::Weighted,
            Self::Quadratic { .. } => VotingType::Quadratic,
        }
    }

    /// Every ciphertext the input proof must cover.
    pub fn ciphertexts(&self) -> &[Ciphertext] {
        match self {
            Self::Single { choice } | Self::Weighted { choice, .. } => std::slice::from_ref(choice),
            Self::Multiple { selections } => selections,
            Self::Quadratic { votes, .. } => votes,
        }
    }
}

pub struct BallotProcessor;

impl BallotProcessor {
    /// Plaintext checks that need no cryptography.
    pub fn check_shape(
        &self,
        voting: &Voting,
        ballot: &Ballot,
        record: Option<&VoterRecord>,
    ) -> Result<(), VotingError> {
        let voting_type = voting.voting_type();
        let accepted = match ballot {
            Ballot::Single { .. } => matches!(
                voting_type,
                VotingType::SingleChoice | VotingType::MultipleChoice
            ),
            other => other.kind() == voting_type,
        };
        if !accepted {
            return Err(VotingError::WrongVotingType {
                expected: voting_type,
                got: ballot.kind(),
            });
        }

        let expected = voting.option_count();
        match ballot {
            Ballot::Single { .. } => {}
            Ballot::Multiple { selections } => {
                if selections.len() != expected {
                    return Err(VotingError::InvalidOptionsCount {
                        expected,
                        got: selections.len(),
                    });
                }
            }
            Ballot::Weighted { weight, .. } => {
                if *weight == 0 {
                    return Err(VotingError::InvalidWeight(*weight));
                }
                if let Some(r) = record.filter(|r| r.whitelisted) {
                    if *weight > r.voting_power {
                        return Err(VotingError::InvalidWeight(*weight));
                    }
                }
            }
            Ballot::Quadratic { votes, credits } => {
                for got in [votes.len(), credits.len()] {
                    if got != expected {
                        return Err(VotingError::InvalidOptionsCount { expected, got });
                    }
                }
            }
        }
        Ok(())
    }

    /// Compute the accumulators after applying `ballot`.
    ///
    /// The caller must have run [`check_shape`](Self::check_shape).
    pub fn apply<F: FheBackend + ?Sized>(
        &self,
        fhe: &F,
        voting: &Voting,
        ballot: &Ballot,
    ) -> Result<Vec<Ciphertext>, VotingError> {
        let zero = fhe.encrypt_zero()?;
        let mut next = Vec::with_capacity(voting.accumulators.len());

        match ballot {
            Ballot::Single { choice } => {
                let one = fhe.encrypt_scalar(1)?;
                for (i, acc) in voting.accumulators.iter().enumerate() {
                    let is_match = fhe.eq_scalar(choice, i as u64)?;
                    let inc = fhe.select(&is_match, &one, &zero)?;
                    next.push(fhe.add(acc, &inc)?);
                }
            }
            Ballot::Multiple { selections } => {
                // Flags other than exactly 1 count as unselected.
                let one = fhe.encrypt_scalar(1)?;
                for (acc, flag) in voting.accumulators.iter().zip(selections) {
                    let selected = fhe.eq_scalar(flag, 1)?;
                    let inc = fhe.select(&selected, &one, &zero)?;
                    next.push(fhe.add(acc, &inc)?);
                }
            }
            Ballot::Weighted { choice, weight } => {
                let weight = fhe.encrypt_scalar(u64::from(*weight))?;
                for (i, acc) in voting.accumulators.iter().enumerate() {
                    let is_match = fhe.eq_scalar(choice, i as u64)?;
                    let inc = fhe.select(&is_match, &weight, &zero)?;
                    next.push(fhe.add(acc, &inc)?);
                }
            }
            Ballot::Quadratic { votes, .. } => {
                for (acc, votes) in voting.accumulators.iter().zip(votes) {
                    next.push(fhe.add(acc, votes)?);
                }
            }
        }

        Ok(next)
    }
}
