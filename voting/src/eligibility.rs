//! Eligibility guard: decides whether a voter may cast a ballot right now.

use crate::error::VotingError;
use crate::records::VoterRecord;
use crate::voting::Voting;
use hush_types::{Timestamp, VoterAddress};

pub struct EligibilityGuard;

impl EligibilityGuard {
    /// Side-effect-free authorization of one ballot.
    ///
    /// Checks, in order: inclusive voting window, pause flag, double vote,
    /// whitelist membership, remaining capacity. Existence of the voting is
    /// established by the caller loading it.
    pub fn authorize(
        &self,
        voting: &Voting,
        voter: &VoterAddress,
        record: Option<&VoterRecord>,
        paused: bool,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        let config = &voting.config;
        if !config.is_open_at(now) {
            return Err(VotingError::OutsideVotingPeriod {
                now,
                start: config.start_time,
                end: config.end_time,
            });
        }
        if paused {
            return Err(VotingError::Paused);
        }
        if record.is_some_and(|r| r.has_voted) {
            return Err(VotingError::AlreadyVoted(voter.clone()));
        }
        if config.whitelist_enabled && !record.is_some_and(|r| r.whitelisted) {
            return Err(VotingError::NotWhitelisted(voter.clone()));
        }
        if voting.total_voters >= config.max_voters {
            return Err(VotingError::VotingFull(config.max_voters));
        }
        Ok(())
    }

    /// Validate a bulk whitelist request.
    pub fn validate_whitelist(
        &self,
        voters: &[VoterAddress],
        powers: &[u32],
    ) -> Result<(), VotingError> {
        if voters.len() != powers.len() {
            return Err(VotingError::ArrayLengthMismatch {
                left: voters.len(),
                right: powers.len(),
            });
        }
        if let Some(&bad) = powers.iter().find(|&&p| p == 0) {
            return Err(VotingError::InvalidVotingPower(bad));
        }
        Ok(())
    }

    /// Upsert one whitelist entry. Participation state is preserved.
    pub fn whitelist(&self, existing: Option<VoterRecord>, power: u32) -> VoterRecord {
        VoterRecord {
            whitelisted: true,
            voting_power: power,
            ..existing.unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VotingConfig;
    use crate::voting::DecryptionState;
    use hush_types::{VotingId, VotingType};

    fn test_voter(n: u8) -> VoterAddress {
        VoterAddress::from_bytes([n; 20])
    }

    fn test_voting(whitelist: bool, max_voters: u32) -> Voting {
        Voting {
            id: VotingId::new(0),
            config: VotingConfig {
                name: "t".into(),
                description: String::new(),
                voting_type: VotingType::SingleChoice,
                start_time: Timestamp::new(100),
                end_time: Timestamp::new(100 + 3_600),
                quorum: 0,
                whitelist_enabled: whitelist,
                max_voters,
            },
            options: Vec::new(),
            accumulators: Vec::new(),
            total_voters: 0,
            creator: test_voter(9),
            created_at: Timestamp::new(0),
            default_credits: 100,
            decryption: DecryptionState::NotRequested,
        }
    }

    #[test]
    fn window_is_inclusive() {
        let voting = test_voting(false, 10);
        let guard = EligibilityGuard;
        let voter = test_voter(1);
        assert!(guard.authorize(&voting, &voter, None, false, Timestamp::new(100)).is_ok());
        assert!(guard.authorize(&voting, &voter, None, false, Timestamp::new(3_700)).is_ok());
        assert!(matches!(
            guard.authorize(&voting, &voter, None, false, Timestamp::new(99)),
            Err(VotingError::OutsideVotingPeriod { .. })
        ));
        assert!(matches!(
            guard.authorize(&voting, &voter, None, false, Timestamp::new(3_701)),
            Err(VotingError::OutsideVotingPeriod { .. })
        ));
    }

    #[test]
    fn checks_run_in_order() {
        let mut voting = test_voting(true, 1);
        voting.total_voters = 1;
        let guard = EligibilityGuard;
        let voter = test_voter(1);
        let voted = VoterRecord {
            has_voted: true,
            ..VoterRecord::default()
        };
        let now = Timestamp::new(200);

        // pause beats double vote
        assert!(matches!(
            guard.authorize(&voting, &voter, Some(&voted), true, now),
            Err(VotingError::Paused)
        ));
        // double vote beats whitelist
        assert!(matches!(
            guard.authorize(&voting, &voter, Some(&voted), false, now),
            Err(VotingError::AlreadyVoted(_))
        ));
        // whitelist beats capacity
        assert!(matches!(
            guard.authorize(&voting, &voter, None, false, now),
            Err(VotingError::NotWhitelisted(_))
        ));
        let listed = guard.whitelist(None, 1);
        assert!(matches!(
            guard.authorize(&voting, &voter, Some(&listed), false, now),
            Err(VotingError::VotingFull(1))
        ));
    }

    #[test]
    fn whitelist_preserves_participation() {
        let guard = EligibilityGuard;
        let voted = VoterRecord {
            has_voted: true,
            voted_at: Some(Timestamp::new(5)),
            ..VoterRecord::default()
        };
        let record = guard.whitelist(Some(voted), 7);
        assert!(record.has_voted);
        assert!(record.whitelisted);
        assert_eq!(record.voting_power, 7);
    }

    #[test]
    fn whitelist_shape() {
        let guard = EligibilityGuard;
        let voters = vec![test_voter(1), test_voter(2)];
        assert!(guard.validate_whitelist(&voters, &[1, 2]).is_ok());
        assert!(matches!(
            guard.validate_whitelist(&voters, &[1]),
            Err(VotingError::ArrayLengthMismatch { left: 2, right: 1 })
        ));
        assert!(matches!(
            guard.validate_whitelist(&voters, &[1, 0]),
            Err(VotingError::InvalidVotingPower(0))
        ));
    }
}
