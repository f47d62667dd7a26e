//! Tally coordination: the time-derived lifecycle and the public-decryption
//! handshake.
//!
//! Status is never stored. It is a pure function of the configured window,
//! the current time and the sticky "revealed" state, so it can only move
//! forward as the clock advances.

use crate::error::VotingError;
use crate::voting::{DecryptionState, Voting};
use hush_crypto::DecryptionRequestId;
use hush_types::{ProtocolLimits, Timestamp, VoterAddress, VotingStatus};

/// Result of delivering a decryption callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FulfillOutcome {
    /// Results were written and the voting is now tallied.
    Tallied(Vec<u64>),
    /// The voting was already tallied; the callback changed nothing.
    AlreadyTallied,
}

/// What the watchdog should do with a voting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReissueDecision {
    NotDue,
    Reissue { attempt: u32 },
    Exhausted { attempts: u32 },
}

pub struct TallyCoordinator;

impl TallyCoordinator {
    pub fn status(&self, voting: &Voting, now: Timestamp) -> VotingStatus {
        if voting.is_tallied() {
            VotingStatus::Tallied
        } else if now < voting.config.start_time {
            VotingStatus::NotStarted
        } else if now <= voting.config.end_time {
            VotingStatus::Active
        } else {
            VotingStatus::Ended
        }
    }

    /// Guard for a decryption request: creator, nothing in flight, ended.
    ///
    /// A stalled request counts as nothing in flight, so the creator can
    /// renew it.
    pub fn check_request(
        &self,
        voting: &Voting,
        caller: &VoterAddress,
        now: Timestamp,
    ) -> Result<(), VotingError> {
        if *caller != voting.creator {
            return Err(VotingError::NotVotingCreator);
        }
        match voting.decryption {
            DecryptionState::NotRequested | DecryptionState::Pending { stalled: true, .. } => {}
            _ => return Err(VotingError::AlreadyDecrypted),
        }
        if self.status(voting, now) != VotingStatus::Ended {
            return Err(VotingError::VotingNotEnded);
        }
        Ok(())
    }

    /// Record an issued, re-issued or renewed request.
    ///
    /// Earlier ids stay valid. Renewing a stalled request starts a fresh
    /// round of attempts.
    pub fn record_request(
        &self,
        voting: &mut Voting,
        request_id: DecryptionRequestId,
        now: Timestamp,
    ) {
        match &mut voting.decryption {
            DecryptionState::Pending {
                request_ids,
                requested_at,
                attempts,
                stalled,
            } => {
                request_ids.push(request_id);
                *requested_at = now;
                if *stalled {
                    *attempts = 1;
                    *stalled = false;
                } else {
                    *attempts += 1;
                }
            }
            _ => {
                voting.decryption = DecryptionState::Pending {
                    request_ids: vec![request_id],
                    requested_at: now,
                    attempts: 1,
                    stalled: false,
                };
            }
        }
    }

    /// Apply a decryption callback. Only the first fulfilment takes effect.
    pub fn fulfill(
        &self,
        voting: &mut Voting,
        request_id: DecryptionRequestId,
        plaintexts: Vec<u64>,
        now: Timestamp,
    ) -> Result<FulfillOutcome, VotingError> {
        match &voting.decryption {
            DecryptionState::Revealed { .. } => return Ok(FulfillOutcome::AlreadyTallied),
            DecryptionState::Pending { request_ids, .. } if request_ids.contains(&request_id) => {}
            _ => return Err(VotingError::UnknownDecryptionRequest(request_id)),
        }

        if plaintexts.len() != voting.option_count() {
            return Err(VotingError::DecryptionLengthMismatch {
                expected: voting.option_count(),
                got: plaintexts.len(),
            });
        }

        voting.decryption = DecryptionState::Revealed {
            results: plaintexts.clone(),
            revealed_at: now,
        };
        Ok(FulfillOutcome::Tallied(plaintexts))
    }

    /// Decide whether a pending decryption should be requested again.
    ///
    /// `Exhausted` is reported once; [`mark_stalled`](Self::mark_stalled)
    /// then takes the voting out of the watchdog's hands.
    pub fn reissue_decision(
        &self,
        voting: &Voting,
        now: Timestamp,
        limits: &ProtocolLimits,
    ) -> ReissueDecision {
        match &voting.decryption {
            DecryptionState::Pending {
                requested_at,
                attempts,
                stalled: false,
                ..
            } if requested_at.has_expired(limits.decryption_timeout_secs, now) => {
                if *attempts >= limits.max_decryption_attempts {
                    ReissueDecision::Exhausted {
                        attempts: *attempts,
                    }
                } else {
                    ReissueDecision::Reissue {
                        attempt: attempts + 1,
                    }
                }
            }
            _ => ReissueDecision::NotDue,
        }
    }

    pub fn mark_stalled(&self, voting: &mut Voting) {
        if let DecryptionState::Pending { stalled, .. } = &mut voting.decryption {
            *stalled = true;
        }
    }

    pub fn results<'a>(&self, voting: &'a Voting) -> Result<&'a [u64], VotingError> {
        voting.results().ok_or(VotingError::ResultsNotAvailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VotingConfig;
    use hush_types::{VotingId, VotingType};

    fn creator() -> VoterAddress {
        VoterAddress::from_bytes([9; 20])
    }

    fn test_voting() -> Voting {
        Voting {
            id: VotingId::new(0),
            config: VotingConfig {
                name: "t".into(),
                description: String::new(),
                voting_type: VotingType::SingleChoice,
                start_time: Timestamp::new(100),
                end_time: Timestamp::new(3_700),
                quorum: 0,
                whitelist_enabled: false,
                max_voters: 10,
            },
            options: vec![Default::default(); 2],
            accumulators: Vec::new(),
            total_voters: 0,
            creator: creator(),
            created_at: Timestamp::new(0),
            default_credits: 100,
            decryption: DecryptionState::NotRequested,
        }
    }

    #[test]
    fn status_follows_clock() {
        let tally = TallyCoordinator;
        let voting = test_voting();
        assert_eq!(tally.status(&voting, Timestamp::new(99)), VotingStatus::NotStarted);
        assert_eq!(tally.status(&voting, Timestamp::new(100)), VotingStatus::Active);
        assert_eq!(tally.status(&voting, Timestamp::new(3_700)), VotingStatus::Active);
        assert_eq!(tally.status(&voting, Timestamp::new(3_701)), VotingStatus::Ended);
    }

    #[test]
    fn request_guards() {
        let tally = TallyCoordinator;
        let mut voting = test_voting();
        let stranger = VoterAddress::from_bytes([1; 20]);
        let ended = Timestamp::new(4_000);

        assert!(matches!(
            tally.check_request(&voting, &stranger, ended),
            Err(VotingError::NotVotingCreator)
        ));
        assert!(matches!(
            tally.check_request(&voting, &creator(), Timestamp::new(200)),
            Err(VotingError::VotingNotEnded)
        ));
        assert!(tally.check_request(&voting, &creator(), ended).is_ok());

        tally.record_request(&mut voting, DecryptionRequestId::new(1), ended);
        assert_eq!(tally.status(&voting, ended), VotingStatus::Ended);
        assert!(matches!(
            tally.check_request(&voting, &creator(), ended),
            Err(VotingError::AlreadyDecrypted)
        ));
    }

    #[test]
    fn first_fulfilment_wins() {
        let tally = TallyCoordinator;
        let mut voting = test_voting();
        let now = Timestamp::new(4_000);
        tally.record_request(&mut voting, DecryptionRequestId::new(1), now);
        tally.record_request(&mut voting, DecryptionRequestId::new(2), now);

        assert!(matches!(
            tally.fulfill(&mut voting, DecryptionRequestId::new(3), vec![1, 2], now),
            Err(VotingError::UnknownDecryptionRequest(_))
        ));
        assert!(matches!(
            tally.fulfill(&mut voting, DecryptionRequestId::new(2), vec![1], now),
            Err(VotingError::DecryptionLengthMismatch { expected: 2, got: 1 })
        ));
        assert_eq!(
            tally
                .fulfill(&mut voting, DecryptionRequestId::new(2), vec![4, 1], now)
                .unwrap(),
            FulfillOutcome::Tallied(vec![4, 1])
        );
        assert_eq!(
            tally
                .fulfill(&mut voting, DecryptionRequestId::new(1), vec![0, 0], now)
                .unwrap(),
            FulfillOutcome::AlreadyTallied
        );
        assert_eq!(tally.results(&voting).unwrap(), &[4, 1]);
        assert_eq!(tally.status(&voting, now), VotingStatus::Tallied);
    }

    #[test]
    fn reissue_respects_timeout_and_attempts() {
        let tally = TallyCoordinator;
        let limits = ProtocolLimits {
            decryption_timeout_secs: 60,
            max_decryption_attempts: 2,
            ..ProtocolLimits::default()
        };
        let mut voting = test_voting();
        let t0 = Timestamp::new(4_000);
        assert_eq!(tally.reissue_decision(&voting, t0, &limits), ReissueDecision::NotDue);

        tally.record_request(&mut voting, DecryptionRequestId::new(1), t0);
        assert_eq!(
            tally.reissue_decision(&voting, t0.plus_secs(59), &limits),
            ReissueDecision::NotDue
        );
        assert_eq!(
            tally.reissue_decision(&voting, t0.plus_secs(60), &limits),
            ReissueDecision::Reissue { attempt: 2 }
        );

        tally.record_request(&mut voting, DecryptionRequestId::new(2), t0.plus_secs(60));
        assert_eq!(
            tally.reissue_decision(&voting, t0.plus_secs(120), &limits),
            ReissueDecision::Exhausted { attempts: 2 }
        );

        tally.mark_stalled(&mut voting);
        assert!(voting.is_stalled());
        assert_eq!(
            tally.reissue_decision(&voting, t0.plus_secs(600), &limits),
            ReissueDecision::NotDue
        );
    }

    #[test]
    fn stalled_request_can_be_renewed_by_creator() {
        let tally = TallyCoordinator;
        let limits = ProtocolLimits {
            decryption_timeout_secs: 60,
            max_decryption_attempts: 1,
            ..ProtocolLimits::default()
        };
        let mut voting = test_voting();
        let t0 = Timestamp::new(4_000);
        tally.record_request(&mut voting, DecryptionRequestId::new(1), t0);
        assert!(matches!(
            tally.check_request(&voting, &creator(), t0),
            Err(VotingError::AlreadyDecrypted)
        ));

        tally.mark_stalled(&mut voting);
        assert!(matches!(
            tally.check_request(&voting, &VoterAddress::from_bytes([1; 20]), t0),
            Err(VotingError::NotVotingCreator)
        ));
        assert!(tally.check_request(&voting, &creator(), t0).is_ok());

        let renewed_at = t0.plus_secs(120);
        tally.record_request(&mut voting, DecryptionRequestId::new(2), renewed_at);
        assert!(!voting.is_stalled());
        match &voting.decryption {
            DecryptionState::Pending {
                request_ids,
                attempts,
                ..
            } => {
                assert_eq!(request_ids.len(), 2);
                assert_eq!(*attempts, 1);
            }
            other => panic!("unexpected state {other:?}"),
        }
        assert_eq!(
            tally.reissue_decision(&voting, renewed_at.plus_secs(60), &limits),
            ReissueDecision::Exhausted { attempts: 1 }
        );

        // The first request still reveals.
        assert!(matches!(
            tally.fulfill(&mut voting, DecryptionRequestId::new(1), vec![3, 0], renewed_at),
            Ok(FulfillOutcome::Tallied(_))
        ));
    }
}
