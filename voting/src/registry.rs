//! Voting registry: structural validation and construction of new votings.

use crate::config::VotingConfig;
use crate::error::VotingError;
use crate::voting::{DecryptionState, Voting, VotingOption};
use hush_crypto::FheBackend;
use hush_types::{ProtocolLimits, Timestamp, VoterAddress, VotingId};

pub struct VotingRegistry;

impl VotingRegistry {
    /// Check a creation request.
    ///
    /// Order: option arrays aligned, option count bounds, time window,
    /// voter capacity, quorum.
    pub fn validate(
        &self,
        config: &VotingConfig,
        option_names: &[impl AsRef<str>],
        option_descriptions: &[impl AsRef<str>],
        limits: &ProtocolLimits,
    ) -> Result<(), VotingError> {
        if option_names.len() != option_descriptions.len() {
            return Err(VotingError::ArrayLengthMismatch {
                left: option_names.len(),
                right: option_descriptions.len(),
            });
        }

        let count = option_names.len();
        if count > limits.max_options {
            return Err(VotingError::TooManyOptions(count));
        }
        if count < limits.min_options {
            return Err(VotingError::InsufficientOptions(count));
        }

        let duration = config.duration_secs();
        if config.end_time <= config.start_time
            || duration < limits.min_voting_duration_secs
            || duration > limits.max_voting_duration_secs
        {
            return Err(VotingError::InvalidTimeWindow {
                start: config.start_time,
                end: config.end_time,
            });
        }

        if config.max_voters == 0 || config.max_voters > limits.max_voters {
            return Err(VotingError::InvalidVoterCapacity(config.max_voters));
        }
        if config.quorum > config.max_voters {
            return Err(VotingError::InvalidQuorum {
                quorum: config.quorum,
                max_voters: config.max_voters,
            });
        }

        Ok(())
    }

    /// Build a fresh voting with every accumulator at encrypted zero.
    #[allow(clippy::too_many_arguments)]
    pub fn build<F: FheBackend + ?Sized>(
        &self,
        id: VotingId,
        config: VotingConfig,
        option_names: &[impl AsRef<str>],
        option_descriptions: &[impl AsRef<str>],
        creator: VoterAddress,
        fhe: &F,
        limits: &ProtocolLimits,
        now: Timestamp,
    ) -> Result<Voting, VotingError> {
        let options: Vec<VotingOption> = option_names
            .iter()
            .zip(option_descriptions.iter())
            .map(|(name, description)| VotingOption {
                name: name.as_ref().to_string(),
                description: description.as_ref().to_string(),
            })
            .collect();

        let accumulators = options
            .iter()
            .map(|_| fhe.encrypt_zero())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Voting {
            id,
            config,
            options,
            accumulators,
            total_voters: 0,
            creator,
            created_at: now,
            default_credits: limits.default_credits,
            decryption: DecryptionState::NotRequested,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_types::VotingType;

    fn config(start: u64, end: u64) -> VotingConfig {
        VotingConfig {
            name: "Budget".into(),
            description: "Annual budget".into(),
            voting_type: VotingType::SingleChoice,
            start_time: Timestamp::new(start),
            end_time: Timestamp::new(end),
            quorum: 1,
            whitelist_enabled: false,
            max_voters: 100,
        }
    }

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn accepts_minimum_window() {
        let limits = ProtocolLimits::default();
        let cfg = config(1_000, 1_000 + limits.min_voting_duration_secs);
        assert!(VotingRegistry
            .validate(&cfg, &names(2), &names(2), &limits)
            .is_ok());
    }

    #[test]
    fn rejects_short_inverted_and_long_windows() {
        let limits = ProtocolLimits::default();
        for (start, end) in [
            (1_000, 1_000 + 3_599),
            (5_000, 1_000),
            (1_000, 1_000),
            (0, limits.max_voting_duration_secs + 1),
        ] {
            let result = VotingRegistry.validate(&config(start, end), &names(2), &names(2), &limits);
            assert!(
                matches!(result, Err(VotingError::InvalidTimeWindow { .. })),
                "window {start}..{end}"
            );
        }
    }

    #[test]
    fn option_bounds() {
        let limits = ProtocolLimits::default();
        let cfg = config(0, 7_200);
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(1), &names(1), &limits),
            Err(VotingError::InsufficientOptions(1))
        ));
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(101), &names(101), &limits),
            Err(VotingError::TooManyOptions(101))
        ));
        assert!(VotingRegistry
            .validate(&cfg, &names(100), &names(100), &limits)
            .is_ok());
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(3), &names(2), &limits),
            Err(VotingError::ArrayLengthMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn capacity_and_quorum() {
        let limits = ProtocolLimits::default();
        let mut cfg = config(0, 7_200);
        cfg.max_voters = 0;
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(2), &names(2), &limits),
            Err(VotingError::InvalidVoterCapacity(0))
        ));
        cfg.max_voters = limits.max_voters + 1;
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(2), &names(2), &limits),
            Err(VotingError::InvalidVoterCapacity(_))
        ));
        cfg.max_voters = 10;
        cfg.quorum = 11;
        assert!(matches!(
            VotingRegistry.validate(&cfg, &names(2), &names(2), &limits),
            Err(VotingError::InvalidQuorum { quorum: 11, max_voters: 10 })
        ));
    }
}
