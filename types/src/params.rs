//! Protocol limits: the numeric constants every implementation must agree on,
//! plus the tunables an operator may adjust.

use serde::{Deserialize, Serialize};

/// Maximum number of options in a single voting.
pub const MAX_OPTIONS: usize = 100;

/// Minimum number of options in a single voting.
pub const MIN_OPTIONS: usize = 2;

/// Maximum voter capacity of a single voting.
pub const MAX_VOTERS: u32 = 10_000;

/// Shortest allowed voting window (1 hour).
pub const MIN_VOTING_DURATION_SECS: u64 = 3_600;

/// Longest allowed voting window (365 days).
pub const MAX_VOTING_DURATION_SECS: u64 = 31_536_000;

/// Lowest credit allocation for quadratic voting.
pub const MIN_CREDITS: u32 = 1;

/// Highest credit allocation for quadratic voting.
pub const MAX_CREDITS: u32 = 1_000;

/// Credits a quadratic voter receives until the administrator changes the default.
pub const DEFAULT_CREDITS: u32 = 100;

/// Age after which a pending public decryption is requested again (1 hour).
pub const DECRYPTION_TIMEOUT_SECS: u64 = 3_600;

/// Decryption requests per voting, counting the first.
pub const MAX_DECRYPTION_ATTEMPTS: u32 = 3;

/// Protocol limits consulted by the voting engine.
///
/// The structural constants are fixed by the protocol; only the decryption
/// watchdog settings are expected to differ between deployments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolLimits {
    pub max_options: usize,
    pub min_options: usize,
    pub max_voters: u32,
    pub min_voting_duration_secs: u64,
    pub max_voting_duration_secs: u64,
    pub min_credits: u32,
    pub max_credits: u32,
    pub default_credits: u32,

    /// A pending decryption older than this is re-requested.
    pub decryption_timeout_secs: u64,

    /// Total number of decryption requests issued per voting, including the first.
    pub max_decryption_attempts: u32,
}

impl ProtocolLimits {
    /// Whether `amount` is a valid credit allocation.
    pub fn credits_in_range(&self, amount: u32) -> bool {
        (self.min_credits..=self.max_credits).contains(&amount)
    }
}

impl Default for ProtocolLimits {
    fn default() -> Self {
        Self {
            max_options: MAX_OPTIONS,
            min_options: MIN_OPTIONS,
            max_voters: MAX_VOTERS,
            min_voting_duration_secs: MIN_VOTING_DURATION_SECS,
            max_voting_duration_secs: MAX_VOTING_DURATION_SECS,
            min_credits: MIN_CREDITS,
            max_credits: MAX_CREDITS,
            default_credits: DEFAULT_CREDITS,
            decryption_timeout_secs: DECRYPTION_TIMEOUT_SECS,
            max_decryption_attempts: MAX_DECRYPTION_ATTEMPTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_bounds_are_inclusive() {
        let limits = ProtocolLimits::default();
        assert!(!limits.credits_in_range(0));
        assert!(limits.credits_in_range(1));
        assert!(limits.credits_in_range(1_000));
        assert!(!limits.credits_in_range(1_001));
    }

    #[test]
    fn max_duration_is_one_year() {
        assert_eq!(MAX_VOTING_DURATION_SECS, 365 * 24 * 3_600);
    }
}
