//! Immutable creation parameters of a voting.

use hush_types::{Timestamp, VotingType};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VotingConfig {
    pub name: String,
    pub description: String,
    pub voting_type: VotingType,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    /// Minimum participating voters. Informational: it never gates tallying.
    pub quorum: u32,
    pub whitelist_enabled: bool,
    pub max_voters: u32,
}

impl VotingConfig {
    /// Length of the voting window in seconds (0 if the window is inverted).
    pub fn duration_secs(&self) -> u64 {
        self.end_time.as_secs().saturating_sub(self.start_time.as_secs())
    }

    /// Whether `now` lies inside the inclusive voting window.
    pub fn is_open_at(&self, now: Timestamp) -> bool {
        self.start_time <= now && now <= self.end_time
    }
}
