//! The HushVote protocol core.
//!
//! Voters submit encrypted ballots; each ballot is folded into per-option
//! encrypted accumulators without ever being decrypted, and only the final
//! per-option totals are revealed through public decryption.
//!
//! Components (leaves first):
//! - [`VotingRegistry`]: structural validation and creation of votings
//! - [`EligibilityGuard`]: period / pause / double-vote / whitelist / capacity checks
//! - [`BallotProcessor`]: homomorphic accumulation per voting type
//! - [`CreditLedger`]: quadratic-voting budgets at cost votes²
//! - [`TallyCoordinator`]: time-derived lifecycle and the decryption handshake
//!
//! [`VotingEngine`] wires them to a [`hush_store::LedgerStore`], an
//! [`hush_crypto::FheCapability`] and a [`hush_types::Clock`], committing every
//! operation as one atomic write batch.

pub mod ballot;
pub mod config;
pub mod credits;
pub mod eligibility;
pub mod engine;
pub mod error;
pub mod events;
pub mod records;
pub mod registry;
pub mod tally;
pub mod voting;

pub use ballot::{Ballot, BallotProcessor};
pub use config::VotingConfig;
pub use credits::{isqrt, quadratic_cost, CreditLedger, QuadraticStats};
pub use eligibility::EligibilityGuard;
pub use engine::VotingEngine;
pub use error::VotingError;
pub use events::VotingEvent;
pub use records::{CreditBalance, VoteAllocation, VoterRecord};
pub use registry::VotingRegistry;
pub use tally::{FulfillOutcome, ReissueDecision, TallyCoordinator};
pub use voting::{DecryptionState, Voting, VotingFull, VotingOption, VotingSummary};
