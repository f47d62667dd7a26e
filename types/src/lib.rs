//! Fundamental types for the HushVote protocol.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! voter addresses, voting identifiers, timestamps and clocks, protocol limits, and the
//! voting-type and lifecycle enums.

pub mod address;
pub mod error;
pub mod id;
pub mod params;
pub mod state;
pub mod time;

pub use address::VoterAddress;
pub use error::TypeError;
pub use id::VotingId;
pub use params::ProtocolLimits;
pub use state::{VotingStatus, VotingType};
pub use time::{Clock, SystemClock, Timestamp};
