//! HushVote node: runs the voting engine as an in-process service.
//!
//! The node:
//! - Opens the ledger (LMDB or in-memory) and checks its integrity
//! - Serialises all engine mutations behind one async mutex
//! - Fans committed events out to subscribers and Prometheus metrics
//! - Relays decryption callbacks and re-requests stale decryptions

pub mod config;
pub mod decryption;
pub mod error;
pub mod events;
pub mod handle;
pub mod metrics;
pub mod node;
pub mod shutdown;

pub use config::{NodeConfig, StorageBackend};
pub use decryption::DecryptionRelay;
pub use error::NodeError;
pub use events::{audit_listener, EventBus};
pub use handle::EngineHandle;
pub use metrics::NodeMetrics;
pub use node::VotingNode;
pub use shutdown::ShutdownController;
