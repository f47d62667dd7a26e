//! Node configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use hush_store_lmdb::DEFAULT_MAP_SIZE;
use hush_types::params::{DECRYPTION_TIMEOUT_SECS, MAX_DECRYPTION_ATTEMPTS};
use hush_types::ProtocolLimits;
use hush_utils::LogFormat;

use crate::NodeError;

/// Where the ledger lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Persistent LMDB environment under `data_dir`.
    Lmdb,
    /// In-process tables; everything is lost on exit.
    Memory,
}

/// Configuration for a HushVote node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Data directory for ledger storage.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    /// LMDB map size in bytes.
    #[serde(default = "default_map_size")]
    pub lmdb_map_size: usize,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Age after which a pending decryption is requested again.
    #[serde(default = "default_decryption_timeout")]
    pub decryption_timeout_secs: u64,

    /// Total decryption requests allowed per voting, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_decryption_attempts: u32,

    /// How often the relay sweeps for stale decryptions.
    #[serde(default = "default_watchdog_interval")]
    pub watchdog_interval_secs: u64,

    /// Capacity of the inbound decryption-fulfilment channel.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,

    /// Log every committed event as JSON on the `hushvote::audit` target.
    #[serde(default)]
    pub audit_events: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./hushvote_data")
}

fn default_storage() -> StorageBackend {
    StorageBackend::Lmdb
}

fn default_map_size() -> usize {
    DEFAULT_MAP_SIZE
}

fn default_log_format() -> LogFormat {
    LogFormat::Human
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_decryption_timeout() -> u64 {
    DECRYPTION_TIMEOUT_SECS
}

fn default_max_attempts() -> u32 {
    MAX_DECRYPTION_ATTEMPTS
}

fn default_watchdog_interval() -> u64 {
    60
}

fn default_event_channel_capacity() -> usize {
    1024
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        let config: Self = toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), NodeError> {
        if self.max_decryption_attempts == 0 {
            return Err(NodeError::Config(
                "max_decryption_attempts must be at least 1".to_string(),
            ));
        }
        if self.watchdog_interval_secs == 0 {
            return Err(NodeError::Config(
                "watchdog_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(NodeError::Config(
                "event_channel_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Engine limits with this node's decryption policy applied.
    pub fn protocol_limits(&self) -> ProtocolLimits {
        ProtocolLimits {
            decryption_timeout_secs: self.decryption_timeout_secs,
            max_decryption_attempts: self.max_decryption_attempts,
            ..ProtocolLimits::default()
        }
    }

    /// An in-memory configuration, handy for tests and demos.
    pub fn in_memory() -> Self {
        Self {
            storage: StorageBackend::Memory,
            ..Self::default()
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage: default_storage(),
            lmdb_map_size: default_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            decryption_timeout_secs: default_decryption_timeout(),
            max_decryption_attempts: default_max_attempts(),
            watchdog_interval_secs: default_watchdog_interval(),
            event_channel_capacity: default_event_channel_capacity(),
            audit_events: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string().unwrap();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.storage, config.storage);
        assert_eq!(parsed.lmdb_map_size, config.lmdb_map_size);
        assert_eq!(parsed.log_format, config.log_format);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.storage, StorageBackend::Lmdb);
        assert_eq!(config.decryption_timeout_secs, 3_600);
        assert_eq!(config.max_decryption_attempts, 3);
        assert_eq!(config.watchdog_interval_secs, 60);
        assert_eq!(config.log_format, LogFormat::Human);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            storage = "memory"
            log_format = "json"
            decryption_timeout_secs = 120
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.protocol_limits().decryption_timeout_secs, 120);
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn unknown_storage_is_rejected() {
        let result = NodeConfig::from_toml_str(r#"storage = "s3""#);
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        let result = NodeConfig::from_toml_str("max_decryption_attempts = 0");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/hushvote.toml");
        assert!(matches!(result, Err(NodeError::Config(_))));
    }
}
