use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("voting error: {0}")]
    Voting(#[from] hush_voting::VotingError),

    #[error("store error: {0}")]
    Store(#[from] hush_store::StoreError),

    #[error("LMDB error: {0}")]
    Lmdb(#[from] hush_store_lmdb::LmdbError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("logging error: {0}")]
    Logging(#[from] hush_utils::LoggingError),

    #[error("config error: {0}")]
    Config(String),

    #[error("integrity check failed: {0}")]
    Integrity(String),

    #[error("node already started")]
    AlreadyStarted,

    #[error("decryption relay is not running")]
    RelayClosed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("shutdown timeout")]
    ShutdownTimeout,
}
