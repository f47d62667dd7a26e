//! Parsing errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid voter address: {0}")]
    InvalidAddress(String),

    #[error("unknown voting type tag: {0}")]
    UnknownVotingType(u8),
}
