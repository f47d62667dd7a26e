//! Asynchronous public decryption.
//!
//! A request returns immediately with an identifier; the plaintexts arrive
//! later, through whatever callback channel the coprocessor offers, as a
//! [`DecryptionFulfillment`] carrying the same identifier.

use crate::{Ciphertext, FheError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an issued decryption request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DecryptionRequestId(u64);

impl DecryptionRequestId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for DecryptionRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

/// The callback payload: plaintexts in the order the ciphertexts were submitted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecryptionFulfillment {
    pub request_id: DecryptionRequestId,
    pub plaintexts: Vec<u64>,
}

/// Issues public decryption requests.
pub trait DecryptionOracle: Send + Sync {
    fn request_public_decryption(
        &self,
        values: &[Ciphertext],
    ) -> Result<DecryptionRequestId, FheError>;
}
