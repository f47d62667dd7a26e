//! Opaque ciphertext handles.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An encrypted unsigned integer.
///
/// The bytes are meaningful only to the [`FheBackend`](crate::FheBackend) that
/// produced them; the protocol stores and forwards them untouched.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ciphertext(Vec<u8>);

impl Ciphertext {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = &self.0[..self.0.len().min(4)];
        write!(f, "Ciphertext({}.., {} bytes)", hex::encode(shown), self.0.len())
    }
}

impl fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

/// An encrypted boolean, the result of an encrypted comparison.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBool(Ciphertext);

impl EncryptedBool {
    pub fn new(inner: Ciphertext) -> Self {
        Self(inner)
    }

    pub fn as_ciphertext(&self) -> &Ciphertext {
        &self.0
    }
}
