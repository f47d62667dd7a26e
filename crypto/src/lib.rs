//! The encrypted-value capability consumed by the HushVote protocol.
//!
//! The protocol never looks inside a ciphertext. It needs exactly:
//! - **Homomorphic arithmetic**: trivial encryption of public constants, equality
//!   against a plaintext, encrypted select, and addition ([`FheBackend`])
//! - **Input proofs**: checking that a submitted ciphertext was produced by the
//!   voter for this voting ([`InputVerifier`])
//! - **Public decryption**: an asynchronous request whose plaintexts arrive later
//!   as a [`DecryptionFulfillment`] ([`DecryptionOracle`])
//!
//! A coprocessor client implements all three; [`FheCapability`] bundles them.

pub mod backend;
pub mod ciphertext;
pub mod decryption;
pub mod error;
pub mod hash;
pub mod proof;

pub use backend::FheBackend;
pub use ciphertext::{Ciphertext, EncryptedBool};
pub use decryption::{DecryptionFulfillment, DecryptionOracle, DecryptionRequestId};
pub use error::FheError;
pub use hash::{blake2b_256, blake2b_256_multi};
pub use proof::{InputProof, InputVerifier, ProofContext};

/// Everything the voting engine needs from the encryption layer.
pub trait FheCapability: FheBackend + InputVerifier + DecryptionOracle {}

impl<T: FheBackend + InputVerifier + DecryptionOracle> FheCapability for T {}
