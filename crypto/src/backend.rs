//! Homomorphic arithmetic over ciphertexts.

use crate::{Ciphertext, EncryptedBool, FheError};

/// The arithmetic subset of an FHE scheme that ballot processing relies on.
///
/// Every operation runs on ciphertexts only: an implementation must not reveal
/// which branch of [`select`](FheBackend::select) was taken.
pub trait FheBackend: Send + Sync {
    /// Trivially encrypt a public constant.
    fn encrypt_scalar(&self, value: u64) -> Result<Ciphertext, FheError>;

    /// Encrypted zero, the initial value of every option accumulator.
    fn encrypt_zero(&self) -> Result<Ciphertext, FheError> {
        self.encrypt_scalar(0)
    }

    /// `lhs == rhs` where `rhs` is public.
    fn eq_scalar(&self, lhs: &Ciphertext, rhs: u64) -> Result<EncryptedBool, FheError>;

    /// `cond ? if_true : if_false`.
    fn select(
        &self,
        cond: &EncryptedBool,
        if_true: &Ciphertext,
        if_false: &Ciphertext,
    ) -> Result<Ciphertext, FheError>;

    /// `lhs + rhs`.
    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext, FheError>;
}
