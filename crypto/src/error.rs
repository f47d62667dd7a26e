use thiserror::Error;

#[derive(Debug, Error)]
pub enum FheError {
    #[error("malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("ciphertext type mismatch: expected {expected}")]
    TypeMismatch { expected: &'static str },

    #[error("homomorphic arithmetic overflow")]
    Overflow,

    #[error("decryption oracle unavailable: {0}")]
    OracleUnavailable(String),

    #[error("FHE backend error: {0}")]
    Backend(String),
}
