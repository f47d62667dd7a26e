//! Plaintext-passthrough FHE capability for testing.
//!
//! Ciphertexts carry their plaintext in the clear, so tests can assert on
//! accumulator contents, while the engine still sees nothing but opaque
//! [`Ciphertext`] handles. Input proofs are the context binding digest, so a
//! proof made for one voter or voting fails for any other.

use hush_crypto::{
    Ciphertext, DecryptionFulfillment, DecryptionOracle, DecryptionRequestId, EncryptedBool,
    FheBackend, FheError, InputProof, InputVerifier, ProofContext,
};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

const UINT_TAG: u8 = 0x75;
const BOOL_TAG: u8 = 0x62;
const ENCODED_LEN: usize = 9;

fn encode(tag: u8, value: u64) -> Ciphertext {
    let mut bytes = Vec::with_capacity(ENCODED_LEN);
    bytes.push(tag);
    bytes.extend_from_slice(&value.to_be_bytes());
    Ciphertext::new(bytes)
}

fn decode(ct: &Ciphertext, tag: u8) -> Result<u64, FheError> {
    let bytes = ct.as_bytes();
    if bytes.len() != ENCODED_LEN {
        return Err(FheError::MalformedCiphertext(format!(
            "expected {} bytes, got {}",
            ENCODED_LEN,
            bytes.len()
        )));
    }
    if bytes[0] != tag {
        return Err(FheError::TypeMismatch {
            expected: if tag == BOOL_TAG { "ebool" } else { "euint" },
        });
    }
    let mut value = [0u8; 8];
    value.copy_from_slice(&bytes[1..]);
    Ok(u64::from_be_bytes(value))
}

/// A fake coprocessor that performs every operation on plaintexts.
pub struct PlainFhe {
    next_request: AtomicU64,
    requests: Mutex<Vec<(DecryptionRequestId, Vec<Ciphertext>)>>,
    oracle_down: AtomicBool,
}

impl PlainFhe {
    pub fn new() -> Self {
        Self {
            next_request: AtomicU64::new(1),
            requests: Mutex::new(Vec::new()),
            oracle_down: AtomicBool::new(false),
        }
    }

    /// Encrypt a value the way a client would.
    pub fn encrypt(&self, value: u64) -> Ciphertext {
        encode(UINT_TAG, value)
    }

    /// Encrypt a ballot's values and produce the matching input proof.
    pub fn encrypt_input(
        &self,
        values: &[u64],
        context: &ProofContext,
    ) -> (Vec<Ciphertext>, InputProof) {
        let ciphertexts: Vec<Ciphertext> = values.iter().map(|v| self.encrypt(*v)).collect();
        let proof = InputProof::new(context.binding_digest(&ciphertexts).to_vec());
        (ciphertexts, proof)
    }

    /// Read the plaintext behind a ciphertext.
    pub fn decrypt(&self, ct: &Ciphertext) -> Result<u64, FheError> {
        decode(ct, UINT_TAG)
    }

    /// Every decryption request issued so far, oldest first.
    pub fn requests(&self) -> Vec<(DecryptionRequestId, Vec<Ciphertext>)> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recently issued request id.
    pub fn last_request(&self) -> Option<DecryptionRequestId> {
        self.requests.lock().unwrap().last().map(|(id, _)| *id)
    }

    /// The callback the coprocessor would deliver for `request_id`.
    pub fn fulfillment_for(
        &self,
        request_id: DecryptionRequestId,
    ) -> Result<Option<DecryptionFulfillment>, FheError> {
        let requests = self.requests.lock().unwrap();
        let Some((_, values)) = requests.iter().find(|(id, _)| *id == request_id) else {
            return Ok(None);
        };
        let plaintexts = values
            .iter()
            .map(|ct| decode(ct, UINT_TAG))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(DecryptionFulfillment {
            request_id,
            plaintexts,
        }))
    }

    /// Make subsequent decryption requests fail, as if the relayer were down.
    pub fn set_oracle_available(&self, available: bool) {
        self.oracle_down.store(!available, Ordering::SeqCst);
    }
}

impl Default for PlainFhe {
    fn default() -> Self {
        Self::new()
    }
}

impl FheBackend for PlainFhe {
    fn encrypt_scalar(&self, value: u64) -> Result<Ciphertext, FheError> {
        Ok(encode(UINT_TAG, value))
    }

    fn eq_scalar(&self, lhs: &Ciphertext, rhs: u64) -> Result<EncryptedBool, FheError> {
        let value = decode(lhs, UINT_TAG)?;
        Ok(EncryptedBool::new(encode(BOOL_TAG, u64::from(value == rhs))))
    }

    fn select(
        &self,
        cond: &EncryptedBool,
        if_true: &Ciphertext,
        if_false: &Ciphertext,
    ) -> Result<Ciphertext, FheError> {
        let flag = decode(cond.as_ciphertext(), BOOL_TAG)?;
        decode(if_true, UINT_TAG)?;
        decode(if_false, UINT_TAG)?;
        Ok(if flag != 0 {
            if_true.clone()
        } else {
            if_false.clone()
        })
    }

    fn add(&self, lhs: &Ciphertext, rhs: &Ciphertext) -> Result<Ciphertext, FheError> {
        let sum = decode(lhs, UINT_TAG)?
            .checked_add(decode(rhs, UINT_TAG)?)
            .ok_or(FheError::Overflow)?;
        Ok(encode(UINT_TAG, sum))
    }
}

impl InputVerifier for PlainFhe {
    fn verify(
        &self,
        ciphertexts: &[Ciphertext],
        proof: &InputProof,
        context: &ProofContext,
    ) -> bool {
        proof.as_bytes() == context.binding_digest(ciphertexts)
    }
}

impl DecryptionOracle for PlainFhe {
    fn request_public_decryption(
        &self,
        values: &[Ciphertext],
    ) -> Result<DecryptionRequestId, FheError> {
        if self.oracle_down.load(Ordering::SeqCst) {
            return Err(FheError::OracleUnavailable("relayer offline".to_string()));
        }
        let id = DecryptionRequestId::new(self.next_request.fetch_add(1, Ordering::SeqCst));
        self.requests.lock().unwrap().push((id, values.to_vec()));
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hush_types::{VoterAddress, VotingId};

    #[test]
    fn select_add_accumulates() {
        let fhe = PlainFhe::new();
        let choice = fhe.encrypt(2);
        let one = fhe.encrypt_scalar(1).unwrap();
        let zero = fhe.encrypt_zero().unwrap();

        let mut acc = fhe.encrypt_zero().unwrap();
        for option in 0..3 {
            let hit = fhe.eq_scalar(&choice, option).unwrap();
            let inc = fhe.select(&hit, &one, &zero).unwrap();
            acc = fhe.add(&acc, &inc).unwrap();
        }
        assert_eq!(fhe.decrypt(&acc).unwrap(), 1);
    }

    #[test]
    fn bool_is_not_a_uint() {
        let fhe = PlainFhe::new();
        let flag = fhe.eq_scalar(&fhe.encrypt(1), 1).unwrap();
        assert!(matches!(
            fhe.add(flag.as_ciphertext(), &fhe.encrypt(1)),
            Err(FheError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn proof_is_bound_to_context() {
        let fhe = PlainFhe::new();
        let ctx = ProofContext::new(VotingId::new(0), VoterAddress::from_bytes([1; 20]));
        let other = ProofContext::new(VotingId::new(0), VoterAddress::from_bytes([2; 20]));
        let (cts, proof) = fhe.encrypt_input(&[1], &ctx);
        assert!(fhe.verify(&cts, &proof, &ctx));
        assert!(!fhe.verify(&cts, &proof, &other));
    }

    #[test]
    fn decryption_requests_are_recorded() {
        let fhe = PlainFhe::new();
        let id = fhe
            .request_public_decryption(&[fhe.encrypt(4), fhe.encrypt(9)])
            .unwrap();
        let fulfillment = fhe.fulfillment_for(id).unwrap().unwrap();
        assert_eq!(fulfillment.plaintexts, vec![4, 9]);

        fhe.set_oracle_available(false);
        assert!(fhe.request_public_decryption(&[]).is_err());
    }
}
