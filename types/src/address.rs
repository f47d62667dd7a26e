//! Voter address type: a 20-byte account rendered as `0x`-prefixed hex.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A voter (or administrator) identity.
///
/// Stored in normalised lowercase form so that two spellings of the same
/// account compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterAddress(String);

impl VoterAddress {
    /// The standard prefix for all addresses.
    pub const PREFIX: &'static str = "0x";

    /// Number of raw bytes behind an address.
    pub const BYTE_LEN: usize = 20;

    /// Parse an address, rejecting anything that is not `0x` + 40 hex characters.
    pub fn parse(raw: &str) -> Result<Self, TypeError> {
        let body = raw
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| TypeError::InvalidAddress(raw.to_string()))?;
        if body.len() != Self::BYTE_LEN * 2 || hex::decode(body).is_err() {
            return Err(TypeError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(format!("{}{}", Self::PREFIX, body.to_ascii_lowercase())))
    }

    /// Build an address from its raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(format!("{}{}", Self::PREFIX, hex::encode(bytes)))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0[Self::PREFIX.len()..].bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for VoterAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VoterAddress {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_normalises_case() {
        let upper = VoterAddress::parse("0xABCDEFabcdef0123456789abcdef0123456789AB").unwrap();
        let lower = VoterAddress::parse("0xabcdefabcdef0123456789abcdef0123456789ab").unwrap();
        assert_eq!(upper, lower);
    }

    #[test]
    fn parse_rejects_malformed() {
        assert!(VoterAddress::parse("abcdefabcdef0123456789abcdef0123456789ab").is_err());
        assert!(VoterAddress::parse("0x1234").is_err());
        assert!(VoterAddress::parse("0xzzcdefabcdef0123456789abcdef0123456789ab").is_err());
    }

    #[test]
    fn from_bytes_and_zero() {
        assert!(VoterAddress::from_bytes([0u8; 20]).is_zero());
        let mut bytes = [0u8; 20];
        bytes[19] = 7;
        let addr = VoterAddress::from_bytes(bytes);
        assert!(!addr.is_zero());
        assert_eq!(addr.as_str(), "0x0000000000000000000000000000000000000007");
    }
}
