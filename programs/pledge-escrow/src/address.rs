use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::constants::{ACTOR_SEED_PREFIX, ESCROW_V0_SEED_PREFIX};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Invalid hex address: {0}")]
    InvalidHex(String),

    #[error("Invalid address length: {0} bytes (expected 32)")]
    InvalidLength(usize),
}

/// A 32-byte account identity. Roles (creator, oracle, treasury) are compared
/// by exact match against stored addresses.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Address([u8; 32]);

impl Address {
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    /// Derive an address from seeds (sha256 over the concatenated seeds).
    pub fn derive(seeds: &[&[u8]]) -> Self {
        let mut hasher = Sha256::new();
        for seed in seeds {
            hasher.update(seed);
        }
        Self(hasher.finalize().into())
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({}..)", &hex::encode(&self.0[..4]))
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidHex(e.to_string()))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| AddressError::InvalidLength(b.len()))?;
        Ok(Self(bytes))
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.to_string()
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Custody address of the escrow for `campaign_id` minted by `factory`.
pub fn find_escrow_address(factory: &Address, campaign_id: u64) -> Address {
    Address::derive(&[
        ESCROW_V0_SEED_PREFIX,
        factory.as_ref(),
        &campaign_id.to_le_bytes(),
    ])
}

/// Stable address for a named actor.
pub fn find_actor_address(name: &str) -> Address {
    Address::derive(&[ACTOR_SEED_PREFIX, name.as_bytes()])
}

/// Commitment to a set of verification criteria.
pub fn prompt_hash(criteria: &str) -> [u8; 32] {
    Sha256::digest(criteria.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip_and_prefix() {
        let address = find_actor_address("alice");
        let text = address.to_string();
        assert_eq!(text.len(), 64);
        assert_eq!(text.parse::<Address>().unwrap(), address);
        assert_eq!(format!("0x{text}").parse::<Address>().unwrap(), address);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "zz".parse::<Address>(),
            Err(AddressError::InvalidHex(_))
        ));
        assert_eq!(
            "abcd".parse::<Address>(),
            Err(AddressError::InvalidLength(2))
        );
    }

    #[test]
    fn test_escrow_addresses_are_distinct_per_campaign_and_factory() {
        let factory_a = find_actor_address("factory_a");
        let factory_b = find_actor_address("factory_b");

        assert_eq!(
            find_escrow_address(&factory_a, 1),
            find_escrow_address(&factory_a, 1)
        );
        assert_ne!(
            find_escrow_address(&factory_a, 1),
            find_escrow_address(&factory_a, 2)
        );
        assert_ne!(
            find_escrow_address(&factory_a, 1),
            find_escrow_address(&factory_b, 1)
        );
    }

    #[test]
    fn test_prompt_hash_is_sha256() {
        assert_eq!(
            hex::encode(prompt_hash("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_ne!(prompt_hash("ship v1"), prompt_hash("ship v2"));
    }
}
