use serde::{Deserialize, Serialize};

use crate::constants::{ADDRESS_LEN, SECRET_KEY_LEN};
use crate::error::{Result, StashError};

/// The self-contained triple sufficient to retrieve and decrypt a
/// blob: where the ciphertext lives, the key that unlocks it, and the
/// salt that tweaked the nonce.
///
/// Serializes to JSON with base64-encoded fields (the CLI surface);
/// the salt is omitted when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    #[serde(with = "b64")]
    pub address: Vec<u8>,

    #[serde(with = "b64")]
    pub secret_key: Vec<u8>,

    #[serde(with = "b64", default, skip_serializing_if = "Vec::is_empty")]
    pub salt: Vec<u8>,
}

impl Reference {
    pub fn new(address: Vec<u8>, secret_key: Vec<u8>, salt: Vec<u8>) -> Self {
        Self {
            address,
            secret_key,
            salt,
        }
    }

    /// Check the fields needed for decryption are present and sized.
    pub fn check_decryptable(&self) -> Result<()> {
        if self.secret_key.len() != SECRET_KEY_LEN {
            return Err(StashError::InvalidArgument(format!(
                "reference secret_key must be {} bytes, got {}",
                SECRET_KEY_LEN,
                self.secret_key.len()
            )));
        }
        Ok(())
    }

    /// Check the address is present and sized for a store lookup.
    pub fn check_addressable(&self) -> Result<()> {
        check_address(&self.address)
    }
}

/// Validate an address sized for the store key space.
pub fn check_address(address: &[u8]) -> Result<()> {
    if address.len() != ADDRESS_LEN {
        return Err(StashError::InvalidArgument(format!(
            "address must be {} bytes, got {}",
            ADDRESS_LEN,
            address.len()
        )));
    }
    Ok(())
}

mod b64 {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let reference = Reference::new(vec![1u8; 32], vec![2u8; 32], b"pepper".to_vec());
        let json = serde_json::to_string(&reference).unwrap();
        let parsed: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, reference);
    }

    #[test]
    fn test_empty_salt_is_omitted() {
        let reference = Reference::new(vec![1u8; 32], vec![2u8; 32], vec![]);
        let json = serde_json::to_string(&reference).unwrap();
        assert!(!json.contains("salt"));

        let parsed: Reference = serde_json::from_str(&json).unwrap();
        assert!(parsed.salt.is_empty());
    }

    #[test]
    fn test_fields_are_base64() {
        let reference = Reference::new(vec![0u8; 32], vec![0u8; 32], vec![]);
        let json = serde_json::to_string(&reference).unwrap();
        // 32 zero bytes in standard base64.
        assert!(json.contains("AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA="));
    }

    #[test]
    fn test_check_decryptable() {
        let good = Reference::new(vec![1u8; 32], vec![2u8; 32], vec![]);
        assert!(good.check_decryptable().is_ok());

        let short_key = Reference::new(vec![1u8; 32], vec![2u8; 16], vec![]);
        assert!(matches!(
            short_key.check_decryptable(),
            Err(StashError::InvalidArgument(_))
        ));

        let missing_key = Reference::new(vec![1u8; 32], vec![], vec![]);
        assert!(missing_key.check_decryptable().is_err());
    }

    #[test]
    fn test_check_address() {
        assert!(check_address(&[0u8; 32]).is_ok());
        assert!(check_address(&[0u8; 31]).is_err());
        assert!(check_address(&[]).is_err());
    }
}
