//! Wire message schema for the RPC services.
//!
//! These structs, their field tags, and the [`ErrorKind`] values are
//! the published protocol schema: tag assignments are stable across
//! releases and must never be reused for a different meaning. Bodies
//! travel protobuf-encoded inside the frames described in
//! [`crate::rpc::frame`].

use prost::Message;

use crate::error::StashError;
use crate::reference;
use crate::storage;

/// Cleartext as submitted by a caller, with the address-tweaking salt.
#[derive(Clone, PartialEq, Message)]
pub struct Plaintext {
    #[prost(bytes = "vec", tag = "1")]
    pub data: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub salt: Vec<u8>,
}

/// Encrypted blob bytes, opaque to the storage service.
#[derive(Clone, PartialEq, Message)]
pub struct Ciphertext {
    #[prost(bytes = "vec", tag = "1")]
    pub encrypted_data: Vec<u8>,
}

/// Wire form of [`reference::Reference`].
#[derive(Clone, PartialEq, Message)]
pub struct Reference {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub secret_key: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub salt: Vec<u8>,
}

/// Result of the encryption oracle: the reference plus the ciphertext
/// the caller may hand to a storage service of its choosing.
#[derive(Clone, PartialEq, Message)]
pub struct ReferenceAndCiphertext {
    #[prost(message, optional, tag = "1")]
    pub reference: Option<Reference>,
    #[prost(message, optional, tag = "2")]
    pub ciphertext: Option<Ciphertext>,
}

/// A bare store address.
#[derive(Clone, PartialEq, Message)]
pub struct Address {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
}

/// Wire form of [`storage::StatInfo`].
#[derive(Clone, PartialEq, Message)]
pub struct StatInfo {
    #[prost(bool, tag = "1")]
    pub exists: bool,
    #[prost(uint64, tag = "2")]
    pub size: u64,
}

/// Error payload carried under an error status frame. An error and a
/// result payload are mutually exclusive on the wire.
#[derive(Clone, PartialEq, Message)]
pub struct RpcError {
    #[prost(enumeration = "ErrorKind", tag = "1")]
    pub kind: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

/// Error kinds of the taxonomy. Values are stable wire identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ErrorKind {
    Internal = 0,
    InvalidArgument = 1,
    NotFound = 2,
    Io = 3,
    Crypto = 4,
    Cancelled = 5,
}

impl From<&StashError> for ErrorKind {
    fn from(err: &StashError) -> Self {
        match err {
            StashError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            StashError::NotFound(_) => ErrorKind::NotFound,
            StashError::Io(_) => ErrorKind::Io,
            StashError::Crypto(_) => ErrorKind::Crypto,
            StashError::Cancelled(_) => ErrorKind::Cancelled,
            StashError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Encode an error for the wire, tagged with its kind.
pub fn error_to_wire(err: &StashError) -> RpcError {
    RpcError {
        kind: ErrorKind::from(err) as i32,
        message: err.to_string(),
    }
}

/// Reconstruct a [`StashError`] from a wire error payload.
pub fn error_from_wire(err: RpcError) -> StashError {
    let kind = ErrorKind::try_from(err.kind).unwrap_or(ErrorKind::Internal);
    match kind {
        ErrorKind::InvalidArgument => StashError::InvalidArgument(err.message),
        ErrorKind::NotFound => StashError::NotFound(err.message),
        ErrorKind::Io => StashError::Io(err.message),
        ErrorKind::Crypto => {
            StashError::Crypto(crate::crypto::CryptoError::Cipher(err.message))
        }
        ErrorKind::Cancelled => StashError::Cancelled(err.message),
        ErrorKind::Internal => StashError::Internal(err.message),
    }
}

/// Decode an error payload, tolerating a malformed body.
pub fn decode_error(payload: &[u8]) -> StashError {
    match RpcError::decode(payload) {
        Ok(err) => error_from_wire(err),
        Err(e) => StashError::Internal(format!("undecodable error payload: {e}")),
    }
}

impl From<reference::Reference> for Reference {
    fn from(r: reference::Reference) -> Self {
        Self {
            address: r.address,
            secret_key: r.secret_key,
            salt: r.salt,
        }
    }
}

impl From<Reference> for reference::Reference {
    fn from(r: Reference) -> Self {
        Self {
            address: r.address,
            secret_key: r.secret_key,
            salt: r.salt,
        }
    }
}

impl From<storage::StatInfo> for StatInfo {
    fn from(s: storage::StatInfo) -> Self {
        Self {
            exists: s.exists,
            size: s.size,
        }
    }
}

impl From<StatInfo> for storage::StatInfo {
    fn from(s: StatInfo) -> Self {
        Self {
            exists: s.exists,
            size: s.size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plaintext_encode_decode() {
        let msg = Plaintext {
            data: b"hello".to_vec(),
            salt: b"pepper".to_vec(),
        };
        let bytes = msg.encode_to_vec();
        let decoded = Plaintext::decode(bytes.as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn test_error_kind_survives_the_wire() {
        let err = StashError::NotFound("blob not found: abcd".to_string());
        let wire = error_to_wire(&err);
        let bytes = wire.encode_to_vec();
        let back = decode_error(&bytes);
        assert!(matches!(back, StashError::NotFound(_)));
        assert!(back.to_string().contains("abcd"));
    }

    #[test]
    fn test_unknown_error_kind_maps_to_internal() {
        let wire = RpcError {
            kind: 999,
            message: "from the future".to_string(),
        };
        assert!(matches!(
            error_from_wire(wire),
            StashError::Internal(_)
        ));
    }

    #[test]
    fn test_reference_conversion_roundtrip() {
        let domain = crate::Reference::new(vec![1u8; 32], vec![2u8; 32], b"s".to_vec());
        let wire: Reference = domain.clone().into();
        let back: crate::Reference = wire.into();
        assert_eq!(back, domain);
    }

    #[test]
    fn test_empty_message_decodes_to_defaults() {
        let decoded = Plaintext::decode(&[][..]).unwrap();
        assert!(decoded.data.is_empty());
        assert!(decoded.salt.is_empty());
    }
}
