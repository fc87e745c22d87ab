//! Byte plumbing for the command line: base64 parsing, salt
//! interpretation, stdin/stdout helpers, Reference JSON.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use stash_core::{Reference, Result, StashError};

/// Parse a salt option. Tried as base64 first; anything that does not
/// decode is taken as the raw bytes of the string itself. Absent or
/// empty means no salt.
pub fn parse_salt(salt: Option<&str>) -> Vec<u8> {
    match salt {
        None | Some("") => Vec::new(),
        Some(value) => match STANDARD.decode(value.as_bytes()) {
            Ok(bytes) => bytes,
            Err(_) => value.as_bytes().to_vec(),
        },
    }
}

/// Strict base64 for addresses and keys.
pub fn parse_base64(label: &str, value: &str) -> Result<Vec<u8>> {
    STANDARD.decode(value.as_bytes()).map_err(|e| {
        StashError::InvalidArgument(format!(
            "could not decode {label} '{value}' as base64: {e}"
        ))
    })
}

/// Parse a Reference from its JSON form (as printed by put and ref).
pub fn parse_reference(bytes: &[u8]) -> Result<Reference> {
    serde_json::from_slice(bytes).map_err(|e| {
        StashError::InvalidArgument(format!("could not parse reference JSON: {e}"))
    })
}

/// Read all of stdin.
pub async fn read_stdin() -> Result<Vec<u8>> {
    let mut data = Vec::new();
    tokio::io::stdin()
        .read_to_end(&mut data)
        .await
        .map_err(|e| StashError::Io(format!("read from stdin failed: {e}")))?;
    Ok(data)
}

/// Write raw bytes to stdout.
pub async fn write_stdout(bytes: &[u8]) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(bytes)
        .await
        .map_err(|e| StashError::Io(format!("write to stdout failed: {e}")))?;
    stdout
        .flush()
        .await
        .map_err(|e| StashError::Io(format!("flush stdout failed: {e}")))?;
    Ok(())
}

/// Print a value as one line of JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| StashError::Internal(format!("serialize to JSON failed: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Base64 of an address, for JSON output.
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_salt_prefers_base64() {
        // "cGVwcGVy" is base64 for "pepper".
        assert_eq!(parse_salt(Some("cGVwcGVy")), b"pepper");
    }

    #[test]
    fn test_parse_salt_falls_back_to_raw_bytes() {
        // Not valid base64; taken literally.
        assert_eq!(parse_salt(Some("pepper!")), b"pepper!");
    }

    #[test]
    fn test_parse_salt_absent_is_empty() {
        assert!(parse_salt(None).is_empty());
        assert!(parse_salt(Some("")).is_empty());
    }

    #[test]
    fn test_parse_base64_rejects_garbage() {
        assert!(parse_base64("address", "not base64!").is_err());
        assert_eq!(parse_base64("address", "q80=").unwrap(), vec![0xAB, 0xCD]);
    }

    #[test]
    fn test_parse_reference_roundtrip() {
        let reference = Reference::new(vec![1u8; 32], vec![2u8; 32], b"s".to_vec());
        let json = serde_json::to_vec(&reference).unwrap();
        assert_eq!(parse_reference(&json).unwrap(), reference);
    }

    #[test]
    fn test_parse_reference_rejects_non_json() {
        assert!(parse_reference(b"plainly not json").is_err());
    }
}
