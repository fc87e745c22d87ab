//! RPC protocol: method and status bytes, listen-URL handling.
//!
//! Three services share one channel; the method byte's high nibble
//! namespaces the service. Request and response layouts live in
//! [`frame`], message bodies in [`crate::proto`].

pub mod client;
pub mod frame;

use crate::error::{Result, StashError};

pub use client::StashClient;

/// Cleartext service: the server sees plaintext.
pub const METHOD_CLEARTEXT_PUT: u8 = 0x01;
pub const METHOD_CLEARTEXT_GET: u8 = 0x02;

/// Encryption service: a stateless oracle, never touches the store.
pub const METHOD_ENCRYPTION_ENCRYPT: u8 = 0x11;
pub const METHOD_ENCRYPTION_DECRYPT: u8 = 0x12;

/// Storage service: opaque bytes only.
pub const METHOD_STORAGE_PUSH: u8 = 0x21;
pub const METHOD_STORAGE_PULL: u8 = 0x22;
pub const METHOD_STORAGE_STAT: u8 = 0x23;

/// Response status bytes.
pub const STATUS_OK: u8 = 0x00;
pub const STATUS_ERROR: u8 = 0xFF;

/// Human-readable method name for log fields.
pub fn method_name(method: u8) -> &'static str {
    match method {
        METHOD_CLEARTEXT_PUT => "cleartext.put",
        METHOD_CLEARTEXT_GET => "cleartext.get",
        METHOD_ENCRYPTION_ENCRYPT => "encryption.encrypt",
        METHOD_ENCRYPTION_DECRYPT => "encryption.decrypt",
        METHOD_STORAGE_PUSH => "storage.push",
        METHOD_STORAGE_PULL => "storage.pull",
        METHOD_STORAGE_STAT => "storage.stat",
        _ => "unknown",
    }
}

/// Split a listen URL of the form `scheme://address` into its scheme
/// and address parts. Supported schemes: `tcp` (host:port) and `unix`
/// (socket path).
pub fn split_listen_url(url: &str) -> Result<(&str, &str)> {
    let (scheme, address) = url.split_once("://").ok_or_else(|| {
        StashError::InvalidArgument(format!(
            "listen URL '{url}' must have the form scheme://address"
        ))
    })?;

    match scheme {
        "tcp" | "unix" => {}
        _ => {
            return Err(StashError::InvalidArgument(format!(
                "unsupported listen scheme '{scheme}' in '{url}' (expected tcp or unix)"
            )));
        }
    }

    if address.is_empty() {
        return Err(StashError::InvalidArgument(format!(
            "listen URL '{url}' has an empty address"
        )));
    }

    Ok((scheme, address))
}
