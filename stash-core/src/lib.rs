//! Deterministic encryption and content-addressed storage engine.
//!
//! Cleartext goes in, a [`Reference`] (address, secret key, salt) comes
//! out, and only ciphertext is retained. The secret key is derived from
//! the plaintext itself, so identical inputs encrypt to identical
//! ciphertext at identical addresses: the store deduplicates naturally
//! without ever seeing plaintext.

pub mod constants;
pub mod crypto;
pub mod error;
pub mod proto;
pub mod reference;
pub mod rpc;
pub mod stash;
pub mod storage;

pub use error::{Result, StashError};
pub use reference::Reference;
pub use stash::Stash;
