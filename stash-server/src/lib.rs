//! Daemon-side pieces of stash: configuration, storage backends, the
//! RPC host and its request dispatch. The `stashd` binary wires these
//! together; integration tests drive them directly.

pub mod config;
pub mod server;
pub mod service;
pub mod storage;
