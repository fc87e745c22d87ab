pub mod cat;
pub mod decrypt;
pub mod encrypt;
pub mod get;
pub mod insert;
pub mod put;
pub mod reference;
pub mod stat;

use stash_core::rpc::StashClient;
use stash_core::Result;

/// Dial the daemon at the given URL.
pub async fn connect(address: &str) -> Result<StashClient> {
    StashClient::connect(address).await
}
