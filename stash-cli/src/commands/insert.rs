use serde_json::json;

use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{encode_base64, print_json, read_stdin};

/// Push (presumably encrypted) bytes from stdin straight into the
/// store and print the resulting address JSON.
pub async fn run_insert(address: &str) -> Result<()> {
    let data = read_stdin().await?;

    let mut client = connect(address).await?;
    let blob_address = client.push(data).await?;
    print_json(&json!({ "address": encode_base64(&blob_address) }))
}
