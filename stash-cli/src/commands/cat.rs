use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{parse_base64, parse_reference, read_stdin, write_stdout};

/// Pull the raw ciphertext at an address and write it to stdout. The
/// address comes from an argument or from a reference JSON on stdin.
pub async fn run_cat(dial_address: &str, blob_address: Option<&str>) -> Result<()> {
    let blob_address = resolve_address(blob_address).await?;

    let mut client = connect(dial_address).await?;
    let ciphertext = client.pull(blob_address).await?;
    write_stdout(&ciphertext).await
}

/// Decode the address argument, or fall back to the address of a
/// reference read from stdin.
pub async fn resolve_address(blob_address: Option<&str>) -> Result<Vec<u8>> {
    match blob_address {
        Some(encoded) => parse_base64("address", encoded),
        None => Ok(parse_reference(&read_stdin().await?)?.address),
    }
}
