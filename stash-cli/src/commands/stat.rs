use stash_core::Result;

use crate::commands::cat::resolve_address;
use crate::commands::connect;
use crate::encoding::print_json;

/// Print existence and size of the blob at an address, taken from an
/// argument or from a reference JSON on stdin.
pub async fn run_stat(dial_address: &str, blob_address: Option<&str>) -> Result<()> {
    let blob_address = resolve_address(blob_address).await?;

    let mut client = connect(dial_address).await?;
    let stat = client.stat(blob_address).await?;
    print_json(&stat)
}
