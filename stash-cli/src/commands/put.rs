use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{parse_salt, print_json, read_stdin};

/// Encrypt data from stdin, store it, and print the reference JSON.
pub async fn run_put(address: &str, salt: Option<&str>) -> Result<()> {
    let data = read_stdin().await?;
    let salt = parse_salt(salt);

    let mut client = connect(address).await?;
    let reference = client.put(data, salt).await?;
    print_json(&reference)
}
