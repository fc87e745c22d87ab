use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{parse_salt, print_json, read_stdin};

/// Encrypt data from stdin and print its reference without storing
/// anything.
pub async fn run_ref(address: &str, salt: Option<&str>) -> Result<()> {
    let data = read_stdin().await?;
    let salt = parse_salt(salt);

    let mut client = connect(address).await?;
    let (reference, _ciphertext) = client.encrypt(data, salt).await?;
    print_json(&reference)
}
