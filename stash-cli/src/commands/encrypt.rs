use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{parse_salt, read_stdin, write_stdout};

/// Encrypt data from stdin and write the ciphertext to stdout.
pub async fn run_encrypt(address: &str, salt: Option<&str>) -> Result<()> {
    let data = read_stdin().await?;
    let salt = parse_salt(salt);

    let mut client = connect(address).await?;
    let (_reference, ciphertext) = client.encrypt(data, salt).await?;
    write_stdout(&ciphertext).await
}
