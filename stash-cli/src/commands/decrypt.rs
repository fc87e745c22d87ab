use stash_core::Result;

use crate::commands::connect;
use crate::encoding::{parse_base64, parse_salt, read_stdin, write_stdout};

/// Decrypt ciphertext from stdin with the given key and salt, writing
/// the plaintext to stdout.
pub async fn run_decrypt(address: &str, key: &str, salt: Option<&str>) -> Result<()> {
    let encrypted_data = read_stdin().await?;
    let secret_key = parse_base64("secret key", key)?;
    let salt = parse_salt(salt);

    let mut client = connect(address).await?;
    let data = client.decrypt(secret_key, salt, encrypted_data).await?;
    write_stdout(&data).await
}
