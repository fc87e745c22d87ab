use stash_core::{Reference, Result, StashError};

use crate::commands::connect;
use crate::encoding::{parse_base64, parse_reference, parse_salt, read_stdin, write_stdout};

/// Fetch and decrypt a blob, writing the plaintext to stdout.
///
/// The reference comes either from JSON on stdin (as printed by put
/// and ref) or from an ADDRESS argument plus `--key` and `--salt`.
pub async fn run_get(
    dial_address: &str,
    blob_address: Option<&str>,
    key: Option<&str>,
    salt: Option<&str>,
) -> Result<()> {
    let reference = match blob_address {
        Some(encoded) => {
            let key = key.ok_or_else(|| {
                StashError::InvalidArgument(
                    "a secret key must be provided in order to decrypt".to_string(),
                )
            })?;
            Reference::new(
                parse_base64("address", encoded)?,
                parse_base64("secret key", key)?,
                parse_salt(salt),
            )
        }
        None => parse_reference(&read_stdin().await?)?,
    };

    let mut client = connect(dial_address).await?;
    let data = client.get(&reference).await?;
    write_stdout(&data).await
}
