//! Request dispatch for the three RPC services.
//!
//! Each handler decodes its protobuf request, runs against the
//! [`Stash`] facade (or only the crypto primitive, or only the
//! store), and encodes a protobuf response. Any error surfaces as an
//! [`rpc::STATUS_ERROR`] frame carrying the kind-tagged wire error;
//! a payload and an error are mutually exclusive.

use prost::Message;
use tracing::debug;

use stash_core::error::{Result, StashError};
use stash_core::proto;
use stash_core::reference::{check_address, Reference};
use stash_core::rpc;
use stash_core::{crypto, Stash};

/// Dispatch one request frame. Returns the response status byte and
/// payload.
pub async fn dispatch(method: u8, payload: &[u8], stash: &Stash) -> (u8, Vec<u8>) {
    debug!(
        method = rpc::method_name(method),
        request_len = payload.len(),
        "dispatching request"
    );

    let result = match method {
        rpc::METHOD_CLEARTEXT_PUT => handle_put(payload, stash).await,
        rpc::METHOD_CLEARTEXT_GET => handle_get(payload, stash).await,
        rpc::METHOD_ENCRYPTION_ENCRYPT => handle_encrypt(payload, stash),
        rpc::METHOD_ENCRYPTION_DECRYPT => handle_decrypt(payload),
        rpc::METHOD_STORAGE_PUSH => handle_push(payload, stash).await,
        rpc::METHOD_STORAGE_PULL => handle_pull(payload, stash).await,
        rpc::METHOD_STORAGE_STAT => handle_stat(payload, stash).await,
        _ => Err(StashError::InvalidArgument(format!(
            "unknown method: 0x{method:02x}"
        ))),
    };

    match result {
        Ok(response) => (rpc::STATUS_OK, response),
        Err(err) => (rpc::STATUS_ERROR, proto::error_to_wire(&err).encode_to_vec()),
    }
}

/// Cleartext Put: encrypt, store, return the reference.
async fn handle_put(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Plaintext>(payload)?;
    let reference = stash.put(&request.data, &request.salt).await?;
    Ok(proto::Reference::from(reference).encode_to_vec())
}

/// Cleartext Get: fetch by address, decrypt with the reference's key.
async fn handle_get(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Reference>(payload)?;
    let reference: Reference = request.into();
    reference.check_addressable()?;

    let data = stash.get(&reference).await?;
    Ok(proto::Plaintext {
        data,
        salt: Vec::new(),
    }
    .encode_to_vec())
}

/// Encryption Encrypt: a stateless oracle. Computes the reference and
/// ciphertext without writing anything.
fn handle_encrypt(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Plaintext>(payload)?;
    let blob = crypto::encrypt(&request.data, &request.salt);
    let address = stash.store().address(&blob.encrypted_data);
    let reference = Reference::new(address, blob.secret_key.to_vec(), request.salt);

    Ok(proto::ReferenceAndCiphertext {
        reference: Some(proto::Reference::from(reference)),
        ciphertext: Some(proto::Ciphertext {
            encrypted_data: blob.encrypted_data,
        }),
    }
    .encode_to_vec())
}

/// Encryption Decrypt: uses only the reference's secret key and salt;
/// the address may be absent and is ignored.
fn handle_decrypt(payload: &[u8]) -> Result<Vec<u8>> {
    let request = decode::<proto::ReferenceAndCiphertext>(payload)?;
    let reference = request
        .reference
        .ok_or_else(|| StashError::InvalidArgument("decrypt request missing reference".into()))?;
    let ciphertext = request
        .ciphertext
        .ok_or_else(|| StashError::InvalidArgument("decrypt request missing ciphertext".into()))?;

    if reference.secret_key.is_empty() {
        return Err(StashError::InvalidArgument(
            "decrypt request missing secret_key".into(),
        ));
    }

    let data = crypto::decrypt(
        &reference.secret_key,
        &ciphertext.encrypted_data,
        &reference.salt,
    )?;
    Ok(proto::Plaintext {
        data,
        salt: Vec::new(),
    }
    .encode_to_vec())
}

/// Storage Push: write opaque bytes at their own address. The address
/// is computed server-side and is the authority.
async fn handle_push(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Ciphertext>(payload)?;
    let address = stash.store().put(&request.encrypted_data).await?;
    Ok(proto::Address { address }.encode_to_vec())
}

/// Storage Pull: read the blob at an address.
async fn handle_pull(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Address>(payload)?;
    check_address(&request.address)?;

    let encrypted_data = stash.store().get(&request.address).await?;
    Ok(proto::Ciphertext { encrypted_data }.encode_to_vec())
}

/// Storage Stat: existence and size; absence is an answer, not an
/// error.
async fn handle_stat(payload: &[u8], stash: &Stash) -> Result<Vec<u8>> {
    let request = decode::<proto::Address>(payload)?;
    check_address(&request.address)?;

    let stat = stash.store().stat(&request.address).await?;
    Ok(proto::StatInfo::from(stat).encode_to_vec())
}

fn decode<M: Message + Default>(payload: &[u8]) -> Result<M> {
    M::decode(payload).map_err(|e| StashError::InvalidArgument(format!("undecodable request: {e}")))
}
