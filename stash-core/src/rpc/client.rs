//! Client side of the RPC channel.
//!
//! One connection, sequential request/response frames. Each RPC
//! method encodes its request body, writes a frame, reads the
//! response frame, and maps an error status back into a
//! [`StashError`] with its original kind.

use prost::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, UnixStream};
use tracing::debug;

use crate::error::{Result, StashError};
use crate::proto;
use crate::reference::Reference;
use crate::rpc::{self, frame};
use crate::storage::StatInfo;

enum ClientStream {
    Tcp(TcpStream),
    Unix(UnixStream),
}

/// A connection to a stash daemon, speaking all three services.
pub struct StashClient {
    stream: ClientStream,
}

impl StashClient {
    /// Connect to a daemon at a `tcp://host:port` or `unix://path`
    /// URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let (scheme, address) = rpc::split_listen_url(url)?;
        let stream = match scheme {
            "tcp" => {
                let stream = TcpStream::connect(address)
                    .await
                    .map_err(|e| StashError::Io(format!("connect to {url} failed: {e}")))?;
                ClientStream::Tcp(stream)
            }
            _ => {
                let stream = UnixStream::connect(address)
                    .await
                    .map_err(|e| StashError::Io(format!("connect to {url} failed: {e}")))?;
                ClientStream::Unix(stream)
            }
        };
        debug!(%url, "connected to stash daemon");
        Ok(Self { stream })
    }

    /// Cleartext service: encrypt and store, returning the reference.
    pub async fn put(&mut self, data: Vec<u8>, salt: Vec<u8>) -> Result<Reference> {
        let body = proto::Plaintext { data, salt }.encode_to_vec();
        let payload = self.call(rpc::METHOD_CLEARTEXT_PUT, &body).await?;
        let reference = decode::<proto::Reference>(&payload)?;
        Ok(reference.into())
    }

    /// Cleartext service: fetch and decrypt by reference.
    pub async fn get(&mut self, reference: &Reference) -> Result<Vec<u8>> {
        let body = proto::Reference::from(reference.clone()).encode_to_vec();
        let payload = self.call(rpc::METHOD_CLEARTEXT_GET, &body).await?;
        let plaintext = decode::<proto::Plaintext>(&payload)?;
        Ok(plaintext.data)
    }

    /// Encryption service: encrypt without storing. Returns the
    /// reference and the ciphertext for the caller to place.
    pub async fn encrypt(&mut self, data: Vec<u8>, salt: Vec<u8>) -> Result<(Reference, Vec<u8>)> {
        let body = proto::Plaintext { data, salt }.encode_to_vec();
        let payload = self.call(rpc::METHOD_ENCRYPTION_ENCRYPT, &body).await?;
        let response = decode::<proto::ReferenceAndCiphertext>(&payload)?;

        let reference = response
            .reference
            .ok_or_else(|| StashError::Internal("encrypt response missing reference".into()))?;
        let ciphertext = response
            .ciphertext
            .ok_or_else(|| StashError::Internal("encrypt response missing ciphertext".into()))?;
        Ok((reference.into(), ciphertext.encrypted_data))
    }

    /// Encryption service: decrypt ciphertext the caller already
    /// holds. Only the secret key and salt of the reference are used.
    pub async fn decrypt(
        &mut self,
        secret_key: Vec<u8>,
        salt: Vec<u8>,
        encrypted_data: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let body = proto::ReferenceAndCiphertext {
            reference: Some(proto::Reference {
                address: Vec::new(),
                secret_key,
                salt,
            }),
            ciphertext: Some(proto::Ciphertext { encrypted_data }),
        }
        .encode_to_vec();
        let payload = self.call(rpc::METHOD_ENCRYPTION_DECRYPT, &body).await?;
        let plaintext = decode::<proto::Plaintext>(&payload)?;
        Ok(plaintext.data)
    }

    /// Storage service: push opaque bytes, get their address back.
    pub async fn push(&mut self, encrypted_data: Vec<u8>) -> Result<Vec<u8>> {
        let body = proto::Ciphertext { encrypted_data }.encode_to_vec();
        let payload = self.call(rpc::METHOD_STORAGE_PUSH, &body).await?;
        let address = decode::<proto::Address>(&payload)?;
        Ok(address.address)
    }

    /// Storage service: pull the blob at an address.
    pub async fn pull(&mut self, address: Vec<u8>) -> Result<Vec<u8>> {
        let body = proto::Address { address }.encode_to_vec();
        let payload = self.call(rpc::METHOD_STORAGE_PULL, &body).await?;
        let ciphertext = decode::<proto::Ciphertext>(&payload)?;
        Ok(ciphertext.encrypted_data)
    }

    /// Storage service: existence and size at an address.
    pub async fn stat(&mut self, address: Vec<u8>) -> Result<StatInfo> {
        let body = proto::Address { address }.encode_to_vec();
        let payload = self.call(rpc::METHOD_STORAGE_STAT, &body).await?;
        let stat = decode::<proto::StatInfo>(&payload)?;
        Ok(stat.into())
    }

    async fn call(&mut self, method: u8, body: &[u8]) -> Result<Vec<u8>> {
        debug!(
            method = rpc::method_name(method),
            request_len = body.len(),
            "rpc call"
        );
        match &mut self.stream {
            ClientStream::Tcp(stream) => call_on(stream, method, body).await,
            ClientStream::Unix(stream) => call_on(stream, method, body).await,
        }
    }
}

async fn call_on<S>(stream: &mut S, method: u8, body: &[u8]) -> Result<Vec<u8>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    frame::write_frame(stream, method, body).await?;

    match frame::read_frame(stream).await? {
        None => Err(StashError::Io(
            "server closed the connection mid-call".to_string(),
        )),
        Some((rpc::STATUS_OK, payload)) => Ok(payload),
        Some((rpc::STATUS_ERROR, payload)) => Err(proto::decode_error(&payload)),
        Some((status, _)) => Err(StashError::Internal(format!(
            "unexpected response status 0x{status:02x}"
        ))),
    }
}

fn decode<M: Message + Default>(payload: &[u8]) -> Result<M> {
    M::decode(payload).map_err(|e| StashError::Internal(format!("undecodable response: {e}")))
}
