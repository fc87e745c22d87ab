//! End-to-end test of the RPC channel: a real tcp listener, a real
//! client connection, all three services on one socket.

use std::sync::Arc;

use tokio::sync::watch;

use stash_core::rpc::StashClient;
use stash_core::storage::MemoryStore;
use stash_core::{Stash, StashError};
use stash_server::server::Server;

struct TestServer {
    url: String,
    shutdown_tx: watch::Sender<bool>,
}

impl TestServer {
    async fn start() -> Self {
        let stash = Arc::new(Stash::new(Arc::new(MemoryStore::new())));
        let server = Server::bind("tcp://127.0.0.1:0", stash).await.unwrap();
        let addr = server.local_addr().unwrap();
        let url = format!("tcp://{addr}");

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        tokio::spawn(server.run(shutdown_rx));

        Self { url, shutdown_tx }
    }

    async fn client(&self) -> StashClient {
        StashClient::connect(&self.url).await.unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

#[tokio::test]
async fn test_put_get_roundtrip_over_the_wire() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let reference = client
        .put(b"hello world".to_vec(), Vec::new())
        .await
        .unwrap();
    assert_eq!(reference.address.len(), 32);
    assert_eq!(reference.secret_key.len(), 32);

    let data = client.get(&reference).await.unwrap();
    assert_eq!(data, b"hello world");
}

#[tokio::test]
async fn test_put_is_deterministic_across_connections() {
    let server = TestServer::start().await;

    let mut first_client = server.client().await;
    let first = first_client
        .put(b"hello world".to_vec(), b"pepper".to_vec())
        .await
        .unwrap();

    let mut second_client = server.client().await;
    let second = second_client
        .put(b"hello world".to_vec(), b"pepper".to_vec())
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_encrypt_push_pull_decrypt_across_services() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    // Encrypt is an oracle: nothing is stored yet.
    let (reference, ciphertext) = client
        .encrypt(b"x".to_vec(), b"pepper".to_vec())
        .await
        .unwrap();
    let stat = client.stat(reference.address.clone()).await.unwrap();
    assert!(!stat.exists);

    // Push the ciphertext; the server computes the same address.
    let address = client.push(ciphertext.clone()).await.unwrap();
    assert_eq!(address, reference.address);

    // Pull it back and decrypt with only the key and salt.
    let pulled = client.pull(address).await.unwrap();
    assert_eq!(pulled, ciphertext);

    let data = client
        .decrypt(reference.secret_key, reference.salt, pulled)
        .await
        .unwrap();
    assert_eq!(data, b"x");
}

#[tokio::test]
async fn test_stat_reports_ciphertext_size() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let reference = client
        .put(b"hello world".to_vec(), Vec::new())
        .await
        .unwrap();
    let stat = client.stat(reference.address).await.unwrap();
    assert!(stat.exists);
    assert_eq!(stat.size, b"hello world".len() as u64);
}

#[tokio::test]
async fn test_unknown_address_errors_keep_their_kind() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let result = client.pull(vec![0x42; 32]).await;
    assert!(matches!(result, Err(StashError::NotFound(_))));

    let stat = client.stat(vec![0x42; 32]).await.unwrap();
    assert!(!stat.exists);

    let result = client.pull(vec![0x42; 5]).await;
    assert!(matches!(result, Err(StashError::InvalidArgument(_))));
}

#[tokio::test]
async fn test_sequential_requests_on_one_connection() {
    let server = TestServer::start().await;
    let mut client = server.client().await;

    let mut references = Vec::new();
    for i in 0..10u8 {
        let reference = client.put(vec![i; 64], Vec::new()).await.unwrap();
        references.push(reference);
    }
    for (i, reference) in references.iter().enumerate() {
        let data = client.get(reference).await.unwrap();
        assert_eq!(data, vec![i as u8; 64]);
    }
}

#[tokio::test]
async fn test_concurrent_connections() {
    let server = TestServer::start().await;

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let mut client = server.client().await;
        handles.push(tokio::spawn(async move {
            let reference = client.put(vec![i; 128], Vec::new()).await.unwrap();
            client.get(&reference).await.unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap(), vec![i as u8; 128]);
    }
}

#[tokio::test]
async fn test_unix_socket_listener() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("stash.sock");
    let url = format!("unix://{}", socket.display());

    let stash = Arc::new(Stash::new(Arc::new(MemoryStore::new())));
    let server = Server::bind(&url, stash).await.unwrap();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(server.run(shutdown_rx));

    let mut client = StashClient::connect(&url).await.unwrap();
    let reference = client.put(b"over unix".to_vec(), Vec::new()).await.unwrap();
    assert_eq!(client.get(&reference).await.unwrap(), b"over unix");
    drop(client);

    // Shutdown removes the socket file.
    shutdown_tx.send(true).unwrap();
    handle.await.unwrap();
    assert!(!socket.exists());
}
