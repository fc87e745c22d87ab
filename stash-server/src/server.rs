//! The RPC host: binds the listen URL, accepts connections, and runs
//! the frame loop for each one.
//!
//! A connection processes its requests in order; parallelism is
//! per-connection (each gets its own task). Shutdown is a watch
//! channel: the accept loop stops, and an in-flight store operation
//! is abandoned with a `Cancelled` error. Partial backend writes are
//! harmless under content addressing.

use std::path::PathBuf;
use std::sync::Arc;

use prost::Message;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream, UnixListener, UnixStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use stash_core::error::{Result, StashError};
use stash_core::proto;
use stash_core::rpc::{self, frame};
use stash_core::Stash;

use crate::service;

enum Listener {
    Tcp(TcpListener),
    Unix(UnixListener),
}

enum Conn {
    Tcp(TcpStream),
    Unix(UnixStream),
}

/// A bound but not yet running server.
pub struct Server {
    listener: Listener,
    stash: Arc<Stash>,
    /// Socket file to remove on shutdown, for unix listeners.
    unix_path: Option<PathBuf>,
}

impl Server {
    /// Bind the listen URL (`tcp://host:port` or `unix://path`).
    pub async fn bind(url: &str, stash: Arc<Stash>) -> Result<Self> {
        let (scheme, address) = rpc::split_listen_url(url)?;
        match scheme {
            "tcp" => {
                let listener = TcpListener::bind(address)
                    .await
                    .map_err(|e| StashError::Io(format!("bind {url} failed: {e}")))?;
                Ok(Self {
                    listener: Listener::Tcp(listener),
                    stash,
                    unix_path: None,
                })
            }
            _ => {
                let listener = UnixListener::bind(address)
                    .map_err(|e| StashError::Io(format!("bind {url} failed: {e}")))?;
                Ok(Self {
                    listener: Listener::Unix(listener),
                    stash,
                    unix_path: Some(PathBuf::from(address)),
                })
            }
        }
    }

    /// The bound tcp address, for callers that bound port 0.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        match &self.listener {
            Listener::Tcp(listener) => listener.local_addr().ok(),
            Listener::Unix(_) => None,
        }
    }

    /// Accept connections until the shutdown signal fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        info!("stash server accepting connections");

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    info!("shutdown signal received, stopping accept loop");
                    break;
                }
                accepted = accept(&self.listener) => {
                    match accepted {
                        Ok((conn, peer)) => {
                            let stash = self.stash.clone();
                            let shutdown = shutdown.clone();
                            tokio::spawn(async move {
                                debug!(%peer, "connection established");
                                match conn {
                                    Conn::Tcp(stream) => {
                                        handle_connection(stream, peer, stash, shutdown).await
                                    }
                                    Conn::Unix(stream) => {
                                        handle_connection(stream, peer, stash, shutdown).await
                                    }
                                }
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "failed to accept connection");
                        }
                    }
                }
            }
        }

        if let Some(path) = &self.unix_path {
            if let Err(e) = tokio::fs::remove_file(path).await {
                warn!(path = %path.display(), error = %e, "failed to remove unix socket");
            }
        }
    }
}

async fn accept(listener: &Listener) -> std::io::Result<(Conn, String)> {
    match listener {
        Listener::Tcp(listener) => {
            let (stream, addr) = listener.accept().await?;
            Ok((Conn::Tcp(stream), addr.to_string()))
        }
        Listener::Unix(listener) => {
            let (stream, addr) = listener.accept().await?;
            Ok((Conn::Unix(stream), format!("{addr:?}")))
        }
    }
}

/// Process request frames on one connection until the peer closes or
/// shutdown fires.
async fn handle_connection<S>(
    mut stream: S,
    peer: String,
    stash: Arc<Stash>,
    mut shutdown: watch::Receiver<bool>,
) where
    S: AsyncRead + AsyncWrite + Unpin,
{
    loop {
        let request = tokio::select! {
            _ = shutdown.changed() => break,
            request = frame::read_frame(&mut stream) => request,
        };

        let (method, payload) = match request {
            Ok(Some(request)) => request,
            Ok(None) => {
                debug!(%peer, "connection closed by peer");
                break;
            }
            Err(e) => {
                warn!(%peer, error = %e, "failed to read request frame");
                break;
            }
        };

        // Store I/O is abandoned if shutdown fires mid-request; the
        // peer gets a Cancelled error before the connection drops.
        let (status, response) = tokio::select! {
            _ = shutdown.changed() => {
                let err = StashError::Cancelled("server shutting down".to_string());
                (rpc::STATUS_ERROR, proto::error_to_wire(&err).encode_to_vec())
            }
            response = service::dispatch(method, &payload, &stash) => response,
        };

        if let Err(e) = frame::write_frame(&mut stream, status, &response).await {
            warn!(%peer, error = %e, "failed to write response frame");
            break;
        }
    }
}
