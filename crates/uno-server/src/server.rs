//! `UnoServer` builder and accept loop.
//!
//! This is the entry point for running the room server. It ties the layers
//! together: transport → protocol → room actors.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use uno_protocol::JsonCodec;
use uno_room::{RoomConfig, RoomManager};
use uno_transport::{PendingConnection, Transport, TransportError, WebSocketTransport};

use crate::ServerError;
use crate::handler::handle_connection;
use crate::policy::{RejectionPolicy, SilentRejections};

/// How long a new client gets to complete the WebSocket upgrade.
pub const DEFAULT_HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause after a listener-level accept failure (out of file descriptors,
/// for example) before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The room
/// registry does its own locking.
pub(crate) struct ServerState {
    pub(crate) rooms: RoomManager,
    pub(crate) codec: JsonCodec,
    pub(crate) policy: Box<dyn RejectionPolicy>,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) handshake_timeout: Duration,
}

/// Builder for configuring and starting a server.
///
/// # Example
///
/// ```rust,ignore
/// use uno_server::prelude::*;
///
/// let server = UnoServer::builder()
///     .bind("0.0.0.0:3001")
///     .rejection_policy(ReportRejections)
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct UnoServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    idle_timeout: Option<Duration>,
    handshake_timeout: Duration,
    policy: Box<dyn RejectionPolicy>,
}

impl UnoServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".to_string(),
            room_config: RoomConfig::default(),
            idle_timeout: None,
            handshake_timeout: DEFAULT_HANDSHAKE_TIMEOUT,
            policy: Box::new(SilentRejections),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every new room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Closes connections that send nothing for `timeout`. Off by default:
    /// a player waiting in a lobby may stay quiet for a long time.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    /// Drops clients that have not completed the WebSocket upgrade within
    /// `timeout`.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Chooses how rejected in-room actions are answered.
    pub fn rejection_policy(mut self, policy: impl RejectionPolicy) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Binds the listener and returns a server ready to [`run`](UnoServer::run).
    pub async fn build(self) -> Result<UnoServer, ServerError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let state = Arc::new(ServerState {
            rooms: RoomManager::new(self.room_config),
            codec: JsonCodec,
            policy: self.policy,
            idle_timeout: self.idle_timeout,
            handshake_timeout: self.handshake_timeout,
        });

        Ok(UnoServer { transport, state })
    }
}

impl Default for UnoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound UNO room server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct UnoServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
}

impl UnoServer {
    /// Creates a new builder.
    pub fn builder() -> UnoServerBuilder {
        UnoServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the accept loop.
    ///
    /// Each new client is handed to its own task, which completes the
    /// WebSocket upgrade under the handshake timeout and then runs the
    /// connection handler. The loop itself never waits on a client, and
    /// runs until the task is dropped.
    pub async fn run(mut self) -> Result<(), ServerError> {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "UNO server running");

        loop {
            match self.transport.accept().await {
                Ok(pending) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        let peer = pending.peer_addr();
                        let conn = match tokio::time::timeout(
                            state.handshake_timeout,
                            pending.upgrade(),
                        )
                        .await
                        {
                            Ok(Ok(conn)) => conn,
                            Ok(Err(e)) => {
                                tracing::debug!(%peer, error = %e, "WebSocket upgrade failed");
                                return;
                            }
                            Err(_) => {
                                tracing::debug!(%peer, "WebSocket upgrade timed out");
                                return;
                            }
                        };
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => match accept_backoff(&e) {
                    None => tracing::debug!(error = %e, "client dropped during accept"),
                    Some(delay) => {
                        tracing::error!(error = %e, ?delay, "accept failed");
                        tokio::time::sleep(delay).await;
                    }
                },
            }
        }
    }
}

/// How long to wait before accepting again after `error`. Failures that
/// concern one client only are retried at once.
fn accept_backoff(error: &TransportError) -> Option<Duration> {
    if error.is_per_connection() {
        None
    } else {
        Some(ACCEPT_BACKOFF)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accept_backoff_for_listener_errors() {
        let exhausted = TransportError::AcceptFailed(std::io::Error::other("too many open files"));
        assert_eq!(accept_backoff(&exhausted), Some(ACCEPT_BACKOFF));
    }

    #[test]
    fn test_accept_backoff_skipped_for_single_client_errors() {
        let aborted = std::io::Error::from(std::io::ErrorKind::ConnectionAborted);
        assert_eq!(accept_backoff(&TransportError::AcceptFailed(aborted)), None);
    }

    #[test]
    fn test_builder_defaults() {
        let builder = UnoServerBuilder::new();
        assert_eq!(builder.handshake_timeout, DEFAULT_HANDSHAKE_TIMEOUT);
        assert_eq!(builder.idle_timeout, None);
    }
}
