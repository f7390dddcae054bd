//! Transport layer for the UNO room server.
//!
//! A client talks to the server over one long-lived connection carrying
//! JSON documents as text frames. This crate owns that connection: the
//! server loop asks a [`Transport`] for the next [`PendingConnection`],
//! hands it to a task that completes the upgrade into a [`Connection`],
//! then exchanges whole frames with it and never sees sockets.
//!
//! # Feature Flags
//!
//! - `websocket` (default): WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{PendingWebSocket, WebSocketConnection, WebSocketTransport};

use std::net::SocketAddr;

/// A listener that hands out newly connected clients.
pub trait Transport: Send + Sync + 'static {
    type Pending: PendingConnection<Connection = Self::Connection, Error = Self::Error>;
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next client to connect.
    ///
    /// Returns as soon as the socket is open and never reads from it, so a
    /// client that stalls before upgrading cannot hold up the next one.
    async fn accept(&mut self) -> Result<Self::Pending, Self::Error>;

    /// The bound address, including the port picked when binding to `:0`.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;
}

/// A connected client that has not finished the protocol upgrade.
///
/// `upgrade` waits on the client and should run off the accept loop,
/// under a timeout.
pub trait PendingConnection: Send + 'static {
    type Connection: Connection;
    type Error: std::error::Error + Send + Sync;

    fn peer_addr(&self) -> SocketAddr;

    /// Completes the upgrade. A failure concerns this client only.
    async fn upgrade(self) -> Result<Self::Connection, Self::Error>;
}

/// One client connection exchanging text frames.
///
/// Every method takes `&self`. The handler parks one task in `recv` while a
/// separate writer task calls `send`, so implementations must allow both
/// at once.
pub trait Connection: Send + Sync + 'static {
    type Error: std::error::Error + Send + Sync;

    /// Sends one text frame.
    async fn send(&self, text: &str) -> Result<(), Self::Error>;

    /// Waits for the next text frame. `Ok(None)` means the client hung up.
    async fn recv(&self) -> Result<Option<String>, Self::Error>;

    /// Starts a clean close from the server side.
    async fn close(&self) -> Result<(), Self::Error>;

    /// Where the client connected from. Used to tag log lines.
    fn peer_addr(&self) -> SocketAddr;
}
