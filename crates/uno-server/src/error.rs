//! Unified error type for the server.

use uno_protocol::ProtocolError;
use uno_room::RoomError;
use uno_transport::TransportError;

/// Top-level error that wraps the errors of every layer below the server.
///
/// The `#[from]` attribute on each variant generates the `From` impls, so
/// `?` converts layer errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (not found, rejected, actor gone).
    #[error(transparent)]
    Room(#[from] RoomError),
}
