/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Sending a frame failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Reading a frame failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or accepting a TCP connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// A TCP connection arrived but never completed the WebSocket upgrade.
    /// Only that peer is affected; the listener keeps running.
    #[error("handshake failed: {0}")]
    HandshakeFailed(#[source] std::io::Error),
}

impl TransportError {
    /// Returns `true` if the error concerns a single peer rather than the
    /// listener itself, so accepting can carry on right away.
    pub fn is_per_connection(&self) -> bool {
        match self {
            Self::HandshakeFailed(_) => true,
            Self::AcceptFailed(e) => matches!(
                e.kind(),
                std::io::ErrorKind::ConnectionAborted | std::io::ErrorKind::ConnectionReset
            ),
            Self::SendFailed(_) | Self::ReceiveFailed(_) => false,
        }
    }
}
