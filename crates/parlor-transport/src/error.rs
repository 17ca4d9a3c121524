/// Errors produced by the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The peer is gone; no further frames can move on this connection.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// A frame could not be written to a live connection.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// A frame could not be read from a live connection.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// Binding the listener or accepting a handshake failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),
}
