//! Network transport layer for Parlor.
//!
//! The server core speaks byte frames through the [`Transport`] and
//! [`Connection`] traits; how those frames travel (WebSocket today) is
//! this crate's business and nobody else's. Connections are identified
//! by a [`ConnectionId`] that is unique within one transport instance.
//!
//! # Feature Flags
//!
//! - `websocket` (default) — WebSocket transport via `tokio-tungstenite`

#![allow(async_fn_in_trait)]

mod error;
#[cfg(feature = "websocket")]
mod websocket;

pub use error::TransportError;
#[cfg(feature = "websocket")]
pub use websocket::{WebSocketConnection, WebSocketTransport};

use std::fmt;

/// Listens for and hands out new connections.
pub trait Transport: Send + Sync + 'static {
    /// The connection type this transport produces.
    type Connection: Connection;
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next incoming connection.
    async fn accept(&mut self) -> Result<Self::Connection, Self::Error>;

    /// Stops accepting new connections; existing ones are unaffected.
    async fn shutdown(&self) -> Result<(), Self::Error>;
}

/// One bidirectional stream of byte frames.
///
/// Implementations must let sends and receives proceed independently: a
/// task parked in [`recv`](Connection::recv) may not hold up another
/// task sending on the same connection, because room broadcasts arrive
/// from outside the connection's own read loop.
pub trait Connection: Send + Sync + 'static {
    /// The error type for connection operations.
    type Error: std::error::Error + Send + Sync;

    /// Sends one frame to the peer.
    async fn send(&self, data: &[u8]) -> Result<(), Self::Error>;

    /// Receives the next frame; `Ok(None)` means the peer closed cleanly.
    async fn recv(&self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Closes the connection. Closing twice is a no-op.
    async fn close(&self) -> Result<(), Self::Error>;

    /// This connection's identifier within its transport.
    fn id(&self) -> ConnectionId;
}

/// Identifies one connection within a transport. Allocated by the
/// transport at accept time; treat it as opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_id_round_trips_its_raw_value() {
        assert_eq!(ConnectionId::new(42).into_inner(), 42);
    }

    #[test]
    fn test_connection_id_display_is_log_friendly() {
        assert_eq!(ConnectionId::new(7).to_string(), "conn-7");
    }

    #[test]
    fn test_connection_id_hash_works_as_map_key() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(ConnectionId::new(1), "alice");
        map.insert(ConnectionId::new(2), "bob");
        assert_eq!(map[&ConnectionId::new(1)], "alice");
    }
}
