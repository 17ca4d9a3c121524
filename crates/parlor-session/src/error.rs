//! Error types for the session layer.

use parlor_transport::ConnectionId;

/// Errors produced by an [`IdentityVerifier`](crate::IdentityVerifier).
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The token is malformed, expired, or rejected by the provider.
    #[error("authentication failed: {0}")]
    InvalidToken(String),

    /// The identity provider could not be reached. The client may retry.
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Errors produced by the [`ConnectionRegistry`](crate::ConnectionRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The connection was never registered (or already removed).
    #[error("unknown connection {0}")]
    NotRegistered(ConnectionId),

    /// The connection is registered but has not authenticated yet.
    #[error("connection {0} is not authenticated")]
    NotAuthenticated(ConnectionId),

    /// A second `authenticate` was sent on an already-verified connection.
    #[error("connection {0} is already authenticated")]
    AlreadyAuthenticated(ConnectionId),
}
