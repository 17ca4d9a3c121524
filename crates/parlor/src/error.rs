//! Unified error type for the Parlor server.

use parlor_protocol::ProtocolError;
use parlor_room::RoomError;
use parlor_session::{AuthError, RegistryError};
use parlor_store::StoreError;
use parlor_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An identity verification failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A connection registry error.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A room-level error (full, not found, unsupported game).
    #[error(transparent)]
    Room(#[from] RoomError),

    /// A persistence error surfaced outside a room actor (startup
    /// restoration; room actors absorb save failures themselves).
    #[error(transparent)]
    Store(#[from] StoreError),
}
