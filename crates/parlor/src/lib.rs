//! # Parlor
//!
//! Authoritative multiplayer session server for turn-based parlor games.
//!
//! Parlor owns the full game state on the server. Clients send intents
//! (`play_card`, `draw_card`, ...), the room validates them against the
//! game's ruleset, and every accepted action is broadcast back as a
//! complete successor state. The host application plugs in an
//! [`IdentityVerifier`](parlor_session::IdentityVerifier) for auth and a
//! [`RoomStore`](parlor_store::RoomStore) for persistence.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parlor::prelude::*;
//!
//! struct DevVerifier;
//!
//! impl IdentityVerifier for DevVerifier {
//!     async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
//!         let (uid, name) = token
//!             .split_once(':')
//!             .ok_or_else(|| AuthError::InvalidToken("expected uid:name".into()))?;
//!         Ok(Identity::new(uid, name))
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), ParlorError> {
//!     let server = ParlorServerBuilder::new()
//!         .bind("127.0.0.1:8080")
//!         .build(DevVerifier, Arc::new(MemoryStore::new()))
//!         .await?;
//!     server.run().await
//! }
//! ```

mod error;
mod handler;
mod server;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

/// The types most host applications need, in one import.
pub mod prelude {
    pub use crate::{ParlorError, ParlorServer, ParlorServerBuilder};

    pub use parlor_protocol::{ClientMessage, RoomId, RoomStatus, ServerMessage, UserId};
    pub use parlor_room::RoomConfig;
    pub use parlor_rules::{Action, CardColor, GameState, GameType, TurnPhase};
    pub use parlor_session::{AuthError, Identity, IdentityVerifier};
    pub use parlor_store::{MemoryStore, RoomStore};
}
