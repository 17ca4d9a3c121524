//! Room lifecycle management for Parlor.
//!
//! Each room runs as an isolated Tokio task (actor model) that owns the
//! seat list and the authoritative game state. Everything that mutates a
//! room flows through its command channel, so actions within one room
//! are processed strictly one at a time.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — creates/destroys rooms, matchmaking, routing
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`RoomInfo`] — metadata snapshot used by matchmaking
//! - [`RoomError`] — what can go wrong at this layer

mod error;
mod registry;
mod room;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use room::{JoinReply, PlayerSender, RoomConfig, RoomHandle, RoomInfo, Seat};
