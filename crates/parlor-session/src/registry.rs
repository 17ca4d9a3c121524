//! The connection registry: tracks every live connection.
//!
//! # Concurrency note
//!
//! `ConnectionRegistry` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. This is intentional: the server wraps it in a single mutex
//! and every access is a short synchronous operation. Keeping it simple
//! here avoids hidden locking overhead.

use std::collections::HashMap;

use parlor_protocol::{RoomId, UserId};
use parlor_transport::ConnectionId;

use crate::{Identity, RegistryError};

/// What the registry knows about one connection.
#[derive(Debug, Clone)]
pub struct ConnectionEntry {
    /// Set once the connection's first message authenticates.
    pub identity: Option<Identity>,
    /// The room this connection is currently seated in, if any.
    pub room: Option<RoomId>,
}

/// Tracks every live connection: registered at accept, authenticated on
/// the first message, attached to at most one room, removed at close.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<ConnectionId, ConnectionEntry>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a freshly accepted, not yet authenticated connection.
    pub fn register(&mut self, conn: ConnectionId) {
        self.connections.insert(
            conn,
            ConnectionEntry {
                identity: None,
                room: None,
            },
        );
        tracing::debug!(%conn, "connection registered");
    }

    /// Records a verified identity on a registered connection.
    ///
    /// # Errors
    /// - [`RegistryError::NotRegistered`] — unknown connection
    /// - [`RegistryError::AlreadyAuthenticated`] — a second authenticate
    pub fn authenticate(
        &mut self,
        conn: ConnectionId,
        identity: Identity,
    ) -> Result<(), RegistryError> {
        let entry = self
            .connections
            .get_mut(&conn)
            .ok_or(RegistryError::NotRegistered(conn))?;
        if entry.identity.is_some() {
            return Err(RegistryError::AlreadyAuthenticated(conn));
        }
        tracing::info!(%conn, user_id = %identity.user_id, "connection authenticated");
        entry.identity = Some(identity);
        Ok(())
    }

    /// The verified identity on a connection, if it has one.
    pub fn identity(&self, conn: ConnectionId) -> Option<&Identity> {
        self.connections.get(&conn)?.identity.as_ref()
    }

    /// The room a connection is seated in, if any.
    pub fn room(&self, conn: ConnectionId) -> Option<RoomId> {
        self.connections.get(&conn)?.room
    }

    /// Marks a connection as seated in `room`.
    ///
    /// # Errors
    /// Requires a registered, authenticated connection.
    pub fn attach_room(&mut self, conn: ConnectionId, room: RoomId) -> Result<(), RegistryError> {
        let entry = self
            .connections
            .get_mut(&conn)
            .ok_or(RegistryError::NotRegistered(conn))?;
        if entry.identity.is_none() {
            return Err(RegistryError::NotAuthenticated(conn));
        }
        entry.room = Some(room);
        Ok(())
    }

    /// Clears a connection's room association, e.g. after `leave_game`.
    pub fn detach_room(&mut self, conn: ConnectionId) {
        if let Some(entry) = self.connections.get_mut(&conn) {
            entry.room = None;
        }
    }

    /// Removes a closed connection and returns what was known about it,
    /// so the caller can notify the room the user was seated in.
    pub fn remove(&mut self, conn: ConnectionId) -> Option<ConnectionEntry> {
        let entry = self.connections.remove(&conn);
        if entry.is_some() {
            tracing::debug!(%conn, "connection removed");
        }
        entry
    }

    /// Whether `user_id` has another live connection attached to `room`,
    /// besides `except`. Used to tell a transient socket drop (the user
    /// reconnected already) from a real departure.
    pub fn has_other_connection(
        &self,
        user_id: &UserId,
        room: RoomId,
        except: ConnectionId,
    ) -> bool {
        self.connections.iter().any(|(id, entry)| {
            *id != except
                && entry.room == Some(room)
                && entry
                    .identity
                    .as_ref()
                    .is_some_and(|i| &i.user_id == user_id)
        })
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}
