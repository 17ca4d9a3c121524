//! Room persistence for Parlor.
//!
//! Rooms are the unit of persistence: after every accepted mutation the
//! room actor writes its current [`RoomDocument`] through a [`RoomStore`].
//! The store is an adapter trait so the backing database is swappable;
//! [`MemoryStore`] is the in-process implementation used in development
//! and tests.
//!
//! Persistence is write-through but never availability-critical: a room
//! keeps playing from its in-memory state when a save fails, and
//! [`save_with_retry`] retries transient failures with backoff.

#![allow(async_fn_in_trait)]

mod document;
mod error;
mod memory;
mod retry;

pub use document::{now_epoch_secs, RoomDocument, SeatRecord};
pub use error::StoreError;
pub use memory::MemoryStore;
pub use retry::save_with_retry;

use parlor_protocol::RoomId;

/// Storage adapter for room documents.
///
/// All methods take `&self`: implementations handle their own interior
/// synchronization so one store can be shared across room actors.
pub trait RoomStore: Send + Sync + 'static {
    /// Writes (or overwrites) a room document.
    fn save(
        &self,
        doc: &RoomDocument,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Reads one room document, `Ok(None)` if absent.
    fn load(
        &self,
        room_id: RoomId,
    ) -> impl std::future::Future<Output = Result<Option<RoomDocument>, StoreError>> + Send;

    /// Deletes a room document. Deleting an absent room is not an error.
    fn delete(
        &self,
        room_id: RoomId,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Reads every stored room document, for startup restoration.
    fn load_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<RoomDocument>, StoreError>> + Send;
}
