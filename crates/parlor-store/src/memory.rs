//! In-process room store, used in development and tests.

use std::collections::HashMap;

use tokio::sync::RwLock;

use parlor_protocol::RoomId;

use crate::{RoomDocument, RoomStore, StoreError};

/// A [`RoomStore`] backed by a `HashMap` behind an async `RwLock`.
/// Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    rooms: RwLock<HashMap<RoomId, RoomDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomStore for MemoryStore {
    async fn save(&self, doc: &RoomDocument) -> Result<(), StoreError> {
        self.rooms.write().await.insert(doc.room_id, doc.clone());
        Ok(())
    }

    async fn load(&self, room_id: RoomId) -> Result<Option<RoomDocument>, StoreError> {
        Ok(self.rooms.read().await.get(&room_id).cloned())
    }

    async fn delete(&self, room_id: RoomId) -> Result<(), StoreError> {
        self.rooms.write().await.remove(&room_id);
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<RoomDocument>, StoreError> {
        Ok(self.rooms.read().await.values().cloned().collect())
    }
}
