//! Room registry: creates, tracks, restores, and routes users to rooms.

use std::collections::HashMap;
use std::sync::Arc;

use parlor_protocol::{RoomId, RoomStatus, UserId};
use parlor_rules::{ruleset_for, Action, GameType};
use parlor_session::Identity;
use parlor_store::{RoomStore, StoreError};

use crate::room::{spawn_room, spawn_room_from_doc, JoinReply, PlayerSender, RoomConfig, RoomHandle};
use crate::RoomError;

/// Manages all active rooms and tracks which user is seated where.
///
/// Room ids are allocated from a per-registry counter, so two server
/// instances never fight over a shared sequence; restored rooms bump
/// the counter past every persisted id.
pub struct RoomRegistry<S: RoomStore> {
    rooms: HashMap<RoomId, RoomHandle>,
    /// A user is seated in at most one room at a time.
    user_rooms: HashMap<UserId, RoomId>,
    store: Arc<S>,
    config: RoomConfig,
    next_room_id: u64,
}

impl<S: RoomStore> RoomRegistry<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, RoomConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: RoomConfig) -> Self {
        Self {
            rooms: HashMap::new(),
            user_rooms: HashMap::new(),
            store,
            config,
            next_room_id: 1,
        }
    }

    /// Respawns every unfinished persisted room. Players re-attach by
    /// joining again. Returns how many rooms came back.
    pub async fn restore(&mut self) -> Result<usize, StoreError> {
        let docs = self.store.load_all().await?;
        let mut restored = 0;
        for doc in docs {
            if doc.status == RoomStatus::Finished {
                continue;
            }
            let Some(rules) = ruleset_for(doc.game_type) else {
                tracing::warn!(room_id = %doc.room_id, game = %doc.game_type, "skipping room with unsupported game");
                continue;
            };
            self.next_room_id = self.next_room_id.max(doc.room_id.0 + 1);
            for seat in doc.seats.iter().filter(|s| !s.is_bot) {
                self.user_rooms.insert(seat.user_id.clone(), doc.room_id);
            }
            let handle =
                spawn_room_from_doc(doc, rules, self.store.clone(), self.config.clone());
            self.rooms.insert(handle.room_id(), handle);
            restored += 1;
        }
        if restored > 0 {
            tracing::info!(restored, "restored rooms from store");
        }
        Ok(restored)
    }

    /// Creates an empty waiting room for up to `max_players` seats,
    /// clamped to the ruleset's supported range, and returns its id.
    pub fn create_room(
        &mut self,
        game: GameType,
        max_players: usize,
        owner: UserId,
    ) -> Result<RoomId, RoomError> {
        let rules = ruleset_for(game).ok_or(RoomError::UnsupportedGame(game))?;
        let max_players = max_players.clamp(rules.min_seats(), rules.max_seats());
        let room_id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        let handle = spawn_room(
            room_id,
            game,
            rules,
            max_players,
            owner,
            self.store.clone(),
            self.config.clone(),
        );
        self.rooms.insert(room_id, handle);
        tracing::info!(%room_id, %game, max_players, "room created");
        Ok(room_id)
    }

    /// Matchmaking: re-attach to the user's existing room if they have
    /// one, otherwise find a waiting room of the right game (or create
    /// one). With `vs_bot`, a fresh room is created and a bot fills it.
    pub async fn find_or_create(
        &mut self,
        identity: &Identity,
        game: GameType,
        vs_bot: bool,
        sender: PlayerSender,
    ) -> Result<(RoomId, JoinReply), RoomError> {
        let rules = ruleset_for(game).ok_or(RoomError::UnsupportedGame(game))?;

        // Rejoin first: an existing seat always wins over matchmaking.
        if let Some(&room_id) = self.user_rooms.get(&identity.user_id) {
            if let Some(handle) = self.rooms.get(&room_id) {
                match handle.join(identity.clone(), sender.clone()).await {
                    Ok(reply) => return Ok((room_id, reply)),
                    Err(e) => {
                        tracing::warn!(%room_id, user_id = %identity.user_id, error = %e, "rejoin failed, falling back to matchmaking");
                        self.user_rooms.remove(&identity.user_id);
                    }
                }
            } else {
                self.user_rooms.remove(&identity.user_id);
            }
        }

        if vs_bot {
            let room_id =
                self.create_room(game, rules.default_seats(), identity.user_id.clone())?;
            let handle = self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))?;
            let reply = handle.join(identity.clone(), sender).await?;
            while handle.add_bot().await.is_ok() {
                // keep filling until the room starts
            }
            self.user_rooms.insert(identity.user_id.clone(), room_id);
            return Ok((room_id, reply));
        }

        // Scan for a waiting room of this game. A room may fill between
        // info() and join(); failed joins just continue the scan.
        for handle in self.rooms.values() {
            if handle.game_type() != game {
                continue;
            }
            let Ok(info) = handle.info().await else {
                continue;
            };
            if info.status != RoomStatus::Waiting || info.seats >= info.max_players {
                continue;
            }
            if let Ok(reply) = handle.join(identity.clone(), sender.clone()).await {
                self.user_rooms
                    .insert(identity.user_id.clone(), info.room_id);
                return Ok((info.room_id, reply));
            }
        }

        let room_id = self.create_room(game, rules.default_seats(), identity.user_id.clone())?;
        let handle = self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))?;
        let reply = handle.join(identity.clone(), sender).await?;
        self.user_rooms.insert(identity.user_id.clone(), room_id);
        Ok((room_id, reply))
    }

    /// Explicit departure. In a waiting room the seat is released; in a
    /// running game the seat and the user's mapping to it survive, so
    /// rejoining with the same identity re-attaches instead of opening a
    /// new room. Empty waiting rooms are destroyed.
    pub async fn leave(&mut self, user_id: &UserId) -> Result<(), RoomError> {
        let Some(&room_id) = self.user_rooms.get(user_id) else {
            return Err(RoomError::NotInRoom(user_id.clone()));
        };
        let Some(handle) = self.rooms.get(&room_id) else {
            self.user_rooms.remove(user_id);
            return Ok(());
        };
        if let Err(e) = handle.leave(user_id.clone()).await {
            self.user_rooms.remove(user_id);
            return Err(e);
        }
        match handle.info().await {
            Ok(info) if info.status == RoomStatus::Playing => {}
            _ => {
                self.user_rooms.remove(user_id);
            }
        }
        self.prune_if_abandoned(room_id).await;
        Ok(())
    }

    /// Routes a validated-at-room game action from a user.
    pub async fn route_action(&self, user_id: &UserId, action: Action) -> Result<(), RoomError> {
        let handle = self.handle_for(user_id)?;
        handle.send_action(user_id.clone(), action).await
    }

    /// Relays a chat line to the user's room.
    pub async fn route_chat(&self, user_id: &UserId, text: String) -> Result<(), RoomError> {
        let handle = self.handle_for(user_id)?;
        handle.send_chat(user_id.clone(), text).await
    }

    /// Reacts to a dropped connection. Mid-game the seat is kept for a
    /// reconnect; in a waiting room the seat is released immediately.
    pub async fn handle_disconnect(&mut self, user_id: &UserId) {
        let Some(&room_id) = self.user_rooms.get(user_id) else {
            return;
        };
        let Some(handle) = self.rooms.get(&room_id) else {
            self.user_rooms.remove(user_id);
            return;
        };
        if handle.notify_disconnect(user_id.clone()).await.is_err() {
            self.user_rooms.remove(user_id);
            return;
        }
        if let Ok(info) = handle.info().await {
            if info.status == RoomStatus::Waiting {
                self.user_rooms.remove(user_id);
            }
        }
        self.prune_if_abandoned(room_id).await;
    }

    /// Destroys a room outright, shutting down its actor and clearing
    /// every seat index entry.
    pub async fn destroy_room(&mut self, room_id: RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        let _ = handle.shutdown().await;
        self.user_rooms.retain(|_, r| *r != room_id);
        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Destroys the room if no human is connected and no game is in
    /// progress. Running games survive so players can reconnect.
    async fn prune_if_abandoned(&mut self, room_id: RoomId) {
        let Some(handle) = self.rooms.get(&room_id) else {
            return;
        };
        let Ok(info) = handle.info().await else {
            return;
        };
        if info.connected_humans == 0 && info.status != RoomStatus::Playing {
            let _ = self.destroy_room(room_id).await;
        }
    }

    fn handle_for(&self, user_id: &UserId) -> Result<&RoomHandle, RoomError> {
        let room_id = self
            .user_rooms
            .get(user_id)
            .ok_or_else(|| RoomError::NotInRoom(user_id.clone()))?;
        self.rooms
            .get(room_id)
            .ok_or(RoomError::NotFound(*room_id))
    }

    /// The room a user is currently seated in, if any.
    pub fn user_room(&self, user_id: &UserId) -> Option<RoomId> {
        self.user_rooms.get(user_id).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Metadata snapshot for one room.
    pub async fn room_info(&self, room_id: RoomId) -> Result<crate::RoomInfo, RoomError> {
        let handle = self.rooms.get(&room_id).ok_or(RoomError::NotFound(room_id))?;
        handle.info().await
    }
}
