//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task and is driven entirely by its command
//! channel. Because the actor processes one command at a time, actions
//! within a room are serialized without any locking: validate-apply-
//! commit runs to completion before the next command is read.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use parlor_protocol::{seat_color, RoomId, RoomStatus, ServerMessage, UserId};
use parlor_rules::{Action, GameState, GameType, Ruleset};
use parlor_session::Identity;
use parlor_store::{now_epoch_secs, save_with_retry, RoomDocument, RoomStore, SeatRecord};

use crate::RoomError;

/// Channel sender for delivering server messages to one player's
/// connection handler.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Command channel size; senders wait when a room falls this far behind.
const CHANNEL_SIZE: usize = 64;

/// Per-room tuning knobs.
#[derive(Debug, Clone)]
pub struct RoomConfig {
    /// Pause before a bot takes its turn, so moves are watchable.
    pub bot_delay: Duration,
    /// Save attempts per mutation before giving up until the next one.
    pub save_attempts: u32,
    /// Initial backoff between save attempts; doubles per retry.
    pub save_backoff: Duration,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            bot_delay: Duration::from_millis(700),
            save_attempts: 3,
            save_backoff: Duration::from_millis(100),
        }
    }
}

/// One seat in a room.
#[derive(Debug)]
pub struct Seat {
    pub user_id: UserId,
    pub display_name: String,
    pub is_bot: bool,
    /// False while a human's connection is down mid-game.
    pub connected: bool,
    sender: Option<PlayerSender>,
}

/// The outcome of a successful join.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinReply {
    pub seat_index: usize,
    /// True when an existing seat was re-attached after a reconnect.
    pub rejoined: bool,
}

/// A metadata snapshot used by matchmaking and pruning.
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub game_type: GameType,
    pub status: RoomStatus,
    /// All seats, bots included.
    pub seats: usize,
    /// Human seats with a live connection.
    pub connected_humans: usize,
    pub max_players: usize,
}

/// Commands sent to a room actor through its channel.
enum RoomCommand {
    Join {
        identity: Identity,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<JoinReply, RoomError>>,
    },
    AddBot {
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    Leave {
        user_id: UserId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },
    /// A game action from a seated player (or bot). Fire-and-forget:
    /// rejections go to the acting player's sender, not the caller.
    Action { user_id: UserId, action: Action },
    Chat { user_id: UserId, text: String },
    /// The user's connection dropped without a leave message.
    Disconnected { user_id: UserId },
    /// A scheduled bot move; stale generations are ignored.
    BotTurn { generation: u64 },
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },
    Shutdown,
}

/// Handle to a running room actor. Cheap to clone.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    game_type: GameType,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn room_id(&self) -> RoomId {
        self.room_id
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    /// Seats a player (or re-attaches a reconnecting one).
    pub async fn join(
        &self,
        identity: Identity,
        sender: PlayerSender,
    ) -> Result<JoinReply, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                identity,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Fills the next free seat with a server-side bot.
    pub async fn add_bot(&self) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::AddBot { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    pub async fn leave(&self, user_id: UserId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                user_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?
    }

    /// Submits a game action (fire-and-forget).
    pub async fn send_action(&self, user_id: UserId, action: Action) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { user_id, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Relays a chat line (fire-and-forget).
    pub async fn send_chat(&self, user_id: UserId, text: String) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Chat { user_id, text })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Reports that the user's connection dropped.
    pub async fn notify_disconnect(&self, user_id: UserId) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnected { user_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }

    /// Tells the room to shut down and delete its stored document.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.room_id))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<S: RoomStore> {
    room_id: RoomId,
    game_type: GameType,
    rules: &'static dyn Ruleset,
    status: RoomStatus,
    max_players: usize,
    owner: UserId,
    seats: Vec<Seat>,
    game: Option<GameState>,
    store: Arc<S>,
    config: RoomConfig,
    /// Set when a save fails; cleared by the next successful one.
    needs_resync: bool,
    /// Bumped on every commit so scheduled bot turns from before the
    /// commit are recognized as stale.
    bot_generation: u64,
    created_at: u64,
    receiver: mpsc::Receiver<RoomCommand>,
    self_tx: mpsc::Sender<RoomCommand>,
}

impl<S: RoomStore> RoomActor<S> {
    async fn run(mut self) {
        tracing::info!(room_id = %self.room_id, game = %self.game_type, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    identity,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(identity, sender).await;
                    let _ = reply.send(result);
                }
                RoomCommand::AddBot { reply } => {
                    let result = self.handle_add_bot().await;
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { user_id, reply } => {
                    let result = self.handle_leave(user_id).await;
                    let _ = reply.send(result);
                }
                RoomCommand::Action { user_id, action } => {
                    self.handle_action(user_id, action).await;
                }
                RoomCommand::Chat { user_id, text } => {
                    self.handle_chat(user_id, text);
                }
                RoomCommand::Disconnected { user_id } => {
                    self.handle_disconnected(user_id).await;
                }
                RoomCommand::BotTurn { generation } => {
                    self.handle_bot_turn(generation).await;
                }
                RoomCommand::Info { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room_id = %self.room_id, "room shutting down");
                    if let Err(e) = self.store.delete(self.room_id).await {
                        tracing::warn!(room_id = %self.room_id, error = %e, "failed to delete room document");
                    }
                    break;
                }
            }
        }

        tracing::info!(room_id = %self.room_id, "room actor stopped");
    }

    async fn handle_join(
        &mut self,
        identity: Identity,
        sender: PlayerSender,
    ) -> Result<JoinReply, RoomError> {
        // Reconnect: the user already holds a seat here.
        if let Some(idx) = self.seat_of(&identity.user_id) {
            self.seats[idx].sender = Some(sender);
            self.seats[idx].connected = true;
            let name = self.seats[idx].display_name.clone();
            self.send_to_seat(
                idx,
                ServerMessage::PlayerAssigned {
                    seat: idx,
                    color: seat_color(idx).to_string(),
                },
            );
            let replay = match (self.status, &self.game) {
                (RoomStatus::Waiting, _) => Some(ServerMessage::WaitingForOpponent {
                    message: "Waiting for more players".into(),
                }),
                // Full state replay so the client can redraw everything.
                (_, Some(game)) => Some(ServerMessage::GameStateUpdate {
                    state: game.clone(),
                    event_description: format!("{name} reconnected"),
                    current_seat: game.current_seat(),
                    status: self.status,
                }),
                _ => None,
            };
            if let Some(msg) = replay {
                self.send_to_seat(idx, msg);
            }
            self.system_chat(format!("{name} reconnected"));
            tracing::info!(room_id = %self.room_id, user_id = %identity.user_id, seat = idx, "player rejoined");
            self.persist().await;
            // The game may have stalled on a bot turn while nobody was here.
            self.bot_generation += 1;
            self.schedule_bot_turn();
            return Ok(JoinReply {
                seat_index: idx,
                rejoined: true,
            });
        }

        if self.status != RoomStatus::Waiting {
            return Err(RoomError::NotWaiting(self.room_id));
        }
        if self.seats.len() >= self.max_players {
            return Err(RoomError::RoomFull(self.room_id));
        }

        let idx = self.seats.len();
        let name = identity.display_name.clone();
        self.seats.push(Seat {
            user_id: identity.user_id.clone(),
            display_name: identity.display_name,
            is_bot: false,
            connected: true,
            sender: Some(sender),
        });
        self.send_to_seat(
            idx,
            ServerMessage::PlayerAssigned {
                seat: idx,
                color: seat_color(idx).to_string(),
            },
        );
        self.system_chat(format!("{name} joined"));
        tracing::info!(
            room_id = %self.room_id,
            user_id = %identity.user_id,
            seat = idx,
            seats = self.seats.len(),
            "player joined"
        );

        if self.seats.len() == self.max_players {
            self.start_game();
        } else {
            self.send_to_seat(
                idx,
                ServerMessage::WaitingForOpponent {
                    message: "Waiting for more players".into(),
                },
            );
        }
        self.persist().await;
        Ok(JoinReply {
            seat_index: idx,
            rejoined: false,
        })
    }

    async fn handle_add_bot(&mut self) -> Result<(), RoomError> {
        if self.status != RoomStatus::Waiting {
            return Err(RoomError::NotWaiting(self.room_id));
        }
        if self.seats.len() >= self.max_players {
            return Err(RoomError::RoomFull(self.room_id));
        }

        let idx = self.seats.len();
        let name = format!("Bot {}", idx + 1);
        self.seats.push(Seat {
            user_id: UserId(format!("bot:{}-{}", self.room_id.0, idx)),
            display_name: name.clone(),
            is_bot: true,
            connected: true,
            sender: None,
        });
        self.system_chat(format!("{name} joined"));
        tracing::info!(room_id = %self.room_id, seat = idx, "bot added");

        if self.seats.len() == self.max_players {
            self.start_game();
        }
        self.persist().await;
        Ok(())
    }

    fn start_game(&mut self) {
        self.status = RoomStatus::Playing;
        let state = self.rules.initial_state(self.seats.len(), None);
        self.broadcast(&ServerMessage::GameStart {
            starting_seat: state.current_seat(),
            state: state.clone(),
        });
        self.system_chat("Game started".into());
        self.game = Some(state);
        tracing::info!(room_id = %self.room_id, seats = self.seats.len(), "game started");
        self.bot_generation += 1;
        self.schedule_bot_turn();
    }

    /// Validate-apply-commit for one action, human or bot. Rejections go
    /// only to the acting seat; commits are broadcast to the whole room.
    async fn handle_action(&mut self, user_id: UserId, action: Action) {
        let Some(seat_idx) = self.seat_of(&user_id) else {
            tracing::warn!(room_id = %self.room_id, %user_id, "action from non-member, ignoring");
            return;
        };
        let Some(game) = &self.game else {
            self.send_to_seat(
                seat_idx,
                ServerMessage::Error {
                    message: "the game has not started".into(),
                },
            );
            return;
        };

        let applied = match self.rules.apply(game, seat_idx, &action) {
            Ok(applied) => applied,
            Err(e) => {
                tracing::debug!(room_id = %self.room_id, %user_id, error = %e, "action rejected");
                self.send_to_seat(
                    seat_idx,
                    ServerMessage::Error {
                        message: e.to_string(),
                    },
                );
                return;
            }
        };

        let event = format!("{} {}", self.seats[seat_idx].display_name, applied.event);
        let finished = applied.state.is_over();
        if finished {
            self.status = RoomStatus::Finished;
        }
        self.broadcast(&ServerMessage::GameStateUpdate {
            state: applied.state.clone(),
            event_description: event,
            current_seat: applied.state.current_seat(),
            status: self.status,
        });
        if let Some(winner) = applied.state.winner() {
            let name = self.seats[winner].display_name.clone();
            self.system_chat(format!("{name} wins!"));
            tracing::info!(room_id = %self.room_id, winner, "game finished");
        }
        self.game = Some(applied.state);
        self.bot_generation += 1;
        self.persist().await;
        if !finished {
            self.schedule_bot_turn();
        }
    }

    fn handle_chat(&mut self, user_id: UserId, text: String) {
        let Some(idx) = self.seat_of(&user_id) else {
            return;
        };
        let sender = self.seats[idx].display_name.clone();
        self.broadcast(&ServerMessage::ChatMessage { sender, text });
    }

    async fn handle_disconnected(&mut self, user_id: UserId) {
        let Some(idx) = self.seat_of(&user_id) else {
            return;
        };
        let name = self.seats[idx].display_name.clone();

        if self.status == RoomStatus::Waiting {
            // Seats are still fluid: drop the seat and shift the rest down.
            self.seats.remove(idx);
            if self.owner == user_id {
                if let Some(next) = self.seats.iter().find(|s| !s.is_bot) {
                    self.owner = next.user_id.clone();
                }
            }
            for i in 0..self.seats.len() {
                self.send_to_seat(
                    i,
                    ServerMessage::PlayerAssigned {
                        seat: i,
                        color: seat_color(i).to_string(),
                    },
                );
            }
            self.system_chat(format!("{name} left"));
            tracing::info!(room_id = %self.room_id, %user_id, "player left waiting room");
        } else {
            // Seats are fixed mid-game; keep it for a possible reconnect.
            self.seats[idx].connected = false;
            self.seats[idx].sender = None;
            self.broadcast(&ServerMessage::OpponentLeft {
                seat: idx,
                message: format!("{name} left the game"),
            });
            tracing::info!(room_id = %self.room_id, %user_id, seat = idx, "player disconnected mid-game");
        }
        self.persist().await;
    }

    async fn handle_leave(&mut self, user_id: UserId) -> Result<(), RoomError> {
        if self.seat_of(&user_id).is_none() {
            return Err(RoomError::NotInRoom(user_id));
        }
        self.handle_disconnected(user_id).await;
        Ok(())
    }

    async fn handle_bot_turn(&mut self, generation: u64) {
        if generation != self.bot_generation || self.status != RoomStatus::Playing {
            return;
        }
        let Some(game) = &self.game else { return };
        let seat = game.current_seat();
        let Some(s) = self.seats.get(seat) else {
            return;
        };
        if !s.is_bot {
            return;
        }
        let Some(action) = self.rules.bot_decide(game, seat) else {
            return;
        };
        let user_id = s.user_id.clone();
        self.handle_action(user_id, action).await;
    }

    /// Arms a delayed bot move if it's currently a bot's turn.
    fn schedule_bot_turn(&self) {
        if self.status != RoomStatus::Playing {
            return;
        }
        let Some(game) = &self.game else { return };
        let seat = game.current_seat();
        if !self.seats.get(seat).is_some_and(|s| s.is_bot) {
            return;
        }
        let generation = self.bot_generation;
        let tx = self.self_tx.clone();
        let delay = self.config.bot_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(RoomCommand::BotTurn { generation }).await;
        });
    }

    fn seat_of(&self, user_id: &UserId) -> Option<usize> {
        self.seats.iter().position(|s| &s.user_id == user_id)
    }

    /// Sends to every seat with a live connection. Seats whose receiver
    /// is gone are marked disconnected.
    fn broadcast(&mut self, msg: &ServerMessage) {
        let mut dead = Vec::new();
        for (i, seat) in self.seats.iter().enumerate() {
            if let Some(sender) = &seat.sender {
                if sender.send(msg.clone()).is_err() {
                    dead.push(i);
                }
            }
        }
        for i in dead {
            self.seats[i].sender = None;
            self.seats[i].connected = false;
        }
    }

    fn send_to_seat(&mut self, idx: usize, msg: ServerMessage) {
        let Some(seat) = self.seats.get_mut(idx) else {
            return;
        };
        if let Some(sender) = &seat.sender {
            if sender.send(msg).is_err() {
                seat.sender = None;
                seat.connected = false;
            }
        }
    }

    fn system_chat(&mut self, text: String) {
        self.broadcast(&ServerMessage::ChatMessage {
            sender: "System".into(),
            text,
        });
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room_id,
            game_type: self.game_type,
            status: self.status,
            seats: self.seats.len(),
            connected_humans: self
                .seats
                .iter()
                .filter(|s| !s.is_bot && s.connected)
                .count(),
            max_players: self.max_players,
        }
    }

    fn document(&self) -> RoomDocument {
        RoomDocument {
            room_id: self.room_id,
            game_type: self.game_type,
            status: self.status,
            max_players: self.max_players,
            owner_user_id: self.owner.clone(),
            seats: self
                .seats
                .iter()
                .enumerate()
                .map(|(i, s)| SeatRecord {
                    user_id: s.user_id.clone(),
                    display_name: s.display_name.clone(),
                    seat_index: i,
                    is_bot: s.is_bot,
                })
                .collect(),
            game_state: self.game.clone(),
            created_at: self.created_at,
            updated_at: self.created_at,
        }
    }

    /// Write-through persistence. A failed save never interrupts play;
    /// the room keeps serving from memory and retries on the next commit.
    async fn persist(&mut self) {
        let mut doc = self.document();
        doc.touch();
        match save_with_retry(
            &*self.store,
            &doc,
            self.config.save_attempts,
            self.config.save_backoff,
        )
        .await
        {
            Ok(()) => {
                if self.needs_resync {
                    tracing::info!(room_id = %self.room_id, "room document resynced");
                    self.needs_resync = false;
                }
            }
            Err(e) => {
                self.needs_resync = true;
                tracing::warn!(
                    room_id = %self.room_id,
                    error = %e,
                    "room save failed; continuing from in-memory state"
                );
            }
        }
    }
}

/// Spawns a fresh room actor and returns a handle to it.
pub(crate) fn spawn_room<S: RoomStore>(
    room_id: RoomId,
    game_type: GameType,
    rules: &'static dyn Ruleset,
    max_players: usize,
    owner: UserId,
    store: Arc<S>,
    config: RoomConfig,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let actor = RoomActor {
        room_id,
        game_type,
        rules,
        status: RoomStatus::Waiting,
        max_players,
        owner,
        seats: Vec::new(),
        game: None,
        store,
        config,
        needs_resync: false,
        bot_generation: 0,
        created_at: now_epoch_secs(),
        receiver: rx,
        self_tx: tx.clone(),
    };
    tokio::spawn(actor.run());
    RoomHandle {
        room_id,
        game_type,
        sender: tx,
    }
}

/// Respawns a room actor from a persisted document. Human seats come
/// back detached; players re-attach by rejoining.
pub(crate) fn spawn_room_from_doc<S: RoomStore>(
    doc: RoomDocument,
    rules: &'static dyn Ruleset,
    store: Arc<S>,
    config: RoomConfig,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(CHANNEL_SIZE);
    let mut records = doc.seats;
    records.sort_by_key(|s| s.seat_index);
    let seats: Vec<Seat> = records
        .into_iter()
        .map(|s| Seat {
            user_id: s.user_id,
            display_name: s.display_name,
            is_bot: s.is_bot,
            connected: s.is_bot,
            sender: None,
        })
        .collect();

    let actor = RoomActor {
        room_id: doc.room_id,
        game_type: doc.game_type,
        rules,
        status: doc.status,
        max_players: doc.max_players,
        owner: doc.owner_user_id,
        seats,
        game: doc.game_state,
        store,
        config,
        needs_resync: false,
        bot_generation: 0,
        created_at: doc.created_at,
        receiver: rx,
        self_tx: tx.clone(),
    };
    let handle = RoomHandle {
        room_id: actor.room_id,
        game_type: actor.game_type,
        sender: tx,
    };
    tokio::spawn(actor.run());
    handle
}
