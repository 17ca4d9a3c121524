//! Per-connection handler: authentication and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Register the connection; the first message must be `authenticate`
//!   2. Verify the token → record the identity, reply `authenticated`
//!   3. Spawn a writer task that drains the connection's outbound queue
//!   4. Loop: decode client messages → dispatch to rooms
//!
//! Outbound traffic goes through an unbounded channel whose sender is the
//! same [`PlayerSender`] handed to the room on join, so room broadcasts
//! and handler replies share one ordered stream per connection.

use std::sync::Arc;

use tokio::sync::mpsc;

use parlor_protocol::{ClientMessage, Codec, ServerMessage};
use parlor_session::{Identity, IdentityVerifier};
use parlor_store::RoomStore;
use parlor_transport::{Connection, ConnectionId, WebSocketConnection};

use crate::server::ServerState;
use crate::ParlorError;

/// Drop guard that cleans up a connection's registrations when the
/// handler exits, even on panic. `Drop` is synchronous, so the async
/// cleanup runs in a fire-and-forget task.
struct ConnectionGuard<V: IdentityVerifier, S: RoomStore, C: Codec> {
    conn_id: ConnectionId,
    state: Arc<ServerState<V, S, C>>,
}

impl<V: IdentityVerifier, S: RoomStore, C: Codec> Drop for ConnectionGuard<V, S, C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            let departed = {
                let mut sessions = state.sessions.lock().await;
                let Some(entry) = sessions.remove(conn_id) else {
                    return;
                };
                match (entry.identity, entry.room) {
                    // The user may already be back on a newer connection;
                    // only a drop with no sibling counts as a departure.
                    (Some(identity), Some(room))
                        if !sessions.has_other_connection(&identity.user_id, room, conn_id) =>
                    {
                        Some(identity.user_id)
                    }
                    _ => None,
                }
            };
            if let Some(user_id) = departed {
                state.rooms.lock().await.handle_disconnect(&user_id).await;
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<V, S, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<V, S, C>>,
) -> Result<(), ParlorError>
where
    V: IdentityVerifier,
    S: RoomStore,
    C: Codec + Clone,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    state.sessions.lock().await.register(conn_id);
    let _guard = ConnectionGuard {
        conn_id,
        state: Arc::clone(&state),
    };

    let identity = authenticate(&conn, conn_id, &state).await?;
    tracing::info!(%conn_id, user_id = %identity.user_id, "player authenticated");

    // Writer task: sole owner of the outbound direction. `tx` clones go
    // to the room on join; everything funnels through one queue.
    let conn = Arc::new(conn);
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();
    let writer_conn = Arc::clone(&conn);
    let writer_codec = state.codec.clone();
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let bytes = match writer_codec.encode(&msg) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode server message");
                    continue;
                }
            };
            if writer_conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });

    read_loop(&conn, conn_id, identity, &state, &tx).await;

    // _guard drops here → registry removal and room notification fire.
    Ok(())
}

/// Waits for the `authenticate` message, verifies the token, and replies.
/// Anything else ends the connection.
async fn authenticate<V, S, C>(
    conn: &WebSocketConnection,
    conn_id: ConnectionId,
    state: &Arc<ServerState<V, S, C>>,
) -> Result<Identity, ParlorError>
where
    V: IdentityVerifier,
    S: RoomStore,
    C: Codec,
{
    let data = match tokio::time::timeout(state.auth_timeout, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(parlor_protocol::ProtocolError::InvalidMessage(
                "connection closed before authentication".into(),
            )
            .into());
        }
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => {
            return Err(parlor_protocol::ProtocolError::InvalidMessage(
                "authentication timed out".into(),
            )
            .into());
        }
    };

    let token = match state.codec.decode::<ClientMessage>(&data) {
        Ok(ClientMessage::Authenticate { token }) => token,
        Ok(_) => {
            send_direct(
                conn,
                &state.codec,
                &ServerMessage::Error {
                    message: "the first message must be authenticate".into(),
                },
            )
            .await;
            return Err(parlor_protocol::ProtocolError::InvalidMessage(
                "first message was not authenticate".into(),
            )
            .into());
        }
        Err(e) => {
            send_direct(
                conn,
                &state.codec,
                &ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                },
            )
            .await;
            return Err(e.into());
        }
    };

    let identity = match state.verifier.verify(&token).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::info!(%conn_id, error = %e, "authentication rejected");
            send_direct(
                conn,
                &state.codec,
                &ServerMessage::Error {
                    message: "authentication failed".into(),
                },
            )
            .await;
            return Err(e.into());
        }
    };

    state
        .sessions
        .lock()
        .await
        .authenticate(conn_id, identity.clone())?;

    send_direct(
        conn,
        &state.codec,
        &ServerMessage::Authenticated {
            user_id: identity.user_id.clone(),
            display_name: identity.display_name.clone(),
        },
    )
    .await;

    Ok(identity)
}

/// Receives and dispatches client messages until the connection ends.
async fn read_loop<V, S, C>(
    conn: &WebSocketConnection,
    conn_id: ConnectionId,
    identity: Identity,
    state: &Arc<ServerState<V, S, C>>,
    tx: &mpsc::UnboundedSender<ServerMessage>,
) where
    V: IdentityVerifier,
    S: RoomStore,
    C: Codec,
{
    let user_id = identity.user_id.clone();

    loop {
        let data = match tokio::time::timeout(state.idle_timeout, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::debug!(%conn_id, %user_id, "connection closed");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, %user_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%conn_id, %user_id, "connection idle, dropping");
                break;
            }
        };

        let msg: ClientMessage = match state.codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%conn_id, %user_id, error = %e, "undecodable message");
                let _ = tx.send(ServerMessage::Error {
                    message: format!("invalid message: {e}"),
                });
                continue;
            }
        };

        match msg {
            ClientMessage::Ping => {
                if tx.send(ServerMessage::Pong).is_err() {
                    break;
                }
            }

            ClientMessage::Authenticate { .. } => {
                let _ = tx.send(ServerMessage::Error {
                    message: "already authenticated".into(),
                });
            }

            ClientMessage::JoinGame { game, vs_bot } => {
                let result = {
                    let mut rooms = state.rooms.lock().await;
                    rooms
                        .find_or_create(&identity, game, vs_bot, tx.clone())
                        .await
                };
                match result {
                    Ok((room_id, reply)) => {
                        tracing::debug!(
                            %conn_id, %user_id, %room_id,
                            seat = reply.seat_index,
                            rejoined = reply.rejoined,
                            "seated in room"
                        );
                        if let Err(e) =
                            state.sessions.lock().await.attach_room(conn_id, room_id)
                        {
                            tracing::warn!(%conn_id, error = %e, "failed to record room attachment");
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(ServerMessage::Error {
                            message: e.to_string(),
                        });
                    }
                }
            }

            ClientMessage::LeaveGame => {
                let result = state.rooms.lock().await.leave(&user_id).await;
                if let Err(e) = result {
                    let _ = tx.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
                state.sessions.lock().await.detach_room(conn_id);
            }

            ClientMessage::ChatMessage { text } => {
                if let Err(e) = state.rooms.lock().await.route_chat(&user_id, text).await {
                    let _ = tx.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }

            // Game actions: hand them to whatever room the user is in.
            other => {
                let Some(action) = other.into_action() else {
                    continue;
                };
                if let Err(e) = state
                    .rooms
                    .lock()
                    .await
                    .route_action(&user_id, action)
                    .await
                {
                    let _ = tx.send(ServerMessage::Error {
                        message: e.to_string(),
                    });
                }
            }
        }
    }
}

/// Sends one message straight on the socket, before the writer task
/// exists. Failures are logged and swallowed; the connection is about to
/// be torn down anyway when these sends matter.
async fn send_direct(conn: &WebSocketConnection, codec: &impl Codec, msg: &ServerMessage) {
    match codec.encode(msg) {
        Ok(bytes) => {
            if let Err(e) = conn.send(&bytes).await {
                tracing::debug!(error = %e, "direct send failed");
            }
        }
        Err(e) => tracing::error!(error = %e, "failed to encode server message"),
    }
}
