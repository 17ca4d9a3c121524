//! A runnable card-game server: Parlor with the development token
//! verifier and the in-memory store.
//!
//! Clients authenticate with `"uid:Display Name"` tokens, so a browser
//! client can get going without any auth provider. Set `PARLOR_ADDR` to
//! change the listen address and `RUST_LOG` to tune logging.

use std::sync::Arc;

use parlor::prelude::*;
use tracing_subscriber::EnvFilter;

/// Accepts `"uid:Display Name"` tokens. Development only: anyone can
/// claim any uid.
struct DevVerifier;

impl IdentityVerifier for DevVerifier {
    async fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        let (uid, name) = token
            .split_once(':')
            .ok_or_else(|| AuthError::InvalidToken("expected uid:name".into()))?;
        if uid.is_empty() || name.is_empty() {
            return Err(AuthError::InvalidToken("uid and name must be non-empty".into()));
        }
        Ok(Identity::new(uid, name))
    }
}

#[tokio::main]
async fn main() -> Result<(), ParlorError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let addr = std::env::var("PARLOR_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let server = ParlorServerBuilder::new()
        .bind(&addr)
        .build(DevVerifier, Arc::new(MemoryStore::new()))
        .await?;

    tracing::info!(%addr, "uno server listening");
    server.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    type Ws = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    async fn start() -> String {
        let server = ParlorServerBuilder::new()
            .bind("127.0.0.1:0")
            .room_config(RoomConfig {
                bot_delay: Duration::from_millis(5),
                ..RoomConfig::default()
            })
            .build(DevVerifier, Arc::new(MemoryStore::new()))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            let _ = server.run().await;
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        addr
    }

    async fn ws(addr: &str) -> Ws {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .unwrap();
        ws
    }

    async fn send(ws: &mut Ws, msg: &ClientMessage) {
        let bytes = serde_json::to_vec(msg).unwrap();
        ws.send(Message::Binary(bytes.into())).await.unwrap();
    }

    async fn recv(ws: &mut Ws) -> ServerMessage {
        let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout")
            .unwrap()
            .unwrap();
        serde_json::from_slice(&msg.into_data()).unwrap()
    }

    async fn auth_and_join_bot_game(ws: &mut Ws, token: &str) {
        send(
            ws,
            &ClientMessage::Authenticate {
                token: token.into(),
            },
        )
        .await;
        assert!(matches!(
            recv(ws).await,
            ServerMessage::Authenticated { .. }
        ));
        send(
            ws,
            &ClientMessage::JoinGame {
                game: GameType::Card,
                vs_bot: true,
            },
        )
        .await;
    }

    /// Plays a whole game against the bot without ever playing a card:
    /// draw when it's our turn, pass the drawn card, and drain forced
    /// draws. The bot must win eventually; the point is that the turn
    /// cycle keeps moving over a real socket until a terminal state.
    #[tokio::test]
    async fn test_full_game_against_the_bot_reaches_a_finish() {
        let addr = start().await;
        let mut ws = ws(&addr).await;
        auth_and_join_bot_game(&mut ws, "u-1:Alice").await;

        let mut moves = 0;
        for _ in 0..1000 {
            match recv(&mut ws).await {
                ServerMessage::GameStateUpdate { state, status, .. } => {
                    if status == RoomStatus::Finished {
                        let GameState::Card(card) = state;
                        assert_eq!(card.winner, Some(1), "only the bot can shed its hand");
                        return;
                    }
                    let GameState::Card(card) = &state;
                    if card.current_seat != 0 {
                        continue;
                    }
                    let action = match card.phase {
                        TurnPhase::AwaitingAction => ClientMessage::DrawCard,
                        TurnPhase::AwaitingDrawResolution => ClientMessage::EndTurn,
                        _ => continue,
                    };
                    send(&mut ws, &action).await;
                    moves += 1;
                }
                ServerMessage::GameStart { state, .. } => {
                    let GameState::Card(card) = &state;
                    if card.current_seat == 0 {
                        send(&mut ws, &ClientMessage::DrawCard).await;
                        moves += 1;
                    }
                }
                // Chat lines, seat assignment, stray errors from updates
                // that crossed our action in flight.
                _ => continue,
            }
        }
        panic!("game did not finish after {moves} moves");
    }

    #[tokio::test]
    async fn test_system_chat_announces_the_game() {
        let addr = start().await;
        let mut ws = ws(&addr).await;
        auth_and_join_bot_game(&mut ws, "u-1:Alice").await;

        let mut lines = Vec::new();
        while lines.len() < 3 {
            if let ServerMessage::ChatMessage { sender, text } = recv(&mut ws).await {
                assert_eq!(sender, "System");
                lines.push(text);
            }
        }
        assert_eq!(lines[0], "Alice joined");
        assert_eq!(lines[1], "Bot 2 joined");
        assert_eq!(lines[2], "Game started");
    }

    #[tokio::test]
    async fn test_dev_verifier_accepts_uid_name_tokens() {
        assert!(DevVerifier.verify("u-9:Robin").await.is_ok());
        assert!(DevVerifier.verify("nope").await.is_err());
        assert!(DevVerifier.verify(":NoUid").await.is_err());
    }
}
