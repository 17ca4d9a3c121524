//! `ParlorServer` builder and accept loop.
//!
//! This is the entry point for running a Parlor server. It ties together
//! all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use parlor_protocol::{Codec, JsonCodec};
use parlor_room::{RoomConfig, RoomRegistry};
use parlor_session::{ConnectionRegistry, IdentityVerifier};
use parlor_store::RoomStore;
use parlor_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::ParlorError;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The two
/// registries sit behind their own mutexes; every locked section is a
/// short synchronous operation or a quick actor-channel send.
pub(crate) struct ServerState<V: IdentityVerifier, S: RoomStore, C: Codec> {
    pub(crate) sessions: Mutex<ConnectionRegistry>,
    pub(crate) rooms: Mutex<RoomRegistry<S>>,
    pub(crate) verifier: V,
    pub(crate) codec: C,
    /// How long a fresh connection may sit unauthenticated.
    pub(crate) auth_timeout: Duration,
    /// How long a connection may go without any inbound frame.
    pub(crate) idle_timeout: Duration,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,ignore
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8080")
///     .build(my_verifier, Arc::new(MemoryStore::new()))
///     .await?;
/// server.run().await
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    auth_timeout: Duration,
    idle_timeout: Duration,
    room_config: RoomConfig,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            auth_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            room_config: RoomConfig::default(),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// How long a connection may stay unauthenticated before it is
    /// dropped.
    pub fn auth_timeout(mut self, timeout: Duration) -> Self {
        self.auth_timeout = timeout;
        self
    }

    /// How long a connection may go silent before it is dropped.
    /// Clients are expected to `ping` within this window.
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// Room tuning (bot move delay, save retry policy).
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Binds the transport, restores persisted rooms, and returns a
    /// server ready to [`run`](ParlorServer::run).
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    pub async fn build<V: IdentityVerifier, S: RoomStore>(
        self,
        verifier: V,
        store: Arc<S>,
    ) -> Result<ParlorServer<V, S, JsonCodec>, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let mut rooms = RoomRegistry::with_config(store, self.room_config);
        let restored = rooms.restore().await?;
        if restored > 0 {
            tracing::info!(restored, "rooms restored from the store");
        }

        let state = Arc::new(ServerState {
            sessions: Mutex::new(ConnectionRegistry::new()),
            rooms: Mutex::new(rooms),
            verifier,
            codec: JsonCodec,
            auth_timeout: self.auth_timeout,
            idle_timeout: self.idle_timeout,
        });

        Ok(ParlorServer { transport, state })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer<V: IdentityVerifier, S: RoomStore, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<V, S, C>>,
}

impl<V, S, C> ParlorServer<V, S, C>
where
    V: IdentityVerifier,
    S: RoomStore,
    C: Codec + Clone,
{
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ParlorError> {
        Ok(self.transport.local_addr()?)
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections and spawns a handler task for each.
    /// Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
