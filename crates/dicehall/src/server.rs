//! `DicehallServer` builder and accept loop.
//!
//! Ties the layers together: transport → codec → room coordinators.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dicehall_protocol::{Codec, JsonCodec, PlayerId};
use dicehall_room::{
    DiceFactory, GameplayCoordinator, PlayerConnection, RoomConfig, RoomLifecycleCoordinator,
    RoomRegistry, random_dice,
};
use dicehall_transport::{Transport, WebSocketConnection, WebSocketTransport};

use crate::connection::CodecConnection;
use crate::handler::handle_player;
use crate::DicehallError;

/// A WebSocket player connection framed by codec `K`.
pub type WsPlayer<K> = CodecConnection<WebSocketConnection, K>;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<C> {
    pub(crate) registry: Arc<RoomRegistry<C>>,
    pub(crate) lifecycle: RoomLifecycleCoordinator<C>,
    pub(crate) gameplay: GameplayCoordinator<C>,
    next_player: AtomicU64,
}

impl<C: PlayerConnection> ServerState<C> {
    pub(crate) fn new(registry: Arc<RoomRegistry<C>>) -> Self {
        Self {
            lifecycle: RoomLifecycleCoordinator::new(Arc::clone(&registry)),
            gameplay: GameplayCoordinator::new(Arc::clone(&registry)),
            registry,
            next_player: AtomicU64::new(1),
        }
    }

    /// Hands out player ids in connection order, starting at 1.
    pub(crate) fn next_player_id(&self) -> PlayerId {
        PlayerId(self.next_player.fetch_add(1, Ordering::Relaxed))
    }
}

/// Builder for configuring and starting a Dicehall server.
///
/// # Example
///
/// ```rust,ignore
/// use dicehall::prelude::*;
///
/// let server = DicehallServer::builder()
///     .bind("0.0.0.0:8080")
///     .room_config(RoomConfig::default())
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct DicehallServerBuilder {
    bind_addr: String,
    room_config: RoomConfig,
    dice: Option<DiceFactory>,
}

impl DicehallServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room_config: RoomConfig::default(),
            dice: None,
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the configuration every room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Replaces the random dice with another source, one per room.
    pub fn dice_source(mut self, dice: DiceFactory) -> Self {
        self.dice = Some(dice);
        self
    }

    /// Binds the listener and builds a server speaking JSON.
    pub async fn build(self) -> Result<DicehallServer<JsonCodec>, DicehallError> {
        self.build_with_codec(JsonCodec).await
    }

    /// Binds the listener and builds a server framing messages with `codec`.
    pub async fn build_with_codec<K: Codec + Clone>(
        self,
        codec: K,
    ) -> Result<DicehallServer<K>, DicehallError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let dice = self.dice.unwrap_or_else(random_dice);
        let registry = Arc::new(RoomRegistry::with_dice(self.room_config, dice));

        Ok(DicehallServer {
            transport,
            codec,
            state: Arc::new(ServerState::new(registry)),
        })
    }
}

impl Default for DicehallServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Dicehall server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct DicehallServer<K: Codec = JsonCodec> {
    transport: WebSocketTransport,
    codec: K,
    state: Arc<ServerState<WsPlayer<K>>>,
}

impl DicehallServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> DicehallServerBuilder {
        DicehallServerBuilder::new()
    }
}

impl<K: Codec + Clone> DicehallServer<K> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The room registry, shared with every connection handler.
    pub fn registry(&self) -> Arc<RoomRegistry<WsPlayer<K>>> {
        Arc::clone(&self.state.registry)
    }

    /// Runs the accept loop.
    ///
    /// Every accepted connection gets its own handler task. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), DicehallError> {
        tracing::info!("Dicehall server running");

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let conn = Arc::new(CodecConnection::new(conn, self.codec.clone()));
                    let state = Arc::clone(&self.state);
                    tokio::spawn(handle_player(conn, state));
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
