//! `WordBattleServer` builder, accept loop and maintenance sweep.
//!
//! This is the entry point for running a Word Battle server. It ties
//! together all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use wordbattle_core::{Dictionary, WordList};
use wordbattle_protocol::{Codec, JsonCodec};
use wordbattle_room::{RoomConfig, RoomManager};
use wordbattle_session::{SessionConfig, SessionManager};
use wordbattle_transport::{Transport, WebSocketTransport};

use crate::WordBattleError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks. The two
/// registries sit behind separate locks and no code path holds both at
/// once.
pub(crate) struct ServerState<C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) rooms: Mutex<RoomManager>,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Word Battle server.
///
/// # Example
///
/// ```rust,ignore
/// use wordbattle::prelude::*;
///
/// let server = WordBattleServer::builder()
///     .bind("0.0.0.0:8080")
///     .dictionary(Arc::new(WordList::load("words.txt")?))
///     .build()
///     .await?;
/// server.run().await
/// ```
pub struct WordBattleServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    room_config: RoomConfig,
    dictionary: Option<Arc<dyn Dictionary>>,
    sweep_interval: Duration,
}

impl WordBattleServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_config: SessionConfig::default(),
            room_config: RoomConfig::default(),
            dictionary: None,
            sweep_interval: Duration::from_secs(5),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Sets the configuration every new room is created with.
    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.room_config = config;
        self
    }

    /// Sets the dictionary shared by every room.
    ///
    /// Without one, the server starts with an empty word list and every
    /// word attempt is refused.
    pub fn dictionary(mut self, dictionary: Arc<dyn Dictionary>) -> Self {
        self.dictionary = Some(dictionary);
        self
    }

    /// Sets how often stale sessions and idle rooms are cleaned up.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Binds the listener and builds the server.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build(self) -> Result<WordBattleServer<JsonCodec>, WordBattleError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let dictionary = match self.dictionary {
            Some(dictionary) => dictionary,
            None => {
                tracing::warn!("no dictionary configured, every word will be refused");
                Arc::new(WordList::from_words(std::iter::empty::<&str>()))
            }
        };

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new(self.session_config)),
            rooms: Mutex::new(RoomManager::new(self.room_config, dictionary)),
            codec: JsonCodec,
        });

        Ok(WordBattleServer {
            transport,
            state,
            sweep_interval: self.sweep_interval,
        })
    }
}

impl Default for WordBattleServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Word Battle server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct WordBattleServer<C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<C>>,
    sweep_interval: Duration,
}

impl WordBattleServer<JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> WordBattleServerBuilder {
        WordBattleServerBuilder::new()
    }
}

impl<C: Codec> WordBattleServer<C> {
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server.
    ///
    /// Starts the maintenance sweep, then accepts incoming connections and
    /// spawns a handler task for each. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), WordBattleError> {
        tracing::info!(
            addr = ?self.transport.local_addr().ok(),
            "Word Battle server running"
        );

        tokio::spawn(run_sweeper(Arc::clone(&self.state), self.sweep_interval));

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

/// Runs [`sweep`] on a fixed interval, forever.
async fn run_sweeper<C: Codec>(state: Arc<ServerState<C>>, every: Duration) {
    let mut interval = tokio::time::interval(every.max(Duration::from_millis(1)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        sweep(&state).await;
    }
}

/// One maintenance pass.
///
/// Expires sessions past their grace period, then destroys rooms that
/// nobody is connected to and nobody can still rejoin. Sessions bound to
/// a destroyed room go with it.
async fn sweep<C: Codec>(state: &ServerState<C>) {
    let live = {
        let mut sessions = state.sessions.lock().await;
        let expired = sessions.expire_stale();
        let removed = sessions.cleanup_expired();
        if !expired.is_empty() || removed > 0 {
            tracing::debug!(expired = expired.len(), removed, "sessions swept");
        }
        sessions.live_rooms()
    };

    let reaped = state
        .rooms
        .lock()
        .await
        .reap_idle(|room_id| live.contains(room_id))
        .await;
    if reaped.is_empty() {
        return;
    }

    let mut sessions = state.sessions.lock().await;
    for room_id in &reaped {
        let dropped = sessions.remove_room(room_id);
        tracing::info!(%room_id, sessions = dropped, "idle room reaped");
    }
}
