//! Room manager: creates rooms, tracks who sits where, and routes actions.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use wordbattle_core::Dictionary;
use wordbattle_protocol::{GameState, PlayerId, RoomId};

use crate::room::spawn_room;
use crate::{PlayerSender, RejoinTarget, RoomAction, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// Characters room codes are drawn from.
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Registry of live rooms and of which connection sits in which room.
///
/// This is the entry point for room operations from the connection
/// handlers. It is owned by the server and shared behind a mutex.
pub struct RoomManager {
    /// Active rooms, keyed by room code.
    rooms: HashMap<RoomId, RoomHandle>,

    /// Maps each connected player to their room.
    /// A connection sits in at most ONE room at a time.
    player_rooms: HashMap<PlayerId, RoomId>,

    config: RoomConfig,
    dictionary: Arc<dyn Dictionary>,
}

impl RoomManager {
    /// Creates an empty manager. Every room it spawns shares `dictionary`.
    pub fn new(config: RoomConfig, dictionary: Arc<dyn Dictionary>) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            config,
            dictionary,
        }
    }

    /// Opens a new room with `player_id` as its owner and first seat.
    pub async fn create_room(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<RoomId, RoomError> {
        self.ensure_unseated(player_id)?;

        let room_id = self.generate_code();
        let handle = spawn_room(room_id.clone(), &self.config, Arc::clone(&self.dictionary));

        if let Err(e) = handle.join(player_id, name, sender).await {
            let _ = handle.shutdown().await;
            return Err(e);
        }

        self.rooms.insert(room_id.clone(), handle);
        self.player_rooms.insert(player_id, room_id.clone());
        tracing::info!(%room_id, owner = %player_id, "room created");
        Ok(room_id)
    }

    /// Seats a player in an existing room.
    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        room_id: &RoomId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.ensure_unseated(player_id)?;
        let handle = self.handle(room_id)?;

        handle.join(player_id, name, sender).await?;
        self.player_rooms.insert(player_id, room_id.clone());
        Ok(())
    }

    /// Routes an in-room action to the player's room.
    ///
    /// The action must address the room the player actually sits in.
    pub async fn route(
        &self,
        player_id: PlayerId,
        room_id: &RoomId,
        action: RoomAction,
    ) -> Result<(), RoomError> {
        let handle = self.handle(room_id)?;
        if self.player_rooms.get(&player_id) != Some(room_id) {
            return Err(RoomError::NotInRoom(player_id, room_id.clone()));
        }
        handle.act(player_id, action).await
    }

    /// Moves a seat in `room_id` to the connection `player_id`.
    ///
    /// Returns the id the seat had before.
    pub async fn rejoin(
        &mut self,
        player_id: PlayerId,
        room_id: &RoomId,
        target: RejoinTarget,
        sender: PlayerSender,
    ) -> Result<PlayerId, RoomError> {
        self.ensure_unseated(player_id)?;
        let handle = self.handle(room_id)?;

        let previous = handle.rejoin(target, player_id, sender).await?;
        self.player_rooms.remove(&previous);
        self.player_rooms.insert(player_id, room_id.clone());
        Ok(previous)
    }

    /// Unsubscribes a closed connection from its room, if it had one.
    pub async fn disconnect(&mut self, player_id: PlayerId) -> Option<RoomId> {
        let room_id = self.player_rooms.remove(&player_id)?;
        if let Some(handle) = self.rooms.get(&room_id) {
            if let Err(e) = handle.disconnect(player_id).await {
                tracing::debug!(%player_id, error = %e, "disconnect notice not delivered");
            }
        }
        Some(room_id)
    }

    /// Returns info about a specific room.
    pub async fn get_room_info(&self, room_id: &RoomId) -> Result<RoomInfo, RoomError> {
        self.handle(room_id)?.get_info().await
    }

    /// Shuts down a room and forgets everyone seated in it.
    pub async fn destroy_room(&mut self, room_id: &RoomId) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;

        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, rid| rid != room_id);

        tracing::info!(%room_id, "room destroyed");
        Ok(())
    }

    /// Destroys rooms nobody is connected to any more.
    ///
    /// A finished room goes as soon as it is empty. An unfinished one is
    /// kept while `awaiting_rejoin` says a seated player may still come
    /// back. Rooms whose actor stopped answering are dropped too.
    pub async fn reap_idle(&mut self, awaiting_rejoin: impl Fn(&RoomId) -> bool) -> Vec<RoomId> {
        let mut idle = Vec::new();
        for (room_id, handle) in &self.rooms {
            match handle.get_info().await {
                Ok(info) if info.connected > 0 => {}
                Ok(info) if info.state != GameState::Ended && awaiting_rejoin(room_id) => {}
                _ => idle.push(room_id.clone()),
            }
        }

        for room_id in &idle {
            let _ = self.destroy_room(room_id).await;
        }
        idle
    }

    /// The room a connection sits in.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.player_rooms.get(player_id)
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Lists all active room codes.
    pub fn room_ids(&self) -> Vec<RoomId> {
        self.rooms.keys().cloned().collect()
    }

    fn handle(&self, room_id: &RoomId) -> Result<&RoomHandle, RoomError> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))
    }

    fn ensure_unseated(&self, player_id: PlayerId) -> Result<(), RoomError> {
        match self.player_rooms.get(&player_id) {
            Some(current) => Err(RoomError::AlreadyInRoom(player_id, current.clone())),
            None => Ok(()),
        }
    }

    /// Draws random codes until one is free.
    fn generate_code(&self) -> RoomId {
        let mut rng = rand::rng();
        loop {
            let code: String = (0..self.config.code_len.max(1))
                .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
                .collect();
            let room_id = RoomId::new(code);
            if !self.rooms.contains_key(&room_id) {
                return room_id;
            }
        }
    }
}
