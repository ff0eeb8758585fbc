//! The session manager: tracks every seated player's session.
//!
//! It's responsible for:
//! - Issuing a session and rejoin token when a connection takes a seat
//! - Remembering which room each seat is in
//! - Validating rejoin tokens and moving sessions to new connections
//! - Expiring tokens after the grace period and dropping dead sessions
//!
//! # Concurrency note
//!
//! `SessionManager` is a plain `HashMap` wrapper with no locking of its
//! own. The server keeps it behind a `Mutex` shared by connection tasks.

use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use rand::Rng;
use wordbattle_protocol::{PlayerId, RoomId};

use crate::{Session, SessionConfig, SessionError, SessionState};

/// Registry of sessions, keyed by the connection that holds each seat.
///
/// ## Lifecycle
///
/// ```text
/// create() ──→ bind_room() ──→ disconnect() ──→ resolve() + transfer()
///    │                              │                    │
///    ▼                              ▼                    ▼
/// [Connected]                [Disconnected]        [Connected, new id]
///                                   │
///                                   ▼ expire_stale()
///                               [Expired] ──→ cleanup_expired()
/// ```
pub struct SessionManager {
    /// All sessions, keyed by the holding connection's player ID.
    sessions: HashMap<PlayerId, Session>,

    /// Rejoin token → current holder. Kept in sync with `sessions`,
    /// including across transfers.
    tokens: HashMap<String, PlayerId>,

    config: SessionConfig,
}

impl SessionManager {
    /// Creates a new, empty session manager with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            tokens: HashMap::new(),
            config,
        }
    }

    /// Creates a session for a connection that just took a seat.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the connection already
    /// holds a connected session.
    pub fn create(&mut self, player_id: PlayerId) -> Result<&Session, SessionError> {
        if let Some(existing) = self.sessions.get(&player_id) {
            if existing.is_connected() {
                return Err(SessionError::AlreadyConnected(player_id));
            }
            self.tokens.remove(&existing.reconnect_token);
        }

        let token = generate_token();
        let session = Session {
            player_id,
            room_id: None,
            state: SessionState::Connected,
            reconnect_token: token.clone(),
        };

        self.tokens.insert(token, player_id);
        tracing::info!(%player_id, "session created");
        Ok(self.sessions.entry(player_id).insert_entry(session).into_mut())
    }

    /// Records which room the session's seat is in.
    pub fn bind_room(&mut self, player_id: PlayerId, room_id: RoomId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        session.room_id = Some(room_id);
        Ok(())
    }

    /// The room a connection's seat is in.
    pub fn room_of(&self, player_id: &PlayerId) -> Option<&RoomId> {
        self.sessions.get(player_id)?.room_id.as_ref()
    }

    /// Marks a connection as gone and starts the grace period.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;

        session.state = SessionState::Disconnected {
            since: Instant::now(),
        };

        tracing::info!(%player_id, "player disconnected, grace period started");
        Ok(())
    }

    /// Looks up the session a rejoin token belongs to.
    ///
    /// A connected session is accepted too: the client may have reopened
    /// its socket before the server noticed the old one close. The new
    /// connection takes over on [`transfer`](Self::transfer).
    ///
    /// # Errors
    /// - [`SessionError::InvalidToken`]: token not recognized
    /// - [`SessionError::SessionExpired`]: grace period elapsed
    pub fn resolve(&mut self, token: &str) -> Result<&Session, SessionError> {
        let player_id = self
            .tokens
            .get(token)
            .copied()
            .ok_or(SessionError::InvalidToken)?;
        let grace = self.grace();

        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::InvalidToken)?;

        let stale = match session.state {
            SessionState::Connected => false,
            SessionState::Disconnected { since } => since.elapsed() > grace,
            SessionState::Expired => return Err(SessionError::SessionExpired(player_id)),
        };
        if stale {
            session.state = SessionState::Expired;
            tracing::info!(%player_id, "rejoin after grace period, session expired");
            return Err(SessionError::SessionExpired(player_id));
        }
        Ok(session)
    }

    /// Moves a session from `previous` to the connection `player_id` and
    /// marks it connected. The token and room binding carry over.
    ///
    /// # Errors
    /// - [`SessionError::NotFound`]: no session for `previous`
    /// - [`SessionError::AlreadyConnected`]: `player_id` holds a session
    ///   of its own
    /// - [`SessionError::SessionExpired`]: the session already expired
    pub fn transfer(
        &mut self,
        previous: PlayerId,
        player_id: PlayerId,
    ) -> Result<&Session, SessionError> {
        self.check_transfer(previous, player_id)?;

        let mut session = self
            .sessions
            .remove(&previous)
            .ok_or(SessionError::NotFound(previous))?;
        session.player_id = player_id;
        session.state = SessionState::Connected;
        self.tokens.insert(session.reconnect_token.clone(), player_id);

        tracing::info!(%previous, %player_id, "session transferred");
        Ok(self.sessions.entry(player_id).insert_entry(session).into_mut())
    }

    /// Reports whether [`transfer`](Self::transfer) would succeed, without
    /// changing anything.
    pub fn check_transfer(
        &self,
        previous: PlayerId,
        player_id: PlayerId,
    ) -> Result<(), SessionError> {
        if previous != player_id && self.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyConnected(player_id));
        }
        match self.sessions.get(&previous).map(|s| &s.state) {
            None => Err(SessionError::NotFound(previous)),
            Some(SessionState::Expired) => Err(SessionError::SessionExpired(previous)),
            Some(_) => Ok(()),
        }
    }

    /// Expires every disconnected session past the grace period.
    ///
    /// Returns the player IDs that were expired.
    pub fn expire_stale(&mut self) -> Vec<PlayerId> {
        let grace = self.grace();
        let mut expired = Vec::new();

        for session in self.sessions.values_mut() {
            if let SessionState::Disconnected { since } = session.state {
                if since.elapsed() > grace {
                    session.state = SessionState::Expired;
                    expired.push(session.player_id);
                    tracing::info!(
                        player_id = %session.player_id,
                        "session expired (grace period elapsed)"
                    );
                }
            }
        }

        expired
    }

    /// Removes expired sessions and their tokens. Returns how many were
    /// removed.
    ///
    /// Kept separate from [`expire_stale`](Self::expire_stale) so callers
    /// can react to expirations before the data is gone.
    pub fn cleanup_expired(&mut self) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            if matches!(session.state, SessionState::Expired) {
                self.tokens.remove(&session.reconnect_token);
                false
            } else {
                true
            }
        });
        before - self.sessions.len()
    }

    /// Drops every session bound to a room that no longer exists.
    pub fn remove_room(&mut self, room_id: &RoomId) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            if session.room_id.as_ref() == Some(room_id) {
                self.tokens.remove(&session.reconnect_token);
                false
            } else {
                true
            }
        });
        before - self.sessions.len()
    }

    /// Rooms that still have a session which is connected or within its
    /// grace period.
    pub fn live_rooms(&self) -> HashSet<RoomId> {
        self.sessions
            .values()
            .filter(|s| !matches!(s.state, SessionState::Expired))
            .filter_map(|s| s.room_id.clone())
            .collect()
    }

    /// Looks up a session by the connection holding it.
    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    /// Returns the number of sessions (any state).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn grace(&self) -> Duration {
        Duration::from_secs(self.config.reconnect_grace_secs)
    }
}

/// Generates a random 32-character hex string (128 bits of entropy).
fn generate_token() -> String {
    let bytes: [u8; 16] = rand::rng().random();
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Unit tests for `SessionManager`, named
    //! `test_{function}_{scenario}_{expected}`.
    //!
    //! Grace-period behavior is tested without sleeping:
    //!   - `reconnect_grace_secs: 0` → disconnected sessions expire at once
    //!   - `reconnect_grace_secs: 3600` → they never expire during a test

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn manager_with_instant_expiry() -> SessionManager {
        SessionManager::new(SessionConfig {
            reconnect_grace_secs: 0,
        })
    }

    fn manager_with_long_grace() -> SessionManager {
        SessionManager::new(SessionConfig {
            reconnect_grace_secs: 3600,
        })
    }

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn room(code: &str) -> RoomId {
        RoomId::new(code)
    }

    /// Creates a session bound to `room_id` and returns its token.
    fn seated(mgr: &mut SessionManager, id: u64, room_id: &str) -> String {
        let token = mgr.create(pid(id)).unwrap().reconnect_token.clone();
        mgr.bind_room(pid(id), room(room_id)).unwrap();
        token
    }

    // =====================================================================
    // create()
    // =====================================================================

    #[test]
    fn test_create_new_player_returns_connected_session() {
        let mut mgr = manager_with_long_grace();

        let session = mgr.create(pid(1)).expect("should succeed");

        assert!(session.is_connected());
        assert_eq!(session.player_id, pid(1));
        assert_eq!(session.room_id, None);
        assert_eq!(session.reconnect_token.len(), 32);
        assert!(session.reconnect_token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_create_multiple_players_each_gets_unique_token() {
        let mut mgr = manager_with_long_grace();
        let token1 = mgr.create(pid(1)).unwrap().reconnect_token.clone();
        let token2 = mgr.create(pid(2)).unwrap().reconnect_token.clone();
        assert_ne!(token1, token2);
    }

    #[test]
    fn test_create_already_connected_returns_error() {
        let mut mgr = manager_with_long_grace();
        mgr.create(pid(1)).unwrap();

        let result = mgr.create(pid(1));

        assert!(matches!(result, Err(SessionError::AlreadyConnected(p)) if p == pid(1)));
    }

    #[test]
    fn test_create_replaces_disconnected_session_and_token() {
        let mut mgr = manager_with_long_grace();
        let old = mgr.create(pid(1)).unwrap().reconnect_token.clone();
        mgr.disconnect(pid(1)).unwrap();

        let new = mgr.create(pid(1)).unwrap().reconnect_token.clone();

        assert_ne!(old, new);
        assert!(matches!(mgr.resolve(&old), Err(SessionError::InvalidToken)));
    }

    // =====================================================================
    // bind_room() / room_of()
    // =====================================================================

    #[test]
    fn test_bind_room_sets_room() {
        let mut mgr = manager_with_long_grace();
        seated(&mut mgr, 1, "ROOM01");
        assert_eq!(mgr.room_of(&pid(1)), Some(&room("ROOM01")));
    }

    #[test]
    fn test_bind_room_unknown_player_returns_not_found() {
        let mut mgr = manager_with_long_grace();
        let result = mgr.bind_room(pid(5), room("ROOM01"));
        assert!(matches!(result, Err(SessionError::NotFound(p)) if p == pid(5)));
        assert_eq!(mgr.room_of(&pid(5)), None);
    }

    // =====================================================================
    // disconnect()
    // =====================================================================

    #[test]
    fn test_disconnect_connected_player_becomes_disconnected() {
        let mut mgr = manager_with_long_grace();
        seated(&mut mgr, 1, "ROOM01");

        mgr.disconnect(pid(1)).unwrap();

        let session = mgr.get(&pid(1)).unwrap();
        assert!(matches!(session.state, SessionState::Disconnected { .. }));
        assert_eq!(session.room_id, Some(room("ROOM01")));
    }

    #[test]
    fn test_disconnect_unknown_player_returns_not_found() {
        let mut mgr = manager_with_long_grace();
        let result = mgr.disconnect(pid(99));
        assert!(matches!(result, Err(SessionError::NotFound(p)) if p == pid(99)));
    }

    // =====================================================================
    // resolve()
    // =====================================================================

    #[test]
    fn test_resolve_disconnected_within_grace_returns_session() {
        let mut mgr = manager_with_long_grace();
        let token = seated(&mut mgr, 1, "ROOM01");
        mgr.disconnect(pid(1)).unwrap();

        let session = mgr.resolve(&token).unwrap();

        assert_eq!(session.player_id, pid(1));
        assert_eq!(session.room_id, Some(room("ROOM01")));
    }

    #[test]
    fn test_resolve_connected_session_allows_takeover() {
        let mut mgr = manager_with_long_grace();
        let token = seated(&mut mgr, 1, "ROOM01");
        assert_eq!(mgr.resolve(&token).unwrap().player_id, pid(1));
    }

    #[test]
    fn test_resolve_unknown_token_returns_invalid() {
        let mut mgr = manager_with_long_grace();
        seated(&mut mgr, 1, "ROOM01");
        assert!(matches!(mgr.resolve("not-a-real-token"), Err(SessionError::InvalidToken)));
    }

    #[test]
    fn test_resolve_after_grace_period_returns_expired() {
        let mut mgr = manager_with_instant_expiry();
        let token = seated(&mut mgr, 1, "ROOM01");
        mgr.disconnect(pid(1)).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let result = mgr.resolve(&token);

        assert!(matches!(result, Err(SessionError::SessionExpired(p)) if p == pid(1)));
        assert!(matches!(mgr.get(&pid(1)).unwrap().state, SessionState::Expired));
    }

    // =====================================================================
    // transfer()
    // =====================================================================

    #[test]
    fn test_transfer_moves_session_and_keeps_token() {
        let mut mgr = manager_with_long_grace();
        let token = seated(&mut mgr, 1, "ROOM01");
        mgr.disconnect(pid(1)).unwrap();

        let session = mgr.transfer(pid(1), pid(7)).unwrap();
        assert_eq!(session.player_id, pid(7));
        assert!(session.is_connected());
        assert_eq!(session.reconnect_token, token);

        assert!(mgr.get(&pid(1)).is_none());
        assert_eq!(mgr.room_of(&pid(7)), Some(&room("ROOM01")));
        assert_eq!(mgr.resolve(&token).unwrap().player_id, pid(7));
        assert_eq!(mgr.len(), 1);
    }

    #[test]
    fn test_transfer_to_seated_connection_returns_already_connected() {
        let mut mgr = manager_with_long_grace();
        seated(&mut mgr, 1, "ROOM01");
        seated(&mut mgr, 2, "ROOM02");

        let result = mgr.transfer(pid(1), pid(2));

        assert!(matches!(result, Err(SessionError::AlreadyConnected(p)) if p == pid(2)));
        assert_eq!(mgr.room_of(&pid(1)), Some(&room("ROOM01")));
    }

    #[test]
    fn test_transfer_unknown_session_returns_not_found() {
        let mut mgr = manager_with_long_grace();
        let result = mgr.transfer(pid(1), pid(2));
        assert!(matches!(result, Err(SessionError::NotFound(p)) if p == pid(1)));
    }

    #[test]
    fn test_check_transfer_after_expiry_returns_expired_and_changes_nothing() {
        let mut mgr = manager_with_instant_expiry();
        let token = seated(&mut mgr, 1, "ROOM01");
        mgr.disconnect(pid(1)).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        mgr.expire_stale();

        let result = mgr.check_transfer(pid(1), pid(7));

        assert!(matches!(result, Err(SessionError::SessionExpired(p)) if p == pid(1)));
        assert!(mgr.get(&pid(7)).is_none());
        assert!(mgr.resolve(&token).is_err());
    }

    #[test]
    fn test_check_transfer_agrees_with_transfer() {
        let mut mgr = manager_with_long_grace();
        seated(&mut mgr, 1, "ROOM01");
        seated(&mut mgr, 2, "ROOM02");

        assert!(mgr.check_transfer(pid(1), pid(2)).is_err());
        assert!(mgr.check_transfer(pid(1), pid(7)).is_ok());
        assert!(mgr.check_transfer(pid(1), pid(1)).is_ok());
        assert!(mgr.transfer(pid(1), pid(7)).is_ok());
        assert!(matches!(
            mgr.check_transfer(pid(1), pid(8)),
            Err(SessionError::NotFound(p)) if p == pid(1)
        ));
    }

    // =====================================================================
    // expire_stale() / cleanup_expired() / remove_room()
    // =====================================================================

    #[test]
    fn test_expire_stale_only_touches_disconnected() {
        let mut mgr = manager_with_instant_expiry();
        seated(&mut mgr, 1, "ROOM01");
        seated(&mut mgr, 2, "ROOM01");
        mgr.disconnect(pid(2)).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        let expired = mgr.expire_stale();

        assert_eq!(expired, vec![pid(2)]);
        assert!(mgr.get(&pid(1)).unwrap().is_connected());
    }

    #[test]
    fn test_cleanup_expired_removes_session_and_token() {
        let mut mgr = manager_with_instant_expiry();
        let token = seated(&mut mgr, 1, "ROOM01");
        mgr.disconnect(pid(1)).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        mgr.expire_stale();

        assert_eq!(mgr.cleanup_expired(), 1);
        assert!(mgr.is_empty());
        assert!(matches!(mgr.resolve(&token), Err(SessionError::InvalidToken)));
    }

    #[test]
    fn test_remove_room_drops_bound_sessions() {
        let mut mgr = manager_with_long_grace();
        let token = seated(&mut mgr, 1, "ROOM01");
        seated(&mut mgr, 2, "ROOM02");

        assert_eq!(mgr.remove_room(&room("ROOM01")), 1);
        assert!(mgr.get(&pid(1)).is_none());
        assert!(mgr.get(&pid(2)).is_some());
        assert!(matches!(mgr.resolve(&token), Err(SessionError::InvalidToken)));
    }

    #[test]
    fn test_live_rooms_skips_expired_sessions() {
        let mut mgr = manager_with_instant_expiry();
        seated(&mut mgr, 1, "ROOM01");
        seated(&mut mgr, 2, "ROOM02");
        mgr.disconnect(pid(2)).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        mgr.expire_stale();

        let live = mgr.live_rooms();
        assert!(live.contains(&room("ROOM01")));
        assert!(!live.contains(&room("ROOM02")));
    }
}
