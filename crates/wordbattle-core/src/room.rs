//! The per-room turn engine.
//!
//! [`Room`] is a plain synchronous state machine. Every method runs to
//! completion, checks its guards before touching any state, and returns
//! the events it produced as `(Recipient, ServerEvent)` pairs. The caller
//! owns delivery and the clock: it arms a timer from [`Room::deadline`]
//! and reports expiry through [`Room::on_timeout`].

use std::sync::Arc;
use std::time::Duration;

use wordbattle_protocol::{
    CellRef, GameState, PlayerId, PlayerSummary, RankEntry, Recipient, RejectReason, RoomId,
    ServerEvent,
};

use crate::{Dictionary, GameConfig, Grid, Outbound, Player, UsedWords, validator};

/// Identifies one turn's deadline.
///
/// Every turn start issues a fresh token. A timeout carrying any other
/// token belongs to a turn that already ended and is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TurnToken(u64);

/// The armed deadline of the current turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    pub token: TurnToken,
    pub duration: Duration,
}

/// An accepted word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredWord {
    pub word: String,
    pub points: u32,
}

/// Outcome of a word attempt that got past the turn guards.
///
/// The turn ended either way; `verdict` says whether the word counted.
#[derive(Debug)]
pub struct WordAttempt {
    pub verdict: Result<ScoredWord, RejectReason>,
    pub events: Vec<Outbound>,
}

/// One game: grid, seats, used words and turn state.
pub struct Room {
    id: RoomId,
    config: GameConfig,
    dictionary: Arc<dyn Dictionary>,
    players: Vec<Player>,
    grid: Grid,
    used_words: UsedWords,
    owner: Option<PlayerId>,
    current: usize,
    state: GameState,
    letter_placed: bool,
    turns: u64,
    deadline: Option<Deadline>,
}

impl Room {
    pub fn new(id: RoomId, config: GameConfig, dictionary: Arc<dyn Dictionary>) -> Self {
        let grid = Grid::new(config.rows, config.cols);
        Self {
            id,
            config,
            dictionary,
            players: Vec::new(),
            grid,
            used_words: UsedWords::new(),
            owner: None,
            current: 0,
            state: GameState::Lobby,
            letter_placed: false,
            turns: 0,
            deadline: None,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id() == id)
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn used_words(&self) -> &UsedWords {
        &self.used_words
    }

    pub fn letter_placed(&self) -> bool {
        self.letter_placed
    }

    /// The player whose turn it is, while a game is running.
    pub fn current_player(&self) -> Option<PlayerId> {
        if !self.state.is_in_progress() {
            return None;
        }
        self.players.get(self.current).map(Player::id)
    }

    /// The deadline the caller should have armed right now, if any.
    pub fn deadline(&self) -> Option<Deadline> {
        self.deadline
    }

    // -----------------------------------------------------------------
    // Lobby
    // -----------------------------------------------------------------

    /// Seats a new player. The first player to sit down owns the room.
    pub fn add_player(&mut self, id: PlayerId, name: &str) -> Result<Vec<Outbound>, RejectReason> {
        self.ensure_lobby()?;
        let name = name.trim();
        if name.is_empty() || name.chars().count() > self.config.name_max_len {
            return Err(RejectReason::InvalidName);
        }
        if self.has_player(id) {
            return Err(RejectReason::AlreadyInRoom);
        }
        if self.players.len() >= self.config.max_players {
            return Err(RejectReason::RoomFull);
        }

        self.players.push(Player::new(id, name, self.config.starting_lives));

        let event = match self.owner {
            None => {
                self.owner = Some(id);
                ServerEvent::RoomCreated {
                    room_id: self.id.clone(),
                    owner_id: id,
                    players: self.roster(),
                }
            }
            Some(_) => ServerEvent::PlayerJoined {
                players: self.roster(),
            },
        };
        Ok(vec![(Recipient::All, event)])
    }

    /// Owner only. Moves to `IN_PROGRESS` and starts the first turn.
    pub fn start_game(&mut self, sender: PlayerId) -> Result<Vec<Outbound>, RejectReason> {
        self.ensure_lobby()?;
        if self.owner != Some(sender) {
            return Err(RejectReason::OnlyOwnerCanStart);
        }
        if self.players.len() < self.config.min_players.max(2) {
            return Err(RejectReason::NeedAtLeastTwoPlayers);
        }

        self.transition(GameState::InProgress);
        self.current = 0;
        tracing::info!(room_id = %self.id, players = self.players.len(), "game started");

        let mut events = vec![(Recipient::All, ServerEvent::GameStarted)];
        self.start_turn(&mut events);
        Ok(events)
    }

    // -----------------------------------------------------------------
    // Turn actions
    // -----------------------------------------------------------------

    /// Fills one cell. Allowed once per turn, for the current player.
    pub fn place_letter(
        &mut self,
        sender: PlayerId,
        row: i32,
        col: i32,
        letter: char,
    ) -> Result<Vec<Outbound>, RejectReason> {
        self.ensure_started()?;
        self.ensure_current(sender)?;
        if self.letter_placed {
            return Err(RejectReason::LetterAlreadyPlaced);
        }

        let letter = self.grid.place_letter(row, col, letter)?;
        self.letter_placed = true;

        Ok(vec![(
            Recipient::All,
            ServerEvent::LetterPlaced {
                row,
                col,
                letter,
                player_id: sender,
            },
        )])
    }

    /// Claims the word under `cells`.
    ///
    /// Turn guards (`Err`) change nothing. Past them the turn always ends,
    /// whether or not the word is accepted: a refused word still costs the
    /// turn and its reason goes to the sender alone.
    pub fn attempt_word(
        &mut self,
        sender: PlayerId,
        cells: &[CellRef],
    ) -> Result<WordAttempt, RejectReason> {
        self.ensure_started()?;
        if !self.letter_placed {
            return Err(RejectReason::MustPlaceLetterFirst);
        }
        self.ensure_current(sender)?;

        let mut events = Vec::new();
        let verdict = self.judge(cells);
        match &verdict {
            Ok(scored) => {
                self.used_words.insert(scored.word.clone());
                self.players[self.current].add_score(scored.points);
                tracing::debug!(room_id = %self.id, %sender, word = %scored.word, "word accepted");
                events.push((
                    Recipient::All,
                    ServerEvent::WordResult {
                        player_id: sender,
                        word: scored.word.clone(),
                        points: scored.points,
                    },
                ));
            }
            Err(reason) => {
                tracing::debug!(room_id = %self.id, %sender, %reason, "word refused");
                events.push((
                    Recipient::Player(sender),
                    ServerEvent::MoveRejected { reason: *reason },
                ));
            }
        }

        self.end_turn(&mut events);
        Ok(WordAttempt { verdict, events })
    }

    /// Ends the turn without a word. A letter must have been placed.
    pub fn pass_turn(&mut self, sender: PlayerId) -> Result<Vec<Outbound>, RejectReason> {
        self.ensure_started()?;
        if !self.letter_placed {
            return Err(RejectReason::MustPlaceLetterFirst);
        }
        self.ensure_current(sender)?;

        let mut events = Vec::new();
        self.end_turn(&mut events);
        Ok(events)
    }

    /// The one-shot "I'm back". Not tied to the turn: any seated player on
    /// their last life may use it.
    pub fn revive(&mut self, sender: PlayerId) -> Result<Vec<Outbound>, RejectReason> {
        if self.state == GameState::Ended {
            return Err(RejectReason::GameOver);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == sender)
            .ok_or(RejectReason::PlayerNotFound)?;
        if !player.reset_lives() {
            return Err(RejectReason::ImBackNotAllowed);
        }

        tracing::info!(room_id = %self.id, player_id = %sender, "player revived");
        Ok(vec![(
            Recipient::All,
            ServerEvent::ImBackOk {
                player_id: sender,
                lives: player.lives(),
            },
        )])
    }

    /// The current turn's deadline elapsed.
    ///
    /// A stale `token` (the turn already ended) produces no events.
    pub fn on_timeout(&mut self, token: TurnToken) -> Vec<Outbound> {
        if self.deadline.map(|d| d.token) != Some(token) {
            tracing::debug!(room_id = %self.id, ?token, "stale deadline ignored");
            return Vec::new();
        }
        self.deadline = None;

        let mut events = Vec::new();
        let player = &mut self.players[self.current];
        player.lose_life();
        let (player_id, lives, active) = (player.id(), player.lives(), player.is_active());

        tracing::debug!(room_id = %self.id, %player_id, lives, "turn timed out");
        events.push((Recipient::All, ServerEvent::LifeLost { player_id, lives }));
        if !active {
            tracing::info!(room_id = %self.id, %player_id, "player eliminated");
            events.push((Recipient::All, ServerEvent::PlayerEliminated { player_id }));
        }

        if !self.check_game_over(&mut events) {
            self.next_turn();
            self.start_turn(&mut events);
        }
        events
    }

    // -----------------------------------------------------------------
    // Room extras
    // -----------------------------------------------------------------

    /// Relays a chat line under the sender's seated name.
    pub fn chat(&self, sender: PlayerId, message: &str) -> Result<Vec<Outbound>, RejectReason> {
        let player = self.player(sender).ok_or(RejectReason::NotInRoom)?;
        let message = message.trim();
        if message.is_empty() || message.chars().count() > self.config.chat_max_len {
            return Err(RejectReason::InvalidMessage);
        }
        Ok(vec![(
            Recipient::All,
            ServerEvent::ChatMessage {
                player_id: sender,
                name: player.name().to_owned(),
                message: message.to_owned(),
            },
        )])
    }

    /// Finds the seat a name-only rejoin should take.
    ///
    /// Matches only when exactly one seat carries `name`, so two players
    /// sharing a name can never take each other's seat.
    pub fn find_rejoin_seat(&self, name: &str) -> Option<PlayerId> {
        if !self.config.name_rejoin {
            return None;
        }
        let name = name.trim();
        let mut matches = self.players.iter().filter(|p| p.name() == name);
        match (matches.next(), matches.next()) {
            (Some(player), None) => Some(player.id()),
            _ => None,
        }
    }

    /// Moves a seat from `previous` to the connection `id`.
    ///
    /// The rejoining connection gets a full snapshot and everyone else
    /// learns the new id. `time_remaining` is what is left on the
    /// caller's clock for the current turn.
    pub fn rebind(
        &mut self,
        previous: PlayerId,
        id: PlayerId,
        time_remaining: Duration,
    ) -> Result<Vec<Outbound>, RejectReason> {
        if previous != id && self.has_player(id) {
            return Err(RejectReason::AlreadyInRoom);
        }
        let player = self
            .players
            .iter_mut()
            .find(|p| p.id() == previous)
            .ok_or(RejectReason::PlayerNotFound)?;
        player.rebind(id);
        if self.owner == Some(previous) {
            self.owner = Some(id);
        }

        tracing::info!(room_id = %self.id, %previous, player_id = %id, "seat rebound");

        let snapshot = ServerEvent::RejoinSuccess {
            room_id: self.id.clone(),
            player_id: id,
            owner_id: self.owner,
            state: self.state,
            players: self.players.iter().map(Player::standing).collect(),
            grid: self.grid.to_rows(),
            current_player_id: self.current_player(),
            time_limit: self.config.time_limit_secs(),
            time_remaining: if self.deadline.is_some() {
                time_remaining.as_secs()
            } else {
                0
            },
        };
        Ok(vec![
            (Recipient::Player(id), snapshot),
            (
                Recipient::AllExcept(id),
                ServerEvent::PlayerRejoined {
                    previous_id: previous,
                    player_id: id,
                },
            ),
        ])
    }

    /// Final standings: best score first, ties in seating order.
    pub fn ranking(&self) -> Vec<RankEntry> {
        let mut order: Vec<&Player> = self.players.iter().collect();
        order.sort_by(|a, b| b.score().cmp(&a.score()));
        order
            .into_iter()
            .take(self.config.ranking_size)
            .zip(1u32..)
            .map(|(p, rank)| RankEntry {
                rank,
                id: p.id(),
                name: p.name().to_owned(),
                score: p.score(),
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------

    fn ensure_lobby(&self) -> Result<(), RejectReason> {
        if self.state.is_joinable() {
            return Ok(());
        }
        Err(if self.state.is_in_progress() {
            RejectReason::GameAlreadyStarted
        } else {
            RejectReason::GameOver
        })
    }

    fn transition(&mut self, target: GameState) {
        debug_assert!(
            self.state.can_transition_to(target),
            "illegal state change {} -> {target}",
            self.state
        );
        self.state = target;
    }

    fn ensure_started(&self) -> Result<(), RejectReason> {
        match self.state {
            GameState::Lobby => Err(RejectReason::GameNotStarted),
            GameState::InProgress => Ok(()),
            GameState::Ended => Err(RejectReason::GameOver),
        }
    }

    fn ensure_current(&self, sender: PlayerId) -> Result<(), RejectReason> {
        let current = &self.players[self.current];
        if current.id() != sender {
            return Err(if self.has_player(sender) {
                RejectReason::NotYourTurn
            } else {
                RejectReason::NotInRoom
            });
        }
        if !current.is_active() {
            return Err(RejectReason::PlayerEliminated);
        }
        Ok(())
    }

    /// Validation after the turn guards, cheapest first.
    fn judge(&self, cells: &[CellRef]) -> Result<ScoredWord, RejectReason> {
        let word = validator::read_selection(cells, &self.grid)?;
        if !self.dictionary.contains(&word) {
            return Err(RejectReason::InvalidEnglishWord);
        }
        self.used_words.check(&word)?;
        let points = word.chars().count() as u32;
        Ok(ScoredWord { word, points })
    }

    fn end_turn(&mut self, events: &mut Vec<Outbound>) {
        self.deadline = None;
        if !self.check_game_over(events) {
            self.next_turn();
            self.start_turn(events);
        }
    }

    /// Moves to the next active seat, scanning at most one full lap. If
    /// nobody is active the index stays put.
    fn next_turn(&mut self) {
        let n = self.players.len();
        if let Some(next) = (1..=n)
            .map(|step| (self.current + step) % n)
            .find(|&i| self.players[i].is_active())
        {
            self.current = next;
        }
    }

    fn start_turn(&mut self, events: &mut Vec<Outbound>) {
        self.turns += 1;
        self.letter_placed = false;
        self.deadline = Some(Deadline {
            token: TurnToken(self.turns),
            duration: self.config.turn_time,
        });
        events.push((
            Recipient::All,
            ServerEvent::TurnUpdate {
                current_player_id: self.players[self.current].id(),
                time_limit: self.config.time_limit_secs(),
            },
        ));
    }

    fn check_game_over(&mut self, events: &mut Vec<Outbound>) -> bool {
        let active = self.players.iter().filter(|p| p.is_active()).count();
        if active > 1 && !self.grid.is_full() {
            return false;
        }

        self.transition(GameState::Ended);
        self.deadline = None;
        let ranking = self.ranking();
        tracing::info!(room_id = %self.id, active, grid_full = self.grid.is_full(), "game ended");
        events.push((Recipient::All, ServerEvent::GameEnded { ranking }));
        true
    }

    fn roster(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(Player::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordList;

    fn pid(n: u64) -> PlayerId {
        PlayerId(n)
    }

    fn room_with(players: u64) -> Room {
        let dict = Arc::new(WordList::from_words(["CAT", "CATS", "DOG"]));
        let mut room = Room::new(RoomId::new("TEST01"), GameConfig::default(), dict);
        for n in 1..=players {
            room.add_player(pid(n), &format!("p{n}")).unwrap();
        }
        room
    }

    #[test]
    fn test_add_player_first_is_owner() {
        let room = room_with(1);
        assert_eq!(room.owner(), Some(pid(1)));
        assert_eq!(room.state(), GameState::Lobby);
    }

    #[test]
    fn test_add_player_emits_created_then_joined() {
        let dict = Arc::new(WordList::default());
        let mut room = Room::new(RoomId::new("R"), GameConfig::default(), dict);

        let events = room.add_player(pid(1), "ana").unwrap();
        assert!(matches!(
            events[0].1,
            ServerEvent::RoomCreated { owner_id, .. } if owner_id == pid(1)
        ));

        let events = room.add_player(pid(2), "bo").unwrap();
        match &events[0].1 {
            ServerEvent::PlayerJoined { players } => assert_eq!(players.len(), 2),
            other => panic!("expected PlayerJoined, got {other:?}"),
        }
    }

    #[test]
    fn test_add_player_rejects_bad_names() {
        let mut room = room_with(1);
        assert_eq!(room.add_player(pid(2), "   "), Err(RejectReason::InvalidName));
        let long = "x".repeat(21);
        assert_eq!(room.add_player(pid(2), &long), Err(RejectReason::InvalidName));
    }

    #[test]
    fn test_add_player_twice_is_rejected() {
        let mut room = room_with(1);
        assert_eq!(room.add_player(pid(1), "again"), Err(RejectReason::AlreadyInRoom));
    }

    #[test]
    fn test_add_player_full_room() {
        let mut room = room_with(8);
        assert_eq!(room.add_player(pid(9), "late"), Err(RejectReason::RoomFull));
    }

    #[test]
    fn test_start_game_requires_owner() {
        let mut room = room_with(2);
        assert_eq!(room.start_game(pid(2)), Err(RejectReason::OnlyOwnerCanStart));
        assert_eq!(room.state(), GameState::Lobby);
    }

    #[test]
    fn test_start_game_requires_two_players() {
        let mut room = room_with(1);
        assert_eq!(room.start_game(pid(1)), Err(RejectReason::NeedAtLeastTwoPlayers));
    }

    #[test]
    fn test_start_game_arms_first_turn() {
        let mut room = room_with(2);
        let events = room.start_game(pid(1)).unwrap();
        assert_eq!(events[0].1, ServerEvent::GameStarted);
        assert_eq!(
            events[1].1,
            ServerEvent::TurnUpdate {
                current_player_id: pid(1),
                time_limit: 40
            }
        );
        assert_eq!(room.current_player(), Some(pid(1)));
        assert_eq!(room.deadline().map(|d| d.duration), Some(Duration::from_secs(40)));
    }

    #[test]
    fn test_join_after_start_is_rejected() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        assert_eq!(room.add_player(pid(3), "late"), Err(RejectReason::GameAlreadyStarted));
    }

    #[test]
    fn test_place_letter_guards_do_not_mutate() {
        let mut room = room_with(2);
        assert_eq!(room.place_letter(pid(1), 0, 0, 'C'), Err(RejectReason::GameNotStarted));

        room.start_game(pid(1)).unwrap();
        assert_eq!(room.place_letter(pid(2), 0, 0, 'C'), Err(RejectReason::NotYourTurn));
        assert_eq!(room.place_letter(pid(7), 0, 0, 'C'), Err(RejectReason::NotInRoom));
        assert_eq!(room.grid().get_letter(0, 0), None);
        assert!(!room.letter_placed());
    }

    #[test]
    fn test_failed_placement_keeps_gate_closed() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        assert_eq!(room.place_letter(pid(1), 15, 0, 'C'), Err(RejectReason::OutOfBounds));
        assert!(!room.letter_placed());
        assert!(room.place_letter(pid(1), 0, 0, 'C').is_ok());
    }

    #[test]
    fn test_pass_turn_requires_letter() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        assert_eq!(room.pass_turn(pid(1)), Err(RejectReason::MustPlaceLetterFirst));

        room.place_letter(pid(1), 0, 0, 'C').unwrap();
        let events = room.pass_turn(pid(1)).unwrap();
        assert_eq!(room.current_player(), Some(pid(2)));
        assert!(matches!(
            events.last().unwrap().1,
            ServerEvent::TurnUpdate { current_player_id, .. } if current_player_id == pid(2)
        ));
    }

    #[test]
    fn test_attempt_guard_letter_before_turn_owner() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        let err = room.attempt_word(pid(2), &[CellRef::new(0, 0)]).unwrap_err();
        assert_eq!(err, RejectReason::MustPlaceLetterFirst);

        room.place_letter(pid(1), 0, 0, 'C').unwrap();
        let err = room.attempt_word(pid(2), &[CellRef::new(0, 0)]).unwrap_err();
        assert_eq!(err, RejectReason::NotYourTurn);
        assert_eq!(room.current_player(), Some(pid(1)));
    }

    #[test]
    fn test_refused_word_goes_to_sender_only() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        room.place_letter(pid(1), 0, 0, 'Z').unwrap();

        let attempt = room.attempt_word(pid(1), &[CellRef::new(0, 0)]).unwrap();
        assert_eq!(attempt.verdict, Err(RejectReason::InvalidEnglishWord));
        assert_eq!(
            attempt.events[0],
            (
                Recipient::Player(pid(1)),
                ServerEvent::MoveRejected {
                    reason: RejectReason::InvalidEnglishWord
                }
            )
        );
        assert_eq!(room.current_player(), Some(pid(2)));
    }

    #[test]
    fn test_timeout_with_stale_token_is_ignored() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        let stale = room.deadline().unwrap().token;

        room.place_letter(pid(1), 0, 0, 'C').unwrap();
        room.pass_turn(pid(1)).unwrap();

        assert!(room.on_timeout(stale).is_empty());
        assert_eq!(room.player(pid(1)).unwrap().lives(), 2);
        assert_eq!(room.current_player(), Some(pid(2)));
    }

    #[test]
    fn test_revive_refused_after_game_over() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();
        let token = room.deadline().unwrap().token;
        room.on_timeout(token);
        let token = room.deadline().unwrap().token;
        room.on_timeout(token);
        let token = room.deadline().unwrap().token;
        room.on_timeout(token);
        assert_eq!(room.state(), GameState::Ended);
        assert_eq!(room.revive(pid(2)), Err(RejectReason::GameOver));
    }

    #[test]
    fn test_state_only_moves_forward() {
        let mut room = room_with(2);
        let mut seen = vec![room.state()];
        room.start_game(pid(1)).unwrap();
        seen.push(room.state());
        while room.state().is_in_progress() {
            let token = room.deadline().unwrap().token;
            room.on_timeout(token);
        }
        seen.push(room.state());

        assert_eq!(seen, [GameState::Lobby, GameState::InProgress, GameState::Ended]);
        assert!(seen.windows(2).all(|w| w[0].can_transition_to(w[1])));
        assert_eq!(room.add_player(pid(3), "late"), Err(RejectReason::GameOver));
        assert_eq!(room.start_game(pid(1)), Err(RejectReason::GameOver));
    }

    #[test]
    fn test_chat_uses_seated_name() {
        let room = room_with(2);
        let events = room.chat(pid(2), "  hello ").unwrap();
        assert_eq!(
            events[0].1,
            ServerEvent::ChatMessage {
                player_id: pid(2),
                name: "p2".into(),
                message: "hello".into()
            }
        );
        assert_eq!(room.chat(pid(2), " "), Err(RejectReason::InvalidMessage));
        assert_eq!(room.chat(pid(9), "hi"), Err(RejectReason::NotInRoom));
    }

    #[test]
    fn test_find_rejoin_seat_requires_unique_name() {
        let dict = Arc::new(WordList::default());
        let mut room = Room::new(RoomId::new("R"), GameConfig::default(), dict);
        room.add_player(pid(1), "ana").unwrap();
        room.add_player(pid(2), "bo").unwrap();
        room.add_player(pid(3), "bo").unwrap();

        assert_eq!(room.find_rejoin_seat("ana"), Some(pid(1)));
        assert_eq!(room.find_rejoin_seat("bo"), None);
        assert_eq!(room.find_rejoin_seat("cy"), None);
    }

    #[test]
    fn test_find_rejoin_seat_disabled_by_config() {
        let dict = Arc::new(WordList::default());
        let config = GameConfig {
            name_rejoin: false,
            ..GameConfig::default()
        };
        let mut room = Room::new(RoomId::new("R"), config, dict);
        room.add_player(pid(1), "ana").unwrap();
        assert_eq!(room.find_rejoin_seat("ana"), None);
    }

    #[test]
    fn test_rebind_moves_owner_and_turn() {
        let mut room = room_with(2);
        room.start_game(pid(1)).unwrap();

        let events = room.rebind(pid(1), pid(11), Duration::from_secs(25)).unwrap();
        assert_eq!(room.owner(), Some(pid(11)));
        assert_eq!(room.current_player(), Some(pid(11)));
        assert!(!room.has_player(pid(1)));

        match &events[0] {
            (Recipient::Player(to), ServerEvent::RejoinSuccess { time_remaining, players, .. }) => {
                assert_eq!(*to, pid(11));
                assert_eq!(*time_remaining, 25);
                assert_eq!(players[0].id, pid(11));
            }
            other => panic!("expected RejoinSuccess, got {other:?}"),
        }
        assert_eq!(
            events[1],
            (
                Recipient::AllExcept(pid(11)),
                ServerEvent::PlayerRejoined {
                    previous_id: pid(1),
                    player_id: pid(11)
                }
            )
        );
    }

    #[test]
    fn test_rebind_unknown_seat() {
        let mut room = room_with(2);
        assert_eq!(
            room.rebind(pid(5), pid(6), Duration::ZERO).unwrap_err(),
            RejectReason::PlayerNotFound
        );
        assert_eq!(
            room.rebind(pid(1), pid(2), Duration::ZERO).unwrap_err(),
            RejectReason::AlreadyInRoom
        );
    }
}
