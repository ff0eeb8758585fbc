//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task and talks to the outside world through
//! an mpsc channel. The task is the only owner of its [`Room`] and its
//! turn timer, so actions and timeouts for one room are applied strictly
//! one after another without any locking, and rooms never share state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use wordbattle_core::{Dictionary, Outbound, Room, TurnToken};
use wordbattle_protocol::{
    CellRef, GameState, PlayerId, Recipient, RejectReason, RoomId, ServerEvent,
};
use wordbattle_timer::TurnTimer;

use crate::{RoomConfig, RoomError};

/// Channel sender for delivering events to one connection.
pub type PlayerSender = mpsc::UnboundedSender<ServerEvent>;

/// An in-room action from a seated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomAction {
    Start,
    PlaceLetter { row: i32, col: i32, letter: char },
    AttemptWord { cells: Vec<CellRef> },
    PassTurn,
    ImBack,
    Chat { message: String },
}

/// Which seat a rejoining connection is asking for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejoinTarget {
    /// A seat resolved from a rejoin token.
    Seat(PlayerId),
    /// Whichever seat uniquely carries this display name.
    Name(String),
}

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is the reply channel: the caller
/// sends the command and waits for the answer on it.
pub(crate) enum RoomCommand {
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), RejectReason>>,
    },

    /// Fire-and-forget. Rejections go straight to the sender's channel.
    Action {
        sender: PlayerId,
        action: RoomAction,
    },

    Rejoin {
        target: RejoinTarget,
        player_id: PlayerId,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<PlayerId, RejectReason>>,
    },

    /// The connection is gone. Its seat stays in the game.
    Disconnect {
        player_id: PlayerId,
    },

    GetInfo {
        reply: oneshot::Sender<RoomInfo>,
    },

    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub room_id: RoomId,
    pub state: GameState,
    /// Seats taken, connected or not.
    pub player_count: usize,
    /// Seats with a live connection.
    pub connected: usize,
    pub max_players: usize,
    pub current_player: Option<PlayerId>,
    /// Turn deadlines that have elapsed since the room opened.
    pub turn_timeouts: u64,
}

/// Handle to a running room actor.
///
/// Cheap to clone: it's an `mpsc::Sender` and the room code. The
/// `RoomManager` holds one of these per room.
#[derive(Clone)]
pub struct RoomHandle {
    room_id: RoomId,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    /// Returns the room's code.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Seats a player and subscribes `sender` to the room's events.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Join {
            player_id,
            name,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?.map_err(RoomError::from)
    }

    /// Delivers an in-room action (fire-and-forget).
    pub async fn act(&self, sender: PlayerId, action: RoomAction) -> Result<(), RoomError> {
        self.send(RoomCommand::Action { sender, action }).await
    }

    /// Moves a seat to `player_id`. Returns the id the seat had before.
    pub async fn rejoin(
        &self,
        target: RejoinTarget,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<PlayerId, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::Rejoin {
            target,
            player_id,
            sender,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(|_| self.unavailable())?.map_err(RoomError::from)
    }

    /// Unsubscribes a closed connection.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), RoomError> {
        self.send(RoomCommand::Disconnect { player_id }).await
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(RoomCommand::GetInfo { reply: reply_tx }).await?;
        reply_rx.await.map_err(|_| self.unavailable())
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.send(RoomCommand::Shutdown).await
    }

    async fn send(&self, cmd: RoomCommand) -> Result<(), RoomError> {
        self.sender.send(cmd).await.map_err(|_| self.unavailable())
    }

    fn unavailable(&self) -> RoomError {
        RoomError::Unavailable(self.room_id.clone())
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    timer: TurnTimer<TurnToken>,
    /// Outbound channels of connected seats.
    members: HashMap<PlayerId, PlayerSender>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop until shutdown or until every handle is gone.
    async fn run(mut self) {
        tracing::info!(room_id = %self.room.id(), "room actor started");

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle(cmd) {
                        break;
                    }
                }
                token = self.timer.expired() => {
                    tracing::debug!(
                        room_id = %self.room.id(),
                        timeouts = self.timer.fired(),
                        "turn deadline elapsed"
                    );
                    let events = self.room.on_timeout(token);
                    self.dispatch(events);
                }
            }
            // Whatever just happened, the armed deadline now matches the
            // room's current turn.
            self.timer
                .sync(self.room.deadline().map(|d| (d.token, d.duration)));
        }

        tracing::info!(room_id = %self.room.id(), "room actor stopped");
    }

    /// Applies one command. Returns `false` to stop the actor.
    fn handle(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player_id,
                name,
                sender,
                reply,
            } => {
                let result = self.handle_join(player_id, &name, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Action { sender, action } => {
                self.handle_action(sender, action);
            }
            RoomCommand::Rejoin {
                target,
                player_id,
                sender,
                reply,
            } => {
                let result = self.handle_rejoin(target, player_id, sender);
                let _ = reply.send(result);
            }
            RoomCommand::Disconnect { player_id } => {
                if self.members.remove(&player_id).is_some() {
                    tracing::info!(
                        room_id = %self.room.id(),
                        %player_id,
                        connected = self.members.len(),
                        "member disconnected"
                    );
                }
            }
            RoomCommand::GetInfo { reply } => {
                let _ = reply.send(self.info());
            }
            RoomCommand::Shutdown => {
                tracing::info!(room_id = %self.room.id(), "room shutting down");
                return false;
            }
        }
        true
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: &str,
        sender: PlayerSender,
    ) -> Result<(), RejectReason> {
        let events = self.room.add_player(player_id, name)?;
        self.members.insert(player_id, sender);
        tracing::info!(
            room_id = %self.room.id(),
            %player_id,
            players = self.room.players().len(),
            "player joined"
        );
        self.dispatch(events);
        Ok(())
    }

    fn handle_action(&mut self, sender: PlayerId, action: RoomAction) {
        if !self.members.contains_key(&sender) {
            tracing::warn!(room_id = %self.room.id(), %sender, "action from non-member, ignoring");
            return;
        }

        let result = match action {
            RoomAction::Start => self.room.start_game(sender),
            RoomAction::PlaceLetter { row, col, letter } => {
                self.room.place_letter(sender, row, col, letter)
            }
            RoomAction::AttemptWord { cells } => {
                self.room.attempt_word(sender, &cells).map(|attempt| attempt.events)
            }
            RoomAction::PassTurn => self.room.pass_turn(sender),
            RoomAction::ImBack => self.room.revive(sender),
            RoomAction::Chat { message } => self.room.chat(sender, &message),
        };

        match result {
            Ok(events) => self.dispatch(events),
            Err(reason) => {
                tracing::debug!(room_id = %self.room.id(), %sender, %reason, "action rejected");
                self.send_to(sender, ServerEvent::MoveRejected { reason });
            }
        }
    }

    fn handle_rejoin(
        &mut self,
        target: RejoinTarget,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<PlayerId, RejectReason> {
        let previous = match target {
            RejoinTarget::Seat(id) => id,
            // A name alone never takes a seat whose connection is still open.
            RejoinTarget::Name(name) => self
                .room
                .find_rejoin_seat(&name)
                .filter(|seat| !self.members.contains_key(seat))
                .ok_or(RejectReason::PlayerNotFound)?,
        };

        let events = self.room.rebind(previous, player_id, self.timer.remaining())?;

        // A still-open old connection stops hearing from the room.
        self.members.remove(&previous);
        self.members.insert(player_id, sender);
        self.dispatch(events);
        Ok(previous)
    }

    /// Delivers events to the right members.
    fn dispatch(&self, events: Vec<Outbound>) {
        for (recipient, event) in events {
            match recipient {
                Recipient::All => {
                    for sender in self.members.values() {
                        let _ = sender.send(event.clone());
                    }
                }
                Recipient::Player(pid) => self.send_to(pid, event),
                Recipient::AllExcept(excluded) => {
                    for (pid, sender) in &self.members {
                        if *pid != excluded {
                            let _ = sender.send(event.clone());
                        }
                    }
                }
            }
        }
    }

    /// Sends to one member. Silently drops if they are not connected.
    fn send_to(&self, player_id: PlayerId, event: ServerEvent) {
        if let Some(sender) = self.members.get(&player_id) {
            let _ = sender.send(event);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            room_id: self.room.id().clone(),
            state: self.room.state(),
            player_count: self.room.players().len(),
            connected: self.members.len(),
            max_players: self.room.config().max_players,
            current_player: self.room.current_player(),
            turn_timeouts: self.timer.fired(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to it.
pub(crate) fn spawn_room(
    room_id: RoomId,
    config: &RoomConfig,
    dictionary: Arc<dyn Dictionary>,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.channel_size.max(1));

    let actor = RoomActor {
        room: Room::new(room_id.clone(), config.game.clone(), dictionary),
        timer: TurnTimer::new(),
        members: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle {
        room_id,
        sender: tx,
    }
}
