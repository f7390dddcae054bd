//! Room actor: an isolated Tokio task that owns one room and its game.
//!
//! Each room runs in its own task and talks to the outside world through an
//! mpsc channel. No locks guard the room state; the actor is the only thing
//! that ever touches it, which is what serializes actions within a room.
//! The actor stops on `Shutdown` or once its last member has left.

use std::collections::HashMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::{mpsc, oneshot};
use uno_engine::{Action, Applied, Departure, Phase, PlayerId, Profile, Rejection, Room, RoomCode, view};
use uno_protocol::ServerMessage;

use crate::{RoomConfig, RoomError};

/// Channel sender for delivering outbound messages to one player's
/// connection. Unbounded so the actor never waits on a slow client.
pub type PlayerSender = mpsc::UnboundedSender<ServerMessage>;

/// Commands sent to a room actor through its channel.
///
/// Variants carrying a `oneshot::Sender` are requests: the caller waits
/// for the actor's answer on that channel.
pub(crate) enum RoomCommand {
    /// Add a player, or refresh a returning player's profile and sender.
    Join {
        player_id: PlayerId,
        profile: Profile,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<(), Rejection>>,
    },

    /// Remove a player.
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<Departure, Rejection>>,
    },

    /// Apply an in-room action on a player's behalf.
    Act {
        player_id: PlayerId,
        action: Action,
        reply: oneshot::Sender<Result<Applied, Rejection>>,
    },

    /// Request a metadata snapshot.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Stop the actor.
    Shutdown,
}

/// A snapshot of room metadata (not the game itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub phase: Phase,
    pub player_count: usize,
    pub max_players: usize,
    pub host: Option<PlayerId>,
}

/// Handle to a running room actor.
///
/// Cheap to clone: it is an `mpsc::Sender` plus the room code. The
/// [`RoomManager`](crate::RoomManager) keeps one per room, and each
/// connection caches a clone for the room it is in.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Returns `true` once the actor has stopped.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Asks the room to admit `player_id`.
    pub async fn join(
        &self,
        player_id: PlayerId,
        profile: Profile,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Join {
                player_id,
                profile,
                sender,
                reply,
            },
            rx,
        )
        .await?
        .map_err(RoomError::from)
    }

    /// Asks the room to remove `player_id`.
    pub async fn leave(&self, player_id: PlayerId) -> Result<Departure, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::Leave { player_id, reply }, rx)
            .await?
            .map_err(RoomError::from)
    }

    /// Applies `action` for `player_id` and waits for the verdict.
    pub async fn act(&self, player_id: PlayerId, action: Action) -> Result<Applied, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            RoomCommand::Act {
                player_id,
                action,
                reply,
            },
            rx,
        )
        .await?
        .map_err(RoomError::from)
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply, rx) = oneshot::channel();
        self.request(RoomCommand::GetInfo { reply }, rx).await
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// A handle with no actor behind it. The caller owns the command
    /// receiver and decides whether anything answers.
    #[cfg(test)]
    pub(crate) fn detached(code: RoomCode) -> (Self, mpsc::Receiver<RoomCommand>) {
        let (sender, receiver) = mpsc::channel(crate::DEFAULT_COMMAND_BUFFER);
        (Self { code, sender }, receiver)
    }

    async fn request<T>(
        &self,
        command: RoomCommand,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, RoomError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        rx.await.map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal actor state. Runs inside a Tokio task.
struct RoomActor {
    room: Room,
    /// Per-player outbound channels.
    senders: HashMap<PlayerId, PlayerSender>,
    rng: StdRng,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        let code = self.room.code().clone();
        tracing::info!(room = %code, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    profile,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, profile, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let emptied = matches!(&result, Ok(departure) if departure.remaining == 0);
                    let _ = reply.send(result);
                    if emptied {
                        // Anything still queued gets `Unavailable`.
                        tracing::info!(room = %code, "room empty, shutting down");
                        break;
                    }
                }
                RoomCommand::Act {
                    player_id,
                    action,
                    reply,
                } => {
                    let result = self.handle_act(player_id, action);
                    let _ = reply.send(result);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(room = %code, "room shutting down");
                    break;
                }
            }
        }

        tracing::info!(room = %code, "room actor stopped");
    }

    /// Sends the host their welcome. Called once, before the loop starts.
    fn greet_host(&self) {
        if let Some(host) = self.room.host() {
            self.send_to(host.id, self.welcome(host.id));
        }
        self.broadcast_lobby();
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        profile: Profile,
        sender: PlayerSender,
    ) -> Result<(), Rejection> {
        let rejoin = self.room.contains(player_id);
        self.room.join(player_id, profile)?;
        self.senders.insert(player_id, sender);

        tracing::info!(
            room = %self.room.code(),
            %player_id,
            rejoin,
            players = self.room.players().len(),
            "player joined"
        );

        self.send_to(player_id, self.welcome(player_id));
        self.broadcast_lobby();
        Ok(())
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<Departure, Rejection> {
        let departure = self.room.leave(player_id)?;
        self.senders.remove(&player_id);

        tracing::info!(
            room = %self.room.code(),
            %player_id,
            players = departure.remaining,
            new_host = ?departure.new_host,
            "player left"
        );

        if departure.remaining > 0 {
            self.broadcast_state();
        }
        Ok(departure)
    }

    fn handle_act(&mut self, player_id: PlayerId, action: Action) -> Result<Applied, Rejection> {
        let applied = match self.room.apply(player_id, action, &mut self.rng) {
            Ok(applied) => applied,
            Err(rejection) => {
                tracing::debug!(
                    room = %self.room.code(),
                    %player_id,
                    %rejection,
                    "action rejected"
                );
                return Err(rejection);
            }
        };

        match &applied {
            Applied::Lobby => self.broadcast_lobby(),
            Applied::Game => self.broadcast_game(),
            Applied::Won { winner, name } => {
                let msg = ServerMessage::game_over(
                    self.room.code().clone(),
                    *winner,
                    name,
                    view::roster(&self.room),
                );
                self.broadcast(&msg);
                self.broadcast_lobby();
            }
            Applied::Unchanged => {}
        }
        Ok(applied)
    }

    fn welcome(&self, player_id: PlayerId) -> ServerMessage {
        ServerMessage::RoomJoined {
            room: self.room.code().clone(),
            id: player_id,
        }
    }

    /// Broadcasts whatever the room currently shows: the table if a game
    /// is running, otherwise the lobby.
    fn broadcast_state(&self) {
        if self.room.game().is_some() {
            self.broadcast_game();
        } else {
            self.broadcast_lobby();
        }
    }

    fn broadcast_lobby(&self) {
        self.broadcast(&ServerMessage::LobbyUpdate(view::lobby(&self.room)));
    }

    /// Sends each member their own projection of the game.
    fn broadcast_game(&self) {
        let Some(game) = self.room.game() else {
            return;
        };
        for player in self.room.players() {
            let projected = view::project(game, &self.room, player.id);
            self.send_to(player.id, ServerMessage::GameState(projected));
        }
    }

    fn broadcast(&self, msg: &ServerMessage) {
        for player in self.room.players() {
            self.send_to(player.id, msg.clone());
        }
    }

    /// Sends an outbound message to a single player. Silently drops it if
    /// the receiver is gone (player disconnected).
    fn send_to(&self, player_id: PlayerId, msg: ServerMessage) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.room.code().clone(),
            phase: self.room.phase(),
            player_count: self.room.players().len(),
            max_players: self.room.config().max_players,
            host: self.room.host().map(|p| p.id),
        }
    }
}

/// Spawns a room actor with `host` as its only member and returns a handle
/// to it. The host receives `room_joined` and a `lobby_update` straight
/// away.
pub(crate) fn spawn_room(
    code: RoomCode,
    host: PlayerId,
    profile: Profile,
    sender: PlayerSender,
    config: &RoomConfig,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let actor = RoomActor {
        room: Room::new(code.clone(), host, profile, config.game.clone()),
        senders: HashMap::from([(host, sender)]),
        rng: StdRng::from_rng(&mut rand::rng()),
        receiver: rx,
    };
    actor.greet_host();

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
