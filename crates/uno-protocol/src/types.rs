//! The messages that travel over a client connection.
//!
//! Both directions use the same JSON shape: an object whose `"type"` field
//! names the message in `snake_case`, with the remaining fields in
//! `camelCase`:
//!
//! ```json
//! {"type": "play_card", "cardIdx": 2, "chosenColor": "green"}
//! ```
//!
//! `#[serde(tag = "type")]` produces that "internally tagged" layout.
//! `rename_all` renames the variants and `rename_all_fields` renames the
//! fields inside every struct variant.

use serde::{Deserialize, Serialize};
use uno_engine::{Action, Color, GameView, LobbyPlayer, LobbyView, PlayerId, Profile, RoomCode};

/// Text sent when a join names a room that does not exist or is mid-game.
pub const ROOM_UNAVAILABLE: &str = "Room not found or already started.";

// ---------------------------------------------------------------------------
// ClientAction — client → server
// ---------------------------------------------------------------------------

/// Everything a client may send.
///
/// A frame that does not decode into one of these (unknown `type`, missing
/// `cardIdx`, a negative index, an unknown color) is dropped by the server
/// without a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ClientAction {
    /// Open a new room and become its host.
    Create {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },

    /// Enter an existing room by code. Case and surrounding whitespace in
    /// `room` are ignored.
    Join {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
        #[serde(default)]
        room: String,
    },

    /// Change display name and/or avatar. Absent fields stay as they are.
    UpdateProfile {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        avatar: Option<String>,
    },

    /// Host only: deal a game.
    StartGame,

    /// Play the card at `card_idx` in the sender's hand. Wild cards need
    /// `chosen_color`.
    PlayCard {
        card_idx: usize,
        #[serde(default)]
        chosen_color: Option<Color>,
    },

    /// Take one card from the draw pile.
    DrawCard,

    /// Deal a new game after the previous one ended.
    RestartGame,
}

impl ClientAction {
    /// The display fields carried by a create, join or profile update.
    pub fn profile(&self) -> Option<Profile> {
        match self {
            Self::Create { name, avatar }
            | Self::Join { name, avatar, .. }
            | Self::UpdateProfile { name, avatar } => Some(Profile {
                name: name.clone(),
                avatar: avatar.clone(),
            }),
            _ => None,
        }
    }

    /// Converts an in-room request into the engine's [`Action`].
    ///
    /// Returns `None` for `create` and `join`, which are handled by the
    /// room registry rather than by a room.
    pub fn into_room_action(self) -> Option<Action> {
        match self {
            Self::Create { .. } | Self::Join { .. } => None,
            Self::UpdateProfile { name, avatar } => {
                Some(Action::UpdateProfile(Profile { name, avatar }))
            }
            Self::StartGame => Some(Action::StartGame),
            Self::PlayCard {
                card_idx,
                chosen_color,
            } => Some(Action::PlayCard {
                hand_index: card_idx,
                chosen_color,
            }),
            Self::DrawCard => Some(Action::DrawCard),
            Self::RestartGame => Some(Action::RestartGame),
        }
    }
}

// ---------------------------------------------------------------------------
// ServerMessage — server → client
// ---------------------------------------------------------------------------

/// Everything the server may send.
///
/// `LobbyUpdate` and `GameState` wrap the engine's views; with internal
/// tagging their fields sit beside `"type"` in the same object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Sent to a player right after they create or join a room. `id` is
    /// how they recognize themselves in later player lists.
    RoomJoined { room: RoomCode, id: PlayerId },

    /// The member list changed, or the room returned to the lobby.
    LobbyUpdate(LobbyView),

    /// A personal snapshot of the running game.
    GameState(GameView),

    /// Someone emptied their hand. A `LobbyUpdate` always follows.
    GameOver {
        room: RoomCode,
        message: String,
        winner: PlayerId,
        players: Vec<LobbyPlayer>,
    },

    /// A request was refused.
    Error { message: String },
}

impl ServerMessage {
    /// Builds the announcement for `winner_name` winning.
    pub fn game_over(
        room: RoomCode,
        winner: PlayerId,
        winner_name: &str,
        players: Vec<LobbyPlayer>,
    ) -> Self {
        Self::GameOver {
            room,
            message: format!("{winner_name} has won the game!"),
            winner,
            players,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// The `type` tag this message carries on the wire, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RoomJoined { .. } => "room_joined",
            Self::LobbyUpdate(_) => "lobby_update",
            Self::GameState(_) => "game_state",
            Self::GameOver { .. } => "game_over",
            Self::Error { .. } => "error",
        }
    }
}
