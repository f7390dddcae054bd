//! Per-viewer projections of room and game state.
//!
//! These are the only shapes the engine hands outward. A [`GameView`] is
//! built for one viewer and carries that viewer's hand alone; everybody
//! else appears as a card count.

use serde::{Deserialize, Serialize};

use crate::rules::Direction;
use crate::{Card, Game, Player, PlayerId, Room, RoomCode};

/// A member as shown in the lobby.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LobbyPlayer {
    pub id: PlayerId,
    pub name: String,
    pub avatar: Option<String>,
    pub is_host: bool,
}

impl From<&Player> for LobbyPlayer {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            avatar: player.avatar.clone(),
            is_host: player.is_host,
        }
    }
}

/// A member as shown at the table: public fields plus hand size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatView {
    #[serde(flatten)]
    pub player: LobbyPlayer,
    pub card_count: usize,
}

/// Lobby snapshot, identical for every member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyView {
    pub room: RoomCode,
    pub players: Vec<LobbyPlayer>,
    pub started: bool,
}

/// What one player is allowed to see of a running game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameView {
    pub room: RoomCode,
    /// The viewer's own cards, in hand-index order.
    pub hand: Vec<Card>,
    /// Carries `chosenColor` when the top is a played wild.
    pub discard_top: Card,
    pub draw_count: usize,
    pub current_player: usize,
    pub direction: Direction,
    pub players: Vec<SeatView>,
}

/// Public member list.
pub fn roster(room: &Room) -> Vec<LobbyPlayer> {
    room.players().iter().map(LobbyPlayer::from).collect()
}

pub fn lobby(room: &Room) -> LobbyView {
    LobbyView {
        room: room.code().clone(),
        players: roster(room),
        started: room.game().is_some(),
    }
}

/// Builds `viewer`'s view of `game`.
pub fn project(game: &Game, room: &Room, viewer: PlayerId) -> GameView {
    GameView {
        room: room.code().clone(),
        hand: game.hand(viewer).to_vec(),
        discard_top: *game.top_card(),
        draw_count: game.draw_count(),
        current_player: game.current_player(),
        direction: game.direction(),
        players: room
            .players()
            .iter()
            .map(|p| SeatView {
                player: LobbyPlayer::from(p),
                card_count: game.card_count(p.id),
            })
            .collect(),
    }
}
