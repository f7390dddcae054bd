//! Why an action was refused.

use crate::PlayerId;

/// A rejected action. Returning one always means no state changed.
///
/// By default these are dropped without a reply; the server decides
/// whether the sender ever hears about them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    /// A game action arrived while the room is in the lobby.
    #[error("no game is in progress")]
    NotStarted,

    /// Start, restart or join arrived while a game is running.
    #[error("a game is already in progress")]
    AlreadyStarted,

    /// The action is reserved for the host.
    #[error("only the host can {0}")]
    NotHost(&'static str),

    #[error("need at least {needed} players to start, have {have}")]
    NotEnoughPlayers { needed: usize, have: usize },

    /// The deck cannot cover every hand plus an opening discard.
    #[error("not enough cards to deal {hand_size} each to {players} players")]
    CannotDeal { players: usize, hand_size: usize },

    #[error("room is full ({0} players)")]
    RoomFull(usize),

    #[error("player {0} is not in this room")]
    NotInRoom(PlayerId),

    #[error("it is not your turn")]
    NotYourTurn,

    #[error("no card at hand index {0}")]
    NoSuchCard(usize),

    #[error("that card does not match the discard pile")]
    IllegalCard,

    /// A wild was played without a chosen color, or with black.
    #[error("a wild card needs a chosen color of red, yellow, green or blue")]
    MissingColor,

    /// Drawing is only allowed when nothing in hand can be played.
    #[error("you have a playable card")]
    MustPlay,
}
