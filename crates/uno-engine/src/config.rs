//! Game configuration and the room's phase.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// GameConfig
// ---------------------------------------------------------------------------

/// Tunable rules for a room's games.
///
/// The defaults reproduce classic house rules: two to ten players, seven
/// cards each, and no reshuffling once the draw pile runs dry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Minimum players required to start (or restart) a game.
    pub min_players: usize,

    /// Maximum players allowed in the room.
    pub max_players: usize,

    /// Cards dealt to each player.
    pub hand_size: usize,

    /// When the draw pile is empty, shuffle the discard pile (minus its top
    /// card) back in instead of treating draws as no-ops.
    pub recycle_discard: bool,

    /// Only the host may restart after a finished game.
    pub restart_requires_host: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 10,
            hand_size: 7,
            recycle_discard: false,
            restart_requires_host: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Where a room is in its game lifecycle.
///
/// - **Lobby**: no game; players may join, leave and edit profiles.
/// - **Playing**: a game is running; joins are refused.
///
/// A win is not a resting state: the room announces the winner and is
/// back in `Lobby` in the same step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Lobby,
    Playing,
}

impl Phase {
    /// Returns `true` if the room is accepting new players.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` while a game is in progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Playing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::Playing => write!(f, "Playing"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_is_joinable() {
        assert!(Phase::Lobby.is_joinable());
        assert!(!Phase::Playing.is_joinable());
        assert!(Phase::Playing.is_active());
        assert!(!Phase::Lobby.is_active());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Lobby.to_string(), "Lobby");
        assert_eq!(Phase::Playing.to_string(), "Playing");
    }

    #[test]
    fn test_game_config_default() {
        let config = GameConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 10);
        assert_eq!(config.hand_size, 7);
        assert!(!config.recycle_discard);
        assert!(config.restart_requires_host);
    }
}
