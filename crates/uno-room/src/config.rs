//! Room actor configuration.

use serde::{Deserialize, Serialize};
use uno_engine::GameConfig;

/// Default capacity of a room actor's command channel.
pub const DEFAULT_COMMAND_BUFFER: usize = 64;

/// Settings applied to every room the manager spawns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Capacity of each room's command channel. When it fills up, callers
    /// wait for the actor to catch up.
    pub command_buffer: usize,

    /// Rules for the games played in the room.
    pub game: GameConfig,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            command_buffer: DEFAULT_COMMAND_BUFFER,
            game: GameConfig::default(),
        }
    }
}
