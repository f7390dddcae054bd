//! Room actors and the room registry.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`uno_engine::Room`]. Everything addressed to a room goes through its
//! command channel, so actions within a room are applied one at a time
//! while different rooms run in parallel.
//!
//! # Key types
//!
//! - [`RoomManager`]: creates and destroys rooms, tracks who is where
//! - [`RoomHandle`]: sends commands to one running room actor
//! - [`RoomConfig`]: channel sizing plus the engine's `GameConfig`

mod config;
mod error;
mod manager;
mod room;

pub use config::{DEFAULT_COMMAND_BUFFER, RoomConfig};
pub use error::RoomError;
pub use manager::RoomManager;
pub use room::{PlayerSender, RoomHandle, RoomInfo};
