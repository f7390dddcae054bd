//! UNO rules engine.
//!
//! Everything here is synchronous and free of I/O. A [`Room`] holds the
//! members of one table and, while a game runs, the authoritative [`Game`].
//! The room actor in `uno-room` owns one `Room` per task and feeds it
//! [`Action`]s; the [`view`] module turns the result into what each member
//! may see.
//!
//! # Layers
//!
//! ```text
//! card / deck        value types, 108-card composition, shuffling
//! rules              legality and turn effects (stateless)
//! game               hands, piles, turn index, direction
//! room               membership, host, lifecycle, Action dispatch
//! view               per-viewer projections (hidden hands)
//! ```

mod card;
mod config;
pub mod deck;
mod error;
mod game;
mod ids;
mod player;
mod room;
pub mod rules;
pub mod view;

pub use card::{Card, CardKind, Color};
pub use config::{GameConfig, Phase};
pub use error::Rejection;
pub use game::{DrawOutcome, Game, PlayOutcome};
pub use ids::{PlayerId, RoomCode};
pub use player::{DEFAULT_NAME, Player, Profile};
pub use room::{Action, Applied, Departure, Room};
pub use rules::Direction;
pub use view::{GameView, LobbyPlayer, LobbyView, SeatView};
