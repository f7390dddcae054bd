//! Wire protocol for the UNO room server.
//!
//! This crate defines what clients and the server say to each other:
//!
//! - **Types** ([`ClientAction`], [`ServerMessage`]): the JSON messages
//!   that travel over a connection.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those messages are
//!   turned into text frames and back.
//! - **Errors** ([`ProtocolError`]): what can go wrong while doing so.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (raw text frames) and the
//! room layer. It knows nothing about connections or actors; it only maps
//! engine types onto the wire format.
//!
//! ```text
//! Transport (text) → Protocol (ClientAction) → Room actor (Action)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{ClientAction, ROOM_UNAVAILABLE, ServerMessage};

// Identity and view types live in the engine but are part of the wire
// vocabulary, so they are re-exported here for callers that only speak
// protocol.
pub use uno_engine::{Card, Color, GameView, LobbyPlayer, LobbyView, PlayerId, RoomCode};
