//! # UNO room server
//!
//! A server-authoritative UNO server: clients connect over WebSocket,
//! create or join rooms by six-letter code, and play with hidden hands.
//! Every room runs as its own actor task; the server only owns the room
//! registry and one handler task per connection.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use uno_server::prelude::*;
//!
//! # async fn start() -> Result<(), ServerError> {
//! let server = UnoServer::builder()
//!     .bind("0.0.0.0:3001")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod policy;
mod server;

pub use error::ServerError;
pub use policy::{RejectionPolicy, ReportRejections, SilentRejections};
pub use server::{DEFAULT_HANDSHAKE_TIMEOUT, UnoServer, UnoServerBuilder};

/// Everything needed to configure and run a server.
pub mod prelude {
    pub use crate::{
        RejectionPolicy, ReportRejections, ServerError, SilentRejections, UnoServer,
        UnoServerBuilder,
    };
    pub use uno_engine::{GameConfig, PlayerId, Rejection};
    pub use uno_protocol::{ClientAction, ServerMessage};
    pub use uno_room::RoomConfig;
}
