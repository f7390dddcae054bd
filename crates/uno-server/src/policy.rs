//! What a player hears when one of their actions is refused.

use uno_engine::{PlayerId, Rejection};
use uno_protocol::ServerMessage;

/// Decides whether a rejected in-room action is answered.
///
/// Failed joins are always answered; this only covers actions sent to a
/// room the player is already in (start, play, draw, restart, profile).
pub trait RejectionPolicy: Send + Sync + 'static {
    /// Returns the message to send back to `player_id`, if any.
    fn respond(&self, player_id: PlayerId, rejection: &Rejection) -> Option<ServerMessage>;
}

/// Drops rejected actions without a reply. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentRejections;

impl RejectionPolicy for SilentRejections {
    fn respond(&self, _player_id: PlayerId, _rejection: &Rejection) -> Option<ServerMessage> {
        None
    }
}

/// Answers every rejected action with an `error` message naming the reason.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportRejections;

impl RejectionPolicy for ReportRejections {
    fn respond(&self, _player_id: PlayerId, rejection: &Rejection) -> Option<ServerMessage> {
        Some(ServerMessage::error(rejection.to_string()))
    }
}
