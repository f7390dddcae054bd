//! Room members and their display profiles.

use serde::{Deserialize, Serialize};

use crate::PlayerId;

/// Name given to anyone who joins without one.
pub const DEFAULT_NAME: &str = "Player";

/// Display fields a client supplies on create, join or profile update.
///
/// Both fields are optional on the wire. On create/join a missing or empty
/// name falls back to [`DEFAULT_NAME`]; on update a missing field is left
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque to the server; relayed as given.
    #[serde(default)]
    pub avatar: Option<String>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            avatar: None,
        }
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = Some(avatar.into());
        self
    }
}

/// A member of a room. Order in the room's list is turn order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub avatar: Option<String>,
    pub is_host: bool,
}

impl Player {
    /// Builds a member from a join-time profile.
    pub fn from_profile(id: PlayerId, profile: Profile, is_host: bool) -> Self {
        let name = display_name(profile.name);
        Self {
            id,
            name,
            avatar: profile.avatar,
            is_host,
        }
    }

    /// Overwrites whichever display fields `profile` carries.
    pub fn apply_profile(&mut self, profile: Profile) {
        if profile.name.is_some() {
            self.name = display_name(profile.name);
        }
        if let Some(avatar) = profile.avatar {
            self.avatar = Some(avatar);
        }
    }
}

/// A blank or missing name shows as [`DEFAULT_NAME`].
fn display_name(name: Option<String>) -> String {
    name.filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string())
}
