//! Room manager: creates, tracks and tears down rooms, and remembers which
//! room each player is in.

use std::collections::HashMap;

use tokio::sync::Mutex;
use uno_engine::{Action, Applied, Departure, PlayerId, Profile, RoomCode};

use crate::room::spawn_room;
use crate::{PlayerSender, RoomConfig, RoomError, RoomHandle, RoomInfo};

/// The maps the manager keeps behind its lock.
#[derive(Default)]
struct Registry {
    /// Live rooms, keyed by code.
    rooms: HashMap<RoomCode, RoomHandle>,

    /// Which room each player is currently in.
    player_rooms: HashMap<PlayerId, RoomCode>,
}

impl Registry {
    /// Draws codes until one is not in use.
    fn unused_code(&self) -> RoomCode {
        let mut rng = rand::rng();
        loop {
            let code = RoomCode::generate(&mut rng);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Drops `code` and everyone indexed to it. Returns the handle if the
    /// room was still registered.
    fn forget(&mut self, code: &RoomCode) -> Option<RoomHandle> {
        let handle = self.rooms.remove(code)?;
        self.player_rooms.retain(|_, room| room != code);
        Some(handle)
    }
}

/// Registry of all live rooms.
///
/// A player is in at most one room at a time: creating or joining a room
/// takes them out of the previous one. A room whose last member leaves
/// stops its actor and is forgotten.
///
/// Shared by reference across connection tasks. The internal lock only
/// covers map lookups and updates; requests to a room actor are awaited
/// with it released, so a slow room never holds up the others.
pub struct RoomManager {
    registry: Mutex<Registry>,
    config: RoomConfig,
}

impl RoomManager {
    /// Creates an empty manager whose rooms use `config`.
    pub fn new(config: RoomConfig) -> Self {
        Self {
            registry: Mutex::new(Registry::default()),
            config,
        }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    /// Opens a new room with `host` as its only member.
    ///
    /// If the host was already in a room they leave it first.
    pub async fn create_room(
        &self,
        host: PlayerId,
        profile: Profile,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        if self.player_room(host).await.is_some() {
            let _ = self.leave_room(host).await;
        }

        let mut registry = self.registry.lock().await;
        let code = registry.unused_code();
        let handle = spawn_room(code.clone(), host, profile, sender, &self.config);
        registry.rooms.insert(code.clone(), handle.clone());
        registry.player_rooms.insert(host, code.clone());
        tracing::info!(room = %code, %host, "room created");
        Ok(handle)
    }

    /// Adds `player` to the room named by `raw_code`.
    ///
    /// The code is matched case-insensitively. Joining the room the player
    /// is already in refreshes their profile and outbound channel; joining a
    /// different one moves them there once the new room has accepted.
    pub async fn join_room(
        &self,
        player: PlayerId,
        raw_code: &str,
        profile: Profile,
        sender: PlayerSender,
    ) -> Result<RoomHandle, RoomError> {
        let not_found = || RoomError::NotFound(raw_code.trim().to_ascii_uppercase());
        let code = RoomCode::parse(raw_code).ok_or_else(not_found)?;
        let handle = self.handle_of(&code).await.ok_or_else(not_found)?;

        match handle.join(player, profile, sender).await {
            Ok(()) => {}
            Err(RoomError::Unavailable(_)) => {
                // Emptied and stopped between the lookup and the join.
                self.forget(&code).await;
                return Err(not_found());
            }
            Err(e) => return Err(e),
        }

        let previous = self
            .registry
            .lock()
            .await
            .player_rooms
            .insert(player, code.clone());
        if let Some(previous) = previous.filter(|previous| *previous != code) {
            self.leave_from(player, &previous).await;
        }
        Ok(handle)
    }

    /// Removes `player` from whichever room they are in. Forgets the room
    /// if they were the last member.
    pub async fn leave_room(&self, player: PlayerId) -> Result<Departure, RoomError> {
        let (code, handle) = {
            let mut registry = self.registry.lock().await;
            let code = registry
                .player_rooms
                .remove(&player)
                .ok_or(RoomError::NotInRoom(player))?;
            let handle = registry
                .rooms
                .get(&code)
                .cloned()
                .ok_or_else(|| RoomError::NotFound(code.to_string()))?;
            (code, handle)
        };

        match handle.leave(player).await {
            Ok(departure) => {
                if departure.remaining == 0 {
                    self.forget(&code).await;
                }
                Ok(departure)
            }
            Err(RoomError::Unavailable(code)) => {
                self.forget(&code).await;
                Err(RoomError::Unavailable(code))
            }
            Err(e) => Err(e),
        }
    }

    /// Applies an in-room action for `player` in their current room.
    pub async fn route_action(
        &self,
        player: PlayerId,
        action: Action,
    ) -> Result<Applied, RoomError> {
        let handle = self
            .handle_for(player)
            .await
            .ok_or(RoomError::NotInRoom(player))?;
        handle.act(player, action).await
    }

    /// Returns info about a specific room.
    pub async fn get_room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        let handle = self
            .handle_of(code)
            .await
            .ok_or_else(|| RoomError::NotFound(code.to_string()))?;
        handle.get_info().await
    }

    /// Shuts a room down and forgets everyone who was in it.
    pub async fn destroy_room(&self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self
            .registry
            .lock()
            .await
            .forget(code)
            .ok_or_else(|| RoomError::NotFound(code.to_string()))?;

        let _ = handle.shutdown().await;
        tracing::info!(room = %code, "room destroyed");
        Ok(())
    }

    /// A handle to `player`'s current room, if any.
    pub async fn handle_for(&self, player: PlayerId) -> Option<RoomHandle> {
        let registry = self.registry.lock().await;
        let code = registry.player_rooms.get(&player)?;
        registry.rooms.get(code).cloned()
    }

    /// The code of `player`'s current room, if any.
    pub async fn player_room(&self, player: PlayerId) -> Option<RoomCode> {
        self.registry.lock().await.player_rooms.get(&player).cloned()
    }

    /// Returns the number of live rooms.
    pub async fn room_count(&self) -> usize {
        self.registry.lock().await.rooms.len()
    }

    /// Lists all live room codes.
    pub async fn room_codes(&self) -> Vec<RoomCode> {
        self.registry.lock().await.rooms.keys().cloned().collect()
    }

    async fn handle_of(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.registry.lock().await.rooms.get(code).cloned()
    }

    /// Drops a room whose actor has already stopped.
    async fn forget(&self, code: &RoomCode) {
        if self.registry.lock().await.forget(code).is_some() {
            tracing::info!(room = %code, "room destroyed");
        }
    }

    /// Takes `player` out of the room `code` after they have already been
    /// re-indexed elsewhere. Failures only get logged.
    async fn leave_from(&self, player: PlayerId, code: &RoomCode) {
        let Some(handle) = self.handle_of(code).await else {
            return;
        };
        match handle.leave(player).await {
            Ok(departure) if departure.remaining == 0 => self.forget(code).await,
            Ok(_) => {}
            Err(e) => tracing::warn!(room = %code, %player, error = %e, "leaving previous room failed"),
        }
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;
    use crate::room::RoomCommand;

    /// Registers a room whose actor never answers.
    async fn register_stalled_room(mgr: &RoomManager) -> (RoomCode, mpsc::Receiver<RoomCommand>) {
        let code = RoomCode::parse("STALL1").unwrap();
        let (handle, commands) = RoomHandle::detached(code.clone());
        mgr.registry.lock().await.rooms.insert(code.clone(), handle);
        (code, commands)
    }

    #[tokio::test]
    async fn test_waiting_on_one_room_does_not_block_the_registry() {
        let mgr = std::sync::Arc::new(RoomManager::default());
        let (code, _commands) = register_stalled_room(&mgr).await;

        let joining = {
            let mgr = std::sync::Arc::clone(&mgr);
            let (tx, _rx) = mpsc::unbounded_channel();
            tokio::spawn(async move {
                mgr.join_room(PlayerId(1), code.as_str(), Profile::default(), tx)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!joining.is_finished());

        let (tx, _rx) = mpsc::unbounded_channel();
        let created = tokio::time::timeout(
            Duration::from_secs(1),
            mgr.create_room(PlayerId(2), Profile::default(), tx),
        )
        .await
        .expect("create should not wait on another room")
        .unwrap();
        assert_eq!(mgr.room_count().await, 2);
        assert_eq!(mgr.player_room(PlayerId(2)).await.as_ref(), Some(created.code()));

        joining.abort();
    }

    #[tokio::test]
    async fn test_join_after_actor_stopped_is_not_found() {
        let mgr = RoomManager::default();
        let (code, commands) = register_stalled_room(&mgr).await;
        drop(commands);

        let (tx, _rx) = mpsc::unbounded_channel();
        let result = mgr.join_room(PlayerId(1), code.as_str(), Profile::default(), tx).await;
        assert!(matches!(result, Err(RoomError::NotFound(c)) if c == "STALL1"));
        assert_eq!(mgr.room_count().await, 0);
    }
}
