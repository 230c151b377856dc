//! Persisted mirror of [`SessionState`].
//!
//! DESIGN
//! ======
//! The mirror is a cache, not the source of truth. It is read once at boot
//! to seed the optimistic view and the re-announce, and written on every
//! state transition. Flags that gate automatic re-announce (`hasJoined`,
//! `adminAuthenticated`) are removed rather than written as `"false"` so a
//! purge is visible as a missing key.

#[cfg(test)]
#[path = "mirror_test.rs"]
mod mirror_test;

use super::{KeyValueStore, StoreError};
use crate::state::session::{Role, SessionState};

pub mod keys {
    pub const PLAYER_NAME: &str = "playerName";
    pub const HAS_JOINED: &str = "hasJoined";
    pub const GAME_STARTED: &str = "gameStarted";
    pub const ASSIGNED_CARD: &str = "assignedCard";

    pub const ADMIN_AUTHENTICATED: &str = "adminAuthenticated";
    pub const ADMIN_PASSWORD: &str = "adminPassword";
    pub const ADMIN_WILL_PLAY: &str = "adminWillPlay";
    pub const ADMIN_PLAY_NAME: &str = "adminPlayName";
    pub const ADMIN_GAME_STARTED: &str = "adminGameStarted";
    pub const ADMIN_ASSIGNED_CARD: &str = "adminAssignedCard";
}

/// Typed view over a [`KeyValueStore`] for one role.
#[derive(Debug)]
pub struct SessionMirror<S> {
    store: S,
    role: Role,
}

impl<S: KeyValueStore> SessionMirror<S> {
    pub fn new(store: S, role: Role) -> Self {
        Self { store, role }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Read the persisted session. Missing or partial data yields defaults.
    #[must_use]
    pub fn load(&self) -> SessionState {
        match self.role {
            Role::Player => {
                let name = self.text(keys::PLAYER_NAME);
                SessionState {
                    joined: self.flag(keys::HAS_JOINED) && name.is_some(),
                    name,
                    game_started: self.flag(keys::GAME_STARTED),
                    assigned_card: self.text(keys::ASSIGNED_CARD),
                    ..SessionState::default()
                }
            }
            Role::Admin => {
                let password = self.store.get(keys::ADMIN_PASSWORD);
                let will_play = self.flag(keys::ADMIN_WILL_PLAY);
                SessionState {
                    authenticated: self.flag(keys::ADMIN_AUTHENTICATED) && password.is_some(),
                    password,
                    will_play,
                    name: will_play.then(|| self.text(keys::ADMIN_PLAY_NAME)).flatten(),
                    game_started: self.flag(keys::ADMIN_GAME_STARTED),
                    assigned_card: self.text(keys::ADMIN_ASSIGNED_CARD),
                    ..SessionState::default()
                }
            }
        }
    }

    /// Write every persisted field of `state`.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] hit; earlier fields stay written.
    pub fn save(&mut self, state: &SessionState) -> Result<(), StoreError> {
        match self.role {
            Role::Player => {
                self.put_text(keys::PLAYER_NAME, state.name.as_deref())?;
                self.put_gate(keys::HAS_JOINED, state.joined)?;
                self.put_bool(keys::GAME_STARTED, state.game_started)?;
                self.put_text(keys::ASSIGNED_CARD, state.assigned_card.as_deref())
            }
            Role::Admin => {
                self.put_text(keys::ADMIN_PASSWORD, state.password.as_deref())?;
                self.put_gate(keys::ADMIN_AUTHENTICATED, state.authenticated)?;
                self.put_bool(keys::ADMIN_WILL_PLAY, state.will_play)?;
                self.put_text(keys::ADMIN_PLAY_NAME, state.name.as_deref())?;
                self.put_bool(keys::ADMIN_GAME_STARTED, state.game_started)?;
                self.put_text(keys::ADMIN_ASSIGNED_CARD, state.assigned_card.as_deref())
            }
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.store.get(key).is_some_and(|v| v == "true")
    }

    fn text(&self, key: &str) -> Option<String> {
        self.store.get(key).filter(|v| !v.is_empty())
    }

    fn put_text(&mut self, key: &str, value: Option<&str>) -> Result<(), StoreError> {
        match value {
            Some(v) => self.store.set(key, v),
            None => self.store.remove(key),
        }
    }

    fn put_bool(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.store.set(key, if value { "true" } else { "false" })
    }

    fn put_gate(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        if value {
            self.store.set(key, "true")
        } else {
            self.store.remove(key)
        }
    }
}
