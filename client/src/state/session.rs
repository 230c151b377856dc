//! Session state for one client (player or admin).
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by exactly one controller. Server pushes, user actions, and
//! reconnects all mutate this value; the mirror persists a copy of it and
//! the render layer derives the visible screen from it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use frames::StateSnapshot;

/// Which client a session belongs to. Selects the mirror keys and the
/// identify message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Player,
    Admin,
}

/// Player-side phases, derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerPhase {
    /// Join form is showing.
    FormVisible,
    /// Name sent; the server has not acknowledged it yet.
    Joining,
    /// Joined and waiting for the round to start.
    Queued,
    /// Own card is showing.
    CardShown,
}

/// Admin-side phases, derived from [`SessionState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdminPhase {
    LoginVisible,
    Authenticating,
    Dashboard,
}

/// Session flags and identity.
///
/// `awaiting_ack` and `rejected` are transient: they are never written to
/// the mirror and reset on restart.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Player name, or the admin's participation name.
    pub name: Option<String>,
    /// Admin password; always `None` for players.
    pub password: Option<String>,
    pub joined: bool,
    pub authenticated: bool,
    pub game_started: bool,
    pub assigned_card: Option<String>,
    /// Whether the admin also plays.
    pub will_play: bool,
    /// An identify message is in flight and not yet acknowledged.
    pub awaiting_ack: bool,
    /// The server rejected the last join; the form is back on screen.
    pub rejected: bool,
}

impl SessionState {
    #[must_use]
    pub fn player_phase(&self) -> PlayerPhase {
        if !self.joined || self.rejected {
            PlayerPhase::FormVisible
        } else if self.assigned_card.is_some() {
            PlayerPhase::CardShown
        } else if self.awaiting_ack {
            PlayerPhase::Joining
        } else {
            PlayerPhase::Queued
        }
    }

    #[must_use]
    pub fn admin_phase(&self) -> AdminPhase {
        if self.authenticated {
            AdminPhase::Dashboard
        } else if self.awaiting_ack {
            AdminPhase::Authenticating
        } else {
            AdminPhase::LoginVisible
        }
    }

    /// Record an assigned card. A card implies a started game.
    pub fn assign_card(&mut self, card: &str) {
        self.assigned_card = Some(card.to_owned());
        self.game_started = true;
    }

    /// Apply an authoritative snapshot. Returns `true` when anything changed.
    ///
    /// The server's `gameStarted` flag wins over every local value: `false`
    /// discards the cached card even when the same snapshot names one.
    pub fn apply_snapshot(&mut self, snapshot: &StateSnapshot) -> bool {
        let before = (self.game_started, self.assigned_card.clone());

        match (snapshot.game_started, snapshot.card.as_deref()) {
            (Some(false), _) => {
                self.game_started = false;
                self.assigned_card = None;
            }
            (_, Some(card)) => self.assign_card(card),
            (Some(true), None) => self.game_started = true,
            (None, None) => {}
        }

        before != (self.game_started, self.assigned_card.clone())
    }

    /// Name to send with `requestState`, when the session has one.
    #[must_use]
    pub fn request_name(&self, role: Role) -> Option<String> {
        match role {
            Role::Player if self.joined => self.name.clone(),
            Role::Admin if self.will_play => self.name.clone(),
            Role::Player | Role::Admin => None,
        }
    }
}
