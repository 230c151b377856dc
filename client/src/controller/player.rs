//! Player controller: join form → queue → card.
//!
//! SYSTEM CONTEXT
//! ==============
//! Restores the mirrored join on boot, re-announces the name on every entry
//! into `Connected`, and reconciles against server snapshots. A name
//! collision purges the mirrored join flag so the next boot or reconnect
//! does not retry a name the server already refused.

#[cfg(test)]
#[path = "player_test.rs"]
mod player_test;

use frames::{ClientEvent, ServerEvent};

use super::{
    ClientOptions, Controller, Effect, Input, SessionCore, is_name_collision, request_state,
};
use crate::persist::KeyValueStore;
use crate::render::{self, View};
use crate::state::connection::ConnectionStatus;
use crate::state::roster::Roster;
use crate::state::session::{PlayerPhase, Role, SessionState};

/// User intents on the player screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    /// The join form was submitted with this raw (untrimmed) text.
    SubmitName(String),
}

#[derive(Debug)]
pub struct PlayerClient<S> {
    core: SessionCore<S>,
}

impl<S: KeyValueStore> PlayerClient<S> {
    /// Create a controller seeded from the mirror in `store`.
    pub fn new(store: S, options: ClientOptions) -> Self {
        Self {
            core: SessionCore::new(store, Role::Player, options),
        }
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.core.state
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.core.roster
    }

    #[must_use]
    pub fn phase(&self) -> PlayerPhase {
        self.core.state.player_phase()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.core.mirror.store()
    }

    /// Tear down, handing back the store (the next boot reads it).
    pub fn into_store(self) -> S {
        self.core.mirror.into_store()
    }

    fn submit(&mut self, raw: &str) -> Vec<Effect> {
        if self.phase() != PlayerPhase::FormVisible {
            log::debug!("ignoring join submit outside the form (phase={:?})", self.phase());
            return Vec::new();
        }
        let name = raw.trim();
        if name.is_empty() {
            log::debug!("ignoring empty player name");
            return Vec::new();
        }

        let state = &mut self.core.state;
        state.name = Some(name.to_owned());
        state.joined = true;
        state.rejected = false;
        state.awaiting_ack = true;
        state.assigned_card = None;
        self.core.notice = None;
        self.core.persist();

        vec![Effect::Emit(ClientEvent::Join {
            name: name.to_owned(),
        })]
    }

    /// Identity (when joined) followed by a snapshot request.
    fn announce(&self) -> Vec<Effect> {
        let state = &self.core.state;
        let name = if state.rejected {
            None
        } else {
            state.request_name(Role::Player)
        };

        let mut effects = Vec::with_capacity(2);
        if let Some(name) = &name {
            log::info!("announcing player {name}");
            effects.push(Effect::Emit(ClientEvent::Join { name: name.clone() }));
        }
        effects.push(request_state(name));
        effects
    }

    fn on_server(&mut self, event: ServerEvent) -> Vec<Effect> {
        match event {
            ServerEvent::UpdatePlayers { players } => {
                self.core.roster.replace(players);
                let state = &mut self.core.state;
                let listed = |n: &str| self.core.roster.contains(n);
                if state.awaiting_ack && state.name.as_deref().is_some_and(listed) {
                    state.awaiting_ack = false;
                }
                Vec::new()
            }
            ServerEvent::AssignCard { card } => {
                log::info!("card assigned: {card}");
                self.core.assign_card(&card)
            }
            ServerEvent::StateRestored(snapshot) => {
                self.core.apply_snapshot(snapshot);
                if self.core.state.joined && !self.core.state.rejected {
                    self.core.state.awaiting_ack = false;
                }
                Vec::new()
            }
            ServerEvent::GameStarted => {
                self.core.game_started();
                Vec::new()
            }
            ServerEvent::Error { message } => {
                self.reject(&message);
                Vec::new()
            }
            ServerEvent::LoginSuccess | ServerEvent::LoginFailure { .. } => {
                log::debug!("player ignoring {}", event.name());
                Vec::new()
            }
        }
    }

    fn reject(&mut self, message: &str) {
        log::warn!("server rejected player action: {message}");
        self.core.notice = Some(format!("Error: {message}"));
        let state = &mut self.core.state;
        state.awaiting_ack = false;
        if is_name_collision(message) {
            state.joined = false;
            state.rejected = false;
        } else {
            state.rejected = true;
        }
        self.core.persist();
    }
}

impl<S: KeyValueStore> Controller for PlayerClient<S> {
    type Action = PlayerAction;

    fn handle(&mut self, input: Input<PlayerAction>) -> Vec<Effect> {
        match input {
            Input::Boot { channel_open } => {
                if self.core.state.joined {
                    let name = self.core.state.name.as_deref().unwrap_or_default();
                    log::info!("restored join for {name}");
                }
                if self.core.boot(channel_open) {
                    self.announce()
                } else {
                    Vec::new()
                }
            }
            Input::Action(PlayerAction::SubmitName(raw)) => self.submit(&raw),
            Input::Server(event) => self.on_server(event),
            Input::Channel(event) => {
                if self.core.observe(event) {
                    self.announce()
                } else {
                    Vec::new()
                }
            }
            Input::SelfCheck { connected } => {
                if self.core.self_check(connected) {
                    self.announce()
                } else {
                    Vec::new()
                }
            }
            Input::BannerExpired(seq) => {
                self.core.banner.dismiss(seq);
                Vec::new()
            }
        }
    }

    fn view(&self) -> View {
        render::player_view(
            &self.core.state,
            &self.core.roster,
            &self.core.chrome(),
            &self.core.options.images,
        )
    }

    fn status(&self) -> ConnectionStatus {
        self.core.monitor.status()
    }
}
