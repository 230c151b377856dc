//! Admin controller: login → dashboard (roster, start control, own card).
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin authenticates with a password and may also take part in the
//! round under a participation name. The mirror keeps the password so a
//! restart or reconnect logs back in without prompting; a `loginFailure`
//! purges both the password and the auth flag.

#[cfg(test)]
#[path = "admin_test.rs"]
mod admin_test;

use frames::{AdminLogin, ClientEvent, ServerEvent};

use super::{
    ClientOptions, Controller, Effect, Input, SessionCore, is_name_collision, request_state,
};
use crate::persist::KeyValueStore;
use crate::render::{self, View};
use crate::state::connection::ConnectionStatus;
use crate::state::roster::Roster;
use crate::state::session::{AdminPhase, Role, SessionState};

pub const DEFAULT_LOGIN_FAILURE: &str = "Invalid password";

/// User intents on the admin screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AdminAction {
    /// Participation checkbox. Turning it off clears the play name.
    SetParticipation(bool),
    /// Play-name field edit; ignored while participation is off.
    SetPlayName(String),
    /// Turn participation on and set the play name in one step.
    PlayAs(String),
    Login { password: String },
    /// Confirmed start request. Hosts ask for confirmation first.
    StartGame,
}

#[derive(Debug)]
pub struct AdminClient<S> {
    core: SessionCore<S>,
}

impl<S: KeyValueStore> AdminClient<S> {
    /// Create a controller seeded from the mirror in `store`.
    pub fn new(store: S, options: ClientOptions) -> Self {
        Self {
            core: SessionCore::new(store, Role::Admin, options),
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
    pub fn phase(&self) -> AdminPhase {
        self.core.state.admin_phase()
    }

    #[must_use]
    pub fn store(&self) -> &S {
        self.core.mirror.store()
    }

    pub fn into_store(self) -> S {
        self.core.mirror.into_store()
    }

    fn on_action(&mut self, action: AdminAction) -> Vec<Effect> {
        match action {
            AdminAction::Login { password } => return self.login(password),
            AdminAction::StartGame => return self.start_game(),
            AdminAction::SetParticipation(on) => self.set_participation(on),
            AdminAction::SetPlayName(raw) => self.set_play_name(raw),
            AdminAction::PlayAs(raw) => {
                self.set_participation(true);
                self.set_play_name(raw);
            }
        }
        Vec::new()
    }

    fn set_participation(&mut self, on: bool) {
        let state = &mut self.core.state;
        state.will_play = on;
        if !on {
            state.name = None;
        }
        self.core.persist();
    }

    fn set_play_name(&mut self, raw: String) {
        if !self.core.state.will_play {
            log::debug!("play name edit ignored while not participating");
            return;
        }
        self.core.state.name = Some(raw).filter(|n| !n.trim().is_empty());
        self.core.persist();
    }

    fn login(&mut self, password: String) -> Vec<Effect> {
        if self.phase() != AdminPhase::LoginVisible {
            log::debug!("ignoring login outside the form (phase={:?})", self.phase());
            return Vec::new();
        }
        if password.is_empty() {
            log::debug!("ignoring empty admin password");
            return Vec::new();
        }
        let state = &mut self.core.state;
        let name = state
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        if state.will_play && name.is_none() {
            log::debug!("participation requires a play name");
            return Vec::new();
        }

        state.name = name;
        state.password = Some(password);
        state.authenticated = false;
        state.awaiting_ack = true;
        self.core.notice = None;
        self.core.persist();

        vec![Effect::Emit(self.login_event())]
    }

    fn start_game(&mut self) -> Vec<Effect> {
        if !self.core.state.authenticated {
            log::debug!("start requested before login");
            return Vec::new();
        }
        if !self.core.monitor.status().is_connected() {
            log::debug!("start requested while offline");
            return Vec::new();
        }
        self.core.notice = None;
        log::info!("requesting game start");
        vec![Effect::Emit(ClientEvent::StartGame)]
    }

    /// `adminLogin` for the current credentials. Callers ensure a password.
    fn login_event(&self) -> ClientEvent {
        let state = &self.core.state;
        ClientEvent::AdminLogin(AdminLogin {
            password: state.password.clone().unwrap_or_default(),
            username: state.request_name(Role::Admin),
            will_play: Some(state.will_play),
        })
    }

    /// Credentials (when logged in or logging in) then a snapshot request.
    fn announce(&self) -> Vec<Effect> {
        let state = &self.core.state;
        let mut effects = Vec::with_capacity(2);
        if state.password.is_some() && (state.authenticated || state.awaiting_ack) {
            log::info!("re-sending admin login");
            effects.push(Effect::Emit(self.login_event()));
        }
        effects.push(request_state(state.request_name(Role::Admin)));
        effects
    }

    fn on_server(&mut self, event: ServerEvent) -> Vec<Effect> {
        match event {
            ServerEvent::LoginSuccess => {
                let first = !self.core.state.authenticated;
                self.core.state.authenticated = true;
                self.core.state.awaiting_ack = false;
                self.core.notice = None;
                self.core.persist();
                if first {
                    log::info!("admin authenticated");
                    vec![request_state(self.core.state.request_name(Role::Admin))]
                } else {
                    Vec::new()
                }
            }
            ServerEvent::LoginFailure { message } => {
                let message = message.unwrap_or_else(|| DEFAULT_LOGIN_FAILURE.to_owned());
                log::warn!("admin login refused: {message}");
                let state = &mut self.core.state;
                state.authenticated = false;
                state.awaiting_ack = false;
                state.password = None;
                self.core.notice = Some(message);
                self.core.persist();
                Vec::new()
            }
            ServerEvent::UpdatePlayers { players } => {
                self.core.roster.replace(players);
                Vec::new()
            }
            ServerEvent::AssignCard { card } => {
                log::info!("admin card assigned: {card}");
                self.core.assign_card(&card)
            }
            ServerEvent::StateRestored(snapshot) => {
                self.core.apply_snapshot(snapshot);
                Vec::new()
            }
            ServerEvent::GameStarted => {
                self.core.game_started();
                Vec::new()
            }
            ServerEvent::Error { message } => {
                log::warn!("server rejected admin action: {message}");
                if is_name_collision(&message) {
                    self.core.state.will_play = false;
                    self.core.state.name = None;
                    self.core.persist();
                }
                self.core.notice = Some(format!("Error: {message}"));
                Vec::new()
            }
        }
    }
}

impl<S: KeyValueStore> Controller for AdminClient<S> {
    type Action = AdminAction;

    fn handle(&mut self, input: Input<AdminAction>) -> Vec<Effect> {
        match input {
            Input::Boot { channel_open } => {
                if self.core.state.authenticated {
                    log::info!("restored admin session");
                }
                if self.core.boot(channel_open) {
                    self.announce()
                } else {
                    Vec::new()
                }
            }
            Input::Action(action) => self.on_action(action),
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
        render::admin_view(
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
