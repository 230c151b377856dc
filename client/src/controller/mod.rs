//! Session controllers: one explicit state machine per client.
//!
//! ARCHITECTURE
//! ============
//! A controller owns its [`SessionState`], roster, connection monitor,
//! banner, and mirror. Every stimulus (boot, user action, server event,
//! lifecycle callback, timer expiry) goes through one transition function,
//! [`Controller::handle`], which mutates state, writes the mirror, and
//! returns [`Effect`]s for the host to execute. Hosts never touch state
//! directly; they execute effects and redraw [`Controller::view`].
//!
//! Write-before-send: every handler persists the mirror before returning
//! an `Emit` effect, so a restart between the two cannot lose identity.

pub mod admin;
pub mod player;

use std::time::Duration;

use frames::{ClientEvent, ServerEvent, StateSnapshot};

use crate::net::channel::ChannelEvent;
use crate::persist::{KeyValueStore, SessionMirror};
use crate::render::{CardImages, Chrome, View};
use crate::state::banner::{BANNER_TTL, BannerSlot, CARD_BANNER_TEXT};
use crate::state::connection::{ConnectionMonitor, ConnectionStatus};
use crate::state::roster::Roster;
use crate::state::session::{Role, SessionState};

/// Host-tunable presentation options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientOptions {
    pub images: CardImages,
    pub banner_ttl: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            images: CardImages::default(),
            banner_ttl: BANNER_TTL,
        }
    }
}

/// One stimulus for a controller. `A` is the role's user-action type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input<A> {
    /// Start of the session. `channel_open` tells whether the channel is
    /// already usable, in which case identity is announced right away.
    Boot { channel_open: bool },
    Action(A),
    Server(ServerEvent),
    Channel(ChannelEvent),
    /// Periodic comparison against the channel's actual state.
    SelfCheck { connected: bool },
    BannerExpired(u64),
}

/// Work for the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Fire-and-forget send.
    Emit(ClientEvent),
    /// Feed `Input::BannerExpired(seq)` back after `after`.
    DismissBanner { seq: u64, after: Duration },
}

/// A client state machine.
pub trait Controller {
    type Action;

    fn handle(&mut self, input: Input<Self::Action>) -> Vec<Effect>;

    fn view(&self) -> View;

    fn status(&self) -> ConnectionStatus;
}

/// Server error text that means the chosen name is in use.
#[must_use]
pub fn is_name_collision(message: &str) -> bool {
    message.to_ascii_lowercase().contains("already taken")
}

fn request_state(name: Option<String>) -> Effect {
    Effect::Emit(ClientEvent::RequestState { name })
}

/// State and plumbing shared by both controllers.
#[derive(Debug)]
struct SessionCore<S> {
    state: SessionState,
    roster: Roster,
    monitor: ConnectionMonitor,
    banner: BannerSlot,
    notice: Option<String>,
    mirror: SessionMirror<S>,
    options: ClientOptions,
}

impl<S: KeyValueStore> SessionCore<S> {
    fn new(store: S, role: Role, options: ClientOptions) -> Self {
        let mirror = SessionMirror::new(store, role);
        let state = mirror.load();
        Self {
            state,
            roster: Roster::default(),
            monitor: ConnectionMonitor::default(),
            banner: BannerSlot::default(),
            notice: None,
            mirror,
            options,
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.mirror.save(&self.state) {
            log::warn!("session mirror write failed: {e}");
        }
    }

    /// Returns `true` when the boot found the channel already open.
    fn boot(&mut self, channel_open: bool) -> bool {
        channel_open && self.monitor.self_check(true).became_connected()
    }

    /// Returns `true` when the callback moved the session into `Connected`.
    fn observe(&mut self, event: ChannelEvent) -> bool {
        log::debug!("channel {}", event.name());
        self.monitor.observe(event).became_connected()
    }

    fn self_check(&mut self, connected: bool) -> bool {
        let became_connected = self.monitor.self_check(connected).became_connected();
        if became_connected {
            log::info!("self-check corrected status to connected");
        }
        became_connected
    }

    fn assign_card(&mut self, card: &str) -> Vec<Effect> {
        self.state.assign_card(card);
        self.persist();
        let seq = self.banner.raise(CARD_BANNER_TEXT);
        vec![Effect::DismissBanner {
            seq,
            after: self.options.banner_ttl,
        }]
    }

    fn game_started(&mut self) {
        self.state.game_started = true;
        self.persist();
    }

    fn apply_snapshot(&mut self, snapshot: StateSnapshot) {
        self.state.apply_snapshot(&snapshot);
        if let Some(players) = snapshot.players {
            self.roster.replace(players);
        }
        self.persist();
    }

    fn chrome(&self) -> Chrome<'_> {
        Chrome {
            status: self.monitor.status(),
            banner: self.banner.current(),
            notice: self.notice.as_deref(),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
