//! Pure render layer: session state in, view description out.
//!
//! DESIGN
//! ======
//! Rendering never looks at what was on screen before; every call derives
//! the whole view from current state. Hosts (browser, terminal) diff
//! successive [`View`]s and only redraw on change, which keeps repeated
//! identical snapshots flicker-free.
//!
//! Every view carries the connection status indicator, including the card
//! screen that replaces everything else.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use crate::state::banner::Banner;
use crate::state::connection::ConnectionStatus;
use crate::state::roster::Roster;
use crate::state::session::{AdminPhase, PlayerPhase, SessionState};

pub const DEFAULT_CARD_TEMPLATE: &str = "/static/images/{card}.svg";
pub const CARD_ALT: &str = "Your card";
pub const QUEUE_HEADING: &str = "Waiting for the game to start...";

/// Maps opaque card ids to image paths through a `{card}` template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardImages {
    template: String,
}

impl Default for CardImages {
    fn default() -> Self {
        Self::new(DEFAULT_CARD_TEMPLATE)
    }
}

impl CardImages {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    #[must_use]
    pub fn path(&self, card: &str) -> String {
        self.template.replace("{card}", card)
    }

    #[must_use]
    pub fn card_view(&self, card: &str) -> CardView {
        CardView {
            card: card.to_owned(),
            image: self.path(card),
            alt: CARD_ALT,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub card: String,
    pub image: String,
    pub alt: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusIndicator {
    pub class: &'static str,
    pub text: String,
}

impl From<ConnectionStatus> for StatusIndicator {
    fn from(status: ConnectionStatus) -> Self {
        Self {
            class: status.css_class(),
            text: status.label(),
        }
    }
}

/// Main content area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Screen {
    /// Player join form, prefilled with the last used name.
    JoinForm { name: String },
    /// Player waiting room.
    Queue {
        heading: String,
        players: Vec<String>,
    },
    /// Card image; replaces the whole page.
    Card(CardView),
    /// Admin login form. The play-name field is only enabled (and required)
    /// while `will_play` is set.
    LoginForm {
        will_play: bool,
        play_name: String,
        pending: bool,
    },
    Dashboard {
        players: Vec<String>,
        game_started: bool,
        can_start: bool,
        card: Option<CardView>,
    },
}

/// Everything a host needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    pub screen: Screen,
    pub status: StatusIndicator,
    pub banner: Option<String>,
    pub notice: Option<String>,
}

/// Chrome shared by both clients.
#[derive(Clone, Copy, Debug)]
pub struct Chrome<'a> {
    pub status: ConnectionStatus,
    pub banner: Option<&'a Banner>,
    pub notice: Option<&'a str>,
}

impl Chrome<'_> {
    fn wrap(&self, screen: Screen) -> View {
        View {
            screen,
            status: self.status.into(),
            banner: self.banner.map(|b| b.text.clone()),
            notice: self.notice.map(str::to_owned),
        }
    }
}

#[must_use]
pub fn player_view(
    state: &SessionState,
    roster: &Roster,
    chrome: &Chrome<'_>,
    images: &CardImages,
) -> View {
    let waiting = || Screen::Queue {
        heading: QUEUE_HEADING.to_owned(),
        players: roster.players().to_vec(),
    };
    let screen = match state.player_phase() {
        PlayerPhase::FormVisible => Screen::JoinForm {
            name: state.name.clone().unwrap_or_default(),
        },
        PlayerPhase::Joining => Screen::Queue {
            heading: format!("Joining as {}...", state.name.as_deref().unwrap_or_default()),
            players: roster.players().to_vec(),
        },
        PlayerPhase::Queued => waiting(),
        PlayerPhase::CardShown => match state.assigned_card.as_deref() {
            Some(card) => Screen::Card(images.card_view(card)),
            None => waiting(),
        },
    };
    chrome.wrap(screen)
}

#[must_use]
pub fn admin_view(
    state: &SessionState,
    roster: &Roster,
    chrome: &Chrome<'_>,
    images: &CardImages,
) -> View {
    let screen = match state.admin_phase() {
        AdminPhase::LoginVisible | AdminPhase::Authenticating => Screen::LoginForm {
            will_play: state.will_play,
            play_name: state.name.clone().unwrap_or_default(),
            pending: state.admin_phase() == AdminPhase::Authenticating,
        },
        AdminPhase::Dashboard => Screen::Dashboard {
            players: roster.players().to_vec(),
            game_started: state.game_started,
            can_start: chrome.status.is_connected(),
            card: state.assigned_card.as_deref().map(|card| images.card_view(card)),
        },
    };
    chrome.wrap(screen)
}
