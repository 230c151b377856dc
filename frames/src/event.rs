//! Typed game events carried inside [`Frame`]s.
//!
//! DESIGN
//! ======
//! Event names and payload field names are fixed by the game server
//! (camelCase). Outbound and inbound events are separate enums so each side
//! of the channel can only construct what it is allowed to send.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{CodecError, Frame};

pub const JOIN: &str = "join";
pub const ADMIN_LOGIN: &str = "adminLogin";
pub const START_GAME: &str = "startGame";
pub const REQUEST_STATE: &str = "requestState";

pub const LOGIN_SUCCESS: &str = "loginSuccess";
pub const LOGIN_FAILURE: &str = "loginFailure";
pub const UPDATE_PLAYERS: &str = "updatePlayers";
pub const ASSIGN_CARD: &str = "assignCard";
pub const STATE_RESTORED: &str = "stateRestored";
pub const GAME_STARTED: &str = "gameStarted";
pub const ERROR: &str = "error";

/// Admin credentials plus optional participation as a player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminLogin {
    pub password: String,
    /// Participation name; only sent when the admin plays.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub will_play: Option<bool>,
}

/// Authoritative session snapshot pushed by the server.
///
/// Every field is optional; an absent field carries no information and must
/// not overwrite local state.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_started: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<String>>,
}

/// Events emitted by a client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientEvent {
    /// A player identifies with a display name.
    Join { name: String },
    /// The admin authenticates.
    AdminLogin(AdminLogin),
    /// The admin starts the round.
    StartGame,
    /// Ask the server for an authoritative [`StateSnapshot`].
    RequestState { name: Option<String> },
}

/// Events pushed by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ServerEvent {
    LoginSuccess,
    LoginFailure { message: Option<String> },
    /// Complete roster; replaces whatever the client showed before.
    UpdatePlayers { players: Vec<String> },
    AssignCard { card: String },
    StateRestored(StateSnapshot),
    GameStarted,
    /// A rejected action, e.g. `"Name already taken"`.
    Error { message: String },
}

#[derive(Serialize, Deserialize)]
struct NamePayload {
    name: String,
}

#[derive(Default, Serialize, Deserialize)]
struct OptionalNamePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Default, Serialize, Deserialize)]
struct OptionalMessagePayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

#[derive(Serialize, Deserialize)]
struct MessagePayload {
    message: String,
}

#[derive(Serialize, Deserialize)]
struct PlayersPayload {
    players: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct CardPayload {
    card: String,
}

impl ClientEvent {
    /// Wire name of this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Join { .. } => JOIN,
            Self::AdminLogin(_) => ADMIN_LOGIN,
            Self::StartGame => START_GAME,
            Self::RequestState { .. } => REQUEST_STATE,
        }
    }

    /// Convert into an unstamped frame.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        let data = match self {
            Self::Join { name } => to_value(&NamePayload { name: name.clone() }),
            Self::AdminLogin(login) => to_value(login),
            Self::StartGame => Value::Object(Map::new()),
            Self::RequestState { name } => to_value(&OptionalNamePayload { name: name.clone() }),
        };
        Frame::new(self.name(), data)
    }

    /// Parse a frame received from a client.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownEvent`] for names outside the client
    /// vocabulary and [`CodecError::Payload`] for malformed payloads.
    pub fn from_frame(frame: &Frame) -> Result<Self, CodecError> {
        match frame.event.as_str() {
            JOIN => {
                let payload: NamePayload = payload(frame)?;
                Ok(Self::Join { name: payload.name })
            }
            ADMIN_LOGIN => Ok(Self::AdminLogin(payload(frame)?)),
            START_GAME => Ok(Self::StartGame),
            REQUEST_STATE => {
                let payload: OptionalNamePayload = payload_or_default(frame)?;
                Ok(Self::RequestState { name: payload.name })
            }
            other => Err(CodecError::UnknownEvent(other.to_owned())),
        }
    }
}

impl ServerEvent {
    /// Wire name of this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSuccess => LOGIN_SUCCESS,
            Self::LoginFailure { .. } => LOGIN_FAILURE,
            Self::UpdatePlayers { .. } => UPDATE_PLAYERS,
            Self::AssignCard { .. } => ASSIGN_CARD,
            Self::StateRestored(_) => STATE_RESTORED,
            Self::GameStarted => GAME_STARTED,
            Self::Error { .. } => ERROR,
        }
    }

    /// Convert into an unstamped frame.
    #[must_use]
    pub fn to_frame(&self) -> Frame {
        let data = match self {
            Self::LoginSuccess | Self::GameStarted => Value::Object(Map::new()),
            Self::LoginFailure { message } => to_value(&OptionalMessagePayload {
                message: message.clone(),
            }),
            Self::UpdatePlayers { players } => to_value(&PlayersPayload {
                players: players.clone(),
            }),
            Self::AssignCard { card } => to_value(&CardPayload { card: card.clone() }),
            Self::StateRestored(snapshot) => to_value(snapshot),
            Self::Error { message } => to_value(&MessagePayload {
                message: message.clone(),
            }),
        };
        Frame::new(self.name(), data)
    }

    /// Parse a frame received from the server.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownEvent`] for names outside the server
    /// vocabulary and [`CodecError::Payload`] for malformed payloads.
    pub fn from_frame(frame: &Frame) -> Result<Self, CodecError> {
        match frame.event.as_str() {
            LOGIN_SUCCESS => Ok(Self::LoginSuccess),
            LOGIN_FAILURE => {
                let payload: OptionalMessagePayload = payload_or_default(frame)?;
                Ok(Self::LoginFailure {
                    message: payload.message,
                })
            }
            UPDATE_PLAYERS => {
                let payload: PlayersPayload = payload(frame)?;
                Ok(Self::UpdatePlayers {
                    players: payload.players,
                })
            }
            ASSIGN_CARD => {
                let payload: CardPayload = payload(frame)?;
                Ok(Self::AssignCard { card: payload.card })
            }
            STATE_RESTORED => Ok(Self::StateRestored(payload_or_default(frame)?)),
            GAME_STARTED => Ok(Self::GameStarted),
            ERROR => {
                let payload: MessagePayload = payload(frame)?;
                Ok(Self::Error {
                    message: payload.message,
                })
            }
            other => Err(CodecError::UnknownEvent(other.to_owned())),
        }
    }
}

fn to_value<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or_else(|_| Value::Object(Map::new()))
}

fn payload<T: DeserializeOwned>(frame: &Frame) -> Result<T, CodecError> {
    serde_json::from_value(frame.data.clone()).map_err(|source| CodecError::Payload {
        event: frame.event.clone(),
        source,
    })
}

fn payload_or_default<T: DeserializeOwned + Default>(frame: &Frame) -> Result<T, CodecError> {
    if frame.data.is_null() {
        return Ok(T::default());
    }
    payload(frame)
}

#[cfg(test)]
#[path = "event_test.rs"]
mod tests;
