//! Realtime channel lifecycle vocabulary.
//!
//! The transport (browser socket, tokio websocket) reports these callbacks;
//! controllers only ever see this enum, never the transport itself.

/// Channel lifecycle callbacks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelEvent {
    /// First successful open.
    Connect,
    /// The open socket closed.
    Disconnect,
    /// Retry number `n` is starting.
    ReconnectAttempt(u32),
    /// Retry number `n` succeeded.
    Reconnect(u32),
    /// A retry failed; more may follow.
    ReconnectError,
    /// Retries are exhausted.
    ReconnectFailed,
}

impl ChannelEvent {
    /// Callback name as used by socket-style channels.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Connect => "connect",
            Self::Disconnect => "disconnect",
            Self::ReconnectAttempt(_) => "reconnect_attempt",
            Self::Reconnect(_) => "reconnect",
            Self::ReconnectError => "reconnect_error",
            Self::ReconnectFailed => "reconnect_failed",
        }
    }
}
