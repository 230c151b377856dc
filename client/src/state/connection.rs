//! Connection status as shown to the user.
//!
//! DESIGN
//! ======
//! The status is driven by channel lifecycle callbacks, which can be missed
//! or coalesced. A periodic self-check compares the displayed status with
//! the channel's actual state and corrects drift. Every entry into
//! `Connected`, whichever path produced it, is reported so the controller
//! can re-announce identity and re-sync.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

use std::time::Duration;

use crate::net::channel::ChannelEvent;

/// Default interval between self-checks.
pub const SELF_CHECK_INTERVAL: Duration = Duration::from_secs(2);

/// Realtime channel status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Socket closed or not yet opened.
    #[default]
    Disconnected,
    /// The channel is retrying; `attempt` is known when the channel reported it.
    Reconnecting { attempt: Option<u32> },
    Connected,
    /// Retries exhausted. Only an actual reconnect leaves this state.
    Failed,
}

impl ConnectionStatus {
    #[must_use]
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Style class for the status indicator.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Connected => "connected",
            Self::Reconnecting { .. } => "reconnecting",
            Self::Disconnected | Self::Failed => "disconnected",
        }
    }

    /// Human-readable indicator text.
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::Connected => "Connected".to_owned(),
            Self::Disconnected => "Disconnected".to_owned(),
            Self::Reconnecting { attempt: Some(n) } => format!("Reconnecting... ({n})"),
            Self::Reconnecting { attempt: None } => "Reconnecting...".to_owned(),
            Self::Failed => "Connection Failed".to_owned(),
        }
    }
}

/// Result of feeding the monitor one observation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Changed,
    /// Entered `Connected` from any other status.
    Connected,
}

impl Transition {
    #[must_use]
    pub fn became_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Tracks the displayed connection status.
#[derive(Clone, Debug, Default)]
pub struct ConnectionMonitor {
    status: ConnectionStatus,
}

impl ConnectionMonitor {
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Apply a channel lifecycle callback.
    pub fn observe(&mut self, event: ChannelEvent) -> Transition {
        let next = match event {
            ChannelEvent::Connect | ChannelEvent::Reconnect(_) => ConnectionStatus::Connected,
            ChannelEvent::Disconnect => ConnectionStatus::Disconnected,
            ChannelEvent::ReconnectAttempt(n) => ConnectionStatus::Reconnecting {
                attempt: Some(n),
            },
            ChannelEvent::ReconnectError => match self.status {
                ConnectionStatus::Reconnecting { .. } => self.status,
                _ => ConnectionStatus::Reconnecting { attempt: None },
            },
            ChannelEvent::ReconnectFailed => ConnectionStatus::Failed,
        };
        self.set(next)
    }

    /// Reconcile the displayed status with the channel's actual state.
    ///
    /// Only the connected/not-connected distinction is corrected; a
    /// reconnecting or failed status is left alone while the channel is down.
    pub fn self_check(&mut self, actually_connected: bool) -> Transition {
        match (actually_connected, self.status) {
            (true, status) if !status.is_connected() => self.set(ConnectionStatus::Connected),
            (false, ConnectionStatus::Connected) => self.set(ConnectionStatus::Disconnected),
            _ => Transition::Unchanged,
        }
    }

    fn set(&mut self, next: ConnectionStatus) -> Transition {
        if next == self.status {
            return Transition::Unchanged;
        }
        let was_connected = self.status.is_connected();
        self.status = next;
        if next.is_connected() && !was_connected {
            Transition::Connected
        } else {
            Transition::Changed
        }
    }
}
