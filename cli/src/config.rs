//! Runtime configuration: command-line values plus tuning knobs from the
//! environment.

use std::path::PathBuf;
use std::time::Duration;

use client::ClientOptions;
use client::render::CardImages;
use client::state::session::Role;

pub const DEFAULT_URL: &str = "ws://127.0.0.1:8080/ws";
pub const DEFAULT_STATE_DIR: &str = ".asesino";
pub const DEFAULT_WIRE: &str = "json";
pub const DEFAULT_RECONNECT_INITIAL_MS: u64 = 1000;
pub const DEFAULT_RECONNECT_MAX_MS: u64 = 10_000;
pub const DEFAULT_RECONNECT_MAX_ATTEMPTS: u64 = 0;
pub const DEFAULT_SELF_CHECK_MS: u64 = 2000;
pub const DEFAULT_BANNER_MS: u64 = 1000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown wire format '{0}' (expected 'json' or 'proto')")]
    UnknownWire(String),
    #[error("server url must start with ws:// or wss://, got '{0}'")]
    InvalidUrl(String),
}

/// Message encoding on the websocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// JSON text messages.
    Json,
    /// Protobuf binary messages.
    Proto,
}

impl WireFormat {
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownWire`] for anything but `json`/`proto`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "proto" | "protobuf" => Ok(Self::Proto),
            _ => Err(ConfigError::UnknownWire(raw.to_owned())),
        }
    }
}

/// Exponential backoff between reconnect attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial: Duration,
    pub max: Duration,
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(DEFAULT_RECONNECT_INITIAL_MS),
            max: Duration::from_millis(DEFAULT_RECONNECT_MAX_MS),
            max_attempts: None,
        }
    }
}

impl ReconnectPolicy {
    /// Read `ASESINO_RECONNECT_*`. Unparsable values fall back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let attempts = env_parse_u64(
            "ASESINO_RECONNECT_MAX_ATTEMPTS",
            DEFAULT_RECONNECT_MAX_ATTEMPTS,
        );
        Self {
            initial: env_millis("ASESINO_RECONNECT_INITIAL_MS", DEFAULT_RECONNECT_INITIAL_MS),
            max: env_millis("ASESINO_RECONNECT_MAX_MS", DEFAULT_RECONNECT_MAX_MS),
            max_attempts: (attempts > 0).then(|| u32::try_from(attempts).unwrap_or(u32::MAX)),
        }
    }

    /// Wait before retry number `attempt` (1-based): `initial` doubling per
    /// attempt, capped at `max`.
    #[must_use]
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 1_u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.initial.checked_mul(factor).map_or(self.max, |d| d.min(self.max))
    }

    /// Whether retry number `attempt` is past the cap.
    #[must_use]
    pub fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt > max)
    }
}

/// Everything the terminal runtime needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub url: String,
    pub state_dir: PathBuf,
    pub wire: WireFormat,
    pub card_template: String,
    pub reconnect: ReconnectPolicy,
    pub self_check: Duration,
    pub banner: Duration,
}

impl ClientConfig {
    /// Combine command-line values with the environment knobs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unknown wire format or a non-websocket
    /// url.
    pub fn new(
        url: String,
        state_dir: PathBuf,
        wire: &str,
        card_template: String,
    ) -> Result<Self, ConfigError> {
        if !(url.starts_with("ws://") || url.starts_with("wss://")) {
            return Err(ConfigError::InvalidUrl(url));
        }
        Ok(Self {
            url,
            state_dir,
            wire: WireFormat::parse(wire)?,
            card_template,
            reconnect: ReconnectPolicy::from_env(),
            self_check: env_millis("ASESINO_SELF_CHECK_MS", DEFAULT_SELF_CHECK_MS)
                .max(Duration::from_millis(1)),
            banner: env_millis("ASESINO_BANNER_MS", DEFAULT_BANNER_MS),
        })
    }

    /// Mirror file for `role`. Roles get separate files.
    #[must_use]
    pub fn store_path(&self, role: Role) -> PathBuf {
        let file = match role {
            Role::Player => "player.json",
            Role::Admin => "admin.json",
        };
        self.state_dir.join(file)
    }

    #[must_use]
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            images: CardImages::new(self.card_template.clone()),
            banner_ttl: self.banner,
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_millis(key: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_parse_u64(key, default_ms))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
