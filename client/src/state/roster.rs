//! Roster of joined player names as last reported by the server.

#[cfg(test)]
#[path = "roster_test.rs"]
mod roster_test;

/// Ordered player names. Every update is a complete snapshot, so the list
/// is replaced wholesale, never merged.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    players: Vec<String>,
}

impl Roster {
    /// Replace the roster with `players`. Returns `true` when the visible
    /// list changed.
    pub fn replace(&mut self, players: Vec<String>) -> bool {
        if self.players == players {
            return false;
        }
        self.players = players;
        true
    }

    #[must_use]
    pub fn players(&self) -> &[String] {
        &self.players
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.players.iter().any(|p| p == name)
    }
}
