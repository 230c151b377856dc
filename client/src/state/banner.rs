//! Transient acknowledgment banner.
//!
//! A raised banner carries a sequence number; the dismissal timer for it
//! only clears that exact banner, so a newer banner survives an older timer.

#[cfg(test)]
#[path = "banner_test.rs"]
mod banner_test;

use std::time::Duration;

/// Text shown when a card arrives.
pub const CARD_BANNER_TEXT: &str = "New Cards Received";

/// How long a banner stays up.
pub const BANNER_TTL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub seq: u64,
    pub text: String,
}

/// Holds at most one banner.
#[derive(Clone, Debug, Default)]
pub struct BannerSlot {
    current: Option<Banner>,
    next_seq: u64,
}

impl BannerSlot {
    /// Show `text`, replacing any banner already up. Returns the sequence
    /// number to dismiss it with.
    pub fn raise(&mut self, text: &str) -> u64 {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.current = Some(Banner { seq, text: text.to_owned() });
        seq
    }

    /// Clear the banner if it is still the one raised as `seq`.
    pub fn dismiss(&mut self, seq: u64) -> bool {
        if self.current.as_ref().is_some_and(|b| b.seq == seq) {
            self.current = None;
            return true;
        }
        false
    }

    #[must_use]
    pub fn current(&self) -> Option<&Banner> {
        self.current.as_ref()
    }
}
