//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` holds identity and game flags, `roster` the player list,
//! `connection` the channel status indicator, and `banner` the transient
//! acknowledgment banner. Controllers own one of each.

pub mod banner;
pub mod connection;
pub mod roster;
pub mod session;
