//! Networking vocabulary shared by controllers and transports.
//!
//! SYSTEM CONTEXT
//! ==============
//! `channel` defines lifecycle callbacks; the game events themselves come
//! from the `frames` crate and are re-exported here.

pub mod channel;

pub use frames::{AdminLogin, ClientEvent, Frame, ServerEvent, StateSnapshot};
