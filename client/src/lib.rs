//! Session core for the Asesino player and admin clients.
//!
//! ARCHITECTURE
//! ============
//! `state` holds the per-session values, `persist` mirrors them into a
//! key-value store, `render` turns them into a [`render::View`], and
//! `controller` ties everything together behind one transition function
//! per client. Transports live outside this crate: a host feeds
//! [`controller::Input`]s in and executes the returned
//! [`controller::Effect`]s.

pub mod controller;
pub mod net;
pub mod persist;
pub mod render;
pub mod state;

pub use controller::admin::{AdminAction, AdminClient};
pub use controller::player::{PlayerAction, PlayerClient};
pub use controller::{ClientOptions, Controller, Effect, Input};
