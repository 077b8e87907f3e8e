//! Keyboard input
//!
//! Keys map to a small closed set of commands. The app shell decides what a
//! command does; this module only knows which keys were pressed.

mod actions;
mod state;

pub use actions::*;
pub use state::*;
