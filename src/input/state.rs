//! Per-frame keyboard polling

use macroquad::prelude::*;
use super::actions::Command;

/// Commands whose keys went down this frame, in declaration order.
///
/// Key-repeat is ignored; one press is one command.
pub fn pressed_commands() -> Vec<Command> {
    Command::ALL
        .into_iter()
        .filter(|c| c.keys().iter().any(|&k| is_key_pressed(k)))
        .collect()
}

/// Ctrl (either side) is held
pub fn ctrl_down() -> bool {
    is_key_down(KeyCode::LeftControl)
        || is_key_down(KeyCode::RightControl)
        || is_key_down(KeyCode::LeftSuper)
        || is_key_down(KeyCode::RightSuper)
}
