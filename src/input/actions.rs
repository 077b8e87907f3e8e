//! Command definitions and keyboard bindings

use macroquad::prelude::KeyCode;
use crate::world::Step;

/// Everything the player can ask for from the keyboard during play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    // Movement, relative to heading
    MoveForward,
    MoveBackward,
    SlideLeft,
    SlideRight,

    // Rotation
    TurnLeft,
    TurnRight,

    Interact,

    // System
    ToggleEditor,
    QuickSave,
    QuickLoad,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::MoveForward,
        Command::MoveBackward,
        Command::SlideLeft,
        Command::SlideRight,
        Command::TurnLeft,
        Command::TurnRight,
        Command::Interact,
        Command::ToggleEditor,
        Command::QuickSave,
        Command::QuickLoad,
    ];

    /// Movement commands map onto a relative step
    pub fn step(self) -> Option<Step> {
        match self {
            Command::MoveForward => Some(Step::Forward),
            Command::MoveBackward => Some(Step::Backward),
            Command::SlideLeft => Some(Step::SlideLeft),
            Command::SlideRight => Some(Step::SlideRight),
            _ => None,
        }
    }

    /// Keys bound to this command
    pub fn keys(self) -> &'static [KeyCode] {
        match self {
            Command::MoveForward => &[KeyCode::W, KeyCode::Up],
            Command::MoveBackward => &[KeyCode::S, KeyCode::Down],
            Command::SlideLeft => &[KeyCode::A, KeyCode::Z],
            Command::SlideRight => &[KeyCode::D, KeyCode::X],
            Command::TurnLeft => &[KeyCode::Q, KeyCode::Left],
            Command::TurnRight => &[KeyCode::E, KeyCode::Right],
            Command::Interact => &[KeyCode::Space],
            Command::ToggleEditor => &[KeyCode::Tab],
            Command::QuickSave => &[KeyCode::F5],
            Command::QuickLoad => &[KeyCode::F9],
        }
    }

    /// Which command a key triggers, if any
    pub fn from_key(key: KeyCode) -> Option<Command> {
        Command::ALL.into_iter().find(|c| c.keys().contains(&key))
    }
}

/// Shown in the event log when a level starts
pub const CONTROLS_HINT: &str =
    "Controls: W/S forward/back, A/D slide, Q/E turn, Space interact, Tab editor.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_bound_twice() {
        for (i, a) in Command::ALL.iter().enumerate() {
            for b in &Command::ALL[i + 1..] {
                for key in a.keys() {
                    assert!(!b.keys().contains(key), "{:?} bound to {:?} and {:?}", key, a, b);
                }
            }
        }
    }

    #[test]
    fn test_from_key() {
        assert_eq!(Command::from_key(KeyCode::W), Some(Command::MoveForward));
        assert_eq!(Command::from_key(KeyCode::Up), Some(Command::MoveForward));
        assert_eq!(Command::from_key(KeyCode::Z), Some(Command::SlideLeft));
        assert_eq!(Command::from_key(KeyCode::Left), Some(Command::TurnLeft));
        assert_eq!(Command::from_key(KeyCode::F9), Some(Command::QuickLoad));
        assert_eq!(Command::from_key(KeyCode::P), None);
    }

    #[test]
    fn test_only_movement_has_steps() {
        let steps: Vec<_> = Command::ALL.iter().filter_map(|c| c.step()).collect();
        assert_eq!(steps, vec![Step::Forward, Step::Backward, Step::SlideLeft, Step::SlideRight]);
    }
}
