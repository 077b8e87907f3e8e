//! Editor action definitions
//!
//! Every editor operation with its shortcut and help text. The help panel is
//! drawn from the same table the shortcuts are matched against.

use std::path::Path;
use macroquad::prelude::KeyCode;
use crate::world::GridWorld;
use super::state::{EditorFeedback, EditorMode, EditorState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditorAction {
    ModeWall,
    ModeEntity,
    ModeErase,
    CycleKind,
    CycleSprite,
    TogglePassable,
    ClearLevel,
    Undo,
    Redo,
    Save,
    Open,
    Close,
}

/// Key plus modifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: KeyCode,
    pub ctrl: bool,
    pub shift: bool,
}

impl Shortcut {
    pub const fn key(key: KeyCode) -> Self {
        Self { key, ctrl: false, shift: false }
    }

    pub const fn ctrl(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: false }
    }

    pub const fn ctrl_shift(key: KeyCode) -> Self {
        Self { key, ctrl: true, shift: true }
    }

    pub fn matches(&self, key: KeyCode, ctrl: bool, shift: bool) -> bool {
        self.key == key && self.ctrl == ctrl && self.shift == shift
    }

    pub fn label(&self) -> String {
        let mut s = String::new();
        if self.ctrl {
            s.push_str("Ctrl+");
        }
        if self.shift {
            s.push_str("Shift+");
        }
        s.push_str(&format!("{:?}", self.key));
        s
    }
}

pub struct ActionDef {
    pub action: EditorAction,
    pub shortcut: Shortcut,
    pub label: &'static str,
}

pub const EDITOR_ACTIONS: &[ActionDef] = &[
    ActionDef { action: EditorAction::ModeWall, shortcut: Shortcut::key(KeyCode::Key1), label: "Wall mode" },
    ActionDef { action: EditorAction::ModeEntity, shortcut: Shortcut::key(KeyCode::Key2), label: "Entity mode" },
    ActionDef { action: EditorAction::ModeErase, shortcut: Shortcut::key(KeyCode::Key3), label: "Erase mode" },
    ActionDef { action: EditorAction::CycleKind, shortcut: Shortcut::key(KeyCode::K), label: "Next entity kind" },
    ActionDef { action: EditorAction::CycleSprite, shortcut: Shortcut::key(KeyCode::V), label: "Next sprite" },
    ActionDef { action: EditorAction::TogglePassable, shortcut: Shortcut::key(KeyCode::P), label: "Toggle passable" },
    ActionDef { action: EditorAction::ClearLevel, shortcut: Shortcut::ctrl_shift(KeyCode::Delete), label: "Clear level" },
    ActionDef { action: EditorAction::Undo, shortcut: Shortcut::ctrl(KeyCode::Z), label: "Undo" },
    ActionDef { action: EditorAction::Redo, shortcut: Shortcut::ctrl_shift(KeyCode::Z), label: "Redo" },
    ActionDef { action: EditorAction::Save, shortcut: Shortcut::ctrl(KeyCode::S), label: "Save level" },
    ActionDef { action: EditorAction::Open, shortcut: Shortcut::ctrl(KeyCode::O), label: "Open level" },
    ActionDef { action: EditorAction::Close, shortcut: Shortcut::key(KeyCode::Escape), label: "Leave editor" },
];

/// Action bound to a key press with the given modifiers
pub fn action_for(key: KeyCode, ctrl: bool, shift: bool) -> Option<EditorAction> {
    EDITOR_ACTIONS
        .iter()
        .find(|def| def.shortcut.matches(key, ctrl, shift))
        .map(|def| def.action)
}

/// Run an action. Selection changes return None; everything else reports.
pub fn perform(
    action: EditorAction,
    editor: &mut EditorState,
    world: &mut GridWorld,
    levels_dir: &Path,
) -> Option<EditorFeedback> {
    match action {
        EditorAction::ModeWall => editor.mode = EditorMode::Wall,
        EditorAction::ModeEntity => editor.mode = EditorMode::Entity,
        EditorAction::ModeErase => editor.mode = EditorMode::Erase,
        EditorAction::CycleKind => editor.cycle_kind(),
        EditorAction::CycleSprite => editor.cycle_sprite(),
        EditorAction::TogglePassable => editor.toggle_passable(),
        EditorAction::ClearLevel => return Some(editor.clear_level(world)),
        EditorAction::Undo => return Some(editor.undo(world)),
        EditorAction::Redo => return Some(editor.redo(world)),
        EditorAction::Save => return Some(editor.save(world, levels_dir)),
        EditorAction::Open => return Some(editor.load(world, levels_dir)),
        EditorAction::Close => editor.active = false,
    }
    None
}
