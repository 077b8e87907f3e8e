//! Application state
//!
//! Owns the world and everything that acts on it. The main loop feeds it
//! commands, clicks and frame time; renderers read from it.

use std::path::{Path, PathBuf};
use crate::config::GameConfig;
use crate::editor::{perform, EditorAction, EditorFeedback, EditorState};
use crate::input::{Command, CONTROLS_HINT};
use crate::render::{render_rows, MotionEvent, MoveAnimator};
use crate::world::{load_level, save_level, Coord, GridWorld};

/// Logged when Interact finds nothing ahead
pub const NOBODY_HERE: &str = "There is nobody here to interact with.";

pub struct AppState {
    pub world: GridWorld,
    pub animator: MoveAnimator,
    pub editor: EditorState,
    pub config: GameConfig,
}

impl AppState {
    /// Built-in dungeon, then the start level if one is configured.
    pub fn new(config: GameConfig, start_level: Option<PathBuf>) -> Self {
        let mut app = Self {
            world: GridWorld::default(),
            animator: MoveAnimator::new(config.move_duration),
            editor: EditorState::new(),
            config,
        };
        app.world.add_log_entry(CONTROLS_HINT);

        let start = start_level.or_else(|| app.config.start_level.clone());
        if let Some(path) = start {
            let feedback = app.editor.load_path(&mut app.world, &path);
            match &feedback {
                EditorFeedback::Failed(msg) => log::error!("[App] Start level: {}", msg),
                other => log::info!("[App] {}", other),
            }
        }
        app
    }

    /// Apply a keyboard command at time `now` (seconds).
    pub fn handle_command(&mut self, command: Command, now: f64) {
        if let Some(step) = command.step() {
            if !self.animator.is_moving() {
                let (dx, dy) = self.world.heading().delta(step);
                self.animator.start(&mut self.world, dx, dy);
            }
            return;
        }

        match command {
            // A pending slide keeps its original direction
            Command::TurnLeft => self.world.turn_left(),
            Command::TurnRight => self.world.turn_right(),
            Command::Interact => {
                let message = match self.world.interact_with_entity_ahead() {
                    Some(interaction) => interaction.message,
                    None => NOBODY_HERE.to_string(),
                };
                self.world.add_log_entry(message);
            }
            Command::ToggleEditor => {
                self.editor.active = !self.editor.active;
                let text = if self.editor.active { "Editor opened" } else { "Editor closed" };
                self.editor.set_status(text, now, 1.5);
            }
            Command::QuickSave => self.quick_save(),
            Command::QuickLoad => self.quick_load(),
            Command::MoveForward | Command::MoveBackward | Command::SlideLeft | Command::SlideRight => {}
        }
    }

    /// Advance animations by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Option<MotionEvent> {
        self.animator.tick(&mut self.world, dt)
    }

    /// Mouse click on a grid cell while the editor is open.
    pub fn editor_click(&mut self, pos: Coord, primary: bool, now: f64) -> Option<EditorFeedback> {
        if !self.editor.active {
            return None;
        }
        let feedback = if primary {
            self.editor.apply_primary(&mut self.world, pos)
        } else {
            self.editor.apply_secondary(&mut self.world, pos)
        };
        self.editor.report(&feedback, now);
        Some(feedback)
    }

    /// Editor shortcut.
    pub fn editor_action(&mut self, action: EditorAction, now: f64) {
        let dir = self.config.levels_dir.clone();
        if let Some(feedback) = perform(action, &mut self.editor, &mut self.world, &dir) {
            if matches!(feedback, EditorFeedback::Loaded { .. }) {
                self.animator.cancel();
                log_map(&self.world);
            }
            self.editor.report(&feedback, now);
        }
    }

    pub fn quicksave_path(&self) -> PathBuf {
        self.config.quicksave_path()
    }

    fn quick_save(&mut self) {
        let path = self.quicksave_path();
        match save_level(&self.world, &path, &self.editor.level_name) {
            Ok(()) => self.world.add_log_entry("Game saved."),
            Err(e) => {
                log::error!("[App] Quicksave to {} failed: {}", path.display(), e);
                self.world.add_log_entry("The game could not be saved.");
            }
        }
    }

    fn quick_load(&mut self) {
        let path = self.quicksave_path();
        if !Path::new(&path).is_file() {
            self.world.add_log_entry("There is no saved game.");
            return;
        }
        match load_level(&path) {
            Ok(snapshot) => {
                self.animator.cancel();
                let feedback = self.editor.apply_snapshot(&mut self.world, &snapshot);
                log::info!("[App] Quickload: {}", feedback);
                log_map(&self.world);
            }
            Err(e) => {
                log::error!("[App] Quickload from {} failed: {}", path.display(), e);
                self.world.add_log_entry("The saved game could not be loaded.");
            }
        }
    }
}

/// Dump the map to the debug log after a load
fn log_map(world: &GridWorld) {
    if log::log_enabled!(log::Level::Debug) {
        for row in render_rows(world) {
            log::debug!("[App] {}", row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityKind, EntityOverrides, Heading, Layout};

    fn app_in(dir: &Path) -> AppState {
        let config = GameConfig {
            levels_dir: dir.to_path_buf(),
            move_duration: 0.1,
            ..GameConfig::default()
        };
        let mut app = AppState::new(config, None);
        app.world.initialize(&Layout::blank(10));
        app
    }

    #[test]
    fn test_startup_log_has_controls_hint() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig { levels_dir: dir.path().to_path_buf(), ..GameConfig::default() };
        let app = AppState::new(config, None);
        assert_eq!(app.world.log().latest(), Some(CONTROLS_HINT));
        assert_eq!(app.world.player_pos(), Coord::new(5, 5));
    }

    #[test]
    fn test_forward_commits_after_animation() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_command(Command::MoveForward, 0.0);
        // Second press while sliding is ignored
        app.handle_command(Command::MoveForward, 0.0);
        assert_eq!(app.world.player_pos(), Coord::new(5, 5));

        assert_eq!(app.update(0.2), Some(MotionEvent::Committed(Coord::new(5, 4))));
        assert_eq!(app.world.player_pos(), Coord::new(5, 4));
    }

    #[test]
    fn test_turn_then_slide() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_command(Command::TurnRight, 0.0);
        assert_eq!(app.world.heading(), Heading::East);
        app.handle_command(Command::SlideLeft, 0.0);
        app.update(1.0);
        // Facing east, left is north
        assert_eq!(app.world.player_pos(), Coord::new(5, 4));
    }

    #[test]
    fn test_interact_with_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_command(Command::Interact, 0.0);
        assert_eq!(app.world.log().latest(), Some(NOBODY_HERE));
    }

    #[test]
    fn test_interact_with_enemy() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.world.add_entity(5, 4, EntityKind::Enemy, EntityOverrides::default()).unwrap();
        app.handle_command(Command::Interact, 0.0);
        assert_eq!(
            app.world.log().latest(),
            Some("Goblin snarls at you! Prepare for battle!")
        );
    }

    #[test]
    fn test_editor_clicks_only_when_active() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        assert_eq!(app.editor_click(Coord::new(2, 2), true, 0.0), None);
        assert!(!app.world.is_wall(2, 2));

        app.handle_command(Command::ToggleEditor, 0.0);
        assert!(app.editor.active);
        let feedback = app.editor_click(Coord::new(2, 2), true, 0.0).unwrap();
        assert!(feedback.is_edit());
        assert!(app.world.is_wall(2, 2));
        assert_eq!(app.editor.get_status(0.5), Some("Wall placed at (2, 2)."));

        app.editor_click(Coord::new(2, 2), false, 1.0);
        assert!(!app.world.is_wall(2, 2));
    }

    #[test]
    fn test_quicksave_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.handle_command(Command::QuickLoad, 0.0);
        assert_eq!(app.world.log().latest(), Some("There is no saved game."));

        app.world.toggle_wall(2, 2).unwrap();
        app.handle_command(Command::QuickSave, 0.0);
        assert_eq!(app.world.log().latest(), Some("Game saved."));
        assert!(app.quicksave_path().is_file());

        app.world.toggle_wall(2, 2).unwrap();
        app.handle_command(Command::QuickLoad, 0.0);
        assert!(app.world.is_wall(2, 2));
        assert_eq!(app.world.log().latest(), Some("Level loaded: untitled."));
    }

    #[test]
    fn test_quickload_resets_editor_history_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_in(dir.path());
        app.editor.level_name = "Crypt".to_string();
        app.handle_command(Command::QuickSave, 0.0);

        app.editor.level_name = "Scratch".to_string();
        app.handle_command(Command::ToggleEditor, 0.0);
        app.editor_click(Coord::new(2, 2), true, 0.0);
        assert!(app.editor.can_undo());

        app.handle_command(Command::QuickLoad, 0.0);
        assert!(!app.world.is_wall(2, 2));
        assert!(!app.editor.can_undo());
        assert!(!app.editor.can_redo());
        assert_eq!(app.editor.level_name, "Crypt");
    }

    #[test]
    fn test_start_level_from_argument() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("start.json");
        let world = GridWorld::new(&Layout::blank(6));
        save_level(&world, &path, "Cellar").unwrap();

        let config = GameConfig { levels_dir: dir.path().to_path_buf(), ..GameConfig::default() };
        let app = AppState::new(config, Some(path));
        assert_eq!(app.world.grid_size(), 6);
        assert_eq!(app.editor.level_name, "Cellar");
    }

    #[test]
    fn test_bad_start_level_keeps_default_dungeon() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig { levels_dir: dir.path().to_path_buf(), ..GameConfig::default() };
        let app = AppState::new(config, Some(dir.path().join("missing.json")));
        assert_eq!(app.world.grid_size(), 10);
        assert_eq!(app.world.entity_count(), 11);
    }
}
