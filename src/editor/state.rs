//! Editor state - mode, selection, undo/redo and status

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use crate::world::{
    load_level, save_level, Coord, EditRejection, Entity, EntityKind, EntityOverrides, GridWorld,
    LevelSnapshot, WallToggle,
};

/// Maximum number of undo checkpoints kept
pub const UNDO_LIMIT: usize = 100;

/// Seconds a status message stays visible
pub const STATUS_DURATION: f64 = 3.0;

/// What a primary click does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    #[default]
    Wall,
    Entity,
    Erase,
}

impl EditorMode {
    pub const ALL: [EditorMode; 3] = [EditorMode::Wall, EditorMode::Entity, EditorMode::Erase];

    pub fn label(self) -> &'static str {
        match self {
            EditorMode::Wall => "Wall",
            EditorMode::Entity => "Entity",
            EditorMode::Erase => "Erase",
        }
    }
}

/// Outcome of an editor operation, shown in the status bar
#[derive(Debug, Clone, PartialEq)]
pub enum EditorFeedback {
    WallAdded { pos: Coord, displaced: Option<String> },
    WallRemoved(Coord),
    EntityPlaced { pos: Coord, name: String, replaced: Option<String> },
    Erased(Coord),
    NothingToErase(Coord),
    Rejected(EditRejection),
    Cleared,
    Undone,
    Redone,
    NothingToUndo,
    NothingToRedo,
    Saved(PathBuf),
    Loaded { name: String, warnings: usize },
    Failed(String),
}

impl EditorFeedback {
    /// True if the world was changed
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            EditorFeedback::WallAdded { .. }
                | EditorFeedback::WallRemoved(_)
                | EditorFeedback::EntityPlaced { .. }
                | EditorFeedback::Erased(_)
                | EditorFeedback::Cleared
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, EditorFeedback::Rejected(_) | EditorFeedback::Failed(_))
    }
}

impl fmt::Display for EditorFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorFeedback::WallAdded { pos, displaced: None } => write!(f, "Wall placed at {}.", pos),
            EditorFeedback::WallAdded { pos, displaced: Some(name) } => {
                write!(f, "Wall placed at {}, replacing the {}.", pos, name)
            }
            EditorFeedback::WallRemoved(pos) => write!(f, "Wall removed at {}.", pos),
            EditorFeedback::EntityPlaced { pos, name, replaced: None } => write!(f, "{} placed at {}.", name, pos),
            EditorFeedback::EntityPlaced { pos, name, replaced: Some(old) } => {
                write!(f, "{} placed at {}, replacing the {}.", name, pos, old)
            }
            EditorFeedback::Erased(pos) => write!(f, "Cleared {}.", pos),
            EditorFeedback::NothingToErase(pos) => write!(f, "Nothing to erase at {}.", pos),
            EditorFeedback::Rejected(EditRejection::PlayerCell(_)) => {
                write!(f, "You can't build on the player's position!")
            }
            EditorFeedback::Rejected(EditRejection::OutOfBounds(pos)) => {
                write!(f, "{} is outside the dungeon.", pos)
            }
            EditorFeedback::Cleared => write!(f, "Level cleared."),
            EditorFeedback::Undone => write!(f, "Undo"),
            EditorFeedback::Redone => write!(f, "Redo"),
            EditorFeedback::NothingToUndo => write!(f, "Nothing to undo."),
            EditorFeedback::NothingToRedo => write!(f, "Nothing to redo."),
            EditorFeedback::Saved(path) => write!(f, "Saved {}", path.display()),
            EditorFeedback::Loaded { name, warnings: 0 } => write!(f, "Loaded '{}'", name),
            EditorFeedback::Loaded { name, warnings } => {
                write!(f, "Loaded '{}' ({} entries skipped or fixed)", name, warnings)
            }
            EditorFeedback::Failed(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Walls and entities at one point in edit history
#[derive(Debug, Clone, PartialEq)]
struct Checkpoint {
    walls: Vec<Coord>,
    entities: Vec<Entity>,
    ambient: HashMap<Coord, String>,
}

impl Checkpoint {
    fn capture(world: &GridWorld) -> Self {
        Self {
            walls: world.walls(),
            entities: world.entities().into_iter().cloned().collect(),
            ambient: world.ambient().clone(),
        }
    }

    fn restore(self, world: &mut GridWorld) {
        world.restore_contents(self.walls, self.entities);
        world.set_ambient(self.ambient);
    }
}

/// Editor state
pub struct EditorState {
    /// Editor overlay is open and mouse clicks edit the grid
    pub active: bool,
    pub mode: EditorMode,
    /// Entity kind placed in Entity mode
    pub kind: EntityKind,
    /// Index into the kind's sprite variants
    pub sprite_index: usize,
    /// Passable flag for newly placed entities
    pub passable: bool,
    /// Name used for saves and loads
    pub level_name: String,

    undo_stack: Vec<Checkpoint>,
    redo_stack: Vec<Checkpoint>,

    /// Status message (shown in status bar)
    pub status_message: Option<(String, f64)>, // (message, expiry_time)
    /// Current status reports a failure
    pub status_error: bool,
}

impl EditorState {
    pub fn new() -> Self {
        let kind = EntityKind::Enemy;
        Self {
            active: false,
            mode: EditorMode::default(),
            kind,
            sprite_index: 0,
            passable: kind.defaults().passable,
            level_name: "untitled".to_string(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            status_message: None,
            status_error: false,
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a kind; sprite and passable flag reset to its defaults.
    pub fn select_kind(&mut self, kind: EntityKind) {
        self.kind = kind;
        self.sprite_index = 0;
        self.passable = kind.defaults().passable;
    }

    /// Select a kind from a UI string. Unknown names fall back.
    pub fn select_kind_named(&mut self, name: &str) {
        self.select_kind(crate::world::resolve_kind(name));
    }

    pub fn cycle_kind(&mut self) {
        self.select_kind(self.kind.next());
    }

    pub fn cycle_sprite(&mut self) {
        let count = self.kind.defaults().sprites.len().max(1);
        self.sprite_index = (self.sprite_index + 1) % count;
    }

    pub fn sprite(&self) -> &'static str {
        let sprites = self.kind.defaults().sprites;
        sprites
            .get(self.sprite_index)
            .or_else(|| sprites.first())
            .copied()
            .unwrap_or("")
    }

    pub fn toggle_passable(&mut self) {
        self.passable = !self.passable;
    }

    /// Overrides applied to entities placed with the current selection
    pub fn placement_overrides(&self) -> EntityOverrides {
        EntityOverrides::default()
            .sprite(self.sprite())
            .passable(self.passable)
    }

    // =========================================================================
    // Status
    // =========================================================================

    /// Set a status message that will be displayed for a duration
    pub fn set_status(&mut self, message: &str, now: f64, duration_secs: f64) {
        self.status_message = Some((message.to_string(), now + duration_secs));
        self.status_error = false;
    }

    /// Get current status message if not expired
    pub fn get_status(&self, now: f64) -> Option<&str> {
        match &self.status_message {
            Some((msg, expiry)) if now < *expiry => Some(msg),
            _ => None,
        }
    }

    /// Show an operation's outcome and mirror it to the debug log
    pub fn report(&mut self, feedback: &EditorFeedback, now: f64) {
        let text = feedback.to_string();
        if feedback.is_error() {
            log::warn!("[Editor] {}", text);
        } else {
            log::debug!("[Editor] {}", text);
        }
        self.set_status(&text, now, STATUS_DURATION);
        self.status_error = feedback.is_error();
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Left click: apply the current mode to a cell.
    pub fn apply_primary(&mut self, world: &mut GridWorld, pos: Coord) -> EditorFeedback {
        match self.mode {
            EditorMode::Wall => {
                let before = Checkpoint::capture(world);
                match world.toggle_wall(pos.x, pos.y) {
                    Ok(toggle) => {
                        self.push_undo(before);
                        match toggle {
                            WallToggle::Added(displaced) => EditorFeedback::WallAdded {
                                pos,
                                displaced: displaced.map(|e| e.name.to_lowercase()),
                            },
                            WallToggle::Removed => EditorFeedback::WallRemoved(pos),
                        }
                    }
                    Err(rejection) => EditorFeedback::Rejected(rejection),
                }
            }
            EditorMode::Entity => {
                let before = Checkpoint::capture(world);
                match world.add_entity(pos.x, pos.y, self.kind, self.placement_overrides()) {
                    Ok(placed) => {
                        self.push_undo(before);
                        let name = world
                            .entity_at(pos.x, pos.y)
                            .map(|e| e.name.clone())
                            .unwrap_or_else(|| self.kind.defaults().name.to_string());
                        EditorFeedback::EntityPlaced {
                            pos,
                            name,
                            replaced: placed.replaced.map(|e| e.name.to_lowercase()),
                        }
                    }
                    Err(rejection) => EditorFeedback::Rejected(rejection),
                }
            }
            EditorMode::Erase => self.apply_secondary(world, pos),
        }
    }

    /// Right click: erase whatever occupies a cell.
    pub fn apply_secondary(&mut self, world: &mut GridWorld, pos: Coord) -> EditorFeedback {
        if world.is_out_of_bounds(pos.x, pos.y) {
            return EditorFeedback::Rejected(EditRejection::OutOfBounds(pos));
        }
        let before = Checkpoint::capture(world);
        if world.erase_cell(pos.x, pos.y) {
            self.push_undo(before);
            EditorFeedback::Erased(pos)
        } else {
            EditorFeedback::NothingToErase(pos)
        }
    }

    /// Empty the level down to its perimeter walls.
    pub fn clear_level(&mut self, world: &mut GridWorld) -> EditorFeedback {
        let before = Checkpoint::capture(world);
        world.clear_level();
        if Checkpoint::capture(world) != before {
            self.push_undo(before);
        }
        EditorFeedback::Cleared
    }

    fn push_undo(&mut self, checkpoint: Checkpoint) {
        self.undo_stack.push(checkpoint);
        self.redo_stack.clear();
        if self.undo_stack.len() > UNDO_LIMIT {
            self.undo_stack.remove(0);
        }
    }

    pub fn undo(&mut self, world: &mut GridWorld) -> EditorFeedback {
        match self.undo_stack.pop() {
            Some(checkpoint) => {
                self.redo_stack.push(Checkpoint::capture(world));
                checkpoint.restore(world);
                EditorFeedback::Undone
            }
            None => EditorFeedback::NothingToUndo,
        }
    }

    pub fn redo(&mut self, world: &mut GridWorld) -> EditorFeedback {
        match self.redo_stack.pop() {
            Some(checkpoint) => {
                self.undo_stack.push(Checkpoint::capture(world));
                checkpoint.restore(world);
                EditorFeedback::Redone
            }
            None => EditorFeedback::NothingToRedo,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    // =========================================================================
    // Files
    // =========================================================================

    /// File the current level name maps to inside `dir`
    pub fn level_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.json", file_stem(&self.level_name)))
    }

    pub fn save(&mut self, world: &GridWorld, dir: &Path) -> EditorFeedback {
        let path = self.level_path(dir);
        match save_level(world, &path, &self.level_name) {
            Ok(()) => EditorFeedback::Saved(path),
            Err(e) => EditorFeedback::Failed(format!("saving {}: {}", path.display(), e)),
        }
    }

    /// Load the named level. Edit history is discarded on success.
    pub fn load(&mut self, world: &mut GridWorld, dir: &Path) -> EditorFeedback {
        let path = self.level_path(dir);
        self.load_path(world, &path)
    }

    pub fn load_path(&mut self, world: &mut GridWorld, path: &Path) -> EditorFeedback {
        match load_level(path) {
            Ok(snapshot) => self.apply_snapshot(world, &snapshot),
            Err(e) => EditorFeedback::Failed(format!("loading {}: {}", path.display(), e)),
        }
    }

    /// Replace the world with a loaded level. History from the previous
    /// level is discarded and the level name follows the snapshot.
    pub fn apply_snapshot(&mut self, world: &mut GridWorld, snapshot: &LevelSnapshot) -> EditorFeedback {
        let report = world.from_snapshot(snapshot);
        self.undo_stack.clear();
        self.redo_stack.clear();
        if let Some(meta) = &snapshot.metadata {
            self.level_name = meta.name.clone();
        }
        EditorFeedback::Loaded {
            name: self.level_name.clone(),
            warnings: report.warnings.len(),
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Level name reduced to a safe file stem
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c.to_ascii_lowercase() } else { '_' })
        .collect();
    if stem.is_empty() { "untitled".to_string() } else { stem }
}
