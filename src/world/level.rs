//! Level saving and loading
//!
//! JSON is the canonical snapshot format. RON is accepted for hand-written
//! `.ron` level files. Loading is forgiving: older saves with `"x,y"` wall
//! keys, `type`/`sprite` field names or numeric kinds still load, and entries
//! that cannot be placed are skipped and reported instead of failing.

use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use super::catalog::{lookup_kind, resolve_kind, EntityKind, FALLBACK_KIND};
use super::coord::Coord;
use super::direction::Heading;
use super::entity::{Entity, EntityOverrides, Lifecycle};
use super::grid::GridWorld;
use super::layout::MAX_GRID_SIZE;

/// Validation limits for untrusted files
pub mod limits {
    /// Maximum serialized size accepted by the loader
    pub const MAX_FILE_BYTES: usize = 4 * 1024 * 1024;
    /// Maximum length of any text field
    pub const MAX_STRING_LEN: usize = 1024;
}

/// Error type for level loading and saving
#[derive(Debug)]
pub enum LevelError {
    IoError(std::io::Error),
    JsonError(serde_json::Error),
    ParseError(ron::error::SpannedError),
    SerializeError(ron::Error),
    ValidationError(String),
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        LevelError::IoError(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        LevelError::JsonError(e)
    }
}

impl From<ron::error::SpannedError> for LevelError {
    fn from(e: ron::error::SpannedError) -> Self {
        LevelError::ParseError(e)
    }
}

impl From<ron::Error> for LevelError {
    fn from(e: ron::Error) -> Self {
        LevelError::SerializeError(e)
    }
}

impl std::fmt::Display for LevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelError::IoError(e) => write!(f, "IO error: {}", e),
            LevelError::JsonError(e) => write!(f, "JSON error: {}", e),
            LevelError::ParseError(e) => write!(f, "Parse error: {}", e),
            LevelError::SerializeError(e) => write!(f, "Serialize error: {}", e),
            LevelError::ValidationError(e) => write!(f, "Validation error: {}", e),
        }
    }
}

impl std::error::Error for LevelError {}

// =============================================================================
// Snapshot format
// =============================================================================

/// A wall entry: `[x, y]`, or the legacy `"x,y"` string key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WallEntry {
    Pair([i32; 2]),
    Key(String),
}

impl WallEntry {
    fn coord(&self) -> Option<Coord> {
        match self {
            WallEntry::Pair([x, y]) => Some(Coord::new(*x, *y)),
            WallEntry::Key(key) => {
                let (x, y) = key.split_once(',')?;
                Some(Coord::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
            }
        }
    }
}

/// Entity kind as written in a file: an identifier or a numeric index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KindField {
    Index(i64),
    /// Fractional or out-of-range numbers; never a valid kind
    Number(f64),
    Text(String),
}

impl KindField {
    /// The kind this names, if it names one exactly.
    fn lookup(&self) -> Option<EntityKind> {
        match self {
            KindField::Text(text) => lookup_kind(text),
            KindField::Index(index) => u8::try_from(*index).ok().and_then(EntityKind::from_index),
            KindField::Number(_) => None,
        }
    }

    fn resolve(&self) -> EntityKind {
        match self {
            KindField::Text(text) => resolve_kind(text),
            KindField::Index(_) | KindField::Number(_) => self.lookup().unwrap_or_else(|| {
                log::warn!("[Level] Unknown entity kind index {}, using {}", self, FALLBACK_KIND.as_str());
                FALLBACK_KIND
            }),
        }
    }
}

impl std::fmt::Display for KindField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KindField::Index(index) => write!(f, "{}", index),
            KindField::Number(n) => write!(f, "{}", n),
            KindField::Text(text) => write!(f, "{:?}", text),
        }
    }
}

impl Default for KindField {
    fn default() -> Self {
        KindField::Text(FALLBACK_KIND.as_str().to_string())
    }
}

/// One entity with its embedded position.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub x: i32,
    pub y: i32,
    #[serde(default, alias = "type")]
    pub kind: KindField,
    #[serde(default, alias = "sprite", skip_serializing_if = "Option::is_none")]
    pub sprite_variant: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<Lifecycle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "lookDescription", skip_serializing_if = "Option::is_none")]
    pub look_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dialogue: Option<String>,
}

impl EntityRecord {
    fn from_entity(entity: &Entity) -> Self {
        Self {
            x: entity.pos.x,
            y: entity.pos.y,
            kind: KindField::Text(entity.kind.as_str().to_string()),
            sprite_variant: Some(entity.sprite.clone()),
            passable: Some(entity.passable),
            state: Some(entity.state),
            name: Some(entity.name.clone()),
            description: Some(entity.description.clone()),
            look_text: Some(entity.look_text.clone()),
            health: entity.health,
            damage: entity.damage,
            dialogue: entity.dialogue.clone(),
        }
    }

    fn to_entity(&self) -> Entity {
        let overrides = EntityOverrides {
            sprite: self.sprite_variant.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            look_text: self.look_text.clone(),
            passable: self.passable,
            state: self.state,
            health: self.health,
            damage: self.damage,
            dialogue: self.dialogue.clone(),
        };
        Entity::from_catalog(self.kind.resolve(), Coord::new(self.x, self.y), overrides)
    }

    fn longest_text(&self) -> usize {
        [&self.sprite_variant, &self.name, &self.description, &self.look_text, &self.dialogue]
            .iter()
            .filter_map(|s| Option::as_ref(*s).map(String::len))
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub direction: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMetadata {
    #[serde(default)]
    pub created: String,
    #[serde(default = "default_level_name")]
    pub name: String,
}

fn default_level_name() -> String {
    "Untitled".to_string()
}

/// Portable copy of a level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<i32>,
    #[serde(default)]
    pub walls: Vec<WallEntry>,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<LevelMetadata>,
}

/// What happened while applying a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub walls: usize,
    pub entities: usize,
    pub player_loaded: bool,
    /// Problems that were worked around
    pub warnings: Vec<String>,
}

impl LoadReport {
    fn warn(&mut self, message: String) {
        log::warn!("[Level] {}", message);
        self.warnings.push(message);
    }
}

/// Current time as an ISO-8601 string.
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

impl GridWorld {
    /// Capture walls, entities and player into a snapshot.
    pub fn to_snapshot(&self, name: &str) -> LevelSnapshot {
        let player = self.player_pos();
        LevelSnapshot {
            grid_size: Some(self.grid_size()),
            walls: self.walls().into_iter().map(|c| WallEntry::Pair([c.x, c.y])).collect(),
            entities: self.entities().into_iter().map(EntityRecord::from_entity).collect(),
            player: Some(PlayerRecord {
                x: player.x,
                y: player.y,
                direction: self.heading().index() as i64,
            }),
            metadata: Some(LevelMetadata {
                created: timestamp_now(),
                name: name.to_string(),
            }),
        }
    }

    /// Replace walls and entities (and the player, when present) with the
    /// snapshot's contents. Never fails: bad entries are skipped and reported.
    pub fn from_snapshot(&mut self, snapshot: &LevelSnapshot) -> LoadReport {
        let mut report = LoadReport::default();

        if let Some(size) = snapshot.grid_size {
            if (1..=MAX_GRID_SIZE).contains(&size) {
                self.resize(size);
            } else {
                report.warn(format!("grid size {} out of range, keeping {}", size, self.grid_size()));
            }
        }
        let size = self.grid_size();

        let mut walls = Vec::with_capacity(snapshot.walls.len());
        for entry in &snapshot.walls {
            match entry.coord() {
                Some(c) if c.in_bounds(size) => walls.push(c),
                Some(c) => report.warn(format!("wall {} outside grid, skipped", c)),
                None => report.warn(format!("unreadable wall entry {:?}, skipped", entry)),
            }
        }

        let mut entities: Vec<Entity> = Vec::with_capacity(snapshot.entities.len());
        for record in &snapshot.entities {
            let pos = Coord::new(record.x, record.y);
            if !pos.in_bounds(size) {
                report.warn(format!("entity at {} outside grid, skipped", pos));
                continue;
            }
            if record.kind.lookup().is_none() {
                report.warn(format!(
                    "unknown entity kind {} at {}, loaded as {}",
                    record.kind,
                    pos,
                    FALLBACK_KIND.as_str()
                ));
            }
            if entities.iter().any(|e| e.pos == pos) {
                report.warn(format!("duplicate entity at {}, later entry wins", pos));
                entities.retain(|e| e.pos != pos);
            }
            entities.push(record.to_entity());
        }

        report.walls = walls.len();
        report.entities = entities.len();
        self.replace_contents(walls, entities);
        // Location texts belong to the built-in dungeon, not to loaded levels
        self.set_ambient(Default::default());

        let (pos, heading) = match snapshot.player {
            Some(p) if Coord::new(p.x, p.y).in_bounds(size) => {
                report.player_loaded = true;
                (Coord::new(p.x, p.y), Heading::from_index(p.direction))
            }
            Some(p) => {
                report.warn(format!("player {} outside grid, keeping current position", Coord::new(p.x, p.y)));
                (self.retained_player_pos(), self.heading())
            }
            None => (self.retained_player_pos(), self.heading()),
        };
        self.place_player(pos, heading);
        // Keep the wall count honest if one was cleared from under the player
        report.walls = self.walls().len();

        let name = snapshot
            .metadata
            .as_ref()
            .map(|m| m.name.as_str())
            .unwrap_or("Untitled");
        self.add_log_entry(format!("Level loaded: {}.", name));
        log::info!(
            "[Level] Applied '{}': {} walls, {} entities, {} warnings",
            name,
            report.walls,
            report.entities,
            report.warnings.len()
        );
        report
    }

    /// Current player cell, pulled back inside the grid after a resize.
    fn retained_player_pos(&self) -> Coord {
        let size = self.grid_size();
        let p = self.player_pos();
        Coord::new(p.x.clamp(0, size - 1), p.y.clamp(0, size - 1))
    }
}

// =============================================================================
// Encoding
// =============================================================================

/// Reject snapshots that exceed the text limits.
pub fn validate_snapshot(snapshot: &LevelSnapshot) -> Result<(), LevelError> {
    for record in &snapshot.entities {
        if record.longest_text() > limits::MAX_STRING_LEN {
            return Err(LevelError::ValidationError(format!(
                "entity at ({}, {}): text field too long (> {})",
                record.x,
                record.y,
                limits::MAX_STRING_LEN
            )));
        }
    }
    if let Some(meta) = &snapshot.metadata {
        if meta.name.len() > limits::MAX_STRING_LEN {
            return Err(LevelError::ValidationError("level name too long".to_string()));
        }
    }
    Ok(())
}

pub fn to_json(snapshot: &LevelSnapshot) -> Result<String, LevelError> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}

pub fn to_ron(snapshot: &LevelSnapshot) -> Result<String, LevelError> {
    let config = ron::ser::PrettyConfig::new().depth_limit(4);
    Ok(ron::ser::to_string_pretty(snapshot, config)?)
}

/// Parse level bytes, detecting JSON (leading `{`) or RON.
pub fn parse_level_data(bytes: &[u8]) -> Result<LevelSnapshot, LevelError> {
    if bytes.len() > limits::MAX_FILE_BYTES {
        return Err(LevelError::ValidationError(format!(
            "level data too large ({} > {} bytes)",
            bytes.len(),
            limits::MAX_FILE_BYTES
        )));
    }
    let text = std::str::from_utf8(bytes).map_err(|e| {
        LevelError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })?;

    let snapshot: LevelSnapshot = if text.trim_start().starts_with('{') {
        serde_json::from_str(text)?
    } else {
        ron::from_str(text)?
    };
    validate_snapshot(&snapshot)?;
    Ok(snapshot)
}

/// Load a snapshot from disk.
pub fn load_level<P: AsRef<Path>>(path: P) -> Result<LevelSnapshot, LevelError> {
    let bytes = fs::read(path.as_ref())?;
    let snapshot = parse_level_data(&bytes)?;
    log::info!("[Level] Read {}", path.as_ref().display());
    Ok(snapshot)
}

/// Save the world to disk. `.ron` paths are written as RON, anything else as JSON.
pub fn save_level<P: AsRef<Path>>(world: &GridWorld, path: P, name: &str) -> Result<(), LevelError> {
    let path = path.as_ref();
    let snapshot = world.to_snapshot(name);
    let is_ron = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("ron"));
    let text = if is_ron { to_ron(&snapshot)? } else { to_json(&snapshot)? };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    log::info!("[Level] Saved '{}' to {}", name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::layout::Layout;
    use tempfile::TempDir;

    fn entity_summary(world: &GridWorld) -> Vec<(Coord, EntityKind, bool, String)> {
        world
            .entities()
            .into_iter()
            .map(|e| (e.pos, e.kind, e.passable, e.sprite.clone()))
            .collect()
    }

    #[test]
    fn test_snapshot_round_trip() {
        let mut source = GridWorld::default();
        source.turn_right();
        source.move_player(1, 0);

        let snapshot = source.to_snapshot("Round trip");
        let mut target = GridWorld::new(&Layout::blank(10));
        let report = target.from_snapshot(&snapshot);

        assert!(report.warnings.is_empty());
        assert!(report.player_loaded);
        assert_eq!(target.walls(), source.walls());
        assert_eq!(entity_summary(&target), entity_summary(&source));
        assert_eq!(target.player_pos(), source.player_pos());
        assert_eq!(target.heading(), source.heading());
    }

    #[test]
    fn test_json_text_round_trip() {
        let world = GridWorld::default();
        let json = to_json(&world.to_snapshot("Demo")).unwrap();
        assert!(json.contains("\"spriteVariant\""));
        let parsed = parse_level_data(json.as_bytes()).unwrap();

        let mut loaded = GridWorld::new(&Layout::blank(10));
        loaded.from_snapshot(&parsed);
        assert_eq!(loaded.walls(), world.walls());
        assert_eq!(loaded.entities(), world.entities());
    }

    #[test]
    fn test_ron_text_round_trip() {
        let world = GridWorld::default();
        let text = to_ron(&world.to_snapshot("Demo")).unwrap();
        let parsed = parse_level_data(text.as_bytes()).unwrap();
        assert_eq!(parsed.walls.len(), world.walls().len());
        assert_eq!(parsed.entities.len(), world.entity_count());
    }

    #[test]
    fn test_legacy_save_format() {
        let json = r#"{
            "walls": ["0,0", "1,0", "2, 0", "bogus"],
            "entities": [
                {"x": 3, "y": 3, "type": "tree", "sprite": "TREE", "passable": false},
                {"x": 4, "y": 4, "type": "NPC", "state": "dead"}
            ],
            "player": {"x": 2, "y": 2},
            "metadata": {"created": "2024-01-01T00:00:00.000Z", "name": "Old level"}
        }"#;
        let snapshot = parse_level_data(json.as_bytes()).unwrap();
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&snapshot);

        assert_eq!(report.walls, 3);
        assert_eq!(report.warnings.len(), 1);
        let tree = world.entity_at(3, 3).unwrap();
        assert_eq!(tree.kind, EntityKind::Obstacle);
        assert!(!tree.passable);
        assert_eq!(world.entity_at(4, 4).unwrap().state, Lifecycle::Dead);
        assert_eq!(world.player_pos(), Coord::new(2, 2));
        assert_eq!(world.heading(), Heading::North);
    }

    #[test]
    fn test_unknown_kind_falls_back_with_warning() {
        let json = r#"{"entities": [{"x": 1, "y": 1, "kind": "dragon"}, {"x": 2, "y": 1, "kind": 1}]}"#;
        let snapshot = parse_level_data(json.as_bytes()).unwrap();
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&snapshot);

        assert_eq!(world.entity_at(1, 1).unwrap().kind, FALLBACK_KIND);
        assert_eq!(world.entity_at(2, 1).unwrap().kind, EntityKind::Npc);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_out_of_range_kind_index_falls_back() {
        let json = r#"{"entities": [{"x": 2, "y": 2, "kind": 300}, {"x": 3, "y": 2, "kind": -1}, {"x": 4, "y": 2, "kind": 3}, {"x": 5, "y": 2, "kind": 1.5}]}"#;
        let snapshot = parse_level_data(json.as_bytes()).unwrap();
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&snapshot);

        assert_eq!(report.entities, 4);
        assert_eq!(report.warnings.len(), 4);
        for x in 2..=5 {
            assert_eq!(world.entity_at(x, 2).unwrap().kind, FALLBACK_KIND);
        }
    }

    #[test]
    fn test_load_drops_location_texts() {
        let mut world = GridWorld::default();
        let json = r#"{"player": {"x": 9, "y": 9}}"#;
        world.from_snapshot(&parse_level_data(json.as_bytes()).unwrap());
        assert_eq!(world.player_pos(), Coord::new(9, 9));
        assert!(!world.current_description().contains("old torch"));
    }

    #[test]
    fn test_missing_player_and_arrays() {
        let mut world = GridWorld::default();
        world.turn_right();
        let report = world.from_snapshot(&parse_level_data(b"{}").unwrap());

        assert!(!report.player_loaded);
        assert!(world.walls().is_empty());
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.player_pos(), Coord::new(5, 5));
        assert_eq!(world.heading(), Heading::East);
    }

    #[test]
    fn test_out_of_bounds_entries_skipped() {
        let json = r#"{
            "walls": [[1, 1], [10, 10], [-1, 0]],
            "entities": [{"x": 20, "y": 2, "kind": "enemy"}],
            "player": {"x": 50, "y": 50, "direction": 2}
        }"#;
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&parse_level_data(json.as_bytes()).unwrap());

        assert_eq!(report.walls, 1);
        assert_eq!(report.entities, 0);
        assert_eq!(report.warnings.len(), 4);
        assert_eq!(world.player_pos(), Coord::new(5, 5));
    }

    #[test]
    fn test_wall_under_player_is_cleared() {
        let json = r#"{"walls": [[2, 2], [3, 3]], "player": {"x": 2, "y": 2, "direction": 7}}"#;
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&parse_level_data(json.as_bytes()).unwrap());

        assert!(!world.is_wall(2, 2));
        assert!(world.is_wall(3, 3));
        assert_eq!(report.walls, 1);
        assert_eq!(world.heading(), Heading::West);
    }

    #[test]
    fn test_entity_on_wall_keeps_entity() {
        let json = r#"{"walls": [[3, 3]], "entities": [{"x": 3, "y": 3, "kind": "enemy"}]}"#;
        let mut world = GridWorld::default();
        world.from_snapshot(&parse_level_data(json.as_bytes()).unwrap());
        assert!(!world.is_wall(3, 3));
        assert!(world.entity_at(3, 3).is_some());
    }

    #[test]
    fn test_grid_size_resizes() {
        let json = r#"{"gridSize": 6, "walls": [[5, 5], [7, 7]], "player": {"x": 1, "y": 1}}"#;
        let mut world = GridWorld::default();
        let report = world.from_snapshot(&parse_level_data(json.as_bytes()).unwrap());
        assert_eq!(world.grid_size(), 6);
        assert_eq!(report.walls, 1);
        assert!(world.is_out_of_bounds(7, 7));
    }

    #[test]
    fn test_validation_rejects_huge_text() {
        let mut snapshot = LevelSnapshot::default();
        snapshot.entities.push(EntityRecord {
            x: 1,
            y: 1,
            dialogue: Some("x".repeat(limits::MAX_STRING_LEN + 1)),
            ..Default::default()
        });
        assert!(matches!(validate_snapshot(&snapshot), Err(LevelError::ValidationError(_))));
    }

    #[test]
    fn test_save_and_load_files() {
        let dir = TempDir::new().unwrap();
        let world = GridWorld::default();

        for file in ["levels/demo.json", "levels/demo.ron"] {
            let path = dir.path().join(file);
            save_level(&world, &path, "Demo").unwrap();
            let snapshot = load_level(&path).unwrap();
            assert_eq!(snapshot.metadata.as_ref().map(|m| m.name.as_str()), Some("Demo"));

            let mut loaded = GridWorld::new(&Layout::blank(10));
            loaded.from_snapshot(&snapshot);
            assert_eq!(loaded.walls(), world.walls());
            assert_eq!(loaded.entity_count(), world.entity_count());
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = load_level(dir.path().join("nope.json"));
        assert!(matches!(result, Err(LevelError::IoError(_))));
    }
}
