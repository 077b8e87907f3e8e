//! Grid World
//!
//! The single source of truth for the dungeon:
//! - Wall set and entity table keyed by coordinate
//! - Player position, heading and visited cells
//! - Bounded player-facing event log
//!
//! Every rule about what may occupy a cell lives here. Callers (input,
//! editor, renderer) only go through these operations, so the invariants
//! below hold after every call:
//! - the player's cell is never a wall
//! - a cell never holds both a wall and an entity
//! - stored coordinates are inside the grid

use std::collections::{HashMap, HashSet};
use std::fmt;
use super::catalog::{EntityKind, BLOCKING_REMARK, PASSABLE_REMARK};
use super::coord::Coord;
use super::direction::{Heading, Step};
use super::entity::{Entity, EntityOverrides};
use super::event_log::EventLog;
use super::layout::{perimeter_walls, Layout, DEFAULT_AMBIENT};

/// Why an editor operation was refused. State is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditRejection {
    /// The target is the cell the player stands on
    PlayerCell(Coord),
    /// The target lies outside the grid
    OutOfBounds(Coord),
}

impl fmt::Display for EditRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRejection::PlayerCell(c) => write!(f, "cannot build on the player's cell {}", c),
            EditRejection::OutOfBounds(c) => write!(f, "cell {} is outside the grid", c),
        }
    }
}

impl std::error::Error for EditRejection {}

/// Result of a successful wall toggle.
#[derive(Debug, Clone, PartialEq)]
pub enum WallToggle {
    /// Wall placed; carries the entity it displaced, if any
    Added(Option<Entity>),
    Removed,
}

/// Result of a successful entity placement.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    /// Entity previously stored at the cell
    pub replaced: Option<Entity>,
    /// True if a wall was cleared to make room
    pub evicted_wall: bool,
}

/// Outcome of talking to / examining the entity ahead.
#[derive(Debug, Clone, PartialEq)]
pub struct Interaction {
    pub kind: EntityKind,
    pub name: String,
    pub message: String,
}

/// Player position, heading and exploration state.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub pos: Coord,
    pub heading: Heading,
    pub visited: HashSet<Coord>,
}

/// Read-only copy of the world handed to renderers and panels.
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub grid_size: i32,
    pub walls: Vec<Coord>,
    pub entities: Vec<Entity>,
    pub player: Coord,
    pub heading: Heading,
    pub log: Vec<String>,
}

pub struct GridWorld {
    size: i32,
    walls: HashSet<Coord>,
    entities: HashMap<Coord, Entity>,
    player: PlayerState,
    ambient: HashMap<Coord, String>,
    log: EventLog,
}

impl GridWorld {
    /// Create a world from a layout.
    pub fn new(layout: &Layout) -> Self {
        let mut world = Self {
            size: layout.grid_size,
            walls: HashSet::new(),
            entities: HashMap::new(),
            player: PlayerState {
                pos: layout.player,
                heading: layout.heading,
                visited: HashSet::new(),
            },
            ambient: HashMap::new(),
            log: EventLog::new(),
        };
        world.initialize(layout);
        world
    }

    /// Reset everything from a layout (replace, not merge).
    pub fn initialize(&mut self, layout: &Layout) {
        self.size = layout.grid_size.max(1);
        self.walls.clear();
        self.entities.clear();
        self.ambient = layout.ambient.clone();

        for &wall in &layout.walls {
            if wall.in_bounds(self.size) {
                self.walls.insert(wall);
            } else {
                log::warn!("[World] Layout wall {} outside {}x{} grid, skipped", wall, self.size, self.size);
            }
        }
        for placement in &layout.entities {
            if placement.pos.in_bounds(self.size) {
                self.insert_entity(Entity::from_catalog(
                    placement.kind,
                    placement.pos,
                    placement.overrides.clone(),
                ));
            } else {
                log::warn!("[World] Layout entity at {} outside grid, skipped", placement.pos);
            }
        }

        let start = if layout.player.in_bounds(self.size) {
            layout.player
        } else {
            log::warn!("[World] Player start {} outside grid, using centre", layout.player);
            Coord::new(self.size / 2, self.size / 2)
        };
        self.place_player(start, layout.heading);

        self.log.clear();
        for line in &layout.intro {
            self.log.push(line.clone());
        }
        log::debug!(
            "[World] Initialized {}x{} grid: {} walls, {} entities",
            self.size,
            self.size,
            self.walls.len(),
            self.entities.len()
        );
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn grid_size(&self) -> i32 {
        self.size
    }

    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        self.walls.contains(&Coord::new(x, y))
    }

    pub fn is_out_of_bounds(&self, x: i32, y: i32) -> bool {
        !Coord::new(x, y).in_bounds(self.size)
    }

    /// Not a wall, inside the grid, and empty or holding a passable entity.
    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        if self.is_wall(x, y) || self.is_out_of_bounds(x, y) {
            return false;
        }
        self.entity_at(x, y).map_or(true, |e| e.passable)
    }

    pub fn entity_at(&self, x: i32, y: i32) -> Option<&Entity> {
        self.entities.get(&Coord::new(x, y))
    }

    /// All entities, ordered by coordinate.
    pub fn entities(&self) -> Vec<&Entity> {
        let mut list: Vec<&Entity> = self.entities.values().collect();
        list.sort_by_key(|e| e.pos);
        list
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// All walls, ordered by coordinate.
    pub fn walls(&self) -> Vec<Coord> {
        let mut list: Vec<Coord> = self.walls.iter().copied().collect();
        list.sort();
        list
    }

    pub fn player_pos(&self) -> Coord {
        self.player.pos
    }

    pub fn heading(&self) -> Heading {
        self.player.heading
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn visited(&self) -> &HashSet<Coord> {
        &self.player.visited
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    /// The cell one step ahead of the player.
    pub fn cell_ahead(&self) -> Coord {
        let (dx, dy) = self.player.heading.forward();
        self.player.pos.offset(dx, dy)
    }

    /// Read-only snapshot for renderers and panels.
    pub fn state(&self) -> WorldState {
        WorldState {
            grid_size: self.size,
            walls: self.walls(),
            entities: self.entities().into_iter().cloned().collect(),
            player: self.player.pos,
            heading: self.player.heading,
            log: self.log.to_vec(),
        }
    }

    // =========================================================================
    // Player actions
    // =========================================================================

    /// Try to move by a relative offset. Rejections log a reason and leave
    /// the world untouched.
    pub fn move_player(&mut self, dx: i32, dy: i32) -> bool {
        let target = match self.player.pos.checked_offset(dx, dy) {
            Some(t) if !self.is_out_of_bounds(t.x, t.y) => t,
            _ => {
                self.add_log_entry("You cannot leave the bounds of the dungeon!");
                return false;
            }
        };

        if !self.is_passable(target.x, target.y) {
            let message = match self.entity_at(target.x, target.y) {
                Some(entity) => format!("{} blocks your path!", entity.name),
                None => "A wall blocks your path!".to_string(),
            };
            self.add_log_entry(message);
            return false;
        }

        self.player.pos = target;
        self.player.visited.insert(target);
        self.add_log_entry(format!("You moved to {}.", target));

        let passed = self
            .entity_at(target.x, target.y)
            .filter(|e| e.passable)
            .map(|e| e.name.to_lowercase());
        if let Some(name) = passed {
            self.add_log_entry(format!("You passed through the {}.", name));
        }
        true
    }

    /// Move relative to the current heading.
    pub fn step(&mut self, step: Step) -> bool {
        let (dx, dy) = self.player.heading.delta(step);
        self.move_player(dx, dy)
    }

    pub fn turn_left(&mut self) {
        self.player.heading = self.player.heading.turn_left();
        self.add_log_entry(format!(
            "You turned left. You are now facing {}.",
            self.player.heading.name()
        ));
    }

    pub fn turn_right(&mut self) {
        self.player.heading = self.player.heading.turn_right();
        self.add_log_entry(format!(
            "You turned right. You are now facing {}.",
            self.player.heading.name()
        ));
    }

    /// Examine or talk to whatever stands in the cell ahead.
    pub fn interact_with_entity_ahead(&self) -> Option<Interaction> {
        let ahead = self.cell_ahead();
        let entity = self.entity_at(ahead.x, ahead.y)?;
        let defaults = entity.kind.defaults();

        let message = match entity.kind {
            EntityKind::Enemy => format!("{} {}", entity.name, defaults.interaction),
            EntityKind::Npc => {
                if entity.is_alive() {
                    entity.dialogue.clone().unwrap_or_else(|| "Hello.".to_string())
                } else {
                    format!("{} {}", entity.name, defaults.interaction)
                }
            }
            EntityKind::Obstacle => {
                let remark = if entity.passable { PASSABLE_REMARK } else { BLOCKING_REMARK };
                format!("This is the {}. {}", entity.name.to_lowercase(), remark)
            }
        };

        Some(Interaction {
            kind: entity.kind,
            name: entity.name.clone(),
            message,
        })
    }

    /// Append a line to the player-facing log.
    pub fn add_log_entry(&mut self, text: impl Into<String>) {
        self.log.push(text);
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Place (or overwrite) an entity built from catalog defaults and
    /// overrides. A wall at the cell is removed as part of the placement.
    pub fn add_entity(
        &mut self,
        x: i32,
        y: i32,
        kind: EntityKind,
        overrides: EntityOverrides,
    ) -> Result<Placed, EditRejection> {
        let pos = Coord::new(x, y);
        if !pos.in_bounds(self.size) {
            return Err(EditRejection::OutOfBounds(pos));
        }
        if pos == self.player.pos {
            return Err(EditRejection::PlayerCell(pos));
        }
        let evicted_wall = self.walls.contains(&pos);
        let replaced = self.insert_entity(Entity::from_catalog(kind, pos, overrides));
        log::debug!("[World] Placed {} at {}", kind.as_str(), pos);
        Ok(Placed { replaced, evicted_wall })
    }

    /// Remove the entity at a cell, if any.
    pub fn remove_entity(&mut self, x: i32, y: i32) -> Option<Entity> {
        self.entities.remove(&Coord::new(x, y))
    }

    /// Flip wall membership of a cell. Placing a wall evicts any entity there.
    pub fn toggle_wall(&mut self, x: i32, y: i32) -> Result<WallToggle, EditRejection> {
        let pos = Coord::new(x, y);
        if !pos.in_bounds(self.size) {
            return Err(EditRejection::OutOfBounds(pos));
        }
        if pos == self.player.pos {
            return Err(EditRejection::PlayerCell(pos));
        }
        if self.walls.remove(&pos) {
            Ok(WallToggle::Removed)
        } else {
            self.walls.insert(pos);
            Ok(WallToggle::Added(self.entities.remove(&pos)))
        }
    }

    /// Clear both wall and entity from a cell. Returns true if anything changed.
    pub fn erase_cell(&mut self, x: i32, y: i32) -> bool {
        let pos = Coord::new(x, y);
        let had_wall = self.walls.remove(&pos);
        let had_entity = self.entities.remove(&pos).is_some();
        had_wall || had_entity
    }

    /// Reset to an empty level of the same size: perimeter walls only.
    /// The player stays put (the wall under them, if any, is skipped).
    /// Location texts go too; every cell reads as plain corridor.
    pub fn clear_level(&mut self) {
        let player = self.player.pos;
        self.entities.clear();
        self.ambient.clear();
        self.walls = perimeter_walls(self.size)
            .into_iter()
            .filter(|c| *c != player)
            .collect();
    }

    // =========================================================================
    // Descriptions
    // =========================================================================

    /// Prose description of the player's surroundings.
    pub fn current_description(&self) -> String {
        let pos = self.player.pos;
        let mut text = self
            .ambient
            .get(&pos)
            .cloned()
            .unwrap_or_else(|| DEFAULT_AMBIENT.to_string());

        text.push_str(&format!(" You are facing {}.", self.player.heading.name()));

        let ahead = self.cell_ahead();
        if self.is_wall(ahead.x, ahead.y) || self.is_out_of_bounds(ahead.x, ahead.y) {
            text.push_str(" A wall stands before you.");
        } else if let Some(entity) = self.entity_at(ahead.x, ahead.y) {
            let look = if entity.look_text.is_empty() { &entity.name } else { &entity.look_text };
            text.push_str(&format!(" Before you is {}.", look));
        } else {
            text.push_str(" An open passage lies ahead.");
        }

        if let Some(entity) = self.entity_at(pos.x, pos.y).filter(|e| e.passable) {
            text.push_str(&format!(" You are standing inside the {}.", entity.name.to_lowercase()));
        }
        text
    }

    /// Short status for the HUD: what is ahead, or exploring.
    pub fn status_line(&self) -> String {
        let ahead = self.cell_ahead();
        match self.entity_at(ahead.x, ahead.y) {
            Some(entity) => format!("Ahead: {}", entity.name),
            None => "Exploring".to_string(),
        }
    }

    // =========================================================================
    // Internal mutation (used by initialize and level loading)
    // =========================================================================

    pub(crate) fn resize(&mut self, size: i32) {
        self.size = size.max(1);
        let size = self.size;
        self.walls.retain(|c| c.in_bounds(size));
        self.entities.retain(|c, _| c.in_bounds(size));
    }

    pub(crate) fn ambient(&self) -> &HashMap<Coord, String> {
        &self.ambient
    }

    pub(crate) fn set_ambient(&mut self, ambient: HashMap<Coord, String>) {
        self.ambient = ambient;
    }

    pub(crate) fn replace_contents(&mut self, walls: Vec<Coord>, entities: Vec<Entity>) {
        let size = self.size;
        self.walls = walls.into_iter().filter(|c| c.in_bounds(size)).collect();
        self.entities.clear();
        for entity in entities {
            if entity.pos.in_bounds(self.size) {
                self.insert_entity(entity);
            }
        }
    }

    /// Put back walls and entities captured earlier, leaving the player and
    /// log alone. A wall that would land on the player is dropped.
    pub(crate) fn restore_contents(&mut self, walls: Vec<Coord>, entities: Vec<Entity>) {
        self.replace_contents(walls, entities);
        self.walls.remove(&self.player.pos);
    }

    /// Move the player directly, resetting exploration to the new cell.
    /// A wall under the destination is removed so the player never overlaps one.
    pub(crate) fn place_player(&mut self, pos: Coord, heading: Heading) {
        if self.walls.remove(&pos) {
            log::warn!("[World] Removed wall under player at {}", pos);
        }
        self.player.pos = pos;
        self.player.heading = heading;
        self.player.visited.clear();
        self.player.visited.insert(pos);
    }

    /// Store an entity, evicting a wall at its cell.
    fn insert_entity(&mut self, entity: Entity) -> Option<Entity> {
        self.walls.remove(&entity.pos);
        self.entities.insert(entity.pos, entity)
    }
}

impl Default for GridWorld {
    fn default() -> Self {
        Self::new(&Layout::default_dungeon())
    }
}
