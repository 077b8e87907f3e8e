//! Starting layouts
//!
//! A layout is the full description GridWorld is initialized from: size,
//! walls, entities, player start, ambient texts and the opening log lines.

use std::collections::HashMap;
use super::catalog::EntityKind;
use super::coord::Coord;
use super::direction::Heading;
use super::entity::EntityOverrides;

/// Grid size of the built-in dungeon.
pub const DEFAULT_GRID_SIZE: i32 = 10;

/// Largest grid a level may declare.
pub const MAX_GRID_SIZE: i32 = 64;

/// Ambient text used when the player's cell has no special description.
pub const DEFAULT_AMBIENT: &str = "You stand in a stone corridor. The air is damp and cold.";

/// One entity placement in a layout.
#[derive(Debug, Clone)]
pub struct Placement {
    pub pos: Coord,
    pub kind: EntityKind,
    pub overrides: EntityOverrides,
}

#[derive(Debug, Clone)]
pub struct Layout {
    pub grid_size: i32,
    pub walls: Vec<Coord>,
    pub entities: Vec<Placement>,
    pub player: Coord,
    pub heading: Heading,
    /// Cell-specific ambient descriptions
    pub ambient: HashMap<Coord, String>,
    /// Log lines present when the level starts
    pub intro: Vec<String>,
}

// Interior maze of the built-in dungeon
const MAZE_WALLS: [(i32, i32); 21] = [
    (2, 2), (3, 2), (4, 2), (5, 2),
    (2, 7), (3, 7), (4, 7), (5, 7), (6, 7),
    (8, 6), (8, 7), (8, 8),
    (1, 5), (2, 5), (3, 5),
    (5, 4), (6, 4), (7, 4),
    (4, 8), (5, 8), (6, 8),
];

// (x, y, passable)
const TREES: [(i32, i32, bool); 6] = [
    (2, 4, true),
    (4, 5, false),
    (6, 3, true),
    (3, 6, false),
    (7, 5, true),
    (8, 8, false),
];

/// Walls around the outer edge of a square grid.
pub fn perimeter_walls(size: i32) -> Vec<Coord> {
    let mut walls = Vec::new();
    for i in 0..size {
        walls.push(Coord::new(i, 0));
        walls.push(Coord::new(i, size - 1));
        walls.push(Coord::new(0, i));
        walls.push(Coord::new(size - 1, i));
    }
    walls.sort();
    walls.dedup();
    walls
}

impl Layout {
    /// The built-in 10x10 dungeon.
    pub fn default_dungeon() -> Self {
        let size = DEFAULT_GRID_SIZE;
        let mut walls = perimeter_walls(size);
        walls.extend(MAZE_WALLS.iter().map(|&(x, y)| Coord::new(x, y)));

        let mut entities = Vec::new();
        for (x, y) in [(3, 3), (7, 7), (1, 8)] {
            entities.push(Placement {
                pos: Coord::new(x, y),
                kind: EntityKind::Enemy,
                overrides: EntityOverrides::default(),
            });
        }
        for (x, y) in [(5, 3), (8, 2)] {
            entities.push(Placement {
                pos: Coord::new(x, y),
                kind: EntityKind::Npc,
                overrides: EntityOverrides::default(),
            });
        }
        for (x, y, passable) in TREES {
            entities.push(Placement {
                pos: Coord::new(x, y),
                kind: EntityKind::Obstacle,
                overrides: EntityOverrides::default().passable(passable),
            });
        }

        let mut ambient = HashMap::new();
        ambient.insert(
            Coord::new(0, 0),
            "You are in the north-western corner of the dungeon. It is especially cold here.".to_string(),
        );
        ambient.insert(
            Coord::new(9, 9),
            "You have reached the south-eastern corner. An old torch hangs on the wall.".to_string(),
        );
        ambient.insert(
            Coord::new(5, 0),
            "You are at the northern wall of the dungeon. A massive door with iron brackets stands before you.".to_string(),
        );

        Self {
            grid_size: size,
            walls,
            entities,
            player: Coord::new(5, 5),
            heading: Heading::North,
            ambient,
            intro: vec![
                "You begin your adventure in the dungeon.".to_string(),
                "You hear an echo in the distance.".to_string(),
            ],
        }
    }

    /// Empty room: perimeter walls only, player in the middle.
    pub fn blank(size: i32) -> Self {
        let size = size.clamp(3, MAX_GRID_SIZE);
        Self {
            grid_size: size,
            walls: perimeter_walls(size),
            entities: Vec::new(),
            player: Coord::new(size / 2, size / 2),
            heading: Heading::North,
            ambient: HashMap::new(),
            intro: Vec::new(),
        }
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::default_dungeon()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perimeter_count() {
        // 4 * (n - 1) distinct border cells
        assert_eq!(perimeter_walls(10).len(), 36);
        assert_eq!(perimeter_walls(3).len(), 8);
    }

    #[test]
    fn test_default_dungeon_start_is_open() {
        let layout = Layout::default_dungeon();
        assert!(!layout.walls.contains(&layout.player));
        assert!(layout.entities.iter().all(|p| p.pos != layout.player));
        assert!(layout.walls.contains(&Coord::new(5, 4)));
        assert_eq!(layout.entities.len(), 11);
    }

    #[test]
    fn test_blank_is_clamped() {
        let layout = Layout::blank(1);
        assert_eq!(layout.grid_size, 3);
        assert_eq!(layout.player, Coord::new(1, 1));
        assert!(layout.entities.is_empty());
    }
}
