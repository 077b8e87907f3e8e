//! Entity catalog
//!
//! Static defaults for every entity kind, plus the one resolver that turns
//! external identifiers (level files, editor selections) into a kind.

use serde::{Deserialize, Serialize};

/// Closed set of placeable entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Enemy,
    Npc,
    Obstacle,
}

/// Kind used when an identifier cannot be resolved.
pub const FALLBACK_KIND: EntityKind = EntityKind::Enemy;

/// Remark appended to an obstacle's name when it can be walked through.
pub const PASSABLE_REMARK: &str = "You can pass through it.";
/// Remark appended to an obstacle's name when it blocks the way.
pub const BLOCKING_REMARK: &str = "It blocks the way.";

/// Catalog defaults for one kind.
#[derive(Debug)]
pub struct KindDefaults {
    pub name: &'static str,
    pub description: &'static str,
    /// Text shown when the entity is the cell ahead
    pub look_text: &'static str,
    pub passable: bool,
    /// Interaction line, appended after the entity's name
    pub interaction: &'static str,
    pub health: Option<i32>,
    pub damage: Option<i32>,
    pub dialogue: Option<&'static str>,
    /// Sprite variants; the first is the default
    pub sprites: &'static [&'static str],
}

static ENEMY: KindDefaults = KindDefaults {
    name: "Goblin",
    description: "A small green goblin with sharp claws.",
    look_text: "a snarling goblin",
    passable: false,
    interaction: "snarls at you! Prepare for battle!",
    health: Some(10),
    damage: Some(2),
    dialogue: None,
    sprites: &["ENEMY", "ENEMY2"],
};

static NPC: KindDefaults = KindDefaults {
    name: "Wanderer",
    description: "A wanderer wrapped in a heavy cloak.",
    look_text: "a mysterious wanderer",
    passable: false,
    interaction: "stares at you in silence.",
    health: None,
    damage: None,
    dialogue: Some("Greetings, traveller! I have lost my way in these dungeons..."),
    sprites: &["NPC", "NPC2"],
};

static OBSTACLE: KindDefaults = KindDefaults {
    name: "Ancient tree",
    description: "An old, gnarled tree growing through the stone floor.",
    look_text: "an ancient tree that has grown through the stones",
    passable: true,
    interaction: "",
    health: None,
    damage: None,
    dialogue: None,
    sprites: &["TREE"],
};

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Enemy, EntityKind::Npc, EntityKind::Obstacle];

    /// Catalog entry for this kind.
    pub fn defaults(self) -> &'static KindDefaults {
        match self {
            EntityKind::Enemy => &ENEMY,
            EntityKind::Npc => &NPC,
            EntityKind::Obstacle => &OBSTACLE,
        }
    }

    /// Identifier written to level files.
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Enemy => "enemy",
            EntityKind::Npc => "npc",
            EntityKind::Obstacle => "obstacle",
        }
    }

    /// Editor label.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Enemy => "Enemy",
            EntityKind::Npc => "NPC",
            EntityKind::Obstacle => "Tree",
        }
    }

    /// Minimap glyph.
    pub fn glyph(self) -> char {
        match self {
            EntityKind::Enemy => '☠',
            EntityKind::Npc => '☺',
            EntityKind::Obstacle => '♣',
        }
    }

    /// Kind for a numeric index (declaration order), if valid.
    pub fn from_index(index: u8) -> Option<EntityKind> {
        EntityKind::ALL.get(index as usize).copied()
    }

    /// Cycle to the next kind (editor selection).
    pub fn next(self) -> EntityKind {
        let idx = EntityKind::ALL.iter().position(|k| *k == self).unwrap_or(0);
        EntityKind::ALL[(idx + 1) % EntityKind::ALL.len()]
    }
}

/// Resolve an external identifier into a kind.
///
/// Case-insensitive; accepts `tree` as an alias for obstacles. Unknown
/// identifiers fall back to [`FALLBACK_KIND`] and log a warning.
pub fn resolve_kind(identifier: &str) -> EntityKind {
    match lookup_kind(identifier) {
        Some(kind) => kind,
        None => {
            log::warn!(
                "[Catalog] Unknown entity kind {:?}, using {}",
                identifier,
                FALLBACK_KIND.as_str()
            );
            FALLBACK_KIND
        }
    }
}

/// Strict lookup without fallback.
pub fn lookup_kind(identifier: &str) -> Option<EntityKind> {
    match identifier.trim().to_ascii_lowercase().as_str() {
        "enemy" => Some(EntityKind::Enemy),
        "npc" => Some(EntityKind::Npc),
        "obstacle" | "tree" => Some(EntityKind::Obstacle),
        _ => None,
    }
}

/// Human label for a sprite variant id.
pub fn sprite_label(sprite: &str) -> &str {
    match sprite {
        "ENEMY" => "Goblin (red)",
        "ENEMY2" => "Goblin (blue)",
        "NPC" => "Wanderer (green)",
        "NPC2" => "Wanderer (blue)",
        "TREE" => "Tree",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_identifiers() {
        assert_eq!(resolve_kind("enemy"), EntityKind::Enemy);
        assert_eq!(resolve_kind("NPC"), EntityKind::Npc);
        assert_eq!(resolve_kind(" Obstacle "), EntityKind::Obstacle);
        assert_eq!(resolve_kind("tree"), EntityKind::Obstacle);
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        assert_eq!(resolve_kind("dragon"), FALLBACK_KIND);
        assert_eq!(resolve_kind(""), FALLBACK_KIND);
        assert_eq!(lookup_kind("dragon"), None);
    }

    #[test]
    fn test_identifiers_round_trip() {
        for kind in EntityKind::ALL {
            assert_eq!(lookup_kind(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_defaults() {
        assert!(!EntityKind::Enemy.defaults().passable);
        assert!(!EntityKind::Npc.defaults().passable);
        assert!(EntityKind::Obstacle.defaults().passable);
        assert_eq!(EntityKind::Enemy.defaults().health, Some(10));
        assert!(EntityKind::Npc.defaults().dialogue.is_some());
        for kind in EntityKind::ALL {
            assert!(!kind.defaults().sprites.is_empty());
        }
    }

    #[test]
    fn test_next_cycles() {
        assert_eq!(EntityKind::Enemy.next(), EntityKind::Npc);
        assert_eq!(EntityKind::Obstacle.next(), EntityKind::Enemy);
        assert_eq!(EntityKind::from_index(2), Some(EntityKind::Obstacle));
        assert_eq!(EntityKind::from_index(3), None);
    }
}
