//! Placed entity records
//!
//! An entity is built from its catalog defaults merged with per-placement
//! overrides (editor settings or fields from a level file).

use serde::{Deserialize, Serialize};
use super::catalog::EntityKind;
use super::coord::Coord;

/// Lifecycle of a placed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    #[default]
    Alive,
    Dead,
    Destroyed,
}

/// An entity occupying one grid cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: EntityKind,
    pub pos: Coord,
    pub sprite: String,
    pub name: String,
    pub description: String,
    pub look_text: String,
    pub passable: bool,
    pub state: Lifecycle,
    pub health: Option<i32>,
    pub damage: Option<i32>,
    pub dialogue: Option<String>,
}

/// Per-placement values that replace catalog defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityOverrides {
    pub sprite: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub look_text: Option<String>,
    pub passable: Option<bool>,
    pub state: Option<Lifecycle>,
    pub health: Option<i32>,
    pub damage: Option<i32>,
    pub dialogue: Option<String>,
}

impl EntityOverrides {
    pub fn passable(mut self, passable: bool) -> Self {
        self.passable = Some(passable);
        self
    }

    pub fn sprite(mut self, sprite: impl Into<String>) -> Self {
        self.sprite = Some(sprite.into());
        self
    }

    pub fn state(mut self, state: Lifecycle) -> Self {
        self.state = Some(state);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Entity {
    /// Build an entity from catalog defaults with overrides applied on top.
    pub fn from_catalog(kind: EntityKind, pos: Coord, overrides: EntityOverrides) -> Self {
        let defaults = kind.defaults();
        Self {
            kind,
            pos,
            sprite: overrides
                .sprite
                .unwrap_or_else(|| defaults.sprites[0].to_string()),
            name: overrides.name.unwrap_or_else(|| defaults.name.to_string()),
            description: overrides
                .description
                .unwrap_or_else(|| defaults.description.to_string()),
            look_text: overrides
                .look_text
                .unwrap_or_else(|| defaults.look_text.to_string()),
            passable: overrides.passable.unwrap_or(defaults.passable),
            state: overrides.state.unwrap_or_default(),
            health: overrides.health.or(defaults.health),
            damage: overrides.damage.or(defaults.damage),
            dialogue: overrides
                .dialogue
                .or_else(|| defaults.dialogue.map(str::to_string)),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.state == Lifecycle::Alive
    }

    /// Overrides that reproduce this entity from its kind's defaults.
    pub fn to_overrides(&self) -> EntityOverrides {
        EntityOverrides {
            sprite: Some(self.sprite.clone()),
            name: Some(self.name.clone()),
            description: Some(self.description.clone()),
            look_text: Some(self.look_text.clone()),
            passable: Some(self.passable),
            state: Some(self.state),
            health: self.health,
            damage: self.damage,
            dialogue: self.dialogue.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_defaults_applied() {
        let e = Entity::from_catalog(EntityKind::Enemy, Coord::new(3, 3), EntityOverrides::default());
        assert_eq!(e.name, "Goblin");
        assert_eq!(e.sprite, "ENEMY");
        assert!(!e.passable);
        assert_eq!(e.health, Some(10));
        assert_eq!(e.damage, Some(2));
        assert!(e.is_alive());
    }

    #[test]
    fn test_overrides_win() {
        let overrides = EntityOverrides::default()
            .passable(false)
            .sprite("TREE")
            .state(Lifecycle::Destroyed);
        let e = Entity::from_catalog(EntityKind::Obstacle, Coord::new(1, 2), overrides);
        assert!(!e.passable);
        assert_eq!(e.state, Lifecycle::Destroyed);
        assert_eq!(e.name, "Ancient tree");
    }

    #[test]
    fn test_to_overrides_reproduces_entity() {
        let mut e = Entity::from_catalog(EntityKind::Npc, Coord::new(4, 4), EntityOverrides::default());
        e.state = Lifecycle::Dead;
        e.dialogue = Some("...".to_string());
        let rebuilt = Entity::from_catalog(e.kind, e.pos, e.to_overrides());
        assert_eq!(rebuilt, e);
    }
}
