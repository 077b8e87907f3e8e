//! Theme - Shared colors and styling constants

use macroquad::prelude::Color;
use crate::world::EntityKind;

// =============================================================================
// Base UI Colors
// =============================================================================

/// Dark background color
pub const BG_COLOR: Color = Color::new(0.11, 0.11, 0.13, 1.0);

/// Panel background
pub const PANEL_COLOR: Color = Color::new(0.15, 0.15, 0.18, 0.92);

/// Panel border
pub const PANEL_BORDER: Color = Color::new(0.314, 0.314, 0.314, 1.0);

/// Primary text color
pub const TEXT_COLOR: Color = Color::new(0.8, 0.8, 0.85, 1.0);

/// Dimmed/secondary text
pub const TEXT_DIM: Color = Color::new(0.4, 0.4, 0.45, 1.0);

/// Highlighted text (status line, editor selection)
pub const TEXT_ACCENT: Color = Color::new(0.95, 0.78, 0.35, 1.0);

/// Error status text
pub const TEXT_ERROR: Color = Color::new(0.95, 0.4, 0.35, 1.0);

// =============================================================================
// Font Sizes
// =============================================================================

pub const FONT_SIZE_HEADER: f32 = 20.0;
pub const FONT_SIZE_CONTENT: f32 = 16.0;
pub const FONT_SIZE_SMALL: f32 = 14.0;

// =============================================================================
// First-person view
// =============================================================================

pub const CEILING_COLOR: Color = Color::new(0.09, 0.08, 0.1, 1.0);
pub const FLOOR_COLOR: Color = Color::new(0.2, 0.18, 0.16, 1.0);

/// Wall faces hit on an x side
pub const WALL_LIGHT: Color = Color::new(0.55, 0.52, 0.48, 1.0);

/// Wall faces hit on a y side
pub const WALL_DARK: Color = Color::new(0.42, 0.4, 0.37, 1.0);

/// Distance at which fog reaches full strength
pub const FOG_DISTANCE: f32 = 9.0;

// =============================================================================
// Minimap
// =============================================================================

pub const MAP_FLOOR: Color = Color::new(0.16, 0.16, 0.19, 1.0);
pub const MAP_VISITED: Color = Color::new(0.24, 0.26, 0.3, 1.0);
pub const MAP_WALL: Color = Color::new(0.5, 0.48, 0.45, 1.0);
pub const MAP_PLAYER: Color = Color::new(0.95, 0.85, 0.3, 1.0);
pub const MAP_HOVER: Color = Color::new(0.35, 0.55, 0.8, 0.5);

/// Sprite tint for an entity kind and variant
pub fn sprite_color(kind: EntityKind, sprite: &str) -> Color {
    match (kind, sprite) {
        (EntityKind::Enemy, "ENEMY2") => Color::new(0.35, 0.45, 0.85, 1.0),
        (EntityKind::Enemy, _) => Color::new(0.8, 0.25, 0.2, 1.0),
        (EntityKind::Npc, "NPC2") => Color::new(0.3, 0.55, 0.9, 1.0),
        (EntityKind::Npc, _) => Color::new(0.3, 0.75, 0.35, 1.0),
        (EntityKind::Obstacle, _) => Color::new(0.25, 0.5, 0.2, 1.0),
    }
}

/// Scale a color's brightness, keeping alpha
pub fn shade(color: Color, factor: f32) -> Color {
    let f = factor.clamp(0.0, 1.0);
    Color::new(color.r * f, color.g * f, color.b * f, color.a)
}
