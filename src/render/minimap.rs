//! Minimap
//!
//! Top-down grid in a corner of the screen. Doubles as the editor canvas:
//! clicks are mapped back to cells with [`MinimapLayout::cell_at`].

use macroquad::prelude::*;
use crate::world::{Coord, EntityKind, GridWorld, Heading};
use super::theme;

/// What a minimap cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Player(Heading),
    Wall,
    Entity(EntityKind),
    Visited,
    Floor,
}

impl CellView {
    /// Glyph drawn on top of the cell, if any
    pub fn glyph(self) -> Option<char> {
        match self {
            CellView::Player(h) => Some(h.arrow()),
            CellView::Entity(kind) => Some(kind.glyph()),
            _ => None,
        }
    }
}

/// Classify a cell. The player wins over an entity they stand inside.
pub fn classify(world: &GridWorld, x: i32, y: i32) -> CellView {
    let pos = Coord::new(x, y);
    if world.player_pos() == pos {
        CellView::Player(world.heading())
    } else if world.is_wall(x, y) {
        CellView::Wall
    } else if let Some(entity) = world.entity_at(x, y) {
        CellView::Entity(entity.kind)
    } else if world.visited().contains(&pos) {
        CellView::Visited
    } else {
        CellView::Floor
    }
}

/// Text rendering of the whole map, one row per line.
pub fn render_rows(world: &GridWorld) -> Vec<String> {
    let size = world.grid_size();
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| match classify(world, x, y) {
                    CellView::Wall => '#',
                    CellView::Visited => '·',
                    CellView::Floor => ' ',
                    other => other.glyph().unwrap_or('?'),
                })
                .collect()
        })
        .collect()
}

/// Screen placement of the minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapLayout {
    pub origin: Vec2,
    pub cell: f32,
    pub grid_size: i32,
}

impl MinimapLayout {
    /// Fit the grid into a square of `extent` pixels at `origin`.
    pub fn fit(origin: Vec2, extent: f32, grid_size: i32) -> Self {
        let n = grid_size.max(1);
        Self {
            origin,
            cell: (extent / n as f32).floor().max(2.0),
            grid_size: n,
        }
    }

    pub fn extent(&self) -> f32 {
        self.cell * self.grid_size as f32
    }

    pub fn cell_rect(&self, x: i32, y: i32) -> Rect {
        Rect::new(
            self.origin.x + x as f32 * self.cell,
            self.origin.y + y as f32 * self.cell,
            self.cell,
            self.cell,
        )
    }

    /// Cell under a screen point, if inside the map.
    pub fn cell_at(&self, point: Vec2) -> Option<Coord> {
        let local = point - self.origin;
        if local.x < 0.0 || local.y < 0.0 {
            return None;
        }
        let x = (local.x / self.cell) as i32;
        let y = (local.y / self.cell) as i32;
        let pos = Coord::new(x, y);
        pos.in_bounds(self.grid_size).then_some(pos)
    }
}

pub fn draw_minimap(world: &GridWorld, layout: &MinimapLayout, hover: Option<Coord>) {
    let extent = layout.extent();
    draw_rectangle(layout.origin.x - 4.0, layout.origin.y - 4.0, extent + 8.0, extent + 8.0, theme::PANEL_COLOR);

    let font_size = (layout.cell * 0.9).max(8.0);
    for y in 0..layout.grid_size {
        for x in 0..layout.grid_size {
            let r = layout.cell_rect(x, y);
            let view = classify(world, x, y);
            let fill = match view {
                CellView::Wall => theme::MAP_WALL,
                CellView::Visited | CellView::Player(_) => theme::MAP_VISITED,
                _ => theme::MAP_FLOOR,
            };
            draw_rectangle(r.x, r.y, r.w - 1.0, r.h - 1.0, fill);

            if let Some(glyph) = view.glyph() {
                let color = match view {
                    CellView::Player(_) => theme::MAP_PLAYER,
                    CellView::Entity(kind) => {
                        let sprite = world.entity_at(x, y).map(|e| e.sprite.as_str()).unwrap_or("");
                        theme::sprite_color(kind, sprite)
                    }
                    _ => theme::TEXT_COLOR,
                };
                let text = glyph.to_string();
                let dims = measure_text(&text, None, font_size as u16, 1.0);
                draw_text(
                    &text,
                    r.x + (r.w - dims.width) / 2.0,
                    r.y + (r.h + dims.offset_y) / 2.0,
                    font_size,
                    color,
                );
            }
        }
    }

    if let Some(pos) = hover {
        let r = layout.cell_rect(pos.x, pos.y);
        draw_rectangle(r.x, r.y, r.w - 1.0, r.h - 1.0, theme::MAP_HOVER);
    }
}
