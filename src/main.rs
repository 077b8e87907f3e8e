//! Dungeon Crawl: a grid-based first-person dungeon crawler
//!
//! The world is a square grid of walls and entities; the screen shows a
//! raycast first-person view of it, a minimap and the event log. Tab opens a
//! level editor that works directly on the live grid.
//!
//! Usage: `dungeon-crawl [LEVEL]` where LEVEL is a JSON or RON level file.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod app;
mod config;
mod editor;
mod input;
mod render;
mod world;

use std::path::PathBuf;
use macroquad::prelude::*;
use app::AppState;
use config::GameConfig;
use editor::EDITOR_ACTIONS;
use render::{MinimapLayout, ViewCamera};

/// Seconds a quarter turn of the camera takes
const TURN_TIME: f32 = 0.15;

/// Width of the right-hand column (minimap + log)
const SIDE_WIDTH: f32 = 340.0;

fn window_conf() -> Conf {
    // Logging isn't up yet; main() loads the config again and reports on it
    let config = GameConfig::load();
    Conf {
        window_title: format!("Dungeon Crawl v{}", VERSION),
        window_width: config.window_width,
        window_height: config.window_height,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    // Initialize crash logging FIRST (before any other code)
    #[cfg(not(target_arch = "wasm32"))]
    crashlog::setup!(crashlog::cargo_metadata!().capitalized(), false);

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Dungeon Crawl v{}", VERSION);

    let config = GameConfig::load();
    let start_level = std::env::args().nth(1).map(PathBuf::from);
    let mut app = AppState::new(config, start_level);

    let start = app.animator.visual_position(&app.world);
    let mut camera = ViewCamera::new(start.0, start.1, app.world.heading());

    loop {
        let now = get_time();
        let dt = get_frame_time();

        // =====================================================================
        // Input
        // =====================================================================
        let ctrl = input::ctrl_down();
        let shift = is_key_down(KeyCode::LeftShift) || is_key_down(KeyCode::RightShift);

        if app.editor.active {
            for def in EDITOR_ACTIONS {
                if is_key_pressed(def.shortcut.key) && def.shortcut.matches(def.shortcut.key, ctrl, shift) {
                    app.editor_action(def.action, now);
                }
            }
        }
        if !ctrl {
            for command in input::pressed_commands() {
                app.handle_command(command, now);
            }
        }

        // =====================================================================
        // Layout
        // =====================================================================
        let screen_w = screen_width();
        let screen_h = screen_height();
        let side_x = (screen_w - SIDE_WIDTH).max(0.0);
        let view_h = (screen_h * 0.7).floor();
        let view_area = Rect::new(0.0, 0.0, side_x, view_h);
        let desc_area = Rect::new(0.0, view_h, side_x, screen_h - view_h);
        let map_extent = SIDE_WIDTH - 24.0;
        let minimap = MinimapLayout::fit(vec2(side_x + 12.0, 12.0), map_extent, app.world.grid_size());
        let lower_y = 24.0 + minimap.extent();
        let lower_area = Rect::new(side_x, lower_y, SIDE_WIDTH, (screen_h - lower_y).max(0.0));

        // Editor clicks land on the minimap
        let (mx, my) = mouse_position();
        let hover = if app.editor.active { minimap.cell_at(vec2(mx, my)) } else { None };
        if let Some(cell) = hover {
            if is_mouse_button_pressed(MouseButton::Left) {
                app.editor_click(cell, true, now);
            } else if is_mouse_button_pressed(MouseButton::Right) {
                app.editor_click(cell, false, now);
            }
        }

        // =====================================================================
        // Update
        // =====================================================================
        app.update(dt);
        let (cx, cy) = app.animator.visual_position(&app.world);
        camera.x = cx;
        camera.y = cy;
        camera.turn_toward(app.world.heading(), dt, TURN_TIME);

        // =====================================================================
        // Draw
        // =====================================================================
        clear_background(render::theme::BG_COLOR);
        render::draw_view(&app.world, &camera, app.config.fov(), view_area);
        render::draw_description(&app.world, desc_area);

        if app.config.show_minimap || app.editor.active {
            render::draw_minimap(&app.world, &minimap, hover);
        }
        if app.editor.active {
            render::draw_editor_panel(&app.editor, now, lower_area);
        } else {
            render::draw_log(&app.world, lower_area);
        }

        next_frame().await;
    }
}
