//! HUD panels: description, status line, event log and the editor panel

use macroquad::prelude::*;
use crate::editor::{EditorMode, EditorState, EDITOR_ACTIONS};
use crate::world::{sprite_label, GridWorld};
use super::theme;

const PAD: f32 = 10.0;
const LINE: f32 = 20.0;

/// Greedy word wrap to at most `width` characters per line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() { word.chars().count() } else { current.chars().count() + 1 + word.chars().count() };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Characters that fit in `pixels` at a font size (monospace estimate)
fn chars_for(pixels: f32, font_size: f32) -> usize {
    (pixels / (font_size * 0.5)).max(1.0) as usize
}

fn panel(area: Rect) {
    draw_rectangle(area.x, area.y, area.w, area.h, theme::PANEL_COLOR);
    draw_rectangle_lines(area.x, area.y, area.w, area.h, 1.0, theme::PANEL_BORDER);
}

/// Surroundings text plus the status line.
pub fn draw_description(world: &GridWorld, area: Rect) {
    panel(area);
    let mut y = area.y + PAD + theme::FONT_SIZE_HEADER;
    draw_text(&world.status_line(), area.x + PAD, y, theme::FONT_SIZE_HEADER, theme::TEXT_ACCENT);
    y += LINE + 4.0;

    let width = chars_for(area.w - PAD * 2.0, theme::FONT_SIZE_CONTENT);
    for line in wrap_text(&world.current_description(), width) {
        if y > area.y + area.h - PAD {
            break;
        }
        draw_text(&line, area.x + PAD, y, theme::FONT_SIZE_CONTENT, theme::TEXT_COLOR);
        y += LINE;
    }
}

/// Event log, newest line at the bottom.
pub fn draw_log(world: &GridWorld, area: Rect) {
    panel(area);
    let width = chars_for(area.w - PAD * 2.0, theme::FONT_SIZE_SMALL);
    let lines: Vec<String> = world.log().iter().flat_map(|l| wrap_text(l, width)).collect();
    let fits = ((area.h - PAD * 2.0) / LINE).max(0.0) as usize;
    let start = lines.len().saturating_sub(fits);

    let mut y = area.y + PAD + theme::FONT_SIZE_SMALL;
    let count = lines.len();
    for (i, line) in lines.iter().enumerate().skip(start) {
        let color = if i + 1 == count { theme::TEXT_COLOR } else { theme::TEXT_DIM };
        draw_text(line, area.x + PAD, y, theme::FONT_SIZE_SMALL, color);
        y += LINE;
    }
}

/// Editor selection, shortcuts and status message.
pub fn draw_editor_panel(editor: &EditorState, now: f64, area: Rect) {
    panel(area);
    let x = area.x + PAD;
    let mut y = area.y + PAD + theme::FONT_SIZE_HEADER;
    draw_text("EDITOR", x, y, theme::FONT_SIZE_HEADER, theme::TEXT_ACCENT);
    y += LINE + 4.0;

    let modes: Vec<String> = EditorMode::ALL
        .iter()
        .map(|m| if *m == editor.mode { format!("[{}]", m.label()) } else { m.label().to_string() })
        .collect();
    draw_text(&format!("Mode: {}", modes.join(" ")), x, y, theme::FONT_SIZE_CONTENT, theme::TEXT_COLOR);
    y += LINE;

    let passable = if editor.passable { "passable" } else { "blocking" };
    draw_text(
        &format!("Entity: {} / {} ({})", editor.kind.label(), sprite_label(editor.sprite()), passable),
        x,
        y,
        theme::FONT_SIZE_CONTENT,
        theme::TEXT_COLOR,
    );
    y += LINE;
    draw_text(&format!("Level: {}", editor.level_name), x, y, theme::FONT_SIZE_CONTENT, theme::TEXT_COLOR);
    y += LINE;
    let redo = if editor.can_redo() { ", redo available" } else { "" };
    draw_text(
        &format!("History: {} step(s){}", editor.undo_depth(), redo),
        x,
        y,
        theme::FONT_SIZE_SMALL,
        theme::TEXT_DIM,
    );
    y += LINE + 4.0;

    for def in EDITOR_ACTIONS {
        if y > area.y + area.h - LINE * 1.5 {
            break;
        }
        draw_text(
            &format!("{:<16} {}", def.shortcut.label(), def.label),
            x,
            y,
            theme::FONT_SIZE_SMALL,
            theme::TEXT_DIM,
        );
        y += LINE - 4.0;
    }

    if let Some(status) = editor.get_status(now) {
        let color = if editor.status_error { theme::TEXT_ERROR } else { theme::TEXT_ACCENT };
        draw_text(status, x, area.y + area.h - PAD, theme::FONT_SIZE_SMALL, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text() {
        let lines = wrap_text("You stand in a stone corridor. The air is damp and cold.", 20);
        assert_eq!(
            lines,
            vec!["You stand in a stone", "corridor. The air is", "damp and cold."]
        );
        assert!(lines.iter().all(|l| l.chars().count() <= 20));
    }

    #[test]
    fn test_wrap_long_word() {
        assert_eq!(wrap_text("a verylongword b", 4), vec!["a", "verylongword", "b"]);
        assert!(wrap_text("", 10).is_empty());
    }
}
