//! First-person view
//!
//! Classic grid raycaster: one DDA ray per screen column against the wall
//! set, then entity billboards clipped against the per-column depth buffer.
//! Cells outside the grid count as solid so the edge of the map always reads
//! as a wall.

use macroquad::prelude::*;
use crate::world::{Entity, GridWorld, Heading};
use super::theme::{self, shade};

/// Upper bound on DDA steps per ray
const MAX_RAY_STEPS: usize = 128;

/// Camera pose in cell units; cell (x, y) spans [x, x+1) x [y, y+1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCamera {
    pub x: f32,
    pub y: f32,
    /// Radians, 0 = north, clockwise positive
    pub yaw: f32,
}

impl ViewCamera {
    pub fn new(x: f32, y: f32, heading: Heading) -> Self {
        Self { x, y, yaw: heading.yaw() }
    }

    /// Ease the yaw toward a heading along the shorter arc.
    pub fn turn_toward(&mut self, heading: Heading, dt: f32, turn_time: f32) {
        let target = heading.yaw();
        let diff = wrap_angle(target - self.yaw);
        if turn_time <= 0.0 || diff.abs() < 1e-3 {
            self.yaw = target;
            return;
        }
        let max_step = std::f32::consts::FRAC_PI_2 * dt / turn_time;
        self.yaw = wrap_angle(self.yaw + diff.clamp(-max_step, max_step));
    }

    /// Unit view direction
    pub fn dir(&self) -> (f32, f32) {
        (self.yaw.sin(), -self.yaw.cos())
    }

    /// Camera plane (right-hand side), scaled for the field of view
    pub fn plane(&self, fov: f32) -> (f32, f32) {
        let k = (fov / 2.0).tan();
        (self.yaw.cos() * k, self.yaw.sin() * k)
    }
}

/// Wrap an angle to (-PI, PI].
fn wrap_angle(a: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut a = a.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Where a ray stopped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    /// Perpendicular distance (no fisheye)
    pub distance: f32,
    /// Hit on a face perpendicular to x
    pub x_side: bool,
    pub cell: (i32, i32),
}

/// Cast one ray from (x, y) with direction (dx, dy).
pub fn cast_ray(world: &GridWorld, x: f32, y: f32, dx: f32, dy: f32) -> Option<WallHit> {
    let mut map_x = x.floor() as i32;
    let mut map_y = y.floor() as i32;

    let delta_x = if dx.abs() < 1e-8 { 1e30 } else { (1.0 / dx).abs() };
    let delta_y = if dy.abs() < 1e-8 { 1e30 } else { (1.0 / dy).abs() };

    let (step_x, mut side_x) = if dx < 0.0 {
        (-1, (x - map_x as f32) * delta_x)
    } else {
        (1, (map_x as f32 + 1.0 - x) * delta_x)
    };
    let (step_y, mut side_y) = if dy < 0.0 {
        (-1, (y - map_y as f32) * delta_y)
    } else {
        (1, (map_y as f32 + 1.0 - y) * delta_y)
    };

    for _ in 0..MAX_RAY_STEPS {
        let x_side = side_x < side_y;
        let distance = if x_side {
            let d = side_x;
            side_x += delta_x;
            map_x += step_x;
            d
        } else {
            let d = side_y;
            side_y += delta_y;
            map_y += step_y;
            d
        };
        if world.is_wall(map_x, map_y) || world.is_out_of_bounds(map_x, map_y) {
            return Some(WallHit { distance, x_side, cell: (map_x, map_y) });
        }
    }
    None
}

/// A billboard ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteProjection {
    /// Screen-space centre column, as a fraction of view width
    pub screen_x: f32,
    /// Distance along the view direction
    pub depth: f32,
}

/// Project an entity's cell centre into view space, if it is in front.
pub fn project_entity(camera: &ViewCamera, fov: f32, entity: &Entity) -> Option<SpriteProjection> {
    let rel_x = entity.pos.x as f32 + 0.5 - camera.x;
    let rel_y = entity.pos.y as f32 + 0.5 - camera.y;
    let (dir_x, dir_y) = camera.dir();
    let (plane_x, plane_y) = camera.plane(fov);

    // Inverse of the [plane dir] basis
    let det = plane_x * dir_y - dir_x * plane_y;
    if det.abs() < 1e-8 {
        return None;
    }
    let inv = 1.0 / det;
    let lateral = inv * (dir_y * rel_x - dir_x * rel_y);
    let depth = inv * (-plane_y * rel_x + plane_x * rel_y);
    if depth <= 0.1 {
        return None;
    }
    Some(SpriteProjection {
        screen_x: 0.5 * (1.0 + lateral / depth),
        depth,
    })
}

fn fog(distance: f32) -> f32 {
    (1.0 - distance / theme::FOG_DISTANCE).clamp(0.2, 1.0)
}

/// Draw the first-person view into a screen rectangle.
pub fn draw_view(world: &GridWorld, camera: &ViewCamera, fov: f32, area: Rect) {
    let half = area.h / 2.0;
    draw_rectangle(area.x, area.y, area.w, half, theme::CEILING_COLOR);
    draw_rectangle(area.x, area.y + half, area.w, half, theme::FLOOR_COLOR);

    let columns = area.w.max(1.0) as usize;
    let (dir_x, dir_y) = camera.dir();
    let (plane_x, plane_y) = camera.plane(fov);
    let mut depth_buffer = vec![f32::INFINITY; columns];

    for (col, depth) in depth_buffer.iter_mut().enumerate() {
        let camera_x = 2.0 * col as f32 / columns as f32 - 1.0;
        let ray_x = dir_x + plane_x * camera_x;
        let ray_y = dir_y + plane_y * camera_x;
        let Some(hit) = cast_ray(world, camera.x, camera.y, ray_x, ray_y) else {
            continue;
        };
        let distance = hit.distance.max(0.05);
        *depth = distance;

        let height = (area.h / distance).min(area.h * 4.0);
        let top = (area.y + half - height / 2.0).max(area.y);
        let bottom = (area.y + half + height / 2.0).min(area.y + area.h);
        let base = if hit.x_side { theme::WALL_LIGHT } else { theme::WALL_DARK };
        draw_rectangle(area.x + col as f32, top, 1.0, bottom - top, shade(base, fog(distance)));
    }

    // Far to near so closer sprites cover farther ones
    let mut sprites: Vec<(SpriteProjection, &Entity)> = world
        .entities()
        .into_iter()
        .filter_map(|e| project_entity(camera, fov, e).map(|p| (p, e)))
        .collect();
    sprites.sort_by(|a, b| b.0.depth.total_cmp(&a.0.depth));

    for (proj, entity) in sprites {
        draw_billboard(entity, &proj, &depth_buffer, area);
    }
}

fn draw_billboard(entity: &Entity, proj: &SpriteProjection, depth_buffer: &[f32], area: Rect) {
    let columns = depth_buffer.len() as f32;
    let size = (area.h / proj.depth * 0.7).min(area.h * 2.0);
    let centre = proj.screen_x * columns;
    let left = (centre - size / 2.0).max(0.0) as usize;
    let right = ((centre + size / 2.0).min(columns)).max(0.0) as usize;
    if left >= right {
        return;
    }

    let mut color = shade(theme::sprite_color(entity.kind, &entity.sprite), fog(proj.depth));
    if !entity.is_alive() {
        color.a = 0.45;
    }
    // Sprites stand on the floor
    let bottom = area.y + area.h / 2.0 + area.h / proj.depth / 2.0;
    let top = bottom - size;

    let mut visible = false;
    for col in left..right {
        if proj.depth < depth_buffer[col] {
            draw_rectangle(area.x + col as f32, top.max(area.y), 1.0, bottom.min(area.y + area.h) - top.max(area.y), color);
            visible = true;
        }
    }

    if visible && size > 24.0 {
        let glyph = entity.kind.glyph().to_string();
        let font_size = (size * 0.5).min(96.0);
        let dims = measure_text(&glyph, None, font_size as u16, 1.0);
        draw_text(&glyph, area.x + centre - dims.width / 2.0, top + size / 2.0, font_size, theme::BG_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityKind, EntityOverrides, Layout};

    fn world() -> GridWorld {
        GridWorld::new(&Layout::blank(10))
    }

    #[test]
    fn test_ray_hits_perimeter() {
        let world = world();
        // From the centre of (5,5) looking north: the wall row is y = 0, whose face is at y = 1
        let hit = cast_ray(&world, 5.5, 5.5, 0.0, -1.0).unwrap();
        assert_eq!(hit.cell, (5, 0));
        assert!((hit.distance - 4.5).abs() < 1e-5);
        assert!(!hit.x_side);
    }

    #[test]
    fn test_ray_hits_interior_wall() {
        let mut world = world();
        world.toggle_wall(7, 5).unwrap();
        let hit = cast_ray(&world, 5.5, 5.5, 1.0, 0.0).unwrap();
        assert_eq!(hit.cell, (7, 5));
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert!(hit.x_side);
    }

    #[test]
    fn test_open_edge_reads_as_wall() {
        let mut world = world();
        world.erase_cell(9, 5);
        let hit = cast_ray(&world, 5.5, 5.5, 1.0, 0.0).unwrap();
        assert_eq!(hit.cell, (10, 5));
    }

    #[test]
    fn test_camera_basis_follows_heading() {
        let cam = ViewCamera::new(5.5, 5.5, Heading::East);
        let (dx, dy) = cam.dir();
        assert!((dx - 1.0).abs() < 1e-5 && dy.abs() < 1e-5);
        let (px, py) = cam.plane(std::f32::consts::FRAC_PI_2);
        // Right of east is south
        assert!(px.abs() < 1e-5 && (py - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_turn_takes_short_arc() {
        let mut cam = ViewCamera::new(0.0, 0.0, Heading::North);
        cam.turn_toward(Heading::West, 0.1, 0.2);
        // Halfway, turning counter-clockwise
        assert!((cam.yaw + std::f32::consts::FRAC_PI_4).abs() < 1e-4);
        cam.turn_toward(Heading::West, 1.0, 0.2);
        assert!((wrap_angle(cam.yaw - Heading::West.yaw())).abs() < 1e-4);
    }

    #[test]
    fn test_entity_projection() {
        let mut world = world();
        world.add_entity(5, 3, EntityKind::Enemy, EntityOverrides::default()).unwrap();
        let goblin = world.entity_at(5, 3).unwrap().clone();
        let fov = 66f32.to_radians();

        let ahead = ViewCamera::new(5.5, 5.5, Heading::North);
        let proj = project_entity(&ahead, fov, &goblin).unwrap();
        assert!((proj.screen_x - 0.5).abs() < 1e-4);
        assert!((proj.depth - 2.0).abs() < 1e-4);

        let behind = ViewCamera::new(5.5, 5.5, Heading::South);
        assert!(project_entity(&behind, fov, &goblin).is_none());

        world.add_entity(6, 3, EntityKind::Npc, EntityOverrides::default()).unwrap();
        let npc = world.entity_at(6, 3).unwrap();
        assert!(project_entity(&ahead, fov, npc).unwrap().screen_x > 0.5);
    }
}
