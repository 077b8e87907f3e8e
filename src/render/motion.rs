//! Move animation
//!
//! Cosmetic interpolation between grid cells. The animator holds at most one
//! pending move; the world only changes when the animation finishes, and only
//! if the destination is still passable at that moment (the editor may have
//! changed it mid-slide). Otherwise the visual position snaps back.

use crate::world::{Coord, GridWorld};

/// What the animator did on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionEvent {
    /// The move was committed to the world
    Committed(Coord),
    /// The destination became impassable; nothing was changed
    Reverted,
}

#[derive(Debug, Clone, Copy)]
struct PendingMove {
    from: Coord,
    dx: i32,
    dy: i32,
    elapsed: f32,
}

#[derive(Debug, Clone)]
pub struct MoveAnimator {
    pending: Option<PendingMove>,
    /// Seconds a one-cell slide takes
    pub duration: f32,
}

impl MoveAnimator {
    pub fn new(duration: f32) -> Self {
        Self {
            pending: None,
            duration: duration.max(0.0),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.pending.is_some()
    }

    /// Request a relative move.
    ///
    /// Returns false if a move is already in flight. A move into an impassable
    /// cell is handed to the world immediately so it can log the reason, with
    /// no animation.
    pub fn start(&mut self, world: &mut GridWorld, dx: i32, dy: i32) -> bool {
        if self.pending.is_some() {
            return false;
        }
        let from = world.player_pos();
        let passable = from
            .checked_offset(dx, dy)
            .map_or(false, |t| world.is_passable(t.x, t.y));
        if !passable || self.duration <= 0.0 {
            world.move_player(dx, dy);
            return true;
        }
        self.pending = Some(PendingMove { from, dx, dy, elapsed: 0.0 });
        true
    }

    /// Advance the animation; commits or reverts when it completes.
    pub fn tick(&mut self, world: &mut GridWorld, dt: f32) -> Option<MotionEvent> {
        let pending = self.pending.as_mut()?;
        pending.elapsed += dt.max(0.0);
        if pending.elapsed < self.duration {
            return None;
        }

        let PendingMove { from, dx, dy, .. } = *pending;
        self.pending = None;

        // The world may have been edited or reloaded while we were sliding
        let target = match from.checked_offset(dx, dy) {
            Some(t) if world.player_pos() == from && world.is_passable(t.x, t.y) => t,
            _ => {
                log::debug!("[Motion] Move from {} by ({}, {}) discarded", from, dx, dy);
                return Some(MotionEvent::Reverted);
            }
        };
        if world.move_player(dx, dy) {
            Some(MotionEvent::Committed(target))
        } else {
            Some(MotionEvent::Reverted)
        }
    }

    /// Drop any pending move without touching the world.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Interpolated camera cell position (cell centre coordinates).
    pub fn visual_position(&self, world: &GridWorld) -> (f32, f32) {
        match &self.pending {
            Some(p) => {
                let t = if self.duration > 0.0 {
                    ease_in_out(p.elapsed / self.duration)
                } else {
                    1.0
                };
                (
                    p.from.x as f32 + 0.5 + p.dx as f32 * t,
                    p.from.y as f32 + 0.5 + p.dy as f32 * t,
                )
            }
            None => {
                let pos = world.player_pos();
                (pos.x as f32 + 0.5, pos.y as f32 + 0.5)
            }
        }
    }
}

impl Default for MoveAnimator {
    fn default() -> Self {
        Self::new(0.2)
    }
}

/// Smoothstep easing on [0, 1].
fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{EntityKind, EntityOverrides, Layout};

    fn open_world() -> GridWorld {
        let mut layout = Layout::blank(10);
        layout.walls.clear();
        GridWorld::new(&layout)
    }

    #[test]
    fn test_commit_after_duration() {
        let mut world = open_world();
        let mut anim = MoveAnimator::new(0.2);
        assert!(anim.start(&mut world, 1, 0));
        assert!(anim.is_moving());

        assert_eq!(anim.tick(&mut world, 0.1), None);
        assert_eq!(world.player_pos(), Coord::new(5, 5));
        let (vx, _) = anim.visual_position(&world);
        assert!(vx > 5.5 && vx < 6.5);

        assert_eq!(anim.tick(&mut world, 0.15), Some(MotionEvent::Committed(Coord::new(6, 5))));
        assert_eq!(world.player_pos(), Coord::new(6, 5));
        assert!(!anim.is_moving());
        assert_eq!(anim.visual_position(&world), (6.5, 5.5));
    }

    #[test]
    fn test_only_one_pending_move() {
        let mut world = open_world();
        let mut anim = MoveAnimator::new(0.2);
        assert!(anim.start(&mut world, 1, 0));
        assert!(!anim.start(&mut world, 0, 1));
        anim.tick(&mut world, 1.0);
        assert_eq!(world.player_pos(), Coord::new(6, 5));
    }

    #[test]
    fn test_revert_when_blocked_mid_animation() {
        let mut world = open_world();
        let mut anim = MoveAnimator::new(0.2);
        anim.start(&mut world, 0, -1);
        let log_len = world.log().len();

        // Editor drops an enemy into the destination mid-slide
        world
            .add_entity(5, 4, EntityKind::Enemy, EntityOverrides::default())
            .unwrap();
        assert_eq!(anim.tick(&mut world, 0.5), Some(MotionEvent::Reverted));
        assert_eq!(world.player_pos(), Coord::new(5, 5));
        assert_eq!(world.log().len(), log_len);
        assert_eq!(anim.visual_position(&world), (5.5, 5.5));
    }

    #[test]
    fn test_blocked_start_reports_immediately() {
        let mut world = open_world();
        world.toggle_wall(5, 4).unwrap();
        let mut anim = MoveAnimator::new(0.2);
        assert!(anim.start(&mut world, 0, -1));
        assert!(!anim.is_moving());
        assert_eq!(world.log().latest(), Some("A wall blocks your path!"));
    }

    #[test]
    fn test_cancel_discards() {
        let mut world = open_world();
        let mut anim = MoveAnimator::new(0.2);
        anim.start(&mut world, 1, 0);
        anim.cancel();
        assert_eq!(anim.tick(&mut world, 1.0), None);
        assert_eq!(world.player_pos(), Coord::new(5, 5));
    }

    #[test]
    fn test_zero_duration_moves_instantly() {
        let mut world = open_world();
        let mut anim = MoveAnimator::new(0.0);
        anim.start(&mut world, -1, 0);
        assert!(!anim.is_moving());
        assert_eq!(world.player_pos(), Coord::new(4, 5));
    }
}
