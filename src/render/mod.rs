//! Rendering
//!
//! Read-only consumers of the world, plus the cosmetic move animator:
//! - First-person raycast view with entity billboards
//! - Minimap (also the editor canvas)
//! - HUD panels
//!
//! Nothing here mutates the world except [`MoveAnimator`], which commits a
//! move through `GridWorld::move_player` once its slide finishes.

mod hud;
mod minimap;
mod motion;
pub mod theme;
mod view;

pub use hud::*;
pub use minimap::*;
pub use motion::{MotionEvent, MoveAnimator};
pub use view::*;
