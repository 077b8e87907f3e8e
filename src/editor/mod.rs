//! Level Editor
//!
//! Edits the live world through the minimap:
//! - Wall / Entity / Erase modes on left click, erase on right click
//! - Entity kind, sprite variant and passable flag selection
//! - Undo/redo checkpoints, save/load to the levels directory

mod actions;
mod state;

pub use actions::*;
pub use state::*;
