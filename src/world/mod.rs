//! World module - grid-based dungeon state
//!
//! The logical model behind everything on screen:
//! - Four-way headings with table-driven step vectors
//! - Entity catalog and placed entity records
//! - GridWorld: walls, entities, player and the event log
//! - Level snapshots for save/load
//!
//! Rendering, input and the editor only read from or call into GridWorld.

mod catalog;
mod coord;
mod direction;
mod entity;
mod event_log;
mod grid;
mod layout;
mod level;

pub use catalog::*;
pub use coord::Coord;
pub use direction::{Heading, Step};
pub use entity::{Entity, EntityOverrides, Lifecycle};
pub use event_log::{EventLog, LOG_CAPACITY};
pub use grid::*;
pub use layout::*;
pub use level::*;
