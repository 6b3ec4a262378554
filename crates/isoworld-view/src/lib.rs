//! Sliding occupancy window over the section store, with collision queries
//! and A* pathfinding against it.
#![forbid(unsafe_code)]

pub mod collision;
pub mod path;
pub mod window;

pub use collision::BlockerFilter;
pub use path::{MOVER_HEIGHT, PathRequest, PathStep, Pathfinder};
pub use window::{Cell, CellId, MAX_FOCUS, ShapeHit, ViewPos, Window, WorldPos};

/// Window extent along x and y.
pub const WINDOW_SIZE: i32 = 96;
/// Window extent along z; matches the section height.
pub const WINDOW_Z: i32 = isoworld_store::SECTION_Z_SIZE as i32;
/// Side of the cube scanned for blockers. No shape footprint may exceed it.
pub const SEARCH_SIZE: i32 = 16;
