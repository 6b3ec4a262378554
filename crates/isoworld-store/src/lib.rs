//! Disk-backed section cache for the world occupancy grid.
#![forbid(unsafe_code)]

pub mod codec;
mod coord;
mod error;
mod observer;
mod section;
mod store;

pub use codec::{CodecError, FORMAT_VERSION};
pub use coord::{CellAddr, SectionCoord};
pub use error::StoreError;
pub use observer::{NoopObserver, SectionObserver};
pub use section::{Position, Section};
pub use store::{CACHE_SLOTS, IoMode, SectionPaths, SectionStore, SectionStoreStats};

/// Cells per section along x and y.
pub const SECTION_SIZE: usize = 200;
/// Cells per section along z.
pub const SECTION_Z_SIZE: usize = 24;
