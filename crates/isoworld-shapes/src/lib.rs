//! Shape catalog: footprint sizes and movement flags per shape index.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;

pub use catalog::{CatalogError, MAX_SHAPE_EXTENT, Shape, ShapeCatalog, ShapeIndex};
pub use config::{ShapeDef, ShapesConfig};
