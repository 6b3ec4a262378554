#![allow(dead_code)]

use std::sync::Arc;

use isoworld_shapes::{ShapeCatalog, ShapeDef, ShapeIndex};
use isoworld_store::{SectionPaths, SectionStore};
use isoworld_view::Window;
use tempfile::TempDir;

pub const GROUND: ShapeIndex = 0;
pub const WALL: ShapeIndex = 1;
pub const DOOR: ShapeIndex = 2;
pub const ICE: ShapeIndex = 3;
pub const CRATE: ShapeIndex = 4;

pub fn catalog() -> Arc<ShapeCatalog> {
    Arc::new(
        ShapeCatalog::from_defs(vec![
            ShapeDef::new("ground", [1, 1, 1]),
            ShapeDef::new("wall", [1, 1, 4]),
            ShapeDef::new("door", [1, 1, 4]).path_through(),
            ShapeDef::new("ice", [1, 1, 1]).no_support(),
            ShapeDef::new("crate", [2, 2, 2]),
        ])
        .unwrap(),
    )
}

pub fn store(dir: &TempDir) -> SectionStore {
    let paths = SectionPaths::new(dir.path().join("game"), dir.path().join("user"));
    SectionStore::new(catalog(), paths)
}

/// A loaded window whose view coordinates equal world coordinates.
pub fn window() -> (TempDir, Window) {
    let dir = tempfile::tempdir().unwrap();
    let mut window = Window::new(store(&dir));
    assert!(window.move_to(48, 48));
    window.load().unwrap();
    (dir, window)
}
