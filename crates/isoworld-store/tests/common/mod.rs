#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use isoworld_shapes::{ShapeCatalog, ShapeDef};
use isoworld_store::{SectionCoord, SectionObserver, SectionPaths, SectionStore};
use tempfile::TempDir;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Loaded(SectionCoord),
    Saved(SectionCoord),
}

#[derive(Clone, Default)]
pub struct Recorder(pub Rc<RefCell<Vec<Event>>>);

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl SectionObserver for Recorder {
    fn section_loaded(&mut self, coord: SectionCoord) {
        self.0.borrow_mut().push(Event::Loaded(coord));
    }

    fn section_saved(&mut self, coord: SectionCoord) {
        self.0.borrow_mut().push(Event::Saved(coord));
    }
}

pub fn catalog() -> Arc<ShapeCatalog> {
    Arc::new(
        ShapeCatalog::from_defs(vec![
            ShapeDef::new("ground", [1, 1, 1]),
            ShapeDef::new("wall", [1, 1, 4]),
            ShapeDef::new("grass.edge", [1, 1, 1]),
        ])
        .unwrap(),
    )
}

pub struct Fixture {
    pub dir: TempDir,
    pub recorder: Recorder,
    pub store: SectionStore,
}

pub fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let recorder = Recorder::default();
    let paths = SectionPaths::new(dir.path().join("game"), dir.path().join("user"));
    let store = SectionStore::with_observer(catalog(), paths, Box::new(recorder.clone()));
    Fixture {
        dir,
        recorder,
        store,
    }
}

/// A world coordinate inside the given section.
pub fn in_section(sx: i32, sy: i32) -> (i32, i32) {
    (sx * 200 + 7, sy * 200 + 11)
}
