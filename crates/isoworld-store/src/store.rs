use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use isoworld_shapes::{ShapeCatalog, ShapeIndex};
use serde::Deserialize;

use crate::codec::{self, FORMAT_VERSION};
use crate::coord::{CellAddr, SectionCoord};
use crate::error::StoreError;
use crate::observer::{NoopObserver, SectionObserver};
use crate::section::{Position, Section};

/// Number of sections kept resident.
pub const CACHE_SLOTS: usize = 4;

/// Where section files are read from and written to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IoMode {
    /// Always the asset directory.
    #[default]
    Editor,
    /// Per-user saves, falling back to the asset directory for reads.
    Play,
}

#[derive(Clone, Debug)]
pub struct SectionPaths {
    pub game_dir: PathBuf,
    pub user_dir: PathBuf,
}

impl SectionPaths {
    pub fn new(game_dir: impl Into<PathBuf>, user_dir: impl Into<PathBuf>) -> Self {
        Self {
            game_dir: game_dir.into(),
            user_dir: user_dir.into(),
        }
    }

    fn asset_path(&self, coord: SectionCoord) -> PathBuf {
        self.game_dir.join("maps").join(coord.file_name())
    }

    fn user_path(&self, coord: SectionCoord) -> PathBuf {
        self.user_dir.join(coord.file_name())
    }

    pub fn read_path(&self, mode: IoMode, coord: SectionCoord) -> PathBuf {
        match mode {
            IoMode::Editor => self.asset_path(coord),
            IoMode::Play => {
                let user = self.user_path(coord);
                if user.exists() {
                    user
                } else {
                    self.asset_path(coord)
                }
            }
        }
    }

    pub fn write_path(&self, mode: IoMode, coord: SectionCoord) -> PathBuf {
        match mode {
            IoMode::Editor => self.asset_path(coord),
            IoMode::Play => self.user_path(coord),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionStoreStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub resident: usize,
}

struct Slot {
    section: Box<Section>,
    stamp: u64,
}

/// Fixed-capacity LRU cache of sections with synchronous load and save.
pub struct SectionStore {
    // Filled in order up to CACHE_SLOTS, then entries are replaced in place.
    slots: Vec<Slot>,
    // Access counter used as the LRU timestamp.
    clock: u64,
    paths: SectionPaths,
    mode: IoMode,
    catalog: Arc<ShapeCatalog>,
    observer: Box<dyn SectionObserver>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl SectionStore {
    pub fn new(catalog: Arc<ShapeCatalog>, paths: SectionPaths) -> Self {
        Self::with_observer(catalog, paths, Box::new(NoopObserver))
    }

    pub fn with_observer(
        catalog: Arc<ShapeCatalog>,
        paths: SectionPaths,
        observer: Box<dyn SectionObserver>,
    ) -> Self {
        Self {
            slots: Vec::with_capacity(CACHE_SLOTS),
            clock: 0,
            paths,
            mode: IoMode::default(),
            catalog,
            observer,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    pub fn set_io_mode(&mut self, mode: IoMode) {
        self.mode = mode;
    }

    pub fn io_mode(&self) -> IoMode {
        self.mode
    }

    pub fn paths(&self) -> &SectionPaths {
        &self.paths
    }

    pub fn catalog(&self) -> &Arc<ShapeCatalog> {
        &self.catalog
    }

    pub fn stats(&self) -> SectionStoreStats {
        SectionStoreStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            resident: self.slots.len(),
        }
    }

    /// Coordinates of resident sections, in slot order.
    pub fn resident(&self) -> Vec<SectionCoord> {
        self.slots.iter().map(|s| s.section.coord()).collect()
    }

    pub fn is_resident(&self, coord: SectionCoord) -> bool {
        self.find_slot(coord).is_some()
    }

    /// Raw cell content; out-of-range z reads as empty without touching disk.
    pub fn position(&mut self, wx: i32, wy: i32, wz: i32) -> Result<Position, StoreError> {
        let Some(addr) = CellAddr::locate(wx, wy, wz) else {
            return Ok(Position::EMPTY);
        };
        let section = self.ensure_section(addr.section)?;
        Ok(section.get(addr.lx, addr.ly, addr.lz))
    }

    pub fn get_shape(&mut self, wx: i32, wy: i32, wz: i32) -> Result<Option<ShapeIndex>, StoreError> {
        Ok(self.position(wx, wy, wz)?.shape())
    }

    /// Returns `false` (and writes nothing) for an unknown shape or a z outside
    /// the section.
    pub fn set_shape(
        &mut self,
        wx: i32,
        wy: i32,
        wz: i32,
        shape: ShapeIndex,
    ) -> Result<bool, StoreError> {
        if !self.catalog.contains(shape) {
            log::warn!("set_shape: unknown shape index {shape}");
            return Ok(false);
        }
        let Some(addr) = CellAddr::locate(wx, wy, wz) else {
            return Ok(false);
        };
        let section = self.ensure_section(addr.section)?;
        section.set(addr.lx, addr.ly, addr.lz, Position::from_shape(shape));
        Ok(true)
    }

    /// Clears the cell; reports whether anything was there.
    pub fn erase_shape(&mut self, wx: i32, wy: i32, wz: i32) -> Result<bool, StoreError> {
        let Some(addr) = CellAddr::locate(wx, wy, wz) else {
            return Ok(false);
        };
        let section = self.ensure_section(addr.section)?;
        if section.get(addr.lx, addr.ly, addr.lz).is_empty() {
            return Ok(false);
        }
        section.set(addr.lx, addr.ly, addr.lz, Position::EMPTY);
        Ok(true)
    }

    pub fn edge_position(&mut self, wx: i32, wy: i32) -> Result<Position, StoreError> {
        let addr = CellAddr::locate_column(wx, wy);
        let section = self.ensure_section(addr.section)?;
        Ok(section.edge(addr.lx, addr.ly))
    }

    pub fn get_edge(&mut self, wx: i32, wy: i32) -> Result<Option<ShapeIndex>, StoreError> {
        Ok(self.edge_position(wx, wy)?.shape())
    }

    pub fn set_edge(&mut self, wx: i32, wy: i32, shape: ShapeIndex) -> Result<bool, StoreError> {
        if !self.catalog.contains(shape) {
            log::warn!("set_edge: unknown shape index {shape}");
            return Ok(false);
        }
        let addr = CellAddr::locate_column(wx, wy);
        let section = self.ensure_section(addr.section)?;
        section.set_edge(addr.lx, addr.ly, Position::from_shape(shape));
        Ok(true)
    }

    pub fn clear_edge(&mut self, wx: i32, wy: i32) -> Result<bool, StoreError> {
        let addr = CellAddr::locate_column(wx, wy);
        let section = self.ensure_section(addr.section)?;
        let had = !section.edge(addr.lx, addr.ly).is_empty();
        section.set_edge(addr.lx, addr.ly, Position::EMPTY);
        Ok(had)
    }

    /// Resident section for `coord`, loading (and possibly evicting) as needed.
    pub fn section(&mut self, coord: SectionCoord) -> Result<&Section, StoreError> {
        self.ensure_section(coord).map(|s| &*s)
    }

    /// Saves every resident section without evicting any.
    pub fn flush_all(&mut self) -> Result<(), StoreError> {
        for slot in &self.slots {
            save_section(&self.paths, self.mode, &slot.section)?;
        }
        Ok(())
    }

    fn find_slot(&self, coord: SectionCoord) -> Option<usize> {
        self.slots.iter().position(|s| s.section.coord() == coord)
    }

    pub(crate) fn ensure_section(&mut self, coord: SectionCoord) -> Result<&mut Section, StoreError> {
        self.clock += 1;
        let stamp = self.clock;

        let i = match self.find_slot(coord) {
            Some(i) => {
                self.hits += 1;
                i
            }
            None => {
                self.misses += 1;
                self.fill_slot(coord)?
            }
        };
        let slot = &mut self.slots[i];
        slot.stamp = stamp;
        Ok(&mut *slot.section)
    }

    /// Loads `coord` into a free slot, or over the least recently used one
    /// after saving it. Returns the slot index.
    fn fill_slot(&mut self, coord: SectionCoord) -> Result<usize, StoreError> {
        if self.slots.len() < CACHE_SLOTS {
            let loaded = load_section(&self.paths, self.mode, coord)?;
            self.observer.section_loaded(coord);
            self.slots.push(Slot {
                section: Box::new(loaded),
                stamp: 0,
            });
            return Ok(self.slots.len() - 1);
        }

        // Stamps are unique, so the minimum is unambiguous.
        let victim = self
            .slots
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| s.stamp)
            .map(|(i, _)| i)
            .unwrap_or(0);
        let old_coord = self.slots[victim].section.coord();
        log::info!("evicting section {old_coord} for {coord}");
        save_section(&self.paths, self.mode, &self.slots[victim].section)?;
        self.evictions += 1;
        self.observer.section_saved(old_coord);

        let loaded = load_section(&self.paths, self.mode, coord)?;
        self.observer.section_loaded(coord);
        self.slots[victim].section = Box::new(loaded);
        Ok(victim)
    }
}

fn load_section(paths: &SectionPaths, mode: IoMode, coord: SectionCoord) -> Result<Section, StoreError> {
    let path = paths.read_path(mode, coord);
    log::debug!("looking for section {coord} at {}", path.display());
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Section::empty(coord)),
        Err(source) => return Err(StoreError::Io { path, source }),
    };
    let start = Instant::now();
    let decoded = codec::decode(BufReader::new(file), coord)
        .map_err(|source| StoreError::Decode { path: path.clone(), source })?;
    if decoded.version != FORMAT_VERSION {
        log::warn!(
            "section {coord} at {} has format version {}, current is {}; decoding as-is",
            path.display(),
            decoded.version,
            FORMAT_VERSION
        );
    }
    log::debug!(
        "loaded section {coord} from {} (v{}) in {:?}",
        path.display(),
        decoded.version,
        start.elapsed()
    );
    Ok(decoded.section)
}

fn save_section(paths: &SectionPaths, mode: IoMode, section: &Section) -> Result<(), StoreError> {
    let path = paths.write_path(mode, section.coord());
    let start = Instant::now();
    if let Some(parent) = path.parent() {
        create_dir(parent)?;
    }
    let file = File::create(&path).map_err(|source| StoreError::Io {
        path: path.clone(),
        source,
    })?;
    codec::encode(BufWriter::new(file), section).map_err(|source| match source {
        codec::CodecError::Io(source) => StoreError::Io {
            path: path.clone(),
            source,
        },
        other => StoreError::Encode {
            path: path.clone(),
            source: other,
        },
    })?;
    log::debug!(
        "wrote section {} to {} in {:?}",
        section.coord(),
        path.display(),
        start.elapsed()
    );
    Ok(())
}

fn create_dir(dir: &Path) -> Result<(), StoreError> {
    fs::create_dir_all(dir).map_err(|source| StoreError::Io {
        path: dir.to_path_buf(),
        source,
    })
}
