use std::sync::Arc;

use isoworld_geom::BoundingBox;
use isoworld_shapes::{ShapeCatalog, ShapeIndex};
use isoworld_store::{CellAddr, Position, SectionCoord, SectionStore, StoreError};

use crate::{WINDOW_SIZE, WINDOW_Z};

const CELL_COUNT: usize = (WINDOW_SIZE * WINDOW_SIZE * WINDOW_Z) as usize;
const COLUMN_COUNT: usize = (WINDOW_SIZE * WINDOW_SIZE) as usize;

/// Initial focal point, before the game recenters the window.
pub const DEFAULT_FOCUS: (i32, i32) = (5000, 5000);

/// Largest focus coordinate whose whole window stays inside `i32`.
pub const MAX_FOCUS: i32 = i32::MAX - WINDOW_SIZE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorldPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl WorldPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl From<(i32, i32, i32)> for WorldPos {
    fn from(v: (i32, i32, i32)) -> Self {
        Self::new(v.0, v.1, v.2)
    }
}

/// Window-local coordinates: x, y in `[0, WINDOW_SIZE)`, z in `[0, WINDOW_Z)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ViewPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl ViewPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.x >= 0
            && self.x < WINDOW_SIZE
            && self.y >= 0
            && self.y < WINDOW_SIZE
            && self.z >= 0
            && self.z < WINDOW_Z
    }
}

/// Dense index of a window cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId(u32);

impl CellId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) fn from_index(index: usize) -> Self {
        CellId(index as u32)
    }

    #[inline]
    pub(crate) fn from_view(v: ViewPos) -> Self {
        CellId(((v.x * WINDOW_SIZE + v.y) * WINDOW_Z + v.z) as u32)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Cell {
    view: ViewPos,
    backing: Option<CellAddr>,
    position: Position,
    bbox: BoundingBox,
}

impl Cell {
    #[inline]
    pub fn view(&self) -> ViewPos {
        self.view
    }

    /// Section and local offset this cell mirrors, as of the last refresh.
    #[inline]
    pub fn backing(&self) -> Option<CellAddr> {
        self.backing
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn shape(&self) -> Option<ShapeIndex> {
        self.position.shape()
    }

    #[inline]
    pub fn is_occupied(&self) -> bool {
        !self.position.is_empty()
    }

    /// Footprint of the shape anchored here; empty when the cell is.
    #[inline]
    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

/// Occupied cell covering a queried point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShapeHit {
    pub shape: ShapeIndex,
    pub origin: WorldPos,
    pub cell: CellId,
}

/// Fixed 96x96x24 mirror of the store around a moving focal point.
pub struct Window {
    store: SectionStore,
    catalog: Arc<ShapeCatalog>,
    focus: (i32, i32),
    max_z: i32,
    cells: Vec<Cell>,
    edges: Vec<Position>,
}

impl Window {
    /// The window shares the store's shape catalog.
    pub fn new(store: SectionStore) -> Self {
        let catalog = Arc::clone(store.catalog());
        let mut cells = vec![Cell::default(); CELL_COUNT];
        for x in 0..WINDOW_SIZE {
            for y in 0..WINDOW_SIZE {
                for z in 0..WINDOW_Z {
                    let v = ViewPos::new(x, y, z);
                    cells[CellId::from_view(v).index()].view = v;
                }
            }
        }
        Self {
            store,
            catalog,
            focus: DEFAULT_FOCUS,
            max_z: WINDOW_Z,
            cells,
            edges: vec![Position::EMPTY; COLUMN_COUNT],
        }
    }

    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SectionStore {
        &mut self.store
    }

    pub fn into_store(self) -> SectionStore {
        self.store
    }

    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    #[inline]
    pub fn focus(&self) -> (i32, i32) {
        self.focus
    }

    /// Section containing the focal point.
    pub fn section_pos(&self) -> SectionCoord {
        SectionCoord::from_world(self.focus.0, self.focus.1)
    }

    /// Moves the focal point. Returns whether it changed, in which case the
    /// caller must `load()` before querying. Coordinates outside
    /// `0..=MAX_FOCUS` are ignored.
    pub fn move_to(&mut self, wx: i32, wy: i32) -> bool {
        let range = 0..=MAX_FOCUS;
        if range.contains(&wx) && range.contains(&wy) && self.focus != (wx, wy) {
            self.focus = (wx, wy);
            return true;
        }
        false
    }

    pub fn max_z(&self) -> i32 {
        self.max_z
    }

    pub fn set_max_z(&mut self, z: i32) {
        self.max_z = z.clamp(0, WINDOW_Z);
    }

    /// Refreshes every cell and edge from the store around the current focus.
    pub fn load(&mut self) -> Result<(), StoreError> {
        log::debug!("loading window around {:?}", self.focus);
        for x in 0..WINDOW_SIZE {
            for y in 0..WINDOW_SIZE {
                let w = self.to_world(ViewPos::new(x, y, 0));
                self.edges[(x * WINDOW_SIZE + y) as usize] = self.store.edge_position(w.x, w.y)?;
                for z in 0..WINDOW_Z {
                    self.refresh(ViewPos::new(x, y, z))?;
                }
            }
        }
        Ok(())
    }

    fn refresh(&mut self, v: ViewPos) -> Result<(), StoreError> {
        let w = self.to_world(v);
        let position = self.store.position(w.x, w.y, w.z)?;
        let bbox = match position.shape() {
            Some(shape) => match self.catalog.get(shape) {
                Some(s) => s.footprint().at(v.x, v.y, v.z),
                None => BoundingBox::new(v.x, v.y, v.z, 1, 1, 1),
            },
            None => BoundingBox::EMPTY,
        };
        let cell = &mut self.cells[CellId::from_view(v).index()];
        cell.backing = CellAddr::locate(w.x, w.y, w.z);
        cell.position = position;
        cell.bbox = bbox;
        Ok(())
    }

    /// Number of window cells holding a shape anchor.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied()).count()
    }

    /// World coordinates of a cell; `v` is expected to lie in the window.
    #[inline]
    pub fn to_world(&self, v: ViewPos) -> WorldPos {
        let half = WINDOW_SIZE / 2;
        WorldPos::new(v.x + self.focus.0 - half, v.y + self.focus.1 - half, v.z)
    }

    /// Window coordinates for a world point, or `None` outside the window.
    #[inline]
    pub fn to_view(&self, w: WorldPos) -> Option<ViewPos> {
        let half = WINDOW_SIZE / 2;
        let x = w.x.checked_sub(self.focus.0 - half)?;
        let y = w.y.checked_sub(self.focus.1 - half)?;
        let v = ViewPos::new(x, y, w.z);
        v.is_valid().then_some(v)
    }

    pub fn in_view(&self, w: WorldPos) -> bool {
        self.to_view(w).is_some()
    }

    #[inline]
    pub fn id(&self, v: ViewPos) -> Option<CellId> {
        v.is_valid().then(|| CellId::from_view(v))
    }

    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    pub fn cell_at(&self, v: ViewPos) -> Option<&Cell> {
        self.id(v).map(|id| self.cell(id))
    }

    #[inline]
    pub fn view_pos(&self, id: CellId) -> ViewPos {
        self.cells[id.index()].view
    }

    pub fn world_pos(&self, id: CellId) -> WorldPos {
        self.to_world(self.view_pos(id))
    }

    pub(crate) fn shape_flags(&self, cell: &Cell) -> (bool, bool) {
        cell.shape()
            .and_then(|s| self.catalog.get(s))
            .map(|s| (s.no_support, s.path_through))
            .unwrap_or((false, false))
    }

    /// Writes through to the store, then refreshes the cell so same-frame
    /// queries see the change.
    pub fn set_shape(&mut self, w: WorldPos, shape: ShapeIndex) -> Result<bool, StoreError> {
        if !self.store.set_shape(w.x, w.y, w.z, shape)? {
            return Ok(false);
        }
        if let Some(v) = self.to_view(w) {
            self.refresh(v)?;
        }
        Ok(true)
    }

    /// Erases the shape anchored exactly at `w`, if it is in view.
    pub fn erase_shape_exact(&mut self, w: WorldPos) -> Result<Option<ShapeIndex>, StoreError> {
        let Some(v) = self.to_view(w) else {
            return Ok(None);
        };
        let Some(shape) = self.cell(CellId::from_view(v)).shape() else {
            return Ok(None);
        };
        self.store.erase_shape(w.x, w.y, w.z)?;
        self.refresh(v)?;
        Ok(Some(shape))
    }

    /// Erases whichever shape covers `w`. Outside the window the point is
    /// assumed to be the shape's origin and is cleared in the store directly.
    pub fn erase_shape(&mut self, w: WorldPos) -> Result<Option<ShapeIndex>, StoreError> {
        if let Some(hit) = self.shape_at(w) {
            self.store.erase_shape(hit.origin.x, hit.origin.y, hit.origin.z)?;
            self.refresh(self.view_pos(hit.cell))?;
            return Ok(Some(hit.shape));
        }
        if !self.in_view(w) {
            let shape = self.store.get_shape(w.x, w.y, w.z)?;
            self.store.erase_shape(w.x, w.y, w.z)?;
            return Ok(shape);
        }
        Ok(None)
    }

    /// The occupied cell whose footprint contains `w`.
    pub fn shape_at(&self, w: WorldPos) -> Option<ShapeHit> {
        let v = self.to_view(w)?;
        let id = self.search(v, |_, cell| cell.bbox().contains(v.x, v.y, v.z))?;
        let cell = self.cell(id);
        Some(ShapeHit {
            shape: cell.shape()?,
            origin: self.to_world(cell.view()),
            cell: id,
        })
    }

    pub fn edge(&self, w: WorldPos) -> Option<ShapeIndex> {
        let v = self.to_view(WorldPos::new(w.x, w.y, 0))?;
        self.edges[(v.x * WINDOW_SIZE + v.y) as usize].shape()
    }

    pub fn set_edge(&mut self, wx: i32, wy: i32, shape: ShapeIndex) -> Result<bool, StoreError> {
        if !self.store.set_edge(wx, wy, shape)? {
            return Ok(false);
        }
        self.refresh_edge(wx, wy)?;
        Ok(true)
    }

    pub fn clear_edge(&mut self, wx: i32, wy: i32) -> Result<bool, StoreError> {
        let had = self.store.clear_edge(wx, wy)?;
        self.refresh_edge(wx, wy)?;
        Ok(had)
    }

    fn refresh_edge(&mut self, wx: i32, wy: i32) -> Result<(), StoreError> {
        if let Some(v) = self.to_view(WorldPos::new(wx, wy, 0)) {
            self.edges[(v.x * WINDOW_SIZE + v.y) as usize] = self.store.edge_position(wx, wy)?;
        }
        Ok(())
    }

    /// Saves all resident sections.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        self.store.flush_all()
    }
}
