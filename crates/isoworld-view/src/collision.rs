//! Box collision against the window.
//!
//! Footprints extend toward larger coordinates from their anchor cell, so any
//! cell whose box can reach a point lies within `SEARCH_SIZE` cells behind it.
//! Every query here is a bounded backward scan from the far corner of the
//! query box to `SEARCH_SIZE - 1` cells before its anchor.

use isoworld_geom::BoundingBox;
use isoworld_shapes::ShapeIndex;
use isoworld_store::StoreError;

use crate::window::{Cell, CellId, ViewPos, Window, WorldPos};
use crate::{SEARCH_SIZE, WINDOW_SIZE, WINDOW_Z};

/// Which occupied cells a blocker query ignores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockerFilter {
    /// The querying cell, so a shape never blocks itself.
    pub exclude: Option<CellId>,
    /// A pathfinding destination never blocks.
    pub destination: Option<CellId>,
    /// Treat `path_through` shapes (doors) as open.
    pub doors_open: bool,
}

impl BlockerFilter {
    pub fn excluding(id: CellId) -> Self {
        Self {
            exclude: Some(id),
            ..Self::default()
        }
    }
}

impl Window {
    /// Visits occupied cells in the `SEARCH_SIZE` cube ending at `origin`,
    /// stopping at the first one `pred` accepts.
    pub fn search(
        &self,
        origin: ViewPos,
        pred: impl FnMut(CellId, &Cell) -> bool,
    ) -> Option<CellId> {
        let reach = SEARCH_SIZE - 1;
        let lo = ViewPos::new(
            origin.x.saturating_sub(reach),
            origin.y.saturating_sub(reach),
            origin.z.saturating_sub(reach),
        );
        self.scan(origin, lo, pred)
    }

    /// Like `search`, but covers every anchor whose footprint could reach
    /// `query`, however large the query is.
    pub fn search_box(
        &self,
        query: &BoundingBox,
        pred: impl FnMut(CellId, &Cell) -> bool,
    ) -> Option<CellId> {
        if query.is_empty() {
            return None;
        }
        let reach = SEARCH_SIZE - 1;
        let hi = ViewPos::new(
            query.x.saturating_add(query.w - 1),
            query.y.saturating_add(query.h - 1),
            query.z.saturating_add(query.d - 1),
        );
        let lo = ViewPos::new(
            query.x.saturating_sub(reach),
            query.y.saturating_sub(reach),
            query.z.saturating_sub(reach),
        );
        self.scan(hi, lo, pred)
    }

    // Walks from `hi` down to `lo` inclusive, clipped to the window.
    fn scan(
        &self,
        hi: ViewPos,
        lo: ViewPos,
        mut pred: impl FnMut(CellId, &Cell) -> bool,
    ) -> Option<CellId> {
        let x_hi = hi.x.min(WINDOW_SIZE - 1);
        let y_hi = hi.y.min(WINDOW_SIZE - 1);
        let z_hi = hi.z.min(WINDOW_Z - 1);
        for x in (lo.x.max(0)..=x_hi).rev() {
            for y in (lo.y.max(0)..=y_hi).rev() {
                for z in (lo.z.max(0)..=z_hi).rev() {
                    let Some(id) = self.id(ViewPos::new(x, y, z)) else {
                        continue;
                    };
                    let cell = self.cell(id);
                    if cell.is_occupied() && pred(id, cell) {
                        return Some(id);
                    }
                }
            }
        }
        None
    }

    /// First occupied cell whose box intersects `footprint` placed at `at`.
    pub fn blocker_at(
        &self,
        at: ViewPos,
        footprint: BoundingBox,
        filter: &BlockerFilter,
    ) -> Option<CellId> {
        let query = footprint.at(at.x, at.y, at.z);
        self.search_box(&query, |id, cell| {
            if Some(id) == filter.exclude || Some(id) == filter.destination {
                return false;
            }
            if filter.doors_open && self.shape_flags(cell).1 {
                return false;
            }
            cell.bbox().intersects(&query)
        })
    }

    /// What would block the shape at `from` if it were moved to `to`.
    /// `None` when either point is out of view or `from` is empty.
    pub fn blocker(&self, to: WorldPos, from: WorldPos) -> Option<CellId> {
        let Some(src) = self.to_view(from).and_then(|v| self.id(v)) else {
            log::debug!("blocker: source {from:?} out of view");
            return None;
        };
        let cell = self.cell(src);
        if !cell.is_occupied() {
            log::debug!("blocker: source {from:?} is empty");
            return None;
        }
        let dest = self.to_view(to)?;
        self.blocker_at(dest, *cell.bbox(), &BlockerFilter::excluding(src))
    }

    /// Whether `shape` fits at `at` without touching anything.
    pub fn is_empty(&self, at: WorldPos, shape: ShapeIndex) -> bool {
        let Some(v) = self.to_view(at) else {
            return false;
        };
        let Some(shape) = self.catalog().get(shape) else {
            return false;
        };
        self.blocker_at(v, shape.footprint(), &BlockerFilter::default())
            .is_none()
    }

    /// Lowest z at which `shape` can rest on top of the column at `(wx, wy)`,
    /// ignoring anything anchored at or above `max_z`. `None` when the column
    /// is out of view or the shape is unknown.
    pub fn find_top(&self, wx: i32, wy: i32, shape: ShapeIndex) -> Option<i32> {
        let v = self.to_view(WorldPos::new(wx, wy, 0))?;
        let shape = self.catalog().get(shape)?;
        let max_z = self.max_z();
        for z in (0..max_z).rev() {
            let query = shape.footprint().at(v.x, v.y, z);
            let hit = self.search_box(&query, |_, cell| {
                cell.view().z < max_z && cell.bbox().intersects(&query)
            });
            if hit.is_some() {
                return Some(z + 1);
            }
        }
        Some(0)
    }

    /// Vertical movement rule: drop as far as possible, else move level, else
    /// step up one. `blocker` answers for a mover placed at a cell.
    pub fn resolve_move(
        &self,
        to: ViewPos,
        flying: bool,
        mut blocker: impl FnMut(ViewPos) -> Option<CellId>,
    ) -> Option<ViewPos> {
        let mut z = to.z;
        let mut standing_on = None;
        while z > 0 {
            standing_on = blocker(ViewPos::new(to.x, to.y, z - 1));
            if standing_on.is_some() {
                break;
            }
            z -= 1;
        }
        if let Some(below) = standing_on {
            if !flying && self.shape_flags(self.cell(below)).0 {
                return None;
            }
        }
        if z < to.z {
            return Some(ViewPos::new(to.x, to.y, z));
        }

        let Some(level) = blocker(to) else {
            return Some(to);
        };
        // Stepping up means standing on whatever blocks the level move.
        if !flying && self.shape_flags(self.cell(level)).0 {
            return None;
        }
        let up = ViewPos::new(to.x, to.y, to.z + 1);
        if up.z < WINDOW_Z && blocker(up).is_none() {
            return Some(up);
        }
        None
    }

    /// Moves the shape at `from` to `(to_x, to_y)`, settling it vertically.
    /// Returns the new z, or `None` if it does not fit there.
    pub fn move_shape(
        &mut self,
        from: WorldPos,
        to_x: i32,
        to_y: i32,
        flying: bool,
    ) -> Result<Option<i32>, StoreError> {
        let Some(src) = self.to_view(from).and_then(|v| self.id(v)) else {
            return Ok(None);
        };
        let Some(dest) = self.to_view(WorldPos::new(to_x, to_y, from.z)) else {
            return Ok(None);
        };
        let cell = self.cell(src);
        if !cell.is_occupied() {
            return Ok(None);
        }
        let footprint = *cell.bbox();
        let filter = BlockerFilter::excluding(src);
        let Some(landed) = self.resolve_move(dest, flying, |at| {
            self.blocker_at(at, footprint, &filter)
        }) else {
            return Ok(None);
        };

        if let Some(shape) = self.erase_shape_exact(from)? {
            self.set_shape(WorldPos::new(to_x, to_y, landed.z), shape)?;
        }
        Ok(Some(landed.z))
    }
}
