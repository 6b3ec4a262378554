//! A* over the occupancy window.
//!
//! Movement is 4-directional in the plane; the z of each step comes from the
//! vertical movement rule in `collision`. The open list is a plain `Vec`
//! scanned for the lowest `f`, first minimum winning, which keeps route
//! choice stable among equal-cost paths.
//!
//! Scratch state lives in the `Pathfinder`, not the window, and is tagged with
//! a search generation so starting a search does not touch every node.

use isoworld_geom::BoundingBox;

use crate::collision::BlockerFilter;
use crate::window::{CellId, ViewPos, Window, WorldPos};
use crate::{WINDOW_SIZE, WINDOW_Z};

/// Z extent of the mover and goal boxes.
pub const MOVER_HEIGHT: i32 = 4;

pub type PathStep = WorldPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathRequest {
    pub start: WorldPos,
    pub end: WorldPos,
    pub flying: bool,
    /// Footprint width and depth of the mover, clamped to `1..=WINDOW_SIZE`
    /// when searching.
    pub start_radius: i32,
    /// Footprint width and depth of the goal; reaching any overlap counts.
    pub end_radius: i32,
}

impl PathRequest {
    pub fn new(start: WorldPos, end: WorldPos) -> Self {
        Self {
            start,
            end,
            flying: false,
            start_radius: 1,
            end_radius: 1,
        }
    }

    pub fn flying(mut self, flying: bool) -> Self {
        self.flying = flying;
        self
    }

    pub fn radii(mut self, start: i32, end: i32) -> Self {
        self.start_radius = start;
        self.end_radius = end;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct PathNode {
    generation: u32,
    f: i32,
    g: i32,
    h: i32,
    visited: bool,
    closed: bool,
    // Outer `None`: not computed yet this search.
    blocker: Option<Option<CellId>>,
    parent: Option<CellId>,
}

pub struct Pathfinder {
    nodes: Vec<PathNode>,
    generation: u32,
    mover_height: i32,
}

impl Default for Pathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder {
    pub fn new() -> Self {
        Self::with_mover_height(MOVER_HEIGHT)
    }

    pub fn with_mover_height(mover_height: i32) -> Self {
        let count = (WINDOW_SIZE * WINDOW_SIZE * WINDOW_Z) as usize;
        Self {
            nodes: vec![PathNode::default(); count],
            generation: 0,
            mover_height: mover_height.max(1),
        }
    }

    pub fn mover_height(&self) -> i32 {
        self.mover_height
    }

    /// Prefers a route with doors closed; falls back to opening them.
    ///
    /// `None` when either end is out of view or no route exists. An empty
    /// path means the mover already overlaps the goal.
    pub fn find_path(&mut self, window: &Window, req: &PathRequest) -> Option<Vec<PathStep>> {
        if let Some(path) = self.search(window, req, false) {
            return Some(path);
        }
        log::debug!("no path with doors closed, retrying with doors open");
        self.search(window, req, true)
    }

    /// A single A* pass.
    pub fn search(
        &mut self,
        window: &Window,
        req: &PathRequest,
        doors_open: bool,
    ) -> Option<Vec<PathStep>> {
        let start = window.to_view(req.start).and_then(|v| window.id(v))?;
        let end = window.to_view(req.end).and_then(|v| window.id(v))?;
        self.begin();

        // Footprints wider than the window can never fit in it.
        let start_radius = req.start_radius.clamp(1, WINDOW_SIZE);
        let end_radius = req.end_radius.clamp(1, WINDOW_SIZE);
        let mover = BoundingBox::sized(start_radius, start_radius, self.mover_height);
        let goal_view = window.view_pos(end);
        let goal = BoundingBox::sized(end_radius, end_radius, self.mover_height)
            .at(goal_view.x, goal_view.y, goal_view.z);
        let filter = BlockerFilter {
            exclude: Some(start),
            destination: Some(end),
            doors_open,
        };

        let mut open = vec![start];
        self.node_mut(start).visited = true;
        while !open.is_empty() {
            let mut low = 0;
            for (i, &id) in open.iter().enumerate() {
                if self.node(id).f < self.node(open[low]).f {
                    low = i;
                }
            }
            let current = open[low];
            let cv = window.view_pos(current);
            if mover.at(cv.x, cv.y, cv.z).intersects(&goal) {
                return Some(self.reconstruct(window, current));
            }
            open.swap_remove(low);
            self.node_mut(current).closed = true;

            let g = self.node(current).g + 1;
            for (dx, dy) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
                let to = ViewPos::new(cv.x + dx, cv.y + dy, cv.z);
                if !to.is_valid() {
                    continue;
                }
                let Some(next) = self.step(window, to, req.flying, mover, &filter) else {
                    continue;
                };
                let node = self.node_mut(next);
                if node.closed {
                    continue;
                }
                let best = if !node.visited {
                    node.visited = true;
                    node.h = heuristic(window.view_pos(next), start_radius, goal_view, end_radius);
                    open.push(next);
                    true
                } else {
                    g < node.g
                };
                if best {
                    node.parent = Some(current);
                    node.g = g;
                    node.f = g + node.h;
                }
            }
        }
        None
    }

    fn step(
        &mut self,
        window: &Window,
        to: ViewPos,
        flying: bool,
        mover: BoundingBox,
        filter: &BlockerFilter,
    ) -> Option<CellId> {
        let landed = window.resolve_move(to, flying, |at| {
            let id = window.id(at)?;
            let node = self.node_mut(id);
            if let Some(cached) = node.blocker {
                return cached;
            }
            let found = window.blocker_at(at, mover, filter);
            self.node_mut(id).blocker = Some(found);
            found
        })?;
        window.id(landed)
    }

    fn reconstruct(&self, window: &Window, mut current: CellId) -> Vec<PathStep> {
        let mut steps = Vec::new();
        while let Some(parent) = self.node(current).parent {
            steps.push(window.world_pos(current));
            current = parent;
        }
        steps.reverse();
        steps
    }

    fn begin(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            // Wrapped: stale tags could alias the new generation.
            self.nodes.fill(PathNode::default());
            self.generation = 1;
        }
    }

    fn node(&self, id: CellId) -> PathNode {
        let node = self.nodes[id.index()];
        if node.generation == self.generation {
            node
        } else {
            PathNode::default()
        }
    }

    fn node_mut(&mut self, id: CellId) -> &mut PathNode {
        let generation = self.generation;
        let node = &mut self.nodes[id.index()];
        if node.generation != generation {
            *node = PathNode {
                generation,
                ..PathNode::default()
            };
        }
        node
    }
}

/// Manhattan distance between approximate footprint centers.
fn heuristic(from: ViewPos, from_w: i32, goal: ViewPos, goal_w: i32) -> i32 {
    (goal.x + goal_w / 2 - (from.x + from_w / 2)).abs()
        + (goal.y + goal_w / 2 - (from.y + from_w / 2)).abs()
        + (goal.z - from.z).abs()
}
