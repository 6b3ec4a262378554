use isoworld_shapes::ShapeIndex;
use serde::{Deserialize, Serialize};

use crate::coord::SectionCoord;
use crate::{SECTION_SIZE, SECTION_Z_SIZE};

/// One cell's content: 0 is empty, otherwise `shape index + 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(u16);

impl Position {
    pub const EMPTY: Position = Position(0);

    #[inline]
    pub const fn from_shape(index: ShapeIndex) -> Self {
        Position(index + 1)
    }

    #[inline]
    pub const fn from_raw(raw: u16) -> Self {
        Position(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn shape(self) -> Option<ShapeIndex> {
        if self.0 == 0 { None } else { Some(self.0 - 1) }
    }
}

/// Dense occupancy grid plus ground-edge overlay for one section.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    coord: SectionCoord,
    positions: Vec<Position>,
    edges: Vec<Position>,
}

impl Section {
    pub const VOLUME: usize = SECTION_SIZE * SECTION_SIZE * SECTION_Z_SIZE;
    pub const AREA: usize = SECTION_SIZE * SECTION_SIZE;

    pub fn empty(coord: SectionCoord) -> Self {
        Self {
            coord,
            positions: vec![Position::EMPTY; Self::VOLUME],
            edges: vec![Position::EMPTY; Self::AREA],
        }
    }

    /// Build from decoded layers; `None` if either layer has the wrong length.
    pub fn from_layers(
        coord: SectionCoord,
        positions: Vec<Position>,
        edges: Vec<Position>,
    ) -> Option<Self> {
        if positions.len() != Self::VOLUME || edges.len() != Self::AREA {
            return None;
        }
        Some(Self {
            coord,
            positions,
            edges,
        })
    }

    #[inline]
    pub fn coord(&self) -> SectionCoord {
        self.coord
    }

    #[inline]
    pub fn idx(x: usize, y: usize, z: usize) -> usize {
        (x * SECTION_SIZE + y) * SECTION_Z_SIZE + z
    }

    #[inline]
    pub fn edge_idx(x: usize, y: usize) -> usize {
        x * SECTION_SIZE + y
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Position {
        self.positions[Self::idx(x, y, z)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, pos: Position) {
        let i = Self::idx(x, y, z);
        self.positions[i] = pos;
    }

    #[inline]
    pub fn edge(&self, x: usize, y: usize) -> Position {
        self.edges[Self::edge_idx(x, y)]
    }

    #[inline]
    pub fn set_edge(&mut self, x: usize, y: usize, pos: Position) {
        let i = Self::edge_idx(x, y);
        self.edges[i] = pos;
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn edges(&self) -> &[Position] {
        &self.edges
    }

    pub fn occupied_count(&self) -> usize {
        self.positions.iter().filter(|p| !p.is_empty()).count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|p| !p.is_empty()).count()
    }

    #[inline]
    pub fn is_all_empty(&self) -> bool {
        self.occupied_count() == 0 && self.edge_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_offsets_shape_index() {
        assert_eq!(Position::EMPTY.shape(), None);
        assert_eq!(Position::from_shape(0).raw(), 1);
        assert_eq!(Position::from_shape(7).shape(), Some(7));
    }

    #[test]
    fn idx_is_unique_over_section() {
        let mut seen = vec![false; Section::VOLUME];
        for x in 0..SECTION_SIZE {
            for y in 0..SECTION_SIZE {
                for z in 0..SECTION_Z_SIZE {
                    let i = Section::idx(x, y, z);
                    assert!(!seen[i]);
                    seen[i] = true;
                }
            }
        }
        assert!(seen.into_iter().all(|b| b));
    }

    #[test]
    fn from_layers_checks_lengths() {
        let c = SectionCoord::new(1, 2);
        assert!(Section::from_layers(c, vec![Position::EMPTY; 3], vec![]).is_none());
        let s = Section::from_layers(
            c,
            vec![Position::EMPTY; Section::VOLUME],
            vec![Position::EMPTY; Section::AREA],
        )
        .unwrap();
        assert!(s.is_all_empty());
        assert_eq!(s.coord(), c);
    }
}
