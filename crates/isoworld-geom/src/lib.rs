//! Integer grid geometry shared by the store and view crates.
#![forbid(unsafe_code)]

/// Axis-aligned box on the cell grid.
///
/// The anchor `(x, y, z)` is the box's minimum corner; the box covers the
/// half-open ranges `[x, x + w)`, `[y, y + h)`, `[z, z + d)`. A box with any
/// zero extent covers nothing and intersects nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub w: i32,
    pub h: i32,
    pub d: i32,
}

impl BoundingBox {
    pub const EMPTY: BoundingBox = BoundingBox {
        x: 0,
        y: 0,
        z: 0,
        w: 0,
        h: 0,
        d: 0,
    };

    #[inline]
    pub const fn new(x: i32, y: i32, z: i32, w: i32, h: i32, d: i32) -> Self {
        Self { x, y, z, w, h, d }
    }

    /// A box of the given extents anchored at the origin.
    #[inline]
    pub const fn sized(w: i32, h: i32, d: i32) -> Self {
        Self::new(0, 0, 0, w, h, d)
    }

    #[inline]
    pub fn set_pos(&mut self, x: i32, y: i32, z: i32) {
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// Copy of this box moved to a new anchor.
    #[inline]
    pub fn at(self, x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z, ..self }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0 || self.d <= 0
    }

    /// Far corner, inclusive. Only meaningful for non-empty boxes.
    #[inline]
    pub fn max_cell(&self) -> (i32, i32, i32) {
        (self.x + self.w - 1, self.y + self.h - 1, self.z + self.d - 1)
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32, z: i32) -> bool {
        x >= self.x
            && x < self.x + self.w
            && y >= self.y
            && y < self.y + self.h
            && z >= self.z
            && z < self.z + self.d
    }

    #[inline]
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
            && self.z < other.z + other.d
            && other.z < self.z + self.d
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn at_keeps_extents(b: BoundingBox, x in -500i32..500, y in -500i32..500, z in -500i32..500) {
            let moved = b.at(x, y, z);
            prop_assert_eq!((moved.w, moved.h, moved.d), (b.w, b.h, b.d));
            prop_assert_eq!((moved.x, moved.y, moved.z), (x, y, z));
        }
    }

    #[test]
    fn set_pos_then_restore() {
        let mut b = BoundingBox::new(3, 4, 5, 2, 2, 4);
        let saved = (b.x, b.y, b.z);
        b.set_pos(10, 10, 0);
        assert!(b.contains(11, 11, 3));
        b.set_pos(saved.0, saved.1, saved.2);
        assert_eq!(b, BoundingBox::new(3, 4, 5, 2, 2, 4));
    }

    #[test]
    fn empty_box_contains_nothing() {
        assert!(!BoundingBox::EMPTY.contains(0, 0, 0));
        assert!(!BoundingBox::EMPTY.intersects(&BoundingBox::EMPTY));
    }
}
