use std::fmt;

use crate::{SECTION_SIZE, SECTION_Z_SIZE};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SectionCoord {
    pub sx: i32,
    pub sy: i32,
}

impl SectionCoord {
    #[inline]
    pub const fn new(sx: i32, sy: i32) -> Self {
        Self { sx, sy }
    }

    /// Section containing a world column (floor division).
    #[inline]
    pub fn from_world(wx: i32, wy: i32) -> Self {
        let size = SECTION_SIZE as i32;
        Self {
            sx: wx.div_euclid(size),
            sy: wy.div_euclid(size),
        }
    }

    /// World coordinates of the section's (0, 0) cell.
    #[inline]
    pub fn origin(self) -> (i32, i32) {
        let size = SECTION_SIZE as i32;
        (self.sx * size, self.sy * size)
    }

    /// File name for the section's persisted data: both coordinates as
    /// 8-digit two's-complement hex, so every section maps to its own file.
    pub fn file_name(self) -> String {
        format!("map{:08x}{:08x}", self.sx as u32, self.sy as u32)
    }
}

impl fmt::Display for SectionCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.sx, self.sy)
    }
}

impl From<(i32, i32)> for SectionCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

/// A world cell resolved to its owning section and local offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellAddr {
    pub section: SectionCoord,
    pub lx: usize,
    pub ly: usize,
    pub lz: usize,
}

impl CellAddr {
    /// `None` when `wz` is outside the section's vertical range.
    #[inline]
    pub fn locate(wx: i32, wy: i32, wz: i32) -> Option<Self> {
        if wz < 0 || wz as usize >= SECTION_Z_SIZE {
            return None;
        }
        let size = SECTION_SIZE as i32;
        Some(Self {
            section: SectionCoord::from_world(wx, wy),
            lx: wx.rem_euclid(size) as usize,
            ly: wy.rem_euclid(size) as usize,
            lz: wz as usize,
        })
    }

    /// Edge overlay address; the overlay has no z.
    #[inline]
    pub fn locate_column(wx: i32, wy: i32) -> Self {
        let size = SECTION_SIZE as i32;
        Self {
            section: SectionCoord::from_world(wx, wy),
            lx: wx.rem_euclid(size) as usize,
            ly: wy.rem_euclid(size) as usize,
            lz: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_world_coords_floor() {
        assert_eq!(SectionCoord::from_world(-1, 0), SectionCoord::new(-1, 0));
        assert_eq!(SectionCoord::from_world(-200, -201), SectionCoord::new(-1, -2));
        let addr = CellAddr::locate(-1, 5, 0).unwrap();
        assert_eq!((addr.lx, addr.ly), (199, 5));
    }

    #[test]
    fn file_name_is_fixed_width_hex() {
        assert_eq!(SectionCoord::new(25, 25).file_name(), "map0000001900000019");
        assert_eq!(SectionCoord::new(0, 10).file_name(), "map000000000000000a");
        assert_eq!(SectionCoord::new(-1, 0).file_name(), "mapffffffff00000000");
    }

    #[test]
    fn file_names_never_collide_past_two_digits() {
        let a = SectionCoord::new(0x123, 0x45);
        let b = SectionCoord::new(0x12, 0x345);
        assert_ne!(a.file_name(), b.file_name());
        assert_ne!(
            SectionCoord::new(-1, 1).file_name(),
            SectionCoord::new(1, -1).file_name()
        );
        assert_eq!(a.file_name().len(), b.file_name().len());
    }

    #[test]
    fn z_outside_section_is_rejected() {
        assert!(CellAddr::locate(0, 0, -1).is_none());
        assert!(CellAddr::locate(0, 0, SECTION_Z_SIZE as i32).is_none());
        assert!(CellAddr::locate(0, 0, SECTION_Z_SIZE as i32 - 1).is_some());
    }
}
