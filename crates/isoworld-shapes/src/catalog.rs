use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use isoworld_geom::BoundingBox;
use thiserror::Error;

use crate::config::{ShapeDef, ShapesConfig};

/// Index into the catalog. Stored cells hold `index + 1` so that 0 means empty.
pub type ShapeIndex = u16;

/// Collision footprints are searched in a 16-cell cube, so no shape may be
/// larger than that along any axis.
pub const MAX_SHAPE_EXTENT: i32 = 16;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read shape catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse shape catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("duplicate shape name '{0}'")]
    DuplicateName(String),
    #[error("shape '{name}' has invalid size {size:?}")]
    InvalidSize { name: String, size: [i32; 3] },
    #[error("too many shapes ({0})")]
    TooMany(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shape {
    pub index: ShapeIndex,
    pub name: String,
    pub size: [i32; 3],
    pub no_support: bool,
    pub path_through: bool,
}

impl Shape {
    /// Footprint box anchored at the origin.
    #[inline]
    pub fn footprint(&self) -> BoundingBox {
        BoundingBox::sized(self.size[0], self.size[1], self.size[2])
    }
}

/// Read-only shape table, built once at startup and shared by the store and view.
#[derive(Clone, Debug, Default)]
pub struct ShapeCatalog {
    shapes: Vec<Shape>,
    by_name: HashMap<String, ShapeIndex>,
}

impl ShapeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_defs(defs: Vec<ShapeDef>) -> Result<Self, CatalogError> {
        // Index 0 is reserved for "empty" once offset by one in storage.
        if defs.len() >= ShapeIndex::MAX as usize {
            return Err(CatalogError::TooMany(defs.len()));
        }
        let mut catalog = ShapeCatalog::new();
        for def in defs {
            if def
                .size
                .iter()
                .any(|&s| s <= 0 || s > MAX_SHAPE_EXTENT)
            {
                return Err(CatalogError::InvalidSize {
                    name: def.name,
                    size: def.size,
                });
            }
            let index = catalog.shapes.len() as ShapeIndex;
            if catalog.by_name.insert(def.name.clone(), index).is_some() {
                return Err(CatalogError::DuplicateName(def.name));
            }
            catalog.shapes.push(Shape {
                index,
                name: def.name,
                size: def.size,
                no_support: def.no_support,
                path_through: def.path_through,
            });
        }
        Ok(catalog)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, CatalogError> {
        let cfg: ShapesConfig = toml::from_str(toml_str)?;
        Self::from_defs(cfg.shapes)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    #[inline]
    pub fn get(&self, index: ShapeIndex) -> Option<&Shape> {
        self.shapes.get(index as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<ShapeIndex> {
        self.by_name.get(name).copied()
    }

    pub fn by_name(&self, name: &str) -> Option<&Shape> {
        self.id_by_name(name).and_then(|i| self.get(i))
    }

    #[inline]
    pub fn contains(&self, index: ShapeIndex) -> bool {
        (index as usize) < self.shapes.len()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter()
    }
}
