use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ShapesConfig {
    #[serde(default)]
    pub shapes: Vec<ShapeDef>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ShapeDef {
    pub name: String,
    /// Footprint in cells along x, y, z.
    pub size: [i32; 3],
    /// Non-flying movers may not rest on top of this shape.
    #[serde(default)]
    pub no_support: bool,
    /// Pathfinding may walk through this shape when doors are allowed.
    #[serde(default)]
    pub path_through: bool,
}

impl ShapeDef {
    pub fn new(name: impl Into<String>, size: [i32; 3]) -> Self {
        Self {
            name: name.into(),
            size,
            no_support: false,
            path_through: false,
        }
    }

    pub fn no_support(mut self) -> Self {
        self.no_support = true;
        self
    }

    pub fn path_through(mut self) -> Self {
        self.path_through = true;
        self
    }
}
