use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use isoworld_store::IoMode;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_game_dir")] pub game_dir: PathBuf,
    #[serde(default = "default_user_dir")] pub user_dir: PathBuf,
    #[serde(default = "default_mode")] pub mode: IoMode,
    /// Shape catalog; `<game_dir>/shapes.toml` when unset.
    #[serde(default)] pub shapes: Option<PathBuf>,
    #[serde(default)] pub start: Start,
    #[serde(default)] pub window: WindowConfig,
    #[serde(default)] pub pathing: Pathing,
}

fn default_game_dir() -> PathBuf { PathBuf::from("game") }
fn default_user_dir() -> PathBuf { PathBuf::from("saves") }
fn default_mode() -> IoMode { IoMode::Play }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            game_dir: default_game_dir(),
            user_dir: default_user_dir(),
            mode: default_mode(),
            shapes: None,
            start: Start::default(),
            window: WindowConfig::default(),
            pathing: Pathing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Start {
    #[serde(default = "default_start_x")] pub x: i32,
    #[serde(default = "default_start_y")] pub y: i32,
}
fn default_start_x() -> i32 { 5000 }
fn default_start_y() -> i32 { 5015 }
impl Default for Start { fn default() -> Self { Self { x: default_start_x(), y: default_start_y() } } }

impl Start {
    /// Window focus for commands that take an optional centre.
    pub fn or(self, x: Option<i32>, y: Option<i32>) -> (i32, i32) {
        (x.unwrap_or(self.x), y.unwrap_or(self.y))
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct WindowConfig { #[serde(default = "default_max_z")] pub max_z: i32 }
fn default_max_z() -> i32 { isoworld_view::WINDOW_Z }
impl Default for WindowConfig { fn default() -> Self { Self { max_z: default_max_z() } } }

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub struct Pathing { #[serde(default = "default_mover_height")] pub mover_height: i32 }
fn default_mover_height() -> i32 { isoworld_view::MOVER_HEIGHT }
impl Default for Pathing { fn default() -> Self { Self { mover_height: default_mover_height() } } }

impl EngineConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Reads `path`; a missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn shapes_path(&self) -> PathBuf {
        self.shapes
            .clone()
            .unwrap_or_else(|| self.game_dir.join("shapes.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg.game_dir, PathBuf::from("game"));
        assert_eq!(cfg.user_dir, PathBuf::from("saves"));
        assert_eq!(cfg.mode, IoMode::Play);
        assert_eq!(cfg.start, Start { x: 5000, y: 5015 });
        assert_eq!(cfg.window.max_z, 24);
        assert_eq!(cfg.pathing.mover_height, 4);
        assert_eq!(cfg.shapes_path(), PathBuf::from("game").join("shapes.toml"));
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            mode = "editor"
            shapes = "assets/shapes.toml"

            [start]
            y = 12

            [window]
            max_z = 8
            "#,
        )
        .unwrap();
        assert_eq!(cfg.mode, IoMode::Editor);
        assert_eq!(cfg.start, Start { x: 5000, y: 12 });
        assert_eq!(cfg.window.max_z, 8);
        assert_eq!(cfg.pathing.mover_height, 4);
        assert_eq!(cfg.shapes_path(), PathBuf::from("assets/shapes.toml"));
    }

    #[test]
    fn start_fills_missing_centre() {
        let start = Start { x: 7, y: 9 };
        assert_eq!(start.or(None, None), (7, 9));
        assert_eq!(start.or(Some(-3), None), (-3, 9));
        assert_eq!(start.or(None, Some(40)), (7, 40));
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(EngineConfig::from_toml_str("mode = \"sandbox\"").is_err());
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = EngineConfig::load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg.mode, IoMode::Play);
    }
}
