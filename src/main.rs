mod config;

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use isoworld_shapes::ShapeCatalog;
use isoworld_store::{IoMode, SectionCoord, SectionObserver, SectionPaths, SectionStore};
use isoworld_view::{MAX_FOCUS, PathRequest, Pathfinder, Window, WorldPos};

use crate::config::EngineConfig;

#[derive(Parser)]
#[command(name = "isoworld", about = "Inspect and edit isoworld sections from the command line")]
struct Cli {
    /// Engine config file
    #[arg(long, default_value = "isoworld.toml")]
    config: PathBuf,
    /// Asset directory (overrides config)
    #[arg(long)]
    game_dir: Option<PathBuf>,
    /// Per-user save directory (overrides config)
    #[arg(long)]
    user_dir: Option<PathBuf>,
    /// Where sections are read from and written to (overrides config)
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Editor,
    Play,
}

impl From<ModeArg> for IoMode {
    fn from(m: ModeArg) -> Self {
        match m {
            ModeArg::Editor => IoMode::Editor,
            ModeArg::Play => IoMode::Play,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Print occupancy counts for one section
    Inspect {
        #[arg(allow_hyphen_values = true)]
        sx: i32,
        #[arg(allow_hyphen_values = true)]
        sy: i32,
    },
    /// Place a shape by name at a world cell
    Place {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        z: i32,
        shape: String,
    },
    /// Clear a world cell
    Erase {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        z: i32,
    },
    /// Find a path between two world cells, centered on the start
    Path {
        #[arg(allow_hyphen_values = true)]
        sx: i32,
        #[arg(allow_hyphen_values = true)]
        sy: i32,
        sz: i32,
        #[arg(allow_hyphen_values = true)]
        ex: i32,
        #[arg(allow_hyphen_values = true)]
        ey: i32,
        ez: i32,
        #[arg(long)]
        flying: bool,
        /// Mover footprint width
        #[arg(long, default_value_t = 1)]
        radius: i32,
        /// Goal footprint width
        #[arg(long, default_value_t = 1)]
        goal_radius: i32,
    },
    /// Lowest z a shape can rest at in a column
    Top {
        #[arg(allow_hyphen_values = true)]
        x: i32,
        #[arg(allow_hyphen_values = true)]
        y: i32,
        shape: String,
    },
    /// Load the window and report what is in view (centre defaults to `[start]`)
    Scan {
        #[arg(long, allow_hyphen_values = true)]
        x: Option<i32>,
        #[arg(long, allow_hyphen_values = true)]
        y: Option<i32>,
    },
}

struct LogObserver;

impl SectionObserver for LogObserver {
    fn section_loaded(&mut self, coord: SectionCoord) {
        log::debug!("section {coord} loaded");
    }

    fn section_saved(&mut self, coord: SectionCoord) {
        log::debug!("section {coord} saved");
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut cfg = EngineConfig::load(&cli.config)?;
    if let Some(dir) = cli.game_dir {
        cfg.game_dir = dir;
    }
    if let Some(dir) = cli.user_dir {
        cfg.user_dir = dir;
    }
    if let Some(mode) = cli.mode {
        cfg.mode = mode.into();
    }

    let shapes_path = cfg.shapes_path();
    let catalog = Arc::new(ShapeCatalog::from_path(&shapes_path)?);
    log::info!("loaded {} shapes from {}", catalog.len(), shapes_path.display());
    let mut store = SectionStore::with_observer(
        Arc::clone(&catalog),
        SectionPaths::new(&cfg.game_dir, &cfg.user_dir),
        Box::new(LogObserver),
    );
    store.set_io_mode(cfg.mode);

    match cli.command {
        Command::Inspect { sx, sy } => {
            let section = store.section(SectionCoord::new(sx, sy))?;
            println!(
                "section {}: {} occupied cells, {} edges",
                section.coord(),
                section.occupied_count(),
                section.edge_count()
            );
            log::debug!("store stats {:?}", store.stats());
        }
        Command::Place { x, y, z, shape } => {
            let index = catalog
                .id_by_name(&shape)
                .ok_or_else(|| format!("unknown shape '{shape}'"))?;
            if !store.set_shape(x, y, z, index)? {
                return Err(format!("cannot place at ({x}, {y}, {z})").into());
            }
            store.flush_all()?;
        }
        Command::Erase { x, y, z } => {
            if store.erase_shape(x, y, z)? {
                store.flush_all()?;
            } else {
                println!("nothing at ({x}, {y}, {z})");
            }
        }
        Command::Path { sx, sy, sz, ex, ey, ez, flying, radius, goal_radius } => {
            let window = open_window(store, &cfg, sx, sy)?;
            let mut pathfinder = Pathfinder::with_mover_height(cfg.pathing.mover_height);
            let req = PathRequest::new(WorldPos::new(sx, sy, sz), WorldPos::new(ex, ey, ez))
                .flying(flying)
                .radii(radius, goal_radius);
            match pathfinder.find_path(&window, &req) {
                Some(steps) => {
                    println!("{} steps", steps.len());
                    for s in steps {
                        println!("{} {} {}", s.x, s.y, s.z);
                    }
                }
                None => println!("no path"),
            }
        }
        Command::Top { x, y, shape } => {
            let index = catalog
                .id_by_name(&shape)
                .ok_or_else(|| format!("unknown shape '{shape}'"))?;
            let window = open_window(store, &cfg, x, y)?;
            match window.find_top(x, y, index) {
                Some(z) => println!("{z}"),
                None => println!("({x}, {y}) is out of view"),
            }
        }
        Command::Scan { x, y } => {
            let (x, y) = cfg.start.or(x, y);
            let window = open_window(store, &cfg, x, y)?;
            println!(
                "focus ({x}, {y}) in section {}: {} occupied cells in view",
                window.section_pos(),
                window.occupied_count()
            );
            println!("{:?}", window.store().stats());
        }
    }

    Ok(())
}

fn open_window(store: SectionStore, cfg: &EngineConfig, x: i32, y: i32) -> Result<Window, Box<dyn Error>> {
    if !(0..=MAX_FOCUS).contains(&x) || !(0..=MAX_FOCUS).contains(&y) {
        return Err(format!("cannot centre the window on ({x}, {y})").into());
    }
    let mut window = Window::new(store);
    window.set_max_z(cfg.window.max_z);
    window.move_to(x, y);
    window.load()?;
    log::debug!("window at {:?}, stats {:?}", window.focus(), window.store().stats());
    Ok(window)
}
