//! Configuration: an optional TOML file, overridden by command-line flags.

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;
use thiserror::Error;

use pathviz_grid::{GridSize, Speed};
use pathviz_solver::Heuristic;

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "pathviz.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid setting: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// File sections
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub grid: GridConfig,
    pub animation: AnimationConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct SolverConfig {
    /// Root URL of the pathfinding service.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Solve in-process instead of calling the service.
    #[serde(default)]
    pub local: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_size")]
    pub size: i32,

    /// Wall probability for generated mazes.
    #[serde(default = "default_maze_density")]
    pub maze_density: f64,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AnimationConfig {
    /// Playback speed, 1 (slow) to 10 (fast).
    #[serde(default = "default_speed")]
    pub speed: i32,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub heuristic: Heuristic,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct UiConfig {
    /// How long toasts stay on screen.
    #[serde(default = "default_toast_ms")]
    pub toast_ms: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct LogConfig {
    /// Log file. Without one, logging is off.
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Filter for the log file, in `RUST_LOG` syntax.
    #[serde(default)]
    pub level: Option<String>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            local: false,
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            maze_density: default_maze_density(),
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            enabled: default_enabled(),
            heuristic: Heuristic::default(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_ms: default_toast_ms(),
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:8080".to_string()
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_size() -> i32 {
    GridSize::DEFAULT.get()
}
fn default_maze_density() -> f64 {
    pathviz_grid::DEFAULT_MAZE_DENSITY
}
fn default_speed() -> i32 {
    i32::from(Speed::DEFAULT.level())
}
fn default_enabled() -> bool {
    true
}
fn default_toast_ms() -> u64 {
    3000
}

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

/// Paint walls, move the markers, and watch A* search the grid.
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file (default: ./pathviz.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Pathfinding service URL
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Solve in-process instead of calling the service
    #[arg(short, long)]
    pub local: bool,

    /// Grid side length (5-100)
    #[arg(short, long)]
    pub size: Option<i32>,

    /// Animation speed (1-10)
    #[arg(long)]
    pub speed: Option<i32>,

    /// Heuristic: manhattan or euclidean
    #[arg(long, value_parser = parse_heuristic)]
    pub heuristic: Option<Heuristic>,

    /// Show the result at once instead of animating the search
    #[arg(long)]
    pub no_animate: bool,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

fn parse_heuristic(s: &str) -> std::result::Result<Heuristic, String> {
    s.parse().map_err(|e: pathviz_solver::SolverError| e.to_string())
}

impl Config {
    /// Parse a TOML document.
    pub fn from_toml(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read and parse a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// Load the file named by `args` (or the default file when present),
    /// apply the flag overrides, and validate.
    pub fn load(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(endpoint) = &args.endpoint {
            self.solver.endpoint = endpoint.clone();
        }
        if args.local {
            self.solver.local = true;
        }
        if let Some(size) = args.size {
            self.grid.size = size;
        }
        if let Some(speed) = args.speed {
            self.animation.speed = speed;
        }
        if let Some(heuristic) = args.heuristic {
            self.animation.heuristic = heuristic;
        }
        if args.no_animate {
            self.animation.enabled = false;
        }
        if let Some(file) = &args.log_file {
            self.log.file = Some(file.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));
        GridSize::new(self.grid.size).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !(i32::from(Speed::MIN)..=i32::from(Speed::MAX)).contains(&self.animation.speed) {
            return invalid(format!(
                "animation speed {} is outside {}..={}",
                self.animation.speed,
                Speed::MIN,
                Speed::MAX
            ));
        }
        if !(0.0..=1.0).contains(&self.grid.maze_density) {
            return invalid(format!(
                "maze density {} is outside 0..=1",
                self.grid.maze_density
            ));
        }
        if !self.solver.local && self.solver.endpoint.trim().is_empty() {
            return invalid("solver endpoint is empty".to_string());
        }
        if self.solver.timeout_ms == 0 {
            return invalid("solver timeout must be > 0".to_string());
        }
        Ok(())
    }

    pub fn grid_size(&self) -> GridSize {
        GridSize::new(self.grid.size).unwrap_or_default()
    }

    pub fn speed(&self) -> Speed {
        Speed::new(self.animation.speed)
    }
}
