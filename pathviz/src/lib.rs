//! pathviz: a terminal pathfinding visualizer built on the pathviz crates.

pub mod colors;
pub mod config;
pub mod logging;
pub mod model;
pub mod status;

pub use config::{Args, Config};
pub use model::{UI_HEIGHT, UI_WIDTH, VisualizerModel};
