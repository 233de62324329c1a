//! **pathviz-grid**: the editable pathfinding grid and its playback engine.
//!
//! - [`GridModel`]: square grid of [`Node`]s with start/end markers and walls
//! - [`Step`]: one frame of solver progress
//! - [`AnimationPlayer`]: replays steps onto the grid, tick by tick
//! - [`InputController`]: pointer edits and key bindings
//! - [`render`]: colour precedence and drawing

pub mod animation;
pub mod error;
pub mod input;
pub mod model;
pub mod render;
pub mod step;

pub use animation::{AnimationPlayer, ChainId, PlaybackState, Speed, Tick, TickOutcome};
pub use error::{GridError, Result};
pub use input::{Command, Edit, InputController, Layout};
pub use model::{DEFAULT_MAZE_DENSITY, GridModel, GridSize, Node};
pub use render::{CellCanvas, CellKind, GridCanvas, Palette, render, resolve};
pub use step::{Step, null_as_empty};
