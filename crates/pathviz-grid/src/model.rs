//! The editable pathfinding grid: [`GridModel`], [`Node`], [`GridSize`].

use pathviz_core::{Point, Range};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{GridError, Result};
use crate::step::Step;

/// Probability of a wall used by [`GridModel::generate_maze`] callers when no
/// other density is configured.
pub const DEFAULT_MAZE_DENSITY: f64 = 0.3;

// ---------------------------------------------------------------------------
// GridSize
// ---------------------------------------------------------------------------

/// Validated side length of a square grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridSize(i32);

impl GridSize {
    pub const MIN: i32 = 5;
    pub const MAX: i32 = 100;
    pub const DEFAULT: Self = Self(30);

    pub fn new(n: i32) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&n) {
            Ok(Self(n))
        } else {
            Err(GridError::InvalidSize(n))
        }
    }

    #[inline]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One cell of the grid. `is_wall`, `is_start` and `is_end` are structural;
/// `is_path`, `visited` and `in_open_set` are transient visualization flags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub point: Point,
    #[serde(default)]
    pub is_wall: bool,
    #[serde(default)]
    pub is_start: bool,
    #[serde(default)]
    pub is_end: bool,
    #[serde(default)]
    pub is_path: bool,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub in_open_set: bool,
}

impl Node {
    fn new(point: Point) -> Self {
        Self {
            point,
            ..Self::default()
        }
    }

    /// Whether the node holds the start or end marker.
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.is_start || self.is_end
    }

    fn clear_transient(&mut self) {
        self.is_path = false;
        self.visited = false;
        self.in_open_set = false;
    }
}

// ---------------------------------------------------------------------------
// GridModel
// ---------------------------------------------------------------------------

#[derive(Copy, Clone, Debug)]
enum Marker {
    Start,
    End,
}

/// A square grid of [`Node`]s indexed `[y][x]`, with exactly one start and
/// one end marker on distinct, non-wall cells.
///
/// Serialises to the solver snapshot `{width, height, nodes, start, end}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridModel {
    width: i32,
    height: i32,
    nodes: Vec<Vec<Node>>,
    start: Point,
    end: Point,
}

impl GridModel {
    /// A fresh grid with start `(1,1)` and end `(size-2, size-2)`.
    pub fn new(size: GridSize) -> Self {
        let n = size.get();
        let nodes = (0..n)
            .map(|y| (0..n).map(|x| Node::new(Point::new(x, y))).collect())
            .collect();
        let mut grid = Self {
            width: n,
            height: n,
            nodes,
            start: Point::new(1, 1),
            end: Point::new(n - 2, n - 2),
        };
        let (start, end) = (grid.start, grid.end);
        if let Some(node) = grid.node_mut(start) {
            node.is_start = true;
        }
        if let Some(node) = grid.node_mut(end) {
            node.is_end = true;
        }
        log::debug!("built {n}x{n} grid, start {start}, end {end}");
        grid
    }

    /// Rebuild the grid at `size`, discarding walls and visualization.
    pub fn resize(&mut self, size: GridSize) {
        *self = Self::new(size);
    }

    /// The side length.
    #[inline]
    pub fn size(&self) -> GridSize {
        GridSize(self.width)
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Point {
        self.end
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.bounds().contains(p)
    }

    pub fn node(&self, p: Point) -> Option<&Node> {
        if !self.contains(p) {
            return None;
        }
        self.nodes
            .get(p.y as usize)
            .and_then(|row| row.get(p.x as usize))
    }

    fn node_mut(&mut self, p: Point) -> Option<&mut Node> {
        if !self.contains(p) {
            return None;
        }
        self.nodes
            .get_mut(p.y as usize)
            .and_then(|row| row.get_mut(p.x as usize))
    }

    /// Row-major iterator over every node.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter().flatten()
    }

    fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.iter_mut().flatten()
    }

    pub fn is_wall(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.is_wall)
    }

    pub fn is_start(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.is_start)
    }

    pub fn is_end(&self, p: Point) -> bool {
        self.node(p).is_some_and(|n| n.is_end)
    }

    pub fn wall_count(&self) -> usize {
        self.nodes().filter(|n| n.is_wall).count()
    }

    // -- structural edits ---------------------------------------------------

    /// Flip the wall flag at `p`. Markers and out-of-bounds points are left
    /// alone.
    pub fn toggle_wall(&mut self, p: Point) {
        match self.node_mut(p) {
            Some(node) if !node.is_marker() => {
                node.is_wall = !node.is_wall;
                log::debug!("toggle wall {p} -> {}", node.is_wall);
            }
            Some(_) => log::debug!("toggle wall {p} ignored: marker"),
            None => {}
        }
    }

    /// Move the start marker to `p`, clearing any wall there.
    pub fn set_start(&mut self, p: Point) -> Result<()> {
        self.move_marker(Marker::Start, p)
    }

    /// Move the end marker to `p`, clearing any wall there.
    pub fn set_end(&mut self, p: Point) -> Result<()> {
        self.move_marker(Marker::End, p)
    }

    fn move_marker(&mut self, marker: Marker, p: Point) -> Result<()> {
        let (old, other) = match marker {
            Marker::Start => (self.start, self.end),
            Marker::End => (self.end, self.start),
        };
        if !self.contains(p) {
            log::debug!("{marker:?} marker move to {p} rejected: out of bounds");
            return Err(GridError::OutOfBounds(p));
        }
        if p == other {
            log::debug!("{marker:?} marker move to {p} rejected: overlaps");
            return Err(GridError::MarkerOverlap(p));
        }
        if let Some(node) = self.node_mut(old) {
            match marker {
                Marker::Start => node.is_start = false,
                Marker::End => node.is_end = false,
            }
        }
        if let Some(node) = self.node_mut(p) {
            node.is_wall = false;
            match marker {
                Marker::Start => node.is_start = true,
                Marker::End => node.is_end = true,
            }
        }
        match marker {
            Marker::Start => self.start = p,
            Marker::End => self.end = p,
        }
        log::debug!("{marker:?} marker moved {old} -> {p}");
        Ok(())
    }

    /// Remove every wall.
    pub fn clear_walls(&mut self) {
        for node in self.nodes_mut() {
            if !node.is_marker() {
                node.is_wall = false;
            }
        }
    }

    /// Reset `is_path`, `visited` and `in_open_set` everywhere.
    pub fn clear_visualization(&mut self) {
        self.nodes_mut().for_each(Node::clear_transient);
    }

    /// Clear the walls, then make each non-marker node a wall with
    /// probability `density` (clamped to `[0, 1]`). The result may have no
    /// path between the markers.
    pub fn generate_maze<R: Rng + ?Sized>(&mut self, density: f64, rng: &mut R) {
        let density = if density.is_nan() { 0.0 } else { density.clamp(0.0, 1.0) };
        self.clear_walls();
        for node in self.nodes_mut() {
            if !node.is_marker() && rng.random_bool(density) {
                node.is_wall = true;
            }
        }
        log::debug!("maze generated, density {density}, {} walls", self.wall_count());
    }

    // -- visualization ------------------------------------------------------

    fn mark(&mut self, points: &[Point], set: fn(&mut Node)) {
        for &p in points {
            match self.node_mut(p) {
                Some(node) if !node.is_marker() => set(node),
                Some(_) => {}
                None => log::warn!("solver reported {p} outside the grid"),
            }
        }
    }

    /// Show one animation frame: transient flags are replaced by the step's
    /// closed set, open set and (when complete) path. Markers keep their
    /// own colours.
    pub fn apply_step(&mut self, step: &Step) {
        self.clear_visualization();
        self.mark(&step.closed_set, |n| n.visited = true);
        self.mark(&step.open_set, |n| n.in_open_set = true);
        if let Some(path) = step.final_path() {
            self.mark(path, |n| n.is_path = true);
        }
    }

    /// Show a final result at once: the path, then the explored nodes that
    /// are not on it.
    pub fn apply_result(&mut self, path: &[Point], explored: &[Point]) {
        self.mark(path, |n| n.is_path = true);
        self.mark(explored, |n| {
            if !n.is_path {
                n.visited = true;
            }
        });
    }

    // -- checks -------------------------------------------------------------

    /// Verify the marker invariants: exactly one start and one end, on the
    /// recorded points, distinct, and never walls.
    pub fn check_invariants(&self) -> Result<()> {
        let invariant = |msg: String| Err(GridError::Invariant(msg));
        self.check_shape()?;
        if self.start == self.end {
            return invariant(format!("start and end share {}", self.start));
        }
        let starts: Vec<Point> = self.nodes().filter(|n| n.is_start).map(|n| n.point).collect();
        if starts != [self.start] {
            return invariant(format!("start flags at {starts:?}, expected {}", self.start));
        }
        let ends: Vec<Point> = self.nodes().filter(|n| n.is_end).map(|n| n.point).collect();
        if ends != [self.end] {
            return invariant(format!("end flags at {ends:?}, expected {}", self.end));
        }
        if let Some(n) = self.nodes().find(|n| n.is_wall && n.is_marker()) {
            return invariant(format!("marker at {} is a wall", n.point));
        }
        Ok(())
    }

    /// Verify that the node rows match the declared dimensions, as they may
    /// not for a deserialized snapshot.
    pub fn check_shape(&self) -> Result<()> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GridError::Invariant(format!(
                "dimensions {}x{}",
                self.width, self.height
            )));
        }
        if self.nodes.len() != self.height as usize {
            return Err(GridError::Invariant(format!(
                "{} rows, expected {}",
                self.nodes.len(),
                self.height
            )));
        }
        for (y, row) in self.nodes.iter().enumerate() {
            if row.len() != self.width as usize {
                return Err(GridError::Invariant(format!(
                    "row {y} has {} nodes, expected {}",
                    row.len(),
                    self.width
                )));
            }
        }
        Ok(())
    }
}

impl Default for GridModel {
    fn default() -> Self {
        Self::new(GridSize::default())
    }
}
