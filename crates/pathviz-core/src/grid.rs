//! The display [`Grid`]: a 2D buffer of [`Cell`]s with slice semantics.
//!
//! A `Grid` is a *view* into a shared backing buffer. Cloning a `Grid` yields
//! another view of the **same** storage. Use [`slice`](Grid::slice) to obtain
//! sub-grid views, e.g. one per screen panel.

use std::cell::RefCell;
use std::rc::Rc;

use crate::cell::Cell;
use crate::geom::{Point, Range};
use crate::style::Style;

// ---------------------------------------------------------------------------
// Internal shared buffer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct GridBuffer {
    cells: Vec<Cell>,
    width: usize,
    height: usize,
}

impl GridBuffer {
    fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![Cell::default(); width * height],
            width,
            height,
        }
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height {
            Some((p.y as usize) * self.width + (p.x as usize))
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A 2D grid of [`Cell`]s backed by shared storage.
///
/// Coordinates passed to [`at`](Grid::at) and [`set`](Grid::set) are
/// relative to the view's own origin.
#[derive(Debug, Clone)]
pub struct Grid {
    buffer: Rc<RefCell<GridBuffer>>,
    bounds: Range,
}

impl Grid {
    /// Create a new grid of the given dimensions, filled with default cells.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            buffer: Rc::new(RefCell::new(GridBuffer::new(w as usize, h as usize))),
            bounds: Range::new(0, 0, w, h),
        }
    }

    /// The bounding range of this view in buffer coordinates.
    #[inline]
    pub fn bounds(&self) -> Range {
        self.bounds
    }

    #[inline]
    pub fn size(&self) -> Point {
        self.bounds.size()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.bounds.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.bounds.height()
    }

    /// Whether the view-relative point `p` lies inside this view.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        Range::with_size(Point::ZERO, self.size()).contains(p)
    }

    /// Sub-grid view for the view-relative range `r`, clipped to this view.
    pub fn slice(&self, r: Range) -> Grid {
        let abs = Range {
            min: r.min + self.bounds.min,
            max: r.max + self.bounds.min,
        };
        Grid {
            buffer: Rc::clone(&self.buffer),
            bounds: self.bounds.intersect(abs),
        }
    }

    /// Read the cell at `p`. Returns `Cell::default()` outside the view.
    pub fn at(&self, p: Point) -> Cell {
        if !self.contains(p) {
            return Cell::default();
        }
        let buf = self.buffer.borrow();
        buf.index(p + self.bounds.min)
            .map(|i| buf.cells[i])
            .unwrap_or_default()
    }

    /// Set the cell at `p`. No-op outside the view.
    pub fn set(&self, p: Point, cell: Cell) {
        if !self.contains(p) {
            return;
        }
        let mut buf = self.buffer.borrow_mut();
        if let Some(i) = buf.index(p + self.bounds.min) {
            buf.cells[i] = cell;
        }
    }

    /// Fill every cell of the view with `cell`.
    pub fn fill(&self, cell: Cell) {
        let mut buf = self.buffer.borrow_mut();
        for p in self.bounds.iter() {
            if let Some(i) = buf.index(p) {
                buf.cells[i] = cell;
            }
        }
    }

    /// Write `text` starting at `p`, clipped to the view. Returns the number
    /// of columns written.
    pub fn draw_text(&self, p: Point, text: &str, style: Style) -> i32 {
        let mut written = 0;
        for (i, ch) in text.chars().enumerate() {
            let q = p.shift(i as i32, 0);
            if !self.contains(q) {
                break;
            }
            self.set(q, Cell::default().with_char(ch).with_style(style));
            written += 1;
        }
        written
    }

    /// Copy cells from `src` into `self`, aligning both origins. Returns the
    /// size actually copied.
    pub fn copy_from(&self, src: &Grid) -> Point {
        let w = src.width().min(self.width());
        let h = src.height().min(self.height());
        for p in Range::new(0, 0, w, h) {
            self.set(p, src.at(p));
        }
        Point::new(w, h)
    }

    /// Row-major iterator over view-relative `(Point, Cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, Cell)> + '_ {
        Range::with_size(Point::ZERO, self.size())
            .iter()
            .map(move |p| (p, self.at(p)))
    }
}

// ---------------------------------------------------------------------------
// Frame / FrameCell / compute_frame
// ---------------------------------------------------------------------------

/// A single cell that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameCell {
    pub cell: Cell,
    pub pos: Point,
}

/// A set of cell changes to flush to the screen.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

impl Frame {
    /// A frame containing every cell of `grid`, used after a screen resize.
    pub fn full(grid: &Grid) -> Self {
        Self {
            cells: grid
                .iter()
                .map(|(pos, cell)| FrameCell { cell, pos })
                .collect(),
            width: grid.width(),
            height: grid.height(),
        }
    }
}

/// Compute the difference between two same-sized grids.
pub fn compute_frame(prev: &Grid, curr: &Grid) -> Frame {
    let cells = curr
        .iter()
        .filter(|&(p, cell)| prev.at(p) != cell)
        .map(|(pos, cell)| FrameCell { cell, pos })
        .collect();
    Frame {
        cells,
        width: curr.width(),
        height: curr.height(),
    }
}
