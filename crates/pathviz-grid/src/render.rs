//! Colour resolution and drawing of a [`GridModel`].

use pathviz_core::{Cell, Color, Grid, Point};

use crate::input::Layout;
use crate::model::{GridModel, Node};

/// What a node looks like, by fixed precedence.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    Empty,
    Wall,
    Start,
    End,
    Path,
    OpenSet,
    Explored,
}

/// Precedence: wall > start > end > path > open set > explored > empty.
pub fn resolve(node: &Node) -> CellKind {
    if node.is_wall {
        CellKind::Wall
    } else if node.is_start {
        CellKind::Start
    } else if node.is_end {
        CellKind::End
    } else if node.is_path {
        CellKind::Path
    } else if node.in_open_set {
        CellKind::OpenSet
    } else if node.visited {
        CellKind::Explored
    } else {
        CellKind::Empty
    }
}

/// Colours for each [`CellKind`] plus the current-node overlay.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub empty: Color,
    pub wall: Color,
    pub start: Color,
    pub end: Color,
    pub explored: Color,
    pub path: Color,
    pub open_set: Color,
    pub current: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            empty: Color::from_hex(0xFFFFFF),
            wall: Color::from_hex(0x333333),
            start: Color::from_hex(0x4CAF50),
            end: Color::from_hex(0xF44336),
            explored: Color::from_hex(0x87CEEB),
            path: Color::from_hex(0xFFD700),
            open_set: Color::from_hex(0x90EE90),
            current: Color::from_hex(0xFF6B6B),
        }
    }
}

impl Palette {
    pub fn color(&self, kind: CellKind) -> Color {
        match kind {
            CellKind::Empty => self.empty,
            CellKind::Wall => self.wall,
            CellKind::Start => self.start,
            CellKind::End => self.end,
            CellKind::Path => self.path,
            CellKind::OpenSet => self.open_set,
            CellKind::Explored => self.explored,
        }
    }
}

/// A surface that can paint one grid cell.
pub trait CellCanvas {
    fn draw_cell(&mut self, p: Point, color: Color);
}

/// Paint every node of `grid`, then the current-node overlay if any.
pub fn render<C: CellCanvas + ?Sized>(
    grid: &GridModel,
    overlay: Option<Point>,
    palette: &Palette,
    canvas: &mut C,
) {
    for node in grid.nodes() {
        canvas.draw_cell(node.point, palette.color(resolve(node)));
    }
    if let Some(p) = overlay.filter(|&p| grid.contains(p)) {
        canvas.draw_cell(p, palette.current);
    }
}

/// [`CellCanvas`] over a display [`Grid`], painting each cell as
/// `layout.cell_width` blank columns.
pub struct GridCanvas<'a> {
    pub grid: &'a Grid,
    pub layout: Layout,
}

impl<'a> GridCanvas<'a> {
    pub fn new(grid: &'a Grid, layout: Layout) -> Self {
        Self { grid, layout }
    }
}

impl CellCanvas for GridCanvas<'_> {
    fn draw_cell(&mut self, p: Point, color: Color) {
        let at = self.layout.screen_of(p);
        for dx in 0..self.layout.cell_width {
            self.grid.set(at.shift(dx, 0), Cell::blank(color));
        }
    }
}
