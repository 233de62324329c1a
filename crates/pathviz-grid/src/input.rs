//! Pointer and keyboard handling: [`InputController`], [`Layout`],
//! [`Command`].
//!
//! Grid edits are applied directly to the [`GridModel`]; everything else is
//! returned as a [`Command`] for the application to carry out.

use pathviz_core::{Key, ModMask, MouseAction, Point, Range};

use crate::error::Result;
use crate::model::GridModel;

/// An application-level action bound to a key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    FindPath,
    Reset,
    ClearPath,
    ClearWalls,
    GenerateMaze,
    NextSize,
    PrevSize,
    SpeedUp,
    SpeedDown,
    CycleHeuristic,
    ToggleAnimate,
    Quit,
}

impl Command {
    /// The command bound to `key`, if any.
    pub fn from_key(key: &Key) -> Option<Self> {
        let cmd = match key {
            Key::Space | Key::Char(' ') => Self::FindPath,
            Key::Char('r' | 'R') => Self::Reset,
            Key::Char('c') => Self::ClearPath,
            Key::Char('w') => Self::ClearWalls,
            Key::Char('m') => Self::GenerateMaze,
            Key::Char('g') => Self::NextSize,
            Key::Char('G') => Self::PrevSize,
            Key::Char('+' | '=') => Self::SpeedUp,
            Key::Char('-' | '_') => Self::SpeedDown,
            Key::Char('h') => Self::CycleHeuristic,
            Key::Char('a') => Self::ToggleAnimate,
            Key::Char('q' | 'Q') | Key::Escape => Self::Quit,
            _ => return None,
        };
        Some(cmd)
    }
}

/// The grid edit a pointer press performed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    Walls,
    Start,
    End,
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Screen placement of the grid. Each cell is `cell_width` columns wide and
/// one row tall, so square cells look square in a terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    pub origin: Point,
    pub cell_width: i32,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            origin: Point::ZERO,
            cell_width: 2,
        }
    }
}

impl Layout {
    pub fn new(origin: Point) -> Self {
        Self {
            origin,
            ..Self::default()
        }
    }

    /// The grid cell under screen position `pos`. The result may lie outside
    /// the grid; callers check bounds.
    pub fn cell_at(&self, pos: Point) -> Point {
        let rel = pos - self.origin;
        Point::new(rel.x.div_euclid(self.cell_width), rel.y)
    }

    /// The screen position of the left column of cell `p`.
    pub fn screen_of(&self, p: Point) -> Point {
        self.origin + Point::new(p.x * self.cell_width, p.y)
    }

    /// Screen area covered by a `width` × `height` grid.
    pub fn area(&self, width: i32, height: i32) -> Range {
        Range::with_size(self.origin, Point::new(width * self.cell_width, height))
    }
}

// ---------------------------------------------------------------------------
// InputController
// ---------------------------------------------------------------------------

/// Turns pointer presses, drags and releases into grid edits.
///
/// A main-button press toggles the pressed cell and starts drawing; each new
/// cell entered while drawing toggles once. Secondary press moves the start
/// marker, ctrl+main press moves the end marker. Other buttons do nothing.
#[derive(Clone, Debug, Default)]
pub struct InputController {
    drawing: bool,
    last_cell: Option<Point>,
}

impl InputController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Handle a button press on grid cell `p`.
    pub fn press(
        &mut self,
        grid: &mut GridModel,
        action: MouseAction,
        p: Point,
        mods: ModMask,
    ) -> Option<Result<Edit>> {
        if !grid.contains(p) {
            self.last_cell = None;
            return None;
        }
        match action {
            MouseAction::Main if mods.contains(ModMask::CTRL) => {
                Some(grid.set_end(p).map(|()| Edit::End))
            }
            MouseAction::Secondary => Some(grid.set_start(p).map(|()| Edit::Start)),
            MouseAction::Main => {
                self.drawing = true;
                self.last_cell = Some(p);
                grid.toggle_wall(p);
                Some(Ok(Edit::Walls))
            }
            _ => None,
        }
    }

    /// Handle the pointer entering grid cell `p` with or without a button
    /// held. Returns whether a wall was toggled.
    pub fn drag(&mut self, grid: &mut GridModel, p: Point) -> bool {
        if !self.drawing {
            return false;
        }
        if !grid.contains(p) {
            self.last_cell = None;
            return false;
        }
        if self.last_cell == Some(p) {
            return false;
        }
        self.last_cell = Some(p);
        grid.toggle_wall(p);
        true
    }

    pub fn release(&mut self) {
        self.drawing = false;
        self.last_cell = None;
    }

    /// Dispatch a raw mouse event at screen position `pos`.
    pub fn mouse(
        &mut self,
        grid: &mut GridModel,
        layout: &Layout,
        action: MouseAction,
        pos: Point,
        mods: ModMask,
    ) -> Option<Result<Edit>> {
        let p = layout.cell_at(pos);
        match action {
            MouseAction::Release => {
                self.release();
                None
            }
            MouseAction::Move => self.drag(grid, p).then_some(Ok(Edit::Walls)),
            MouseAction::WheelUp | MouseAction::WheelDown => None,
            _ => self.press(grid, action, p, mods),
        }
    }
}
