//! The [`Cell`] type: a single character with styling.

use crate::style::{Color, Style};

/// A styled character cell of the display buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Cell {
    /// A blank cell painted with background `bg`.
    #[inline]
    pub const fn blank(bg: Color) -> Self {
        Self {
            ch: ' ',
            style: Style::colors(Color::DEFAULT, bg),
        }
    }

    #[inline]
    pub const fn with_char(mut self, ch: char) -> Self {
        self.ch = ch;
        self
    }

    #[inline]
    pub const fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }
}

impl Default for Cell {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}
