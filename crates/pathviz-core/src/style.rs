//! Visual styling: [`Color`], [`AttrMask`], and [`Style`].

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// An RGB colour packed into a `u32` (0x00RRGGBB).
///
/// `Color(0)` doubles as "terminal default"; use [`Color::BLACK`] when a real
/// black is wanted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color(pub u32);

impl Color {
    /// The default / unset colour (0).
    pub const DEFAULT: Self = Self(0);
    /// Near-black that is distinguishable from [`Color::DEFAULT`].
    pub const BLACK: Self = Self::from_rgb(1, 1, 1);

    /// Construct from individual RGB components.
    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    /// Construct from a `0xRRGGBB` literal, as in CSS hex colours.
    #[inline]
    pub const fn from_hex(hex: u32) -> Self {
        Self(hex & 0x00FF_FFFF)
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }
}

// ---------------------------------------------------------------------------
// AttrMask
// ---------------------------------------------------------------------------

/// Bitmask of text attributes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrMask(pub u32);

impl AttrMask {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1 << 0);
    pub const ITALIC: Self = Self(1 << 1);
    pub const UNDERLINE: Self = Self(1 << 2);
    pub const REVERSE: Self = Self(1 << 4);
    pub const DIM: Self = Self(1 << 5);

    /// Whether this mask contains all the bits from `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for AttrMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitAnd for AttrMask {
    type Output = Self;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// Style
// ---------------------------------------------------------------------------

/// Complete visual style for a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: AttrMask,
}

impl Style {
    /// Shorthand for a style with both colours set.
    #[inline]
    pub const fn colors(fg: Color, bg: Color) -> Self {
        Self {
            fg,
            bg,
            attrs: AttrMask::NONE,
        }
    }

    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_attrs(mut self, attrs: AttrMask) -> Self {
        self.attrs = attrs;
        self
    }
}
