//! Input events: [`Msg`], [`Key`], [`MouseAction`], [`ModMask`].

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::geom::Point;

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// A keyboard key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Tab,
    Space,
    Backspace,
    Delete,
    /// A printable character other than space.
    Char(char),
}

// ---------------------------------------------------------------------------
// ModMask
// ---------------------------------------------------------------------------

/// Bitmask of modifier keys held during an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModMask(pub u8);

impl ModMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);
    pub const META: Self = Self(1 << 3);

    /// Whether this mask contains all bits of `other`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for ModMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

// ---------------------------------------------------------------------------
// MouseAction
// ---------------------------------------------------------------------------

/// A mouse action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MouseAction {
    /// Primary (left) button pressed.
    Main,
    /// Middle button pressed.
    Auxiliary,
    /// Secondary (right) button pressed.
    Secondary,
    WheelUp,
    WheelDown,
    /// Button released.
    Release,
    /// Pointer moved, with or without a button held.
    Move,
}

// ---------------------------------------------------------------------------
// Msg
// ---------------------------------------------------------------------------

/// An application-defined payload carried by [`Msg::Custom`].
pub type CustomMsg = Arc<dyn Any + Send + Sync>;

/// A message delivered to the application model.
#[derive(Clone)]
pub enum Msg {
    /// A key was pressed.
    KeyDown {
        key: Key,
        modifiers: ModMask,
        time: Instant,
    },
    /// A mouse event.
    Mouse {
        action: MouseAction,
        pos: Point,
        modifiers: ModMask,
        time: Instant,
    },
    /// The screen / terminal was resized.
    Screen {
        width: i32,
        height: i32,
        time: Instant,
    },
    /// Sent once when the application starts.
    Init,
    /// Request to quit.
    Quit,
    /// A message produced by the application itself, typically the result of
    /// an [`Effect::Cmd`](crate::app::Effect::Cmd).
    Custom(CustomMsg),
}

impl Msg {
    /// A `KeyDown` with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::key_mod(key, ModMask::NONE)
    }

    /// A `KeyDown` with modifiers.
    pub fn key_mod(key: Key, modifiers: ModMask) -> Self {
        Self::KeyDown {
            key,
            modifiers,
            time: Instant::now(),
        }
    }

    /// A mouse message at screen position `pos`.
    pub fn mouse(action: MouseAction, pos: Point, modifiers: ModMask) -> Self {
        Self::Mouse {
            action,
            pos,
            modifiers,
            time: Instant::now(),
        }
    }

    /// A terminal resize to `width`×`height` cells.
    pub fn screen(width: i32, height: i32) -> Self {
        Self::Screen {
            width,
            height,
            time: Instant::now(),
        }
    }

    /// Wrap an application value in a [`Msg::Custom`].
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Borrow the payload of a [`Msg::Custom`] if it has type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.as_ref().downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyDown { key, modifiers, .. } => f
                .debug_struct("KeyDown")
                .field("key", key)
                .field("modifiers", modifiers)
                .finish(),
            Self::Mouse {
                action,
                pos,
                modifiers,
                ..
            } => f
                .debug_struct("Mouse")
                .field("action", action)
                .field("pos", pos)
                .field("modifiers", modifiers)
                .finish(),
            Self::Screen { width, height, .. } => f
                .debug_struct("Screen")
                .field("width", width)
                .field("height", height)
                .finish(),
            Self::Init => f.write_str("Init"),
            Self::Quit => f.write_str("Quit"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}
