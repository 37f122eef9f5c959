//! Input messages delivered to the visualizer: [`Msg`], [`Key`],
//! [`MouseAction`], [`ModMask`].

use pathviz_core::Point;

/// A keyboard key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    Enter,
    Tab,
    Backspace,
    /// A printable character, space included.
    Char(char),
}

/// Bitmask of modifier keys held during an input event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ModMask(pub u8);

impl ModMask {
    pub const NONE: Self = Self(0);
    pub const SHIFT: Self = Self(1 << 0);
    pub const CTRL: Self = Self(1 << 1);
    pub const ALT: Self = Self(1 << 2);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for ModMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// A mouse action.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MouseAction {
    /// Primary (left) button pressed.
    Main,
    /// Secondary (right) button pressed.
    Secondary,
    /// Moved with a button held.
    Drag,
    /// Button released.
    Release,
}

/// An input message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    KeyDown { key: Key, modifiers: ModMask },
    /// A mouse event at a screen position.
    Mouse { action: MouseAction, pos: Point },
    /// The terminal was resized.
    Screen { width: i32, height: i32 },
    /// Sent once when the application starts.
    Init,
    /// The simulation clock fired.
    Tick,
}

impl Msg {
    /// A `KeyDown` with no modifiers.
    pub fn key(key: Key) -> Self {
        Self::KeyDown {
            key,
            modifiers: ModMask::NONE,
        }
    }

    /// A `KeyDown` for a printable character.
    pub fn ch(c: char) -> Self {
        Self::key(Key::Char(c))
    }
}
