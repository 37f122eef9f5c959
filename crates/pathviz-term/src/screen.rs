//! Off-screen character buffer and frame diffing.
//!
//! The model draws a complete [`Screen`] every frame; [`compute_frame`]
//! reduces two consecutive screens to the [`Frame`] of glyphs that actually
//! changed, which is all the driver writes to the terminal.

use std::ops::BitOr;

use pathviz_core::{Point, Range};

/// An RGB colour packed into a `u32` (0x00RRGGBB).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Color(pub u32);

impl Color {
    /// The terminal's own colour.
    pub const DEFAULT: Self = Self(0);

    #[inline]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
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

/// Bitmask of text attributes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct AttrMask(pub u32);

impl AttrMask {
    pub const NONE: Self = Self(0);
    pub const BOLD: Self = Self(1 << 0);
    pub const UNDERLINE: Self = Self(1 << 1);
    pub const REVERSE: Self = Self(1 << 2);
    pub const DIM: Self = Self(1 << 3);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl BitOr for AttrMask {
    type Output = Self;
    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct Style {
    pub fg: Color,
    pub bg: Color,
    pub attrs: AttrMask,
}

impl Style {
    #[inline]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    #[inline]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    #[inline]
    pub const fn with_attrs(mut self, attrs: AttrMask) -> Self {
        self.attrs = attrs;
        self
    }
}

/// A styled character.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Glyph {
    pub ch: char,
    pub style: Style,
}

impl Glyph {
    #[inline]
    pub const fn new(ch: char, style: Style) -> Self {
        Self { ch, style }
    }
}

impl Default for Glyph {
    #[inline]
    fn default() -> Self {
        Self {
            ch: ' ',
            style: Style::default(),
        }
    }
}

/// A `width × height` buffer of glyphs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    glyphs: Vec<Glyph>,
    width: i32,
    height: i32,
}

impl Screen {
    pub fn new(width: i32, height: i32) -> Self {
        let (w, h) = (width.max(0), height.max(0));
        Self {
            glyphs: vec![Glyph::default(); (w * h) as usize],
            width: w,
            height: h,
        }
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
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    /// The glyph at `p`; blank outside the screen.
    pub fn at(&self, p: Point) -> Glyph {
        self.index(p).map(|i| self.glyphs[i]).unwrap_or_default()
    }

    /// Set the glyph at `p`. No-op outside the screen.
    pub fn set(&mut self, p: Point, glyph: Glyph) {
        if let Some(i) = self.index(p) {
            self.glyphs[i] = glyph;
        }
    }

    pub fn fill(&mut self, glyph: Glyph) {
        self.glyphs.fill(glyph);
    }

    /// Fill every position of `r` inside the screen.
    pub fn fill_range(&mut self, r: Range, glyph: Glyph) {
        for p in r {
            self.set(p, glyph);
        }
    }

    /// Write `text` starting at `p`, clipped to `max_width` characters and
    /// to the screen. Returns the number of characters written.
    pub fn print(&mut self, p: Point, text: &str, style: Style, max_width: usize) -> usize {
        let mut n = 0;
        for (i, ch) in text.chars().take(max_width).enumerate() {
            self.set(p.shift(i as i32, 0), Glyph::new(ch, style));
            n += 1;
        }
        n
    }

    /// The text of row `y`, trailing blanks trimmed.
    pub fn row_text(&self, y: i32) -> String {
        let s: String = (0..self.width)
            .map(|x| self.at(Point::new(x, y)).ch)
            .collect();
        s.trim_end().to_string()
    }
}

/// A glyph that changed between frames.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameCell {
    pub glyph: Glyph,
    pub pos: Point,
}

/// A set of glyph changes.
#[derive(Clone, Debug, Default)]
pub struct Frame {
    pub cells: Vec<FrameCell>,
    pub width: i32,
    pub height: i32,
}

/// The glyphs of `curr` that differ from `prev`. Screens of different sizes
/// produce a full frame.
pub fn compute_frame(prev: &Screen, curr: &Screen) -> Frame {
    let full = prev.width != curr.width || prev.height != curr.height;
    let cells = curr
        .bounds()
        .iter()
        .filter_map(|p| {
            let g = curr.at(p);
            (full || prev.at(p) != g).then_some(FrameCell { glyph: g, pos: p })
        })
        .collect();
    Frame {
        cells,
        width: curr.width,
        height: curr.height,
    }
}
