//! Block-Glyph Fonts
//!
//! Terminals have one cell size, so "font size" here is a scale factor for
//! glyphs drawn out of block characters. Every glyph is a 3x5 bitmap with one
//! pixel of spacing to the right and below, giving a 4x6 pixel box.
//!
//! Families:
//! - `block`: half-block characters, two pixels per cell vertically. A glyph
//!   at size `s` is `4s` columns wide and `3s` rows tall.
//! - `ascii`: `#` characters, two columns per pixel to square up the cell
//!   aspect. A glyph at size `s` is `8s` columns wide and `6s` rows tall.
//!
//! Double-width characters (CJK, most emoji) get twice the advance.

use display_core::{FontDescriptor, Measure};
use unicode_width::UnicodeWidthChar;

/// Glyph bitmap width in pixels
pub const GLYPH_WIDTH: u32 = 3;
/// Glyph bitmap height in pixels
pub const GLYPH_HEIGHT: u32 = 5;

/// How glyph pixels map onto terminal cells
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphStyle {
    /// Half blocks (`▀`, `▄`, `█`)
    HalfBlock,
    /// `#` per pixel, two columns wide
    Hash,
}

impl GlyphStyle {
    /// Look up a family by name
    pub fn from_family(family: &str) -> Option<Self> {
        match family.to_ascii_lowercase().as_str() {
            "block" | "blocks" => Some(Self::HalfBlock),
            "ascii" | "hash" => Some(Self::Hash),
            _ => None,
        }
    }

    /// Resolve a descriptor, falling back to half blocks
    pub fn resolve(font: &FontDescriptor) -> Self {
        Self::from_family(&font.family).unwrap_or(Self::HalfBlock)
    }

    /// Columns per pixel at size 1
    pub const fn pixel_columns(self) -> u32 {
        match self {
            Self::HalfBlock => 1,
            Self::Hash => 2,
        }
    }

    /// Pixels stacked in one terminal row
    pub const fn pixels_per_row(self) -> u32 {
        match self {
            Self::HalfBlock => 2,
            Self::Hash => 1,
        }
    }

    /// Columns advanced per narrow glyph at size 1
    pub const fn advance(self) -> u32 {
        (GLYPH_WIDTH + 1) * self.pixel_columns()
    }

    /// Rows per line at size 1
    pub const fn line(self) -> u32 {
        (GLYPH_HEIGHT + 1) / self.pixels_per_row()
    }
}

/// Terminal cells spanned by `ch` (1 or 2; control characters count as 1)
pub fn cell_width(ch: char) -> u32 {
    match ch.width() {
        Some(2) => 2,
        Some(0) => 0,
        _ => 1,
    }
}

/// The measurement adapter for block-glyph fonts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlockMetrics;

impl Measure for BlockMetrics {
    fn line_height(&self, font: &FontDescriptor, size: u16) -> u32 {
        GlyphStyle::resolve(font).line() * u32::from(size)
    }

    fn measure(&self, font: &FontDescriptor, size: u16, text: &str) -> u32 {
        let per_cell = GlyphStyle::resolve(font).advance() * u32::from(size);
        text.chars()
            .map(|c| cell_width(c).saturating_mul(per_cell))
            .fold(0u32, u32::saturating_add)
    }
}

/// A 3x5 bitmap, one byte per row, bit 2 is the leftmost pixel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph([u8; 5]);

impl Glyph {
    /// Whether pixel `(x, y)` is set
    pub fn pixel(&self, x: u32, y: u32) -> bool {
        if x >= GLYPH_WIDTH || y >= GLYPH_HEIGHT {
            return false;
        }
        self.0[y as usize] & (0b100 >> x) != 0
    }

    /// Whether no pixel is set
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|row| *row == 0)
    }
}

const fn bitmap(pattern: [&str; 5]) -> Glyph {
    let mut rows = [0u8; 5];
    let mut y = 0;
    while y < 5 {
        let bytes = pattern[y].as_bytes();
        let mut x = 0;
        while x < 3 && x < bytes.len() {
            if bytes[x] != b' ' {
                rows[y] |= 0b100 >> x;
            }
            x += 1;
        }
        y += 1;
    }
    Glyph(rows)
}

/// Drawn for characters without a bitmap
pub const MISSING: Glyph = bitmap(["XXX", "XXX", "XXX", "XXX", "XXX"]);

const SPACE: Glyph = bitmap(["   ", "   ", "   ", "   ", "   "]);

#[rustfmt::skip]
const GLYPHS: &[(char, Glyph)] = &[
    ('0', bitmap(["XXX", "X X", "X X", "X X", "XXX"])),
    ('1', bitmap([" X ", "XX ", " X ", " X ", "XXX"])),
    ('2', bitmap(["XXX", "  X", "XXX", "X  ", "XXX"])),
    ('3', bitmap(["XXX", "  X", "XXX", "  X", "XXX"])),
    ('4', bitmap(["X X", "X X", "XXX", "  X", "  X"])),
    ('5', bitmap(["XXX", "X  ", "XXX", "  X", "XXX"])),
    ('6', bitmap(["XXX", "X  ", "XXX", "X X", "XXX"])),
    ('7', bitmap(["XXX", "  X", "  X", "  X", "  X"])),
    ('8', bitmap(["XXX", "X X", "XXX", "X X", "XXX"])),
    ('9', bitmap(["XXX", "X X", "XXX", "  X", "XXX"])),
    ('A', bitmap([" X ", "X X", "XXX", "X X", "X X"])),
    ('B', bitmap(["XX ", "X X", "XX ", "X X", "XX "])),
    ('C', bitmap([" XX", "X  ", "X  ", "X  ", " XX"])),
    ('D', bitmap(["XX ", "X X", "X X", "X X", "XX "])),
    ('E', bitmap(["XXX", "X  ", "XX ", "X  ", "XXX"])),
    ('F', bitmap(["XXX", "X  ", "XX ", "X  ", "X  "])),
    ('G', bitmap([" XX", "X  ", "X X", "X X", " XX"])),
    ('H', bitmap(["X X", "X X", "XXX", "X X", "X X"])),
    ('I', bitmap(["XXX", " X ", " X ", " X ", "XXX"])),
    ('J', bitmap(["  X", "  X", "  X", "X X", " X "])),
    ('K', bitmap(["X X", "X X", "XX ", "X X", "X X"])),
    ('L', bitmap(["X  ", "X  ", "X  ", "X  ", "XXX"])),
    ('M', bitmap(["X X", "XXX", "XXX", "X X", "X X"])),
    ('N', bitmap(["XX ", "X X", "X X", "X X", "X X"])),
    ('O', bitmap([" X ", "X X", "X X", "X X", " X "])),
    ('P', bitmap(["XX ", "X X", "XX ", "X  ", "X  "])),
    ('Q', bitmap([" X ", "X X", "X X", "XX ", " XX"])),
    ('R', bitmap(["XX ", "X X", "XX ", "X X", "X X"])),
    ('S', bitmap([" XX", "X  ", " X ", "  X", "XX "])),
    ('T', bitmap(["XXX", " X ", " X ", " X ", " X "])),
    ('U', bitmap(["X X", "X X", "X X", "X X", "XXX"])),
    ('V', bitmap(["X X", "X X", "X X", "X X", " X "])),
    ('W', bitmap(["X X", "X X", "XXX", "XXX", "X X"])),
    ('X', bitmap(["X X", "X X", " X ", "X X", "X X"])),
    ('Y', bitmap(["X X", "X X", " X ", " X ", " X "])),
    ('Z', bitmap(["XXX", "  X", " X ", "X  ", "XXX"])),
    ('.', bitmap(["   ", "   ", "   ", "   ", " X "])),
    (',', bitmap(["   ", "   ", "   ", " X ", "X  "])),
    (':', bitmap(["   ", " X ", "   ", " X ", "   "])),
    (';', bitmap(["   ", " X ", "   ", " X ", "X  "])),
    ('!', bitmap([" X ", " X ", " X ", "   ", " X "])),
    ('?', bitmap(["XX ", "  X", " X ", "   ", " X "])),
    ('-', bitmap(["   ", "   ", "XXX", "   ", "   "])),
    ('+', bitmap(["   ", " X ", "XXX", " X ", "   "])),
    ('=', bitmap(["   ", "XXX", "   ", "XXX", "   "])),
    ('/', bitmap(["  X", "  X", " X ", "X  ", "X  "])),
    ('\\', bitmap(["X  ", "X  ", " X ", "  X", "  X"])),
    ('(', bitmap(["  X", " X ", " X ", " X ", "  X"])),
    (')', bitmap(["X  ", " X ", " X ", " X ", "X  "])),
    ('[', bitmap([" XX", " X ", " X ", " X ", " XX"])),
    (']', bitmap(["XX ", " X ", " X ", " X ", "XX "])),
    ('{', bitmap(["  X", " X ", "XX ", " X ", "  X"])),
    ('}', bitmap(["X  ", " X ", " XX", " X ", "X  "])),
    ('<', bitmap(["  X", " X ", "X  ", " X ", "  X"])),
    ('>', bitmap(["X  ", " X ", "  X", " X ", "X  "])),
    ('\'', bitmap([" X ", " X ", "   ", "   ", "   "])),
    ('"', bitmap(["X X", "X X", "   ", "   ", "   "])),
    ('`', bitmap(["X  ", " X ", "   ", "   ", "   "])),
    ('_', bitmap(["   ", "   ", "   ", "   ", "XXX"])),
    ('%', bitmap(["X X", "  X", " X ", "X  ", "X X"])),
    ('#', bitmap(["X X", "XXX", "X X", "XXX", "X X"])),
    ('*', bitmap(["   ", "X X", " X ", "X X", "   "])),
    ('@', bitmap(["XXX", "X X", "XXX", "X  ", " XX"])),
    ('&', bitmap([" X ", "X X", " X ", "X X", " XX"])),
    ('$', bitmap([" XX", "XX ", " X ", " XX", "XX "])),
    ('|', bitmap([" X ", " X ", " X ", " X ", " X "])),
    ('^', bitmap([" X ", "X X", "   ", "   ", "   "])),
    ('~', bitmap(["   ", "  X", "XXX", "X  ", "   "])),
    ('°', bitmap(["XXX", "X X", "XXX", "   ", "   "])),
];

/// Bitmap for `ch`; letters are drawn in upper case
pub fn glyph(ch: char) -> Glyph {
    if ch.is_whitespace() {
        return SPACE;
    }
    let key = ch.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(c, _)| *c == key)
        .map_or(MISSING, |(_, g)| *g)
}
