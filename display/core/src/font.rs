//! Font Descriptors and Measurement
//!
//! The engine never rasterises text itself. It asks a [`Measure`]
//! implementation (supplied by the surface toolkit) how wide a string is and
//! how tall a line is at a given size.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Family name used when nothing else is configured
pub const DEFAULT_FONT_FAMILY: &str = "block";

/// A font face, resolved by the surface that renders it
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FontDescriptor {
    /// Family name (surface-specific)
    pub family: String,
}

impl FontDescriptor {
    /// Create a descriptor for a family
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: family.into(),
        }
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY)
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.family)
    }
}

impl From<&str> for FontDescriptor {
    fn from(family: &str) -> Self {
        Self::new(family)
    }
}

/// Font metrics supplied by the host toolkit
///
/// Implementations must return identical results for identical inputs; the
/// auto-fit search relies on that for determinism.
pub trait Measure {
    /// Height of one line of text (the toolkit's "linespace")
    fn line_height(&self, font: &FontDescriptor, size: u16) -> u32;

    /// Advance width of `text` rendered on a single line
    fn measure(&self, font: &FontDescriptor, size: u16, text: &str) -> u32;

    /// Advance width of a single character
    fn glyph_width(&self, font: &FontDescriptor, size: u16, ch: char) -> u32 {
        let mut buf = [0u8; 4];
        self.measure(font, size, ch.encode_utf8(&mut buf))
    }
}

impl<M: Measure + ?Sized> Measure for &M {
    fn line_height(&self, font: &FontDescriptor, size: u16) -> u32 {
        (**self).line_height(font, size)
    }

    fn measure(&self, font: &FontDescriptor, size: u16, text: &str) -> u32 {
        (**self).measure(font, size, text)
    }
}

/// Fixed-pitch metrics: every glyph is `advance * size` wide and each line
/// is `line * size` tall
///
/// Useful for headless runs and as a synthetic measurement stub in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonospaceMetrics {
    /// Advance per glyph at size 1
    pub advance: u32,
    /// Line height at size 1
    pub line: u32,
}

impl MonospaceMetrics {
    /// Create fixed-pitch metrics
    #[must_use]
    pub const fn new(advance: u32, line: u32) -> Self {
        Self { advance, line }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(1, 2)
    }
}

impl Measure for MonospaceMetrics {
    fn line_height(&self, _font: &FontDescriptor, size: u16) -> u32 {
        self.line * u32::from(size)
    }

    fn measure(&self, _font: &FontDescriptor, size: u16, text: &str) -> u32 {
        let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
        chars.saturating_mul(self.advance * u32::from(size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_scales_with_size() {
        let m = MonospaceMetrics::new(2, 3);
        let font = FontDescriptor::default();
        assert_eq!(m.measure(&font, 1, "abc"), 6);
        assert_eq!(m.measure(&font, 4, "abc"), 24);
        assert_eq!(m.line_height(&font, 5), 15);
        assert_eq!(m.glyph_width(&font, 3, 'x'), 6);
    }

    #[test]
    fn test_descriptor_display() {
        assert_eq!(FontDescriptor::new("hash").to_string(), "hash");
        assert_eq!(FontDescriptor::default().family, DEFAULT_FONT_FAMILY);
    }
}
