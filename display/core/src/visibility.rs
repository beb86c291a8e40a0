//! Visibility Predicate
//!
//! Decides whether the content currently laid out on a surface is fully
//! visible at a font size. Two modes:
//!
//! - **Wrap mode**: each line must have its first glyph's row fully inside
//!   the area, and its last glyph fully inside both axes. The scan stops at
//!   the first clipped row (everything below is clipped too) and aborts on
//!   the first line whose last glyph is clipped.
//! - **Fixed-width mode**: rows are ignored. The line with the most
//!   characters (first one on ties) is measured and compared with the area
//!   width. Character count, not pixel width, picks the candidate, so a line
//!   of double-width glyphs can be misjudged. This is deliberate.

use crate::font::FontDescriptor;
use crate::surface::{Surface, TextIndex};

/// Two-axis verdict for the current content
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeasurementResult {
    /// Every scanned row is vertically inside the area
    pub rows_visible: bool,
    /// Every scanned line ends inside the area
    pub columns_visible: bool,
}

impl MeasurementResult {
    /// Fully visible on both axes
    pub const VISIBLE: Self = Self {
        rows_visible: true,
        columns_visible: true,
    };

    /// Whether the content fits without clipping
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.rows_visible && self.columns_visible
    }
}

/// Evaluate visibility of `content` as laid out on `surface`
///
/// `content` must be the surface's buffer text, and `font`/`size` must be the
/// font currently applied and flushed; line numbers and geometry are read
/// straight from the surface.
pub fn visible<S: Surface + ?Sized>(
    surface: &S,
    content: &str,
    font: &FontDescriptor,
    size: u16,
    wrap: bool,
) -> MeasurementResult {
    if wrap {
        wrapped(surface, content, font, size)
    } else {
        fixed_width(surface, content, font, size)
    }
}

fn wrapped<S: Surface + ?Sized>(
    surface: &S,
    content: &str,
    font: &FontDescriptor,
    size: u16,
) -> MeasurementResult {
    let metrics = surface.metrics();
    let line_space = metrics.line_height(font, size);
    let mut result = MeasurementResult::VISIBLE;

    for (line_no, line) in content.split('\n').enumerate() {
        let row_visible = surface
            .bbox(TextIndex::new(line_no, 0))
            .is_some_and(|b| b.height >= line_space);
        if !row_visible {
            result.rows_visible = false;
            break;
        }

        let Some(last) = line.chars().last() else {
            continue;
        };
        let last_column = line.chars().count() - 1;
        let glyph_width = metrics.glyph_width(font, size, last);
        let column_visible = surface
            .bbox(TextIndex::new(line_no, last_column))
            .is_some_and(|b| b.width >= glyph_width && b.height >= line_space);
        if !column_visible {
            result.columns_visible = false;
            break;
        }
    }

    result
}

fn fixed_width<S: Surface + ?Sized>(
    surface: &S,
    content: &str,
    font: &FontDescriptor,
    size: u16,
) -> MeasurementResult {
    let mut widest = "";
    let mut widest_chars = 0;
    for line in content.split('\n') {
        let chars = line.chars().count();
        if chars > widest_chars {
            widest = line;
            widest_chars = chars;
        }
    }

    let width = surface.metrics().measure(font, size, widest);
    MeasurementResult {
        rows_visible: true,
        columns_visible: width <= surface.area().width,
    }
}
