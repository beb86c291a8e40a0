//! Surface Abstraction
//!
//! The engine drives a render surface through this trait and never touches
//! a toolkit directly. A surface owns a text buffer, lays it out with the
//! current font, and answers geometry queries about the result.
//!
//! # Geometry contract
//!
//! [`Surface::bbox`] reports the box of a glyph clipped to the visible area.
//! A glyph that is entirely off-surface yields `None`; callers treat that as
//! "not visible", never as an error. Geometry reflects the layout as of the
//! last [`Surface::flush`].

use crate::font::{FontDescriptor, Measure};
use crate::geometry::{BoundingBox, Extent};
use crate::style::{Align, Colour};

/// Position in the buffer: logical line and character column
///
/// `column` may equal the line's length to address the end-of-line slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TextIndex {
    /// Logical line (0-based)
    pub line: usize,
    /// Character column (0-based)
    pub column: usize,
}

impl TextIndex {
    /// Create an index
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The surface collaborator
pub trait Surface {
    /// Visible render area
    fn area(&self) -> Extent;

    /// Metrics used by this surface's layout
    fn metrics(&self) -> &dyn Measure;

    /// Render with `font` at `size`
    fn apply_font(&mut self, font: &FontDescriptor, size: u16);

    /// Switch between wrapped (true) and fixed-width (false) layout
    fn set_wrap(&mut self, wrap: bool);

    /// Set horizontal alignment
    fn set_align(&mut self, align: Align);

    /// Clear the buffer and insert `text`
    fn set_text(&mut self, text: &str);

    /// Current buffer contents
    fn text(&self) -> String;

    /// Number of logical lines in the buffer (at least 1)
    fn line_count(&self) -> usize;

    /// Number of characters on `line` (0 when out of range)
    fn line_len(&self, line: usize) -> usize;

    /// Insert `count` empty lines before the first line
    fn prepend_blank_lines(&mut self, count: usize);

    /// Scroll so the start of the buffer is at the top of the area
    fn scroll_to_top(&mut self);

    /// Clipped box of the glyph at `index`, or `None` when off-surface
    fn bbox(&self, index: TextIndex) -> Option<BoundingBox>;

    /// Apply text and background colours to the whole buffer
    fn set_colours(&mut self, text: Colour, background: Colour);

    /// Colour of the insertion caret
    fn set_caret_colour(&mut self, caret: Colour);

    /// Recompute pending layout so geometry queries are current
    fn flush(&mut self);

    /// Box of the end-of-buffer slot (just after the last character)
    fn end_bbox(&self) -> Option<BoundingBox> {
        let line = self.line_count().saturating_sub(1);
        self.bbox(TextIndex::new(line, self.line_len(line)))
    }
}
