//! Terminal Surface
//!
//! The [`Surface`] the display draws on: an in-memory layout measured in
//! terminal cells with block-glyph metrics, plus the editing caret used in
//! typing mode. Rendering happens in [`GlyphView`](crate::widgets::GlyphView).

use display_core::{
    Align, BoundingBox, Colour, Extent, FontDescriptor, LayoutSurface, Measure, Surface, TextIndex,
};
use tracing::warn;

use crate::font::{BlockMetrics, GlyphStyle};

/// Caret movement in typing mode
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorMove {
    /// One character back, wrapping to the previous line
    Left,
    /// One character forward, wrapping to the next line
    Right,
    /// Previous line, same column where possible
    Up,
    /// Next line, same column where possible
    Down,
    /// Start of line
    Home,
    /// End of line
    End,
}

/// Layout plus caret
#[derive(Debug)]
pub struct TerminalSurface {
    layout: LayoutSurface<BlockMetrics>,
    cursor: TextIndex,
    warned_family: Option<String>,
}

impl TerminalSurface {
    /// Create a surface covering `area` cells
    pub fn new(area: Extent) -> Self {
        Self {
            layout: LayoutSurface::new(BlockMetrics, area),
            cursor: TextIndex::default(),
            warned_family: None,
        }
    }

    /// Laid-out content
    pub fn layout(&self) -> &LayoutSurface<BlockMetrics> {
        &self.layout
    }

    /// Caret position
    pub fn cursor(&self) -> TextIndex {
        self.cursor
    }

    /// Change the area; takes effect at the next flush
    pub fn resize(&mut self, area: Extent) {
        self.layout.set_area(area);
    }

    /// Type a character at the caret (`'\n'` splits the line)
    pub fn insert(&mut self, ch: char) {
        self.cursor = self.layout.insert_char(self.cursor, ch);
        self.layout.flush();
    }

    /// Delete the character before the caret
    pub fn backspace(&mut self) {
        self.cursor = self.layout.delete_before(self.cursor);
        self.layout.flush();
    }

    /// Move the caret
    pub fn move_cursor(&mut self, movement: CursorMove) {
        let at = self.layout.clamp(self.cursor);
        let last_line = self.layout.line_count().saturating_sub(1);

        self.cursor = match movement {
            CursorMove::Left if at.column > 0 => TextIndex::new(at.line, at.column - 1),
            CursorMove::Left if at.line > 0 => {
                TextIndex::new(at.line - 1, self.layout.line_len(at.line - 1))
            }
            CursorMove::Right if at.column < self.layout.line_len(at.line) => {
                TextIndex::new(at.line, at.column + 1)
            }
            CursorMove::Right if at.line < last_line => TextIndex::new(at.line + 1, 0),
            CursorMove::Up if at.line > 0 => {
                self.layout.clamp(TextIndex::new(at.line - 1, at.column))
            }
            CursorMove::Down if at.line < last_line => {
                self.layout.clamp(TextIndex::new(at.line + 1, at.column))
            }
            CursorMove::Home => TextIndex::new(at.line, 0),
            CursorMove::End => TextIndex::new(at.line, self.layout.line_len(at.line)),
            _ => at,
        };
    }

    fn end_of_buffer(&self) -> TextIndex {
        let line = self.layout.line_count().saturating_sub(1);
        TextIndex::new(line, self.layout.line_len(line))
    }
}

impl Surface for TerminalSurface {
    fn area(&self) -> Extent {
        self.layout.area()
    }

    fn metrics(&self) -> &dyn Measure {
        self.layout.metrics()
    }

    fn apply_font(&mut self, font: &FontDescriptor, size: u16) {
        if GlyphStyle::from_family(&font.family).is_none()
            && self.warned_family.as_deref() != Some(font.family.as_str())
        {
            warn!(family = %font.family, "Unknown font family, drawing with block glyphs");
            self.warned_family = Some(font.family.clone());
        }
        self.layout.apply_font(font, size);
    }

    fn set_wrap(&mut self, wrap: bool) {
        self.layout.set_wrap(wrap);
    }

    fn set_align(&mut self, align: Align) {
        self.layout.set_align(align);
    }

    fn set_text(&mut self, text: &str) {
        self.layout.set_text(text);
        self.cursor = self.end_of_buffer();
    }

    fn text(&self) -> String {
        self.layout.text()
    }

    fn line_count(&self) -> usize {
        self.layout.line_count()
    }

    fn line_len(&self, line: usize) -> usize {
        self.layout.line_len(line)
    }

    fn prepend_blank_lines(&mut self, count: usize) {
        self.layout.prepend_blank_lines(count);
        self.cursor.line += count;
    }

    fn scroll_to_top(&mut self) {
        self.layout.scroll_to_top();
    }

    fn bbox(&self, index: TextIndex) -> Option<BoundingBox> {
        self.layout.bbox(index)
    }

    fn set_colours(&mut self, text: Colour, background: Colour) {
        self.layout.set_colours(text, background);
    }

    fn set_caret_colour(&mut self, caret: Colour) {
        self.layout.set_caret_colour(caret);
    }

    fn flush(&mut self) {
        self.layout.flush();
    }
}
