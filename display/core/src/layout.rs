//! In-Memory Layout Surface
//!
//! A toolkit-free [`Surface`] that lays text out in surface units using any
//! [`Measure`] implementation. The terminal surface renders from it, and the
//! engine's tests drive it with synthetic metrics.
//!
//! Layout rules:
//! - Wrap mode breaks rows between words (first-fit); a word wider than the
//!   area is broken between characters, and every row holds at least one
//!   glyph, so a single glyph wider than the area overflows the right edge.
//! - Fixed-width mode keeps each logical line on one row.
//! - Rows are aligned individually; whitespace left at a wrap break does
//!   not count towards a row's width.

use textwrap::core::Fragment;
use textwrap::wrap_algorithms::wrap_first_fit;

use crate::font::{FontDescriptor, Measure};
use crate::geometry::{BoundingBox, Extent};
use crate::state::DEFAULT_START_SIZE;
use crate::style::{Align, Colour};
use crate::surface::{Surface, TextIndex};

/// One visual row of laid-out text
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Logical line this row belongs to
    pub line: usize,
    /// First character column (inclusive)
    pub start: usize,
    /// Last character column (exclusive)
    pub end: usize,
    /// Horizontal offset from alignment
    pub x: u32,
    /// Advance width of each glyph in `start..end`
    pub advances: Vec<u32>,
}

impl Row {
    /// Horizontal position of column `column` (must be within `start..=end`)
    #[must_use]
    pub fn column_x(&self, column: usize) -> u32 {
        let upto = column.saturating_sub(self.start).min(self.advances.len());
        self.x.saturating_add(total_width(&self.advances[..upto]))
    }
}

/// A word plus its trailing whitespace, measured for wrapping
#[derive(Debug)]
struct Word {
    start: usize,
    end: usize,
    width: f64,
    whitespace: f64,
}

impl Fragment for Word {
    fn width(&self) -> f64 {
        self.width
    }

    fn whitespace_width(&self) -> f64 {
        self.whitespace
    }

    fn penalty_width(&self) -> f64 {
        0.0
    }
}

/// Toolkit-free surface state
#[derive(Debug)]
pub struct LayoutSurface<M> {
    metrics: M,
    area: Extent,
    font: FontDescriptor,
    size: u16,
    wrap: bool,
    align: Align,
    lines: Vec<String>,
    rows: Vec<Row>,
    /// Index of the first row of each logical line
    line_rows: Vec<usize>,
    /// Rows scrolled off the top
    scroll: usize,
    text_colour: Colour,
    background: Colour,
    caret: Colour,
    dirty: bool,
}

impl<M: Measure> LayoutSurface<M> {
    /// Create an empty surface of `area` size
    pub fn new(metrics: M, area: Extent) -> Self {
        let mut surface = Self {
            metrics,
            area,
            font: FontDescriptor::default(),
            size: DEFAULT_START_SIZE,
            wrap: false,
            align: Align::Left,
            lines: vec![String::new()],
            rows: Vec::new(),
            line_rows: Vec::new(),
            scroll: 0,
            text_colour: Colour::LIGHT_GREEN,
            background: Colour::BLACK,
            caret: Colour::LIGHT_GREEN,
            dirty: true,
        };
        surface.relayout();
        surface
    }

    /// Resize the visible area; geometry updates on the next flush
    pub fn set_area(&mut self, area: Extent) {
        if self.area != area {
            self.area = area;
            self.dirty = true;
        }
    }

    /// Current font face
    pub fn font(&self) -> &FontDescriptor {
        &self.font
    }

    /// Current font size
    pub fn size(&self) -> u16 {
        self.size
    }

    /// Whether wrap mode is on
    pub fn wrap(&self) -> bool {
        self.wrap
    }

    /// Current alignment
    pub fn align(&self) -> Align {
        self.align
    }

    /// Buffer lines
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Laid-out rows as of the last flush
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Text colour
    pub fn text_colour(&self) -> Colour {
        self.text_colour
    }

    /// Background colour
    pub fn background(&self) -> Colour {
        self.background
    }

    /// Caret colour
    pub fn caret_colour(&self) -> Colour {
        self.caret
    }

    /// Height of one row at the current font
    pub fn line_height(&self) -> u32 {
        self.metrics.line_height(&self.font, self.size)
    }

    /// Top edge of row `row`, relative to the visible area
    pub fn row_top(&self, row: usize) -> i64 {
        #[allow(clippy::cast_possible_wrap)]
        let offset = row as i64 - self.scroll as i64;
        offset * i64::from(self.line_height())
    }

    /// Row holding `index`, if the index exists
    pub fn row_of(&self, index: TextIndex) -> Option<usize> {
        let first = *self.line_rows.get(index.line)?;
        let last = self
            .line_rows
            .get(index.line + 1)
            .copied()
            .unwrap_or(self.rows.len());
        let len = self.line_len(index.line);
        if index.column > len {
            return None;
        }

        (first..last)
            .find(|&r| {
                let row = &self.rows[r];
                index.column >= row.start && index.column < row.end
            })
            .or_else(|| (index.column == len).then(|| last.saturating_sub(1).max(first)))
    }

    /// Clamp `index` to a valid buffer position
    pub fn clamp(&self, index: TextIndex) -> TextIndex {
        let line = index.line.min(self.lines.len().saturating_sub(1));
        TextIndex::new(line, index.column.min(self.line_len(line)))
    }

    /// Insert `ch` at `at`; a newline splits the line
    ///
    /// Returns the index just after the inserted character.
    pub fn insert_char(&mut self, at: TextIndex, ch: char) -> TextIndex {
        let at = self.clamp(at);
        self.dirty = true;
        let line = &mut self.lines[at.line];
        let byte = byte_offset(line, at.column);

        if ch == '\n' {
            let rest = line.split_off(byte);
            self.lines.insert(at.line + 1, rest);
            return TextIndex::new(at.line + 1, 0);
        }

        line.insert(byte, ch);
        TextIndex::new(at.line, at.column + 1)
    }

    /// Delete the character before `at`, joining lines at a line start
    ///
    /// Returns the index where the caret ends up.
    pub fn delete_before(&mut self, at: TextIndex) -> TextIndex {
        let at = self.clamp(at);
        if at.column == 0 {
            if at.line == 0 {
                return at;
            }
            self.dirty = true;
            let tail = self.lines.remove(at.line);
            let prev = &mut self.lines[at.line - 1];
            let column = prev.chars().count();
            prev.push_str(&tail);
            return TextIndex::new(at.line - 1, column);
        }

        self.dirty = true;
        let line = &mut self.lines[at.line];
        let byte = byte_offset(line, at.column - 1);
        line.remove(byte);
        TextIndex::new(at.line, at.column - 1)
    }

    fn relayout(&mut self) {
        let width = self.area.width;
        self.rows.clear();
        self.line_rows.clear();

        for (line_no, line) in self.lines.iter().enumerate() {
            self.line_rows.push(self.rows.len());
            let chars: Vec<char> = line.chars().collect();
            let advances: Vec<u32> = chars
                .iter()
                .map(|&c| self.metrics.glyph_width(&self.font, self.size, c))
                .collect();

            if chars.is_empty() {
                self.rows.push(Row {
                    line: line_no,
                    start: 0,
                    end: 0,
                    x: self.align.offset(width, 0),
                    advances: Vec::new(),
                });
                continue;
            }

            let spans = if self.wrap {
                wrap_spans(&chars, &advances, width)
            } else {
                vec![(0, chars.len())]
            };

            for (start, end) in spans {
                // Whitespace at a wrap break hangs off the row; at the end of
                // the line it is real content and takes part in alignment
                let used = if end == chars.len() {
                    total_width(&advances[start..end])
                } else {
                    trimmed_width(&chars[start..end], &advances[start..end])
                };
                self.rows.push(Row {
                    line: line_no,
                    start,
                    end,
                    x: self.align.offset(width, used),
                    advances: advances[start..end].to_vec(),
                });
            }
        }

        self.scroll = self.scroll.min(self.rows.len().saturating_sub(1));
        self.dirty = false;
    }
}

impl<M: Measure> Surface for LayoutSurface<M> {
    fn area(&self) -> Extent {
        self.area
    }

    fn metrics(&self) -> &dyn Measure {
        &self.metrics
    }

    fn apply_font(&mut self, font: &FontDescriptor, size: u16) {
        let size = size.max(1);
        if &self.font != font || self.size != size {
            self.font = font.clone();
            self.size = size;
            self.dirty = true;
        }
    }

    fn set_wrap(&mut self, wrap: bool) {
        if self.wrap != wrap {
            self.wrap = wrap;
            self.dirty = true;
        }
    }

    fn set_align(&mut self, align: Align) {
        if self.align != align {
            self.align = align;
            self.dirty = true;
        }
    }

    fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.dirty = true;
    }

    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.chars().count())
    }

    fn prepend_blank_lines(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        self.lines
            .splice(0..0, std::iter::repeat(String::new()).take(count));
        self.dirty = true;
    }

    fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    fn bbox(&self, index: TextIndex) -> Option<BoundingBox> {
        let row_index = self.row_of(index)?;
        let row = &self.rows[row_index];
        let width = index
            .column
            .checked_sub(row.start)
            .and_then(|i| row.advances.get(i))
            .copied()
            .unwrap_or(0);

        let top = i32::try_from(self.row_top(row_index)).ok()?;
        let left = i32::try_from(row.column_x(index.column)).ok()?;
        BoundingBox::new(left, top, width, self.line_height()).clip_to(self.area)
    }

    fn set_colours(&mut self, text: Colour, background: Colour) {
        self.text_colour = text;
        self.background = background;
    }

    fn set_caret_colour(&mut self, caret: Colour) {
        self.caret = caret;
    }

    fn flush(&mut self) {
        if self.dirty {
            self.relayout();
        }
    }
}

/// Byte offset of character column `column` in `line`
fn byte_offset(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(byte, _)| byte)
}

/// Sum of advances, saturating at `u32::MAX`
fn total_width(advances: &[u32]) -> u32 {
    advances.iter().fold(0, |acc, &a| acc.saturating_add(a))
}

/// Width of a row ignoring trailing whitespace
fn trimmed_width(chars: &[char], advances: &[u32]) -> u32 {
    let visible = chars
        .iter()
        .rposition(|c| !c.is_whitespace())
        .map_or(0, |i| i + 1);
    total_width(&advances[..visible])
}

/// Break one logical line into `(start, end)` character spans no wider than
/// `width` where possible
fn wrap_spans(chars: &[char], advances: &[u32], width: u32) -> Vec<(usize, usize)> {
    let mut words = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        while i < chars.len() && !chars[i].is_whitespace() {
            i += 1;
        }
        let word_end = i;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }
        push_word(&mut words, advances, start, word_end, i, width);
    }

    let line_widths = [f64::from(width)];
    wrap_first_fit(&words, &line_widths)
        .into_iter()
        .filter_map(|row| Some((row.first()?.start, row.last()?.end)))
        .collect()
}

/// Push a word, breaking it between characters when it cannot fit a row
fn push_word(
    words: &mut Vec<Word>,
    advances: &[u32],
    start: usize,
    word_end: usize,
    end: usize,
    width: u32,
) {
    let sum = |from: usize, to: usize| total_width(&advances[from..to]);
    let whitespace = f64::from(sum(word_end, end));

    if sum(start, word_end) <= width {
        words.push(Word {
            start,
            end,
            width: f64::from(sum(start, word_end)),
            whitespace,
        });
        return;
    }

    let mut piece_start = start;
    let mut piece_width = 0u32;
    for col in start..word_end {
        let advance = advances[col];
        if col > piece_start && piece_width.saturating_add(advance) > width {
            words.push(Word {
                start: piece_start,
                end: col,
                width: f64::from(piece_width),
                whitespace: 0.0,
            });
            piece_start = col;
            piece_width = 0;
        }
        piece_width = piece_width.saturating_add(advance);
    }
    words.push(Word {
        start: piece_start,
        end,
        width: f64::from(piece_width),
        whitespace,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::MonospaceMetrics;
    use pretty_assertions::assert_eq;

    fn surface(width: u32, height: u32) -> LayoutSurface<MonospaceMetrics> {
        let mut s = LayoutSurface::new(MonospaceMetrics::new(1, 1), Extent::new(width, height));
        s.apply_font(&FontDescriptor::default(), 1);
        s
    }

    fn spans(s: &LayoutSurface<MonospaceMetrics>) -> Vec<(usize, usize, usize)> {
        s.rows().iter().map(|r| (r.line, r.start, r.end)).collect()
    }

    #[test]
    fn test_nowrap_one_row_per_line() {
        let mut s = surface(4, 10);
        s.set_text("hello world\nab");
        s.flush();
        assert_eq!(spans(&s), vec![(0, 0, 11), (1, 0, 2)]);
    }

    #[test]
    fn test_wrap_breaks_between_words() {
        let mut s = surface(6, 10);
        s.set_wrap(true);
        s.set_text("aa bb cc");
        s.flush();
        // "aa bb " fits in 6 once trailing space is ignored
        assert_eq!(spans(&s), vec![(0, 0, 6), (0, 6, 8)]);
    }

    #[test]
    fn test_wrap_breaks_long_word_per_character() {
        let mut s = surface(3, 10);
        s.set_wrap(true);
        s.set_text("abcdefg");
        s.flush();
        assert_eq!(spans(&s), vec![(0, 0, 3), (0, 3, 6), (0, 6, 7)]);
    }

    #[test]
    fn test_wrap_keeps_one_glyph_per_row_when_too_narrow() {
        let mut s = LayoutSurface::new(MonospaceMetrics::new(5, 1), Extent::new(3, 10));
        s.apply_font(&FontDescriptor::default(), 1);
        s.set_wrap(true);
        s.set_text("ab");
        s.flush();
        assert_eq!(spans(&s), vec![(0, 0, 1), (0, 1, 2)]);
    }

    #[test]
    fn test_bbox_clipped_and_offscreen() {
        let mut s = surface(10, 2);
        s.set_text("a\nb\nc");
        s.flush();
        assert_eq!(s.bbox(TextIndex::new(0, 0)), Some(BoundingBox::new(0, 0, 1, 1)));
        assert_eq!(s.bbox(TextIndex::new(1, 0)), Some(BoundingBox::new(0, 1, 1, 1)));
        assert_eq!(s.bbox(TextIndex::new(2, 0)), None);
        assert_eq!(s.bbox(TextIndex::new(7, 0)), None);
    }

    #[test]
    fn test_end_bbox_is_zero_width_slot() {
        let mut s = surface(10, 5);
        s.set_text("abc");
        s.flush();
        assert_eq!(s.end_bbox(), Some(BoundingBox::new(3, 0, 0, 1)));
    }

    #[test]
    fn test_alignment_offsets_rows() {
        let mut s = surface(10, 5);
        s.set_align(Align::Right);
        s.set_text("abc\nabcdef  ");
        s.flush();
        assert_eq!(s.rows()[0].x, 7);
        assert_eq!(s.rows()[1].x, 2);

        s.set_align(Align::Center);
        s.flush();
        assert_eq!(s.rows()[0].x, 3);
    }

    #[test]
    fn test_wrap_break_whitespace_ignored_for_alignment() {
        let mut s = surface(6, 5);
        s.set_wrap(true);
        s.set_align(Align::Right);
        s.set_text("abcd ef");
        s.flush();
        assert_eq!(spans(&s), vec![(0, 0, 5), (0, 5, 7)]);
        assert_eq!(s.rows()[0].x, 2);
        assert_eq!(s.rows()[1].x, 4);
    }

    #[test]
    fn test_prepend_blank_lines() {
        let mut s = surface(10, 5);
        s.set_text("x");
        s.prepend_blank_lines(2);
        s.flush();
        assert_eq!(s.text(), "\n\nx");
        assert_eq!(s.bbox(TextIndex::new(2, 0)), Some(BoundingBox::new(0, 2, 1, 1)));
    }

    #[test]
    fn test_editing_primitives() {
        let mut s = surface(10, 5);
        s.set_text("ab");
        let at = s.insert_char(TextIndex::new(0, 1), 'x');
        assert_eq!(at, TextIndex::new(0, 2));
        assert_eq!(s.text(), "axb");

        let at = s.insert_char(at, '\n');
        assert_eq!(at, TextIndex::new(1, 0));
        assert_eq!(s.text(), "ax\nb");

        let at = s.delete_before(at);
        assert_eq!(at, TextIndex::new(0, 2));
        assert_eq!(s.text(), "axb");

        let at = s.delete_before(TextIndex::new(0, 1));
        assert_eq!(at, TextIndex::new(0, 0));
        assert_eq!(s.text(), "xb");
        assert_eq!(s.delete_before(at), TextIndex::new(0, 0));
    }

    #[test]
    fn test_geometry_is_stale_until_flush() {
        let mut s = surface(10, 5);
        s.set_text("a");
        s.flush();
        s.set_text("a\nb");
        assert_eq!(s.bbox(TextIndex::new(1, 0)), None);
        s.flush();
        assert!(s.bbox(TextIndex::new(1, 0)).is_some());
    }

    #[test]
    fn test_huge_font_long_line_saturates() {
        let mut s = LayoutSurface::new(MonospaceMetrics::new(1, 1), Extent::new(200, 100));
        s.apply_font(&FontDescriptor::default(), u16::MAX);
        s.set_align(Align::Right);
        s.set_wrap(false);
        s.set_text(&"x".repeat(70_000));
        s.flush();

        let row = &s.rows()[0];
        assert_eq!(row.x, 0);
        assert_eq!(row.column_x(70_000), u32::MAX);

        s.set_wrap(true);
        s.flush();
        assert_eq!(s.rows().len(), 70_000);
    }
}
