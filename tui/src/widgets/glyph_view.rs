//! GlyphView Widget
//!
//! Draws laid-out text as scaled block glyphs. Rows come from the layout as
//! of its last flush; anything outside the render area is clipped.

use display_core::{LayoutSurface, Measure, TextIndex};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::Widget;

use crate::font::{cell_width, glyph, Glyph, GlyphStyle};
use crate::theme;

/// Renders a [`LayoutSurface`] with block glyphs
pub struct GlyphView<'a, M> {
    layout: &'a LayoutSurface<M>,
    caret: Option<TextIndex>,
}

impl<'a, M: Measure> GlyphView<'a, M> {
    /// View over `layout` without a caret
    pub fn new(layout: &'a LayoutSurface<M>) -> Self {
        Self {
            layout,
            caret: None,
        }
    }

    /// Draw a caret bar at `index`
    pub fn caret(mut self, index: TextIndex) -> Self {
        self.caret = Some(index);
        self
    }
}

/// Scaled glyph placement
struct Pen {
    style: GlyphStyle,
    size: u32,
}

impl Pen {
    /// Character for cell `(cx, cy)` of `glyph` drawn `wide` cells wide
    fn cell(&self, glyph: Glyph, cx: u32, cy: u32, wide: u32) -> char {
        let px = cx / (self.style.pixel_columns() * self.size * wide.max(1));
        match self.style {
            GlyphStyle::HalfBlock => {
                let top = glyph.pixel(px, (2 * cy) / self.size);
                let bottom = glyph.pixel(px, (2 * cy + 1) / self.size);
                match (top, bottom) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                }
            }
            GlyphStyle::Hash => {
                if glyph.pixel(px, cy / self.size) {
                    '#'
                } else {
                    ' '
                }
            }
        }
    }
}

impl<M: Measure> Widget for GlyphView<'_, M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout;
        let style = theme::style(layout.text_colour(), layout.background());
        buf.set_style(area, style);

        let pen = Pen {
            style: GlyphStyle::resolve(layout.font()),
            size: u32::from(layout.size().max(1)),
        };
        let line_height = i64::from(layout.line_height());
        let lines = layout.lines();

        for (row_index, row) in layout.rows().iter().enumerate() {
            let top = layout.row_top(row_index);
            if top >= i64::from(area.height) || top + line_height <= 0 {
                continue;
            }
            let Some(line) = lines.get(row.line) else {
                continue;
            };

            for (offset, ch) in line.chars().skip(row.start).take(row.end - row.start).enumerate() {
                let left = i64::from(row.column_x(row.start + offset));
                let advance = row.advances.get(offset).copied().unwrap_or(0);
                let g = glyph(ch);
                if g.is_blank() {
                    continue;
                }
                draw_glyph(buf, area, style, &pen, g, (left, top), (advance, line_height), cell_width(ch));
            }
        }

        if let Some(index) = self.caret {
            draw_caret(buf, area, layout, index);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn draw_glyph(
    buf: &mut Buffer,
    area: Rect,
    style: Style,
    pen: &Pen,
    g: Glyph,
    (left, top): (i64, i64),
    (advance, height): (u32, i64),
    wide: u32,
) {
    for cy in 0..height {
        let y = top + cy;
        if y < 0 || y >= i64::from(area.height) {
            continue;
        }
        for cx in 0..i64::from(advance) {
            let x = left + cx;
            if x < 0 || x >= i64::from(area.width) {
                continue;
            }
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let ch = pen.cell(g, cx as u32, cy as u32, wide);
            if ch == ' ' {
                continue;
            }
            if let Some(cell) = buf.cell_mut(cell_at(area, x, y)) {
                cell.set_char(ch).set_style(style);
            }
        }
    }
}

/// Buffer position of an in-area offset
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn cell_at(area: Rect, x: i64, y: i64) -> (u16, u16) {
    (area.x + x as u16, area.y + y as u16)
}

/// One-column bar at the caret, drawn in the caret colour
fn draw_caret<M: Measure>(buf: &mut Buffer, area: Rect, layout: &LayoutSurface<M>, index: TextIndex) {
    let index = layout.clamp(index);
    let Some(row_index) = layout.row_of(index) else {
        return;
    };
    let Some(row) = layout.rows().get(row_index) else {
        return;
    };

    let x = i64::from(row.column_x(index.column));
    let top = layout.row_top(row_index);
    let caret = theme::color(layout.caret_colour());

    if x < 0 || x >= i64::from(area.width) {
        return;
    }
    for cy in 0..i64::from(layout.line_height()) {
        let y = top + cy;
        if y < 0 || y >= i64::from(area.height) {
            continue;
        }
        if let Some(cell) = buf.cell_mut(cell_at(area, x, y)) {
            cell.set_bg(caret);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BlockMetrics;
    use display_core::{Colour, Extent, FontDescriptor, Surface};
    use ratatui::style::Color;

    fn rendered(text: &str, font: &str, size: u16, width: u16, height: u16) -> Buffer {
        let mut layout = LayoutSurface::new(BlockMetrics, Extent::new(u32::from(width), u32::from(height)));
        layout.apply_font(&FontDescriptor::new(font), size);
        layout.set_text(text);
        layout.flush();

        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        GlyphView::new(&layout).render(area, &mut buf);
        buf
    }

    fn row_string(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_half_block_digit_one() {
        // '1' rows: " X ", "XX ", " X ", " X ", "XXX", then the gap row
        let buf = rendered("1", "block", 1, 4, 3);
        assert_eq!(row_string(&buf, 0), "▄█  ");
        assert_eq!(row_string(&buf, 1), " █  ");
        assert_eq!(row_string(&buf, 2), "▀▀▀ ");
    }

    #[test]
    fn test_hash_style_doubles_columns() {
        let buf = rendered("-", "ascii", 1, 8, 6);
        assert_eq!(row_string(&buf, 2), "######  ");
        assert_eq!(row_string(&buf, 0), "        ");
    }

    #[test]
    fn test_clipped_glyph_does_not_panic() {
        let buf = rendered("888", "block", 2, 10, 3);
        assert_eq!(buf.area.width, 10);
    }

    #[test]
    fn test_background_fills_area() {
        let buf = rendered("", "block", 1, 3, 2);
        assert_eq!(buf[(2, 1)].bg, Color::Rgb(0, 0, 0));
        assert_eq!(buf[(2, 1)].fg, theme::color(Colour::LIGHT_GREEN));
    }

    #[test]
    fn test_caret_drawn_in_caret_colour() {
        let mut layout = LayoutSurface::new(BlockMetrics, Extent::new(12, 3));
        layout.apply_font(&FontDescriptor::default(), 1);
        layout.set_text("ab");
        layout.set_caret_colour(Colour::rgb(255, 0, 0));
        layout.flush();

        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        GlyphView::new(&layout)
            .caret(TextIndex::new(0, 2))
            .render(area, &mut buf);

        assert_eq!(buf[(8, 0)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(8, 2)].bg, Color::Rgb(255, 0, 0));
        assert_eq!(buf[(7, 0)].bg, Color::Rgb(0, 0, 0));
    }
}
