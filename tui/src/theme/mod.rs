//! Theme and Colors
//!
//! Maps display colours onto ratatui colours. Everything is drawn with
//! explicit RGB so the terminal palette never changes what the user asked for.

use display_core::Colour;
use ratatui::style::{Color, Style};

/// ratatui colour for a display colour
pub fn color(colour: Colour) -> Color {
    Color::Rgb(colour.r, colour.g, colour.b)
}

/// Foreground-on-background style
pub fn style(fg: Colour, bg: Colour) -> Style {
    Style::default().fg(color(fg)).bg(color(bg))
}
