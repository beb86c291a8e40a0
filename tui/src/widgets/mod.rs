//! Custom Widgets

mod glyph_view;

pub use glyph_view::GlyphView;
