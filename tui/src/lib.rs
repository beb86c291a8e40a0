//! textdisplay - big, auto-fitted text in the terminal
//!
//! Shows whatever a source produces (stdin, a command, a slideshow, the
//! clock) as large block-glyph text, sized to fill the terminal and
//! refreshed on a timer.
//!
//! # Architecture
//!
//! - **App**: event loop over terminal events, the tick schedule and the
//!   background poll worker
//! - **Surface**: [`display_core::Surface`] over an in-memory layout measured
//!   in terminal cells, plus the typing-mode caret
//! - **Font**: block-glyph bitmaps and their metrics
//! - **Widgets**: renders the laid-out glyphs
//! - **Sources**: built-in text sources
//!
//! Fitting, scheduling and typing mode live in `display_core`.

pub mod app;
pub mod cli;
pub mod font;
pub mod install;
pub mod sources;
pub mod surface;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use cli::Cli;
pub use sources::SourceChoice;
