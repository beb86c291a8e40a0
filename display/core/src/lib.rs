//! Display Core - Headless Auto-Fit Text Display Engine
//!
//! This crate periodically pulls text from a pluggable [`Source`] and lays it
//! out on a bounded [`Surface`], picking the largest font size at which
//! nothing is clipped. It is independent of any UI framework: the terminal
//! front end lives in `textdisplay-tui`, and tests drive the engine through
//! the in-memory [`LayoutSurface`].
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Controller                            │
//! │                                                               │
//! │  TickSchedule ──fire──▶ poll ──▶ DisplayState ──▶ layout pass │
//! │        ▲                 │                          │         │
//! │        │            PollWorker                 ┌────┴─────┐   │
//! │        │           (background)                │ AutoFit  │   │
//! │        └──────────── re-arm ◀── flush ◀── ...  │Visibility│   │
//! │                                                └────┬─────┘   │
//! │  TypingMode (suspends the schedule)                 │         │
//! └─────────────────────────────────────────────────────┼─────────┘
//!                                                       ▼
//!                                        Surface (+ Measure adapter)
//! ```
//!
//! # Module Overview
//!
//! - [`geometry`]: extents and clipped bounding boxes
//! - [`font`]: font descriptors and the measurement adapter trait
//! - [`style`]: alignment, colours and per-poll style overrides
//! - [`state`]: content snapshot and display state
//! - [`surface`]: the render surface trait
//! - [`layout`]: in-memory surface with word wrap and alignment
//! - [`visibility`]: the wrap / fixed-width visibility predicate
//! - [`fit`]: the auto-fit font size search
//! - [`source`]: the source contract
//! - [`poller`]: background poll worker with timeout
//! - [`schedule`]: the re-armable tick timer
//! - [`typing`]: typing-mode state
//! - [`controller`]: the tick cycle
//! - [`config`]: TOML / environment / CLI configuration
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod controller;
pub mod fit;
pub mod font;
pub mod geometry;
pub mod layout;
pub mod poller;
pub mod schedule;
pub mod source;
pub mod state;
pub mod style;
pub mod surface;
pub mod typing;
pub mod visibility;

pub use config::{
    default_config_path, load_config_from_path, load_config_with_env, ConfigError,
    ConfigOverrides, ConfigSource, DisplayConfig, DisplayToml,
};
pub use controller::{Controller, ControllerOptions, LayoutReport, SchedulerPhase, TickReport};
pub use fit::{climb, fit, FitLimits, DEFAULT_MAX_FONT_SIZE, MIN_FONT_SIZE};
pub use font::{FontDescriptor, Measure, MonospaceMetrics, DEFAULT_FONT_FAMILY};
pub use geometry::{BoundingBox, Extent};
pub use layout::{LayoutSurface, Row};
pub use poller::{PollOutcome, PollWorker};
pub use schedule::TickSchedule;
pub use source::{FnSource, Poll, Source, SourceError};
pub use state::{ContentSnapshot, DisplayState, DEFAULT_START_SIZE};
pub use style::{Align, Colour, StyleError, StyleOverride};
pub use surface::{Surface, TextIndex};
pub use typing::TypingMode;
pub use visibility::{visible, MeasurementResult};
