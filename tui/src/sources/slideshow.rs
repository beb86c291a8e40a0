//! Slideshow source
//!
//! Cycles through shell commands, each shown with its own style. Slides are
//! read from a TOML file:
//!
//! ```toml
//! [[slide]]
//! command = "uptime"
//! repeat = 20
//! delay_ms = 1000
//! align = "right"
//! wrap = true
//! colour = "lightblue"
//!
//! [[slide]]
//! command = "df -h"
//! delay_ms = 10000
//! colour = "yellow"
//! font = "ascii"
//! ```
//!
//! A slide with `repeat = n` is shown on `n` consecutive polls before the
//! next slide runs. Fields a slide leaves out keep whatever the previous
//! slide set.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use display_core::{Align, Colour, FontDescriptor, Poll, Source, SourceError, StyleOverride};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::command::run_shell;

/// Slideshow file errors
#[derive(Debug, Error)]
pub enum SlideshowError {
    /// The file could not be read
    #[error("Failed to read slideshow file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid slideshow TOML
    #[error("Failed to parse slideshow file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// No slide would ever be shown
    #[error("Slideshow has no slides")]
    Empty,
}

/// One entry of a slideshow file
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Slide {
    /// Shell command whose output is shown
    pub command: String,
    #[serde(default = "default_repeat")]
    /// Polls this slide stays up for
    pub repeat: usize,
    #[serde(default)]
    /// Update delay while shown
    pub delay_ms: Option<u64>,
    #[serde(default)]
    /// Horizontal alignment
    pub align: Option<Align>,
    #[serde(default)]
    /// Line wrap
    pub wrap: Option<bool>,
    #[serde(default)]
    /// Text colour
    pub colour: Option<Colour>,
    #[serde(default)]
    /// Font family
    pub font: Option<String>,
}

fn default_repeat() -> usize {
    1
}

impl Slide {
    /// Style fields this slide sets
    pub fn style(&self) -> StyleOverride {
        StyleOverride {
            delay: self.delay_ms.map(Duration::from_millis),
            wrap: self.wrap,
            align: self.align,
            colour: self.colour,
            font: self.font.as_deref().map(FontDescriptor::new),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SlideshowToml {
    #[serde(default, rename = "slide")]
    slides: Vec<Slide>,
}

/// Cycles through slides
#[derive(Clone, Debug)]
pub struct Slideshow {
    slides: Vec<Slide>,
    index: usize,
    shown: usize,
}

impl Slideshow {
    /// Build from slides; slides with `repeat = 0` are skipped
    pub fn new(slides: Vec<Slide>) -> Result<Self, SlideshowError> {
        let slides: Vec<Slide> = slides.into_iter().filter(|s| s.repeat > 0).collect();
        if slides.is_empty() {
            return Err(SlideshowError::Empty);
        }
        Ok(Self {
            slides,
            index: 0,
            shown: 0,
        })
    }

    /// Parse slideshow TOML
    pub fn from_toml(contents: &str) -> Result<Self, SlideshowError> {
        let file: SlideshowToml = toml::from_str(contents)?;
        Self::new(file.slides)
    }

    /// Load a slideshow file
    pub fn load(path: &Path) -> Result<Self, SlideshowError> {
        let contents = std::fs::read_to_string(path).map_err(|e| SlideshowError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }

    /// Slides in display order
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Slide the next poll will show, then advance
    fn advance(&mut self) -> &Slide {
        let current = self.index;
        self.shown += 1;
        if self.shown >= self.slides[current].repeat {
            self.shown = 0;
            self.index = (current + 1) % self.slides.len();
        }
        &self.slides[current]
    }
}

#[async_trait]
impl Source for Slideshow {
    fn name(&self) -> &str {
        "slideshow"
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        let slide = self.advance().clone();
        debug!(command = %slide.command, "Slideshow advancing");
        let text = run_shell(&slide.command).await;
        Ok(Poll::with_style(text, slide.style()))
    }
}
