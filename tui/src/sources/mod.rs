//! Built-in Sources
//!
//! Implementations of [`display_core::Source`] the binary can run with:
//!
//! - [`StdinSource`]: lines read from standard input (the default)
//! - [`CommandSource`]: output of a shell command, re-run every tick
//! - [`Slideshow`]: a cycle of commands, each with its own style
//! - [`ClockSource`]: the local time

mod clock;
mod command;
mod slideshow;
mod stdin;

use std::path::PathBuf;

use anyhow::Context;
use display_core::Source;

pub use clock::{ClockSource, DEFAULT_CLOCK_FORMAT};
pub use command::{run_shell, CommandSource};
pub use slideshow::{Slide, Slideshow, SlideshowError};
pub use stdin::StdinSource;

/// Where display text comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceChoice {
    /// Standard input
    Stdin,
    /// A shell command
    Exec(String),
    /// A slideshow file
    Slideshow(PathBuf),
    /// The local time in a strftime pattern
    Clock(String),
}

impl SourceChoice {
    /// Build the source; `lines` only applies to stdin
    pub fn open(&self, lines: usize) -> anyhow::Result<Box<dyn Source>> {
        Ok(match self {
            Self::Stdin => Box::new(StdinSource::stdin(lines)),
            Self::Exec(command) => Box::new(CommandSource::new(command.clone())),
            Self::Slideshow(path) => Box::new(
                Slideshow::load(path)
                    .with_context(|| format!("Failed to load slideshow {}", path.display()))?,
            ),
            Self::Clock(format) => Box::new(ClockSource::new(format.clone())?),
        })
    }
}
