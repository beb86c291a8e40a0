//! Local clock source

use std::fmt::Write;

use async_trait::async_trait;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use display_core::{Poll, Source, SourceError};

/// Hours and minutes
pub const DEFAULT_CLOCK_FORMAT: &str = "%H:%M";

/// Formats the local time with a strftime pattern
#[derive(Clone, Debug)]
pub struct ClockSource {
    format: String,
}

impl ClockSource {
    /// Create a clock, rejecting patterns chrono cannot format
    pub fn new(format: impl Into<String>) -> Result<Self, SourceError> {
        let format = format.into();
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(SourceError::Failed(format!(
                "invalid clock format: {format:?}"
            )));
        }
        Ok(Self { format })
    }

    /// The strftime pattern
    pub fn format(&self) -> &str {
        &self.format
    }
}

impl Default for ClockSource {
    fn default() -> Self {
        Self {
            format: DEFAULT_CLOCK_FORMAT.to_string(),
        }
    }
}

#[async_trait]
impl Source for ClockSource {
    fn name(&self) -> &str {
        "clock"
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        let mut text = String::new();
        write!(text, "{}", Local::now().format(&self.format))
            .map_err(|_| SourceError::Failed(format!("cannot format {:?}", self.format)))?;
        Ok(Poll::text(text))
    }
}
