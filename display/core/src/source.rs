//! Source Contract
//!
//! A source produces the text to display, optionally with a style override.
//! The core never retries or substitutes text on failure: sources are
//! expected to catch their own I/O problems and return placeholder text,
//! and anything they do return as an error is surfaced to the caller.

use async_trait::async_trait;
use thiserror::Error;

use crate::style::StyleOverride;

/// One poll result
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poll {
    /// Raw text (trimmed by the caller before storage)
    pub text: String,
    /// Style fields to apply, if any
    pub style: Option<StyleOverride>,
}

impl Poll {
    /// A poll carrying text only
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: None,
        }
    }

    /// A poll carrying text and a style override
    pub fn with_style(text: impl Into<String>, style: StyleOverride) -> Self {
        Self {
            text: text.into(),
            style: Some(style),
        }
    }

    /// Whether the text is empty after trimming
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl From<String> for Poll {
    fn from(text: String) -> Self {
        Self::text(text)
    }
}

impl From<&str> for Poll {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

/// Errors a source may surface
#[derive(Debug, Error)]
pub enum SourceError {
    /// Underlying read failed
    #[error("source I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Source-specific failure
    #[error("source failed: {0}")]
    Failed(String),
}

/// Something that can be polled for display text
#[async_trait]
pub trait Source: Send {
    /// Short name for logs
    fn name(&self) -> &str {
        "source"
    }

    /// Produce the next text to display
    async fn poll(&mut self) -> Result<Poll, SourceError>;
}

/// Adapts a zero-argument closure into a [`Source`]
pub struct FnSource<F> {
    name: String,
    f: F,
}

impl<F> FnSource<F>
where
    F: FnMut() -> Result<Poll, SourceError> + Send,
{
    /// Wrap `f`
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F> Source for FnSource<F>
where
    F: FnMut() -> Result<Poll, SourceError> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        (self.f)()
    }
}

#[async_trait]
impl<T: Source + ?Sized> Source for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn poll(&mut self) -> Result<Poll, SourceError> {
        (**self).poll().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Align;

    #[tokio::test]
    async fn test_fn_source_yields_closure_output() {
        let mut n = 0;
        let mut source = FnSource::new("counter", move || {
            n += 1;
            Ok(Poll::text(format!("tick {n}")))
        });

        assert_eq!(source.name(), "counter");
        assert_eq!(source.poll().await.map(|p| p.text).ok(), Some("tick 1".into()));
        assert_eq!(source.poll().await.map(|p| p.text).ok(), Some("tick 2".into()));
    }

    #[tokio::test]
    async fn test_fn_source_propagates_errors() {
        let mut source = FnSource::new("broken", || Err(SourceError::Failed("nope".into())));
        let err = source.poll().await.unwrap_err();
        assert_eq!(err.to_string(), "source failed: nope");
    }

    #[tokio::test]
    async fn test_boxed_source_delegates() {
        let mut source: Box<dyn Source> = Box::new(FnSource::new("boxed", || {
            Ok(Poll::with_style("x", StyleOverride::new().with_align(Align::Right)))
        }));
        assert_eq!(source.name(), "boxed");
        let poll = source.poll().await.unwrap();
        assert_eq!(poll.style.and_then(|s| s.align), Some(Align::Right));
    }

    #[test]
    fn test_poll_from_string_has_no_style() {
        let poll = Poll::from(String::from("plain"));
        assert_eq!(poll.style, None);
        assert!(!poll.is_blank());
        assert!(Poll::from(" \n").is_blank());
    }
}
