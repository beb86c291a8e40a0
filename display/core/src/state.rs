//! Display State
//!
//! The single mutable record that persists across ticks: what text is shown
//! and how. It is owned by the [`Controller`](crate::controller::Controller)
//! and only mutated inside a tick.

use std::time::Duration;

use crate::font::FontDescriptor;
use crate::source::Poll;
use crate::style::{Align, Colour, StyleOverride};

/// Font size used as the starting point of the auto-fit search
pub const DEFAULT_START_SIZE: u16 = 12;

/// The text currently on display
///
/// Always stored trimmed. Empty or whitespace-only polls never replace it, so
/// a flaky source keeps showing its last good output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContentSnapshot {
    text: String,
}

impl ContentSnapshot {
    /// Create a snapshot from raw text (trimmed)
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
        }
    }

    /// The stored text
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether nothing has been stored yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the snapshot if `raw` has content after trimming
    ///
    /// Returns whether the snapshot changed hands.
    pub fn offer(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        if trimmed != self.text {
            self.text = trimmed.to_string();
        }
        true
    }
}

/// Everything the layout pass needs to know
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayState {
    /// Current content
    pub content: ContentSnapshot,
    /// Current font face
    pub font: FontDescriptor,
    /// Current font size (always at least 1)
    pub font_size: u16,
    /// Whether the auto-fit search runs each tick
    pub auto_size: bool,
    /// Wrap mode (true) or fixed-width single page (false)
    pub wrap: bool,
    /// Horizontal alignment
    pub align: Align,
    /// Text colour
    pub text_colour: Colour,
    /// Background colour
    pub background_colour: Colour,
    /// Refresh delay; `None` means single-shot
    pub delay: Option<Duration>,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            content: ContentSnapshot::default(),
            font: FontDescriptor::default(),
            font_size: DEFAULT_START_SIZE,
            auto_size: true,
            wrap: false,
            align: Align::Left,
            text_colour: Colour::LIGHT_GREEN,
            background_colour: Colour::BLACK,
            delay: Some(Duration::from_millis(1000)),
        }
    }
}

impl DisplayState {
    /// Apply each present override field (sticky)
    pub fn apply_override(&mut self, style: &StyleOverride) {
        if let Some(delay) = style.delay {
            self.delay = Some(delay);
        }
        if let Some(wrap) = style.wrap {
            self.wrap = wrap;
        }
        if let Some(align) = style.align {
            self.align = align;
        }
        if let Some(colour) = style.colour {
            self.text_colour = colour;
        }
        if let Some(font) = &style.font {
            self.font = font.clone();
        }
    }

    /// Merge one poll result into the state
    ///
    /// Returns whether the content snapshot was replaced.
    pub fn merge(&mut self, poll: &Poll) -> bool {
        let replaced = self.content.offer(&poll.text);
        if let Some(style) = &poll.style {
            self.apply_override(style);
        }

        tracing::trace!(
            replaced,
            overridden = poll.style.is_some(),
            wrap = self.wrap,
            "Merged poll into display state"
        );
        replaced
    }

    /// Font size clamped to the valid range
    #[must_use]
    pub fn size(&self) -> u16 {
        self.font_size.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_snapshot_trims() {
        let snap = ContentSnapshot::new("  hello\n\n");
        assert_eq!(snap.text(), "hello");
    }

    #[test]
    fn test_empty_poll_keeps_previous_snapshot() {
        let mut state = DisplayState::default();
        assert!(state.merge(&Poll::text("first")));
        assert!(!state.merge(&Poll::text("   \n\t ")));
        assert!(!state.merge(&Poll::text("")));
        assert_eq!(state.content.text(), "first");
    }

    #[test]
    fn test_override_is_sticky() {
        let mut state = DisplayState {
            wrap: true,
            ..Default::default()
        };

        state.merge(&Poll::with_style(
            "a",
            StyleOverride::new().with_wrap(false).with_align(Align::Center),
        ));
        state.merge(&Poll::text("b"));
        state.merge(&Poll::text("c"));

        assert!(!state.wrap);
        assert_eq!(state.align, Align::Center);
        assert_eq!(state.content.text(), "c");
    }

    #[test]
    fn test_override_only_touches_present_fields() {
        let mut state = DisplayState::default();
        let before = state.clone();

        state.merge(&Poll::with_style(
            "",
            StyleOverride::new().with_colour(Colour::rgb(1, 2, 3)),
        ));

        assert_eq!(state.text_colour, Colour::rgb(1, 2, 3));
        assert_eq!(state.font, before.font);
        assert_eq!(state.wrap, before.wrap);
        assert_eq!(state.delay, before.delay);
        assert_eq!(state.content, before.content);
    }

    #[test]
    fn test_override_delay_replaces_state_delay() {
        let mut state = DisplayState::default();
        state.merge(&Poll::with_style(
            "x",
            StyleOverride::new().with_delay(Duration::from_millis(250)),
        ));
        assert_eq!(state.delay, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_size_never_zero() {
        let state = DisplayState {
            font_size: 0,
            ..Default::default()
        };
        assert_eq!(state.size(), 1);
    }
}
