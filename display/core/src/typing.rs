//! Typing-Mode Controller
//!
//! Two states. `Idle` means automatic polling is active. `Editing` means the
//! user types straight into the display and polling is suspended for the
//! rest of the process lifetime; there is no way back to `Idle`.
//!
//! While editing, a refresh (F5 in the terminal) re-fits the typed text and
//! hides the caret so the result reads cleanly. The next keystroke or click
//! shows the caret again.

/// Typing-mode state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TypingMode {
    /// Automatic polling
    #[default]
    Idle,
    /// Direct text entry; polling suspended
    Editing {
        /// Caret is drawn in the background colour
        caret_hidden: bool,
    },
}

impl TypingMode {
    /// Initial state for a display started with or without typing mode
    #[must_use]
    pub const fn new(typing: bool) -> Self {
        if typing {
            Self::Editing {
                caret_hidden: false,
            }
        } else {
            Self::Idle
        }
    }

    /// Whether polling is suspended
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        matches!(self, Self::Editing { .. })
    }

    /// Whether the caret is currently hidden
    #[must_use]
    pub const fn caret_hidden(&self) -> bool {
        matches!(self, Self::Editing { caret_hidden: true })
    }

    /// A refresh was requested; returns whether one should run
    pub fn on_refresh(&mut self) -> bool {
        match self {
            Self::Editing { caret_hidden } => {
                *caret_hidden = true;
                true
            }
            Self::Idle => false,
        }
    }

    /// A key or pointer event arrived; returns whether the caret must be restored
    pub fn on_input(&mut self) -> bool {
        match self {
            Self::Editing { caret_hidden } if *caret_hidden => {
                *caret_hidden = false;
                true
            }
            _ => false,
        }
    }
}
