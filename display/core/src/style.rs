//! Display Style
//!
//! Alignment, colours and the per-poll [`StyleOverride`] a source can attach
//! to its text. Overrides are sticky: a field that is present replaces the
//! display value until another override replaces it again.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::font::FontDescriptor;

/// Errors from parsing style values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Alignment string not recognised
    #[error("unknown alignment '{0}' (expected l/left, c/centre, r/right)")]
    UnknownAlign(String),

    /// Colour string not recognised
    #[error("unknown colour '{0}' (expected a colour name or #rrggbb)")]
    UnknownColour(String),
}

// ============================================================================
// Alignment
// ============================================================================

/// Horizontal alignment of each rendered row
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Align {
    /// Flush left
    #[default]
    Left,
    /// Centred
    Center,
    /// Flush right
    Right,
}

impl FromStr for Align {
    type Err = StyleError;

    /// Only the first letter is significant, so `l`, `left` and `Leftish`
    /// all select [`Align::Left`]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next().map(|c| c.to_ascii_lowercase()) {
            Some('l') => Ok(Self::Left),
            Some('c') => Ok(Self::Center),
            Some('r') => Ok(Self::Right),
            _ => Err(StyleError::UnknownAlign(s.to_string())),
        }
    }
}

impl TryFrom<String> for Align {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Align> for String {
    fn from(align: Align) -> Self {
        align.to_string()
    }
}

impl fmt::Display for Align {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Center => write!(f, "center"),
            Self::Right => write!(f, "right"),
        }
    }
}

impl Align {
    /// Horizontal offset of a row `used` units wide inside `available` units
    #[must_use]
    pub fn offset(self, available: u32, used: u32) -> u32 {
        let spare = available.saturating_sub(used);
        match self {
            Self::Left => 0,
            Self::Center => spare / 2,
            Self::Right => spare,
        }
    }
}

// ============================================================================
// Colours
// ============================================================================

/// A 24-bit colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Colour {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

/// Named colours accepted on the command line and in overrides
///
/// Values follow the X11 colour names.
const NAMED_COLOURS: &[(&str, Colour)] = &[
    ("black", Colour::rgb(0, 0, 0)),
    ("white", Colour::rgb(255, 255, 255)),
    ("red", Colour::rgb(255, 0, 0)),
    ("darkred", Colour::rgb(139, 0, 0)),
    ("green", Colour::rgb(0, 255, 0)),
    ("lightgreen", Colour::rgb(144, 238, 144)),
    ("darkgreen", Colour::rgb(0, 100, 0)),
    ("blue", Colour::rgb(0, 0, 255)),
    ("lightblue", Colour::rgb(173, 216, 230)),
    ("darkblue", Colour::rgb(0, 0, 139)),
    ("navy", Colour::rgb(0, 0, 128)),
    ("yellow", Colour::rgb(255, 255, 0)),
    ("orange", Colour::rgb(255, 165, 0)),
    ("cyan", Colour::rgb(0, 255, 255)),
    ("magenta", Colour::rgb(255, 0, 255)),
    ("purple", Colour::rgb(160, 32, 240)),
    ("pink", Colour::rgb(255, 192, 203)),
    ("brown", Colour::rgb(165, 42, 42)),
    ("gray", Colour::rgb(190, 190, 190)),
    ("grey", Colour::rgb(190, 190, 190)),
    ("darkgray", Colour::rgb(169, 169, 169)),
    ("darkgrey", Colour::rgb(169, 169, 169)),
    ("lightgray", Colour::rgb(211, 211, 211)),
    ("lightgrey", Colour::rgb(211, 211, 211)),
    ("gold", Colour::rgb(255, 215, 0)),
    ("amber", Colour::rgb(255, 191, 0)),
];

impl Colour {
    /// Create a colour from channels
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Default text colour
    pub const LIGHT_GREEN: Self = Self::rgb(144, 238, 144);

    /// Default background colour
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    fn parse_hex(hex: &str) -> Option<Self> {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&hex[i..=i]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }
}

impl FromStr for Colour {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            if hex.is_ascii() {
                if let Some(colour) = Self::parse_hex(hex) {
                    return Ok(colour);
                }
            }
            return Err(StyleError::UnknownColour(s.to_string()));
        }

        let key: String = trimmed
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        NAMED_COLOURS
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, colour)| *colour)
            .ok_or_else(|| StyleError::UnknownColour(s.to_string()))
    }
}

impl TryFrom<String> for Colour {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Colour> for String {
    fn from(colour: Colour) -> Self {
        colour.to_string()
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Per-poll overrides
// ============================================================================

/// Optional style changes delivered alongside polled text
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleOverride {
    /// Refresh delay
    pub delay: Option<Duration>,
    /// Wrap mode
    pub wrap: Option<bool>,
    /// Horizontal alignment
    pub align: Option<Align>,
    /// Text colour
    pub colour: Option<Colour>,
    /// Font face
    pub font: Option<FontDescriptor>,
}

impl StyleOverride {
    /// Create an empty override
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether no field is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Set the refresh delay
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Set the wrap mode
    #[must_use]
    pub fn with_wrap(mut self, wrap: bool) -> Self {
        self.wrap = Some(wrap);
        self
    }

    /// Set the alignment
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set the text colour
    #[must_use]
    pub fn with_colour(mut self, colour: Colour) -> Self {
        self.colour = Some(colour);
        self
    }

    /// Set the font face
    #[must_use]
    pub fn with_font(mut self, font: impl Into<FontDescriptor>) -> Self {
        self.font = Some(font.into());
        self
    }
}
