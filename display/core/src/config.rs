//! TOML Configuration File Support
//!
//! Display defaults can come from a TOML file at
//! `~/.config/textdisplay/textdisplay.toml`.
//!
//! # Configuration Priority
//!
//! Highest first:
//! 1. CLI arguments ([`ConfigOverrides`])
//! 2. Environment variables (`TEXTDISPLAY_*`)
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [display]
//! align = "centre"
//! colour = "darkred"
//! background = "black"
//! font = "block"
//! font_size = 0        # 0 = auto-fit
//! wrap = true
//! delay_ms = 1000      # 0 = render once
//!
//! [fit]
//! max_size = 64
//!
//! [source]
//! lines = 1
//! poll_timeout_ms = 5000
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::controller::ControllerOptions;
use crate::fit::{FitLimits, DEFAULT_MAX_FONT_SIZE};
use crate::font::FontDescriptor;
use crate::state::{ContentSnapshot, DisplayState, DEFAULT_START_SIZE};
use crate::style::{Align, Colour};

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Tracks where the configuration came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Command-line argument
    Cli,
    /// Environment variable
    Env,
    /// TOML configuration file
    File,
    /// Defaults only
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// `[display]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Horizontal alignment (`left`, `centre`, `right`)
    pub align: Option<Align>,
    /// Text colour (name or `#rrggbb`)
    pub colour: Option<Colour>,
    /// Background colour
    pub background: Option<Colour>,
    /// Font family
    pub font: Option<FontDescriptor>,
    /// Font size, 0 for auto-fit
    pub font_size: Option<u16>,
    /// Wrap mode
    pub wrap: Option<bool>,
    /// Refresh delay in milliseconds, 0 to render once
    pub delay_ms: Option<u64>,
    /// Start in typing mode
    pub typing: Option<bool>,
}

/// `[fit]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FitSection {
    /// Largest size auto-fit will try
    pub max_size: Option<u16>,
}

/// `[source]` section
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    /// Lines read from stdin per poll, 0 for everything
    pub lines: Option<usize>,
    /// Poll timeout in milliseconds, 0 for none
    pub poll_timeout_ms: Option<u64>,
}

/// Root of the TOML file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayToml {
    /// Display defaults
    pub display: DisplaySection,
    /// Auto-fit bounds
    pub fit: FitSection,
    /// Source settings
    pub source: SourceSection,
}

/// Resolved configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Horizontal alignment
    pub align: Align,
    /// Text colour
    pub colour: Colour,
    /// Background colour
    pub background: Colour,
    /// Font family
    pub font: FontDescriptor,
    /// Explicit font size; 0 means auto-fit
    pub font_size: u16,
    /// Wrap mode
    pub wrap: bool,
    /// Refresh delay; `None` renders once
    pub delay: Option<Duration>,
    /// Typing mode
    pub typing: bool,
    /// Auto-fit ceiling
    pub max_size: u16,
    /// Lines read from stdin per poll (0 = all)
    pub lines: usize,
    /// Poll timeout; `None` waits forever
    pub poll_timeout: Option<Duration>,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    source: ConfigSource,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            align: Align::Left,
            colour: Colour::LIGHT_GREEN,
            background: Colour::BLACK,
            font: FontDescriptor::default(),
            font_size: 0,
            wrap: false,
            delay: Some(Duration::from_millis(1000)),
            typing: false,
            max_size: DEFAULT_MAX_FONT_SIZE,
            lines: 0,
            poll_timeout: None,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl DisplayConfig {
    /// Where the configuration primarily came from
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Initial display state
    ///
    /// An explicit font size disables auto-fit, except in typing mode which
    /// always fits.
    #[must_use]
    pub fn initial_state(&self) -> DisplayState {
        let auto_size = self.font_size == 0 || self.typing;
        DisplayState {
            content: ContentSnapshot::default(),
            font: self.font.clone(),
            font_size: if auto_size {
                DEFAULT_START_SIZE
            } else {
                self.font_size
            },
            auto_size,
            wrap: self.wrap || self.typing,
            align: self.align,
            text_colour: self.colour,
            background_colour: self.background,
            delay: self.delay,
        }
    }

    /// Controller construction options
    #[must_use]
    pub fn controller_options(&self) -> ControllerOptions {
        ControllerOptions {
            typing: self.typing,
            limits: FitLimits::new(self.max_size),
        }
    }
}

/// Default configuration file path
///
/// `$XDG_CONFIG_HOME/textdisplay/textdisplay.toml`, or the platform
/// equivalent.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("textdisplay").join("textdisplay.toml"))
}

/// Load configuration from a specific path and the process environment
///
/// A missing file is not an error; defaults are used.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_from_path(path: Option<&Path>) -> Result<DisplayConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config_with_env(
    path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();

    if let Some(config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.to_path_buf(),
                    source: e,
                })?;

            let toml_config: DisplayToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config);
            config.config_file_path = Some(config_path.to_path_buf());
            config.source = ConfigSource::File;

            tracing::info!(path = %config_path.display(), "Loaded configuration from file");
        } else {
            tracing::debug!(path = %config_path.display(), "Config file not found, using defaults");
        }
    }

    apply_env_config(&mut config, lookup);
    Ok(config)
}

fn millis_or_none(ms: u64) -> Option<Duration> {
    (ms > 0).then(|| Duration::from_millis(ms))
}

fn apply_toml_config(config: &mut DisplayConfig, toml: &DisplayToml) {
    let display = &toml.display;
    if let Some(align) = display.align {
        config.align = align;
    }
    if let Some(colour) = display.colour {
        config.colour = colour;
    }
    if let Some(background) = display.background {
        config.background = background;
    }
    if let Some(font) = &display.font {
        config.font = font.clone();
    }
    if let Some(size) = display.font_size {
        config.font_size = size;
    }
    if let Some(wrap) = display.wrap {
        config.wrap = wrap;
    }
    if let Some(ms) = display.delay_ms {
        config.delay = millis_or_none(ms);
    }
    if let Some(typing) = display.typing {
        config.typing = typing;
    }

    if let Some(max) = toml.fit.max_size {
        config.max_size = max.max(1);
    }

    if let Some(lines) = toml.source.lines {
        config.lines = lines;
    }
    if let Some(ms) = toml.source.poll_timeout_ms {
        config.poll_timeout = millis_or_none(ms);
    }
}

fn parse_flag(value: &str) -> bool {
    value != "0" && !value.eq_ignore_ascii_case("false")
}

fn apply_env_config(config: &mut DisplayConfig, lookup: impl Fn(&str) -> Option<String>) {
    let mut touched = false;
    let mut parsed = |key: &str| -> Option<String> {
        let value = lookup(key)?;
        touched = true;
        Some(value)
    };

    if let Some(v) = parsed("TEXTDISPLAY_ALIGN") {
        match v.parse() {
            Ok(align) => config.align = align,
            Err(e) => tracing::warn!(error = %e, "Ignoring TEXTDISPLAY_ALIGN"),
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_COLOUR") {
        match v.parse() {
            Ok(colour) => config.colour = colour,
            Err(e) => tracing::warn!(error = %e, "Ignoring TEXTDISPLAY_COLOUR"),
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_BACKGROUND") {
        match v.parse() {
            Ok(colour) => config.background = colour,
            Err(e) => tracing::warn!(error = %e, "Ignoring TEXTDISPLAY_BACKGROUND"),
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_FONT") {
        config.font = FontDescriptor::new(v);
    }
    if let Some(v) = parsed("TEXTDISPLAY_FONT_SIZE") {
        if let Ok(size) = v.parse() {
            config.font_size = size;
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_WRAP") {
        config.wrap = parse_flag(&v);
    }
    if let Some(v) = parsed("TEXTDISPLAY_DELAY_MS") {
        if let Ok(ms) = v.parse() {
            config.delay = millis_or_none(ms);
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_MAX_SIZE") {
        if let Ok(max) = v.parse::<u16>() {
            config.max_size = max.max(1);
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_LINES") {
        if let Ok(lines) = v.parse() {
            config.lines = lines;
        }
    }
    if let Some(v) = parsed("TEXTDISPLAY_TYPING") {
        config.typing = parse_flag(&v);
    }
    if let Some(v) = parsed("TEXTDISPLAY_POLL_TIMEOUT_MS") {
        if let Ok(ms) = v.parse() {
            config.poll_timeout = millis_or_none(ms);
        }
    }

    if touched {
        config.source = ConfigSource::Env;
    }
}

/// CLI overrides, applied after [`load_config_from_path`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Alignment override
    pub align: Option<Align>,
    /// Text colour override
    pub colour: Option<Colour>,
    /// Background override
    pub background: Option<Colour>,
    /// Font override
    pub font: Option<FontDescriptor>,
    /// Font size override (0 = auto)
    pub font_size: Option<u16>,
    /// Wrap override
    pub wrap: Option<bool>,
    /// Delay override in milliseconds (0 = render once)
    pub delay_ms: Option<u64>,
    /// Typing mode override
    pub typing: Option<bool>,
    /// Stdin line count override
    pub lines: Option<usize>,
    /// Poll timeout override in milliseconds (0 = none)
    pub poll_timeout_ms: Option<u64>,
}

impl ConfigOverrides {
    /// Create an empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set alignment
    #[must_use]
    pub fn with_align(mut self, align: Align) -> Self {
        self.align = Some(align);
        self
    }

    /// Set font size
    #[must_use]
    pub fn with_font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set refresh delay
    #[must_use]
    pub fn with_delay_ms(mut self, ms: u64) -> Self {
        self.delay_ms = Some(ms);
        self
    }

    /// Set typing mode
    #[must_use]
    pub fn with_typing(mut self, typing: bool) -> Self {
        self.typing = Some(typing);
        self
    }

    fn is_empty(&self) -> bool {
        self.align.is_none()
            && self.colour.is_none()
            && self.background.is_none()
            && self.font.is_none()
            && self.font_size.is_none()
            && self.wrap.is_none()
            && self.delay_ms.is_none()
            && self.typing.is_none()
            && self.lines.is_none()
            && self.poll_timeout_ms.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut DisplayConfig) {
        if self.is_empty() {
            return;
        }
        config.source = ConfigSource::Cli;

        if let Some(align) = self.align {
            config.align = align;
        }
        if let Some(colour) = self.colour {
            config.colour = colour;
        }
        if let Some(background) = self.background {
            config.background = background;
        }
        if let Some(ref font) = self.font {
            config.font = font.clone();
        }
        if let Some(size) = self.font_size {
            config.font_size = size;
        }
        if let Some(wrap) = self.wrap {
            config.wrap = wrap;
        }
        if let Some(ms) = self.delay_ms {
            config.delay = millis_or_none(ms);
        }
        if let Some(typing) = self.typing {
            config.typing = typing;
        }
        if let Some(lines) = self.lines {
            config.lines = lines;
        }
        if let Some(ms) = self.poll_timeout_ms {
            config.poll_timeout = millis_or_none(ms);
        }
    }
}
