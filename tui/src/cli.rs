//! Command Line
//!
//! Flags follow the classic `textdisplay` tool. Anything left unset falls
//! through to the environment, the config file and then the defaults.

use std::path::PathBuf;

use clap::Parser;
use display_core::{default_config_path, Align, Colour, ConfigOverrides, FontDescriptor};

use crate::sources::{SourceChoice, DEFAULT_CLOCK_FORMAT};

/// Pipe text to a big, auto-fitted terminal display
#[derive(Parser, Debug)]
#[command(name = "textdisplay")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "ESC to exit, F11 to toggle fullscreen, F5 to fit typed text.")]
pub struct Cli {
    /// Align text horizontally: l/left, r/right, c/centre
    #[arg(short = 'a', long, value_name = "ALIGN")]
    pub align: Option<Align>,

    /// Background colour (name or #rrggbb)
    #[arg(short = 'b', long, value_name = "COLOUR")]
    pub background: Option<Colour>,

    /// Text colour (name or #rrggbb)
    #[arg(short = 'c', long, value_name = "COLOUR")]
    pub colour: Option<Colour>,

    /// Update delay in ms; 0 renders once [default: 1000]
    #[arg(short = 'd', long, value_name = "MS")]
    pub delay: Option<u64>,

    /// Font: block or ascii
    #[arg(short = 'f', long, value_name = "FONT")]
    pub font: Option<String>,

    /// Lines read from stdin per update; 0 reads everything [default: 0]
    #[arg(short = 'l', long, value_name = "N")]
    pub lines: Option<usize>,

    /// Font size; 0 fits automatically [default: 0]
    #[arg(short = 's', long = "font-size", value_name = "SIZE")]
    pub font_size: Option<u16>,

    /// Direct entry mode (F5 to resize text)
    #[arg(short = 't', long = "typing-mode")]
    pub typing: bool,

    /// Line wrap, single page
    #[arg(short = 'w', long, visible_short_alias = 'p', visible_alias = "page")]
    pub wrap: bool,

    /// Install to /usr/local/bin
    #[arg(long)]
    pub install: bool,

    /// Configuration file path
    #[arg(long, env = "TEXTDISPLAY_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (RUST_LOG sets the level)
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Display the output of a shell command instead of stdin
    #[arg(long, value_name = "COMMAND", conflicts_with_all = ["slideshow", "clock"])]
    pub exec: Option<String>,

    /// Cycle through the commands in a slideshow file
    #[arg(long, value_name = "FILE", conflicts_with = "clock")]
    pub slideshow: Option<PathBuf>,

    /// Display the local time (strftime pattern)
    #[arg(
        long,
        value_name = "FORMAT",
        num_args = 0..=1,
        default_missing_value = DEFAULT_CLOCK_FORMAT
    )]
    pub clock: Option<String>,

    /// Give up on a poll after this many ms; 0 waits forever
    #[arg(long, value_name = "MS")]
    pub poll_timeout: Option<u64>,
}

impl Cli {
    /// Config overrides for every flag that was given
    pub fn to_overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            align: self.align,
            colour: self.colour,
            background: self.background,
            font: self.font.as_deref().map(FontDescriptor::new),
            font_size: self.font_size,
            wrap: self.wrap.then_some(true),
            delay_ms: self.delay,
            typing: self.typing.then_some(true),
            lines: self.lines,
            poll_timeout_ms: self.poll_timeout,
        }
    }

    /// Config file to load: `--config`, else the per-user default
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config.clone().or_else(default_config_path)
    }

    /// Selected source; stdin unless `--exec`, `--slideshow` or `--clock` is given
    pub fn source_choice(&self) -> SourceChoice {
        if let Some(command) = &self.exec {
            SourceChoice::Exec(command.clone())
        } else if let Some(path) = &self.slideshow {
            SourceChoice::Slideshow(path.clone())
        } else if let Some(format) = &self.clock {
            SourceChoice::Clock(format.clone())
        } else {
            SourceChoice::Stdin
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("textdisplay").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_flags_no_overrides() {
        let cli = parse(&[]);
        assert_eq!(cli.to_overrides(), ConfigOverrides::default());
        assert_eq!(cli.source_choice(), SourceChoice::Stdin);
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&["-a", "c", "-b", "navy", "-c", "#ff0000", "-d", "250", "-s", "4", "-l", "2", "-t", "-w"]);
        let o = cli.to_overrides();
        assert_eq!(o.align, Some(Align::Center));
        assert_eq!(o.background, Some(Colour::rgb(0, 0, 128)));
        assert_eq!(o.colour, Some(Colour::rgb(255, 0, 0)));
        assert_eq!(o.delay_ms, Some(250));
        assert_eq!(o.font_size, Some(4));
        assert_eq!(o.lines, Some(2));
        assert_eq!(o.typing, Some(true));
        assert_eq!(o.wrap, Some(true));
    }

    #[test]
    fn test_page_is_wrap_alias() {
        assert!(parse(&["-p"]).wrap);
        assert!(parse(&["--page"]).wrap);
    }

    #[test]
    fn test_bad_colour_rejected() {
        assert!(Cli::try_parse_from(["textdisplay", "-c", "notacolour"]).is_err());
    }

    #[test]
    fn test_clock_default_format() {
        assert_eq!(parse(&["--clock"]).source_choice(), SourceChoice::Clock("%H:%M".into()));
        assert_eq!(
            parse(&["--clock", "%H:%M:%S"]).source_choice(),
            SourceChoice::Clock("%H:%M:%S".into())
        );
    }

    #[test]
    fn test_config_path_prefers_flag() {
        let cli = parse(&["--config", "/tmp/display.toml"]);
        assert_eq!(cli.config_path(), Some(PathBuf::from("/tmp/display.toml")));

        let cli = Cli {
            config: None,
            ..parse(&[])
        };
        assert_eq!(cli.config_path(), default_config_path());
    }

    #[test]
    fn test_sources_conflict() {
        assert!(Cli::try_parse_from(["textdisplay", "--exec", "date", "--clock"]).is_err());
        assert_eq!(
            parse(&["--exec", "uptime"]).source_choice(),
            SourceChoice::Exec("uptime".into())
        );
    }
}
