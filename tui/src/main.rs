//! textdisplay Entry Point
//!
//! Usage:
//!   some-command | textdisplay [OPTIONS]
//!   textdisplay --clock
//!   textdisplay --exec "uptime" -d 5000
//!   textdisplay -t
//!
//! Logging is off unless `RUST_LOG` is set. The display owns the terminal,
//! so use `--log-file` to keep log lines off the screen.

use std::fs::File;
use std::io;
use std::panic;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use display_core::{load_config_from_path, DisplayConfig};
use textdisplay_tui::install::{install, INSTALL_DIR, INSTALL_NAME};
use textdisplay_tui::{App, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_file.as_deref())?;

    if cli.install {
        if !install(Path::new(INSTALL_DIR), INSTALL_NAME) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let mut config = load_config_from_path(cli.config_path().as_deref())?;
    cli.to_overrides().apply(&mut config);
    info!(source = %config.source(), typing = config.typing, "Configuration loaded");

    // Build the source before touching the terminal so errors print normally
    let source = cli.source_choice().open(config.lines)?;

    // stdin may be a pipe; keys are read from the controlling terminal
    use std::io::IsTerminal;

    if !io::stdout().is_terminal() {
        eprintln!("Error: textdisplay requires a terminal (TTY) on stdout");
        eprintln!();
        eprintln!("Pipe text in, not out:");
        eprintln!("  date | textdisplay");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Restore terminal before printing panic
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run the app
    let result = run_app(&mut terminal, &config, source).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    // Propagate any errors
    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &DisplayConfig,
    source: Box<dyn display_core::Source>,
) -> anyhow::Result<()> {
    let size = terminal.size()?;
    let mut app = App::new(config, source, Rect::new(0, 0, size.width, size.height));
    app.run(terminal).await
}

/// Logs go to `log_file` when given, otherwise stderr; `RUST_LOG` filters
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file: {}", path.display()))?;
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .with(filter)
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .with(filter)
                .init();
        }
    }
    Ok(())
}
