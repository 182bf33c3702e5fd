mod app;
mod event;
mod reader;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

use glidenav_config::{defaults, Config};
use glidenav_logger::LogLevel;

use app::App;
use reader::Reader;

/// Keyboard-driven chapter reader with smooth hold-to-scroll.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chapter file, or a directory of chapters
    path: PathBuf,

    /// Site profile that drives key bindings and navigation
    #[arg(short, long, env = "GLIDENAV_SITE", default_value = defaults::LOCAL_SITE)]
    site: String,

    /// Config file (defaults to the XDG config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load().unwrap_or_default(),
    };

    init_logging(&config);

    let reader = Reader::open(&cli.path, config.reader.line_height)?;

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();

    // Key releases are only reported under the kitty keyboard protocol;
    // other terminals fall back to synthesized releases
    let keyboard_enhanced = supports_keyboard_enhancement().unwrap_or(false);

    execute!(stdout, EnterAlternateScreen)?;

    if keyboard_enhanced {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
    }

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&config, reader, &cli.site, keyboard_enhanced);
    let result = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    if keyboard_enhanced {
        let _ = execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags);
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Print error if there was one
    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

/// Start the global logger from the `[logging]` section.
fn init_logging(config: &Config) {
    let file_path = match &config.logging.file_path {
        Some(path) if path.is_empty() => None,
        Some(path) => Some(PathBuf::from(path)),
        None => Config::default_log_path().ok(),
    };
    let min_level = config
        .logging
        .min_level
        .parse::<LogLevel>()
        .unwrap_or(LogLevel::Info);

    glidenav_logger::init(file_path, defaults::MAX_LOG_ENTRIES, min_level);
}
