use anyhow::{Context, Result};
use clap::Parser;
use dotkeep::app::App;
use dotkeep::store::{RecordStore, DEFAULT_STORE_FILE};
use std::path::PathBuf;

/// Session log, appended to in the invocation directory.
const LOG_FILE: &str = "debug.log";

#[derive(Parser)]
#[command(name = "dotkeep", version, about = "Track, archive, and remove dotfiles")]
struct Cli {
    /// Record store file
    #[arg(long, default_value = DEFAULT_STORE_FILE)]
    store: PathBuf,

    /// Directory scanned for dotfile name suggestions
    /// (defaults to the user configuration directory)
    #[arg(long)]
    config_dir: Option<PathBuf>,
}

/// Set up panic hook to restore terminal state on panic.
fn setup_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = crossterm::terminal::disable_raw_mode();
        let _ = crossterm::execute!(std::io::stdout(), crossterm::terminal::LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

fn main() -> Result<()> {
    setup_panic_hook();
    let cli = Cli::parse();

    // An unopenable session log means an unusable environment.
    std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(LOG_FILE)
        .with_context(|| format!("Failed to open {LOG_FILE}"))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug"));
    let file_appender = tracing_appender::rolling::never(".", LOG_FILE);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    let config_dir = match cli.config_dir {
        Some(dir) => dir,
        None => dirs::config_dir().context("No user configuration directory available")?,
    };

    let mut app = App::new(RecordStore::new(cli.store), config_dir)?;
    app.run()
}
