use clap::Parser;
use rsvp_reader::app::{App, AppEvent};
use rsvp_reader::input::{self, LoadedText};
use rsvp_reader::logging;
use rsvp_reader::settings::{FileSettingsStore, MemorySettingsStore, SettingsStore};
use rsvp_reader::ui::TuiManager;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rsvp-reader", version, about = "Read text one word at a time")]
struct Cli {
    /// Plain text file to read. Piped stdin is read when omitted.
    file: Option<PathBuf>,

    /// Reading speed in words per minute (100-1000)
    #[arg(long)]
    wpm: Option<u32>,

    /// Settings file to use instead of the one in the config directory
    #[arg(long, value_name = "PATH")]
    settings: Option<PathBuf>,

    /// Log file location
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_path = cli.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = match logging::init(&log_path) {
        Ok(guard) => Some(guard),
        Err(err) => {
            eprintln!("rsvp-reader: logging disabled ({}): {err}", log_path.display());
            None
        }
    };

    // Read before the terminal switches to raw mode so errors reach the shell.
    let text = initial_text(cli.file.as_deref())?;

    let mut app = App::new(settings_store(cli.settings));
    app.load_text(text);
    if let Some(wpm) = cli.wpm {
        app.handle_event(AppEvent::SetWpm(wpm.to_string()), Instant::now());
    }

    let mut tui = TuiManager::new()?;
    tui.run_event_loop(&mut app)?;

    info!("reader closed");
    Ok(())
}

fn initial_text(file: Option<&std::path::Path>) -> Result<LoadedText, input::LoadError> {
    if let Some(path) = file {
        return input::load_file(path);
    }
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return input::load_reader(stdin.lock(), "stdin");
    }
    Ok(input::sample())
}

fn settings_store(path: Option<PathBuf>) -> Box<dyn SettingsStore> {
    if let Some(path) = path {
        return Box::new(FileSettingsStore::open(path));
    }
    match FileSettingsStore::open_default() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "settings will not persist");
            Box::new(MemorySettingsStore::new())
        }
    }
}
