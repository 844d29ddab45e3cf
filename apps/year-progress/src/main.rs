//! Year Progress - Watch the current year go by.

mod app;
mod config;
mod theme;
mod ui;

use app::{Action, App};
use config::Config;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use progress_core::{RefreshLoop, Settings, SystemClock};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    init_logging(&config);
    if let Some(e) = config_error {
        warn!(error = %e, "invalid config, using defaults");
    }

    if Config::config_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = config.save() {
            warn!(error = %e, "failed to write default config");
        }
    }

    let settings = Settings::open_or_memory(&config.settings_path());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, config, settings).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// Log to the data dir file, or discard output when it cannot be opened.
fn init_logging(config: &Config) {
    let path = Config::log_path();
    let (writer, open_error) = match open_log_file(&path) {
        Ok(file) => (BoxMakeWriter::new(Mutex::new(file)), None),
        Err(e) => (BoxMakeWriter::new(io::sink), Some(e)),
    };

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(config.logging.level())
        .init();

    if let Some(e) = open_error {
        warn!(path = %path.display(), error = %e, "log file unavailable");
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    config: Config,
    settings: Settings,
) -> anyhow::Result<()> {
    let (mut refresh, mut progress_rx) =
        RefreshLoop::new(SystemClock, config.display.cadence).start_watch();
    let mut app = App::new(config, settings, *progress_rx.borrow());
    let mut events = EventStream::new();

    info!("year progress started");

    loop {
        terminal.draw(|f| ui::draw(f, &mut app))?;

        tokio::select! {
            changed = progress_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                app.set_progress(*progress_rx.borrow_and_update());
            }
            event = events.next() => {
                let Some(event) = event else { break };
                match app.handle_event(event?) {
                    Action::None => {}
                    Action::Quit => break,
                    Action::RestartRefresh => {
                        refresh.cancel().await;
                        (refresh, progress_rx) =
                            RefreshLoop::new(SystemClock, app.cadence).start_watch();
                        app.set_progress(*progress_rx.borrow());
                    }
                }
            }
        }
    }

    refresh.cancel().await;
    info!("year progress stopped");
    Ok(())
}
