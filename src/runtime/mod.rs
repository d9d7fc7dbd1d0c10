use std::env;
use std::path::PathBuf;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use crate::device::RodioDevice;
use crate::library::{self, Catalog, preload_artwork};
use crate::playback::PlaybackState;
use crate::store::{Preferences, default_store_path, open_store};

mod controller;
mod event_loop;
mod keys;
mod logging;
mod settings;


pub use controller::{Controller, Flow, Input};

/// Catalog location: first CLI argument, then `library.catalog`, then the
/// working directory.
fn catalog_source(configured: Option<&PathBuf>) -> PathBuf {
    env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| configured.cloned())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, config_warning) = settings::load_settings();
    let _log_guard = logging::init(&settings.log);
    if let Some(msg) = config_warning {
        warn!("{msg}");
    }

    let source = catalog_source(settings.library.catalog.as_ref());
    let (catalog, load_error) = match library::load(&source, &settings.library) {
        Ok(catalog) => (catalog, None),
        Err(e) => {
            error!("{e}");
            (Catalog::default(), Some(e.to_string()))
        }
    };
    let artwork = preload_artwork(&catalog);

    let store_path = settings.storage.path.clone().or_else(default_store_path);
    let store = open_store(store_path.as_deref());

    let volume = Preferences::new(store.clone())
        .volume()
        .unwrap_or(settings.playback.volume);
    let initial = PlaybackState::new(volume, settings.playback.repeat, settings.playback.shuffle);

    let (tx, rx) = mpsc::channel::<Input>();
    let device = RodioDevice::spawn(&settings.device);
    let mut controller = Controller::new(catalog, initial, device, tx.clone(), store, rand::rng());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut controller,
        &artwork,
        load_error.as_deref(),
        &tx,
        &rx,
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &run_result {
        error!("event loop failed: {e}");
    }
    info!("shutting down");

    run_result
}
