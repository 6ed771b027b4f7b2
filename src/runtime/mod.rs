use std::env;
use std::sync::mpsc;

use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};
use rodio::OutputStreamBuilder;
use tracing::{error, info, warn};

use crate::app::App;
use crate::audio::RodioFactory;
use crate::error::Error;
use crate::library::{Catalog, FsMediaIndex};
use crate::logging;
use crate::remote;
use crate::session::{PlaybackSession, SessionEvent};

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let (settings, settings_warning) = settings::load_settings();

    let _log_guard = match logging::init(&settings.log) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("cadenza: {e}");
            None
        }
    };
    if let Some(msg) = settings_warning {
        warn!("{msg}");
    }

    let root = startup::resolve_library_root(env::args().nth(1), &settings.library);
    startup::request_library_access(&root);

    let index = FsMediaIndex::new(&root, settings.library.clone());
    let catalog = Catalog::load(&index, &settings.library);
    info!(root = %root.display(), tracks = catalog.len(), "catalog loaded");

    let mut stream =
        OutputStreamBuilder::open_default_stream().map_err(|e| Error::Output(e.to_string()))?;
    stream.log_on_drop(false);
    let factory = RodioFactory::new(stream.mixer().clone());

    let (event_tx, event_rx) = mpsc::channel::<SessionEvent>();
    let mut app = App::new(&catalog);
    let mut session = PlaybackSession::new(catalog, factory, event_tx.clone(), &settings.playback);
    let remote = remote::spawn_remote(event_tx.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::new();
    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut app,
        &mut session,
        &remote,
        &event_tx,
        &event_rx,
        &mut state,
    );
    if let Err(e) = &run_result {
        error!("event loop failed: {e}");
    }

    session.shutdown();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("shutdown complete");
    run_result
}
