use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::debug;

use crate::app::App;
use crate::audio::DecoderFactory;
use crate::config;
use crate::remote::RemoteHandle;
use crate::session::{PlaybackSession, SessionEvent};
use crate::ui;

/// Longest the loop waits for input before redrawing.
const INPUT_POLL: Duration = Duration::from_millis(50);

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

impl EventLoopState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Main terminal event loop: feeds queued events to the session, drives its
/// position poll, draws and reads keys. Returns `Ok(())` on quit.
#[allow(clippy::too_many_arguments)]
pub fn run<F: DecoderFactory>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    app: &mut App,
    session: &mut PlaybackSession<F>,
    remote: &RemoteHandle,
    event_tx: &mpsc::Sender<SessionEvent>,
    event_rx: &mpsc::Receiver<SessionEvent>,
    state: &mut EventLoopState,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        if drain_events(session, event_rx) {
            return Ok(());
        }

        session.tick(Instant::now());
        app.sync_with_playing(session.current());
        remote.publish(session.view(), session.state());

        terminal.draw(|f| {
            ui::draw(
                f,
                app,
                session.catalog(),
                session.view(),
                session.state(),
                &settings.ui,
                &settings.controls,
            )
        })?;

        let timeout = session
            .time_until_tick(Instant::now())
            .map_or(INPUT_POLL, |due| due.min(INPUT_POLL));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key_event(key, settings, app, event_tx, state);
            }
        }
    }
}

/// Feed every queued event to the session. Returns true once `Quit` has
/// been handled.
fn drain_events<F: DecoderFactory>(
    session: &mut PlaybackSession<F>,
    event_rx: &mpsc::Receiver<SessionEvent>,
) -> bool {
    while let Ok(event) = event_rx.try_recv() {
        debug!(?event, "session event");
        let quit = event == SessionEvent::Quit;
        session.handle(event);
        if quit {
            return true;
        }
    }
    false
}

/// Translate a key press into list movement or a session event.
fn handle_key_event(
    key: KeyEvent,
    settings: &config::Settings,
    app: &mut App,
    event_tx: &mpsc::Sender<SessionEvent>,
    state: &mut EventLoopState,
) {
    let send = |event: SessionEvent| {
        let _ = event_tx.send(event);
    };
    let scrub_ms = settings
        .controls
        .scrub_seconds
        .saturating_mul(1000)
        .min(i64::MAX as u64) as i64;

    if key.code != KeyCode::Char('g') {
        state.pending_gg = false;
    }

    match key.code {
        KeyCode::Char('q') => send(SessionEvent::Quit),
        KeyCode::Char('g') => {
            if state.pending_gg {
                state.pending_gg = false;
                app.follow_playback_off();
                app.first();
            } else {
                state.pending_gg = true;
            }
        }
        KeyCode::Char('G') => {
            app.follow_playback_off();
            app.last();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.follow_playback_off();
            app.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.follow_playback_off();
            app.prev();
        }
        KeyCode::Enter => {
            if app.has_tracks() {
                app.follow_playback_on();
                send(SessionEvent::Select(app.selected));
            }
        }
        KeyCode::Char('p') | KeyCode::Char(' ') => {
            app.follow_playback_on();
            send(SessionEvent::TogglePlayPause);
        }
        KeyCode::Char('l') => {
            app.follow_playback_on();
            send(SessionEvent::Next);
        }
        KeyCode::Char('h') => {
            app.follow_playback_on();
            send(SessionEvent::Previous);
        }
        KeyCode::Char('L') => send(SessionEvent::SeekBy(scrub_ms)),
        KeyCode::Char('H') => send(SessionEvent::SeekBy(-scrub_ms)),
        KeyCode::Char('s') => send(SessionEvent::ToggleShuffle),
        KeyCode::Char('r') => send(SessionEvent::ToggleRepeat),
        KeyCode::Char('K') => app.toggle_info_window(),
        _ => {}
    }
}
