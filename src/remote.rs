//! MPRIS remote control.
//!
//! Exposes `org.mpris.MediaPlayer2` on the session bus so media keys and
//! tools like `playerctl` can drive the player. Incoming calls become
//! `SessionEvent`s on the runtime channel; the runtime publishes what the
//! session shows through `RemoteHandle`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, mpsc::Sender};

use async_io::{Timer, block_on};
use tracing::{info, warn};
use zbus::{Connection, interface};
use zvariant::{OwnedValue, Value};

use crate::session::{PlaybackState, PlaybackView, SessionEvent};

#[derive(Debug, Default)]
struct SharedState {
    playback: PlaybackState,
    title: Option<String>,
    artist: Option<String>,
    length_ms: u64,
    position_ms: u64,
    shuffle: bool,
    repeat: bool,
}

pub struct RemoteHandle {
    state: Arc<Mutex<SharedState>>,
}

impl RemoteHandle {
    /// Mirror the session's visible state.
    pub fn publish(&self, view: &PlaybackView, playback: PlaybackState) {
        if let Ok(mut s) = self.state.lock() {
            s.playback = playback;
            s.title = Some(view.title.clone()).filter(|t| !t.is_empty());
            s.artist = Some(view.artist.clone()).filter(|a| !a.is_empty());
            s.length_ms = view.seek_max_ms;
            s.position_ms = view.seek_value_ms;
            s.shuffle = view.shuffle;
            s.repeat = view.repeat;
        }
    }
}

struct RootIface {
    tx: Sender<SessionEvent>,
}

#[interface(name = "org.mpris.MediaPlayer2")]
impl RootIface {
    fn raise(&self) {
        // No-op for TUI.
    }

    fn quit(&self) {
        let _ = self.tx.send(SessionEvent::Quit);
    }

    #[zbus(property)]
    fn can_quit(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_raise(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn has_track_list(&self) -> bool {
        false
    }

    #[zbus(property)]
    fn identity(&self) -> &str {
        "cadenza"
    }

    #[zbus(property)]
    fn supported_uri_schemes(&self) -> Vec<String> {
        vec![]
    }

    #[zbus(property)]
    fn supported_mime_types(&self) -> Vec<String> {
        vec![]
    }
}

struct PlayerIface {
    tx: Sender<SessionEvent>,
    state: Arc<Mutex<SharedState>>,
}

fn owned(value: Value<'_>) -> Option<OwnedValue> {
    OwnedValue::try_from(value).ok()
}

#[interface(name = "org.mpris.MediaPlayer2.Player")]
impl PlayerIface {
    fn next(&self) {
        let _ = self.tx.send(SessionEvent::Next);
    }

    fn previous(&self) {
        let _ = self.tx.send(SessionEvent::Previous);
    }

    fn play(&self) {
        let _ = self.tx.send(SessionEvent::Play);
    }

    fn pause(&self) {
        let _ = self.tx.send(SessionEvent::Pause);
    }

    fn play_pause(&self) {
        let _ = self.tx.send(SessionEvent::TogglePlayPause);
    }

    /// There is no stopped state; stopping pauses.
    fn stop(&self) {
        let _ = self.tx.send(SessionEvent::Pause);
    }

    /// Relative seek, `offset` in microseconds.
    fn seek(&self, offset: i64) {
        let _ = self.tx.send(SessionEvent::SeekBy(offset / 1000));
    }

    #[zbus(property)]
    fn playback_status(&self) -> &str {
        let Ok(s) = self.state.lock() else {
            return "Stopped";
        };
        match s.playback {
            PlaybackState::Idle => "Stopped",
            PlaybackState::Preparing | PlaybackState::Playing => "Playing",
            PlaybackState::Paused => "Paused",
        }
    }

    #[zbus(property)]
    fn loop_status(&self) -> &str {
        match self.state.lock() {
            Ok(s) if s.repeat => "Track",
            _ => "None",
        }
    }

    #[zbus(property)]
    fn shuffle(&self) -> bool {
        self.state.lock().map(|s| s.shuffle).unwrap_or(false)
    }

    /// Current position in microseconds.
    #[zbus(property)]
    fn position(&self) -> i64 {
        self.state
            .lock()
            .map(|s| s.position_ms as i64 * 1000)
            .unwrap_or(0)
    }

    #[zbus(property)]
    fn can_control(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_play(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_pause(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_seek(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_next(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn can_go_previous(&self) -> bool {
        true
    }

    #[zbus(property)]
    fn metadata(&self) -> HashMap<String, OwnedValue> {
        let mut map = HashMap::new();
        let Ok(s) = self.state.lock() else {
            return map;
        };

        if let Some(title) = s.title.clone().and_then(|t| owned(Value::from(t))) {
            map.insert("xesam:title".to_string(), title);
        }
        if let Some(artist) = s.artist.clone().and_then(|a| owned(Value::from(vec![a]))) {
            map.insert("xesam:artist".to_string(), artist);
        }
        if s.length_ms > 0 {
            if let Some(length) = owned(Value::from(s.length_ms as i64 * 1000)) {
                map.insert("mpris:length".to_string(), length);
            }
        }
        map
    }
}

/// Register the MPRIS service on a background thread.
///
/// Bus failures are logged; the player keeps working without remote control.
pub fn spawn_remote(tx: Sender<SessionEvent>) -> RemoteHandle {
    let state = Arc::new(Mutex::new(SharedState::default()));

    let state_for_thread = state.clone();
    std::thread::spawn(move || {
        block_on(async move {
            let path = "/org/mpris/MediaPlayer2";

            let connection = match Connection::session().await {
                Ok(c) => c,
                Err(e) => {
                    warn!("MPRIS: failed to connect to session bus: {e}");
                    return;
                }
            };

            if let Err(e) = connection
                .request_name("org.mpris.MediaPlayer2.cadenza")
                .await
            {
                warn!("MPRIS: failed to acquire name: {e}");
                return;
            }

            let object_server = connection.object_server();

            if let Err(e) = object_server.at(path, RootIface { tx: tx.clone() }).await {
                warn!("MPRIS: failed to register root iface: {e}");
                return;
            }

            if let Err(e) = object_server
                .at(
                    path,
                    PlayerIface {
                        tx,
                        state: state_for_thread,
                    },
                )
                .await
            {
                warn!("MPRIS: failed to register player iface: {e}");
                return;
            }

            info!("MPRIS service registered");

            // Keep the service alive.
            loop {
                Timer::after(std::time::Duration::from_secs(3600)).await;
            }
        });
    });

    RemoteHandle { state }
}
