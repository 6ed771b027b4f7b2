use std::sync::Arc;
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::audio::{Decoder, DecoderFactory, DecoderSignal, SignalSender};
use crate::config::PlaybackSettings;
use crate::library::Catalog;

use super::advance::{Direction, next_index};
use super::event::{PlaybackState, SessionEvent};
use super::poll::PositionPoll;
use super::view::{PlaybackView, TransportIcon, format_time};

type Roll = Box<dyn FnMut(usize) -> usize>;

/// The playback session: current track, transport state, shuffle/repeat
/// flags and the single decoder resource currently held.
///
/// All mutation happens through `handle` (or the matching methods) on the
/// thread that owns the session. Decoders report back through `events`.
pub struct PlaybackSession<F: DecoderFactory> {
    catalog: Catalog,
    factory: F,
    decoder: Option<F::Decoder>,
    events: Sender<SessionEvent>,

    state: PlaybackState,
    current: Option<usize>,
    shuffle: bool,
    repeat: bool,
    generation: u64,

    restart_threshold_ms: u64,
    poll: PositionPoll,
    view: PlaybackView,
    roll: Roll,
}

impl<F: DecoderFactory> PlaybackSession<F> {
    pub fn new(
        catalog: Catalog,
        factory: F,
        events: Sender<SessionEvent>,
        settings: &PlaybackSettings,
    ) -> Self {
        let view = PlaybackView {
            shuffle: settings.shuffle,
            repeat: settings.repeat,
            ..PlaybackView::default()
        };

        Self {
            catalog,
            factory,
            decoder: None,
            events,
            state: PlaybackState::Idle,
            current: None,
            shuffle: settings.shuffle,
            repeat: settings.repeat,
            generation: 0,
            restart_threshold_ms: settings.restart_threshold_ms,
            poll: PositionPoll::new(Duration::from_millis(settings.poll_interval_ms.max(1))),
            view,
            roll: Box::new(|len| rand::random_range(0..len)),
        }
    }

    /// Replace the random draw used by shuffle.
    #[cfg(test)]
    pub fn with_roll(mut self, roll: impl FnMut(usize) -> usize + 'static) -> Self {
        self.roll = Box::new(roll);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    #[cfg(test)]
    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    #[cfg(test)]
    pub fn repeat(&self) -> bool {
        self.repeat
    }

    #[cfg(test)]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn view(&self) -> &PlaybackView {
        &self.view
    }

    #[cfg(test)]
    pub fn holds_decoder(&self) -> bool {
        self.decoder.is_some()
    }

    pub fn handle(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Select(i) => self.select_track(i),
            SessionEvent::TogglePlayPause => self.toggle_play_pause(),
            SessionEvent::Play => self.play(),
            SessionEvent::Pause => {
                if self.state == PlaybackState::Playing {
                    self.toggle_play_pause();
                }
            }
            SessionEvent::Seek(ms) => self.seek(ms),
            SessionEvent::SeekBy(delta) => self.seek_by(delta),
            SessionEvent::Next => self.next(),
            SessionEvent::Previous => self.previous(),
            SessionEvent::ToggleShuffle => self.toggle_shuffle(),
            SessionEvent::ToggleRepeat => self.toggle_repeat(),
            SessionEvent::Decoder { generation, signal } => self.on_signal(generation, signal),
            SessionEvent::Quit => self.shutdown(),
        }
    }

    /// Bind a fresh decoder to catalog entry `i` and start preparing it.
    ///
    /// Out-of-range indices are ignored. The held decoder, if any, is
    /// released before the new one is created.
    pub fn select_track(&mut self, i: usize) {
        let Some(track) = self.catalog.get(i).cloned() else {
            debug!(index = i, len = self.catalog.len(), "selection out of range ignored");
            return;
        };

        self.release_decoder();
        self.generation += 1;

        let signals = self.signal_sender();
        let mut decoder = self.factory.create(signals);
        self.current = Some(i);
        self.view.title = track.title.clone();
        self.view.artist = track.artist.clone();
        self.view.error = None;

        if let Err(e) = decoder.set_source(&track.source) {
            warn!(source = %track.source, "cannot bind decoder: {e}");
            decoder.release();
            self.enter_failed(e.to_string());
            return;
        }

        decoder.prepare_async();
        self.decoder = Some(decoder);
        self.state = PlaybackState::Preparing;
        info!(index = i, title = %track.title, generation = self.generation, "preparing track");
    }

    pub fn toggle_play_pause(&mut self) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        match self.state {
            PlaybackState::Playing => {
                decoder.pause();
                self.state = PlaybackState::Paused;
                self.view.icon = TransportIcon::Play;
            }
            PlaybackState::Paused => {
                decoder.start();
                self.state = PlaybackState::Playing;
                self.view.icon = TransportIcon::Pause;
            }
            PlaybackState::Idle | PlaybackState::Preparing => {}
        }
    }

    fn play(&mut self) {
        match self.state {
            PlaybackState::Paused => self.toggle_play_pause(),
            PlaybackState::Idle if !self.catalog.is_empty() => {
                self.select_track(self.current.unwrap_or(0));
            }
            _ => {}
        }
    }

    /// User seek: forwarded to the decoder and shown immediately.
    pub fn seek(&mut self, position_ms: u64) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        let length_ms = self
            .current
            .and_then(|i| self.catalog.get(i))
            .map_or(0, |t| t.duration_ms);
        let position_ms = if length_ms > 0 {
            position_ms.min(length_ms)
        } else {
            position_ms
        };
        decoder.seek_to(position_ms);
        self.view.set_position(position_ms);
    }

    pub fn seek_by(&mut self, delta_ms: i64) {
        let Some(decoder) = self.decoder.as_ref() else {
            return;
        };
        let base = decoder.current_position() as i64;
        self.seek(base.saturating_add(delta_ms).max(0) as u64);
    }

    pub fn next(&mut self) {
        self.advance(Direction::Forward);
    }

    /// Restart the current track when past the threshold, otherwise go back.
    pub fn previous(&mut self) {
        let Some(decoder) = self.decoder.as_mut() else {
            return;
        };
        if decoder.current_position() > self.restart_threshold_ms {
            decoder.seek_to(0);
            self.view.set_position(0);
            return;
        }
        self.advance(Direction::Backward);
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
        self.view.shuffle = self.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
        self.view.repeat = self.repeat;
    }

    /// Run the position poll if it is due at `now`.
    pub fn tick(&mut self, now: Instant) {
        if !self.poll.fire_if_due(now) {
            return;
        }
        if let Some(decoder) = self.decoder.as_ref() {
            if decoder.is_playing() {
                let position = decoder.current_position();
                self.view.set_position(position);
            }
        }
    }

    /// How long the owner may wait before the next poll tick.
    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.poll.time_until_due(now)
    }

    #[cfg(test)]
    pub fn poll_active(&self) -> bool {
        self.poll.is_active()
    }

    /// Release the decoder and cancel every pending poll tick.
    pub fn shutdown(&mut self) {
        self.release_decoder();
        self.poll.cancel();
        self.state = PlaybackState::Idle;
        self.view.icon = TransportIcon::Play;
        info!("session shut down");
    }

    fn advance(&mut self, direction: Direction) {
        let roll = &mut self.roll;
        let next = next_index(
            self.current,
            self.catalog.len(),
            self.repeat,
            self.shuffle,
            direction,
            |len| roll(len),
        );
        if let Some(i) = next {
            self.select_track(i);
        }
    }

    fn on_signal(&mut self, generation: u64, signal: DecoderSignal) {
        if generation != self.generation || self.decoder.is_none() {
            debug!(generation, current = self.generation, ?signal, "stale decoder signal");
            return;
        }

        match signal {
            DecoderSignal::Prepared => self.on_prepared(),
            DecoderSignal::Completed => {
                if self.state == PlaybackState::Playing {
                    debug!(index = ?self.current, "track completed");
                    self.advance(Direction::Forward);
                }
            }
            DecoderSignal::Failed(reason) => {
                if self.state == PlaybackState::Preparing {
                    warn!(index = ?self.current, "decoder failed to prepare: {reason}");
                    self.release_decoder();
                    self.enter_failed(reason);
                }
            }
        }
    }

    fn on_prepared(&mut self) {
        if self.state != PlaybackState::Preparing {
            return;
        }
        let duration_ms = self
            .current
            .and_then(|i| self.catalog.get(i))
            .map(|t| t.duration_ms)
            .unwrap_or(0);

        if let Some(decoder) = self.decoder.as_mut() {
            decoder.start();
        }
        self.state = PlaybackState::Playing;
        self.view.icon = TransportIcon::Pause;
        self.view.seek_max_ms = duration_ms;
        self.view.total_text = format_time(duration_ms);
        self.view.set_position(0);
        self.poll.start(Instant::now());
    }

    fn enter_failed(&mut self, reason: String) {
        self.poll.cancel();
        self.state = PlaybackState::Idle;
        self.view.icon = TransportIcon::Play;
        self.view.seek_max_ms = 0;
        self.view.total_text = format_time(0);
        self.view.set_position(0);
        self.view.error = Some(reason);
    }

    fn release_decoder(&mut self) {
        if let Some(mut decoder) = self.decoder.take() {
            decoder.release();
        }
    }

    fn signal_sender(&self) -> SignalSender {
        let tx = self.events.clone();
        SignalSender::new(
            self.generation,
            Arc::new(move |generation, signal| {
                let _ = tx.send(SessionEvent::Decoder { generation, signal });
            }),
        )
    }
}
