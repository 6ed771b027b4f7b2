use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use rodio::Sink;
use rodio::mixer::Mixer;
use tracing::{debug, warn};

use crate::error::{DecoderError, DecoderResult};
use crate::library::SourceLocator;

use super::sink::{LoadedSource, connect_paused, open_source};
use super::types::{Decoder, DecoderFactory, DecoderSignal, SignalSender};

/// How often the completion watcher checks whether the sink drained.
const COMPLETION_CHECK: Duration = Duration::from_millis(200);

/// A decoder resource backed by a `rodio` sink on a shared mixer.
pub struct RodioDecoder {
    mixer: Mixer,
    signals: SignalSender,
    path: Option<PathBuf>,
    loaded: Arc<Mutex<Option<LoadedSource>>>,
    sink: Option<Arc<Sink>>,
    released: Arc<AtomicBool>,
}

impl RodioDecoder {
    fn new(mixer: Mixer, signals: SignalSender) -> Self {
        Self {
            mixer,
            signals,
            path: None,
            loaded: Arc::new(Mutex::new(None)),
            sink: None,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    fn spawn_completion_watcher(&self, sink: Arc<Sink>) {
        let released = self.released.clone();
        let signals = self.signals.clone();
        thread::spawn(move || {
            loop {
                thread::sleep(COMPLETION_CHECK);
                if released.load(Ordering::Acquire) {
                    return;
                }
                if sink.empty() {
                    signals.send(DecoderSignal::Completed);
                    return;
                }
            }
        });
    }
}

impl Decoder for RodioDecoder {
    fn set_source(&mut self, source: &SourceLocator) -> DecoderResult<()> {
        if source.as_str().is_empty() {
            return Err(DecoderError::NoSource);
        }
        self.path = Some(PathBuf::from(source.as_str()));
        Ok(())
    }

    fn prepare_async(&mut self) {
        let Some(path) = self.path.clone() else {
            self.signals
                .send(DecoderSignal::Failed(DecoderError::NoSource.to_string()));
            return;
        };

        let loaded = self.loaded.clone();
        let released = self.released.clone();
        let signals = self.signals.clone();
        thread::spawn(move || {
            let result = open_source(&path);
            if released.load(Ordering::Acquire) {
                return;
            }
            match result {
                Ok(source) => {
                    if let Ok(mut slot) = loaded.lock() {
                        *slot = Some(source);
                    }
                    signals.send(DecoderSignal::Prepared);
                }
                Err(e) => signals.send(DecoderSignal::Failed(e.to_string())),
            }
        });
    }

    fn start(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.play();
            // The watcher has already reported and exited; a drained sink
            // resumed from pause must report completion again.
            if sink.empty() {
                self.signals.send(DecoderSignal::Completed);
            }
            return;
        }

        let source = self.loaded.lock().ok().and_then(|mut slot| slot.take());
        let Some(source) = source else {
            warn!(generation = self.signals.generation(), "start called before prepare finished");
            return;
        };

        let sink = Arc::new(connect_paused(&self.mixer, source));
        sink.play();
        self.spawn_completion_watcher(sink.clone());
        self.sink = Some(sink);
    }

    fn pause(&mut self) {
        if let Some(sink) = self.sink.as_ref() {
            sink.pause();
        }
    }

    fn seek_to(&mut self, position_ms: u64) {
        let Some(sink) = self.sink.as_ref() else {
            return;
        };
        if let Err(e) = sink.try_seek(Duration::from_millis(position_ms)) {
            warn!("{}", DecoderError::Seek(e.to_string()));
        }
    }

    fn current_position(&self) -> u64 {
        self.sink
            .as_ref()
            .map(|s| s.get_pos().as_millis() as u64)
            .unwrap_or(0)
    }

    fn is_playing(&self) -> bool {
        self.sink
            .as_ref()
            .map(|s| !s.is_paused() && !s.empty())
            .unwrap_or(false)
    }

    fn release(&mut self) {
        if self.released.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        if let Ok(mut slot) = self.loaded.lock() {
            slot.take();
        }
        debug!(generation = self.signals.generation(), "decoder released");
    }
}

impl Drop for RodioDecoder {
    fn drop(&mut self) {
        self.release();
    }
}

/// Creates `RodioDecoder`s attached to one output mixer.
pub struct RodioFactory {
    mixer: Mixer,
}

impl RodioFactory {
    pub fn new(mixer: Mixer) -> Self {
        Self { mixer }
    }
}

impl DecoderFactory for RodioFactory {
    type Decoder = RodioDecoder;

    fn create(&mut self, signals: SignalSender) -> RodioDecoder {
        RodioDecoder::new(self.mixer.clone(), signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_decoder() -> (RodioDecoder, Mixer, Arc<Mutex<Vec<DecoderSignal>>>) {
        let (mixer, _source) = rodio::mixer::mixer(2, 44_100);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let signals = SignalSender::new(
            1,
            Arc::new(move |_, signal| sink.lock().unwrap().push(signal)),
        );
        (RodioDecoder::new(mixer.clone(), signals), mixer, seen)
    }

    #[test]
    fn resuming_a_drained_sink_reports_completion() {
        let (mut decoder, mixer, seen) = recording_decoder();
        decoder.sink = Some(Arc::new(Sink::connect_new(&mixer)));

        decoder.pause();
        assert!(seen.lock().unwrap().is_empty());

        decoder.start();
        assert_eq!(*seen.lock().unwrap(), vec![DecoderSignal::Completed]);
    }

    #[test]
    fn start_before_prepare_does_nothing() {
        let (mut decoder, _mixer, seen) = recording_decoder();
        decoder.start();
        assert!(decoder.sink.is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn release_is_idempotent() {
        let (mut decoder, mixer, _seen) = recording_decoder();
        decoder.sink = Some(Arc::new(Sink::connect_new(&mixer)));
        decoder.release();
        decoder.release();
        assert!(decoder.sink.is_none());
        assert!(decoder.released.load(Ordering::Acquire));
    }
}
