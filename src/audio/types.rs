//! Decoder capability traits and the signals a decoder emits.
//!
//! A decoder is one playback resource bound to one source. It never calls
//! back into the session directly: readiness, completion and preparation
//! failures are sent as `DecoderSignal`s tagged with the generation of the
//! resource that produced them.

use std::fmt;
use std::sync::Arc;

use crate::error::DecoderResult;
use crate::library::SourceLocator;

/// Asynchronous notifications from a decoder resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecoderSignal {
    /// `prepare_async` finished; `start` may be called.
    Prepared,
    /// Playback reached the end of the source.
    Completed,
    /// `prepare_async` failed.
    Failed(String),
}

type Notify = dyn Fn(u64, DecoderSignal) + Send + Sync;

/// Cloneable handle a decoder uses to report signals for its generation.
#[derive(Clone)]
pub struct SignalSender {
    generation: u64,
    notify: Arc<Notify>,
}

impl SignalSender {
    pub fn new(generation: u64, notify: Arc<Notify>) -> Self {
        Self { generation, notify }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn send(&self, signal: DecoderSignal) {
        (self.notify)(self.generation, signal);
    }
}

impl fmt::Debug for SignalSender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalSender")
            .field("generation", &self.generation)
            .finish_non_exhaustive()
    }
}

/// Control surface of a single decoding/playback resource.
///
/// Positions are in milliseconds.
pub trait Decoder {
    fn set_source(&mut self, source: &SourceLocator) -> DecoderResult<()>;
    /// Begin preparing the source; completion is reported through the
    /// `SignalSender` the decoder was created with.
    fn prepare_async(&mut self);
    fn start(&mut self);
    fn pause(&mut self);
    fn seek_to(&mut self, position_ms: u64);
    fn current_position(&self) -> u64;
    fn is_playing(&self) -> bool;
    /// Free the underlying resource. Signals sent afterwards are dropped by
    /// the session through their stale generation.
    fn release(&mut self);
}

/// Acquires fresh decoder resources.
pub trait DecoderFactory {
    type Decoder: Decoder;

    fn create(&mut self, signals: SignalSender) -> Self::Decoder;
}
