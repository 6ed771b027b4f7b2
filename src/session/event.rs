use crate::audio::DecoderSignal;

/// Lifecycle state of the playback session.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// No decoder resource held.
    #[default]
    Idle,
    /// Decoder acquired and bound, waiting for readiness.
    Preparing,
    Playing,
    Paused,
}

/// Everything that can drive the session: user input, remote control and
/// decoder signals all arrive through one channel of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Play the catalog entry at this index.
    Select(usize),
    TogglePlayPause,
    /// Resume if paused, otherwise start the current (or first) track.
    Play,
    /// Pause if playing.
    Pause,
    /// User dragged the seek bar to this position (milliseconds).
    Seek(u64),
    /// Scrub relative to the current position (milliseconds).
    SeekBy(i64),
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    /// A decoder resource reported something.
    Decoder { generation: u64, signal: DecoderSignal },
    /// Release everything; the runtime exits after handling it.
    Quit,
}
