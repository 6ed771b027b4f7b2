/// Glyph shown on the play/pause button.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum TransportIcon {
    /// Pressing the button would start playback.
    #[default]
    Play,
    /// Pressing the button would pause playback.
    Pause,
}

/// Everything the screen shows about the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackView {
    pub title: String,
    pub artist: String,
    pub icon: TransportIcon,
    pub seek_max_ms: u64,
    pub seek_value_ms: u64,
    pub elapsed_text: String,
    pub total_text: String,
    pub shuffle: bool,
    pub repeat: bool,
    /// Last preparation failure, cleared by the next selection.
    pub error: Option<String>,
}

impl Default for PlaybackView {
    fn default() -> Self {
        Self {
            title: String::new(),
            artist: String::new(),
            icon: TransportIcon::Play,
            seek_max_ms: 0,
            seek_value_ms: 0,
            elapsed_text: format_time(0),
            total_text: format_time(0),
            shuffle: false,
            repeat: false,
            error: None,
        }
    }
}

impl PlaybackView {
    pub(super) fn set_position(&mut self, position_ms: u64) {
        self.seek_value_ms = position_ms;
        self.elapsed_text = format_time(position_ms);
    }

    /// Seek-bar fill in `0.0..=1.0`.
    pub fn progress(&self) -> f64 {
        if self.seek_max_ms == 0 {
            return 0.0;
        }
        (self.seek_value_ms as f64 / self.seek_max_ms as f64).clamp(0.0, 1.0)
    }
}

/// Format milliseconds as `MM:SS`. Minutes do not roll over into hours.
pub fn format_time(millis: u64) -> String {
    let secs = millis / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
