//! Playback session: the state machine behind the transport controls.
//!
//! `PlaybackSession` owns the catalog, the decoder factory and at most one
//! live decoder. Input, remote commands and decoder signals reach it as
//! `SessionEvent`s; the screen reads its `PlaybackView`.

mod advance;
mod event;
mod machine;
mod poll;
mod view;

pub use event::{PlaybackState, SessionEvent};
pub use machine::PlaybackSession;
pub use view::{PlaybackView, TransportIcon, format_time};
