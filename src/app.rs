//! Application module: exposes the list model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the list titles and the
//! cursor; playback state lives in the session.

mod model;

pub use model::*;
