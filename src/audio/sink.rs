//! Utilities for turning a source locator into a playing `rodio` sink.
//!
//! Opening and decoding happen off the session thread; connecting the
//! decoded source to the mixer happens on `start`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::mixer::Mixer;
use rodio::{Decoder, Sink};

use crate::error::{DecoderError, DecoderResult};

pub(super) type LoadedSource = Decoder<BufReader<File>>;

/// Open and probe the file at `path`.
pub(super) fn open_source(path: &Path) -> DecoderResult<LoadedSource> {
    let display = path.display().to_string();
    let file = File::open(path).map_err(|source| DecoderError::Open {
        path: display.clone(),
        source,
    })?;

    Decoder::new(BufReader::new(file)).map_err(|e| DecoderError::Decode {
        path: display,
        reason: e.to_string(),
    })
}

/// Create a paused `Sink` on `mixer` holding `source`.
pub(super) fn connect_paused(mixer: &Mixer, source: LoadedSource) -> Sink {
    let sink = Sink::connect_new(mixer);
    sink.append(source);
    sink.pause();
    sink
}
