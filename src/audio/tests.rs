use std::sync::{Arc, Mutex};

use super::sink::open_source;
use super::types::{DecoderSignal, SignalSender};
use crate::error::DecoderError;

#[test]
fn signal_sender_tags_signals_with_its_generation() {
    let seen: Arc<Mutex<Vec<(u64, DecoderSignal)>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let signals = SignalSender::new(
        7,
        Arc::new(move |generation, signal| sink.lock().unwrap().push((generation, signal))),
    );

    signals.send(DecoderSignal::Prepared);
    signals.clone().send(DecoderSignal::Completed);

    assert_eq!(signals.generation(), 7);
    assert_eq!(
        *seen.lock().unwrap(),
        vec![(7, DecoderSignal::Prepared), (7, DecoderSignal::Completed)]
    );
}

#[test]
fn open_source_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = open_source(&dir.path().join("missing.mp3")).err().unwrap();
    assert!(matches!(err, DecoderError::Open { .. }));
}

#[test]
fn open_source_reports_undecodable_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();

    let err = open_source(&path).err().unwrap();
    assert!(matches!(err, DecoderError::Decode { .. }));
}
