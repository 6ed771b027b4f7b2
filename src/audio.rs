//! Audio: the decoder capability traits and their `rodio` implementation.

mod player;
mod sink;
mod types;

pub use player::RodioFactory;
pub use types::{Decoder, DecoderFactory, DecoderSignal, SignalSender};

#[cfg(test)]
mod tests;
