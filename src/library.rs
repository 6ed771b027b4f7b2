//! Library: the media index and the track catalog built from it.
//!
//! `FsMediaIndex` walks a directory and reads tags; `Catalog` is the
//! ordered, load-once list of tracks the player works from.

mod catalog;
mod model;
mod scan;

pub use catalog::{Catalog, MediaIndex};
pub use model::{IndexRow, SourceLocator, Track};
pub use scan::FsMediaIndex;

#[cfg(test)]
pub use catalog::StaticIndex;

#[cfg(test)]
mod tests;
