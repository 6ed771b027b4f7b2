//! Settings: schema types plus the file and environment loader.
//!
//! Every section has defaults, so a missing file is not an error.

mod load;
mod schema;

pub use load::default_log_dir;
pub use schema::*;

#[cfg(test)]
mod tests;
