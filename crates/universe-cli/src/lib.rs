//! CLI library components for the universe builder.

pub mod edits;
pub mod logging;
