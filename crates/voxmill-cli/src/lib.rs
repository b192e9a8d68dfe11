//! Voxmill CLI library.
//!
//! Command implementations for the `voxmill` binary, plus the offline clip
//! synthesizer the `batch` command renders with.

pub mod clips;
pub mod commands;
pub mod logging;
