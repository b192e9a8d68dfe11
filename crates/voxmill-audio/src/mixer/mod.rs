//! Voice mixing.
//!
//! Combines a primary and a secondary rendering of the same text with one of
//! the [`MixMode`](voxmill_spec::MixMode)s.

mod processing;
mod voice;

#[cfg(test)]
mod tests_modes;
#[cfg(test)]
mod tests_validation;

pub use processing::{is_secondary_segment, morph_weight, seconds_to_samples, soft_saturate};
pub use voice::mix;
