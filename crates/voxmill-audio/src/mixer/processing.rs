//! Per-sample weighting functions used by the mix modes.

/// Secondary-voice weight for `morph` at sample `index` of `len`.
///
/// Ramps from 0 to 1 over `fade` samples, holds at 1, and ramps back to 0
/// over the last `fade` samples. When the ramps overlap the lower one wins.
/// A zero fade holds 1 throughout.
#[inline]
pub fn morph_weight(index: usize, len: usize, fade: usize) -> f64 {
    if fade == 0 {
        return 1.0;
    }
    let fade = fade as f64;
    let fade_in = index as f64 / fade;
    let fade_out = (len.saturating_sub(1 + index)) as f64 / fade;
    fade_in.min(fade_out).min(1.0)
}

/// True when sample `index` belongs to a secondary segment of `alternate`.
/// Segments are `period` samples long and start with the primary voice.
#[inline]
pub fn is_secondary_segment(index: usize, period: usize) -> bool {
    (index / period) % 2 == 1
}

/// Smooth saturation used by `layered`. `|soft_saturate(x)| <= |x|` and < 1.
#[inline]
pub fn soft_saturate(x: f64) -> f64 {
    x.tanh()
}

/// Seconds to a whole number of samples.
#[inline]
pub fn seconds_to_samples(seconds: f64, sample_rate: u32) -> usize {
    (seconds * sample_rate as f64).round() as usize
}
