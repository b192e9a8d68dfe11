//! Level conversions and envelope helpers for dynamics effects.

/// Linear amplitude to decibels, floored at -120 dB.
#[inline]
pub fn amp_to_db(amp: f64) -> f64 {
    if amp <= 1e-6 {
        -120.0
    } else {
        20.0 * amp.log10()
    }
}

/// Decibels to linear amplitude.
#[inline]
pub fn db_to_amp(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// One-pole smoothing coefficient for a time constant in seconds.
#[inline]
pub fn time_coeff(seconds: f64, sample_rate: f64) -> f64 {
    if seconds <= 0.0 {
        0.0
    } else {
        (-1.0 / (seconds * sample_rate)).exp()
    }
}

/// Per-frame peak across all channels.
pub fn frame_peaks(channels: &[Vec<f64>]) -> Vec<f64> {
    let len = channels.first().map_or(0, Vec::len);
    (0..len)
        .map(|i| channels.iter().fold(0.0_f64, |a, c| a.max(c[i].abs())))
        .collect()
}
