//! Tests for mixer input checks.

use voxmill_spec::{MixMode, MixSpec};

use super::*;
use crate::error::AudioError;
use crate::pcm::PcmBuffer;

#[test]
fn test_channel_count_mismatch() {
    let mono = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
    let stereo = PcmBuffer::silence(2, 10, 8000).unwrap();
    let err = mix(&mono, &stereo, &MixSpec::default()).unwrap_err();
    assert!(matches!(err, AudioError::DimensionMismatch { .. }));
}

#[test]
fn test_sample_rate_mismatch() {
    let a = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
    let b = PcmBuffer::mono(vec![0.0; 10], 16000).unwrap();
    let err = mix(&a, &b, &MixSpec::default()).unwrap_err();
    assert!(matches!(
        err,
        AudioError::SampleRateMismatch {
            expected: 8000,
            found: 16000
        }
    ));
}

#[test]
fn test_alternate_needs_a_period() {
    let a = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
    let err = mix(&a, &a, &MixSpec::new(MixMode::Alternate, 50.0)).unwrap_err();
    assert!(matches!(err, AudioError::InvalidParameter { ref name, .. } if name == "mix.crossfade_seconds"));

    // Less than half a sample rounds to zero
    let spec = MixSpec::new(MixMode::Alternate, 50.0).with_crossfade(0.00001);
    assert!(mix(&a, &a, &spec).is_err());
}

#[test]
fn test_ratio_and_crossfade_ranges() {
    let a = PcmBuffer::mono(vec![0.0; 10], 8000).unwrap();
    assert!(mix(&a, &a, &MixSpec::new(MixMode::Blend, 101.0)).is_err());
    assert!(mix(&a, &a, &MixSpec::new(MixMode::Blend, f64::NAN)).is_err());
    assert!(mix(&a, &a, &MixSpec::new(MixMode::Morph, 50.0).with_crossfade(-0.1)).is_err());
}

#[test]
fn test_inputs_not_modified() {
    let a = PcmBuffer::mono(vec![0.2; 10], 8000).unwrap();
    let b = PcmBuffer::mono(vec![0.4; 5], 8000).unwrap();
    let (a0, b0) = (a.clone(), b.clone());
    let _ = mix(&a, &b, &MixSpec::new(MixMode::Layered, 70.0)).unwrap();
    assert_eq!(a, a0);
    assert_eq!(b, b0);
}
