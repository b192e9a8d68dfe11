//! Tests for effect chain dispatch and ordering.

use voxmill_spec::{EffectKind, EffectSpec};

use super::*;
use crate::error::AudioError;

fn voice_like(sample_rate: u32, len: usize) -> PcmBuffer {
    let samples = (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            0.3 * (2.0 * std::f64::consts::PI * 180.0 * t).sin()
                + 0.1 * (2.0 * std::f64::consts::PI * 910.0 * t).sin()
        })
        .collect();
    PcmBuffer::mono(samples, sample_rate).unwrap()
}

#[test]
fn test_empty_chain_is_identity() {
    let chain = EffectChain::new();
    let input = voice_like(16000, 4000);
    let output = chain.apply(input.clone(), &[]).unwrap();
    assert_eq!(output, input);
}

#[test]
fn test_every_known_kind_is_registered() {
    let chain = EffectChain::new();
    for kind in EffectKind::KNOWN {
        assert!(chain.supports(&kind), "missing processor for {}", kind);
    }
    assert!(!chain.supports(&EffectKind::Unknown("vocoder".into())));
}

#[test]
fn test_zero_intensity_bypasses_every_kind() {
    let chain = EffectChain::new();
    let input = voice_like(16000, 4000);
    for kind in EffectKind::KNOWN {
        let output = chain
            .apply(input.clone(), &[EffectSpec::new(kind.clone(), 0.0)])
            .unwrap();
        assert_eq!(output, input, "{} at intensity 0 changed the signal", kind);
    }
}

#[test]
fn test_every_kind_changes_signal_at_full_intensity() {
    let chain = EffectChain::new();
    let input = voice_like(16000, 8000);
    for kind in EffectKind::KNOWN {
        let output = chain
            .apply(input.clone(), &[EffectSpec::new(kind.clone(), 100.0)])
            .unwrap();
        assert_ne!(output, input, "{} at intensity 100 left the signal unchanged", kind);
    }
}

#[test]
fn test_unknown_kind_is_skipped() {
    let chain = EffectChain::new();
    let input = voice_like(16000, 2000);
    let effects = vec![
        EffectSpec::new("vocoder", 80.0),
        EffectSpec::new(EffectKind::Distortion, 50.0),
    ];
    let output = chain.apply(input.clone(), &effects).unwrap();

    let expected = chain
        .apply(input, &[EffectSpec::new(EffectKind::Distortion, 50.0)])
        .unwrap();
    assert_eq!(output, expected);
}

#[test]
fn test_effects_apply_in_order() {
    let chain = EffectChain::new();
    let input = voice_like(16000, 4000);
    let shaped_then_echoed = chain
        .apply(
            input.clone(),
            &[
                EffectSpec::new(EffectKind::Distortion, 100.0),
                EffectSpec::new(EffectKind::Echo, 100.0).with_param("delay_ms", 20.0),
            ],
        )
        .unwrap();
    let echoed_then_shaped = chain
        .apply(
            input,
            &[
                EffectSpec::new(EffectKind::Echo, 100.0).with_param("delay_ms", 20.0),
                EffectSpec::new(EffectKind::Distortion, 100.0),
            ],
        )
        .unwrap();
    assert_ne!(shaped_then_echoed, echoed_then_shaped);
    // Distortion last bounds the output
    assert!(echoed_then_shaped.peak() <= 1.0);
}

#[test]
fn test_time_stretch_in_chain_changes_length() {
    let chain = EffectChain::new();
    let output = chain
        .apply(
            voice_like(16000, 16000),
            &[EffectSpec::new(EffectKind::TimeStretch, 100.0)],
        )
        .unwrap();
    assert_eq!(output.len(), 20000);

    let half = chain
        .apply(
            voice_like(16000, 16000),
            &[EffectSpec::new(EffectKind::TimeStretch, 50.0).with_param("factor", 2.0)],
        )
        .unwrap();
    assert_eq!(half.len(), 24000);
}

#[test]
fn test_invalid_parameter_reported() {
    let chain = EffectChain::new();
    let err = chain
        .apply(
            voice_like(8000, 100),
            &[EffectSpec::new(EffectKind::Reverb, 50.0).with_param("room_size", -1.0)],
        )
        .unwrap_err();
    assert!(matches!(err, AudioError::InvalidParameter { ref name, .. } if name == "reverb.room_size"));
}

#[test]
fn test_intensity_out_of_range_reported() {
    let chain = EffectChain::new();
    let err = chain
        .apply(
            voice_like(8000, 100),
            &[EffectSpec::new(EffectKind::Chorus, 150.0)],
        )
        .unwrap_err();
    assert!(matches!(err, AudioError::InvalidParameter { ref name, .. } if name == "chorus.intensity"));
}

struct Invert;

impl EffectProcessor for Invert {
    fn kind(&self) -> EffectKind {
        EffectKind::Unknown("invert".into())
    }

    fn process_buffer(&self, buffer: &mut PcmBuffer, _spec: &EffectSpec) -> AudioResult<()> {
        for channel in buffer.channels_mut() {
            for s in channel.iter_mut() {
                *s = -*s;
            }
        }
        Ok(())
    }
}

#[test]
fn test_custom_processor_registration() {
    let mut chain = EffectChain::new();
    assert!(chain.register(Box::new(Invert)).is_none());

    let input = PcmBuffer::mono(vec![0.5, -0.25], 8000).unwrap();
    let output = chain
        .apply(input, &[EffectSpec::new("invert", 10.0)])
        .unwrap();
    assert_eq!(output.channel(0).unwrap(), &[-0.5, 0.25]);
}
