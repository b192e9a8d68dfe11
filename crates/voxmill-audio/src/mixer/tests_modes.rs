//! Tests for the individual mix modes.

use voxmill_spec::{MixMode, MixSpec};

use super::*;
use crate::pcm::PcmBuffer;

fn constant(value: f64, len: usize) -> PcmBuffer {
    PcmBuffer::mono(vec![value; len], 1000).unwrap()
}

fn ramp(len: usize) -> PcmBuffer {
    PcmBuffer::mono((0..len).map(|i| (i as f64 * 0.37).sin()).collect(), 1000).unwrap()
}

#[test]
fn test_blend_ratio_zero_is_primary() {
    let p = ramp(100);
    let s = constant(0.8, 100);
    let out = mix(&p, &s, &MixSpec::new(MixMode::Blend, 0.0)).unwrap();
    assert_eq!(out, p);
}

#[test]
fn test_blend_ratio_hundred_is_padded_secondary() {
    let p = ramp(100);
    let s = constant(0.8, 60);
    let out = mix(&p, &s, &MixSpec::new(MixMode::Blend, 100.0)).unwrap();
    assert_eq!(out, s.padded_to(100));
}

#[test]
fn test_blend_midpoint() {
    let out = mix(
        &constant(1.0, 4),
        &constant(-1.0, 4),
        &MixSpec::new(MixMode::Blend, 25.0),
    )
    .unwrap();
    for &v in out.channel(0).unwrap() {
        assert!((v - 0.5).abs() < 1e-12);
    }
}

#[test]
fn test_output_length_is_max() {
    let out = mix(&ramp(30), &ramp(80), &MixSpec::new(MixMode::Layered, 50.0)).unwrap();
    assert_eq!(out.len(), 80);
    let out = mix(&ramp(80), &ramp(30), &MixSpec::new(MixMode::Layered, 50.0)).unwrap();
    assert_eq!(out.len(), 80);
}

#[test]
fn test_morph_envelope() {
    // 1000 samples at 1 kHz, 100 ms fades
    let p = constant(0.0, 1000);
    let s = constant(1.0, 1000);
    let spec = MixSpec::new(MixMode::Morph, 100.0).with_crossfade(0.1);
    let out = mix(&p, &s, &spec).unwrap();
    let ch = out.channel(0).unwrap();

    assert_eq!(ch[0], 0.0);
    assert!((ch[50] - 0.5).abs() < 1e-12);
    assert_eq!(ch[500], 1.0);
    assert!((ch[949] - 0.5).abs() < 1e-12);
    assert_eq!(ch[999], 0.0);
}

#[test]
fn test_morph_middle_is_secondary_for_any_ratio() {
    let p = constant(1.0, 1000);
    let s = constant(-1.0, 1000);
    for ratio in [0.0, 25.0, 50.0, 100.0] {
        let out = mix(&p, &s, &MixSpec::new(MixMode::Morph, ratio).with_crossfade(0.1)).unwrap();
        assert_eq!(out.channel(0).unwrap()[500], -1.0, "ratio {}", ratio);
    }

    // No crossfade holds the secondary everywhere
    let out = mix(&p, &s, &MixSpec::new(MixMode::Morph, 40.0)).unwrap();
    assert!(out.channel(0).unwrap().iter().all(|&v| v == -1.0));
}

#[test]
fn test_alternate_switches_every_period() {
    let p = constant(1.0, 100);
    let s = constant(-1.0, 100);
    let out = mix(&p, &s, &MixSpec::new(MixMode::Alternate, 50.0).with_crossfade(0.02)).unwrap();
    let ch = out.channel(0).unwrap();
    assert_eq!(ch[0], 1.0);
    assert_eq!(ch[19], 1.0);
    assert_eq!(ch[20], -1.0);
    assert_eq!(ch[39], -1.0);
    assert_eq!(ch[40], 1.0);
}

#[test]
fn test_layered_saturates() {
    let out = mix(
        &constant(0.9, 10),
        &constant(0.9, 10),
        &MixSpec::new(MixMode::Layered, 100.0),
    )
    .unwrap();
    let v = out.channel(0).unwrap()[0];
    assert!((v - 1.8_f64.tanh()).abs() < 1e-12);
    assert!(v < 1.0);
}

#[test]
fn test_amplitude_bound_for_every_mode_and_ratio() {
    let p = ramp(400);
    let s = PcmBuffer::mono((0..300).map(|i| (i as f64 * 0.11).cos() * 0.7).collect(), 1000)
        .unwrap();
    let ps = p.padded_to(400);
    let ss = s.padded_to(400);

    for mode in [MixMode::Blend, MixMode::Morph, MixMode::Alternate, MixMode::Layered] {
        for ratio in [0.0, 10.0, 33.0, 50.0, 75.0, 100.0] {
            let spec = MixSpec::new(mode, ratio).with_crossfade(0.05);
            let out = mix(&p, &s, &spec).unwrap();
            for i in 0..400 {
                let bound = ps.channel(0).unwrap()[i].abs() + ss.channel(0).unwrap()[i].abs();
                assert!(
                    out.channel(0).unwrap()[i].abs() <= bound + 1e-12,
                    "{} ratio {} index {}",
                    mode,
                    ratio,
                    i
                );
            }
        }
    }
}

#[test]
fn test_channels_mixed_independently() {
    let p = PcmBuffer::new(vec![vec![1.0; 4], vec![0.0; 4]], 1000).unwrap();
    let s = PcmBuffer::new(vec![vec![0.0; 4], vec![1.0; 4]], 1000).unwrap();
    let out = mix(&p, &s, &MixSpec::new(MixMode::Blend, 50.0)).unwrap();
    assert_eq!(out.channel(0).unwrap(), &[0.5; 4]);
    assert_eq!(out.channel(1).unwrap(), &[0.5; 4]);
}

#[test]
fn test_weight_helpers() {
    assert_eq!(morph_weight(0, 100, 0), 1.0);
    assert_eq!(morph_weight(5, 10, 10), 0.4);
    assert_eq!(morph_weight(50, 100, 10), 1.0);
    assert!(!is_secondary_segment(0, 5));
    assert!(is_secondary_segment(5, 5));
    assert_eq!(seconds_to_samples(0.5, 44100), 22050);
}
