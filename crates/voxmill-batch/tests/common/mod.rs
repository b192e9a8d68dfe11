//! Shared test synthesizers.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{Receiver, Sender};
use std::sync::Mutex;

use voxmill_audio::PcmBuffer;
use voxmill_batch::{SynthesisError, SynthesisRequest, Synthesizer};

pub const SAMPLE_RATE: u32 = 16000;

/// Samples rendered per text character.
pub const SAMPLES_PER_CHAR: usize = 400;

fn tone(text: &str, voice: &str, channels: usize) -> Result<PcmBuffer, SynthesisError> {
    let freq = 120.0 + 40.0 * voice.len() as f64;
    let len = text.chars().count() * SAMPLES_PER_CHAR;
    let samples: Vec<f64> = (0..len)
        .map(|i| 0.3 * (2.0 * std::f64::consts::PI * freq * i as f64 / SAMPLE_RATE as f64).sin())
        .collect();
    PcmBuffer::new(vec![samples; channels], SAMPLE_RATE)
        .map_err(|e| SynthesisError::Backend(e.to_string()))
}

/// Renders a tone per item. Voice `broken` fails, `wide` is stereo and
/// `fatal` panics.
#[derive(Default)]
pub struct ToneSynth {
    pub calls: AtomicUsize,
}

impl Synthesizer for ToneSynth {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<PcmBuffer, SynthesisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match request.voice_id.as_str() {
            "broken" => Err(SynthesisError::Backend("model offline".to_string())),
            "wide" => tone(&request.text, &request.voice_id, 2),
            "fatal" => panic!("synthesizer crashed on {:?}", request.text),
            voice => tone(&request.text, voice, 1),
        }
    }
}

/// Blocks inside call `block_on` until released.
pub struct GatedSynth {
    pub calls: AtomicUsize,
    block_on: usize,
    started: Mutex<Sender<usize>>,
    release: Mutex<Receiver<()>>,
}

impl GatedSynth {
    pub fn new(block_on: usize) -> (Self, Receiver<usize>, Sender<()>) {
        let (started_tx, started_rx) = std::sync::mpsc::channel();
        let (release_tx, release_rx) = std::sync::mpsc::channel();
        let synth = Self {
            calls: AtomicUsize::new(0),
            block_on,
            started: Mutex::new(started_tx),
            release: Mutex::new(release_rx),
        };
        (synth, started_rx, release_tx)
    }
}

impl Synthesizer for GatedSynth {
    fn synthesize(&self, request: &SynthesisRequest) -> Result<PcmBuffer, SynthesisError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.block_on {
            let _ = self.started.lock().unwrap().send(n);
            let _ = self.release.lock().unwrap().recv();
        }
        tone(&request.text, &request.voice_id, 1)
    }
}
