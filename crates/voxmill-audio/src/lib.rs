//! Voxmill Audio Core
//!
//! Post-processing for synthesized speech: an ordered effect chain, a
//! two-voice mixer, a watermark codec, and deterministic WAV I/O.
//!
//! Stages take a [`PcmBuffer`] and hand back a new one. Nothing here keeps
//! global state; the same inputs always render the same samples.
//!
//! # Example
//!
//! ```
//! use voxmill_audio::{effects::EffectChain, watermark, PcmBuffer};
//! use voxmill_spec::{EffectKind, EffectSpec, WatermarkMethod, WatermarkOptions};
//!
//! let samples: Vec<f64> = (0..44100).map(|i| (i as f64 * 0.05).sin() * 0.3).collect();
//! let buffer = PcmBuffer::mono(samples, 44100).unwrap();
//!
//! let chain = EffectChain::new();
//! let processed = chain
//!     .apply(buffer, &[EffectSpec::new(EffectKind::Echo, 40.0)])
//!     .unwrap();
//!
//! let options = WatermarkOptions::new(WatermarkMethod::Lsb);
//! let marked = watermark::embed(&processed, "owner", &options).unwrap();
//! assert_eq!(watermark::extract(&marked, WatermarkMethod::Lsb).as_deref(), Some("owner"));
//! ```
//!
//! # Modules
//!
//! - [`effects`]: Effect processors and the chain that runs them
//! - [`mixer`]: Blend, morph, alternate and layered voice mixing
//! - [`watermark`]: Payload framing and the four embedding codecs
//! - [`wav`]: WAV encoding and decoding
//! - [`pcm`]: The multi-channel sample buffer
//! - [`rng`]: Seeded noise generation

pub mod effects;
pub mod error;
pub mod mixer;
pub mod pcm;
pub mod rng;
pub mod watermark;
pub mod wav;

pub use effects::{EffectChain, EffectProcessor};
pub use error::{AudioError, AudioResult};
pub use mixer::mix;
pub use pcm::PcmBuffer;
pub use watermark::{embed, embed_wav, extract, extract_wav, ExtractionResult, WatermarkPayload};
pub use wav::{decode_wav, encode_pcm16, WavResult};
