//! WAV encode and decode.
//!
//! The 16-bit writer emits no timestamps or variable metadata, so the hash of
//! its PCM data identifies rendered audio. Decoding goes through hound and
//! accepts integer and float files.

mod format;
mod pcm;
mod reader;
mod result;
mod writer;


pub use format::{SampleEncoding, WavFormat};
pub use pcm::{compute_pcm_hash, extract_pcm_data};
pub use reader::{decode_wav, read_wav_file, DecodedWav};
pub use result::WavResult;
pub use writer::{
    buffer_to_pcm16, encode_float32, encode_pcm16, quantize_16, samples_to_pcm16, write_wav,
    write_wav_to_vec,
};
