//! Voice mix command

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use voxmill_audio::{encode_pcm16, mix};
use voxmill_spec::{GenerationError, MixMode, MixSpec};

use super::files::{read_wav, write_bytes};

/// Builds a mix spec from command-line values.
pub fn mix_spec(mode: &str, ratio: f64, crossfade: f64) -> Result<MixSpec> {
    let mode: MixMode = mode.parse().map_err(|e: String| anyhow!(e))?;
    Ok(MixSpec::new(mode, ratio).with_crossfade(crossfade))
}

/// Run the mix command
///
/// # Arguments
/// * `primary` - Path to the primary voice WAV
/// * `secondary` - Path to the secondary voice WAV
/// * `output` - Output WAV path
/// * `spec` - Mixing parameters
///
/// # Returns
/// Exit code: 0 on success
pub fn run(primary: &str, secondary: &str, output: &str, spec: &MixSpec) -> Result<ExitCode> {
    println!(
        "{} {} + {} ({}, ratio {})",
        "Mixing:".cyan().bold(),
        primary,
        secondary,
        spec.mode,
        spec.mix_ratio
    );

    let a = read_wav(primary)?;
    let b = read_wav(secondary)?;
    let mixed = mix(&a.buffer, &b.buffer, spec)
        .map_err(GenerationError::from_backend)
        .with_context(|| format!("Failed to mix {} with {}", primary, secondary))?;
    let bytes = encode_pcm16(&mixed).map_err(GenerationError::from_backend)?;
    write_bytes(Path::new(output), &bytes)?;

    println!(
        "\n{} Wrote {} ({:.2}s)",
        "SUCCESS".green().bold(),
        output,
        mixed.duration_seconds()
    );
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_spec_parses_mode() {
        let spec = mix_spec("morph", 40.0, 0.5).unwrap();
        assert_eq!(spec.mode, MixMode::Morph);
        assert_eq!(spec.mix_ratio, 40.0);
        assert_eq!(spec.crossfade_seconds, 0.5);
    }

    #[test]
    fn test_mix_spec_unknown_mode() {
        let err = mix_spec("duet", 50.0, 0.0).unwrap_err();
        assert!(err.to_string().contains("duet"));
    }
}
