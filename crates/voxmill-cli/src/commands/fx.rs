//! Effect chain command
//!
//! Runs a WAV file through an ordered list of effects read from JSON.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use voxmill_audio::EffectChain;
use voxmill_spec::validation::validate_effect;
use voxmill_spec::{EffectSpec, GenerationError, ValidationResult};

use super::files::{encode_as, read_wav, write_bytes};

/// Loads an effect list: a JSON array of `{"type", "intensity", ...}`.
pub fn load_effects(path: &str) -> Result<Vec<EffectSpec>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read effects file: {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse effects file: {}", path))
}

/// Run the fx command
///
/// # Returns
/// Exit code: 0 on success, 1 if the effect list is invalid
pub fn run(input: &str, output: &str, effects_path: &str) -> Result<ExitCode> {
    println!("{} {}", "Processing:".cyan().bold(), input);
    let effects = load_effects(effects_path)?;

    let mut validation = ValidationResult::success();
    for (i, effect) in effects.iter().enumerate() {
        validate_effect(effect, &format!("effects[{}]", i), &mut validation);
    }
    for warning in &validation.warnings {
        println!("  {} {}", "!".yellow(), warning);
    }
    if !validation.is_ok() {
        for error in &validation.errors {
            println!("  {} {}", "x".red(), error);
        }
        println!(
            "\n{} Effect list has {} error(s)",
            "FAILED".red().bold(),
            validation.errors.len()
        );
        return Ok(ExitCode::from(1));
    }

    let decoded = read_wav(input)?;
    let chain = EffectChain::new();
    let names: Vec<&str> = effects.iter().map(|e| e.kind.as_str()).collect();
    println!(
        "{} {}",
        "Chain:".dimmed(),
        if names.is_empty() {
            "(empty)".to_string()
        } else {
            names.join(" -> ")
        }
    );

    let processed = chain
        .apply(decoded.buffer, &effects)
        .map_err(GenerationError::from_backend)
        .context("Effect chain failed")?;
    write_bytes(Path::new(output), &encode_as(&processed, decoded.encoding)?)?;

    println!(
        "\n{} Wrote {} ({:.2}s)",
        "SUCCESS".green().bold(),
        output,
        processed.duration_seconds()
    );
    Ok(ExitCode::SUCCESS)
}
