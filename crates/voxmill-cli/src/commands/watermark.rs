//! Watermark embed and extract commands

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;
use voxmill_audio::watermark::{capacity_bytes, embed_wav, extract_wav, parse_method};
use voxmill_audio::wav::decode_wav;
use voxmill_spec::{EngineConfig, GenerationError, WatermarkMethod, WatermarkOptions};

use super::files::{read_bytes, write_bytes};

/// Embed options given on the command line. Unset fields fall back to the
/// engine config.
#[derive(Debug, Clone, Default)]
pub struct EmbedArgs<'a> {
    pub method: Option<&'a str>,
    pub strength: Option<f64>,
    pub auxiliary: Option<&'a str>,
}

impl EmbedArgs<'_> {
    /// Merges these arguments over the configured defaults.
    pub fn resolve(&self, config: &EngineConfig) -> Result<WatermarkOptions> {
        let mut options = config.watermark.clone();
        if let Some(name) = self.method {
            options.method = parse_method(name).map_err(GenerationError::from_backend)?;
        }
        if let Some(strength) = self.strength {
            options.strength = strength;
        }
        if let Some(auxiliary) = self.auxiliary {
            options.auxiliary = auxiliary.to_string();
        }
        Ok(options)
    }
}

fn resolve_method(name: Option<&str>, config: &EngineConfig) -> Result<WatermarkMethod> {
    match name {
        Some(name) => Ok(parse_method(name).map_err(GenerationError::from_backend)?),
        None => Ok(config.watermark.method),
    }
}

/// Run the watermark embed command
///
/// # Returns
/// Exit code: 0 on success
pub fn embed(
    input: &str,
    output: &str,
    payload: &str,
    args: &EmbedArgs<'_>,
    config: &EngineConfig,
) -> Result<ExitCode> {
    let options = args.resolve(config)?;
    println!("{} {}", "Watermarking:".cyan().bold(), input);
    println!(
        "{} {} (strength {})",
        "Method:".dimmed(),
        options.method,
        options.strength
    );

    let bytes = read_bytes(input)?;
    if let Ok(decoded) = decode_wav(&bytes) {
        println!(
            "{} {} bytes",
            "Capacity:".dimmed(),
            capacity_bytes(options.method, &decoded.buffer)
        );
    }

    let marked = embed_wav(&bytes, &options, payload)
        .map_err(GenerationError::from_backend)
        .with_context(|| format!("Failed to embed watermark into {}", input))?;
    write_bytes(Path::new(output), &marked)?;

    if !options.method.is_extractable() {
        println!(
            "  {} {} marks cannot be read back",
            "!".yellow(),
            options.method
        );
    }
    println!("\n{} Wrote {}", "SUCCESS".green().bold(), output);
    Ok(ExitCode::SUCCESS)
}

/// Run the watermark extract command
///
/// # Returns
/// Exit code: 0 if a mark was found, 1 otherwise
pub fn extract(
    input: &str,
    method: Option<&str>,
    json_output: bool,
    config: &EngineConfig,
) -> Result<ExitCode> {
    let method = resolve_method(method, config)?;
    let bytes = read_bytes(input)?;
    let result = extract_wav(&bytes, method)
        .map_err(GenerationError::from_backend)
        .with_context(|| format!("Failed to read watermark from {}", input))?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} {} ({})", "Extracting:".cyan().bold(), input, method);
        match &result.payload {
            Some(payload) => println!("{} {}", "Payload:".green().bold(), payload),
            None => println!("{} no intact {} mark found", "FAILED".red().bold(), method),
        }
    }

    Ok(if result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}
