//! Batch render command
//!
//! Renders a batch request with the clip synthesizer and writes every
//! artifact plus a JSON report into an output directory.

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use voxmill_audio::encode_pcm16;
use voxmill_batch::{ArtifactContent, BatchOrchestrator, JobSnapshot};
use voxmill_spec::{BatchRequest, EngineConfig, GenerationError, JobStatus};

use super::files::write_bytes;
use crate::clips::ClipSynthesizer;

/// File name of the job report inside the output directory.
pub const REPORT_FILE_NAME: &str = "batch-report.json";

fn fill_missing(object: &mut serde_json::Map<String, Value>, key: &str, value: Value) {
    if !object.contains_key(key) {
        object.insert(key.to_string(), value);
    }
}

/// Applies config defaults to fields a request file leaves out.
pub fn apply_defaults(mut value: Value, config: &EngineConfig) -> Result<Value> {
    if let Some(object) = value.as_object_mut() {
        fill_missing(object, "output_mode", serde_json::to_value(config.output_mode)?);
        fill_missing(object, "naming", serde_json::to_value(&config.naming)?);

        if let Some(mark) = object.get_mut("watermark").and_then(Value::as_object_mut) {
            fill_missing(mark, "method", serde_json::to_value(config.watermark.method)?);
            fill_missing(mark, "strength", serde_json::to_value(config.watermark.strength)?);
        }
    }
    Ok(value)
}

/// Loads a batch request file, filling unset defaults from `config`.
pub fn load_request(path: &Path, config: &EngineConfig) -> Result<BatchRequest> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse request file: {}", path.display()))?;
    let value = apply_defaults(value, config)?;
    serde_json::from_value(value)
        .with_context(|| format!("Invalid batch request: {}", path.display()))
}

/// Writes every artifact of a finished job and the job report.
///
/// # Returns
/// Path of the written report
pub fn write_outputs(snapshot: &JobSnapshot, out_dir: &Path) -> Result<std::path::PathBuf> {
    for artifact in &snapshot.outputs {
        let path = out_dir.join(&artifact.file_name);
        match &artifact.content {
            ArtifactContent::Audio(buffer) => {
                let bytes = encode_pcm16(buffer).map_err(GenerationError::from_backend)?;
                write_bytes(&path, &bytes)?
            }
            ArtifactContent::Playlist(text) => write_bytes(&path, text.as_bytes())?,
        }
        log::debug!("wrote {}", path.display());
    }

    let report_path = out_dir.join(REPORT_FILE_NAME);
    let report = serde_json::to_string_pretty(&snapshot.report())?;
    write_bytes(&report_path, report.as_bytes())?;
    Ok(report_path)
}

fn print_progress(snapshot: &JobSnapshot) {
    if snapshot.is_terminal() {
        return;
    }
    let eta = snapshot
        .estimated_time_remaining
        .map(|s| format!(", ~{:.1}s left", s))
        .unwrap_or_default();
    println!(
        "  {} {}/{} ({:.0}%{})",
        "-".dimmed(),
        snapshot.completed_count,
        snapshot.total_items,
        snapshot.progress,
        eta.dimmed()
    );
}

/// Run the batch command
///
/// # Arguments
/// * `request_path` - Path to the batch request JSON
/// * `voices_dir` - Directory of `<voice_id>.wav` clips
/// * `out_dir` - Directory for artifacts and the report
/// * `json_output` - Print the job report as JSON instead of progress lines
/// * `config` - Engine defaults
///
/// # Returns
/// Exit code: 0 if the job completed, 1 otherwise
pub fn run(
    request_path: &str,
    voices_dir: &str,
    out_dir: &str,
    json_output: bool,
    config: &EngineConfig,
) -> Result<ExitCode> {
    let request = load_request(Path::new(request_path), config)?;
    let budget = config.budget_profile()?;
    let orchestrator = BatchOrchestrator::new(Arc::new(ClipSynthesizer::new(voices_dir)))
        .with_budget(budget);

    if !json_output {
        println!(
            "{} {} ({} items, {})",
            "Rendering:".cyan().bold(),
            request.job_id,
            request.items.len(),
            request.output_mode
        );
    }

    let snapshot = orchestrator
        .run(request, |snapshot: &JobSnapshot| {
            if !json_output {
                print_progress(snapshot);
            }
        })
        .map_err(GenerationError::from_backend)
        .context("Batch job could not start")?;

    let out = Path::new(out_dir);
    let report_path = write_outputs(&snapshot, out)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&snapshot.report())?);
    } else {
        for error in &snapshot.errors {
            println!("  {} {}", "!".yellow(), error);
        }
        for artifact in &snapshot.outputs {
            println!(
                "  {} {} ({:.2}s)",
                "+".green(),
                artifact.file_name,
                artifact.duration_seconds
            );
        }
        println!("{} {}", "Report:".dimmed(), report_path.display());
    }

    match snapshot.status {
        JobStatus::Completed => {
            if !json_output {
                println!(
                    "\n{} {}/{} items rendered",
                    "SUCCESS".green().bold(),
                    snapshot.completed_count.saturating_sub(snapshot.errors.len()),
                    snapshot.total_items
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        status => {
            if !json_output {
                println!("\n{} Job {}", "FAILED".red().bold(), status);
            }
            Ok(ExitCode::from(1))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use voxmill_spec::{NamingOptions, OutputMode, WatermarkMethod};

    #[test]
    fn test_apply_defaults_fills_only_missing() {
        let mut config = EngineConfig::default();
        config.output_mode = OutputMode::Playlist;
        config.naming = NamingOptions {
            prefix: "chapter".to_string(),
            extension: "wav".to_string(),
        };
        config.watermark.method = WatermarkMethod::Lsb;

        let value = json!({
            "job_id": "j",
            "items": [],
            "watermark": {"payload": "me", "strength": 20.0}
        });
        let filled = apply_defaults(value, &config).unwrap();
        assert_eq!(filled["output_mode"], json!("playlist"));
        assert_eq!(filled["naming"]["prefix"], json!("chapter"));
        assert_eq!(filled["watermark"]["method"], json!("lsb"));
        assert_eq!(filled["watermark"]["strength"], json!(20.0));

        let value = json!({"job_id": "j", "items": [], "output_mode": "individual"});
        let filled = apply_defaults(value, &config).unwrap();
        assert_eq!(filled["output_mode"], json!("individual"));
    }
}
