//! Validate command implementation
//!
//! Checks a batch request against a processing budget without rendering.

use anyhow::{anyhow, Result};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use voxmill_spec::{
    canonical_request_hash, validate_batch_request_with_budget, EngineConfig, ProcessingBudget,
    ValidationError, ValidationResult, ValidationWarning,
};

use super::batch::load_request;

/// One diagnostic in JSON output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonDiagnostic {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl From<&ValidationError> for JsonDiagnostic {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code.code().to_string(),
            message: error.message.clone(),
            path: error.path.clone(),
        }
    }
}

impl From<&ValidationWarning> for JsonDiagnostic {
    fn from(warning: &ValidationWarning) -> Self {
        Self {
            code: warning.code.code().to_string(),
            message: warning.message.clone(),
            path: warning.path.clone(),
        }
    }
}

/// Machine-readable validate output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateOutput {
    pub ok: bool,
    pub job_id: String,
    pub budget: String,
    pub request_hash: String,
    pub errors: Vec<JsonDiagnostic>,
    pub warnings: Vec<JsonDiagnostic>,
}

impl ValidateOutput {
    fn new(job_id: &str, budget: &str, request_hash: String, result: &ValidationResult) -> Self {
        Self {
            ok: result.is_ok(),
            job_id: job_id.to_string(),
            budget: budget.to_string(),
            request_hash,
            errors: result.errors.iter().map(JsonDiagnostic::from).collect(),
            warnings: result.warnings.iter().map(JsonDiagnostic::from).collect(),
        }
    }
}

fn resolve_budget(name: Option<&str>, config: &EngineConfig) -> Result<ProcessingBudget> {
    match name {
        Some(name) => ProcessingBudget::by_name(name).ok_or_else(|| {
            anyhow!(
                "unknown budget profile: {} (expected default or strict)",
                name
            )
        }),
        None => Ok(config.budget_profile()?),
    }
}

/// Run the validate command
///
/// # Arguments
/// * `request_path` - Path to the batch request JSON
/// * `budget_name` - Optional budget profile name, else the configured one
/// * `json_output` - Whether to output machine-readable JSON diagnostics
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(
    request_path: &str,
    budget_name: Option<&str>,
    json_output: bool,
    config: &EngineConfig,
) -> Result<ExitCode> {
    let budget = resolve_budget(budget_name, config)?;
    let request = load_request(Path::new(request_path), config)?;
    let result = validate_batch_request_with_budget(&request, &budget);
    let request_hash =
        canonical_request_hash(&request).unwrap_or_else(|_| "unknown".to_string());

    if json_output {
        let output = ValidateOutput::new(&request.job_id, &budget.name, request_hash, &result);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{} {}", "Validating:".cyan().bold(), request_path);
        println!("{} {}", "Budget:".dimmed(), budget.name);
        println!(
            "{} {}",
            "Hash:".dimmed(),
            request_hash.get(..16).unwrap_or(&request_hash)
        );
        print_validation_results(&result);

        if result.is_ok() {
            println!(
                "\n{} Request is valid ({} items)",
                "SUCCESS".green().bold(),
                request.items.len()
            );
        } else {
            println!(
                "\n{} Request has {} error(s)",
                "FAILED".red().bold(),
                result.errors.len()
            );
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

fn print_validation_results(result: &ValidationResult) {
    if !result.errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in &result.errors {
            let path = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code,
                path.dimmed(),
                error.message
            );
        }
    }

    if !result.warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in &result.warnings {
            let path = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code,
                path.dimmed(),
                warning.message
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_budget() {
        let config = EngineConfig::default();
        assert_eq!(resolve_budget(None, &config).unwrap().name, "default");
        assert_eq!(resolve_budget(Some("strict"), &config).unwrap().name, "strict");
        assert!(resolve_budget(Some("huge"), &config).is_err());

        let mut config = EngineConfig::default();
        config.budget = "nope".to_string();
        assert!(resolve_budget(None, &config).is_err());
    }
}
