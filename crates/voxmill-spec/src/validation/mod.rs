//! Batch request validation.

#[cfg(test)]
mod tests;

use std::sync::OnceLock;

use regex::Regex;

use crate::batch::{BatchItem, BatchRequest, NamingOptions};
use crate::budget::{BudgetError, ProcessingBudget};
use crate::effect::{EffectSpec, MAX_INTENSITY};
use crate::error::{ErrorCode, ValidationError, ValidationResult, ValidationWarning, WarningCode};
use crate::mix::MixSpec;
use crate::watermark::{WatermarkOptions, MAX_STRENGTH};

/// Job ids: alphanumeric start, then up to 63 letters, digits, underscores or hyphens.
const JOB_ID_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$";

/// Voice ids double as file stems, so no dots or separators.
const VOICE_ID_PATTERN: &str = r"^[a-z0-9][a-z0-9_-]{0,63}$";

const NAMING_PREFIX_PATTERN: &str = r"^[A-Za-z0-9_-]{1,64}$";
const NAMING_EXTENSION_PATTERN: &str = r"^[a-z0-9]{1,8}$";

static JOB_ID_REGEX: OnceLock<Regex> = OnceLock::new();
static VOICE_ID_REGEX: OnceLock<Regex> = OnceLock::new();
static PREFIX_REGEX: OnceLock<Regex> = OnceLock::new();
static EXTENSION_REGEX: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

/// Returns true if `id` is a valid job id.
pub fn is_valid_job_id(id: &str) -> bool {
    compiled(&JOB_ID_REGEX, JOB_ID_PATTERN).is_match(id)
}

/// Returns true if `id` is a valid voice id.
///
/// ```
/// use voxmill_spec::validation::is_valid_voice_id;
///
/// assert!(is_valid_voice_id("narrator-02"));
/// assert!(!is_valid_voice_id("../narrator"));
/// ```
pub fn is_valid_voice_id(id: &str) -> bool {
    compiled(&VOICE_ID_REGEX, VOICE_ID_PATTERN).is_match(id)
}

/// Validates a request against the default budget.
pub fn validate_batch_request(request: &BatchRequest) -> ValidationResult {
    validate_batch_request_with_budget(request, &ProcessingBudget::default())
}

/// Validates a request against `budget`.
///
/// Empty item texts are warnings: the job still runs and records a per-item
/// synthesis failure for them.
pub fn validate_batch_request_with_budget(
    request: &BatchRequest,
    budget: &ProcessingBudget,
) -> ValidationResult {
    let mut result = ValidationResult::default();

    if !is_valid_job_id(&request.job_id) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidJobId,
            format!(
                "job_id must match pattern '{}', got '{}'",
                JOB_ID_PATTERN, request.job_id
            ),
            "job_id",
        ));
    }

    if request.items.is_empty() {
        result.add_error(ValidationError::with_path(
            ErrorCode::NoItems,
            "at least one item is required",
            "items",
        ));
    }

    if request.items.len() > budget.max_items {
        add_budget_error(
            &mut result,
            BudgetError::new("items", request.items.len(), budget.max_items),
            "items",
        );
    }

    for (i, item) in request.items.iter().enumerate() {
        validate_item(item, &format!("items[{}]", i), budget, &mut result);
    }

    validate_naming(&request.naming, &mut result);

    if let Some(ref watermark) = request.watermark {
        validate_watermark_options(&watermark.options, "watermark", &mut result);
    }

    result
}

fn add_budget_error(result: &mut ValidationResult, err: BudgetError, path: impl Into<String>) {
    result.add_error(ValidationError::with_path(
        ErrorCode::BudgetExceeded,
        err.to_string(),
        path,
    ));
}

fn validate_item(
    item: &BatchItem,
    path: &str,
    budget: &ProcessingBudget,
    result: &mut ValidationResult,
) {
    if item.text.trim().is_empty() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::EmptyItemText,
            "item text is empty and will fail synthesis",
            format!("{}.text", path),
        ));
    }

    let chars = item.text.chars().count();
    if chars > budget.max_text_chars {
        add_budget_error(
            result,
            BudgetError::new("text_chars", chars, budget.max_text_chars),
            format!("{}.text", path),
        );
    }

    if !is_valid_voice_id(&item.voice_id) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidVoiceId,
            format!(
                "voice_id must match pattern '{}', got '{}'",
                VOICE_ID_PATTERN, item.voice_id
            ),
            format!("{}.voice_id", path),
        ));
    }

    if item.effects.len() > budget.max_effects_per_item {
        add_budget_error(
            result,
            BudgetError::new("effects", item.effects.len(), budget.max_effects_per_item),
            format!("{}.effects", path),
        );
    }

    for (j, effect) in item.effects.iter().enumerate() {
        validate_effect(effect, &format!("{}.effects[{}]", path, j), result);
    }

    if let Some(ref mix) = item.mix {
        let mix_path = format!("{}.mix", path);
        if !is_valid_voice_id(&mix.voice_id) {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidVoiceId,
                format!(
                    "voice_id must match pattern '{}', got '{}'",
                    VOICE_ID_PATTERN, mix.voice_id
                ),
                format!("{}.voice_id", mix_path),
            ));
        }
        validate_mix_spec(&mix.spec, &mix_path, result);
        if mix.spec.crossfade_seconds > budget.max_crossfade_seconds {
            add_budget_error(
                result,
                BudgetError::new(
                    "crossfade_seconds",
                    mix.spec.crossfade_seconds,
                    budget.max_crossfade_seconds,
                ),
                format!("{}.crossfade_seconds", mix_path),
            );
        }
    }
}

/// Validates one effect entry.
pub fn validate_effect(effect: &EffectSpec, path: &str, result: &mut ValidationResult) {
    if effect.kind.is_unknown() {
        result.add_warning(ValidationWarning::with_path(
            WarningCode::UnknownEffectKind,
            format!("effect '{}' is not supported and will be skipped", effect.kind),
            format!("{}.type", path),
        ));
    }

    if !(0.0..=MAX_INTENSITY).contains(&effect.intensity) {
        result.add_error(ValidationError::with_path(
            ErrorCode::IntensityOutOfRange,
            format!("intensity must be 0-100, got {}", effect.intensity),
            format!("{}.intensity", path),
        ));
    }

    for (name, value) in &effect.parameters {
        if !value.is_finite() {
            result.add_error(ValidationError::with_path(
                ErrorCode::InvalidEffectParameter,
                format!("parameter must be finite, got {}", value),
                format!("{}.parameters.{}", path, name),
            ));
        }
    }
}

/// Validates mixing parameters.
pub fn validate_mix_spec(spec: &MixSpec, path: &str, result: &mut ValidationResult) {
    if !(0.0..=100.0).contains(&spec.mix_ratio) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidMixRatio,
            format!("mix_ratio must be 0-100, got {}", spec.mix_ratio),
            format!("{}.mix_ratio", path),
        ));
    }
    if !spec.crossfade_seconds.is_finite() || spec.crossfade_seconds < 0.0 {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidCrossfade,
            format!(
                "crossfade_seconds must be >= 0, got {}",
                spec.crossfade_seconds
            ),
            format!("{}.crossfade_seconds", path),
        ));
    }
}

/// Validates watermark options.
pub fn validate_watermark_options(
    options: &WatermarkOptions,
    path: &str,
    result: &mut ValidationResult,
) {
    if !(0.0..=MAX_STRENGTH).contains(&options.strength) {
        result.add_error(ValidationError::with_path(
            ErrorCode::StrengthOutOfRange,
            format!("strength must be 0-100, got {}", options.strength),
            format!("{}.strength", path),
        ));
    }
}

fn validate_naming(naming: &NamingOptions, result: &mut ValidationResult) {
    if !compiled(&PREFIX_REGEX, NAMING_PREFIX_PATTERN).is_match(&naming.prefix) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidNaming,
            format!(
                "prefix must match pattern '{}', got '{}'",
                NAMING_PREFIX_PATTERN, naming.prefix
            ),
            "naming.prefix",
        ));
    }
    if !compiled(&EXTENSION_REGEX, NAMING_EXTENSION_PATTERN).is_match(&naming.extension) {
        result.add_error(ValidationError::with_path(
            ErrorCode::InvalidNaming,
            format!(
                "extension must match pattern '{}', got '{}'",
                NAMING_EXTENSION_PATTERN, naming.extension
            ),
            "naming.extension",
        ));
    }
}
