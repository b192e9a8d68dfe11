//! Validation tests.

use super::*;
use crate::effect::EffectKind;
use crate::mix::MixMode;
use crate::watermark::WatermarkMethod;

fn make_valid_request() -> BatchRequest {
    BatchRequest::builder("job-0001")
        .item("Hello", "narrator")
        .push(
            BatchItem::new("World", "narrator")
                .effect(EffectSpec::new(EffectKind::Reverb, 40.0))
                .mix("whisper", MixSpec::new(MixMode::Morph, 50.0).with_crossfade(0.2)),
        )
        .watermark("owner-1", WatermarkOptions::new(WatermarkMethod::Spectral))
        .build()
}

fn has_error(result: &ValidationResult, code: ErrorCode) -> bool {
    result.errors.iter().any(|e| e.code == code)
}

#[test]
fn test_valid_request() {
    let result = validate_batch_request(&make_valid_request());
    assert!(result.is_ok(), "errors: {:?}", result.errors);
    assert!(result.warnings.is_empty());
}

#[test]
fn test_invalid_job_id() {
    for job_id in ["", "-leading", "has spaces", "slash/job"] {
        let mut request = make_valid_request();
        request.job_id = job_id.to_string();
        let result = validate_batch_request(&request);
        assert!(has_error(&result, ErrorCode::InvalidJobId), "job_id {:?}", job_id);
    }
}

#[test]
fn test_no_items() {
    let request = BatchRequest::builder("job-0001").build();
    let result = validate_batch_request(&request);
    assert!(has_error(&result, ErrorCode::NoItems));
}

#[test]
fn test_invalid_voice_id() {
    for voice_id in ["", "Narrator", "../etc", "a.b", "voice id"] {
        let request = BatchRequest::builder("job-0001").item("Hi", voice_id).build();
        let result = validate_batch_request(&request);
        let err = result
            .errors
            .iter()
            .find(|e| e.code == ErrorCode::InvalidVoiceId)
            .unwrap_or_else(|| panic!("expected voice id error for {:?}", voice_id));
        assert_eq!(err.path.as_deref(), Some("items[0].voice_id"));
    }
}

#[test]
fn test_secondary_voice_id_checked() {
    let request = BatchRequest::builder("job-0001")
        .push(BatchItem::new("Hi", "narrator").mix("Bad Voice", MixSpec::default()))
        .build();
    let result = validate_batch_request(&request);
    let err = result
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::InvalidVoiceId)
        .unwrap();
    assert_eq!(err.path.as_deref(), Some("items[0].mix.voice_id"));
}

#[test]
fn test_empty_text_is_warning() {
    let request = BatchRequest::builder("job-0001")
        .item("Hello", "narrator")
        .item("", "narrator")
        .build();
    let result = validate_batch_request(&request);
    assert!(result.is_ok());
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].code, WarningCode::EmptyItemText);
    assert_eq!(result.warnings[0].path.as_deref(), Some("items[1].text"));
}

#[test]
fn test_intensity_out_of_range() {
    for intensity in [-1.0, 100.5, f64::NAN] {
        let request = BatchRequest::builder("job-0001")
            .push(BatchItem::new("Hi", "narrator").effect(EffectSpec::new("echo", intensity)))
            .build();
        let result = validate_batch_request(&request);
        assert!(has_error(&result, ErrorCode::IntensityOutOfRange));
    }
}

#[test]
fn test_unknown_effect_warns() {
    let request = BatchRequest::builder("job-0001")
        .push(BatchItem::new("Hi", "narrator").effect(EffectSpec::new("vocoder", 20.0)))
        .build();
    let result = validate_batch_request(&request);
    assert!(result.is_ok());
    assert_eq!(result.warnings[0].code, WarningCode::UnknownEffectKind);
}

#[test]
fn test_non_finite_parameter() {
    let request = BatchRequest::builder("job-0001")
        .push(
            BatchItem::new("Hi", "narrator")
                .effect(EffectSpec::new("reverb", 20.0).with_param("room_size", f64::INFINITY)),
        )
        .build();
    let result = validate_batch_request(&request);
    let err = result
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::InvalidEffectParameter)
        .unwrap();
    assert_eq!(
        err.path.as_deref(),
        Some("items[0].effects[0].parameters.room_size")
    );
}

#[test]
fn test_mix_ratio_and_crossfade() {
    let request = BatchRequest::builder("job-0001")
        .push(
            BatchItem::new("Hi", "narrator")
                .mix("robot", MixSpec::new(MixMode::Blend, 150.0).with_crossfade(-1.0)),
        )
        .build();
    let result = validate_batch_request(&request);
    assert!(has_error(&result, ErrorCode::InvalidMixRatio));
    assert!(has_error(&result, ErrorCode::InvalidCrossfade));
}

#[test]
fn test_strength_out_of_range() {
    let request = BatchRequest::builder("job-0001")
        .item("Hi", "narrator")
        .watermark("p", WatermarkOptions::default().strength(101.0))
        .build();
    let result = validate_batch_request(&request);
    let err = result
        .errors
        .iter()
        .find(|e| e.code == ErrorCode::StrengthOutOfRange)
        .unwrap();
    assert_eq!(err.path.as_deref(), Some("watermark.strength"));
}

#[test]
fn test_budget_limits() {
    let budget = ProcessingBudget::strict();

    let mut builder = BatchRequest::builder("job-0001");
    for _ in 0..=budget.max_items {
        builder = builder.item("Hi", "narrator");
    }
    let result = validate_batch_request_with_budget(&builder.build(), &budget);
    assert!(has_error(&result, ErrorCode::BudgetExceeded));

    let long_text = "a".repeat(budget.max_text_chars + 1);
    let request = BatchRequest::builder("job-0001")
        .item(long_text, "narrator")
        .build();
    let result = validate_batch_request_with_budget(&request, &budget);
    assert!(has_error(&result, ErrorCode::BudgetExceeded));
    assert!(validate_batch_request(&request).is_ok());

    let mut item = BatchItem::new("Hi", "narrator");
    for _ in 0..=budget.max_effects_per_item {
        item = item.effect(EffectSpec::new("echo", 10.0));
    }
    let request = BatchRequest::builder("job-0001").push(item).build();
    let result = validate_batch_request_with_budget(&request, &budget);
    assert!(has_error(&result, ErrorCode::BudgetExceeded));

    let request = BatchRequest::builder("job-0001")
        .push(
            BatchItem::new("Hi", "narrator")
                .mix("robot", MixSpec::new(MixMode::Morph, 50.0).with_crossfade(10.0)),
        )
        .build();
    let result = validate_batch_request_with_budget(&request, &budget);
    assert!(has_error(&result, ErrorCode::BudgetExceeded));
}

#[test]
fn test_invalid_naming() {
    let request = BatchRequest::builder("job-0001")
        .item("Hi", "narrator")
        .naming("../out", "WAV")
        .build();
    let result = validate_batch_request(&request);
    let paths: Vec<_> = result
        .errors
        .iter()
        .filter(|e| e.code == ErrorCode::InvalidNaming)
        .filter_map(|e| e.path.clone())
        .collect();
    assert_eq!(paths, vec!["naming.prefix", "naming.extension"]);
}
