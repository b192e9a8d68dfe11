//! Voxmill Request Library
//!
//! Types, validation, and hashing for Voxmill processing requests. Requests
//! are JSON documents describing which effects, voice mix and watermark to
//! apply to synthesized speech, and how a batch of items is packaged.
//!
//! # Example
//!
//! ```
//! use voxmill_spec::{BatchItem, BatchRequest, EffectSpec, EffectKind, OutputMode};
//! use voxmill_spec::validation::validate_batch_request;
//! use voxmill_spec::hash::canonical_request_hash;
//!
//! let request = BatchRequest::builder("chapter-01")
//!     .item("Once upon a time", "narrator")
//!     .push(BatchItem::new("there was a mill", "narrator")
//!         .effect(EffectSpec::new(EffectKind::Reverb, 25.0)))
//!     .output_mode(OutputMode::Concatenated)
//!     .build();
//!
//! let result = validate_batch_request(&request);
//! assert!(result.is_ok());
//!
//! let hash = canonical_request_hash(&request).unwrap();
//! println!("Request hash: {}", hash);
//! ```
//!
//! # Modules
//!
//! - [`batch`]: Batch requests, items, packaging and job status
//! - [`budget`]: Processing budget profiles
//! - [`config`]: Engine configuration
//! - [`effect`]: Effect chain entries
//! - [`error`]: Error and warning types
//! - [`hash`]: Canonical hashing and seed derivation
//! - [`mix`]: Two-voice mixing parameters
//! - [`validation`]: Request validation
//! - [`watermark`]: Watermark methods and options

pub mod batch;
pub mod budget;
pub mod config;
pub mod effect;
pub mod error;
pub mod hash;
pub mod mix;
pub mod validation;
pub mod watermark;

pub use batch::{
    BatchItem, BatchRequest, BatchRequestBuilder, ItemMix, JobStatus, NamingOptions, OutputMode,
    WatermarkRequest,
};
pub use budget::{BudgetError, ProcessingBudget};
pub use config::EngineConfig;
pub use effect::{EffectKind, EffectSpec};
pub use error::{
    BackendError, ErrorCode, GenerationError, SpecError, ValidationError, ValidationResult,
    ValidationWarning, WarningCode,
};
pub use hash::{canonical_request_hash, derive_component_seed, payload_checksum};
pub use mix::{MixMode, MixSpec};
pub use validation::{validate_batch_request, validate_batch_request_with_budget};
pub use watermark::{WatermarkMethod, WatermarkOptions};
