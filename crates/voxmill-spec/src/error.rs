//! Error types for request validation and processing.

use thiserror::Error;

/// Error codes reported by batch request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Request errors (E001-E003)
    /// E001: Invalid job id format
    InvalidJobId,
    /// E002: Batch request declares no items
    NoItems,
    /// E003: Invalid voice id format
    InvalidVoiceId,

    // Processing parameter errors (E004-E007)
    /// E004: Effect intensity outside 0..=100
    IntensityOutOfRange,
    /// E005: Mix ratio outside 0..=100
    InvalidMixRatio,
    /// E006: Negative or non-finite crossfade
    InvalidCrossfade,
    /// E007: Watermark strength outside 0..=100
    StrengthOutOfRange,

    // Resource and output errors (E008-E010)
    /// E008: Processing budget exceeded
    BudgetExceeded,
    /// E009: Effect parameter value is not finite
    InvalidEffectParameter,
    /// E010: Naming options produce unusable file names
    InvalidNaming,
}

impl ErrorCode {
    /// Returns the error code string (e.g., "E001").
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::InvalidJobId => "E001",
            ErrorCode::NoItems => "E002",
            ErrorCode::InvalidVoiceId => "E003",
            ErrorCode::IntensityOutOfRange => "E004",
            ErrorCode::InvalidMixRatio => "E005",
            ErrorCode::InvalidCrossfade => "E006",
            ErrorCode::StrengthOutOfRange => "E007",
            ErrorCode::BudgetExceeded => "E008",
            ErrorCode::InvalidEffectParameter => "E009",
            ErrorCode::InvalidNaming => "E010",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Warning codes reported by batch request validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCode {
    /// W001: Item text is empty and will fail at synthesis time
    EmptyItemText,
    /// W002: Effect kind is not recognized and will be skipped
    UnknownEffectKind,
}

impl WarningCode {
    /// Returns the warning code string (e.g., "W001").
    pub fn code(&self) -> &'static str {
        match self {
            WarningCode::EmptyItemText => "W001",
            WarningCode::UnknownEffectKind => "W002",
        }
    }
}

impl std::fmt::Display for WarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A validation error with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The error code.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// JSON path to the problematic field (e.g., "items\[0\].voice_id").
    pub path: Option<String>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation error with a JSON path.
    pub fn with_path(code: ErrorCode, message: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A validation warning with code, message, and optional JSON path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The warning code.
    pub code: WarningCode,
    /// Human-readable warning message.
    pub message: String,
    /// JSON path to the problematic field.
    pub path: Option<String>,
}

impl ValidationWarning {
    /// Creates a new validation warning.
    pub fn new(code: WarningCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path: None,
        }
    }

    /// Creates a new validation warning with a JSON path.
    pub fn with_path(
        code: WarningCode,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            path: Some(path.into()),
        }
    }
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref path) = self.path {
            write!(f, "{}: {} (at {})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

/// Top-level error type for request handling.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Request validation failed with one or more errors.
    #[error("request validation failed with {0} error(s)")]
    ValidationFailed(usize),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Unknown processing budget profile.
    #[error("unknown budget profile '{0}'")]
    UnknownBudget(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of request validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether validation passed (no errors).
    pub ok: bool,
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of validation warnings.
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a successful validation result.
    pub fn success() -> Self {
        Self {
            ok: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Creates a failed validation result.
    pub fn failure(errors: Vec<ValidationError>) -> Self {
        Self {
            ok: false,
            errors,
            warnings: Vec::new(),
        }
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
        self.ok = false;
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if there are no errors.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Converts to a Result, returning Err if there are errors.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, Vec<ValidationError>> {
        if self.ok {
            Ok(self.warnings)
        } else {
            Err(self.errors)
        }
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::success()
    }
}

/// Common trait for processing-stage errors.
///
/// Each crate's error type implements this trait so callers can report a
/// stable code and category without depending on the concrete enum.
///
/// # Example
///
/// ```ignore
/// use voxmill_spec::error::BackendError;
///
/// fn handle_error<E: BackendError>(err: E) {
///     eprintln!("[{}] {}", err.code(), err.message());
/// }
/// ```
pub trait BackendError: std::error::Error {
    /// Stable code like "AUDIO_001" or "BATCH_002".
    fn code(&self) -> &'static str;

    /// Get a human-readable message describing the error.
    fn message(&self) -> String {
        self.to_string()
    }

    /// Category like "audio", "watermark" or "batch".
    fn category(&self) -> &'static str;
}

/// A backend error flattened to its stable code, message and category.
///
/// Front ends report failures through this type so every message carries
/// its code, e.g. `[AUDIO_006] insufficient capacity: ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    /// The error code (e.g., "AUDIO_001").
    pub code: &'static str,
    /// The human-readable error message.
    pub message: String,
    /// The error category (e.g., "audio", "batch").
    pub category: &'static str,
}

impl GenerationError {
    /// Create a `GenerationError` from any `BackendError` implementor.
    pub fn from_backend<E: BackendError>(err: E) -> Self {
        Self {
            code: err.code(),
            message: err.message(),
            category: err.category(),
        }
    }

    /// Create a `GenerationError` with explicit values.
    pub fn new(code: &'static str, message: impl Into<String>, category: &'static str) -> Self {
        Self {
            code,
            message: message.into(),
            category,
        }
    }
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for GenerationError {}
