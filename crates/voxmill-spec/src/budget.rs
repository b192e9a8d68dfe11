//! Processing budget profiles.
//!
//! Budgets bound the work a single batch request may ask for, so oversized
//! jobs are rejected at validation instead of part-way through rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Resource limits for one batch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingBudget {
    /// Profile name.
    pub name: String,
    /// Maximum number of items per job.
    pub max_items: usize,
    /// Maximum text length of a single item, in characters.
    pub max_text_chars: usize,
    /// Maximum effects in one item's chain.
    pub max_effects_per_item: usize,
    /// Maximum crossfade length in seconds.
    pub max_crossfade_seconds: f64,
}

impl ProcessingBudget {
    /// Default maximum number of items per job.
    pub const DEFAULT_MAX_ITEMS: usize = 500;

    /// Default maximum text length per item.
    pub const DEFAULT_MAX_TEXT_CHARS: usize = 5_000;

    /// Creates a budget with default limits under a custom name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Tight limits for shared or interactive deployments.
    pub fn strict() -> Self {
        Self {
            name: "strict".to_string(),
            max_items: 50,
            max_text_chars: 1_000,
            max_effects_per_item: 4,
            max_crossfade_seconds: 5.0,
        }
    }

    /// Looks up a built-in profile by name.
    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }
}

impl Default for ProcessingBudget {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            max_items: Self::DEFAULT_MAX_ITEMS,
            max_text_chars: Self::DEFAULT_MAX_TEXT_CHARS,
            max_effects_per_item: 16,
            max_crossfade_seconds: 30.0,
        }
    }
}

/// A single exceeded budget limit.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetError {
    /// Limit name that was exceeded.
    pub limit: String,
    /// The actual value that exceeded the limit.
    pub actual: String,
    /// The maximum allowed value.
    pub maximum: String,
}

impl BudgetError {
    /// Creates a new budget error.
    pub fn new(
        limit: impl Into<String>,
        actual: impl fmt::Display,
        maximum: impl fmt::Display,
    ) -> Self {
        Self {
            limit: limit.into(),
            actual: actual.to_string(),
            maximum: maximum.to_string(),
        }
    }
}

impl fmt::Display for BudgetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "budget exceeded: {} is {}, maximum is {}",
            self.limit, self.actual, self.maximum
        )
    }
}

impl std::error::Error for BudgetError {}
