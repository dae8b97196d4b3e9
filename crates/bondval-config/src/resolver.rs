//! Resolver settings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Settings for a value resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Date derivatives are built as of. Callers may also supply it per run.
    #[serde(default)]
    pub valuation_date: Option<NaiveDate>,

    /// Retry with the caller's original query when the query rewritten with
    /// default curves cannot be satisfied.
    #[serde(default = "default_fallback")]
    pub fallback_to_original_query: bool,

    /// Below this many targets, batch resolution stays on the calling thread.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,
}

fn default_fallback() -> bool {
    true
}

fn default_parallel_threshold() -> usize {
    8
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            valuation_date: None,
            fallback_to_original_query: default_fallback(),
            parallel_threshold: default_parallel_threshold(),
        }
    }
}

impl ResolverConfig {
    /// Sets the valuation date.
    #[must_use]
    pub fn with_valuation_date(mut self, date: NaiveDate) -> Self {
        self.valuation_date = Some(date);
        self
    }

    /// Enables or disables the fallback to the original query.
    #[must_use]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback_to_original_query = enabled;
        self
    }

    /// Sets the parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }
}

impl Validate for ResolverConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if self.parallel_threshold == 0 {
            errors.push(ValidationError::with_rule(
                "parallel_threshold",
                "Parallel threshold must be at least 1",
                "positive_threshold",
            ));
        }
        errors
    }
}
