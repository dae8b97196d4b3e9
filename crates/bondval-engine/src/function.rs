//! The computation function contract.
//!
//! A [`ComputationFunction`] is consulted in stages:
//!
//! 1. [`can_produce`](ComputationFunction::can_produce): could the template
//!    for this target ever satisfy the query?
//! 2. [`requirements`](ComputationFunction::requirements): which concrete
//!    upstream values does it need? A soft "cannot contribute" here sends
//!    the resolver on to the next function.
//! 3. [`result_concrete`](ComputationFunction::result_concrete): once
//!    upstream descriptors are known, what exactly will be published?
//! 4. [`calculate`](ComputationFunction::calculate): fetch-free evaluation
//!    against the resolved upstream values.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use bondval_core::prelude::*;
use bondval_traits::{MarketValue, PricingLibrary};

use crate::error::EngineResult;

// =============================================================================
// REQUIREMENTS
// =============================================================================

/// Why a function declined a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    /// The function produces a different value.
    WrongValueName {
        /// What the function produces.
        produces: String,
    },
    /// The query's target is not the calculation target, or is of a kind the
    /// function does not handle.
    UnsupportedTarget {
        /// Display form of the target.
        target: String,
    },
    /// A parameterizing property is absent, a wildcard, or multi-valued.
    AmbiguousConstraint {
        /// The property.
        property: String,
        /// What was found ("absent" or the display form of the values).
        found: String,
    },
    /// The caller's constraints rule out what this function publishes.
    IncompatibleConstraints {
        /// Properties the template cannot meet.
        properties: BTreeSet<String>,
    },
    /// The requested curves do not fit the function's curve layout.
    CurveLayoutMismatch {
        /// The layout the function was built for.
        expected: String,
    },
}

impl Rejection {
    pub(crate) fn ambiguous(property: &str, constraints: &PropertyConstraintSet) -> Self {
        let found = constraints
            .values_for(property)
            .map_or_else(|| "absent".to_string(), ToString::to_string);
        Rejection::AmbiguousConstraint {
            property: property.to_string(),
            found,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::WrongValueName { produces } => write!(f, "produces '{}'", produces),
            Rejection::UnsupportedTarget { target } => write!(f, "unsupported target {}", target),
            Rejection::AmbiguousConstraint { property, found } => {
                write!(f, "ambiguous constraint on {}: {}", property, found)
            }
            Rejection::IncompatibleConstraints { properties } => {
                let names: Vec<_> = properties.iter().map(String::as_str).collect();
                write!(f, "cannot meet constraints on {}", names.join(", "))
            }
            Rejection::CurveLayoutMismatch { expected } => {
                write!(f, "requested curves do not fit a {} layout", expected)
            }
        }
    }
}

/// Outcome of asking a function for its requirements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirements {
    /// Concrete upstream queries, in a deterministic order.
    Needs(Vec<ValueQuery>),
    /// The function cannot serve this query. Not an error.
    CannotContribute(Rejection),
}

impl Requirements {
    /// Returns the queries if the function can contribute.
    #[must_use]
    pub fn needs(&self) -> Option<&[ValueQuery]> {
        match self {
            Requirements::Needs(q) => Some(q),
            Requirements::CannotContribute(_) => None,
        }
    }
}

// =============================================================================
// INPUTS
// =============================================================================

/// An upstream query paired with the descriptor that satisfies it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBinding {
    /// What the function asked for.
    pub query: ValueQuery,
    /// What the market data provider will supply.
    pub descriptor: ValueDescriptor,
}

/// A bound upstream value, ready for calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedInput {
    /// The binding.
    pub binding: InputBinding,
    /// The fetched value.
    pub value: MarketValue,
}

/// What a calculation runs against.
#[derive(Clone, Copy)]
pub struct ExecutionContext<'a> {
    /// Derivatives are built as of this date.
    pub valuation_date: NaiveDate,
    /// The pricing mathematics.
    pub pricing: &'a dyn PricingLibrary,
}

impl<'a> ExecutionContext<'a> {
    /// Creates a context.
    pub fn new(valuation_date: NaiveDate, pricing: &'a dyn PricingLibrary) -> Self {
        Self {
            valuation_date,
            pricing,
        }
    }
}

impl fmt::Debug for ExecutionContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("valuation_date", &self.valuation_date)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// CONTRACTS
// =============================================================================

/// A producer of one named value from upstream values.
pub trait ComputationFunction: Send + Sync {
    /// Unique identifier within a repository.
    fn id(&self) -> &str;

    /// The value name this function publishes.
    fn value_name(&self) -> &str;

    /// Higher runs first. Ties keep registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Whether the function handles this kind of target at all.
    fn can_apply(&self, target: &CalculationTarget) -> bool;

    /// What the function could publish for this target.
    fn result_template(&self, target: &CalculationTarget) -> ValueTemplate;

    /// Cheap pre-check: could the template ever satisfy the query?
    fn can_produce(&self, target: &CalculationTarget, desired: &ValueQuery) -> bool {
        self.can_apply(target) && self.result_template(target).can_satisfy(desired)
    }

    /// Concrete upstream queries for the desired value.
    fn requirements(&self, target: &CalculationTarget, desired: &ValueQuery) -> Requirements;

    /// The descriptor that will be published, derived from the actual
    /// upstream descriptors rather than the caller's constraints.
    fn result_concrete(
        &self,
        target: &CalculationTarget,
        desired: &ValueQuery,
        inputs: &[InputBinding],
    ) -> EngineResult<ValueDescriptor>;

    /// Computes the value.
    fn calculate(
        &self,
        ctx: &ExecutionContext<'_>,
        target: &CalculationTarget,
        desired: &ValueQuery,
        inputs: &[ResolvedInput],
    ) -> EngineResult<ComputedValue>;
}

/// Rewrites queries before any function sees them.
pub trait PropertyInjector: Send + Sync {
    /// Unique identifier.
    fn id(&self) -> &str;

    /// Returns the rewritten query, or `None` to leave it untouched.
    fn inject(&self, target: &CalculationTarget, query: &ValueQuery) -> Option<ValueQuery>;
}
