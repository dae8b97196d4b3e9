//! Value queries.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PropertyConstraintSet, ValueDescriptor};
use crate::types::TargetRef;

/// A request for a named value on a target, with constraints on the
/// properties of the value that would be acceptable.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ValueQuery {
    value_name: String,
    target: TargetRef,
    #[serde(default)]
    constraints: PropertyConstraintSet,
}

impl ValueQuery {
    /// Creates a query.
    pub fn new(
        value_name: impl Into<String>,
        target: TargetRef,
        constraints: PropertyConstraintSet,
    ) -> Self {
        Self {
            value_name: value_name.into(),
            target,
            constraints,
        }
    }

    /// Creates a query with no constraints.
    pub fn unconstrained(value_name: impl Into<String>, target: TargetRef) -> Self {
        Self::new(value_name, target, PropertyConstraintSet::new())
    }

    /// The requested value name.
    #[must_use]
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// The target the value is requested on.
    #[must_use]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// The property constraints.
    #[must_use]
    pub fn constraints(&self) -> &PropertyConstraintSet {
        &self.constraints
    }

    /// Returns a copy of this query with different constraints.
    #[must_use]
    pub fn with_constraints(&self, constraints: PropertyConstraintSet) -> Self {
        Self {
            value_name: self.value_name.clone(),
            target: self.target.clone(),
            constraints,
        }
    }

    /// Is this query satisfied by the published descriptor?
    #[must_use]
    pub fn is_satisfied_by(&self, descriptor: &ValueDescriptor) -> bool {
        self.value_name == descriptor.value_name()
            && &self.target == descriptor.target()
            && self.constraints.is_satisfied_by(descriptor.properties())
    }
}

impl fmt::Display for ValueQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.value_name, self.target, self.constraints)
    }
}
