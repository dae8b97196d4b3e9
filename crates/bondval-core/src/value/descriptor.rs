//! Value descriptors and result templates.
//!
//! A [`ValueTemplate`] is what a producer *could* publish: its properties may
//! still hold wildcards. A [`ValueDescriptor`] is what it *did* publish: every
//! non-optional property holds exactly one concrete value. The descriptor
//! constructor enforces that, so a wildcard can never leak into a published
//! identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{PropertyConstraintSet, PropertyValues, ValueQuery};
use crate::error::{CoreError, CoreResult};
use crate::types::TargetRef;

/// Fully-resolved published value identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDescriptor")]
pub struct ValueDescriptor {
    value_name: String,
    target: TargetRef,
    properties: PropertyConstraintSet,
}

impl ValueDescriptor {
    /// Creates a descriptor, rejecting any non-optional property that is not
    /// a single concrete value.
    pub fn new(
        value_name: impl Into<String>,
        target: TargetRef,
        properties: PropertyConstraintSet,
    ) -> CoreResult<Self> {
        let value_name = value_name.into();
        for (name, c) in properties.iter() {
            if !c.is_optional() && c.values().strict().is_none() {
                return Err(CoreError::NonConcreteProperty {
                    value_name,
                    property: name.to_string(),
                    found: c.values().to_string(),
                });
            }
        }
        Ok(Self {
            value_name,
            target,
            properties,
        })
    }

    /// The value name.
    #[must_use]
    pub fn value_name(&self) -> &str {
        &self.value_name
    }

    /// The target the value belongs to.
    #[must_use]
    pub fn target(&self) -> &TargetRef {
        &self.target
    }

    /// The concrete properties.
    #[must_use]
    pub fn properties(&self) -> &PropertyConstraintSet {
        &self.properties
    }

    /// The concrete value of a property, if it has one.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.strict_value(name)
    }
}

impl fmt::Display for ValueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]{}", self.value_name, self.target, self.properties)
    }
}

#[derive(Deserialize)]
struct RawDescriptor {
    value_name: String,
    target: TargetRef,
    #[serde(default)]
    properties: PropertyConstraintSet,
}

impl TryFrom<RawDescriptor> for ValueDescriptor {
    type Error = CoreError;

    fn try_from(raw: RawDescriptor) -> Result<Self, Self::Error> {
        ValueDescriptor::new(raw.value_name, raw.target, raw.properties)
    }
}

/// What a producer can publish for a target, before inputs are known.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueTemplate {
    /// The value name.
    pub value_name: String,
    /// The target.
    pub target: TargetRef,
    /// Producible properties; wildcards mean "will be chosen".
    pub properties: PropertyConstraintSet,
}

impl ValueTemplate {
    /// Creates a template.
    pub fn new(
        value_name: impl Into<String>,
        target: TargetRef,
        properties: PropertyConstraintSet,
    ) -> Self {
        Self {
            value_name: value_name.into(),
            target,
            properties,
        }
    }

    /// Could a value published from this template satisfy the query?
    #[must_use]
    pub fn can_satisfy(&self, query: &ValueQuery) -> bool {
        self.value_name == query.value_name()
            && &self.target == query.target()
            && query.constraints().is_satisfied_by(&self.properties)
    }

    /// Names of wildcard properties still to be concretized.
    pub fn open_properties(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, c)| matches!(c.values(), PropertyValues::Any))
            .map(|(name, _)| name)
    }
}
