//! Property constraint sets.
//!
//! A [`PropertyConstraintSet`] maps property names to either a non-empty set
//! of allowed concrete values or the wildcard [`PropertyValues::Any`], with an
//! independent *optional* flag per property. The same type is used on both
//! sides of a negotiation:
//!
//! - a caller's constraints (what it will accept),
//! - a producer's template (what it can publish, wildcards meaning "I will
//!   pick one"),
//! - a published descriptor (one concrete value per property).
//!
//! All operations are pure; every "mutating" method consumes `self` and
//! returns the new set.
//!
//! # Example
//!
//! ```rust
//! use bondval_core::value::PropertyConstraintSet;
//!
//! let template = PropertyConstraintSet::new()
//!     .with("CalculationMethod", "FromCurves")
//!     .with_any("RiskFreeCurve");
//!
//! let constraints = PropertyConstraintSet::new().with("RiskFreeCurve", "Discounting");
//! assert!(constraints.is_satisfied_by(&template));
//!
//! let published = template.compose(&constraints);
//! assert_eq!(published.strict_value("RiskFreeCurve"), Some("Discounting"));
//! ```

use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// PROPERTY VALUES
// =============================================================================

/// The values a single property may take.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "ValuesRepr", into = "ValuesRepr")]
pub enum PropertyValues {
    /// Unconstrained, but a value must be present in the producer's output.
    Any,
    /// A non-empty set of acceptable concrete values.
    Values(BTreeSet<String>),
}

impl PropertyValues {
    /// A single concrete value.
    pub fn single(value: impl Into<String>) -> Self {
        PropertyValues::Values(BTreeSet::from([value.into()]))
    }

    /// A finite set of alternatives. Fails on an empty collection.
    pub fn of<I, S>(property: &str, values: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            return Err(CoreError::empty_value_set(property));
        }
        Ok(PropertyValues::Values(set))
    }

    /// Returns true for the wildcard.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, PropertyValues::Any)
    }

    /// Returns the concrete values, or `None` for the wildcard.
    #[must_use]
    pub fn as_set(&self) -> Option<&BTreeSet<String>> {
        match self {
            PropertyValues::Any => None,
            PropertyValues::Values(v) => Some(v),
        }
    }

    /// Returns the value if exactly one concrete value is held.
    #[must_use]
    pub fn strict(&self) -> Option<&str> {
        match self {
            PropertyValues::Values(v) if v.len() == 1 => v.iter().next().map(String::as_str),
            _ => None,
        }
    }

    /// Returns true if the wildcard, or if `value` is one of the values.
    #[must_use]
    pub fn admits(&self, value: &str) -> bool {
        match self {
            PropertyValues::Any => true,
            PropertyValues::Values(v) => v.contains(value),
        }
    }

    /// Can a producer offering `offered` meet this constraint?
    fn is_met_by(&self, offered: &PropertyValues) -> bool {
        match (self, offered) {
            (_, PropertyValues::Any) | (PropertyValues::Any, _) => true,
            (PropertyValues::Values(wanted), PropertyValues::Values(have)) => {
                !wanted.is_disjoint(have)
            }
        }
    }

    fn intersect(&self, other: &PropertyValues) -> Option<PropertyValues> {
        match (self, other) {
            (PropertyValues::Any, x) | (x, PropertyValues::Any) => Some(x.clone()),
            (PropertyValues::Values(a), PropertyValues::Values(b)) => {
                let common: BTreeSet<String> = a.intersection(b).cloned().collect();
                (!common.is_empty()).then_some(PropertyValues::Values(common))
            }
        }
    }

    fn union(&self, other: &PropertyValues) -> PropertyValues {
        match (self, other) {
            (PropertyValues::Values(a), PropertyValues::Values(b)) => {
                PropertyValues::Values(a.union(b).cloned().collect())
            }
            _ => PropertyValues::Any,
        }
    }
}

impl fmt::Display for PropertyValues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValues::Any => f.write_str("[*]"),
            PropertyValues::Values(v) => {
                f.write_str("[")?;
                for (i, value) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    f.write_str(value)?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Wire form: the string `"any"` or a list of values.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ValuesRepr {
    Wildcard(Wildcard),
    List(BTreeSet<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Wildcard {
    Any,
}

impl TryFrom<ValuesRepr> for PropertyValues {
    type Error = CoreError;

    fn try_from(repr: ValuesRepr) -> Result<Self, Self::Error> {
        match repr {
            ValuesRepr::Wildcard(Wildcard::Any) => Ok(PropertyValues::Any),
            ValuesRepr::List(values) => PropertyValues::of("<deserialized>", values),
        }
    }
}

impl From<PropertyValues> for ValuesRepr {
    fn from(values: PropertyValues) -> Self {
        match values {
            PropertyValues::Any => ValuesRepr::Wildcard(Wildcard::Any),
            PropertyValues::Values(v) => ValuesRepr::List(v),
        }
    }
}

// =============================================================================
// PROPERTY CONSTRAINT
// =============================================================================

/// One entry of a constraint set.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PropertyConstraint {
    values: PropertyValues,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    optional: bool,
}

impl PropertyConstraint {
    /// The allowed values.
    #[must_use]
    pub fn values(&self) -> &PropertyValues {
        &self.values
    }

    /// Whether the property may be absent.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

// =============================================================================
// PROPERTY CONSTRAINT SET
// =============================================================================

/// Immutable named multi-valued constraint bag.
///
/// Equality is structural; iteration is in property-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyConstraintSet {
    properties: BTreeMap<String, PropertyConstraint>,
}

impl PropertyConstraintSet {
    /// The empty set: no constraints.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a builder that defers empty-set validation to `build`.
    #[must_use]
    pub fn builder() -> PropertyConstraintSetBuilder {
        PropertyConstraintSetBuilder::default()
    }

    fn set_values(mut self, name: String, values: PropertyValues) -> Self {
        match self.properties.entry(name) {
            btree_map::Entry::Occupied(mut e) => e.get_mut().values = values,
            btree_map::Entry::Vacant(e) => {
                e.insert(PropertyConstraint {
                    values,
                    optional: false,
                });
            }
        }
        self
    }

    /// Adds or replaces a single concrete value. The optional flag is kept.
    pub fn with(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_values(name.into(), PropertyValues::single(value))
    }

    /// Constrains a property to a finite set of alternatives.
    pub fn with_values<I, S>(self, name: impl Into<String>, values: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let values = PropertyValues::of(&name, values)?;
        Ok(self.set_values(name, values))
    }

    /// Declares a property producible but not yet concretized.
    pub fn with_any(self, name: impl Into<String>) -> Self {
        self.set_values(name.into(), PropertyValues::Any)
    }

    /// Marks a property optional; an absent property becomes an optional
    /// wildcard.
    pub fn with_optional(mut self, name: impl Into<String>) -> Self {
        self.properties
            .entry(name.into())
            .or_insert(PropertyConstraint {
                values: PropertyValues::Any,
                optional: false,
            })
            .optional = true;
        self
    }

    /// Clears the optional flag of a property, if present.
    pub fn not_optional(mut self, name: &str) -> Self {
        if let Some(c) = self.properties.get_mut(name) {
            c.optional = false;
        }
        self
    }

    /// Removes a property entirely.
    pub fn without(mut self, name: &str) -> Self {
        self.properties.remove(name);
        self
    }

    /// Returns the constraint entry for a property.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyConstraint> {
        self.properties.get(name)
    }

    /// Returns the allowed values: a set, the wildcard, or `None` if absent.
    #[must_use]
    pub fn values_for(&self, name: &str) -> Option<&PropertyValues> {
        self.properties.get(name).map(|c| &c.values)
    }

    /// Whether the property is present at all.
    #[must_use]
    pub fn is_defined(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Whether the property is present and optional.
    #[must_use]
    pub fn is_optional(&self, name: &str) -> bool {
        self.properties.get(name).is_some_and(|c| c.optional)
    }

    /// The value, if the property holds exactly one concrete value.
    #[must_use]
    pub fn strict_value(&self, name: &str) -> Option<&str> {
        self.values_for(name).and_then(PropertyValues::strict)
    }

    /// Any one concrete value (the lexicographically first).
    #[must_use]
    pub fn single_value(&self, name: &str) -> Option<&str> {
        self.values_for(name)
            .and_then(PropertyValues::as_set)
            .and_then(|v| v.iter().next())
            .map(String::as_str)
    }

    /// Property names in order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    /// Iterates over `(name, constraint)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyConstraint)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// True when there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// True when every property holds exactly one concrete value and none is
    /// optional.
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.properties
            .values()
            .all(|c| !c.optional && c.values.strict().is_some())
    }

    /// Does `candidate` meet every constraint in `self`?
    ///
    /// For each property of `self`: if the candidate lacks it, the property
    /// must be optional; otherwise the candidate's values must overlap the
    /// allowed values. A wildcard on either side matches any value.
    #[must_use]
    pub fn is_satisfied_by(&self, candidate: &PropertyConstraintSet) -> bool {
        self.properties
            .iter()
            .all(|(name, c)| Self::entry_met(c, candidate.properties.get(name)))
    }

    /// Names of the constraints `candidate` fails to meet.
    #[must_use]
    pub fn unsatisfied(&self, candidate: &PropertyConstraintSet) -> BTreeSet<String> {
        self.properties
            .iter()
            .filter(|(name, c)| !Self::entry_met(c, candidate.properties.get(name.as_str())))
            .map(|(name, _)| name.clone())
            .collect()
    }

    fn entry_met(wanted: &PropertyConstraint, offered: Option<&PropertyConstraint>) -> bool {
        match offered {
            None => wanted.optional,
            Some(o) => wanted.values.is_met_by(&o.values),
        }
    }

    /// Narrows the properties of `self` with the values `other` asks for.
    ///
    /// Wildcards in `self` take `other`'s concrete values; multi-valued
    /// entries shrink to the overlap. Properties `other` does not mention,
    /// or whose values do not overlap, are left unchanged.
    #[must_use]
    pub fn compose(&self, other: &PropertyConstraintSet) -> PropertyConstraintSet {
        let mut result = self.clone();
        for (name, c) in &mut result.properties {
            let Some(o) = other.properties.get(name) else {
                continue;
            };
            if let Some(narrowed) = c.values.intersect(&o.values) {
                c.values = narrowed;
            }
        }
        result
    }

    /// Properties present in both, with overlapping values. An entry is
    /// optional only if optional on both sides.
    #[must_use]
    pub fn intersect(&self, other: &PropertyConstraintSet) -> PropertyConstraintSet {
        let properties = self
            .properties
            .iter()
            .filter_map(|(name, a)| {
                let b = other.properties.get(name)?;
                let values = a.values.intersect(&b.values)?;
                Some((
                    name.clone(),
                    PropertyConstraint {
                        values,
                        optional: a.optional && b.optional,
                    },
                ))
            })
            .collect();
        PropertyConstraintSet { properties }
    }

    /// Every property of either side; shared entries take the union of their
    /// values and are optional only if optional on both sides.
    #[must_use]
    pub fn union(&self, other: &PropertyConstraintSet) -> PropertyConstraintSet {
        let mut properties = self.properties.clone();
        for (name, b) in &other.properties {
            match properties.entry(name.clone()) {
                btree_map::Entry::Occupied(mut e) => {
                    let a = e.get_mut();
                    a.values = a.values.union(&b.values);
                    a.optional = a.optional && b.optional;
                }
                btree_map::Entry::Vacant(e) => {
                    e.insert(b.clone());
                }
            }
        }
        PropertyConstraintSet { properties }
    }
}

impl fmt::Display for PropertyConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, c)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", name, c.values)?;
            if c.optional {
                f.write_str("?")?;
            }
        }
        f.write_str("}")
    }
}

// =============================================================================
// BUILDER
// =============================================================================

/// Builder for [`PropertyConstraintSet`] that collects multi-valued entries
/// and reports the first empty one on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct PropertyConstraintSetBuilder {
    set: PropertyConstraintSet,
    error: Option<CoreError>,
}

impl PropertyConstraintSetBuilder {
    /// Adds or replaces a single concrete value.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set = self.set.with(name, value);
        self
    }

    /// Constrains a property to a set of alternatives.
    pub fn with_values<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        match self.set.clone().with_values(name, values) {
            Ok(set) => self.set = set,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Declares a wildcard property.
    pub fn with_any(mut self, name: impl Into<String>) -> Self {
        self.set = self.set.with_any(name);
        self
    }

    /// Marks a property optional.
    pub fn with_optional(mut self, name: impl Into<String>) -> Self {
        self.set = self.set.with_optional(name);
        self
    }

    /// Finishes the set.
    pub fn build(self) -> CoreResult<PropertyConstraintSet> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.set),
        }
    }
}
