//! The value model: constraint sets, queries, descriptors and results.
//!
//! - [`PropertyConstraintSet`]: named multi-valued constraints with
//!   wildcard and optional semantics
//! - [`ValueQuery`]: what a caller asks for
//! - [`ValueTemplate`]: what a producer could publish
//! - [`ValueDescriptor`]: what a producer did publish
//! - [`ComputedValue`]: a descriptor with its payload

mod computed;
mod descriptor;
mod names;
mod properties;
mod query;

pub use computed::{ComputedValue, Payload};
pub use descriptor::{ValueDescriptor, ValueTemplate};
pub use names::{calculation_methods, property_names, value_names};
pub use properties::{
    PropertyConstraint, PropertyConstraintSet, PropertyConstraintSetBuilder, PropertyValues,
};
pub use query::ValueQuery;
