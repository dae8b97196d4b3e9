//! # Bondval Core
//!
//! Core value types for the Bondval resolution engine.
//!
//! - **Types**: [`Currency`], calculation targets and target references
//! - **Value model**: property constraint sets, value queries, value
//!   descriptors and computed values
//! - **Names**: the well-known value, property and calculation-method names
//!
//! ## Example
//!
//! ```rust
//! use bondval_core::prelude::*;
//!
//! let target = TargetRef::security("US912828Z229");
//! let query = ValueQuery::new(
//!     value_names::CLEAN_PRICE,
//!     target.clone(),
//!     PropertyConstraintSet::new().with(property_names::RISK_FREE_CURVE, "Discounting"),
//! );
//!
//! let published = ValueDescriptor::new(
//!     value_names::CLEAN_PRICE,
//!     target,
//!     PropertyConstraintSet::new()
//!         .with(property_names::RISK_FREE_CURVE, "Discounting")
//!         .with(property_names::CALCULATION_METHOD, calculation_methods::FROM_CURVES),
//! )
//! .unwrap();
//! assert!(query.is_satisfied_by(&published));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]

pub mod error;
pub mod types;
pub mod value;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::types::{
        BondSecurity, BondTrade, CalculationTarget, Currency, TargetKind, TargetRef,
    };
    pub use crate::value::{
        calculation_methods, property_names, value_names, ComputedValue, Payload,
        PropertyConstraintSet, PropertyValues, ValueDescriptor, ValueQuery, ValueTemplate,
    };
}

// Re-export commonly used types at crate root
pub use error::{CoreError, CoreResult};
pub use types::{CalculationTarget, Currency, TargetRef};
pub use value::{ComputedValue, PropertyConstraintSet, ValueDescriptor, ValueQuery};
