//! Bond measure functions.
//!
//! - [`DataSource`]: curves, a quoted clean price, or a quoted yield
//! - [`CurveLayout`]: one curve for both roles, or two
//! - [`BondFunction`]: the generic function, parameterized by source,
//!   calculator, scale factor and value name
//! - [`standard_bond_functions`]: the catalogue

mod catalogue;
mod function;
mod source;

pub use catalogue::standard_bond_functions;
pub use function::BondFunction;
pub use source::{CurveLayout, DataSource};
