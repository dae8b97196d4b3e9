//! # Bondval Engine
//!
//! Property-constrained value resolution for bond analytics.
//!
//! This crate provides:
//! - [`ComputationFunction`]: the contract every producer of a value meets
//! - [`BondFunction`]: the generic bond measure, built from a data source,
//!   a calculator and a scale factor
//! - [`DefaultCurvePropertyFunction`]: fills in per-currency default curves
//! - [`FunctionRepository`]: the registered functions and injectors
//! - [`ValueResolver`]: plans and executes queries against market data
//!
//! ## Architecture
//!
//! ```text
//! ValueQuery ─> Injectors ─> Candidates (by priority) ─┬─> Requirements
//!                                                      │
//!                  MarketDataProvider::resolve <───────┘
//!                              │
//!                              └─> result_concrete ─> ResolutionPlan
//!                                                          │
//!         MarketDataProvider::value ─> calculate ─> ComputedValue
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let repository = Arc::new(FunctionRepository::standard(Arc::new(
//!     DefaultCurveConfig::standard(),
//! )));
//! let resolver = ValueResolver::new(repository, market, config);
//! let ctx = resolver.context(&pricing)?;
//!
//! match resolver.resolve(&ctx, &target, &query)? {
//!     Resolution::Resolved(value) => println!("{}", value.descriptor()),
//!     Resolution::Unsatisfiable(u) => println!("{} attempts", u.attempts.len()),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bond;
pub mod defaults;
pub mod error;
pub mod function;
pub mod repository;
pub mod resolver;
pub mod scale;

// Re-exports
pub use bond::{standard_bond_functions, BondFunction, CurveLayout, DataSource};
pub use defaults::DefaultCurvePropertyFunction;
pub use error::{EngineError, EngineResult};
pub use function::{
    ComputationFunction, ExecutionContext, InputBinding, PropertyInjector, Rejection,
    Requirements, ResolvedInput,
};
pub use repository::FunctionRepository;
pub use resolver::{
    Attempt, AttemptFailure, BatchResolution, Resolution, ResolutionPlan, ResolutionRequest,
    Unsatisfiable, ValueResolver,
};
pub use scale::ScaleFactor;
