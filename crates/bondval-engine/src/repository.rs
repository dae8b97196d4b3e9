//! Function repository.
//!
//! Holds the registered functions and injectors. Built once, then shared
//! read-only behind an `Arc`.

use std::sync::Arc;

use bondval_config::DefaultCurveConfig;

use crate::bond::standard_bond_functions;
use crate::defaults::DefaultCurvePropertyFunction;
use crate::function::{ComputationFunction, PropertyInjector};

/// Registered computation functions and property injectors.
#[derive(Default)]
pub struct FunctionRepository {
    functions: Vec<Arc<dyn ComputationFunction>>,
    injectors: Vec<Arc<dyn PropertyInjector>>,
}

impl FunctionRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard bond catalogue with default curve injection.
    #[must_use]
    pub fn standard(defaults: Arc<DefaultCurveConfig>) -> Self {
        let mut repository = Self::new();
        for function in standard_bond_functions() {
            repository.register(function);
        }
        repository.register_injector(DefaultCurvePropertyFunction::new(defaults));
        repository
    }

    /// Registers a function.
    pub fn register(&mut self, function: impl ComputationFunction + 'static) {
        self.functions.push(Arc::new(function));
    }

    /// Registers an injector. Injectors run in registration order.
    pub fn register_injector(&mut self, injector: impl PropertyInjector + 'static) {
        self.injectors.push(Arc::new(injector));
    }

    /// Functions producing `value_name`, highest priority first, ties in
    /// registration order.
    pub fn candidates(&self, value_name: &str) -> Vec<&dyn ComputationFunction> {
        let mut candidates: Vec<&dyn ComputationFunction> = self
            .functions
            .iter()
            .filter(|f| f.value_name() == value_name)
            .map(|f| f.as_ref())
            .collect();
        // Stable sort keeps registration order within a priority.
        candidates.sort_by_key(|f| std::cmp::Reverse(f.priority()));
        candidates
    }

    /// Looks a function up by id.
    #[must_use]
    pub fn function(&self, id: &str) -> Option<&dyn ComputationFunction> {
        self.functions
            .iter()
            .find(|f| f.id() == id)
            .map(|f| f.as_ref())
    }

    /// All functions in registration order.
    pub fn functions(&self) -> impl Iterator<Item = &dyn ComputationFunction> {
        self.functions.iter().map(|f| f.as_ref())
    }

    /// All injectors in registration order.
    pub fn injectors(&self) -> impl Iterator<Item = &dyn PropertyInjector> {
        self.injectors.iter().map(|i| i.as_ref())
    }

    /// Number of functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// True when no function is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for FunctionRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRepository")
            .field("functions", &self.functions.len())
            .field("injectors", &self.injectors.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bondval_core::value::value_names;

    fn standard() -> FunctionRepository {
        FunctionRepository::standard(Arc::new(DefaultCurveConfig::standard()))
    }

    #[test]
    fn test_candidates_by_priority() {
        let repo = standard();
        let ids: Vec<_> = repo
            .candidates(value_names::DIRTY_PRICE)
            .iter()
            .map(|f| f.id().to_string())
            .collect();
        assert_eq!(
            ids,
            vec![
                "DirtyPrice.FromCurves.shared",
                "DirtyPrice.FromCurves.distinct",
                "DirtyPrice.FromCleanPrice",
                "DirtyPrice.FromYield",
            ]
        );
    }

    #[test]
    fn test_lookup_by_id() {
        let repo = standard();
        let f = repo.function("ZSpread.FromCleanPrice.distinct").unwrap();
        assert_eq!(f.value_name(), value_names::Z_SPREAD);
        assert!(repo.function("Nope").is_none());
    }

    #[test]
    fn test_standard_has_one_injector() {
        let repo = standard();
        let ids: Vec<_> = repo.injectors().map(|i| i.id().to_string()).collect();
        assert_eq!(ids, vec!["DefaultCurveProperties"]);
        assert!(!repo.is_empty());
        assert!(repo.candidates("Unknown").is_empty());
    }
}
