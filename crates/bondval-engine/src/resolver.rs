//! Value resolution.
//!
//! [`ValueResolver`] walks each query through
//! `Unresolved -> RequirementsKnown -> InputsResolved -> Published`, with
//! `Unsatisfiable` as a terminal outcome rather than an error.
//!
//! Planning and execution are split. [`plan`](ValueResolver::plan) only asks
//! the market data provider which descriptors exist, so the negotiated
//! inputs and the output descriptor can be inspected without pricing
//! anything. [`execute`](ValueResolver::execute) fetches the values and runs
//! the calculator.

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use bondval_config::ResolverConfig;
use bondval_core::prelude::*;
use bondval_traits::{MarketDataProvider, PricingLibrary};

use crate::error::{EngineError, EngineResult};
use crate::function::{
    ComputationFunction, ExecutionContext, InputBinding, Rejection, Requirements, ResolvedInput,
};
use crate::repository::FunctionRepository;

// =============================================================================
// OUTCOMES
// =============================================================================

/// Why one candidate function did not resolve a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptFailure {
    /// The function's result template can never satisfy the query.
    CannotProduce,
    /// The function declined the query.
    Rejected(Rejection),
    /// An upstream value the function needs is not available.
    UpstreamUnavailable {
        /// Display form of the upstream query.
        query: String,
    },
}

/// One candidate function tried for a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    /// The query as the function saw it.
    pub query: ValueQuery,
    /// The function.
    pub function_id: String,
    /// What went wrong.
    pub failure: AttemptFailure,
}

/// No registered function could serve a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unsatisfiable {
    /// The caller's query.
    pub query: ValueQuery,
    /// Every candidate tried, in order.
    pub attempts: Vec<Attempt>,
}

/// Outcome of resolving one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum Resolution<T> {
    /// Resolved.
    Resolved(T),
    /// No function could serve the query.
    Unsatisfiable(Unsatisfiable),
}

impl<T> Resolution<T> {
    /// True when resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// The resolved value, if any.
    pub fn resolved(&self) -> Option<&T> {
        match self {
            Resolution::Resolved(v) => Some(v),
            Resolution::Unsatisfiable(_) => None,
        }
    }

    /// Consumes the resolution, returning the value if any.
    pub fn into_resolved(self) -> Option<T> {
        match self {
            Resolution::Resolved(v) => Some(v),
            Resolution::Unsatisfiable(_) => None,
        }
    }

    /// Maps the resolved value.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Resolution<U> {
        match self {
            Resolution::Resolved(v) => Resolution::Resolved(f(v)),
            Resolution::Unsatisfiable(u) => Resolution::Unsatisfiable(u),
        }
    }
}

/// A negotiated resolution, ready to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionPlan {
    /// The caller's query.
    pub original: ValueQuery,
    /// The query the chosen function serves, after injection.
    pub query: ValueQuery,
    /// Injectors that rewrote the query, in order. Empty when the original
    /// query was used.
    pub injected_by: Vec<String>,
    /// The chosen function.
    pub function_id: String,
    /// Upstream queries and the descriptors bound to them.
    pub inputs: Vec<InputBinding>,
    /// What will be published.
    pub descriptor: ValueDescriptor,
}

impl ResolutionPlan {
    /// True when an injector rewrote the query the function serves.
    #[must_use]
    pub fn is_injected(&self) -> bool {
        !self.injected_by.is_empty()
    }
}

/// A target and the query to resolve on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    /// The calculation target.
    pub target: CalculationTarget,
    /// The query.
    pub query: ValueQuery,
}

impl ResolutionRequest {
    /// Creates a request.
    pub fn new(target: CalculationTarget, query: ValueQuery) -> Self {
        Self { target, query }
    }

    /// An unconstrained request for `value_name` on `target`.
    pub fn unconstrained(target: CalculationTarget, value_name: impl Into<String>) -> Self {
        let query = ValueQuery::unconstrained(value_name, target.reference());
        Self { target, query }
    }
}

/// Results of a batch resolution.
#[derive(Debug)]
pub struct BatchResolution {
    /// One result per request, in request order.
    pub results: Vec<EngineResult<Resolution<ComputedValue>>>,
    /// Number of published values.
    pub resolved: usize,
    /// Number of unsatisfiable queries.
    pub unsatisfiable: usize,
    /// Number of hard failures.
    pub failed: usize,
    /// Total elapsed time in milliseconds.
    pub elapsed_ms: u64,
}

// =============================================================================
// RESOLVER
// =============================================================================

/// Resolves value queries against a function repository and a market data
/// provider.
pub struct ValueResolver {
    repository: Arc<FunctionRepository>,
    market: Arc<dyn MarketDataProvider>,
    config: ResolverConfig,
}

impl ValueResolver {
    /// Creates a resolver.
    pub fn new(
        repository: Arc<FunctionRepository>,
        market: Arc<dyn MarketDataProvider>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            repository,
            market,
            config,
        }
    }

    /// The function repository.
    pub fn repository(&self) -> &FunctionRepository {
        &self.repository
    }

    /// The resolver configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Builds an execution context from the configured valuation date.
    pub fn context<'a>(&self, pricing: &'a dyn PricingLibrary) -> EngineResult<ExecutionContext<'a>> {
        let date = self
            .config
            .valuation_date
            .ok_or_else(|| EngineError::Config("no valuation date configured".into()))?;
        Ok(ExecutionContext::new(date, pricing))
    }

    /// Negotiates a resolution for `query` without fetching any value.
    ///
    /// Injectors rewrite the query first. When the rewritten query cannot be
    /// served and fallback is enabled, the caller's original query is tried.
    pub fn plan(
        &self,
        target: &CalculationTarget,
        query: &ValueQuery,
    ) -> EngineResult<Resolution<ResolutionPlan>> {
        let mut current = query.clone();
        let mut injected_by = Vec::new();
        for injector in self.repository.injectors() {
            if let Some(rewritten) = injector.inject(target, &current) {
                injected_by.push(injector.id().to_string());
                current = rewritten;
            }
        }

        let mut attempts = Vec::new();
        if let Some(plan) = self.plan_query(target, query, &current, &injected_by, &mut attempts)? {
            return Ok(Resolution::Resolved(plan));
        }
        if !injected_by.is_empty() && self.config.fallback_to_original_query {
            debug!(query = %query, "Injected query unsatisfiable, falling back to original");
            if let Some(plan) = self.plan_query(target, query, query, &[], &mut attempts)? {
                return Ok(Resolution::Resolved(plan));
            }
        }

        warn!(
            attempts = attempts.len(),
            state = "unsatisfiable",
            "No function can produce {}",
            query
        );
        Ok(Resolution::Unsatisfiable(Unsatisfiable {
            query: query.clone(),
            attempts,
        }))
    }

    /// Tries every candidate for `query` in priority order.
    fn plan_query(
        &self,
        target: &CalculationTarget,
        original: &ValueQuery,
        query: &ValueQuery,
        injected_by: &[String],
        attempts: &mut Vec<Attempt>,
    ) -> EngineResult<Option<ResolutionPlan>> {
        for function in self.repository.candidates(query.value_name()) {
            let failure = match self.try_function(function, target, query)? {
                Ok((inputs, descriptor)) => {
                    debug!(
                        function = function.id(),
                        state = "inputs_resolved",
                        "Planned {}",
                        descriptor
                    );
                    return Ok(Some(ResolutionPlan {
                        original: original.clone(),
                        query: query.clone(),
                        injected_by: injected_by.to_vec(),
                        function_id: function.id().to_string(),
                        inputs,
                        descriptor,
                    }));
                }
                Err(failure) => failure,
            };
            debug!(function = function.id(), ?failure, "Candidate skipped for {}", query);
            attempts.push(Attempt {
                query: query.clone(),
                function_id: function.id().to_string(),
                failure,
            });
        }
        Ok(None)
    }

    /// Outer error is hard, inner error is a soft skip.
    fn try_function(
        &self,
        function: &dyn ComputationFunction,
        target: &CalculationTarget,
        query: &ValueQuery,
    ) -> EngineResult<Result<(Vec<InputBinding>, ValueDescriptor), AttemptFailure>> {
        if !function.can_produce(target, query) {
            return Ok(Err(AttemptFailure::CannotProduce));
        }
        let needs = match function.requirements(target, query) {
            Requirements::Needs(needs) => needs,
            Requirements::CannotContribute(rejection) => {
                return Ok(Err(AttemptFailure::Rejected(rejection)))
            }
        };
        debug!(
            function = function.id(),
            state = "requirements_known",
            inputs = needs.len(),
            "Requirements known for {}",
            query
        );

        let mut inputs = Vec::with_capacity(needs.len());
        for upstream in needs {
            match self.market.resolve(&upstream)? {
                Some(descriptor) => inputs.push(InputBinding {
                    query: upstream,
                    descriptor,
                }),
                None => {
                    return Ok(Err(AttemptFailure::UpstreamUnavailable {
                        query: upstream.to_string(),
                    }))
                }
            }
        }

        let descriptor = function.result_concrete(target, query, &inputs)?;
        Ok(Ok((inputs, descriptor)))
    }

    /// Fetches the planned inputs and computes the value.
    pub fn execute(
        &self,
        ctx: &ExecutionContext<'_>,
        target: &CalculationTarget,
        plan: &ResolutionPlan,
    ) -> EngineResult<ComputedValue> {
        let function = self.repository.function(&plan.function_id).ok_or_else(|| {
            EngineError::unsupported(format!("function '{}' is not registered", plan.function_id))
        })?;

        let resolved = plan
            .inputs
            .iter()
            .map(|binding| {
                let value = self
                    .market
                    .value(&binding.descriptor)?
                    .ok_or_else(|| EngineError::missing(&binding.descriptor))?;
                Ok(ResolvedInput {
                    binding: binding.clone(),
                    value,
                })
            })
            .collect::<EngineResult<Vec<_>>>()?;

        let computed = function.calculate(ctx, target, &plan.query, &resolved)?;
        if computed.descriptor() != &plan.descriptor {
            return Err(EngineError::unsupported(format!(
                "{} published {} but planned {}",
                plan.function_id,
                computed.descriptor(),
                plan.descriptor
            )));
        }
        info!(
            function = %plan.function_id,
            state = "published",
            "Published {}",
            computed.descriptor()
        );
        Ok(computed)
    }

    /// Plans and executes one query.
    pub fn resolve(
        &self,
        ctx: &ExecutionContext<'_>,
        target: &CalculationTarget,
        query: &ValueQuery,
    ) -> EngineResult<Resolution<ComputedValue>> {
        match self.plan(target, query)? {
            Resolution::Resolved(plan) => self.execute(ctx, target, &plan).map(Resolution::Resolved),
            Resolution::Unsatisfiable(u) => Ok(Resolution::Unsatisfiable(u)),
        }
    }

    /// Resolves independent requests, one result per request in request
    /// order. Runs on the rayon pool once the batch reaches the configured
    /// threshold.
    pub fn resolve_all(
        &self,
        ctx: &ExecutionContext<'_>,
        requests: &[ResolutionRequest],
    ) -> Vec<EngineResult<Resolution<ComputedValue>>> {
        let resolve_one = |r: &ResolutionRequest| self.resolve(ctx, &r.target, &r.query);
        if requests.len() >= self.config.parallel_threshold {
            requests.par_iter().map(resolve_one).collect()
        } else {
            requests.iter().map(resolve_one).collect()
        }
    }

    /// Resolves a batch and reports counts and timing.
    pub fn resolve_batch(
        &self,
        ctx: &ExecutionContext<'_>,
        requests: &[ResolutionRequest],
    ) -> BatchResolution {
        let start = Instant::now();
        let results = self.resolve_all(ctx, requests);
        let elapsed = start.elapsed();

        let resolved = results
            .iter()
            .filter(|r| matches!(r, Ok(Resolution::Resolved(_))))
            .count();
        let unsatisfiable = results
            .iter()
            .filter(|r| matches!(r, Ok(Resolution::Unsatisfiable(_))))
            .count();
        let failed = results.len() - resolved - unsatisfiable;

        info!(
            requests = requests.len(),
            resolved, unsatisfiable, failed, "Batch resolved in {:?}", elapsed
        );
        BatchResolution {
            results,
            resolved,
            unsatisfiable,
            failed,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl std::fmt::Debug for ValueResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueResolver")
            .field("repository", &self.repository)
            .field("source", &self.market.source_type())
            .field("config", &self.config)
            .finish()
    }
}
