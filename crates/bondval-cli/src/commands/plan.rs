//! Plan command implementation.
//!
//! Negotiates how each bond's value would be resolved: which function
//! serves it, with which curves, from which upstream inputs. Nothing is
//! priced.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use tracing::{debug, info};

use bondval_config::BondvalConfig;
use bondval_core::value::property_names;
use bondval_core::{CalculationTarget, PropertyConstraintSet, TargetRef, ValueQuery};
use bondval_engine::{
    AttemptFailure, FunctionRepository, Resolution, ResolutionPlan, Unsatisfiable, ValueResolver,
};
use bondval_ext_file::{create_file_reference_data, JsonMarketData};

use crate::cli::OutputFormat;
use crate::commands::parse_property;
use crate::error::CliError;
use crate::output::{or_dash, print_header, print_json, print_output, print_warning, Minimal};

/// Arguments for the plan command.
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Bond reference data (CSV)
    #[arg(short, long)]
    pub bonds: PathBuf,

    /// Yield curves (JSON)
    #[arg(long)]
    pub curves: Option<PathBuf>,

    /// Quoted clean prices and yields (CSV)
    #[arg(long)]
    pub quotes: Option<PathBuf>,

    /// Value to resolve
    #[arg(short = 'n', long = "value", default_value = "Clean Price")]
    pub value_name: String,

    /// Securities to plan (default: every bond in the file)
    #[arg(short, long = "security")]
    pub securities: Vec<String>,

    /// Property constraint, NAME=VALUE, NAME=V1,V2 or NAME=* (repeatable)
    #[arg(short, long = "property")]
    pub properties: Vec<String>,

    /// Do not retry the caller's query when the defaulted one fails
    #[arg(long)]
    pub no_fallback: bool,
}

/// Plan for one security, as printed in JSON mode.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    /// Security identifier.
    pub security: String,
    /// Negotiated plan or the failed attempts.
    pub resolution: Resolution<ResolutionPlan>,
}

/// One plan, flattened for table and CSV output.
#[derive(Debug, Serialize, Tabled)]
pub struct PlanRow {
    #[tabled(rename = "Security")]
    pub security: String,
    #[tabled(rename = "Value")]
    pub value_name: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Function")]
    pub function: String,
    #[tabled(rename = "Method")]
    pub method: String,
    #[tabled(rename = "Risk-Free Curve")]
    pub risk_free_curve: String,
    #[tabled(rename = "Credit Curve")]
    pub credit_curve: String,
    #[tabled(rename = "Inputs")]
    pub inputs: usize,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl PlanRow {
    fn from_report(report: &PlanReport) -> Self {
        match &report.resolution {
            Resolution::Resolved(plan) => {
                let property = |name: &str| plan.descriptor.property(name);
                Self {
                    security: report.security.clone(),
                    value_name: plan.descriptor.value_name().to_string(),
                    status: "resolved".to_string(),
                    function: plan.function_id.clone(),
                    method: or_dash(property(property_names::CALCULATION_METHOD)),
                    risk_free_curve: or_dash(property(property_names::RISK_FREE_CURVE)),
                    credit_curve: or_dash(property(property_names::CREDIT_CURVE)),
                    inputs: plan.inputs.len(),
                    detail: if plan.is_injected() {
                        format!("defaults from {}", plan.injected_by.join(", "))
                    } else {
                        String::new()
                    },
                }
            }
            Resolution::Unsatisfiable(failure) => Self {
                security: report.security.clone(),
                value_name: failure.query.value_name().to_string(),
                status: "unsatisfiable".to_string(),
                function: or_dash(None),
                method: or_dash(None),
                risk_free_curve: or_dash(None),
                credit_curve: or_dash(None),
                inputs: 0,
                detail: summarize(failure),
            },
        }
    }
}

impl Minimal for PlanRow {
    fn minimal(&self) -> String {
        if self.status == "resolved" {
            self.function.clone()
        } else {
            self.status.clone()
        }
    }
}

/// One line per attempt, `function: reason`.
fn summarize(failure: &Unsatisfiable) -> String {
    if failure.attempts.is_empty() {
        return "no function produces this value".to_string();
    }
    failure
        .attempts
        .iter()
        .map(|attempt| {
            let reason = match &attempt.failure {
                AttemptFailure::CannotProduce => "cannot produce".to_string(),
                AttemptFailure::Rejected(rejection) => rejection.to_string(),
                AttemptFailure::UpstreamUnavailable { query } => format!("missing {}", query),
            };
            format!("{}: {}", attempt.function_id, reason)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Execute the plan command.
pub fn execute(
    args: PlanArgs,
    format: OutputFormat,
    config: &BondvalConfig,
    quiet: bool,
) -> Result<()> {
    let bonds = create_file_reference_data(&args.bonds)
        .with_context(|| format!("loading bonds from {}", args.bonds.display()))?;
    if bonds.is_empty() {
        return Err(CliError::NoBonds(args.bonds.display().to_string()).into());
    }

    let mut market = JsonMarketData::new();
    if let Some(path) = &args.curves {
        market
            .load_curves(path)
            .with_context(|| format!("loading curves from {}", path.display()))?;
    }
    if let Some(path) = &args.quotes {
        market
            .load_quotes(path)
            .with_context(|| format!("loading quotes from {}", path.display()))?;
    }
    info!(
        bonds = bonds.len(),
        curves = market.curve_count(),
        quoted = market.quoted_securities(),
        "Loaded inputs"
    );

    let constraints = args
        .properties
        .iter()
        .try_fold(PropertyConstraintSet::new(), |set, arg| parse_property(set, arg))?;

    let mut resolver_config = config.resolver.clone();
    if args.no_fallback {
        resolver_config = resolver_config.with_fallback(false);
    }
    let repository = FunctionRepository::standard(Arc::new(config.default_curves.clone()));
    let resolver = ValueResolver::new(Arc::new(repository), Arc::new(market), resolver_config);

    let securities = if args.securities.is_empty() {
        bonds.securities().cloned().collect::<Vec<_>>()
    } else {
        args.securities
            .iter()
            .map(|id| bonds.require(id).cloned())
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut reports = Vec::with_capacity(securities.len());
    for security in securities {
        let id = security.id.clone();
        let query = ValueQuery::new(
            args.value_name.as_str(),
            TargetRef::security(&id),
            constraints.clone(),
        );
        debug!(security = %id, query = %query, "Planning");
        let target = CalculationTarget::from(security);
        let resolution = resolver.plan(&target, &query)?;
        if !quiet {
            if let Resolution::Unsatisfiable(failure) = &resolution {
                print_warning(&format!("{}: {}", id, summarize(failure)));
            }
        }
        reports.push(PlanReport {
            security: id,
            resolution,
        });
    }

    match format {
        OutputFormat::Json => print_json(&reports),
        _ => {
            if format == OutputFormat::Table && !quiet {
                print_header(&format!("Resolution plan: {}", args.value_name));
            }
            let rows: Vec<PlanRow> = reports.iter().map(PlanRow::from_report).collect();
            print_output(&rows, format)
        }
    }
}
