use crate::core::patterns::traits::{ClusterRef, InferenceResult, PatternInferer};
use crate::engine::config::RunConfig;
use crate::engine::export::{Cluster, ClusterExport};
use crate::engine::ordering::{OrderingContext, order_charge_clusters};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::store::ParameterType;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fmt::Write as _;
use tracing::{debug, info, instrument, warn};

/// Results of one named ordering, per parameter type in run order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderingOutcome {
    pub name: String,
    pub results: Vec<(ParameterType, InferenceResult)>,
}

impl OrderingOutcome {
    /// True when every included parameter type passed.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|(_, r)| r.passed)
    }

    pub fn result(&self, parameter_type: ParameterType) -> Option<&InferenceResult> {
        self.results
            .iter()
            .find(|(t, _)| *t == parameter_type)
            .map(|(_, r)| r)
    }
}

/// Inference results of every ordering, in plan order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ComparisonReport {
    pub outcomes: Vec<OrderingOutcome>,
}

impl ComparisonReport {
    /// True iff some ordering passed for every included parameter type.
    pub fn at_least_one_passed(&self) -> bool {
        self.outcomes.iter().any(OrderingOutcome::all_passed)
    }

    /// Whether the named ordering passed for every parameter type; `None` for
    /// an ordering that was not run.
    pub fn passed(&self, ordering: &str) -> Option<bool> {
        self.outcome(ordering).map(OrderingOutcome::all_passed)
    }

    pub fn outcome(&self, ordering: &str) -> Option<&OrderingOutcome> {
        self.outcomes.iter().find(|o| o.name == ordering)
    }

    /// Human-readable report. Each shown ordering gets a heading between two
    /// rules (`ALL PASSED` when every type passed) followed by one verdict
    /// line per type and a blank line. Orderings with a failure are only
    /// shown when `print_all` is set.
    pub fn summary(&self, print_all: bool) -> String {
        let rule = "-".repeat(80);
        let mut out = String::new();
        for outcome in &self.outcomes {
            let all_passed = outcome.all_passed();
            if !all_passed && !print_all {
                continue;
            }
            let _ = writeln!(out, "{}", rule);
            if all_passed {
                let _ = writeln!(out, "{:<23} ALL PASSED", outcome.name);
            } else {
                let _ = writeln!(out, "{}", outcome.name);
            }
            let _ = writeln!(out, "{}", rule);
            for (parameter_type, result) in &outcome.results {
                let verdict = if result.passed {
                    "PASSED"
                } else {
                    "FAILED to make smirks"
                };
                let _ = writeln!(out, "{:<23} {}", parameter_type.name(), verdict);
            }
            out.push('\n');
        }
        out
    }
}

// ordering name -> parameter type -> {checked, type_list}
impl Serialize for ComparisonReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct ByType<'a>(&'a [(ParameterType, InferenceResult)]);

        impl Serialize for ByType<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for (parameter_type, result) in self.0 {
                    map.serialize_entry(parameter_type.name(), result)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(self.outcomes.len()))?;
        for outcome in &self.outcomes {
            map.serialize_entry(&outcome.name, &ByType(&outcome.results))?;
        }
        map.end()
    }
}

/// Runs every planned ordering over every configured parameter type and
/// invokes `inferer` once per combination.
///
/// A failed inference is recorded and the run moves on. Charge clusters are
/// always ordered one terminus segment at a time.
#[instrument(skip_all, name = "compare_workflow", fields(orderings = config.orderings.len()))]
pub fn run(
    export: &ClusterExport<'_>,
    config: &RunConfig,
    inferer: &dyn PatternInferer,
    reporter: &ProgressReporter,
) -> ComparisonReport {
    reporter.report(Progress::PhaseStart {
        name: "Comparison",
    });
    reporter.report(Progress::TaskStart {
        total_steps: (config.orderings.len() * config.parameter_types.len()) as u64,
    });
    info!(
        "Comparing {} ordering(s) over {} parameter type(s) for {} molecule(s).",
        config.orderings.len(),
        config.parameter_types.len(),
        export.molecules.len()
    );

    let mut context = OrderingContext::new(&export.molecules, inferer, config.seed);
    let mut outcomes = Vec::with_capacity(config.orderings.len());

    for (name, strategy) in config.orderings.runs() {
        let mut results = Vec::with_capacity(config.parameter_types.len());
        for &parameter_type in &config.parameter_types {
            let clusters: Vec<&Cluster> = match export.clusters_for(parameter_type) {
                Some(clusters) => clusters.iter().collect(),
                None => {
                    warn!(
                        parameter = %parameter_type,
                        "Parameter type was not exported; inferring over no clusters."
                    );
                    Vec::new()
                }
            };

            let ordered = if parameter_type == ParameterType::Charge {
                order_charge_clusters(&clusters, Some(*strategy), &mut context)
            } else {
                strategy.apply(&clusters, &mut context)
            };
            let views: Vec<ClusterRef<'_>> = ordered.iter().map(|c| c.view()).collect();
            let result = inferer.infer(&export.molecules, &views);

            debug!(
                ordering = %name,
                parameter = %parameter_type,
                clusters = views.len(),
                passed = result.passed,
                "Inference finished."
            );
            reporter.report(Progress::InferenceFinished {
                ordering: name.clone(),
                parameter_type,
                passed: result.passed,
            });
            reporter.report(Progress::TaskIncrement);
            results.push((parameter_type, result));
        }
        outcomes.push(OrderingOutcome {
            name: name.clone(),
            results,
        });
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let report = ComparisonReport { outcomes };
    info!(
        "Comparison complete: {} of {} ordering(s) passed.",
        report.outcomes.iter().filter(|o| o.all_passed()).count(),
        report.outcomes.len()
    );
    report
}
