use super::{collect_sequence_files, load_forcefield};
use crate::cli::RunArgs;
use crate::config::build_run_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use paramcluster::core::forcefield::parameterization::TemplateParameterizer;
use paramcluster::core::patterns::smirksifier::ClusterSmirksifier;
use paramcluster::engine::error::EngineError;
use paramcluster::engine::export::ClusterExport;
use paramcluster::engine::progress::ProgressReporter;
use paramcluster::engine::store::ParameterType;
use paramcluster::workflows::compare::{self, ComparisonReport};
use paramcluster::workflows::{export, ingest};
use tracing::info;

pub fn run(args: RunArgs) -> Result<()> {
    let config = build_run_config(&args)?;
    let files = collect_sequence_files(&config.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let inferer = ClusterSmirksifier::new(config.max_layers);

    for source in &config.input.forcefields {
        let forcefield = load_forcefield(source)?;
        let builder = TemplateParameterizer::new(&forcefield);
        let store = ingest::run(&files, &builder, &reporter)?;
        println!(
            "Ingested {} molecule(s) with force field '{}'.",
            store.len(),
            source.name
        );

        // All six types go into every export; each run config compares one.
        let clusters = ClusterExport::from_store(&store, None);

        for &parameter_type in &config.parameters {
            for set in &config.ordering_sets {
                info!(
                    "Comparing ordering set '{}' for {}.",
                    set.name, parameter_type
                );
                let run_config = set
                    .run_config(parameter_type, config.seed)
                    .map_err(EngineError::from)?;
                let report = compare::run(&clusters, &run_config, &inferer, &reporter);
                print!("{}", report.summary(config.print_all));

                println!("{}", verdict(&report, parameter_type));

                let settings = export::ExportSettings {
                    output_dir: config.output_dir.clone(),
                    run_label: config.run_label.clone(),
                    set_name: set.name.clone(),
                    forcefield: source.name.clone(),
                    parameter_type: Some(parameter_type),
                };
                let written = export::run(&clusters, &report, &settings)?;
                info!("Report written to {:?}", written.document);
            }
        }
    }
    Ok(())
}

/// Outcome line of one ordering set for one parameter type.
fn verdict(report: &ComparisonReport, parameter_type: ParameterType) -> String {
    if report.at_least_one_passed() {
        format!("Something PASSED -- {}", parameter_type)
    } else {
        format!("ALL FAILED -- {}", parameter_type)
    }
}
