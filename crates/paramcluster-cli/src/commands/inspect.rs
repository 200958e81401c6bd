use super::{collect_sequence_files, load_forcefield};
use crate::cli::InspectArgs;
use crate::config::build_input_config;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use paramcluster::core::forcefield::parameterization::TemplateParameterizer;
use paramcluster::engine::export::ClusterExport;
use paramcluster::engine::progress::ProgressReporter;
use paramcluster::workflows::ingest;
use tracing::info;

pub fn run(args: InspectArgs) -> Result<()> {
    let input = build_input_config(&args.input)?;
    let files = collect_sequence_files(&input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    for source in &input.forcefields {
        let forcefield = load_forcefield(source)?;
        let builder = TemplateParameterizer::new(&forcefield);
        let store = ingest::run(&files, &builder, &reporter)?;

        info!("Summarizing clusters for force field '{}'.", source.name);
        let export = ClusterExport::from_store(&store, None);
        println!("{}", source.name);
        print!("{}", export.summary_table());
    }
    Ok(())
}
