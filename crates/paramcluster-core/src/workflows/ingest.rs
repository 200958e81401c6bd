use crate::core::forcefield::parameterization::SystemBuilder;
use crate::core::io::fasta::FastaFile;
use crate::core::io::traits::SequenceFile;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::store::ParameterStore;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Reads every sequence file, parameterizes it with `builder` and ingests the
/// result, in the order given.
///
/// Any unreadable file or unparameterizable sequence aborts the whole
/// ingestion.
#[instrument(skip_all, name = "ingest_workflow", fields(files = paths.len()))]
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    builder: &dyn SystemBuilder,
    reporter: &ProgressReporter,
) -> Result<ParameterStore, EngineError> {
    if paths.is_empty() {
        return Err(EngineError::NoInput);
    }

    reporter.report(Progress::PhaseStart { name: "Ingestion" });
    reporter.report(Progress::TaskStart {
        total_steps: paths.len() as u64,
    });

    let mut store = ParameterStore::new();
    for path in paths {
        let path = path.as_ref();
        let sequence =
            FastaFile::read_from_path(path).map_err(|source| EngineError::Sequence {
                path: path.display().to_string(),
                source,
            })?;
        let (system, molecule) =
            builder
                .build(&sequence)
                .map_err(|source| EngineError::Parameterization {
                    molecule: sequence.id.clone(),
                    source,
                })?;
        debug!(
            molecule = %sequence.id,
            residues = sequence.residues.len(),
            atoms = system.atom_count(),
            "Parameterized sequence."
        );
        store.add_molecule(sequence.id, system, molecule)?;
        reporter.report(Progress::TaskIncrement);
    }

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);
    info!("Ingested {} molecule(s).", store.len());
    Ok(store)
}
