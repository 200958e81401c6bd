pub mod inspect;
pub mod run;

use crate::config::{ForcefieldSource, InputConfig};
use crate::error::{CliError, Result};
use paramcluster::core::forcefield::params::Forcefield;
use paramcluster::engine::error::EngineError;
use std::path::PathBuf;
use tracing::{debug, info};

/// Sequence files matching the input pattern, sorted by path.
fn collect_sequence_files(input: &InputConfig) -> Result<Vec<PathBuf>> {
    let pattern = input.pattern();
    let entries = glob::glob(&pattern)
        .map_err(|e| CliError::Argument(format!("Invalid file pattern '{}': {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| CliError::Io(e.into_error()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(CliError::Argument(format!(
            "No sequence files match '{}'",
            pattern
        )));
    }
    info!("Found {} sequence file(s) matching '{}'.", files.len(), pattern);
    Ok(files)
}

fn load_forcefield(source: &ForcefieldSource) -> Result<Forcefield> {
    debug!("Loading force field '{}' from {:?}", source.name, source.path);
    Forcefield::load(&source.path).map_err(|e| CliError::Engine(EngineError::from(e)))
}
