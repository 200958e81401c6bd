use thiserror::Error;

use super::config::ConfigError;
use super::store::StoreError;
use crate::core::forcefield::parameterization::ParameterizationError;
use crate::core::forcefield::params::ForcefieldLoadError;
use crate::core::io::fasta::FastaError;
use crate::core::models::ids::MoleculeId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid run configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Force field could not be loaded: {source}")]
    Forcefield {
        #[from]
        source: ForcefieldLoadError,
    },

    #[error("Failed to read sequence file '{path}': {source}")]
    Sequence { path: String, source: FastaError },

    #[error("Failed to parameterize molecule '{molecule}': {source}")]
    Parameterization {
        molecule: MoleculeId,
        source: ParameterizationError,
    },

    #[error("Parameter store rejected the operation: {source}")]
    Store {
        #[from]
        source: StoreError,
    },

    #[error("No sequence files to ingest")]
    NoInput,
}
