use crate::error::{CliError, Result};
use paramcluster::engine::store::ParameterType;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileRunConfig {
    pub label: Option<String>,
    pub dir: Option<PathBuf>,
    pub files: Option<String>,
    pub mol_dir: Option<PathBuf>,
    pub seed: Option<u64>,
    pub print_all: Option<bool>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileOrderingSet {
    pub name: String,
    pub orderings: Vec<String>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileInferenceConfig {
    pub max_layers: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
pub struct FileForcefieldConfig {
    pub dir: Option<PathBuf>,
    /// Explicit definition files by force-field name.
    #[serde(flatten)]
    pub paths: HashMap<String, PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileConfig {
    pub run: Option<FileRunConfig>,
    pub ordering_sets: Option<Vec<FileOrderingSet>>,
    pub parameters: Option<Vec<ParameterType>>,
    pub inference: Option<FileInferenceConfig>,
    pub forcefields: Option<FileForcefieldConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
