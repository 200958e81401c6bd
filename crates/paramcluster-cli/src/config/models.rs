use paramcluster::engine::config::{ConfigError, RunConfig, RunConfigBuilder};
use paramcluster::engine::store::ParameterType;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForcefieldSource {
    pub name: String,
    pub path: PathBuf,
}

/// Resolved sequence input shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputConfig {
    pub dir: PathBuf,
    pub files: String,
    pub forcefields: Vec<ForcefieldSource>,
}

impl InputConfig {
    pub fn pattern(&self) -> String {
        self.dir.join(&self.files).to_string_lossy().into_owned()
    }
}

/// A named group of orderings compared against each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingSet {
    pub name: String,
    pub orderings: Vec<String>,
}

impl OrderingSet {
    pub fn run_config(
        &self,
        parameter_type: ParameterType,
        seed: Option<u64>,
    ) -> Result<RunConfig, ConfigError> {
        RunConfigBuilder::new()
            .orderings(self.orderings.iter().cloned())
            .parameter_types(vec![parameter_type])
            .seed(seed)
            .build()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunAppConfig {
    pub input: InputConfig,
    pub run_label: String,
    pub output_dir: PathBuf,
    pub ordering_sets: Vec<OrderingSet>,
    pub parameters: Vec<ParameterType>,
    pub seed: Option<u64>,
    pub max_layers: usize,
    pub print_all: bool,
}
