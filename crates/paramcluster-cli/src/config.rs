mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_input_config, build_run_config};
pub use models::{ForcefieldSource, InputConfig, OrderingSet, RunAppConfig};
