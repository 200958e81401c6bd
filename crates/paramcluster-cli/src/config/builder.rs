use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileForcefieldConfig, FileOrderingSet};
use super::models::{ForcefieldSource, InputConfig, OrderingSet, RunAppConfig};
use crate::cli::{InputArgs, RunArgs};
use crate::error::{CliError, Result};
use paramcluster::engine::config::OrderingPlan;
use std::path::PathBuf;

fn load_file_config(args: &InputArgs) -> Result<FileConfig> {
    match &args.config {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}

pub fn build_input_config(args: &InputArgs) -> Result<InputConfig> {
    let file_config = load_file_config(args)?;
    Ok(merge_input(args, &file_config, &DefaultsConfig::default()))
}

pub fn build_run_config(args: &RunArgs) -> Result<RunAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(&args.input)?;
    let input = merge_input(&args.input, &file_config, &defaults);

    let run_file = file_config.run.take().unwrap_or_default();
    let run_label = args
        .name
        .clone()
        .or(run_file.label)
        .unwrap_or_else(|| defaults.run_label.to_string());
    let output_dir = args
        .mol_dir
        .clone()
        .or(run_file.mol_dir)
        .unwrap_or_else(|| input.dir.clone());

    let ordering_sets = match file_config.ordering_sets.take() {
        Some(sets) => merge_ordering_sets(sets)?,
        None => defaults
            .ordering_sets
            .iter()
            .map(|(name, orderings)| OrderingSet {
                name: name.to_string(),
                orderings: orderings.iter().map(|o| o.to_string()).collect(),
            })
            .collect(),
    };

    let parameters = if !args.parameters.is_empty() {
        args.parameters.clone()
    } else {
        file_config
            .parameters
            .take()
            .unwrap_or_else(|| defaults.parameters.to_vec())
    };
    if parameters.is_empty() {
        return Err(CliError::Config(
            "At least one parameter type must be selected".to_string(),
        ));
    }

    let max_layers = args
        .max_layers
        .or(file_config.inference.and_then(|i| i.max_layers))
        .unwrap_or(defaults.max_layers);

    Ok(RunAppConfig {
        input,
        run_label,
        output_dir,
        ordering_sets,
        parameters,
        seed: args.seed.or(run_file.seed),
        max_layers,
        print_all: args.print_all || run_file.print_all.unwrap_or(false),
    })
}

fn merge_input(args: &InputArgs, file: &FileConfig, defaults: &DefaultsConfig) -> InputConfig {
    let run_file = file.run.clone().unwrap_or_default();
    let dir = args
        .dir
        .clone()
        .or(run_file.dir)
        .unwrap_or_else(|| PathBuf::from(defaults.dir));
    let files = args
        .files
        .clone()
        .or(run_file.files)
        .unwrap_or_else(|| defaults.files.to_string());

    let selector = args.forcefield.unwrap_or(defaults.forcefield);
    let ff_file = file.forcefields.clone().unwrap_or_default();
    let forcefields = selector
        .forcefield_names()
        .iter()
        .map(|name| ForcefieldSource {
            name: name.to_string(),
            path: resolve_forcefield_path(name, args, &ff_file, defaults),
        })
        .collect();

    InputConfig {
        dir,
        files,
        forcefields,
    }
}

/// An explicit per-name entry wins; otherwise `<dir>/<name>.toml`.
fn resolve_forcefield_path(
    name: &str,
    args: &InputArgs,
    file: &FileForcefieldConfig,
    defaults: &DefaultsConfig,
) -> PathBuf {
    if let Some(path) = file.paths.get(name) {
        return path.clone();
    }
    let dir = args
        .forcefield_dir
        .clone()
        .or_else(|| file.dir.clone())
        .unwrap_or_else(|| PathBuf::from(defaults.forcefield_dir));
    dir.join(format!("{}.toml", name))
}

fn merge_ordering_sets(sets: Vec<FileOrderingSet>) -> Result<Vec<OrderingSet>> {
    if sets.is_empty() {
        return Err(CliError::Config(
            "'ordering-sets' must name at least one set".to_string(),
        ));
    }
    sets.into_iter()
        .map(|set| {
            if set.orderings.is_empty() {
                return Err(CliError::Config(format!(
                    "Ordering set '{}' has no orderings",
                    set.name
                )));
            }
            OrderingPlan::from_names(&set.orderings)
                .map_err(|e| CliError::Config(format!("Ordering set '{}': {}", set.name, e)))?;
            Ok(OrderingSet {
                name: set.name,
                orderings: set.orderings,
            })
        })
        .collect()
}
