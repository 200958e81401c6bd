use clap::{Args, Parser, Subcommand, ValueEnum};
use paramcluster::engine::store::ParameterType;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "paramcluster developers",
    version,
    about = "paramcluster - Cluster force-field parameters of peptides and compare cluster orderings for SMIRKS pattern inference.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Cluster parameters and compare every ordering set through SMIRKS inference.
    Run(RunArgs),
    /// Ingest sequences and print cluster statistics without running inference.
    Inspect(InspectArgs),
}

/// The force fields a run is repeated for.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForcefieldSelector {
    /// Amber ff99SB-ILDN
    #[value(name = "99sbildn")]
    Amber99sbildn,
    /// Amber ff14SB
    #[value(name = "14all")]
    Amber14All,
    /// Both force fields, one after the other
    #[value(name = "both", alias = "all")]
    Both,
}

impl ForcefieldSelector {
    /// Force-field names, which are also the definition file stems.
    pub fn forcefield_names(self) -> &'static [&'static str] {
        match self {
            ForcefieldSelector::Amber99sbildn => &["amber99sbildn"],
            ForcefieldSelector::Amber14All => &["amber14-all"],
            ForcefieldSelector::Both => &["amber99sbildn", "amber14-all"],
        }
    }
}

/// Where sequences come from and which force fields apply to them.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Directory holding the sequence files.
    #[arg(short = 'd', long = "dir", value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// File name pattern of the sequence files inside the directory.
    #[arg(short = 'f', long = "files", value_name = "GLOB")]
    pub files: Option<String>,

    /// Force field(s) to parameterize with.
    #[arg(short = 'x', long = "forcefield", value_enum, value_name = "NAME")]
    pub forcefield: Option<ForcefieldSelector>,

    /// Directory holding `<forcefield name>.toml` definition files.
    #[arg(long, value_name = "DIR")]
    pub forcefield_dir: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Arguments for the `run` subcommand.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Free-text label that prefixes every output document name.
    #[arg(short = 'n', long = "name", value_name = "LABEL")]
    pub name: Option<String>,

    /// Directory for the annotated molecule files and reports (defaults to --dir).
    #[arg(long, value_name = "DIR")]
    pub mol_dir: Option<PathBuf>,

    /// Restrict the comparison to these parameter types. Can be repeated.
    #[arg(short = 'p', long = "parameter", value_name = "TYPE")]
    pub parameters: Vec<ParameterType>,

    /// Seed for the `shuffle` ordering.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Maximum neighbour layers the SMIRKS inferer may add.
    #[arg(long, value_name = "INT")]
    pub max_layers: Option<usize>,

    /// Also list orderings that failed for some parameter type.
    #[arg(long)]
    pub print_all: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_short_flags() {
        let cli = Cli::parse_from([
            "paramcluster", "run", "-d", "mols", "-f", "*.fa", "-x", "14all", "-n", "trial",
            "-p", "bond", "-p", "Charge",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(args.input.dir, Some(PathBuf::from("mols")));
        assert_eq!(args.input.files.as_deref(), Some("*.fa"));
        assert_eq!(args.input.forcefield, Some(ForcefieldSelector::Amber14All));
        assert_eq!(args.name.as_deref(), Some("trial"));
        assert_eq!(args.parameters, vec![ParameterType::Bond, ParameterType::Charge]);
    }

    #[test]
    fn all_is_an_alias_of_both() {
        let cli = Cli::parse_from(["paramcluster", "inspect", "-x", "all"]);
        let Commands::Inspect(args) = cli.command else {
            panic!("expected the inspect subcommand");
        };
        assert_eq!(args.input.forcefield, Some(ForcefieldSelector::Both));
        assert_eq!(
            ForcefieldSelector::Both.forcefield_names(),
            &["amber99sbildn", "amber14-all"]
        );
    }

    #[test]
    fn unknown_forcefield_selector_is_a_usage_error() {
        let result = Cli::try_parse_from(["paramcluster", "run", "-x", "charmm36"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidValue);
    }

    #[test]
    fn unknown_parameter_type_is_rejected() {
        assert!(Cli::try_parse_from(["paramcluster", "run", "-p", "dihedral"]).is_err());
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["paramcluster", "-v", "-q", "inspect"]).is_err());
    }
}
