use crate::cli::ForcefieldSelector;
use paramcluster::engine::store::ParameterType;

pub struct DefaultsConfig {
    pub dir: &'static str,
    pub files: &'static str,
    pub forcefield: ForcefieldSelector,
    pub forcefield_dir: &'static str,
    pub run_label: &'static str,
    pub max_layers: usize,
    pub parameters: [ParameterType; 6],
    /// `(set name, orderings)` compared when the config file names none.
    pub ordering_sets: [(&'static str, [&'static str; 3]); 3],
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            dir: "./mol_files/",
            files: "*.fasta",
            forcefield: ForcefieldSelector::Amber99sbildn,
            forcefield_dir: "forcefields",
            run_label: "",
            max_layers: 10,
            parameters: [
                ParameterType::Charge,
                ParameterType::Angle,
                ParameterType::ImproperTorsion,
                ParameterType::ProperTorsion,
                ParameterType::Lj,
                ParameterType::Bond,
            ],
            ordering_sets: [
                ("big", ["biggest_size", "most_mols", "big_smirks"]),
                ("small", ["small_size", "fewest_mols", "small_smirks"]),
                ("shuffle", ["original", "shuffle", "shuffle"]),
            ],
        }
    }
}
