use super::compare::ComparisonReport;
use crate::core::io::sdf::{SdfError, SdfFile};
use crate::core::io::smiles::write_mapped_smiles;
use crate::core::io::traits::AnnotatedMoleculeFile;
use crate::engine::export::{Cluster, ClusterExport};
use crate::engine::store::ParameterType;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("Failed to write molecule file '{path}': {source}")]
    Sdf { path: String, source: SdfError },
    #[error("Failed to serialize export document '{path}': {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },
}

/// Naming of one persisted comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub run_label: String,
    /// Name of the ordering set that produced the report.
    pub set_name: String,
    pub forcefield: String,
    /// The single parameter type compared, or `None` for all of them.
    pub parameter_type: Option<ParameterType>,
}

impl ExportSettings {
    /// `<label>_<set>_<forcefield>_<parameter>_<N>mols.json`
    pub fn document_name(&self, molecule_count: usize) -> String {
        let parameter = self.parameter_type.map_or("all", ParameterType::name);
        format!(
            "{}_{}_{}_{}_{}mols.json",
            self.run_label, self.set_name, self.forcefield, parameter, molecule_count
        )
    }
}

/// Files written by [`run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub molecule_files: Vec<PathBuf>,
    pub document: PathBuf,
}

struct ClustersByType<'a>(&'a [(ParameterType, Vec<Cluster>)]);

impl Serialize for ClustersByType<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (parameter_type, clusters) in self.0 {
            map.serialize_entry(parameter_type.name(), clusters)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct ExportDocument<'a> {
    run_label: &'a str,
    forcefield: &'a str,
    mol_files: Vec<String>,
    smiles: Vec<String>,
    clusters: ClustersByType<'a>,
    smirks_lists: &'a ComparisonReport,
}

/// Annotation of one molecule's groups in a cluster: `None`, or the
/// comma-separated groups with atoms joined by `-`.
fn group_annotation(groups: &[Vec<usize>]) -> String {
    if groups.is_empty() {
        return "None".to_string();
    }
    groups
        .iter()
        .map(|g| {
            g.iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join("-")
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// One `(key, value)` item per exported cluster for the molecule at
/// `position`, keyed `<parameter type>_<cluster label>`.
pub fn molecule_annotations(export: &ClusterExport<'_>, position: usize) -> Vec<(String, String)> {
    export
        .clusters
        .iter()
        .flat_map(|(parameter_type, clusters)| {
            clusters.iter().map(move |cluster| {
                let groups = cluster
                    .groups
                    .get(position)
                    .map(Vec::as_slice)
                    .unwrap_or_default();
                (
                    format!("{}_{}", parameter_type.name(), cluster.label),
                    group_annotation(groups),
                )
            })
        })
        .collect()
}

/// Writes one annotated SDF file per exported molecule into `dir`.
pub fn write_molecule_files(
    export: &ClusterExport<'_>,
    dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths = Vec::with_capacity(export.molecules.len());
    for (position, (id, molecule)) in export
        .molecule_ids
        .iter()
        .zip(&export.molecules)
        .enumerate()
    {
        let path = dir.join(format!("{}.sdf", id));
        let annotations = molecule_annotations(export, position);
        SdfFile::write_to_path(molecule, &annotations, &path).map_err(|source| {
            ExportError::Sdf {
                path: path.display().to_string(),
                source,
            }
        })?;
        paths.push(path);
    }
    Ok(paths)
}

/// Persists the molecules and the comparison report.
#[instrument(skip_all, name = "export_workflow", fields(set = %settings.set_name))]
pub fn run(
    export: &ClusterExport<'_>,
    report: &ComparisonReport,
    settings: &ExportSettings,
) -> Result<ExportedFiles, ExportError> {
    let molecule_files = write_molecule_files(export, &settings.output_dir)?;

    let document = ExportDocument {
        run_label: &settings.run_label,
        forcefield: &settings.forcefield,
        // relative to the output directory
        mol_files: molecule_files
            .iter()
            .filter_map(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect(),
        smiles: export
            .molecules
            .iter()
            .map(|m| write_mapped_smiles(m))
            .collect(),
        clusters: ClustersByType(&export.clusters),
        smirks_lists: report,
    };

    let path = settings
        .output_dir
        .join(settings.document_name(export.molecules.len()));
    let io_error = |source| ExportError::Io {
        path: path.display().to_string(),
        source,
    };
    let file = File::create(&path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &document).map_err(|source| ExportError::Json {
        path: path.display().to_string(),
        source,
    })?;
    writer.flush().map_err(io_error)?;

    info!(
        "Wrote {} molecule file(s) and '{}'.",
        molecule_files.len(),
        path.display()
    );
    Ok(ExportedFiles {
        molecule_files,
        document: path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;
    use crate::core::models::ids::MoleculeId;
    use crate::core::models::molecule::{MolAtom, Molecule};
    use crate::core::models::topology::BondOrder;
    use crate::core::patterns::traits::InferenceResult;
    use crate::engine::signature::Signature;
    use crate::workflows::compare::OrderingOutcome;
    use tempfile::tempdir;

    fn ethane(title: &str) -> Molecule {
        let mut mol = Molecule::new(title);
        for name in ["C1", "C2"] {
            mol.add_atom(MolAtom {
                name: name.to_string(),
                element: Element::C,
                formal_charge: 0,
                aromatic: false,
            });
        }
        mol.add_bond(0, 1, BondOrder::Single);
        mol
    }

    fn export<'m>(molecules: &'m [Molecule]) -> ClusterExport<'m> {
        ClusterExport {
            molecule_ids: vec![MoleculeId::new("a"), MoleculeId::new("b")],
            molecules: molecules.iter().collect(),
            clusters: vec![(
                ParameterType::Bond,
                vec![
                    Cluster {
                        signature: Signature::bond(310.0, 1.526),
                        label: "310.000 1.526".to_string(),
                        groups: vec![vec![vec![0, 1]], vec![]],
                    },
                    Cluster {
                        signature: Signature::bond(340.0, 1.09),
                        label: "340.000 1.090".to_string(),
                        groups: vec![vec![], vec![vec![0, 1], vec![1, 0]]],
                    },
                ],
            )],
        }
    }

    fn settings(dir: &Path) -> ExportSettings {
        ExportSettings {
            output_dir: dir.to_path_buf(),
            run_label: "test".to_string(),
            set_name: "big".to_string(),
            forcefield: "amber99sbildn".to_string(),
            parameter_type: Some(ParameterType::Bond),
        }
    }

    #[test]
    fn document_name_encodes_run_and_molecule_count() {
        let mut s = settings(Path::new("."));
        assert_eq!(s.document_name(2), "test_big_amber99sbildn_bond_2mols.json");
        s.parameter_type = None;
        assert_eq!(s.document_name(5), "test_big_amber99sbildn_all_5mols.json");
    }

    #[test]
    fn annotations_list_groups_or_none() {
        let molecules = [ethane("a"), ethane("b")];
        let export = export(&molecules);

        assert_eq!(
            molecule_annotations(&export, 0),
            vec![
                ("bond_310.000 1.526".to_string(), "0-1".to_string()),
                ("bond_340.000 1.090".to_string(), "None".to_string()),
            ]
        );
        assert_eq!(molecule_annotations(&export, 1)[1].1, "0-1,1-0");
    }

    #[test]
    fn run_writes_molecule_files_and_document() {
        let dir = tempdir().unwrap();
        let molecules = [ethane("a"), ethane("b")];
        let export = export(&molecules);
        let report = ComparisonReport {
            outcomes: vec![OrderingOutcome {
                name: "original".to_string(),
                results: vec![(
                    ParameterType::Bond,
                    InferenceResult::new(false, vec![("310.000 1.526".to_string(), "[#6:1]-[#6:2]".to_string())]),
                )],
            }],
        };

        let files = run(&export, &report, &settings(dir.path())).unwrap();

        assert_eq!(files.molecule_files.len(), 2);
        let sdf = fs::read_to_string(dir.path().join("b.sdf")).unwrap();
        assert!(sdf.contains(">  <bond_340.000 1.090>\n0-1,1-0\n"));

        assert_eq!(
            files.document,
            dir.path().join("test_big_amber99sbildn_bond_2mols.json")
        );
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&files.document).unwrap()).unwrap();
        assert_eq!(json["smiles"][0], "[C:1][C:2]");
        assert_eq!(json["clusters"]["bond"][1][0], "340.000 1.090");
        assert_eq!(json["clusters"]["bond"][1][1][1][1][0], 1);
        assert_eq!(json["smirks_lists"]["original"]["bond"]["checked"], false);
        assert_eq!(json["mol_files"], serde_json::json!(["a.sdf", "b.sdf"]));
        assert_eq!(json["forcefield"], "amber99sbildn");
    }

    #[test]
    fn missing_output_directory_is_created() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("out").join("mols");
        let molecules = [ethane("a"), ethane("b")];
        let paths = write_molecule_files(&export(&molecules), &nested).unwrap();
        assert!(paths.iter().all(|p| p.exists()));
    }
}
