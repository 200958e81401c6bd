use super::signature::Signature;
use super::store::{ParameterStore, ParameterType};
use crate::core::models::ids::MoleculeId;
use crate::core::models::molecule::Molecule;
use crate::core::patterns::traits::{AtomGroup, ClusterRef};
use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;

/// Atom groups sharing one signature, with one group list per exported
/// molecule. Molecules that contribute nothing have an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub signature: Signature,
    pub label: String,
    pub groups: Vec<Vec<AtomGroup>>,
}

impl Cluster {
    pub fn view(&self) -> ClusterRef<'_> {
        ClusterRef {
            label: &self.label,
            groups: &self.groups,
        }
    }

    /// Total atom groups across all molecules.
    pub fn size(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    /// Number of molecules contributing at least one group.
    pub fn molecule_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_empty()).count()
    }
}

// Serialized as `[label, groups per molecule]`.
impl Serialize for Cluster {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.label)?;
        tuple.serialize_element(&self.groups)?;
        tuple.end()
    }
}

/// One row of the cluster statistics table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub parameter_type: ParameterType,
    pub molecules: usize,
    pub clusters: usize,
    /// Contributing-molecule count of every cluster, in cluster order.
    pub molecules_per_cluster: Vec<usize>,
}

/// Snapshot of the store's clusters, aligned with the registered molecules.
#[derive(Debug, Clone)]
pub struct ClusterExport<'s> {
    pub molecule_ids: Vec<MoleculeId>,
    pub molecules: Vec<&'s Molecule>,
    pub clusters: Vec<(ParameterType, Vec<Cluster>)>,
}

impl<'s> ClusterExport<'s> {
    /// Exports `parameter_type`, or every type in export order when `None`.
    pub fn from_store(store: &'s ParameterStore, parameter_type: Option<ParameterType>) -> Self {
        let molecule_ids: Vec<MoleculeId> = store.molecule_ids().cloned().collect();
        let molecules: Vec<&Molecule> = store.molecules().collect();
        let types: Vec<ParameterType> = match parameter_type {
            Some(t) => vec![t],
            None => ParameterType::ALL.to_vec(),
        };

        let clusters = types
            .into_iter()
            .map(|t| {
                let clusters = store
                    .bucket(t)
                    .iter()
                    .map(|(signature, entry)| Cluster {
                        signature: signature.clone(),
                        label: signature.to_string(),
                        groups: molecule_ids
                            .iter()
                            .map(|id| entry.groups_for(id).to_vec())
                            .collect(),
                    })
                    .collect();
                (t, clusters)
            })
            .collect();

        Self {
            molecule_ids,
            molecules,
            clusters,
        }
    }

    pub fn clusters_for(&self, parameter_type: ParameterType) -> Option<&[Cluster]> {
        self.clusters
            .iter()
            .find(|(t, _)| *t == parameter_type)
            .map(|(_, c)| c.as_slice())
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = ParameterType> + '_ {
        self.clusters.iter().map(|(t, _)| *t)
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.clusters
            .iter()
            .map(|(parameter_type, clusters)| SummaryRow {
                parameter_type: *parameter_type,
                molecules: self.molecule_ids.len(),
                clusters: clusters.len(),
                molecules_per_cluster: clusters.iter().map(Cluster::molecule_count).collect(),
            })
            .collect()
    }

    /// Renders the statistics table printed by the verbose commands.
    pub fn summary_table(&self) -> String {
        let rule = "=".repeat(80);
        let mut out = String::new();
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<20} {:<10} {:<10} {}\n",
            "parameter", "mols", "clusters", "mols in clusters"
        ));
        out.push_str(&rule);
        out.push('\n');
        for row in self.summary_rows() {
            let per_cluster = row
                .molecules_per_cluster
                .iter()
                .map(usize::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(
                "{:<20} {:<10} {:<10} {}\n",
                row.parameter_type.name(),
                row.molecules,
                row.clusters,
                per_cluster
            ));
        }
        out.push_str(&rule);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, Element};
    use crate::core::models::residue::Terminus;
    use crate::core::models::system::ParameterizedSystem;
    use crate::core::models::topology::BondTerm;

    fn diatomic(title: &str, k: f64, length: f64) -> ParameterizedSystem {
        let mut system = ParameterizedSystem::new(title);
        let r = system.add_residue("DIA", Terminus::Interior);
        for name in ["A", "B"] {
            let mut atom = Atom::new(name, "CT", Element::C, r);
            atom.charge = 0.1;
            atom.epsilon = 0.1094;
            atom.rmin_half = 1.908;
            system.add_atom(atom);
        }
        system.bonds.push(BondTerm {
            atoms: [0, 1],
            k,
            length,
        });
        system
    }

    fn store() -> ParameterStore {
        let mut store = ParameterStore::new();
        for (id, k) in [("m1", 310.0), ("m2", 340.0)] {
            store
                .add_molecule(MoleculeId::new(id), diatomic(id, k, 1.5), Molecule::new(id))
                .unwrap();
        }
        store
    }

    #[test]
    fn exports_every_type_in_export_order() {
        let store = store();
        let export = ClusterExport::from_store(&store, None);
        let types: Vec<ParameterType> = export.parameter_types().collect();
        assert_eq!(types, ParameterType::ALL.to_vec());
        assert_eq!(export.molecule_ids, vec![MoleculeId::new("m1"), MoleculeId::new("m2")]);
        assert_eq!(export.molecules.len(), 2);
    }

    #[test]
    fn clusters_have_one_group_list_per_molecule() {
        let store = store();
        let export = ClusterExport::from_store(&store, Some(ParameterType::Bond));
        let bonds = export.clusters_for(ParameterType::Bond).unwrap();

        assert_eq!(bonds.len(), 2);
        assert_eq!(bonds[0].label, "310.000 1.500");
        assert_eq!(bonds[0].groups, vec![vec![vec![0, 1]], vec![]]);
        assert_eq!(bonds[1].groups, vec![vec![], vec![vec![0, 1]]]);
        assert_eq!(bonds[1].molecule_count(), 1);
        assert!(export.clusters_for(ParameterType::Angle).is_none());
    }

    #[test]
    fn shared_parameters_form_one_cluster() {
        let store = store();
        let export = ClusterExport::from_store(&store, Some(ParameterType::Lj));
        let lj = export.clusters_for(ParameterType::Lj).unwrap();
        assert_eq!(lj.len(), 1);
        assert_eq!(lj[0].size(), 4);
        assert_eq!(lj[0].molecule_count(), 2);
    }

    #[test]
    fn summary_rows_count_molecules_per_cluster() {
        let store = store();
        let export = ClusterExport::from_store(&store, None);
        let rows = export.summary_rows();
        let bond = rows.iter().find(|r| r.parameter_type == ParameterType::Bond).unwrap();
        assert_eq!(bond.molecules, 2);
        assert_eq!(bond.clusters, 2);
        assert_eq!(bond.molecules_per_cluster, vec![1, 1]);

        let table = export.summary_table();
        assert!(table.contains("mols in clusters"));
        assert!(table.lines().any(|l| l.starts_with("bond ") && l.ends_with("1 1")));
    }

    #[test]
    fn cluster_serializes_as_label_and_groups() {
        let store = store();
        let export = ClusterExport::from_store(&store, Some(ParameterType::Bond));
        let json = serde_json::to_string(&export.clusters_for(ParameterType::Bond).unwrap()[0]).unwrap();
        assert_eq!(json, r#"["310.000 1.500",[[[0,1]],[]]]"#);
    }

    #[test]
    fn empty_store_exports_empty_cluster_lists() {
        let store = ParameterStore::new();
        let export = ClusterExport::from_store(&store, None);
        assert!(export.molecule_ids.is_empty());
        assert!(export.clusters.iter().all(|(_, c)| c.is_empty()));
    }
}
