use super::bucket::ParameterBucket;
use super::signature::Signature;
use crate::core::models::ids::MoleculeId;
use crate::core::models::molecule::Molecule;
use crate::core::models::residue::Terminus;
use crate::core::models::system::ParameterizedSystem;
use crate::core::models::units::Unit;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// The six force-field term families clustered independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterType {
    Lj,
    Charge,
    ProperTorsion,
    ImproperTorsion,
    Angle,
    Bond,
}

impl ParameterType {
    /// Every type, in export order.
    pub const ALL: [ParameterType; 6] = [
        ParameterType::Lj,
        ParameterType::Charge,
        ParameterType::ProperTorsion,
        ParameterType::ImproperTorsion,
        ParameterType::Angle,
        ParameterType::Bond,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParameterType::Lj => "lj",
            ParameterType::Charge => "charge",
            ParameterType::ProperTorsion => "proper_torsion",
            ParameterType::ImproperTorsion => "improper_torsion",
            ParameterType::Angle => "angle",
            ParameterType::Bond => "bond",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter type '{0}' (expected lj, charge, proper_torsion, improper_torsion, angle or bond)")]
pub struct ParseParameterTypeError(pub String);

impl FromStr for ParameterType {
    type Err = ParseParameterTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        ParameterType::ALL
            .into_iter()
            .find(|t| t.name() == lowered)
            .ok_or_else(|| ParseParameterTypeError(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Molecule '{0}' is already registered")]
    DuplicateMolecule(MoleculeId),
    #[error("Molecule '{0}' must be registered before its parameters are ingested")]
    UnregisteredMolecule(MoleculeId),
    #[error("Parameters of molecule '{0}' have already been ingested")]
    AlreadyIngested(MoleculeId),
    #[error("A term of molecule '{molecule}' refers to atom {index}, which does not exist")]
    DanglingAtom { molecule: MoleculeId, index: usize },
    #[error("Atom {atom} of molecule '{molecule}' belongs to no residue")]
    MissingResidue { molecule: MoleculeId, atom: usize },
}

/// Terminus tag of every atom, after checking that every term index names an
/// existing atom. Nothing is bucketed for a system that fails here.
fn check_indices(
    system: &ParameterizedSystem,
    molecule_id: &MoleculeId,
) -> Result<Vec<Terminus>, StoreError> {
    let termini = (0..system.atom_count())
        .map(|atom| {
            system
                .terminus_of(atom)
                .ok_or_else(|| StoreError::MissingResidue {
                    molecule: molecule_id.clone(),
                    atom,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let term_atoms = system
        .bonds
        .iter()
        .flat_map(|b| b.atoms)
        .chain(system.angles.iter().flat_map(|a| a.atoms))
        .chain(system.dihedrals.iter().flat_map(|d| d.atoms));
    for index in term_atoms {
        if index >= system.atom_count() {
            return Err(StoreError::DanglingAtom {
                molecule: molecule_id.clone(),
                index,
            });
        }
    }
    Ok(termini)
}

/// Per-molecule record: both views of the molecule, fixed once registered.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub system: ParameterizedSystem,
    pub molecule: Molecule,
    ingested: bool,
}

impl RegistryEntry {
    pub fn is_ingested(&self) -> bool {
        self.ingested
    }
}

#[derive(Debug, Clone, Default)]
struct Buckets {
    lj: ParameterBucket,
    charge: ParameterBucket,
    proper: ParameterBucket,
    improper: ParameterBucket,
    angle: ParameterBucket,
    bond: ParameterBucket,
}

impl Buckets {
    fn get(&self, parameter_type: ParameterType) -> &ParameterBucket {
        match parameter_type {
            ParameterType::Lj => &self.lj,
            ParameterType::Charge => &self.charge,
            ParameterType::ProperTorsion => &self.proper,
            ParameterType::ImproperTorsion => &self.improper,
            ParameterType::Angle => &self.angle,
            ParameterType::Bond => &self.bond,
        }
    }

    fn add_nonbonded(&mut self, system: &ParameterizedSystem, termini: &[Terminus], id: &MoleculeId) {
        for ((index, atom), &terminus) in system.atoms().iter().enumerate().zip(termini) {
            let charge = Signature::charge(atom.charge, terminus);
            self.charge
                .add_parameter_values(charge.clone(), &[atom.charge], &[Unit::ElementaryCharge]);
            self.charge.add(charge, id, vec![index]);

            let vdw = Signature::vdw(atom.epsilon, atom.rmin_half);
            self.lj.add_parameter_values(
                vdw.clone(),
                &[atom.epsilon, atom.rmin_half],
                &[Unit::KcalPerMol, Unit::Angstrom],
            );
            self.lj.add(vdw, id, vec![index]);
        }
    }

    fn add_bonds(&mut self, system: &ParameterizedSystem, id: &MoleculeId) {
        for bond in &system.bonds {
            let signature = Signature::bond(bond.k, bond.length);
            self.bond.add_parameter_values(
                signature.clone(),
                &[bond.k, bond.length],
                &[Unit::KcalPerMolAngstromSq, Unit::Angstrom],
            );
            self.bond.add(signature, id, bond.atoms.to_vec());
        }
    }

    fn add_angles(&mut self, system: &ParameterizedSystem, id: &MoleculeId) {
        for angle in &system.angles {
            let signature = Signature::angle(angle.k, angle.theta);
            self.angle.add_parameter_values(
                signature.clone(),
                &[angle.k, angle.theta],
                &[Unit::KcalPerMolRadianSq, Unit::Degree],
            );
            self.angle.add(signature, id, angle.atoms.to_vec());
        }
    }

    fn add_torsions(&mut self, system: &ParameterizedSystem, id: &MoleculeId) {
        let torsion_units = [Unit::KcalPerMol, Unit::Degree, Unit::Dimensionless];
        let mut propers: Vec<([usize; 4], Vec<(f64, f64, f64)>)> = Vec::new();
        let mut proper_index: HashMap<[usize; 4], usize> = HashMap::new();

        for dihedral in &system.dihedrals {
            if dihedral.improper {
                let center = dihedral.central_atom();
                // in range: checked by `check_indices`
                let atomic_number = system.atoms()[center].element.atomic_number();
                let signature = Signature::improper(
                    dihedral.k,
                    dihedral.phase,
                    dihedral.periodicity,
                    atomic_number,
                );
                self.improper.add_parameter_values(
                    signature.clone(),
                    &[dihedral.k, dihedral.phase, dihedral.periodicity],
                    &torsion_units,
                );

                let mut sides = [dihedral.atoms[0], dihedral.atoms[1], dihedral.atoms[3]];
                sides.sort_unstable();
                self.improper
                    .add(signature, id, vec![sides[0], center, sides[1], sides[2]]);
            } else {
                let term = (dihedral.k, dihedral.phase, dihedral.periodicity);
                match proper_index.get(&dihedral.atoms) {
                    Some(&i) => propers[i].1.push(term),
                    None => {
                        proper_index.insert(dihedral.atoms, propers.len());
                        propers.push((dihedral.atoms, vec![term]));
                    }
                }
            }
        }

        // Terms on the same quadruple form one signature.
        for (atoms, terms) in propers {
            let signature = Signature::proper(terms.iter().copied());
            let values: Vec<f64> = terms.iter().flat_map(|&(k, p, n)| [k, p, n]).collect();
            let units: Vec<Unit> = terms.iter().flat_map(|_| torsion_units).collect();
            self.proper
                .add_parameter_values(signature.clone(), &values, &units);
            self.proper.add(signature, id, atoms.to_vec());
        }
    }
}

/// Owns the molecule registry and the six parameter buckets.
///
/// Molecules are registered and ingested one at a time in acquisition order;
/// after that the store is only read.
#[derive(Debug, Clone, Default)]
pub struct ParameterStore {
    registry: Vec<(MoleculeId, RegistryEntry)>,
    index: HashMap<MoleculeId, usize>,
    buckets: Buckets,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        molecule_id: MoleculeId,
        system: ParameterizedSystem,
        molecule: Molecule,
    ) -> Result<(), StoreError> {
        if self.index.contains_key(&molecule_id) {
            return Err(StoreError::DuplicateMolecule(molecule_id));
        }
        self.index.insert(molecule_id.clone(), self.registry.len());
        self.registry.push((
            molecule_id,
            RegistryEntry {
                system,
                molecule,
                ingested: false,
            },
        ));
        Ok(())
    }

    /// Fans every term of `system` out into the buckets under `molecule_id`.
    ///
    /// Atom indices come from `system`; the registered entry is what exports
    /// and pattern inference read, so callers pass the system they registered.
    pub fn ingest(
        &mut self,
        system: &ParameterizedSystem,
        molecule_id: &MoleculeId,
    ) -> Result<(), StoreError> {
        let position = *self
            .index
            .get(molecule_id)
            .ok_or_else(|| StoreError::UnregisteredMolecule(molecule_id.clone()))?;
        let entry = &mut self.registry[position].1;
        if entry.ingested {
            return Err(StoreError::AlreadyIngested(molecule_id.clone()));
        }
        let termini = check_indices(system, molecule_id)?;
        entry.ingested = true;

        self.buckets.add_nonbonded(system, &termini, molecule_id);
        self.buckets.add_bonds(system, molecule_id);
        self.buckets.add_angles(system, molecule_id);
        self.buckets.add_torsions(system, molecule_id);

        debug!(
            molecule = %molecule_id,
            atoms = system.atom_count(),
            bonds = system.bonds.len(),
            angles = system.angles.len(),
            dihedrals = system.dihedrals.len(),
            "Ingested molecule parameters."
        );
        Ok(())
    }

    /// Registers a molecule and ingests the registered system.
    pub fn add_molecule(
        &mut self,
        molecule_id: MoleculeId,
        system: ParameterizedSystem,
        molecule: Molecule,
    ) -> Result<(), StoreError> {
        if self.index.contains_key(&molecule_id) {
            return Err(StoreError::DuplicateMolecule(molecule_id));
        }
        let termini = check_indices(&system, &molecule_id)?;
        self.register(molecule_id.clone(), system, molecule)?;
        let position = self.registry.len() - 1;
        let (registry, buckets) = (&mut self.registry, &mut self.buckets);
        let entry = &mut registry[position].1;
        entry.ingested = true;

        buckets.add_nonbonded(&entry.system, &termini, &molecule_id);
        buckets.add_bonds(&entry.system, &molecule_id);
        buckets.add_angles(&entry.system, &molecule_id);
        buckets.add_torsions(&entry.system, &molecule_id);

        debug!(
            molecule = %molecule_id,
            atoms = entry.system.atom_count(),
            "Registered and ingested molecule."
        );
        Ok(())
    }

    /// Molecule ids in registration order.
    pub fn molecule_ids(&self) -> impl Iterator<Item = &MoleculeId> {
        self.registry.iter().map(|(id, _)| id)
    }

    /// Chemical structures in registration order.
    pub fn molecules(&self) -> impl Iterator<Item = &Molecule> {
        self.registry.iter().map(|(_, e)| &e.molecule)
    }

    pub fn entry(&self, molecule_id: &MoleculeId) -> Option<&RegistryEntry> {
        self.index.get(molecule_id).map(|&i| &self.registry[i].1)
    }

    pub fn bucket(&self, parameter_type: ParameterType) -> &ParameterBucket {
        self.buckets.get(parameter_type)
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::{Atom, Element};
    use crate::core::models::residue::Terminus;
    use crate::core::models::topology::{AngleTerm, BondTerm, DihedralTerm};

    fn dihedral(atoms: [usize; 4], k: f64, phase: f64, periodicity: f64, improper: bool) -> DihedralTerm {
        DihedralTerm {
            atoms,
            k,
            phase,
            periodicity,
            improper,
        }
    }

    /// Five atoms over an N-terminal and a C-terminal residue, with a
    /// carbonyl-style improper centred on atom 2.
    fn sample_system() -> ParameterizedSystem {
        let mut system = ParameterizedSystem::new("sample");
        let r0 = system.add_residue("NGLY", Terminus::NTerminal);
        let r1 = system.add_residue("CGLY", Terminus::CTerminal);
        let specs = [
            ("N", Element::N, r0, -0.4157),
            ("CA", Element::C, r0, 0.0337),
            ("C", Element::C, r0, 0.5973),
            ("O", Element::O, r0, -0.5679),
            ("N", Element::N, r1, -0.4157),
        ];
        for (name, element, residue, charge) in specs {
            let mut atom = Atom::new(name, name, element, residue);
            atom.charge = charge;
            atom.epsilon = 0.17;
            atom.rmin_half = 1.824;
            system.add_atom(atom);
        }
        system.bonds = vec![
            BondTerm { atoms: [0, 1], k: 337.0, length: 1.449 },
            BondTerm { atoms: [1, 2], k: 317.0, length: 1.522 },
            BondTerm { atoms: [2, 3], k: 570.0, length: 1.229 },
            BondTerm { atoms: [2, 4], k: 490.0, length: 1.335 },
        ];
        system.angles = vec![AngleTerm { atoms: [0, 1, 2], k: 63.0, theta: 110.1 }];
        system.dihedrals = vec![
            dihedral([0, 1, 2, 3], 0.8, 0.0, 1.0, false),
            dihedral([4, 3, 2, 1], 10.5, 180.0, 2.0, true),
            dihedral([0, 1, 2, 3], 0.08, 180.0, 3.0, false),
            dihedral([0, 1, 2, 4], 0.8, 0.0, 1.0, false),
        ];
        system
    }

    fn store_with(id: &str, system: ParameterizedSystem) -> ParameterStore {
        let mut store = ParameterStore::new();
        store
            .add_molecule(MoleculeId::new(id), system, Molecule::new(id))
            .unwrap();
        store
    }

    #[test]
    fn parameter_type_names_round_trip_case_insensitively() {
        for t in ParameterType::ALL {
            assert_eq!(t.name().parse::<ParameterType>().unwrap(), t);
        }
        assert_eq!("Proper_Torsion".parse::<ParameterType>().unwrap(), ParameterType::ProperTorsion);
        assert!("dihedral".parse::<ParameterType>().is_err());
    }

    #[test]
    fn ingest_requires_registration() {
        let mut store = ParameterStore::new();
        let result = store.ingest(&sample_system(), &MoleculeId::new("ghost"));
        assert_eq!(
            result,
            Err(StoreError::UnregisteredMolecule(MoleculeId::new("ghost")))
        );
        assert!(store.bucket(ParameterType::Charge).is_empty());
    }

    #[test]
    fn duplicate_registration_and_double_ingest_are_rejected() {
        let mut store = store_with("m", sample_system());
        let dup = store.register(MoleculeId::new("m"), sample_system(), Molecule::new("m"));
        assert_eq!(dup, Err(StoreError::DuplicateMolecule(MoleculeId::new("m"))));

        let again = store.ingest(&sample_system(), &MoleculeId::new("m"));
        assert_eq!(again, Err(StoreError::AlreadyIngested(MoleculeId::new("m"))));
    }

    #[test]
    fn register_then_ingest_matches_add_molecule() {
        let mut store = ParameterStore::new();
        let system = sample_system();
        store
            .register(MoleculeId::new("m"), system.clone(), Molecule::new("m"))
            .unwrap();
        store.ingest(&system, &MoleculeId::new("m")).unwrap();
        let combined = store_with("m", sample_system());

        for t in ParameterType::ALL {
            let a: Vec<String> = store.bucket(t).iter().map(|(s, _)| s.to_string()).collect();
            let b: Vec<String> = combined.bucket(t).iter().map(|(s, _)| s.to_string()).collect();
            assert_eq!(a, b, "{t}");
        }
        assert!(store.entry(&MoleculeId::new("m")).unwrap().is_ingested());
    }

    #[test]
    fn charges_are_keyed_by_value_and_terminus() {
        let store = store_with("m", sample_system());
        let charges = store.bucket(ParameterType::Charge);
        let id = MoleculeId::new("m");

        let n_term = charges
            .get(&Signature::charge(-0.4157, Terminus::NTerminal))
            .unwrap();
        let c_term = charges
            .get(&Signature::charge(-0.4157, Terminus::CTerminal))
            .unwrap();
        assert_eq!(n_term.groups_for(&id), &[vec![0]]);
        assert_eq!(c_term.groups_for(&id), &[vec![4]]);
        assert_eq!(store.bucket(ParameterType::Lj).len(), 1);
    }

    #[test]
    fn improper_groups_put_center_second_and_sort_the_rest() {
        let store = store_with("m", sample_system());
        let impropers = store.bucket(ParameterType::ImproperTorsion);
        let (signature, entry) = impropers.iter().next().unwrap();

        assert_eq!(signature.to_string(), "10.500 180.000 2.000 6");
        assert_eq!(entry.groups_for(&MoleculeId::new("m")), &[vec![1, 2, 3, 4]]);
    }

    #[test]
    fn improper_groups_ignore_declaration_order_of_side_atoms() {
        let orders = [[4, 3, 2, 1], [1, 4, 2, 3], [3, 1, 2, 4], [1, 3, 2, 4]];
        for atoms in orders {
            let mut system = sample_system();
            system.dihedrals = vec![dihedral(atoms, 10.5, 180.0, 2.0, true)];
            let store = store_with("m", system);
            let (_, entry) = store.bucket(ParameterType::ImproperTorsion).iter().next().unwrap();
            assert_eq!(entry.groups_for(&MoleculeId::new("m")), &[vec![1, 2, 3, 4]]);
        }
    }

    #[test]
    fn proper_terms_on_one_quadruple_merge_into_one_signature() {
        let store = store_with("m", sample_system());
        let propers = store.bucket(ParameterType::ProperTorsion);
        let labels: Vec<String> = propers.iter().map(|(s, _)| s.to_string()).collect();

        assert_eq!(
            labels,
            vec![
                "0.800 0.000 1.000 0.080 180.000 3.000",
                "0.800 0.000 1.000",
            ]
        );
        let (_, merged) = propers.iter().next().unwrap();
        assert_eq!(merged.groups_for(&MoleculeId::new("m")), &[vec![0, 1, 2, 3]]);
        assert_eq!(merged.units().map(|u| u.len()), Some(6));
    }

    #[test]
    fn every_group_recomputes_to_its_signature() {
        let system = sample_system();
        let store = store_with("m", system.clone());
        let id = MoleculeId::new("m");

        for (signature, entry) in store.bucket(ParameterType::Charge).iter() {
            for group in entry.groups_for(&id) {
                let atom = system.atom(group[0]).unwrap();
                let terminus = system.terminus_of(group[0]).unwrap();
                assert_eq!(&Signature::charge(atom.charge, terminus), signature);
            }
        }
        for (signature, entry) in store.bucket(ParameterType::Bond).iter() {
            for group in entry.groups_for(&id) {
                let bond = system.bonds.iter().find(|b| b.atoms.as_slice() == group.as_slice()).unwrap();
                assert_eq!(&Signature::bond(bond.k, bond.length), signature);
            }
        }
        for (signature, entry) in store.bucket(ParameterType::Angle).iter() {
            for group in entry.groups_for(&id) {
                let angle = system.angles.iter().find(|a| a.atoms.as_slice() == group.as_slice()).unwrap();
                assert_eq!(&Signature::angle(angle.k, angle.theta), signature);
            }
        }
        for (signature, entry) in store.bucket(ParameterType::ProperTorsion).iter() {
            for group in entry.groups_for(&id) {
                let terms = system
                    .dihedrals
                    .iter()
                    .filter(|d| !d.improper && d.atoms.as_slice() == group.as_slice())
                    .map(|d| (d.k, d.phase, d.periodicity));
                assert_eq!(&Signature::proper(terms), signature);
            }
        }
    }

    #[test]
    fn dangling_term_index_fails_without_touching_buckets() {
        let mut system = sample_system();
        system.dihedrals.push(dihedral([9, 3, 2, 1], 10.5, 180.0, 2.0, true));

        let mut store = ParameterStore::new();
        let err = store
            .add_molecule(MoleculeId::new("m"), system.clone(), Molecule::new("m"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DanglingAtom {
                molecule: MoleculeId::new("m"),
                index: 9
            }
        );
        assert!(store.is_empty());
        assert!(store.bucket(ParameterType::Charge).is_empty());

        store
            .register(MoleculeId::new("m"), system.clone(), Molecule::new("m"))
            .unwrap();
        assert!(store.ingest(&system, &MoleculeId::new("m")).is_err());
        assert!(!store.entry(&MoleculeId::new("m")).unwrap().is_ingested());
        assert!(store.bucket(ParameterType::ImproperTorsion).is_empty());
    }

    #[test]
    fn atom_outside_any_residue_is_rejected() {
        let mut system = sample_system();
        system.atom_mut(3).unwrap().residue = 7;

        let mut store = ParameterStore::new();
        let err = store
            .add_molecule(MoleculeId::new("m"), system, Molecule::new("m"))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingResidue {
                molecule: MoleculeId::new("m"),
                atom: 3
            }
        );
        assert!(store.bucket(ParameterType::Lj).is_empty());
    }

    #[test]
    fn registry_keeps_registration_order() {
        let mut store = ParameterStore::new();
        for id in ["b", "a", "c"] {
            store
                .add_molecule(MoleculeId::new(id), sample_system(), Molecule::new(id))
                .unwrap();
        }
        let ids: Vec<&str> = store.molecule_ids().map(|m| m.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        let titles: Vec<&str> = store.molecules().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["b", "a", "c"]);
        assert_eq!(store.len(), 3);
    }
}
