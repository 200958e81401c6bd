use super::params::Forcefield;
use crate::core::io::fasta::Sequence;
use crate::core::models::{
    atom::Atom,
    molecule::{MolAtom, Molecule},
    residue::Terminus,
    system::ParameterizedSystem,
    topology::{AngleTerm, BondOrder, BondTerm, DihedralTerm},
};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterizationError {
    #[error("Sequence '{0}' contains no residues")]
    EmptySequence(String),
    #[error("No residue template for '{residue_name}' at sequence position {position}")]
    MissingTemplate {
        residue_name: String,
        position: usize,
    },
    #[error("Residue template '{residue_name}' has no {link} atom to form a peptide link")]
    MissingLinkAtom {
        residue_name: String,
        link: &'static str,
    },
    #[error("Undefined atom type '{atom_type}' for atom '{atom_name}'")]
    MissingAtomType {
        atom_type: String,
        atom_name: String,
    },
    #[error("No bond parameters for atom types {types:?}")]
    MissingBondParams { types: [String; 2] },
    #[error("No angle parameters for atom types {types:?}")]
    MissingAngleParams { types: [String; 3] },
    #[error("No proper torsion parameters for atom types {types:?}")]
    MissingProperParams { types: [String; 4] },
}

/// Builds the force-field view and the chemical-structure view of a sequence.
///
/// Both views must use the same atom indices.
pub trait SystemBuilder {
    fn build(
        &self,
        sequence: &Sequence,
    ) -> Result<(ParameterizedSystem, Molecule), ParameterizationError>;
}

/// Assigns parameters from residue templates and atom-typed term tables.
pub struct TemplateParameterizer<'a> {
    forcefield: &'a Forcefield,
}

impl<'a> TemplateParameterizer<'a> {
    pub fn new(forcefield: &'a Forcefield) -> Self {
        Self { forcefield }
    }

    fn place_residues(
        &self,
        sequence: &Sequence,
        system: &mut ParameterizedSystem,
        molecule: &mut Molecule,
    ) -> Result<Vec<(usize, usize, BondOrder)>, ParameterizationError> {
        let count = sequence.residues.len();
        let mut bonds = Vec::new();
        let mut previous_tail: Option<usize> = None;

        for (position, amino_acid) in sequence.residues.iter().enumerate() {
            let terminus = Terminus::from_links(position > 0, position + 1 < count);
            let base_name = amino_acid.to_three_letter();
            let (template_name, template) = self
                .forcefield
                .residues
                .resolve(base_name, terminus)
                .ok_or_else(|| ParameterizationError::MissingTemplate {
                    residue_name: base_name.to_string(),
                    position,
                })?;

            let residue_index = system.add_residue(&template_name, terminus);
            let offset = system.atom_count();

            for template_atom in &template.atoms {
                let params = self
                    .forcefield
                    .atom_type(&template_atom.atom_type)
                    .ok_or_else(|| ParameterizationError::MissingAtomType {
                        atom_type: template_atom.atom_type.clone(),
                        atom_name: template_atom.name.clone(),
                    })?;
                let mut atom = Atom::new(
                    &template_atom.name,
                    &template_atom.atom_type,
                    params.element,
                    residue_index,
                );
                atom.charge = template_atom.charge;
                atom.epsilon = params.epsilon;
                atom.rmin_half = params.rmin_half;
                system.add_atom(atom);
                molecule.add_atom(MolAtom {
                    name: template_atom.name.clone(),
                    element: params.element,
                    formal_charge: template_atom.formal_charge,
                    aromatic: false,
                });
            }

            let global = |name: &str| template.atom_index(name).map(|i| i + offset);
            for bond in template.parsed_bonds() {
                if let (Some(a), Some(b)) = (global(&bond.atom1), global(&bond.atom2)) {
                    bonds.push((a, b, bond.order));
                }
            }

            if let Some(tail) = previous_tail {
                let head = template
                    .head
                    .as_deref()
                    .and_then(global)
                    .ok_or_else(|| ParameterizationError::MissingLinkAtom {
                        residue_name: template_name.clone(),
                        link: "head",
                    })?;
                bonds.push((tail, head, BondOrder::Single));
            }

            previous_tail = if position + 1 < count {
                let tail = template
                    .tail
                    .as_deref()
                    .and_then(global)
                    .ok_or_else(|| ParameterizationError::MissingLinkAtom {
                        residue_name: template_name.clone(),
                        link: "tail",
                    })?;
                Some(tail)
            } else {
                None
            };
        }

        Ok(bonds)
    }

    fn atom_type<'s>(system: &'s ParameterizedSystem, index: usize) -> &'s str {
        system
            .atom(index)
            .map(|a| a.atom_type.as_str())
            .unwrap_or_default()
    }

    fn sorted_neighbors(molecule: &Molecule, index: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = molecule.neighbors(index).iter().map(|(n, _)| *n).collect();
        neighbors.sort_unstable();
        neighbors
    }

    fn assign_bonds(
        &self,
        bonds: &[(usize, usize, BondOrder)],
        system: &mut ParameterizedSystem,
        molecule: &mut Molecule,
    ) -> Result<(), ParameterizationError> {
        for &(a, b, order) in bonds {
            molecule.add_bond(a, b, order);
            let (ta, tb) = (Self::atom_type(system, a), Self::atom_type(system, b));
            let param = self.forcefield.bond(ta, tb).ok_or_else(|| {
                ParameterizationError::MissingBondParams {
                    types: [ta.to_string(), tb.to_string()],
                }
            })?;
            system.bonds.push(BondTerm {
                atoms: [a, b],
                k: param.k,
                length: param.length,
            });
        }
        Ok(())
    }

    fn assign_angles(
        &self,
        system: &mut ParameterizedSystem,
        molecule: &Molecule,
    ) -> Result<(), ParameterizationError> {
        for center in 0..molecule.atom_count() {
            let neighbors = Self::sorted_neighbors(molecule, center);
            for (i, &first) in neighbors.iter().enumerate() {
                for &last in &neighbors[i + 1..] {
                    let types = [
                        Self::atom_type(system, first),
                        Self::atom_type(system, center),
                        Self::atom_type(system, last),
                    ];
                    let param = self
                        .forcefield
                        .angle(types[0], types[1], types[2])
                        .ok_or_else(|| ParameterizationError::MissingAngleParams {
                            types: types.map(str::to_string),
                        })?;
                    system.angles.push(AngleTerm {
                        atoms: [first, center, last],
                        k: param.k,
                        theta: param.theta,
                    });
                }
            }
        }
        Ok(())
    }

    fn assign_propers(
        &self,
        bonds: &[(usize, usize, BondOrder)],
        system: &mut ParameterizedSystem,
        molecule: &Molecule,
    ) -> Result<(), ParameterizationError> {
        for &(b, c, _) in bonds {
            for a in Self::sorted_neighbors(molecule, b) {
                if a == c {
                    continue;
                }
                for d in Self::sorted_neighbors(molecule, c) {
                    if d == b || d == a {
                        continue;
                    }
                    let types = [a, b, c, d].map(|i| Self::atom_type(system, i));
                    let param = self.forcefield.proper(types).ok_or_else(|| {
                        ParameterizationError::MissingProperParams {
                            types: types.map(str::to_string),
                        }
                    })?;
                    let terms: Vec<DihedralTerm> = param
                        .terms
                        .iter()
                        .map(|term| DihedralTerm {
                            atoms: [a, b, c, d],
                            k: term.k,
                            phase: term.phase,
                            periodicity: term.periodicity,
                            improper: false,
                        })
                        .collect();
                    system.dihedrals.extend(terms);
                }
            }
        }
        Ok(())
    }

    fn assign_impropers(&self, system: &mut ParameterizedSystem, molecule: &Molecule) {
        for center in 0..molecule.atom_count() {
            let neighbors = Self::sorted_neighbors(molecule, center);
            let [n0, n1, n2] = neighbors[..] else {
                continue;
            };
            let neighbor_types = [n0, n1, n2].map(|i| Self::atom_type(system, i));
            let center_type = Self::atom_type(system, center);
            let Some((param, perm)) = self.forcefield.improper(center_type, neighbor_types) else {
                continue;
            };
            let atoms = [neighbors[perm[0]], neighbors[perm[1]], center, neighbors[perm[2]]];
            let terms: Vec<DihedralTerm> = param
                .terms
                .iter()
                .map(|term| DihedralTerm {
                    atoms,
                    k: term.k,
                    phase: term.phase,
                    periodicity: term.periodicity,
                    improper: true,
                })
                .collect();
            system.dihedrals.extend(terms);
        }
    }
}

impl SystemBuilder for TemplateParameterizer<'_> {
    fn build(
        &self,
        sequence: &Sequence,
    ) -> Result<(ParameterizedSystem, Molecule), ParameterizationError> {
        let title = sequence.id.as_str();
        if sequence.residues.is_empty() {
            return Err(ParameterizationError::EmptySequence(title.to_string()));
        }

        let mut system = ParameterizedSystem::new(title);
        let mut molecule = Molecule::new(title);

        // Pass 1: Instantiate residue templates and collect connectivity.
        let bonds = self.place_residues(sequence, &mut system, &mut molecule)?;

        // Pass 2: Bonded terms derived from the connectivity graph.
        self.assign_bonds(&bonds, &mut system, &mut molecule)?;
        self.assign_angles(&mut system, &molecule)?;
        self.assign_propers(&bonds, &mut system, &molecule)?;
        self.assign_impropers(&mut system, &molecule);

        debug!(
            molecule = title,
            atoms = system.atom_count(),
            bonds = system.bonds.len(),
            angles = system.angles.len(),
            dihedrals = system.dihedrals.len(),
            "Parameterized sequence."
        );
        Ok((system, molecule))
    }
}
