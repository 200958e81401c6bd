use super::atom::Atom;
use super::residue::{Residue, Terminus};
use super::topology::{AngleTerm, BondTerm, DihedralTerm};

/// A molecule with every force-field term assigned.
///
/// This is the structural view the parameter store ingests. Atom indices in
/// the term lists refer to positions in [`ParameterizedSystem::atoms`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterizedSystem {
    pub title: String,
    atoms: Vec<Atom>,
    residues: Vec<Residue>,
    pub bonds: Vec<BondTerm>,
    pub angles: Vec<AngleTerm>,
    pub dihedrals: Vec<DihedralTerm>,
}

impl ParameterizedSystem {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn add_residue(&mut self, name: &str, terminus: Terminus) -> usize {
        let index = self.residues.len();
        self.residues.push(Residue::new(name, index, terminus));
        index
    }

    /// Appends an atom to the residue it names and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if `atom.residue` does not refer to a residue added earlier.
    pub fn add_atom(&mut self, atom: Atom) -> usize {
        let index = self.atoms.len();
        self.residues[atom.residue].add_atom(index);
        self.atoms.push(atom);
        index
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn atom_mut(&mut self, index: usize) -> Option<&mut Atom> {
        self.atoms.get_mut(index)
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    /// Terminus tag of the residue owning `atom_index`.
    pub fn terminus_of(&self, atom_index: usize) -> Option<Terminus> {
        let atom = self.atoms.get(atom_index)?;
        self.residues.get(atom.residue).map(|r| r.terminus)
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}
