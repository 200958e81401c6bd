use super::atom::Element;
use super::topology::BondOrder;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MolAtom {
    pub name: String,
    pub element: Element,
    pub formal_charge: i8,
    pub aromatic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MolBond {
    pub a: usize,
    pub b: usize,
    pub order: BondOrder,
}

/// Chemical-structure graph of one molecule with explicit hydrogens.
///
/// Atom indices match the parameterized system built from the same sequence,
/// so atom groups taken from parameter clusters address this graph directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Molecule {
    pub title: String,
    atoms: Vec<MolAtom>,
    bonds: Vec<MolBond>,
    adjacency: Vec<Vec<(usize, BondOrder)>>,
}

impl Molecule {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..Self::default()
        }
    }

    pub fn add_atom(&mut self, atom: MolAtom) -> usize {
        self.atoms.push(atom);
        self.adjacency.push(Vec::new());
        self.atoms.len() - 1
    }

    /// Adds a bond between two existing atoms. Aromatic bonds mark both ends
    /// aromatic.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn add_bond(&mut self, a: usize, b: usize, order: BondOrder) {
        self.adjacency[a].push((b, order));
        self.adjacency[b].push((a, order));
        if order == BondOrder::Aromatic {
            self.atoms[a].aromatic = true;
            self.atoms[b].aromatic = true;
        }
        self.bonds.push(MolBond { a, b, order });
    }

    pub fn atoms(&self) -> &[MolAtom] {
        &self.atoms
    }

    pub fn atom(&self, index: usize) -> Option<&MolAtom> {
        self.atoms.get(index)
    }

    pub fn bonds(&self) -> &[MolBond] {
        &self.bonds
    }

    pub fn neighbors(&self, index: usize) -> &[(usize, BondOrder)] {
        self.adjacency
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn bond_order(&self, a: usize, b: usize) -> Option<BondOrder> {
        self.neighbors(a)
            .iter()
            .find(|(n, _)| *n == b)
            .map(|(_, order)| *order)
    }

    /// Total number of bonded neighbours, hydrogens included.
    pub fn connectivity(&self, index: usize) -> usize {
        self.neighbors(index).len()
    }

    pub fn hydrogen_count(&self, index: usize) -> usize {
        self.neighbors(index)
            .iter()
            .filter(|(n, _)| self.atoms[*n].element == Element::H)
            .count()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}
