//! Atom-mapped SMILES for [`Molecule`] graphs.
//!
//! Every atom, hydrogens included, is written as a bracket atom whose map
//! index is its position in the molecule plus one, so atom-index groups taken
//! from parameter clusters can be located in the string. The writer does two
//! depth-first passes: the first finds ring-closure bonds, the second emits
//! atoms, branches and closure digits. Neighbours are visited in ascending
//! index order.

use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Lowest-free ring-closure digit allocator.
#[derive(Default)]
struct RingDigits {
    in_use: BTreeSet<usize>,
}

impl RingDigits {
    fn acquire(&mut self) -> usize {
        let digit = (1..)
            .find(|d| !self.in_use.contains(d))
            .unwrap_or(1);
        self.in_use.insert(digit);
        digit
    }

    fn release(&mut self, digit: usize) {
        self.in_use.remove(&digit);
    }
}

#[derive(Default)]
struct Traversal {
    ancestors: Vec<usize>,
    visited: HashSet<usize>,
    /// Atom that opens a closure -> atoms that will close it.
    opening: HashMap<usize, Vec<usize>>,
    /// Atom that closes -> (opening atom, digit).
    closing: HashMap<usize, Vec<(usize, usize)>>,
    digits: RingDigits,
}

fn sorted_children(molecule: &Molecule, atom: usize, parent: Option<usize>) -> Vec<usize> {
    let mut children: Vec<usize> = molecule
        .neighbors(atom)
        .iter()
        .map(|(n, _)| *n)
        .filter(|n| Some(*n) != parent)
        .collect();
    children.sort_unstable();
    children
}

fn find_closures(molecule: &Molecule, atom: usize, parent: Option<usize>, state: &mut Traversal) {
    state.ancestors.push(atom);
    state.visited.insert(atom);

    for child in sorted_children(molecule, atom, parent) {
        if state.ancestors.contains(&child) {
            state.opening.entry(child).or_default().push(atom);
        } else if !state.visited.contains(&child) {
            find_closures(molecule, child, Some(atom), state);
        }
    }

    state.ancestors.pop();
}

fn atom_symbol(molecule: &Molecule, index: usize) -> String {
    let Some(atom) = molecule.atom(index) else {
        return String::new();
    };
    let element = if atom.aromatic {
        atom.element.symbol().to_lowercase()
    } else {
        atom.element.symbol().to_string()
    };
    let charge = match atom.formal_charge {
        0 => String::new(),
        1 => "+".to_string(),
        -1 => "-".to_string(),
        c if c > 0 => format!("+{}", c),
        c => format!("-{}", -(c as i16)),
    };
    format!("[{}{}:{}]", element, charge, index + 1)
}

fn bond_symbol(molecule: &Molecule, a: usize, b: usize) -> &'static str {
    let both_aromatic = molecule.atom(a).is_some_and(|x| x.aromatic)
        && molecule.atom(b).is_some_and(|x| x.aromatic);
    match molecule.bond_order(a, b) {
        Some(BondOrder::Double) => "=",
        Some(BondOrder::Triple) => "#",
        Some(BondOrder::Single) if both_aromatic => "-",
        _ => "",
    }
}

fn ring_digit(digit: usize) -> String {
    if digit > 9 {
        format!("%{}", digit)
    } else {
        digit.to_string()
    }
}

fn build(molecule: &Molecule, atom: usize, parent: Option<usize>, state: &mut Traversal) -> String {
    state.visited.insert(atom);
    let mut out = String::new();

    if let Some(parent) = parent {
        out += bond_symbol(molecule, parent, atom);
    }
    out += &atom_symbol(molecule, atom);

    if let Some(mut closures) = state.closing.remove(&atom) {
        closures.sort_by_key(|(_, digit)| *digit);
        for (opener, digit) in closures {
            out += bond_symbol(molecule, atom, opener);
            out += &ring_digit(digit);
            state.digits.release(digit);
        }
    }

    if let Some(closers) = state.opening.get(&atom).cloned() {
        for closer in closers {
            let digit = state.digits.acquire();
            out += &ring_digit(digit);
            state.closing.entry(closer).or_default().push((atom, digit));
        }
    }

    let mut branches = Vec::new();
    for child in sorted_children(molecule, atom, parent) {
        if !state.visited.contains(&child) {
            branches.push(build(molecule, child, Some(atom), state));
        }
    }
    if let Some((last, rest)) = branches.split_last() {
        for branch in rest {
            out += &format!("({})", branch);
        }
        out += last;
    }
    out
}

/// Writes the molecule as an atom-mapped SMILES string. Disconnected
/// fragments are joined with `.`; an empty molecule gives an empty string.
pub fn write_mapped_smiles(molecule: &Molecule) -> String {
    let mut fragments = Vec::new();
    let mut done: HashSet<usize> = HashSet::new();

    for root in 0..molecule.atom_count() {
        if done.contains(&root) {
            continue;
        }
        let mut state = Traversal::default();
        find_closures(molecule, root, None, &mut state);
        state.visited.clear();
        fragments.push(build(molecule, root, None, &mut state));
        done.extend(state.visited);
    }

    fragments.join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Element;
    use crate::core::models::molecule::MolAtom;

    fn add(mol: &mut Molecule, element: Element, formal_charge: i8) -> usize {
        mol.add_atom(MolAtom {
            name: element.symbol().to_string(),
            element,
            formal_charge,
            aromatic: false,
        })
    }

    #[test]
    fn chain_with_branch_and_double_bond() {
        // Acetaldehyde heavy atoms: C0-C1(=O2)
        let mut mol = Molecule::new("ald");
        let c0 = add(&mut mol, Element::C, 0);
        let c1 = add(&mut mol, Element::C, 0);
        let o2 = add(&mut mol, Element::O, 0);
        let h3 = add(&mut mol, Element::H, 0);
        mol.add_bond(c0, c1, BondOrder::Single);
        mol.add_bond(c1, o2, BondOrder::Double);
        mol.add_bond(c1, h3, BondOrder::Single);

        assert_eq!(write_mapped_smiles(&mol), "[C:1][C:2](=[O:3])[H:4]");
    }

    #[test]
    fn ring_closure_uses_digits() {
        let mut mol = Molecule::new("cyclopropane");
        for _ in 0..3 {
            add(&mut mol, Element::C, 0);
        }
        mol.add_bond(0, 1, BondOrder::Single);
        mol.add_bond(1, 2, BondOrder::Single);
        mol.add_bond(2, 0, BondOrder::Single);

        assert_eq!(write_mapped_smiles(&mol), "[C:1]1[C:2][C:3]1");
    }

    #[test]
    fn aromatic_ring_is_lowercase() {
        let mut mol = Molecule::new("benzene");
        for _ in 0..6 {
            add(&mut mol, Element::C, 0);
        }
        for i in 0..6 {
            mol.add_bond(i, (i + 1) % 6, BondOrder::Aromatic);
        }
        assert_eq!(
            write_mapped_smiles(&mol),
            "[c:1]1[c:2][c:3][c:4][c:5][c:6]1"
        );
    }

    #[test]
    fn charges_and_fragments() {
        let mut mol = Molecule::new("salt");
        add(&mut mol, Element::Na, 1);
        add(&mut mol, Element::Cl, -1);
        assert_eq!(write_mapped_smiles(&mol), "[Na+:1].[Cl-:2]");
    }

    #[test]
    fn empty_molecule_gives_empty_string() {
        assert_eq!(write_mapped_smiles(&Molecule::new("none")), "");
    }
}
