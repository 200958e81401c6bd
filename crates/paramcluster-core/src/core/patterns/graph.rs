use crate::core::models::molecule::Molecule;
use crate::core::models::topology::BondOrder;
use crate::core::patterns::traits::AtomGroup;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// SMIRKS primitives describing one atom: atomic number, aromaticity, total
/// connectivity, hydrogen count and formal charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AtomDescriptor {
    pub atomic_number: u8,
    pub aromatic: bool,
    pub connectivity: usize,
    pub hydrogens: usize,
    pub formal_charge: i8,
}

impl AtomDescriptor {
    pub fn of(molecule: &Molecule, index: usize) -> Option<Self> {
        let atom = molecule.atom(index)?;
        Some(Self {
            atomic_number: atom.element.atomic_number(),
            aromatic: atom.aromatic,
            connectivity: molecule.connectivity(index),
            hydrogens: molecule.hydrogen_count(index),
            formal_charge: atom.formal_charge,
        })
    }
}

impl fmt::Display for AtomDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}{}X{}H{}{:+}",
            self.atomic_number,
            if self.aromatic { 'a' } else { 'A' },
            self.connectivity,
            self.hydrogens,
            self.formal_charge
        )
    }
}

/// One group's neighbourhood tree below an indexed atom.
#[derive(Debug)]
struct Branch {
    descriptor: AtomDescriptor,
    bond: BondOrder,
    children: Vec<Branch>,
}

/// Unindexed atom of a cluster graph: the union of the aligned atoms of
/// every group.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerNode {
    descriptors: BTreeSet<AtomDescriptor>,
    bonds: BTreeSet<BondOrder>,
    children: Vec<LayerNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedAtom {
    descriptors: BTreeSet<AtomDescriptor>,
    branches: Vec<LayerNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IndexedBond {
    a: usize,
    b: usize,
    orders: BTreeSet<BondOrder>,
}

#[derive(Clone, Copy)]
enum Anchor {
    Indexed(usize),
    Branch(usize),
}

struct FlatNode<'g> {
    anchor: Anchor,
    node: &'g LayerNode,
}

/// A pattern generalizing every atom group of one cluster.
///
/// The indexed atoms follow the group positions and carry the union of the
/// atoms seen at that position. Up to `layers` rings of neighbouring atoms
/// hang below them; a neighbour slot is kept only when every group has an
/// atom for it, pairing atoms across groups in descriptor order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterGraph {
    indexed: Vec<IndexedAtom>,
    bonds: Vec<IndexedBond>,
    layers: usize,
}

#[derive(Clone, Copy)]
enum Parent {
    Root(usize),
    Node(usize),
}

struct ArenaNode {
    descriptor: AtomDescriptor,
    bond: BondOrder,
    children: Vec<usize>,
}

fn grow_branches(molecule: &Molecule, group: &[usize], layers: usize) -> Vec<Vec<Branch>> {
    let mut arena: Vec<ArenaNode> = Vec::new();
    let mut roots: Vec<Vec<usize>> = vec![Vec::new(); group.len()];
    let mut visited: HashSet<usize> = group.iter().copied().collect();
    let mut frontier: Vec<(usize, Parent)> = group
        .iter()
        .enumerate()
        .map(|(p, &atom)| (atom, Parent::Root(p)))
        .collect();

    for _ in 0..layers {
        let mut next = Vec::new();
        for (atom, parent) in frontier {
            let mut candidates: Vec<(AtomDescriptor, BondOrder, usize)> = molecule
                .neighbors(atom)
                .iter()
                .filter(|(n, _)| !visited.contains(n))
                .filter_map(|&(n, order)| AtomDescriptor::of(molecule, n).map(|d| (d, order, n)))
                .collect();
            candidates.sort();

            for (descriptor, bond, neighbor) in candidates {
                if !visited.insert(neighbor) {
                    continue;
                }
                let k = arena.len();
                arena.push(ArenaNode {
                    descriptor,
                    bond,
                    children: Vec::new(),
                });
                match parent {
                    Parent::Root(p) => roots[p].push(k),
                    Parent::Node(j) => arena[j].children.push(k),
                }
                next.push((neighbor, Parent::Node(k)));
            }
        }
        frontier = next;
    }

    fn to_branch(arena: &[ArenaNode], k: usize) -> Branch {
        Branch {
            descriptor: arena[k].descriptor,
            bond: arena[k].bond,
            children: arena[k]
                .children
                .iter()
                .map(|&c| to_branch(arena, c))
                .collect(),
        }
    }

    roots
        .into_iter()
        .map(|ks| ks.into_iter().map(|k| to_branch(&arena, k)).collect())
        .collect()
}

fn merge_children(lists: &[&[Branch]]) -> Vec<LayerNode> {
    let width = lists.iter().map(|l| l.len()).min().unwrap_or(0);
    (0..width)
        .map(|i| {
            let aligned: Vec<&Branch> = lists.iter().map(|l| &l[i]).collect();
            LayerNode {
                descriptors: aligned.iter().map(|b| b.descriptor).collect(),
                bonds: aligned.iter().map(|b| b.bond).collect(),
                children: merge_children(
                    &aligned
                        .iter()
                        .map(|b| b.children.as_slice())
                        .collect::<Vec<_>>(),
                ),
            }
        })
        .collect()
}

fn join_descriptors(descriptors: &BTreeSet<AtomDescriptor>) -> String {
    descriptors
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn bond_smirks(orders: &BTreeSet<BondOrder>) -> String {
    orders
        .iter()
        .map(|o| o.symbol().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn attach(out: &mut String, parts: Vec<String>) {
    if let Some((last, rest)) = parts.split_last() {
        for part in rest {
            out.push('(');
            out.push_str(part);
            out.push(')');
        }
        out.push_str(last);
    }
}

fn render_branch(node: &LayerNode) -> String {
    let mut out = bond_smirks(&node.bonds);
    out.push('[');
    out.push_str(&join_descriptors(&node.descriptors));
    out.push(']');
    attach(&mut out, node.children.iter().map(render_branch).collect());
    out
}

fn flatten<'g>(node: &'g LayerNode, anchor: Anchor, out: &mut Vec<FlatNode<'g>>) {
    let k = out.len();
    out.push(FlatNode { anchor, node });
    for child in &node.children {
        flatten(child, Anchor::Branch(k), out);
    }
}

fn assign(
    molecule: &Molecule,
    flat: &[FlatNode<'_>],
    atoms: &[usize],
    mapped: &mut Vec<usize>,
    used: &mut HashSet<usize>,
) -> bool {
    let Some(entry) = flat.get(mapped.len()) else {
        return true;
    };
    let parent_atom = match entry.anchor {
        Anchor::Indexed(p) => atoms[p],
        Anchor::Branch(j) => mapped[j],
    };
    for &(neighbor, order) in molecule.neighbors(parent_atom) {
        if used.contains(&neighbor) || !entry.node.bonds.contains(&order) {
            continue;
        }
        let Some(descriptor) = AtomDescriptor::of(molecule, neighbor) else {
            continue;
        };
        if !entry.node.descriptors.contains(&descriptor) {
            continue;
        }
        used.insert(neighbor);
        mapped.push(neighbor);
        if assign(molecule, flat, atoms, mapped, used) {
            return true;
        }
        mapped.pop();
        used.remove(&neighbor);
    }
    false
}

impl ClusterGraph {
    /// Builds the graph for a cluster's groups, `groups[m]` holding the groups
    /// found in `molecules[m]`. Groups whose length differs from the first
    /// group, or whose molecule is missing, are ignored.
    pub fn new(molecules: &[&Molecule], groups: &[Vec<AtomGroup>], layers: usize) -> Self {
        let members: Vec<(&Molecule, &AtomGroup)> = groups
            .iter()
            .enumerate()
            .filter_map(|(m, gs)| molecules.get(m).map(|mol| (*mol, gs)))
            .flat_map(|(mol, gs)| gs.iter().map(move |g| (mol, g)))
            .filter(|(mol, g)| g.iter().all(|&a| a < mol.atom_count()))
            .collect();

        let Some(&(first_mol, first_group)) = members.first() else {
            return Self {
                indexed: Vec::new(),
                bonds: Vec::new(),
                layers,
            };
        };
        let width = first_group.len();
        let members: Vec<_> = members
            .into_iter()
            .filter(|(_, g)| g.len() == width)
            .collect();

        let mut bonds = Vec::new();
        for a in 0..width {
            for b in a + 1..width {
                if first_mol
                    .bond_order(first_group[a], first_group[b])
                    .is_none()
                {
                    continue;
                }
                let orders = members
                    .iter()
                    .filter_map(|(mol, g)| mol.bond_order(g[a], g[b]))
                    .collect();
                bonds.push(IndexedBond { a, b, orders });
            }
        }

        let trees: Vec<Vec<Vec<Branch>>> = members
            .iter()
            .map(|(mol, g)| grow_branches(mol, g, layers))
            .collect();

        let indexed = (0..width)
            .map(|p| IndexedAtom {
                descriptors: members
                    .iter()
                    .filter_map(|(mol, g)| AtomDescriptor::of(mol, g[p]))
                    .collect(),
                branches: merge_children(
                    &trees.iter().map(|t| t[p].as_slice()).collect::<Vec<_>>(),
                ),
            })
            .collect();

        Self {
            indexed,
            bonds,
            layers,
        }
    }

    pub fn layers(&self) -> usize {
        self.layers
    }

    pub fn indexed_count(&self) -> usize {
        self.indexed.len()
    }

    fn indexed_neighbors(&self, p: usize) -> impl Iterator<Item = (usize, &IndexedBond)> + '_ {
        self.bonds.iter().filter_map(move |bond| {
            if bond.a == p {
                Some((bond.b, bond))
            } else if bond.b == p {
                Some((bond.a, bond))
            } else {
                None
            }
        })
    }

    fn render_indexed(&self, p: usize, visited: &mut [bool]) -> String {
        visited[p] = true;
        let atom = &self.indexed[p];
        let mut out = format!("[{}:{}]", join_descriptors(&atom.descriptors), p + 1);

        let mut parts: Vec<String> = atom.branches.iter().map(render_branch).collect();
        let next: Vec<(usize, String)> = self
            .indexed_neighbors(p)
            .map(|(q, bond)| (q, bond_smirks(&bond.orders)))
            .collect();
        for (q, bond) in next {
            if visited[q] {
                continue;
            }
            let rest = self.render_indexed(q, visited);
            parts.push(format!("{}{}", bond, rest));
        }
        attach(&mut out, parts);
        out
    }

    /// Renders the graph as SMIRKS. Indexed atoms carry map indices starting
    /// at one; disconnected indexed atoms are joined with `.`.
    pub fn as_smirks(&self) -> String {
        let mut visited = vec![false; self.indexed.len()];
        let mut fragments = Vec::new();
        for p in 0..self.indexed.len() {
            if !visited[p] {
                fragments.push(self.render_indexed(p, &mut visited));
            }
        }
        fragments.join(".")
    }

    /// Whether `atoms`, in order, match the indexed atoms of this graph with
    /// every neighbour layer embedded around them.
    pub fn matches(&self, molecule: &Molecule, atoms: &[usize]) -> bool {
        if atoms.len() != self.indexed.len() || self.indexed.is_empty() {
            return false;
        }
        for (atom, indexed) in atoms.iter().zip(&self.indexed) {
            match AtomDescriptor::of(molecule, *atom) {
                Some(d) if indexed.descriptors.contains(&d) => {}
                _ => return false,
            }
        }
        for bond in &self.bonds {
            match molecule.bond_order(atoms[bond.a], atoms[bond.b]) {
                Some(order) if bond.orders.contains(&order) => {}
                _ => return false,
            }
        }

        let mut flat = Vec::new();
        for (p, indexed) in self.indexed.iter().enumerate() {
            for branch in &indexed.branches {
                flatten(branch, Anchor::Indexed(p), &mut flat);
            }
        }
        let mut used: HashSet<usize> = atoms.iter().copied().collect();
        let mut mapped = Vec::with_capacity(flat.len());
        assign(molecule, &flat, atoms, &mut mapped, &mut used)
    }
}
