use super::signature::Signature;
use crate::core::models::ids::MoleculeId;
use crate::core::models::units::Unit;
use crate::core::patterns::traits::AtomGroup;
use std::collections::{HashMap, HashSet};

/// Everything recorded under one signature.
#[derive(Debug, Clone, Default)]
pub struct BucketEntry {
    groups: Vec<(MoleculeId, Vec<AtomGroup>)>,
    values: HashSet<Vec<u64>>,
    units: Option<Vec<Unit>>,
}

impl BucketEntry {
    /// Groups recorded for `molecule_id`, empty if the molecule contributed
    /// none.
    pub fn groups_for(&self, molecule_id: &MoleculeId) -> &[AtomGroup] {
        self.groups
            .iter()
            .find(|(id, _)| id == molecule_id)
            .map(|(_, groups)| groups.as_slice())
            .unwrap_or_default()
    }

    /// Contributing molecules in the order they first added a group.
    pub fn molecules(&self) -> impl Iterator<Item = &MoleculeId> {
        self.groups.iter().map(|(id, _)| id)
    }

    pub fn group_count(&self) -> usize {
        self.groups.iter().map(|(_, g)| g.len()).sum()
    }

    /// Distinct raw value tuples recorded for provenance.
    pub fn raw_values(&self) -> impl Iterator<Item = Vec<f64>> + '_ {
        self.values
            .iter()
            .map(|bits| bits.iter().map(|b| f64::from_bits(*b)).collect())
    }

    pub fn units(&self) -> Option<&[Unit]> {
        self.units.as_deref()
    }
}

/// Append-only multimap from signature to the atom groups sharing it,
/// iterated in first-insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParameterBucket {
    entries: Vec<(Signature, BucketEntry)>,
    index: HashMap<Signature, usize>,
}

impl ParameterBucket {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry_mut(&mut self, signature: Signature) -> &mut BucketEntry {
        let position = match self.index.get(&signature) {
            Some(&position) => position,
            None => {
                let position = self.entries.len();
                self.index.insert(signature.clone(), position);
                self.entries.push((signature, BucketEntry::default()));
                position
            }
        };
        &mut self.entries[position].1
    }

    /// Records `atoms` under `signature` for `molecule_id`, keeping the atom
    /// order as given.
    pub fn add(&mut self, signature: Signature, molecule_id: &MoleculeId, atoms: AtomGroup) {
        let entry = self.entry_mut(signature);
        match entry.groups.iter_mut().find(|(id, _)| id == molecule_id) {
            Some((_, groups)) => groups.push(atoms),
            None => entry.groups.push((molecule_id.clone(), vec![atoms])),
        }
    }

    /// Records the raw values and units behind a signature. Provenance only;
    /// never consulted for membership.
    pub fn add_parameter_values(&mut self, signature: Signature, values: &[f64], units: &[Unit]) {
        let entry = self.entry_mut(signature);
        entry
            .values
            .insert(values.iter().map(|v| v.to_bits()).collect());
        entry.units = Some(units.to_vec());
    }

    pub fn get(&self, signature: &Signature) -> Option<&BucketEntry> {
        self.index.get(signature).map(|&i| &self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Signature, &BucketEntry)> {
        self.entries.iter().map(|(s, e)| (s, e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
