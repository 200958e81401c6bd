use crate::core::models::residue::Terminus;
use crate::core::models::topology::BondOrder;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TemplateAtom {
    pub name: String,
    #[serde(rename = "type")]
    pub atom_type: String,
    pub charge: f64,
    #[serde(default)]
    pub formal_charge: i8,
}

/// Atoms, intra-residue bonds and peptide link atoms of one residue.
///
/// Bonds are written `A-B`, `A=B`, `A#B` or `A:B` (aromatic). `head` is the
/// atom bonded to the previous residue, `tail` the atom bonded to the next.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ResidueTemplate {
    pub atoms: Vec<TemplateAtom>,
    #[serde(default)]
    pub bonds: Vec<String>,
    pub head: Option<String>,
    pub tail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBond {
    pub atom1: String,
    pub atom2: String,
    pub order: BondOrder,
}

impl TemplateBond {
    pub fn parse(spec: &str) -> Option<Self> {
        let (split_at, symbol) = spec
            .char_indices()
            .find(|(_, c)| BondOrder::from_symbol(*c).is_some())?;
        let order = BondOrder::from_symbol(symbol)?;
        let atom1 = spec[..split_at].trim();
        let atom2 = spec[split_at + symbol.len_utf8()..].trim();
        if atom1.is_empty() || atom2.is_empty() {
            return None;
        }
        Some(Self {
            atom1: atom1.to_string(),
            atom2: atom2.to_string(),
            order,
        })
    }
}

impl ResidueTemplate {
    pub fn atom_index(&self, name: &str) -> Option<usize> {
        self.atoms.iter().position(|a| a.name == name)
    }

    /// Parsed bonds. Call [`TemplateRegistry::validate`] first; malformed
    /// entries are skipped here.
    pub fn parsed_bonds(&self) -> impl Iterator<Item = TemplateBond> + '_ {
        self.bonds.iter().filter_map(|b| TemplateBond::parse(b))
    }

    fn validate(&self, residue_name: &str) -> Result<(), TemplateError> {
        let mut seen = HashSet::new();
        for atom in &self.atoms {
            if !seen.insert(atom.name.as_str()) {
                return Err(TemplateError::DuplicateAtom {
                    residue_name: residue_name.to_string(),
                    atom_name: atom.name.clone(),
                });
            }
        }

        for spec in &self.bonds {
            let bond = TemplateBond::parse(spec).ok_or_else(|| TemplateError::MalformedBond {
                residue_name: residue_name.to_string(),
                bond: spec.clone(),
            })?;
            for name in [&bond.atom1, &bond.atom2] {
                if !seen.contains(name.as_str()) {
                    return Err(TemplateError::UnknownAtom {
                        residue_name: residue_name.to_string(),
                        atom_name: name.clone(),
                    });
                }
            }
        }

        for link in [&self.head, &self.tail].into_iter().flatten() {
            if !seen.contains(link.as_str()) {
                return Err(TemplateError::UnknownAtom {
                    residue_name: residue_name.to_string(),
                    atom_name: link.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Residue template '{residue_name}' defines atom '{atom_name}' more than once")]
    DuplicateAtom {
        residue_name: String,
        atom_name: String,
    },
    #[error("Residue template '{residue_name}' references unknown atom '{atom_name}'")]
    UnknownAtom {
        residue_name: String,
        atom_name: String,
    },
    #[error("Residue template '{residue_name}' has a malformed bond entry '{bond}'")]
    MalformedBond { residue_name: String, bond: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct TemplateRegistry {
    registry: HashMap<String, ResidueTemplate>,
}

impl TemplateRegistry {
    pub fn get(&self, residue_name: &str) -> Option<&ResidueTemplate> {
        self.registry.get(residue_name)
    }

    pub fn insert(&mut self, residue_name: &str, template: ResidueTemplate) {
        self.registry.insert(residue_name.to_string(), template);
    }

    /// Picks the template for a residue at the given chain position.
    ///
    /// Terminal residues prefer an `N`/`C` prefixed variant (`NALA`, `CALA`)
    /// and fall back to the plain name.
    pub fn resolve(
        &self,
        residue_name: &str,
        terminus: Terminus,
    ) -> Option<(String, &ResidueTemplate)> {
        let prefixed = match terminus {
            Terminus::NTerminal => Some(format!("N{}", residue_name)),
            Terminus::CTerminal => Some(format!("C{}", residue_name)),
            Terminus::Interior => None,
        };
        if let Some(name) = prefixed {
            if let Some(template) = self.registry.get(&name) {
                return Some((name, template));
            }
        }
        self.registry
            .get(residue_name)
            .map(|t| (residue_name.to_string(), t))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResidueTemplate)> + '_ {
        self.registry.iter().map(|(name, t)| (name.as_str(), t))
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        for (name, template) in &self.registry {
            template.validate(name)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }
}
