use crate::core::models::atom::Element;
use crate::core::topology::registry::{TemplateError, TemplateRegistry};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Atom type that matches any type in torsion definitions.
pub const WILDCARD: &str = "X";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AtomTypeParam {
    pub element: Element,
    pub epsilon: f64,
    pub rmin_half: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BondParam {
    pub types: [String; 2],
    pub k: f64,
    pub length: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AngleParam {
    pub types: [String; 3],
    pub k: f64,
    pub theta: f64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TorsionTermParam {
    pub k: f64,
    pub phase: f64,
    pub periodicity: f64,
}

/// A torsion definition with one or more periodic terms. For impropers the
/// third type is the central atom.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TorsionParam {
    pub types: [String; 4],
    pub terms: Vec<TorsionTermParam>,
}

impl TorsionParam {
    fn specificity(&self) -> usize {
        self.types.iter().filter(|t| t.as_str() != WILDCARD).count()
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Forcefield {
    pub name: String,
    pub atom_types: HashMap<String, AtomTypeParam>,
    #[serde(default)]
    pub bonds: Vec<BondParam>,
    #[serde(default)]
    pub angles: Vec<AngleParam>,
    #[serde(default)]
    pub propers: Vec<TorsionParam>,
    #[serde(default)]
    pub impropers: Vec<TorsionParam>,
    #[serde(default)]
    pub residues: TemplateRegistry,
}

#[derive(Debug, Error)]
pub enum ForcefieldLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid residue template in '{path}': {source}")]
    Template {
        path: String,
        source: TemplateError,
    },
    #[error("Residue '{residue_name}' in '{path}' uses undefined atom type '{atom_type}'")]
    UnknownAtomType {
        path: String,
        residue_name: String,
        atom_type: String,
    },
}

fn type_matches(pattern: &str, actual: &str) -> bool {
    pattern == WILDCARD || pattern == actual
}

impl Forcefield {
    pub fn load(path: &Path) -> Result<Self, ForcefieldLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ForcefieldLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        Self::parse(&content, &path.to_string_lossy())
    }

    /// Parses and validates a definition. `origin` only labels errors.
    pub fn parse(content: &str, origin: &str) -> Result<Self, ForcefieldLoadError> {
        let forcefield: Forcefield =
            toml::from_str(content).map_err(|e| ForcefieldLoadError::Toml {
                path: origin.to_string(),
                source: e,
            })?;
        forcefield.validate(origin)?;
        Ok(forcefield)
    }

    fn validate(&self, origin: &str) -> Result<(), ForcefieldLoadError> {
        self.residues
            .validate()
            .map_err(|e| ForcefieldLoadError::Template {
                path: origin.to_string(),
                source: e,
            })?;
        for (name, template) in self.residues.iter() {
            for atom in &template.atoms {
                if !self.atom_types.contains_key(&atom.atom_type) {
                    return Err(ForcefieldLoadError::UnknownAtomType {
                        path: origin.to_string(),
                        residue_name: name.to_string(),
                        atom_type: atom.atom_type.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn atom_type(&self, name: &str) -> Option<&AtomTypeParam> {
        self.atom_types.get(name)
    }

    pub fn bond(&self, t1: &str, t2: &str) -> Option<&BondParam> {
        self.bonds.iter().find(|b| {
            (b.types[0] == t1 && b.types[1] == t2) || (b.types[0] == t2 && b.types[1] == t1)
        })
    }

    pub fn angle(&self, t1: &str, t2: &str, t3: &str) -> Option<&AngleParam> {
        self.angles.iter().find(|a| {
            a.types[1] == t2
                && ((a.types[0] == t1 && a.types[2] == t3)
                    || (a.types[0] == t3 && a.types[2] == t1))
        })
    }

    /// Most specific proper torsion matching the four types in either
    /// direction. Ties go to the definition listed first.
    pub fn proper(&self, types: [&str; 4]) -> Option<&TorsionParam> {
        let reversed = [types[3], types[2], types[1], types[0]];
        let mut best: Option<&TorsionParam> = None;
        for param in &self.propers {
            let forward = (0..4).all(|i| type_matches(&param.types[i], types[i]));
            let backward = (0..4).all(|i| type_matches(&param.types[i], reversed[i]));
            if !(forward || backward) {
                continue;
            }
            if best.is_none_or(|b| param.specificity() > b.specificity()) {
                best = Some(param);
            }
        }
        best
    }

    /// Most specific improper torsion for a three-coordinate centre.
    ///
    /// Returns the definition and the order in which the three neighbours fill
    /// the non-central positions one, two and four.
    pub fn improper(
        &self,
        center_type: &str,
        neighbor_types: [&str; 3],
    ) -> Option<(&TorsionParam, [usize; 3])> {
        const PERMUTATIONS: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        let mut best: Option<(&TorsionParam, [usize; 3])> = None;
        for param in &self.impropers {
            if !type_matches(&param.types[2], center_type) {
                continue;
            }
            let outer = [&param.types[0], &param.types[1], &param.types[3]];
            let Some(perm) = PERMUTATIONS.iter().find(|perm| {
                (0..3).all(|slot| type_matches(outer[slot], neighbor_types[perm[slot]]))
            }) else {
                continue;
            };
            if best.is_none_or(|(b, _)| param.specificity() > b.specificity()) {
                best = Some((param, *perm));
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const MINIMAL: &str = r#"
        name = "test-ff"

        [atom_types.N]
        element = "N"
        epsilon = 0.17
        rmin_half = 1.824

        [atom_types.H]
        element = "H"
        epsilon = 0.0157
        rmin_half = 0.6

        [atom_types.CT]
        element = "C"
        epsilon = 0.1094
        rmin_half = 1.908

        [atom_types.C]
        element = "C"
        epsilon = 0.086
        rmin_half = 1.908

        [atom_types.O]
        element = "O"
        epsilon = 0.21
        rmin_half = 1.6612

        [[bonds]]
        types = ["N", "CT"]
        k = 337.0
        length = 1.449

        [[angles]]
        types = ["N", "CT", "C"]
        k = 63.0
        theta = 110.1

        [[propers]]
        types = ["X", "CT", "C", "X"]
        terms = [{ k = 0.0, phase = 0.0, periodicity = 2.0 }]

        [[propers]]
        types = ["N", "CT", "C", "O"]
        terms = [
            { k = 0.8, phase = 0.0, periodicity = 1.0 },
            { k = 0.08, phase = 180.0, periodicity = 3.0 },
        ]

        [[impropers]]
        types = ["X", "X", "C", "O"]
        terms = [{ k = 10.5, phase = 180.0, periodicity = 2.0 }]

        [residues.GLY]
        atoms = [
            { name = "N", type = "N", charge = -0.4157 },
            { name = "CA", type = "CT", charge = -0.0252 },
        ]
        bonds = ["N-CA"]
        head = "N"
        tail = "CA"
    "#;

    #[test]
    fn parse_reads_types_terms_and_templates() {
        let ff = Forcefield::parse(MINIMAL, "inline").unwrap();
        assert_eq!(ff.name, "test-ff");
        assert_eq!(ff.atom_type("CT").unwrap().element, Element::C);
        assert_eq!(ff.propers[1].terms.len(), 2);
        assert!(ff.residues.get("GLY").is_some());
    }

    #[test]
    fn bond_and_angle_lookup_ignore_direction() {
        let ff = Forcefield::parse(MINIMAL, "inline").unwrap();
        assert_eq!(ff.bond("CT", "N").unwrap().k, 337.0);
        assert_eq!(ff.angle("C", "CT", "N").unwrap().theta, 110.1);
        assert!(ff.angle("N", "C", "CT").is_none());
        assert!(ff.bond("N", "N").is_none());
    }

    #[test]
    fn proper_lookup_prefers_most_specific_match() {
        let ff = Forcefield::parse(MINIMAL, "inline").unwrap();
        let specific = ff.proper(["N", "CT", "C", "O"]).unwrap();
        assert_eq!(specific.terms.len(), 2);
        let reversed = ff.proper(["O", "C", "CT", "N"]).unwrap();
        assert_eq!(reversed.terms.len(), 2);
        let generic = ff.proper(["H", "CT", "C", "N"]).unwrap();
        assert_eq!(generic.types[0], WILDCARD);
        assert!(ff.proper(["H", "N", "CT", "C"]).is_none());
    }

    #[test]
    fn improper_lookup_finds_matching_neighbor_order() {
        let ff = Forcefield::parse(MINIMAL, "inline").unwrap();
        let (param, perm) = ff.improper("C", ["O", "CT", "N"]).unwrap();
        assert_eq!(param.terms[0].k, 10.5);
        // The "O" neighbour must land on the fourth position.
        assert_eq!(perm[2], 0);
        assert!(ff.improper("CT", ["O", "CT", "N"]).is_none());
        assert!(ff.improper("C", ["N", "CT", "H"]).is_none());
    }

    #[test]
    fn template_with_undefined_atom_type_is_rejected() {
        let content = MINIMAL.replace(r#"type = "CT", charge"#, r#"type = "CX", charge"#);
        let result = Forcefield::parse(&content, "inline");
        assert!(matches!(
            result,
            Err(ForcefieldLoadError::UnknownAtomType { atom_type, .. }) if atom_type == "CX"
        ));
    }

    #[test]
    fn template_with_bad_bond_is_rejected() {
        let content = MINIMAL.replace(r#"bonds = ["N-CA"]"#, r#"bonds = ["N-CB"]"#);
        let result = Forcefield::parse(&content, "inline");
        assert!(matches!(result, Err(ForcefieldLoadError::Template { .. })));
    }

    #[test]
    fn load_fails_for_missing_file() {
        let dir = tempdir().unwrap();
        let result = Forcefield::load(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ForcefieldLoadError::Io { .. })));
    }

    #[test]
    fn load_fails_for_malformed_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "this is not toml").unwrap();
        let result = Forcefield::load(&path);
        assert!(matches!(result, Err(ForcefieldLoadError::Toml { .. })));
    }

    #[test]
    fn load_succeeds_with_valid_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ff.toml");
        fs::write(&path, MINIMAL).unwrap();
        let ff = Forcefield::load(&path).unwrap();
        assert_eq!(ff.atom_types.len(), 5);
    }
}
