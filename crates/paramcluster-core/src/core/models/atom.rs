use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid or unsupported element symbol: '{0}'")]
pub struct ParseElementError(String);

/// Chemical elements that occur in peptides and their common modifications.
///
/// The discriminant is the atomic number, which is also what improper-torsion
/// signatures and SMIRKS `#n` primitives are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum Element {
    H = 1,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Na = 11,
    Mg = 12,
    P = 15,
    S = 16,
    Cl = 17,
    K = 19,
    Ca = 20,
    Zn = 30,
    Se = 34,
    Br = 35,
    I = 53,
}

impl Element {
    #[inline]
    pub fn atomic_number(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Element::H => "H",
            Element::C => "C",
            Element::N => "N",
            Element::O => "O",
            Element::F => "F",
            Element::Na => "Na",
            Element::Mg => "Mg",
            Element::P => "P",
            Element::S => "S",
            Element::Cl => "Cl",
            Element::K => "K",
            Element::Ca => "Ca",
            Element::Zn => "Zn",
            Element::Se => "Se",
            Element::Br => "Br",
            Element::I => "I",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Element {
    type Err = ParseElementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = {
            let mut chars = s.trim().chars();
            match chars.next() {
                Some(first) => {
                    first.to_ascii_uppercase().to_string() + &chars.as_str().to_ascii_lowercase()
                }
                None => String::new(),
            }
        };
        match normalized.as_str() {
            "H" => Ok(Element::H),
            "C" => Ok(Element::C),
            "N" => Ok(Element::N),
            "O" => Ok(Element::O),
            "F" => Ok(Element::F),
            "Na" => Ok(Element::Na),
            "Mg" => Ok(Element::Mg),
            "P" => Ok(Element::P),
            "S" => Ok(Element::S),
            "Cl" => Ok(Element::Cl),
            "K" => Ok(Element::K),
            "Ca" => Ok(Element::Ca),
            "Zn" => Ok(Element::Zn),
            "Se" => Ok(Element::Se),
            "Br" => Ok(Element::Br),
            "I" => Ok(Element::I),
            _ => Err(ParseElementError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Element {
    type Error = ParseElementError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A force-field parameterized atom.
///
/// Non-bonded parameters follow the Amber convention: `epsilon` is the
/// Lennard-Jones well depth in kcal/mol and `rmin_half` is half the distance
/// of the potential minimum in Angstroms.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The name of the atom within its residue (e.g., "CA", "HB2").
    pub name: String,
    /// The force-field atom type (e.g., "CT", "N3").
    pub atom_type: String,
    pub element: Element,
    /// Index of the owning residue in the parent system.
    pub residue: usize,
    /// Partial charge in elementary charge units.
    pub charge: f64,
    pub epsilon: f64,
    pub rmin_half: f64,
}

impl Atom {
    pub fn new(name: &str, atom_type: &str, element: Element, residue: usize) -> Self {
        Self {
            name: name.to_string(),
            atom_type: atom_type.to_string(),
            element,
            residue,
            charge: 0.0,
            epsilon: 0.0,
            rmin_half: 0.0,
        }
    }
}
