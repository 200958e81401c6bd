use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// The SMILES/SMIRKS bond symbol.
    pub fn symbol(self) -> char {
        match self {
            Self::Single => '-',
            Self::Double => '=',
            Self::Triple => '#',
            Self::Aromatic => ':',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '-' => Some(Self::Single),
            '=' => Some(Self::Double),
            '#' => Some(Self::Triple),
            ':' => Some(Self::Aromatic),
            _ => None,
        }
    }

    /// Bond order code used by MDL connection tables.
    pub fn ctfile_code(self) -> u8 {
        match self {
            Self::Single => 1,
            Self::Double => 2,
            Self::Triple => 3,
            Self::Aromatic => 4,
        }
    }
}

#[derive(Debug, Error)]
#[error("Invalid bond order string")]
pub struct ParseBondOrderError;

impl FromStr for BondOrder {
    type Err = ParseBondOrderError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1" | "s" | "single" | "-" => Ok(Self::Single),
            "2" | "d" | "double" | "=" => Ok(Self::Double),
            "3" | "t" | "triple" | "#" => Ok(Self::Triple),
            "ar" | "aromatic" | ":" => Ok(Self::Aromatic),
            _ => Err(ParseBondOrderError),
        }
    }
}

impl fmt::Display for BondOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Single => "Single",
                Self::Double => "Double",
                Self::Triple => "Triple",
                Self::Aromatic => "Aromatic",
            }
        )
    }
}

/// Harmonic bond term. `k` in kcal/(mol*A^2), `length` in Angstroms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondTerm {
    pub atoms: [usize; 2],
    pub k: f64,
    pub length: f64,
}

/// Harmonic angle term. `k` in kcal/(mol*rad^2), `theta` in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTerm {
    pub atoms: [usize; 3],
    pub k: f64,
    pub theta: f64,
}

/// One periodic torsion term.
///
/// A proper torsion with several periodicities is stored as several terms on
/// the same four atoms. For impropers the third atom is the central one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DihedralTerm {
    pub atoms: [usize; 4],
    pub k: f64,
    pub phase: f64,
    pub periodicity: f64,
    pub improper: bool,
}

impl DihedralTerm {
    #[inline]
    pub fn central_atom(&self) -> usize {
        self.atoms[2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_parses_names_digits_and_symbols() {
        assert_eq!("single".parse::<BondOrder>().unwrap(), BondOrder::Single);
        assert_eq!("2".parse::<BondOrder>().unwrap(), BondOrder::Double);
        assert_eq!("#".parse::<BondOrder>().unwrap(), BondOrder::Triple);
        assert_eq!("AR".parse::<BondOrder>().unwrap(), BondOrder::Aromatic);
        assert!("quadruple".parse::<BondOrder>().is_err());
    }

    #[test]
    fn symbol_and_from_symbol_agree() {
        for order in [
            BondOrder::Single,
            BondOrder::Double,
            BondOrder::Triple,
            BondOrder::Aromatic,
        ] {
            assert_eq!(BondOrder::from_symbol(order.symbol()), Some(order));
        }
        assert_eq!(BondOrder::from_symbol('~'), None);
    }

    #[test]
    fn ctfile_codes_follow_mdl_convention() {
        assert_eq!(BondOrder::Single.ctfile_code(), 1);
        assert_eq!(BondOrder::Aromatic.ctfile_code(), 4);
    }

    #[test]
    fn central_atom_is_third_atom() {
        let term = DihedralTerm {
            atoms: [5, 9, 2, 7],
            k: 1.1,
            phase: 180.0,
            periodicity: 2.0,
            improper: true,
        };
        assert_eq!(term.central_atom(), 2);
    }
}
