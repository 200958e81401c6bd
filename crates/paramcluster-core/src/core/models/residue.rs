use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown amino acid code: '{0}'")]
pub struct ParseAminoAcidError(pub char);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcid {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Positively Charged (Basic) ---
    Arginine,
    Histidine,
    Lysine,

    // --- Negatively Charged (Acidic) ---
    AsparticAcid,
    GlutamicAcid,
}

impl AminoAcid {
    pub fn from_one_letter(code: char) -> Result<Self, ParseAminoAcidError> {
        match code.to_ascii_uppercase() {
            'A' => Ok(Self::Alanine),
            'G' => Ok(Self::Glycine),
            'I' => Ok(Self::Isoleucine),
            'L' => Ok(Self::Leucine),
            'P' => Ok(Self::Proline),
            'V' => Ok(Self::Valine),
            'F' => Ok(Self::Phenylalanine),
            'W' => Ok(Self::Tryptophan),
            'Y' => Ok(Self::Tyrosine),
            'N' => Ok(Self::Asparagine),
            'C' => Ok(Self::Cysteine),
            'Q' => Ok(Self::Glutamine),
            'S' => Ok(Self::Serine),
            'T' => Ok(Self::Threonine),
            'M' => Ok(Self::Methionine),
            'R' => Ok(Self::Arginine),
            'H' => Ok(Self::Histidine),
            'K' => Ok(Self::Lysine),
            'D' => Ok(Self::AsparticAcid),
            'E' => Ok(Self::GlutamicAcid),
            _ => Err(ParseAminoAcidError(code)),
        }
    }

    pub fn to_three_letter(self) -> &'static str {
        match self {
            Self::Alanine => "ALA",
            Self::Glycine => "GLY",
            Self::Isoleucine => "ILE",
            Self::Leucine => "LEU",
            Self::Proline => "PRO",
            Self::Valine => "VAL",
            Self::Phenylalanine => "PHE",
            Self::Tryptophan => "TRP",
            Self::Tyrosine => "TYR",
            Self::Asparagine => "ASN",
            Self::Cysteine => "CYS",
            Self::Glutamine => "GLN",
            Self::Serine => "SER",
            Self::Threonine => "THR",
            Self::Methionine => "MET",
            Self::Arginine => "ARG",
            Self::Histidine => "HIS",
            Self::Lysine => "LYS",
            Self::AsparticAcid => "ASP",
            Self::GlutamicAcid => "GLU",
        }
    }
}

/// Position of a residue relative to the ends of its chain.
///
/// Terminal residues carry different partial charges than the same residue
/// inside the chain, so the tag is part of every charge signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub enum Terminus {
    #[default]
    Interior,
    NTerminal,
    CTerminal,
}

impl Terminus {
    /// Single-letter tag used in charge cluster labels.
    pub fn tag(self) -> char {
        match self {
            Terminus::Interior => 'X',
            Terminus::NTerminal => 'N',
            Terminus::CTerminal => 'C',
        }
    }

    /// Classifies a residue from its peptide links, the way a residue template
    /// reports its head (link to the previous residue) and tail (link to the
    /// next one). An isolated residue has neither and counts as interior.
    pub fn from_links(has_previous: bool, has_next: bool) -> Self {
        match (has_previous, has_next) {
            (true, false) => Terminus::CTerminal,
            (false, true) => Terminus::NTerminal,
            _ => Terminus::Interior,
        }
    }
}

impl fmt::Display for Terminus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub name: String,          // Template name used for this residue (e.g., "ALA", "NALA")
    pub sequence_index: usize, // Zero-based position in the input sequence
    pub terminus: Terminus,
    pub(crate) atoms: Vec<usize>,
}

impl Residue {
    pub fn new(name: &str, sequence_index: usize, terminus: Terminus) -> Self {
        Self {
            name: name.to_string(),
            sequence_index,
            terminus,
            atoms: Vec::new(),
        }
    }

    pub(crate) fn add_atom(&mut self, atom_index: usize) {
        self.atoms.push(atom_index);
    }

    pub fn atoms(&self) -> &[usize] {
        &self.atoms
    }
}
