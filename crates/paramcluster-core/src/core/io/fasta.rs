use crate::core::io::traits::SequenceFile;
use crate::core::models::ids::MoleculeId;
use crate::core::models::residue::AminoAcid;
use std::io::{self, BufRead};
use thiserror::Error;
use tracing::warn;

/// A single peptide chain read from a sequence file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub id: MoleculeId,
    /// Header text after `>`, empty when the file has no header.
    pub description: String,
    pub residues: Vec<AminoAcid>,
}

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid residue code '{code}' on line {line}")]
    InvalidResidue { line: usize, code: char },
    #[error("Sequence '{0}' contains no residues")]
    Empty(MoleculeId),
}

pub struct FastaFile;

impl SequenceFile for FastaFile {
    type Error = FastaError;

    /// Reads the first record. Later records are ignored with a warning; a
    /// trailing `*` stop symbol is accepted.
    fn read_from(reader: &mut impl BufRead, id: MoleculeId) -> Result<Sequence, Self::Error> {
        let mut description = String::new();
        let mut residues = Vec::new();
        let mut seen_header = false;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with(';') {
                continue;
            }
            if let Some(header) = trimmed.strip_prefix('>') {
                if seen_header || !residues.is_empty() {
                    warn!(
                        molecule = %id,
                        line = line_num,
                        "Ignoring additional FASTA records after the first."
                    );
                    break;
                }
                seen_header = true;
                description = header.trim().to_string();
                continue;
            }

            for code in trimmed.chars().filter(|c| !c.is_whitespace()) {
                if code == '*' {
                    continue;
                }
                let residue = AminoAcid::from_one_letter(code)
                    .map_err(|e| FastaError::InvalidResidue { line: line_num, code: e.0 })?;
                residues.push(residue);
            }
        }

        if residues.is_empty() {
            return Err(FastaError::Empty(id));
        }

        Ok(Sequence {
            id,
            description,
            residues,
        })
    }
}
