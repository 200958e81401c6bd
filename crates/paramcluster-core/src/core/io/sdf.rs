use crate::core::io::traits::AnnotatedMoleculeFile;
use crate::core::models::molecule::Molecule;
use std::io::{self, Write};
use thiserror::Error;

/// Ordered `(key, value)` data items appended after the connection table.
pub type DataItems = [(String, String)];

#[derive(Debug, Error)]
pub enum SdfError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Molecule '{title}' has {count} atoms; V2000 connection tables hold at most 999")]
    TooManyAtoms { title: String, count: usize },
    #[error("Invalid data item key '{0}': keys must be non-empty and contain no '<' or '>'")]
    InvalidKey(String),
}

/// V2000 SD file writer. The molecule carries no geometry, so every atom is
/// written at the origin.
pub struct SdfFile;

fn ctfile_charge_code(formal_charge: i8) -> u8 {
    match formal_charge {
        3 => 1,
        2 => 2,
        1 => 3,
        -1 => 5,
        -2 => 6,
        -3 => 7,
        _ => 0,
    }
}

impl AnnotatedMoleculeFile for SdfFile {
    type Annotations = DataItems;
    type Error = SdfError;

    fn write_to(
        molecule: &Molecule,
        annotations: &DataItems,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let atom_count = molecule.atom_count();
        if atom_count > 999 || molecule.bonds().len() > 999 {
            return Err(SdfError::TooManyAtoms {
                title: molecule.title.clone(),
                count: atom_count,
            });
        }
        if let Some((key, _)) = annotations
            .iter()
            .find(|(key, _)| key.is_empty() || key.contains(['<', '>']))
        {
            return Err(SdfError::InvalidKey(key.clone()));
        }

        writeln!(writer, "{}", molecule.title)?;
        writeln!(writer, "paramcluster")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "{:>3}{:>3}  0  0  0  0  0  0  0  0999 V2000",
            atom_count,
            molecule.bonds().len()
        )?;

        for atom in molecule.atoms() {
            writeln!(
                writer,
                "{:>10.4}{:>10.4}{:>10.4} {:<3} 0{:>3}  0  0  0  0  0  0  0  0  0  0",
                0.0,
                0.0,
                0.0,
                atom.element.symbol(),
                ctfile_charge_code(atom.formal_charge)
            )?;
        }

        for bond in molecule.bonds() {
            writeln!(
                writer,
                "{:>3}{:>3}{:>3}  0  0  0  0",
                bond.a + 1,
                bond.b + 1,
                bond.order.ctfile_code()
            )?;
        }

        let charged: Vec<(usize, i8)> = molecule
            .atoms()
            .iter()
            .enumerate()
            .filter(|(_, a)| a.formal_charge != 0)
            .map(|(i, a)| (i + 1, a.formal_charge))
            .collect();
        for chunk in charged.chunks(8) {
            write!(writer, "M  CHG{:>3}", chunk.len())?;
            for (index, charge) in chunk {
                write!(writer, " {:>3} {:>3}", index, charge)?;
            }
            writeln!(writer)?;
        }
        writeln!(writer, "M  END")?;

        for (key, value) in annotations {
            writeln!(writer, ">  <{}>", key)?;
            writeln!(writer, "{}", value)?;
            writeln!(writer)?;
        }
        writeln!(writer, "$$$$")?;
        Ok(())
    }
}
