use crate::core::io::fasta::Sequence;
use crate::core::models::ids::MoleculeId;
use crate::core::models::molecule::Molecule;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Interface for reading peptide sequence files.
pub trait SequenceFile {
    /// The error type for I/O and parse failures.
    type Error: Error + From<io::Error>;

    /// Reads one sequence and labels it with `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the reader fails.
    fn read_from(reader: &mut impl BufRead, id: MoleculeId) -> Result<Sequence, Self::Error>;

    /// Reads a sequence from a file, identified by the file name up to its
    /// first `.`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Sequence, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader, MoleculeId::from_path(path))
    }
}

/// Interface for writing a chemical structure together with key/value
/// annotations.
pub trait AnnotatedMoleculeFile {
    /// The annotation payload written after the structure.
    type Annotations: ?Sized;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Writes the molecule and its annotations.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    fn write_to(
        molecule: &Molecule,
        annotations: &Self::Annotations,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes the molecule and its annotations to a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(
        molecule: &Molecule,
        annotations: &Self::Annotations,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(molecule, annotations, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
