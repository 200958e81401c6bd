//! Provides input/output functionality for sequence and structure files.
//!
//! Sequences are read from FASTA files. Chemical structures are written as SD
//! files carrying cluster annotations as data items, and as atom-mapped SMILES
//! strings for the aggregate JSON export.

pub mod fasta;
pub mod sdf;
pub mod smiles;
pub mod traits;
