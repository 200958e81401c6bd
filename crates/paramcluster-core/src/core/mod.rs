//! # Core Module
//!
//! The stateless foundation of the library: molecule models, force-field
//! definitions and the parameterizer, residue templates, file I/O and pattern
//! inference.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Parameterized systems and chemical-structure graphs
//! - **Parameter Assignment** ([`forcefield`]) - Force-field definitions and the template parameterizer
//! - **Residue Templates** ([`topology`]) - Atoms, charges, bonds and link atoms per residue
//! - **File I/O** ([`io`]) - FASTA input, annotated SDF and atom-mapped SMILES output
//! - **Pattern Inference** ([`patterns`]) - Cluster graphs and the SMIRKS inferer

pub mod forcefield;
pub mod io;
pub mod models;
pub mod patterns;
pub mod topology;
