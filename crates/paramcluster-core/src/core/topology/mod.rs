//! Residue templates: the atoms, charges, bonds and peptide link atoms of each
//! residue a force-field definition knows about.

pub mod registry;
