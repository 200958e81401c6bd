//! # Core Models Module
//!
//! Data structures describing the molecules this crate works on.
//!
//! Every input sequence produces two views of the same molecule, sharing atom
//! indices:
//!
//! - [`system::ParameterizedSystem`] - atoms with charges and van-der-Waals
//!   parameters, residues with terminus tags, and the bonded force-field terms.
//! - [`molecule::Molecule`] - the chemical-structure graph (elements, bond
//!   orders, formal charges, aromaticity) used for pattern inference and
//!   structure export.
//!
//! ## Key Components
//!
//! - [`atom`] - Elements and parameterized atoms
//! - [`residue`] - Amino acid codes, residues and terminus classification
//! - [`topology`] - Bond orders and bond, angle and torsion terms
//! - [`units`] - Physical units recorded alongside raw parameter values
//! - [`ids`] - Molecule identifiers

pub mod atom;
pub mod ids;
pub mod molecule;
pub mod residue;
pub mod system;
pub mod topology;
pub mod units;
