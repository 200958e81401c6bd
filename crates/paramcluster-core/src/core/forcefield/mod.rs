//! # Force Field Module
//!
//! Force-field definitions and the structural collaborator that turns a
//! peptide sequence into a parameterized system.
//!
//! ## Overview
//!
//! A force-field definition is a TOML file with atom types (element and
//! van-der-Waals parameters), bond and angle tables, multi-term proper and
//! improper torsion tables (with `X` as a wildcard type), and residue templates.
//! The [`parameterization::TemplateParameterizer`] walks a sequence, instantiates
//! one template per residue, links residues through their `head`/`tail` atoms,
//! tags residue termini and assigns every bonded term.
//!
//! ## Key Components
//!
//! - [`params`] - Definition file structures, loading and term lookups
//! - [`parameterization`] - The [`parameterization::SystemBuilder`] seam and its
//!   template-based implementation
//!
//! ## Usage
//!
//! ```ignore
//! use paramcluster::core::forcefield::{params::Forcefield, parameterization::*};
//!
//! let forcefield = Forcefield::load(Path::new("amber99sbildn.toml"))?;
//! let (system, molecule) = TemplateParameterizer::new(&forcefield).build(&sequence)?;
//! ```

pub mod parameterization;
pub mod params;
