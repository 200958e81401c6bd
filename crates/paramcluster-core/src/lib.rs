//! # paramcluster Core Library
//!
//! Clusters the force-field parameters of peptide systems and compares cluster
//! orderings by how well a SMIRKS inferer can reproduce them.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless models (`ParameterizedSystem`,
//!   `Molecule`), force-field definitions with the template parameterizer,
//!   sequence and structure file I/O, and the pattern-inference seam with its
//!   cluster-graph implementation.
//!
//! - **[`engine`]: The Logic Core.** Canonical parameter signatures, the
//!   parameter store and its buckets, cluster export and the ordering
//!   strategies.
//!
//! - **[`workflows`]: The Public API.** Ingestion, ordering comparison and
//!   persisted export as complete procedures.

pub mod core;
pub mod engine;
pub mod workflows;
