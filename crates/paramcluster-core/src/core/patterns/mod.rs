//! # Patterns Module
//!
//! Pattern inference over parameter clusters.
//!
//! A [`traits::PatternInferer`] receives the molecules and an ordered list of
//! clusters and tries to derive one SMIRKS pattern per cluster such that the
//! patterns, applied as an ordered hierarchy, reproduce the clustering. The
//! result is data: a failed attempt still reports the patterns it derived.
//!
//! ## Key Components
//!
//! - [`traits`] - The inferer seam, cluster views and inference results
//! - [`graph`] - Cluster graphs: layered SMIRKS generalizations of atom groups
//! - [`smirksifier`] - The layered reference inferer

pub mod graph;
pub mod smirksifier;
pub mod traits;
