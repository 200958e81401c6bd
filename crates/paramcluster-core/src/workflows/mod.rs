//! # Workflows Module
//!
//! High-level entry points that tie the `core` collaborators and the `engine`
//! together.
//!
//! ## Overview
//!
//! A full comparison reads sequence files into a parameter store, exports the
//! clusters, runs every requested ordering through the pattern inferer and
//! persists the result. Each step is its own workflow so front ends can stop
//! after any of them, for example to only print cluster statistics.
//!
//! ## Architecture
//!
//! - **Ingestion** ([`ingest`]) - Sequence files to a populated parameter store
//! - **Comparison** ([`compare`]) - Orderings × parameter types through the inferer
//! - **Persistence** ([`export`]) - Annotated SDF files and the JSON report

pub mod compare;
pub mod export;
pub mod ingest;
