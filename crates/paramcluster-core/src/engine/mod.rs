//! # Engine Module
//!
//! The stateful clustering layer: canonical parameter signatures, the
//! parameter store that buckets force-field terms by signature, the cluster
//! exporter and the ordering strategies applied before pattern inference.
//!
//! ## Overview
//!
//! Molecules are ingested once, in acquisition order, into a
//! [`store::ParameterStore`]. Each term lands in one of six
//! [`bucket::ParameterBucket`]s keyed by a [`signature::Signature`], a
//! fixed-precision value type, so that terms with equal rounded parameters
//! always share a cluster. After ingestion the store is only read:
//! [`export::ClusterExport`] turns the buckets into per-molecule cluster lists
//! and [`ordering::OrderingStrategy`] reorders them.
//!
//! ## Architecture
//!
//! - **Signatures** ([`signature`]) - Fixed-point parameter keys and cluster labels
//! - **Buckets** ([`bucket`]) - Append-only signature to atom-group multimaps
//! - **Store** ([`store`]) - Molecule registry and term ingestion
//! - **Export** ([`export`]) - Cluster lists aligned with the registered molecules
//! - **Ordering** ([`ordering`]) - The nine ordering heuristics and the terminus-aware composite
//! - **Configuration** ([`config`]) - Ordering plans and run settings
//! - **Progress Monitoring** ([`progress`]) - Progress events for front ends
//! - **Error Handling** ([`error`]) - Engine-level errors

pub mod bucket;
pub mod config;
pub mod error;
pub mod export;
pub mod ordering;
pub mod progress;
pub mod signature;
pub mod store;
