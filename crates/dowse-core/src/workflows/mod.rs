//! # Workflows Module
//!
//! End-to-end entry points that chain the engine tasks into complete runs.
//!
//! - **Solvation** ([`solvate`]) - Classify a lattice against a molecular surface,
//!   flood fill the enclosed void, discard sites that clash with the structure and
//!   cluster the rest.
//! - **Clustering** ([`cluster`]) - Cluster an existing set of sites on its own.
//!
//! Workflows take parsed inputs and a validated configuration and return owned
//! results; reading and writing files is left to the caller.

pub mod cluster;
pub mod solvate;
