//! # Engine Module
//!
//! The computational core of site placement: validated configuration, the spatial
//! indices the searches run on, and the tasks that turn a structure and its surface
//! into solvent sites.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Tunables for solvation and clustering, built and
//!   validated through builders
//! - **Error Handling** ([`error`]) - Engine-level error type wrapping configuration and
//!   parameter loading failures
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for user interfaces
//! - **Spatial Indices** ([`spatial_hash`], [`lattice`]) - A sparse hash of point sets
//!   and a dense, bounded voxel lattice
//! - **Tasks** ([`tasks`]) - Surface classification, void flood fill, overlap filtering
//!   and site clustering
//!
//! Tasks are independent of each other and of any file format; the orchestration lives
//! in [`crate::workflows`].

pub mod config;
pub mod error;
pub mod lattice;
pub mod progress;
pub mod spatial_hash;
pub mod tasks;
