//! # Core Module
//!
//! The stateless foundation of the library: plain data models, file format adapters,
//! and the built-in atomic radius table.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Atoms, oriented surface vertices and bounding boxes
//! - **File I/O** ([`io`]) - PDB structure and site files, surface vertex files
//! - **Atomic Parameters** ([`radii`]) - Per-residue and per-atom radii with a two-tier
//!   fallback, optionally extended from CSV
//!
//! Nothing in this module allocates lattices or runs spatial searches; those live in
//! [`crate::engine`].

pub mod io;
pub mod models;
pub mod radii;
