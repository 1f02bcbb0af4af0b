//! Provides input/output functionality for the file formats consumed and produced
//! by the solvation pipeline.
//!
//! - [`pdb`] - Structure files (PDB `ATOM`/`HETATM` records), water point files and
//!   clustered solvent site files
//! - [`vert`] - Oriented surface vertex files produced by surface triangulation tools
//!
//! All formats implement the common [`traits::MolecularFile`] interface.

pub mod pdb;
pub mod traits;
pub mod vert;
