//! # Dowse Core Library
//!
//! A high-performance library for placing solvent (water) sites in the cavities and
//! on the surface of macromolecular structures, given the atomic coordinates and a
//! triangulated, oriented surface mesh.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so each concern can be
//! tested in isolation.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Atom`, `SurfaceVertex`,
//!   `BoundingBox`), file format adapters, and the static atomic radius table.
//!
//! - **[`engine`]: The Logic Core.** The spatial data structures (`SpatialHashGrid`,
//!   `VoxelLattice`) and the algorithms built on them: surface inside/outside
//!   classification, void flood fill, atom overlap testing and connected-component
//!   clustering. Also hosts configuration, errors and progress reporting.
//!
//! - **[`workflows`]: The Public API.** End-to-end pipelines that tie `core` and
//!   `engine` together: full solvation of a structure, and clustering of an existing
//!   point set.
//!
//! ## Features
//!
//! - `parallel` - Parallelises the per-point phases with `rayon`. Results and their
//!   order are identical with and without the feature.

pub mod core;
pub mod engine;
pub mod workflows;
