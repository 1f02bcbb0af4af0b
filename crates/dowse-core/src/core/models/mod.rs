//! # Core Models Module
//!
//! Plain data types shared by every layer of the library.
//!
//! ## Key Components
//!
//! - [`atom`] - Structure atoms and placed solvent sites, with a lazily resolved radius
//! - [`surface`] - Oriented surface vertices read from a triangulated mesh
//! - [`bounds`] - Axis-aligned bounding boxes and the outward snapping used to size lattices
//!
//! These types hold no behaviour beyond simple geometry; all algorithms that consume
//! them live in the [`crate::engine`] layer.

pub mod atom;
pub mod bounds;
pub mod surface;
