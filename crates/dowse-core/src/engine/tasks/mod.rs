//! Computational steps of the site placement pipeline.
//!
//! Each task takes plain slices and configuration values, reports through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter), and returns owned
//! results in a deterministic order.

pub mod classify;
pub mod clustering;
pub mod flood_fill;
pub mod overlap;
