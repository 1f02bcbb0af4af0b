use crate::core::models::bounds::BoundingBox;
use crate::engine::config::require_positive;
use crate::engine::error::EngineError;
use crate::engine::lattice::{LatticeExtent, LatticeShape, VoxelLattice};
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use tracing::{debug, info, instrument};

/// The interior region recovered by a flood fill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoidFill {
    /// Every reached cell, in discovery order. Equals the concatenation of `layers`.
    pub points: Vec<Point3<f64>>,
    /// Cells grouped by breadth-first depth. `layers[0]` holds the accepted seeds,
    /// snapped to the lattice. Empty layers are never stored.
    pub layers: Vec<Vec<Point3<f64>>>,
    /// Number of cells of the lattice the fill ran on.
    pub lattice_cells: usize,
}

/// Grows the region reachable from `seeds` without crossing `shell`.
///
/// The lattice spans `bounds` at `spacing`, inclusive of the upper bound. Every
/// point is snapped to its nearest lattice cell. Shell cells become walls, then each
/// seed whose cell is not yet marked joins layer 0 (seeds on walls, duplicate seeds
/// and points outside the lattice are dropped). Layers then grow through the six
/// face neighbours until no unmarked cell is reachable.
///
/// # Errors
///
/// - [`EngineError::Config`] if `spacing` is not positive.
/// - Lattice sizing errors from [`LatticeShape::covering`].
#[instrument(skip_all, name = "void_flood_fill_task")]
pub fn run(
    shell: &[Point3<f64>],
    seeds: &[Point3<f64>],
    bounds: &BoundingBox,
    spacing: f64,
    max_cells: usize,
    reporter: &ProgressReporter,
) -> Result<VoidFill, EngineError> {
    let spacing = require_positive("grid_spacing", spacing)?;
    let shape = LatticeShape::covering(bounds, spacing, LatticeExtent::Inclusive, max_cells)?;
    let mut lattice = VoxelLattice::new(shape);

    info!(
        shell = shell.len(),
        seeds = seeds.len(),
        cells = shape.len(),
        "Flood filling interior void."
    );
    reporter.report(Progress::Message(format!(
        "Flood filling from {} seed points...",
        seeds.len()
    )));

    let mut walls = 0usize;
    for point in shell {
        if let Some(index) = shape.nearest_index(point) {
            if lattice.mark(index) {
                walls += 1;
            }
        }
    }

    let mut frontier: Vec<usize> = seeds
        .iter()
        .filter_map(|p| shape.nearest_index(p))
        .filter(|&index| lattice.mark(index))
        .collect();

    let mut fill = VoidFill {
        lattice_cells: shape.len(),
        ..Default::default()
    };

    while !frontier.is_empty() {
        let layer: Vec<Point3<f64>> = frontier.iter().map(|&i| shape.position_of(i)).collect();
        fill.points.extend_from_slice(&layer);
        fill.layers.push(layer);

        let mut next = Vec::new();
        for &index in &frontier {
            for neighbour in shape.face_neighbors(index) {
                if lattice.mark(neighbour) {
                    next.push(neighbour);
                }
            }
        }
        frontier = next;
    }

    debug!(
        walls,
        reached = fill.points.len(),
        depth = fill.layers.len(),
        "Flood fill complete."
    );
    Ok(fill)
}
