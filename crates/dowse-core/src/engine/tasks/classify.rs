use crate::core::models::bounds::BoundingBox;
use crate::core::models::surface::SurfaceVertex;
use crate::engine::config::{ClassifierKind, ConfigError, require_positive};
use crate::engine::error::EngineError;
use crate::engine::lattice::{LatticeExtent, LatticeShape};
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spatial_hash::SpatialHashGrid;
use itertools::iproduct;
use nalgebra::Point3;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

const VOTE_NEIGHBORS: usize = 3;
const VOTE_EPSILON: f64 = 1e-6;

/// Lattice points split by side of the surface, each list in lattice scan order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Classification {
    pub inside: Vec<Point3<f64>>,
    pub outside: Vec<Point3<f64>>,
}

impl Classification {
    fn from_labels(shape: &LatticeShape, labels: &[Option<bool>]) -> Self {
        let mut result = Self::default();
        for (index, label) in labels.iter().enumerate() {
            match label {
                Some(true) => result.inside.push(shape.position_of(index)),
                Some(false) => result.outside.push(shape.position_of(index)),
                None => {}
            }
        }
        result
    }
}

/// Labels lattice cells as inside or outside an oriented surface.
///
/// Implementations return one entry per lattice cell, indexed like the lattice:
/// `Some(true)` for inside, `Some(false)` for outside and `None` for cells with no
/// surface vertex within `search_radius`.
pub trait SurfaceClassifier {
    fn label(
        &self,
        surface: &[SurfaceVertex],
        shape: &LatticeShape,
        search_radius: f64,
    ) -> Result<Vec<Option<bool>>, ConfigError>;
}

impl ClassifierKind {
    pub fn strategy(self) -> &'static dyn SurfaceClassifier {
        match self {
            ClassifierKind::Scatter => &ScatterClassifier,
            ClassifierKind::Binned => &BinnedClassifier,
            ClassifierKind::WeightedVote => &WeightedVoteClassifier,
        }
    }
}

#[cfg(feature = "parallel")]
fn label_cells<F>(len: usize, f: F) -> Vec<Option<bool>>
where
    F: Fn(usize) -> Option<bool> + Sync + Send,
{
    (0..len).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn label_cells<F>(len: usize, f: F) -> Vec<Option<bool>>
where
    F: Fn(usize) -> Option<bool>,
{
    (0..len).map(f).collect()
}

/// Every vertex writes itself into the cells around it that it is strictly closer
/// to than any earlier vertex. Equidistant vertices keep the first one processed.
/// Vertices with a non-finite coordinate are skipped.
pub struct ScatterClassifier;

impl SurfaceClassifier for ScatterClassifier {
    fn label(
        &self,
        surface: &[SurfaceVertex],
        shape: &LatticeShape,
        search_radius: f64,
    ) -> Result<Vec<Option<bool>>, ConfigError> {
        let mut nearest: Vec<Option<(usize, f64)>> = vec![None; shape.len()];
        let radius_sq = search_radius * search_radius;
        let reach = (search_radius / shape.spacing()).ceil() as i64;
        let mut skipped = 0usize;

        for (vertex_idx, vertex) in surface.iter().enumerate() {
            let Some([cx, cy, cz]) = shape.floor_cell(&vertex.position) else {
                skipped += 1;
                continue;
            };
            for (dx, dy, dz) in iproduct!(-reach..=reach, -reach..=reach, -reach..=reach) {
                let cell = (cx.checked_add(dx), cy.checked_add(dy), cz.checked_add(dz));
                let (Some(x), Some(y), Some(z)) = cell else {
                    continue;
                };
                let Some(index) = shape.checked_index([x, y, z]) else {
                    continue;
                };
                let dist_sq = (shape.position_of(index) - vertex.position).norm_squared();
                if dist_sq > radius_sq {
                    continue;
                }
                let slot = &mut nearest[index];
                if slot.is_none_or(|(_, best)| dist_sq < best) {
                    *slot = Some((vertex_idx, dist_sq));
                }
            }
        }
        if skipped > 0 {
            warn!(skipped, "Ignored surface vertices with non-finite coordinates.");
        }

        Ok(label_cells(shape.len(), |index| {
            nearest[index].map(|(vertex_idx, _)| {
                surface[vertex_idx].is_behind(&shape.position_of(index))
            })
        }))
    }
}

/// Every cell gathers the nearest vertex from a spatial hash of the vertices whose
/// cell size equals the search radius, so the 27 neighbouring bins always contain
/// every vertex in range.
pub struct BinnedClassifier;

impl SurfaceClassifier for BinnedClassifier {
    fn label(
        &self,
        surface: &[SurfaceVertex],
        shape: &LatticeShape,
        search_radius: f64,
    ) -> Result<Vec<Option<bool>>, ConfigError> {
        let radius_sq = search_radius * search_radius;
        let grid = SpatialHashGrid::build(surface, search_radius)?;

        Ok(label_cells(shape.len(), |index| {
            let point = shape.position_of(index);
            let mut best: Option<(usize, f64)> = None;
            for vertex_idx in grid.neighbors_of_point(&point) {
                let dist_sq = (point - surface[vertex_idx].position).norm_squared();
                if dist_sq <= radius_sq && best.is_none_or(|(_, d)| dist_sq < d) {
                    best = Some((vertex_idx, dist_sq));
                }
            }
            best.map(|(vertex_idx, _)| surface[vertex_idx].is_behind(&point))
        }))
    }
}

/// The closest vertices seen so far, ordered by distance and then by vertex index.
#[derive(Debug, Clone, Copy, Default)]
struct NearestVotes {
    entries: [(f64, usize); VOTE_NEIGHBORS],
    len: usize,
}

impl NearestVotes {
    fn offer(&mut self, dist_sq: f64, vertex_idx: usize) {
        let candidate = (dist_sq, vertex_idx);
        let precedes = |a: &(f64, usize), b: &(f64, usize)| a.0 < b.0 || (a.0 == b.0 && a.1 < b.1);

        let mut pos = self.len;
        while pos > 0 && precedes(&candidate, &self.entries[pos - 1]) {
            pos -= 1;
        }
        if pos == VOTE_NEIGHBORS {
            return;
        }
        let last = self.len.min(VOTE_NEIGHBORS - 1);
        for i in (pos..last).rev() {
            self.entries[i + 1] = self.entries[i];
        }
        self.entries[pos] = candidate;
        self.len = (self.len + 1).min(VOTE_NEIGHBORS);
    }

    fn as_slice(&self) -> &[(f64, usize)] {
        &self.entries[..self.len]
    }
}

/// The three nearest vertices within range vote on the side, each weighted by
/// `1 / (d² + 1e-6)`. Inside wins only with a strictly larger score. Candidates
/// come from the same spatial hash as [`BinnedClassifier`]; equidistant vertices
/// are ranked by their index in the surface.
pub struct WeightedVoteClassifier;

impl SurfaceClassifier for WeightedVoteClassifier {
    fn label(
        &self,
        surface: &[SurfaceVertex],
        shape: &LatticeShape,
        search_radius: f64,
    ) -> Result<Vec<Option<bool>>, ConfigError> {
        let radius_sq = search_radius * search_radius;
        let grid = SpatialHashGrid::build(surface, search_radius)?;

        Ok(label_cells(shape.len(), |index| {
            let point = shape.position_of(index);
            let mut votes = NearestVotes::default();
            for vertex_idx in grid.neighbors_of_point(&point) {
                let dist_sq = (point - surface[vertex_idx].position).norm_squared();
                if dist_sq <= radius_sq {
                    votes.offer(dist_sq, vertex_idx);
                }
            }
            if votes.len == 0 {
                return None;
            }

            let (mut inside, mut outside) = (0.0, 0.0);
            for &(dist_sq, vertex_idx) in votes.as_slice() {
                let weight = 1.0 / (dist_sq + VOTE_EPSILON);
                if surface[vertex_idx].is_behind(&point) {
                    inside += weight;
                } else {
                    outside += weight;
                }
            }
            Some(inside > outside)
        }))
    }
}

/// Classifies every point of a lattice over `bounds` against the surface.
///
/// The lattice has `ceil((max - min) / spacing)` cells per axis and its cells are
/// scanned z outermost, x innermost; both output lists follow that order. Cells
/// with no vertex within `search_radius` appear in neither list.
///
/// # Errors
///
/// - [`EngineError::EmptyInput`] if `surface` is empty.
/// - [`EngineError::Config`] if `spacing` or `search_radius` is not positive, or the
///   strategy cannot index the surface.
/// - Lattice sizing errors from [`LatticeShape::covering`].
#[instrument(skip_all, name = "surface_classification_task")]
pub fn run(
    surface: &[SurfaceVertex],
    bounds: &BoundingBox,
    spacing: f64,
    search_radius: f64,
    kind: ClassifierKind,
    max_cells: usize,
    reporter: &ProgressReporter,
) -> Result<Classification, EngineError> {
    if surface.is_empty() {
        return Err(EngineError::EmptyInput("surface vertices"));
    }
    let spacing = require_positive("grid_spacing", spacing)?;
    let search_radius = require_positive("search_radius", search_radius)?;
    let shape = LatticeShape::covering(bounds, spacing, LatticeExtent::Exclusive, max_cells)?;

    info!(
        vertices = surface.len(),
        cells = shape.len(),
        strategy = %kind,
        "Classifying lattice points against the surface."
    );
    reporter.report(Progress::Message(format!(
        "Classifying {} lattice points ({})...",
        shape.len(),
        kind
    )));

    let labels = kind.strategy().label(surface, &shape, search_radius)?;
    let classification = Classification::from_labels(&shape, &labels);

    debug!(
        inside = classification.inside.len(),
        outside = classification.outside.len(),
        "Classification complete."
    );
    Ok(classification)
}
