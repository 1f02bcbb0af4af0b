use crate::engine::config::{CLUSTER_NEIGHBOR_FACTOR, require_positive};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::spatial_hash::{Positioned, SpatialHashGrid};
use std::collections::VecDeque;
use tracing::{debug, info, instrument};

/// Groups items into connected components, returning indices into `items`.
///
/// Two items are linked when their squared distance is at most
/// `3 * grid_spacing² * 1.05`, i.e. lattice points touching by a face, edge or
/// corner. Components are discovered in input order, members in breadth-first
/// order, and the result is sorted by descending size, stable on ties.
///
/// `hash_spacing` must be at least the link distance for every link to be found.
pub fn cluster_indices<T: Positioned>(
    items: &[T],
    grid_spacing: f64,
    hash_spacing: f64,
) -> Result<Vec<Vec<usize>>, EngineError> {
    let grid_spacing = require_positive("grid_spacing", grid_spacing)?;
    let grid = SpatialHashGrid::build(items, hash_spacing)?;
    let threshold_sq = CLUSTER_NEIGHBOR_FACTOR * grid_spacing * grid_spacing;

    let mut visited = vec![false; items.len()];
    let mut clusters: Vec<Vec<usize>> = Vec::new();
    let mut queue = VecDeque::new();

    for start in 0..items.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);

        let mut members = Vec::new();
        while let Some(current) = queue.pop_front() {
            members.push(current);
            let position = items[current].position();
            for candidate in grid.neighbors_of_point(&position) {
                if visited[candidate] {
                    continue;
                }
                let dist_sq = (items[candidate].position() - position).norm_squared();
                if dist_sq <= threshold_sq {
                    visited[candidate] = true;
                    queue.push_back(candidate);
                }
            }
        }
        clusters.push(members);
    }

    clusters.sort_by(|a, b| b.len().cmp(&a.len()));

    let found: usize = clusters.iter().map(Vec::len).sum();
    if found != items.len() {
        return Err(EngineError::ClusterCountMismatch {
            expected: items.len(),
            found,
        });
    }
    Ok(clusters)
}

/// Clusters `items` and returns owned copies grouped by cluster, largest first.
///
/// # Errors
///
/// - [`EngineError::Config`] if either spacing is not positive.
/// - [`EngineError::ClusterCountMismatch`] if the clusters do not cover the input.
#[instrument(skip_all, name = "site_clustering_task")]
pub fn run<T: Positioned + Clone>(
    items: &[T],
    grid_spacing: f64,
    hash_spacing: f64,
    reporter: &ProgressReporter,
) -> Result<Vec<Vec<T>>, EngineError> {
    info!(
        items = items.len(),
        grid_spacing, hash_spacing, "Clustering sites."
    );
    reporter.report(Progress::Message(format!(
        "Clustering {} sites...",
        items.len()
    )));

    let clusters = cluster_indices(items, grid_spacing, hash_spacing)?;

    debug!(
        clusters = clusters.len(),
        largest = clusters.first().map_or(0, Vec::len),
        "Clustering complete."
    );
    Ok(clusters
        .into_iter()
        .map(|members| members.into_iter().map(|i| items[i].clone()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn points(coords: &[(f64, f64, f64)]) -> Vec<Point3<f64>> {
        coords.iter().map(|&(x, y, z)| Point3::new(x, y, z)).collect()
    }

    #[test]
    fn two_separated_pairs_form_two_clusters() {
        let items = points(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (10.0, 0.0, 0.0), (11.0, 0.0, 0.0)]);
        let clusters = run(&items, 1.0, 3.0, &ProgressReporter::new()).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0], points(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0)]));
        assert_eq!(clusters[1], points(&[(10.0, 0.0, 0.0), (11.0, 0.0, 0.0)]));
    }

    #[test]
    fn corner_neighbours_link_but_two_steps_do_not() {
        let items = points(&[(0.0, 0.0, 0.0), (1.0, 1.0, 1.0), (3.0, 1.0, 1.0)]);
        let clusters = cluster_indices(&items, 1.0, 3.0).unwrap();
        assert_eq!(clusters, vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn clusters_are_sorted_by_size_and_stable_on_ties() {
        let items = points(&[
            (50.0, 0.0, 0.0),
            (20.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (0.5, 0.0, 0.0),
            (1.0, 0.0, 0.0),
            (30.0, 0.0, 0.0),
        ]);
        let clusters = cluster_indices(&items, 0.5, 3.0).unwrap();
        assert_eq!(clusters, vec![vec![2, 3, 4], vec![0], vec![1], vec![5]]);
    }

    #[test]
    fn every_item_lands_in_exactly_one_cluster() {
        let items: Vec<Point3<f64>> = (0..200)
            .map(|i| {
                let f = i as f64;
                Point3::new((f * 0.37).sin() * 6.0, (f * 0.91).cos() * 6.0, (f * 0.13) % 6.0)
            })
            .collect();
        let clusters = cluster_indices(&items, 0.5, 3.0).unwrap();
        let mut seen: Vec<usize> = clusters.into_iter().flatten().collect();
        seen.sort();
        assert_eq!(seen, (0..items.len()).collect::<Vec<_>>());
    }

    #[test]
    fn cluster_sizes_do_not_depend_on_input_order() {
        let forward = points(&[
            (0.0, 0.0, 0.0),
            (0.5, 0.0, 0.0),
            (5.0, 5.0, 5.0),
            (1.0, 0.0, 0.0),
            (5.5, 5.0, 5.0),
            (-8.0, 0.0, 0.0),
        ]);
        let mut reversed = forward.clone();
        reversed.reverse();

        let sizes = |items: &[Point3<f64>]| -> Vec<usize> {
            cluster_indices(items, 0.5, 3.0).unwrap().iter().map(Vec::len).collect()
        };
        assert_eq!(sizes(&forward), vec![3, 2, 1]);
        assert_eq!(sizes(&reversed), vec![3, 2, 1]);
    }

    #[test]
    fn run_clones_atoms_with_their_names() {
        let atoms = vec![
            Atom::solvent(Point3::new(0.0, 0.0, 0.0)),
            Atom::solvent(Point3::new(9.0, 0.0, 0.0)),
            Atom::solvent(Point3::new(9.5, 0.0, 0.0)),
        ];
        let clusters = run(&atoms, 0.5, 3.0, &ProgressReporter::new()).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[0][0].position, Point3::new(9.0, 0.0, 0.0));
        assert!(clusters.iter().flatten().all(|a| a.residue_name == "HOH"));
    }

    #[test]
    fn infinite_coordinates_form_singleton_clusters() {
        let items = points(&[
            (0.0, 0.0, 0.0),
            (f64::INFINITY, 0.0, 0.0),
            (0.5, 0.0, 0.0),
            (0.0, f64::NEG_INFINITY, 0.0),
        ]);
        let clusters = cluster_indices(&items, 0.5, 3.0).unwrap();
        assert_eq!(clusters, vec![vec![0, 2], vec![1], vec![3]]);
    }

    #[test]
    fn empty_input_yields_no_clusters() {
        let items: Vec<Point3<f64>> = Vec::new();
        assert!(cluster_indices(&items, 0.5, 3.0).unwrap().is_empty());
    }

    #[test]
    fn invalid_spacings_are_rejected() {
        let items = points(&[(0.0, 0.0, 0.0)]);
        assert!(matches!(cluster_indices(&items, 0.0, 3.0), Err(EngineError::Config(_))));
        assert!(matches!(cluster_indices(&items, 0.5, -1.0), Err(EngineError::Config(_))));
    }
}
