use super::config::{ConfigError, require_positive};
use crate::core::models::atom::Atom;
use crate::core::models::surface::SurfaceVertex;
use itertools::iproduct;
use nalgebra::Point3;
use std::collections::HashMap;

/// Anything with a location in Cartesian space.
pub trait Positioned {
    fn position(&self) -> Point3<f64>;
}

impl Positioned for Point3<f64> {
    #[inline]
    fn position(&self) -> Point3<f64> {
        *self
    }
}

impl Positioned for Atom {
    #[inline]
    fn position(&self) -> Point3<f64> {
        self.position
    }
}

impl Positioned for SurfaceVertex {
    #[inline]
    fn position(&self) -> Point3<f64> {
        self.position
    }
}

impl<T: Positioned> Positioned for &T {
    #[inline]
    fn position(&self) -> Point3<f64> {
        (*self).position()
    }
}

/// Integer coordinates of a cubic cell: `floor(coordinate / cell_size)` per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl CellKey {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn of(point: &Point3<f64>, cell_size: f64) -> Self {
        Self {
            x: (point.x / cell_size).floor() as i64,
            y: (point.y / cell_size).floor() as i64,
            z: (point.z / cell_size).floor() as i64,
        }
    }

    /// The 27 keys of the 3x3x3 block centred on this key, the key itself included.
    /// Keys that would fall outside the `i64` range are left out.
    pub fn neighborhood(self) -> impl Iterator<Item = CellKey> {
        iproduct!(-1i64..=1, -1i64..=1, -1i64..=1).filter_map(move |(dx, dy, dz)| {
            Some(CellKey::new(
                self.x.checked_add(dx)?,
                self.y.checked_add(dy)?,
                self.z.checked_add(dz)?,
            ))
        })
    }
}

/// Uniform spatial hash over a fixed set of items.
///
/// Every item index lands in exactly one bucket, and buckets keep insertion order.
/// The grid is frozen after [`SpatialHashGrid::build`]; it stores indices only, so
/// callers keep ownership of the items themselves.
#[derive(Debug, Clone)]
pub struct SpatialHashGrid {
    cell_size: f64,
    buckets: HashMap<CellKey, Vec<usize>>,
    item_count: usize,
}

impl SpatialHashGrid {
    /// Buckets `items` into cubic cells of edge `cell_size`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotPositive`] if `cell_size` is not a positive finite number.
    pub fn build<T: Positioned>(items: &[T], cell_size: f64) -> Result<Self, ConfigError> {
        let cell_size = require_positive("cell_size", cell_size)?;
        let mut buckets: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (idx, item) in items.iter().enumerate() {
            buckets
                .entry(CellKey::of(&item.position(), cell_size))
                .or_default()
                .push(idx);
        }
        Ok(Self {
            cell_size,
            buckets,
            item_count: items.len(),
        })
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    #[inline]
    pub fn key_of(&self, point: &Point3<f64>) -> CellKey {
        CellKey::of(point, self.cell_size)
    }

    /// Item indices stored under `key`, in insertion order.
    pub fn bucket(&self, key: &CellKey) -> &[usize] {
        self.buckets.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Item indices of all buckets in the 27-cell neighbourhood of `key`.
    pub fn neighbors(&self, key: CellKey) -> impl Iterator<Item = usize> + '_ {
        key.neighborhood()
            .filter_map(|k| self.buckets.get(&k))
            .flat_map(|bucket| bucket.iter().copied())
    }

    /// Item indices of all buckets around the cell containing `point`.
    pub fn neighbors_of_point(&self, point: &Point3<f64>) -> impl Iterator<Item = usize> + '_ {
        self.neighbors(self.key_of(point))
    }

    /// Number of indexed items.
    pub fn len(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.buckets.len()
    }

    pub fn cells(&self) -> impl Iterator<Item = (&CellKey, &[usize])> {
        self.buckets.iter().map(|(k, v)| (k, v.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_key_floors_negative_coordinates() {
        let key = CellKey::of(&Point3::new(-0.1, 2.9, 3.0), 3.0);
        assert_eq!(key, CellKey::new(-1, 0, 1));
    }

    #[test]
    fn neighborhood_has_27_distinct_keys_including_center() {
        let center = CellKey::new(4, -2, 0);
        let keys: Vec<CellKey> = center.neighborhood().collect();
        assert_eq!(keys.len(), 27);
        assert!(keys.contains(&center));
        let mut sorted = keys.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 27);
    }

    #[test]
    fn neighborhood_at_key_range_limits_skips_unrepresentable_keys() {
        let corner = CellKey::new(i64::MAX, i64::MIN, 0);
        let keys: Vec<CellKey> = corner.neighborhood().collect();
        assert_eq!(keys.len(), 12);
        assert!(keys.contains(&corner));
    }

    #[test]
    fn infinite_positions_are_bucketed_and_queried_without_overflow() {
        let points = vec![Point3::new(f64::INFINITY, 0.0, 0.0), Point3::origin()];
        let grid = SpatialHashGrid::build(&points, 1.0).unwrap();
        let far: Vec<usize> = grid.neighbors_of_point(&points[0]).collect();
        assert_eq!(far, vec![0]);
        let near: Vec<usize> = grid.neighbors_of_point(&points[1]).collect();
        assert_eq!(near, vec![1]);
    }

    #[test]
    fn build_places_every_item_in_exactly_one_bucket() {
        let points: Vec<Point3<f64>> = (0..50)
            .map(|i| {
                let f = i as f64;
                Point3::new(f * 0.7 - 10.0, (f * 1.3).sin() * 8.0, f * -0.45)
            })
            .collect();
        let grid = SpatialHashGrid::build(&points, 2.0).unwrap();

        let mut seen = vec![0usize; points.len()];
        for (key, bucket) in grid.cells() {
            for &idx in bucket {
                seen[idx] += 1;
                assert_eq!(CellKey::of(&points[idx], 2.0), *key);
            }
        }
        assert!(seen.iter().all(|&count| count == 1));
        assert_eq!(grid.len(), points.len());
    }

    #[test]
    fn bucket_preserves_insertion_order() {
        let points = vec![
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(5.0, 5.0, 5.0),
            Point3::new(0.1, 0.2, 0.3),
        ];
        let grid = SpatialHashGrid::build(&points, 1.0).unwrap();
        assert_eq!(grid.bucket(&CellKey::new(0, 0, 0)), &[0, 2]);
        assert!(grid.bucket(&CellKey::new(9, 9, 9)).is_empty());
    }

    #[test]
    fn neighbors_returns_adjacent_cells_only() {
        let points = vec![
            Point3::new(0.5, 0.5, 0.5),
            Point3::new(1.5, 0.5, 0.5),
            Point3::new(-0.5, -0.5, -0.5),
            Point3::new(2.5, 0.5, 0.5),
        ];
        let grid = SpatialHashGrid::build(&points, 1.0).unwrap();
        let mut found: Vec<usize> = grid.neighbors(CellKey::new(0, 0, 0)).collect();
        found.sort();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn build_rejects_invalid_cell_size() {
        let points = vec![Point3::origin()];
        assert!(SpatialHashGrid::build(&points, 0.0).is_err());
        assert!(SpatialHashGrid::build(&points, f64::INFINITY).is_err());
        assert!(SpatialHashGrid::build(&points, -1.0).is_err());
    }

    #[test]
    fn build_over_atoms_uses_atom_positions() {
        let atoms = vec![Atom::new("ALA", "CA", Point3::new(3.5, 0.0, 0.0))];
        let grid = SpatialHashGrid::build(&atoms, 3.0).unwrap();
        assert_eq!(grid.bucket(&CellKey::new(1, 0, 0)), &[0]);
        assert_eq!(grid.cell_count(), 1);
    }
}
