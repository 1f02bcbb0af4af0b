use super::error::EngineError;
use crate::core::models::bounds::BoundingBox;
use bitvec::vec::BitVec;
use nalgebra::Point3;
use tracing::debug;

/// Whether a lattice stops short of the upper bound or includes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatticeExtent {
    /// `ceil((max - min) / spacing)` cells per axis.
    Exclusive,
    /// One extra plane per axis, so a cell sits on the upper bound itself.
    Inclusive,
}

/// Geometry of a dense, axis-aligned lattice.
///
/// Cells are addressed by `(x, y, z)` with the flattened index
/// `z * (dim_x * dim_y) + y * dim_x + x`. Iterating indices in increasing order
/// therefore scans z outermost and x innermost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeShape {
    origin: Point3<f64>,
    spacing: f64,
    dims: [usize; 3],
}

impl LatticeShape {
    /// Sizes a lattice over `bounds` at `spacing`, refusing to exceed `max_cells`.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NonFiniteBounds`] if either corner is not finite.
    /// - [`EngineError::LatticeTooLarge`] if the cell count exceeds `max_cells`.
    pub fn covering(
        bounds: &BoundingBox,
        spacing: f64,
        extent: LatticeExtent,
        max_cells: usize,
    ) -> Result<Self, EngineError> {
        let finite = bounds.min.iter().chain(bounds.max.iter()).all(|c| c.is_finite());
        if !finite {
            return Err(EngineError::NonFiniteBounds {
                min: bounds.min.coords.into(),
                max: bounds.max.coords.into(),
            });
        }

        let extra = match extent {
            LatticeExtent::Exclusive => 0,
            LatticeExtent::Inclusive => 1,
        };
        let mut dims = [0usize; 3];
        for (axis, dim) in dims.iter_mut().enumerate() {
            let span = ((bounds.max[axis] - bounds.min[axis]) / spacing).ceil().max(0.0);
            *dim = (span as usize).saturating_add(extra);
        }

        let cells = dims
            .iter()
            .fold(1u128, |acc, &d| acc.saturating_mul(d as u128));
        if cells > max_cells as u128 {
            return Err(EngineError::LatticeTooLarge {
                dims,
                cells,
                limit: max_cells,
            });
        }

        debug!(?dims, cells = cells as u64, spacing, "Sized lattice.");
        Ok(Self {
            origin: bounds.min,
            spacing,
            dims,
        })
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[inline]
    pub fn dims(&self) -> [usize; 3] {
        self.dims
    }

    /// Total number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.dims[0] * self.dims[1] * self.dims[2]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z * (self.dims[0] * self.dims[1]) + y * self.dims[0] + x
    }

    #[inline]
    pub fn coords(&self, index: usize) -> [usize; 3] {
        let slice = self.dims[0] * self.dims[1];
        let rem = index % slice;
        [rem % self.dims[0], rem / self.dims[0], index / slice]
    }

    #[inline]
    pub fn position(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + x as f64 * self.spacing,
            self.origin.y + y as f64 * self.spacing,
            self.origin.z + z as f64 * self.spacing,
        )
    }

    #[inline]
    pub fn position_of(&self, index: usize) -> Point3<f64> {
        let [x, y, z] = self.coords(index);
        self.position(x, y, z)
    }

    /// Signed cell coordinates of the cell whose lower corner is at or below `point`.
    /// May lie outside the lattice. `None` for a point with a non-finite coordinate.
    #[inline]
    pub fn floor_cell(&self, point: &Point3<f64>) -> Option<[i64; 3]> {
        let rel = (point - self.origin) / self.spacing;
        rel.iter()
            .all(|c| c.is_finite())
            .then(|| [rel.x.floor() as i64, rel.y.floor() as i64, rel.z.floor() as i64])
    }

    /// Flattened index of signed cell coordinates, or `None` outside the lattice.
    #[inline]
    pub fn checked_index(&self, cell: [i64; 3]) -> Option<usize> {
        let mut c = [0usize; 3];
        for axis in 0..3 {
            if cell[axis] < 0 || cell[axis] >= self.dims[axis] as i64 {
                return None;
            }
            c[axis] = cell[axis] as usize;
        }
        Some(self.index(c[0], c[1], c[2]))
    }

    /// Index of the lattice cell nearest to `point`, or `None` if that cell is
    /// outside the lattice.
    #[inline]
    pub fn nearest_index(&self, point: &Point3<f64>) -> Option<usize> {
        let rel = (point - self.origin) / self.spacing;
        if !rel.iter().all(|c| c.is_finite()) {
            return None;
        }
        self.checked_index([
            rel.x.round() as i64,
            rel.y.round() as i64,
            rel.z.round() as i64,
        ])
    }

    /// Face-adjacent in-bounds neighbours of a cell.
    pub fn face_neighbors(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        const OFFSETS: [[i64; 3]; 6] = [
            [1, 0, 0],
            [-1, 0, 0],
            [0, 1, 0],
            [0, -1, 0],
            [0, 0, 1],
            [0, 0, -1],
        ];
        let [x, y, z] = self.coords(index);
        OFFSETS.iter().filter_map(move |o| {
            self.checked_index([x as i64 + o[0], y as i64 + o[1], z as i64 + o[2]])
        })
    }
}

/// A lattice with one bit of mark state per cell.
#[derive(Debug, Clone)]
pub struct VoxelLattice {
    shape: LatticeShape,
    marks: BitVec,
}

impl VoxelLattice {
    pub fn new(shape: LatticeShape) -> Self {
        Self {
            marks: BitVec::repeat(false, shape.len()),
            shape,
        }
    }

    #[inline]
    pub fn shape(&self) -> &LatticeShape {
        &self.shape
    }

    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        self.marks.get(index).map(|b| *b).unwrap_or(false)
    }

    /// Marks a cell, returning `true` if it was not marked before.
    #[inline]
    pub fn mark(&mut self, index: usize) -> bool {
        if self.is_marked(index) || index >= self.marks.len() {
            return false;
        }
        self.marks.set(index, true);
        true
    }

    pub fn marked_count(&self) -> usize {
        self.marks.count_ones()
    }
}
