use nalgebra::{Point3, Vector3};

/// A point on a triangulated molecular surface with its outward normal.
///
/// The normal is taken as given by the mesh producer and is not assumed to be of
/// unit length; consumers only ever use its sign against a direction vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceVertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

impl SurfaceVertex {
    pub fn new(position: Point3<f64>, normal: Vector3<f64>) -> Self {
        Self { position, normal }
    }

    /// Returns `true` when `point` lies on the side the normal points away from.
    ///
    /// A point exactly on the tangent plane (zero dot product) is treated as outside.
    #[inline]
    pub fn is_behind(&self, point: &Point3<f64>) -> bool {
        self.normal.dot(&(point - self.position)) < 0.0
    }
}
