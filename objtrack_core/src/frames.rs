// objtrack_core/src/frames.rs

use nalgebra::{Isometry3, Matrix3, Matrix4, Vector3};

use crate::error::SensorError;

/// A 4x4 homogeneous transform (rotation + translation) between two frames.
///
/// Naming follows `target_from_source`: a `vehicle_from_sensor` transform
/// maps sensor-frame coordinates into the vehicle frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HomogeneousTransform {
    matrix: Matrix4<f64>,
}

impl HomogeneousTransform {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    pub fn from_matrix(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }

    /// Builds the transform from a flattened, row-major 4x4 matrix, the layout
    /// extrinsic calibration files use.
    pub fn from_row_major(values: &[f64; 16]) -> Self {
        Self {
            matrix: Matrix4::from_row_slice(values),
        }
    }

    pub fn from_isometry(isometry: &Isometry3<f64>) -> Self {
        Self {
            matrix: isometry.to_homogeneous(),
        }
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// The upper-left 3x3 block.
    pub fn rotation(&self) -> Matrix3<f64> {
        self.matrix.fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// The upper-right 3x1 block.
    pub fn translation(&self) -> Vector3<f64> {
        self.matrix.fixed_view::<3, 1>(0, 3).into_owned()
    }

    /// Returns the inverse transform, failing if the matrix is singular.
    pub fn try_inverse(&self) -> Result<Self, SensorError> {
        self.matrix
            .try_inverse()
            .filter(|inv| inv.iter().all(|v| v.is_finite()))
            .map(Self::from_matrix)
            .ok_or(SensorError::SingularTransform)
    }

    /// Maps a point through the transform using homogeneous coordinates
    /// (w = 1), returning the first three rows.
    pub fn transform_point(&self, point: &Vector3<f64>) -> Vector3<f64> {
        let homogeneous = self.matrix * point.push(1.0);
        homogeneous.fixed_rows::<3>(0).into_owned()
    }
}

impl Default for HomogeneousTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl std::ops::Mul for HomogeneousTransform {
    type Output = HomogeneousTransform;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_matrix(self.matrix * rhs.matrix)
    }
}
