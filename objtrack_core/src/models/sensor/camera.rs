// objtrack_core/src/models/sensor/camera.rs

use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{CameraCalibration, FusionParams};
use crate::error::SensorError;
use crate::frames::HomogeneousTransform;
use crate::models::sensor::{FieldOfView, Mounting, SensorKind, SensorModel};
use crate::types::{position_of, SensorHandle, State, POSITION_DIM};

/// Pinhole intrinsics in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f64,
    pub fy: f64,
    pub cx: f64,
    pub cy: f64,
}

impl CameraIntrinsics {
    /// From the calibration layout `[fx, fy, cx, cy]`.
    pub fn from_array(values: [f64; 4]) -> Self {
        let [fx, fy, cx, cy] = values;
        Self { fx, fy, cx, cy }
    }
}

/// A camera whose detections are image coordinates `(i, j)`.
///
/// The projection uses the sensor-frame x axis as the depth axis for the
/// degeneracy check: a point with `x_s == 0` lies on the image plane and has
/// no defined measurement.
#[derive(Debug, Clone)]
pub struct CameraModel {
    handle: SensorHandle,
    mounting: Mounting,
    intrinsics: CameraIntrinsics,
    state_dim: usize,
}

impl CameraModel {
    /// Builds the model from dataset calibration with the default opening
    /// angle. Fails if the extrinsic transform is singular.
    pub fn new(
        handle: SensorHandle,
        calibration: &CameraCalibration,
        params: &FusionParams,
    ) -> Result<Self, SensorError> {
        Self::from_parts(
            handle,
            HomogeneousTransform::from_row_major(&calibration.extrinsic),
            CameraIntrinsics::from_array(calibration.intrinsic),
            FieldOfView::camera_default(),
            params,
        )
    }

    pub fn from_parts(
        handle: SensorHandle,
        vehicle_from_sensor: HomogeneousTransform,
        intrinsics: CameraIntrinsics,
        field_of_view: FieldOfView,
        params: &FusionParams,
    ) -> Result<Self, SensorError> {
        let mounting = Mounting::new(vehicle_from_sensor, field_of_view)?;
        info!(
            sensor = %handle,
            fx = intrinsics.fx,
            fy = intrinsics.fy,
            "creating camera sensor model"
        );
        Ok(Self {
            handle,
            mounting,
            intrinsics,
            state_dim: params.dim_state.max(POSITION_DIM),
        })
    }

    pub fn intrinsics(&self) -> &CameraIntrinsics {
        &self.intrinsics
    }

    /// True on the image plane (`x_s == 0`), where the projection has no
    /// defined measurement.
    fn is_degenerate(&self, pos_sens: &Vector3<f64>) -> bool {
        let degenerate = pos_sens.x == 0.0;
        if degenerate {
            debug!(
                sensor = %self.handle,
                depth = pos_sens.x,
                "camera projection undefined at this position"
            );
        }
        degenerate
    }
}

impl SensorModel for CameraModel {
    fn handle(&self) -> SensorHandle {
        self.handle
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Camera
    }

    fn mounting(&self) -> &Mounting {
        &self.mounting
    }

    fn state_dim(&self) -> usize {
        self.state_dim
    }

    fn in_fov(&self, position: &Vector3<f64>) -> bool {
        let alpha = self.mounting.bearing(position);
        self.mounting.field_of_view().contains(alpha)
    }

    fn get_hx(&self, state: &State) -> Result<DVector<f64>, SensorError> {
        let p = self.mounting.to_sensor_frame(&position_of(state)?);
        if self.is_degenerate(&p) {
            return Err(SensorError::DivisionByZero { depth: p.x });
        }

        let k = &self.intrinsics;
        let i = k.fx * p.x / p.z + k.cx;
        let j = k.fy * p.y / p.z + k.cy;
        Ok(DVector::from_vec(vec![i, j]))
    }

    /// Quotient-rule partials of `i = fx * x_s / z_s + cx` and
    /// `j = fy * y_s / z_s + cy`, where `(x_s, y_s, z_s) = R * p + T`.
    fn get_h(&self, state: &State) -> Result<DMatrix<f64>, SensorError> {
        // The linearization point is undefined exactly where h(x) is.
        let p = self.mounting.to_sensor_frame(&position_of(state)?);
        if self.is_degenerate(&p) {
            return Err(SensorError::JacobianUndefined { depth: p.x });
        }

        let rot = self.mounting.sensor_from_vehicle().rotation();
        let k = &self.intrinsics;
        let z_sq = p.z * p.z;

        let mut h_jac = DMatrix::zeros(SensorKind::Camera.measurement_dim(), self.state_dim);
        for col in 0..POSITION_DIM {
            // d(x_s)/dp = R[0, col], d(y_s)/dp = R[1, col], d(z_s)/dp = R[2, col]
            h_jac[(0, col)] = k.fx * (rot[(0, col)] * p.z - p.x * rot[(2, col)]) / z_sq;
            h_jac[(1, col)] = k.fy * (rot[(1, col)] * p.z - p.y * rot[(2, col)]) / z_sq;
        }
        Ok(h_jac)
    }
}
