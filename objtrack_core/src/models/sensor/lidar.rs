// objtrack_core/src/models/sensor/lidar.rs

use nalgebra::{DMatrix, DVector, Vector3};
use tracing::info;

use crate::config::FusionParams;
use crate::error::SensorError;
use crate::frames::HomogeneousTransform;
use crate::models::sensor::{FieldOfView, Mounting, SensorKind, SensorModel};
use crate::types::{position_of, SensorHandle, State, POSITION_DIM};

/// A lidar whose object detections are 3D positions.
///
/// Detections are normally already expressed in the vehicle frame, so the
/// mounting transform is the identity and `h(x)` is just the position.
#[derive(Debug, Clone)]
pub struct LidarModel {
    handle: SensorHandle,
    mounting: Mounting,
    state_dim: usize,
}

impl LidarModel {
    /// A lidar reporting in the vehicle frame.
    pub fn new(handle: SensorHandle, params: &FusionParams) -> Self {
        info!(sensor = %handle, "creating lidar sensor model");
        Self {
            handle,
            mounting: Mounting::at_vehicle_origin(FieldOfView::lidar_default()),
            state_dim: params.dim_state.max(POSITION_DIM),
        }
    }

    /// A lidar reporting in its own frame, mounted at `vehicle_from_sensor`.
    pub fn with_mounting(
        handle: SensorHandle,
        vehicle_from_sensor: HomogeneousTransform,
        field_of_view: FieldOfView,
        params: &FusionParams,
    ) -> Result<Self, SensorError> {
        let mounting = Mounting::new(vehicle_from_sensor, field_of_view)?;
        info!(sensor = %handle, "creating mounted lidar sensor model");
        Ok(Self {
            handle,
            mounting,
            state_dim: params.dim_state.max(POSITION_DIM),
        })
    }
}

impl SensorModel for LidarModel {
    fn handle(&self) -> SensorHandle {
        self.handle
    }

    fn kind(&self) -> SensorKind {
        SensorKind::Lidar
    }

    fn mounting(&self) -> &Mounting {
        &self.mounting
    }

    fn state_dim(&self) -> usize {
        self.state_dim
    }

    /// The lidar covers the whole region of interest.
    fn in_fov(&self, _position: &Vector3<f64>) -> bool {
        true
    }

    fn get_hx(&self, state: &State) -> Result<DVector<f64>, SensorError> {
        let pos_veh = position_of(state)?;
        let pos_sens = self.mounting.to_sensor_frame(&pos_veh);
        Ok(DVector::from_column_slice(pos_sens.as_slice()))
    }

    /// `h` is affine in the position, so `H` holds the rotation block of
    /// `sensor_from_vehicle` and zeros elsewhere.
    fn get_h(&self, state: &State) -> Result<DMatrix<f64>, SensorError> {
        position_of(state)?;
        let mut h_jac = DMatrix::zeros(POSITION_DIM, self.state_dim);
        h_jac
            .fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.mounting.sensor_from_vehicle().rotation());
        Ok(h_jac)
    }
}
