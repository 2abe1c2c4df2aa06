// objtrack_core/src/models/sensor/mod.rs

use std::f64::consts::FRAC_PI_2;
use std::fmt::Debug;

use dyn_clone::DynClone;
use nalgebra::{DMatrix, DVector, Vector3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FusionParams;
use crate::error::SensorError;
use crate::frames::HomogeneousTransform;
use crate::measurements::Measurement;
use crate::types::{SensorHandle, State};

pub mod camera;
pub mod lidar;

pub use camera::{CameraIntrinsics, CameraModel};
pub use lidar::LidarModel;

/// The closed set of sensor kinds the tracker understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SensorKind {
    Lidar,
    Camera,
}

impl SensorKind {
    /// Length of the measurement vector `z`.
    pub fn measurement_dim(self) -> usize {
        match self {
            SensorKind::Lidar => 3,
            SensorKind::Camera => 2,
        }
    }

    /// Minimum number of fields a raw detection of this kind carries.
    /// Lidar: `[x, y, z, height, width, length, yaw]`. Camera: `[i, j]`.
    pub fn detection_len(self) -> usize {
        match self {
            SensorKind::Lidar => 7,
            SensorKind::Camera => 2,
        }
    }
}

impl std::fmt::Display for SensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorKind::Lidar => f.write_str("lidar"),
            SensorKind::Camera => f.write_str("camera"),
        }
    }
}

/// Open bearing interval `(min, max)` in radians. Both boundaries are outside
/// the field of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldOfView")]
pub struct FieldOfView {
    min: f64,
    max: f64,
}

// Unchecked shape read from config; converted through `FieldOfView::new`.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawFieldOfView {
    min: f64,
    max: f64,
}

impl TryFrom<RawFieldOfView> for FieldOfView {
    type Error = SensorError;

    fn try_from(raw: RawFieldOfView) -> Result<Self, Self::Error> {
        FieldOfView::new(raw.min, raw.max)
    }
}

impl FieldOfView {
    pub fn new(min: f64, max: f64) -> Result<Self, SensorError> {
        // `!(min < max)` also rejects NaN bounds.
        if !(min < max) {
            return Err(SensorError::InvalidFieldOfView { min, max });
        }
        Ok(Self { min, max })
    }

    /// Half-plane ahead of the vehicle.
    pub fn lidar_default() -> Self {
        Self {
            min: -FRAC_PI_2,
            max: FRAC_PI_2,
        }
    }

    /// Camera opening with the inaccurate border region removed.
    pub fn camera_default() -> Self {
        Self {
            min: -0.35,
            max: 0.35,
        }
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, bearing: f64) -> bool {
        self.min < bearing && bearing < self.max
    }
}

/// Where a sensor sits on the vehicle and what it can see.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mounting {
    vehicle_from_sensor: HomogeneousTransform,
    sensor_from_vehicle: HomogeneousTransform,
    field_of_view: FieldOfView,
}

impl Mounting {
    /// Fails if `vehicle_from_sensor` cannot be inverted.
    pub fn new(
        vehicle_from_sensor: HomogeneousTransform,
        field_of_view: FieldOfView,
    ) -> Result<Self, SensorError> {
        let sensor_from_vehicle = vehicle_from_sensor.try_inverse()?;
        Ok(Self {
            vehicle_from_sensor,
            sensor_from_vehicle,
            field_of_view,
        })
    }

    /// A sensor that already reports in the vehicle frame.
    pub fn at_vehicle_origin(field_of_view: FieldOfView) -> Self {
        Self {
            vehicle_from_sensor: HomogeneousTransform::identity(),
            sensor_from_vehicle: HomogeneousTransform::identity(),
            field_of_view,
        }
    }

    pub fn vehicle_from_sensor(&self) -> &HomogeneousTransform {
        &self.vehicle_from_sensor
    }

    pub fn sensor_from_vehicle(&self) -> &HomogeneousTransform {
        &self.sensor_from_vehicle
    }

    pub fn field_of_view(&self) -> &FieldOfView {
        &self.field_of_view
    }

    /// Expresses a vehicle-frame position in the sensor frame.
    pub fn to_sensor_frame(&self, position: &Vector3<f64>) -> Vector3<f64> {
        self.sensor_from_vehicle.transform_point(position)
    }

    /// Horizontal bearing `atan2(y, x)` of a vehicle-frame position as seen
    /// from the sensor.
    pub fn bearing(&self, position: &Vector3<f64>) -> f64 {
        let pos_sensor = self.to_sensor_frame(position);
        pos_sensor.y.atan2(pos_sensor.x)
    }
}

// --- SENSOR MODEL TRAIT ---
// Represents the mathematical model of a sensor. `z = h(x) + v`
/// Implementations are immutable after construction and safe to share across
/// threads for concurrent read-only use.
pub trait SensorModel: DynClone + Debug + Send + Sync {
    /// The handle this sensor is registered under.
    fn handle(&self) -> SensorHandle;

    fn kind(&self) -> SensorKind;

    fn mounting(&self) -> &Mounting;

    /// Number of columns of the Jacobian returned by `get_h`.
    fn state_dim(&self) -> usize;

    fn measurement_dim(&self) -> usize {
        self.kind().measurement_dim()
    }

    /// Whether an object at `position` (vehicle frame) can be seen.
    fn in_fov(&self, position: &Vector3<f64>) -> bool;

    /// Predicts the ideal measurement `z_pred = h(x)`. Only the position block
    /// of `state` is used.
    fn get_hx(&self, state: &State) -> Result<DVector<f64>, SensorError>;

    /// Calculates the measurement Jacobian `H = ∂h/∂x` at `state`, sized
    /// `measurement_dim x state_dim`.
    fn get_h(&self, state: &State) -> Result<DMatrix<f64>, SensorError>;

    /// Builds a measurement from one raw detection and appends it to
    /// `measurements`. Earlier entries are left untouched.
    fn generate_measurement(
        &self,
        frame_index: u32,
        raw_detection: &[f64],
        params: &FusionParams,
        measurements: &mut Vec<Measurement>,
    ) -> Result<(), SensorError> {
        let meas = Measurement::new(frame_index, raw_detection, self, params)?;
        debug!(
            sensor = %self.handle(),
            kind = %self.kind(),
            frame_index,
            timestamp = meas.timestamp(),
            "generated measurement"
        );
        measurements.push(meas);
        Ok(())
    }
}

// This macro automatically generates the implementation of `Clone` for `Box<dyn SensorModel>`.
dyn_clone::clone_trait_object!(SensorModel);
