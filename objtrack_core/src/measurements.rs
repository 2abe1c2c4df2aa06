// objtrack_core/src/measurements.rs

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::config::FusionParams;
use crate::error::SensorError;
use crate::models::sensor::{SensorKind, SensorModel};
use crate::registry::SensorTable;
use crate::types::SensorHandle;

/// Object extent reported alongside a lidar detection. Carried through for
/// downstream association logic; the filter math never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ObjectGeometry {
    pub height: f64,
    pub width: f64,
    pub length: f64,
    pub yaw: f64,
}

/// One detection from one sensor in one frame.
///
/// Immutable once built. The generating sensor is referenced by handle only;
/// resolve it through the `SensorTable` that owns the models.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    timestamp: f64,
    z: DVector<f64>,
    r: DMatrix<f64>,
    sensor: SensorHandle,
    kind: SensorKind,
    geometry: Option<ObjectGeometry>,
}

impl Measurement {
    /// Builds a measurement from a raw detection vector.
    ///
    /// * Lidar: `raw = [x, y, z, height, width, length, yaw, ..]`
    /// * Camera: `raw = [i, j, ..]`
    ///
    /// Extra trailing fields are ignored; too few fields is an error.
    pub fn new<S: SensorModel + ?Sized>(
        frame_index: u32,
        raw_detection: &[f64],
        sensor: &S,
        params: &FusionParams,
    ) -> Result<Self, SensorError> {
        let kind = sensor.kind();
        if raw_detection.len() < kind.detection_len() {
            return Err(SensorError::MalformedDetection {
                kind,
                expected: kind.detection_len(),
                found: raw_detection.len(),
            });
        }

        let dim = kind.measurement_dim();
        let z = DVector::from_column_slice(&raw_detection[..dim]);
        let (sigmas, geometry) = match kind {
            SensorKind::Lidar => (
                vec![
                    params.sigma_lidar_x,
                    params.sigma_lidar_y,
                    params.sigma_lidar_z,
                ],
                Some(ObjectGeometry {
                    height: raw_detection[3],
                    width: raw_detection[4],
                    length: raw_detection[5],
                    yaw: raw_detection[6],
                }),
            ),
            SensorKind::Camera => (vec![params.sigma_camera_i, params.sigma_camera_j], None),
        };
        let variances = DVector::from_iterator(dim, sigmas.into_iter().map(|s| s * s));

        Ok(Self {
            timestamp: params.frame_timestamp(frame_index),
            z,
            r: DMatrix::from_diagonal(&variances),
            sensor: sensor.handle(),
            kind,
            geometry,
        })
    }

    /// Seconds since the first frame.
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }

    /// The measurement vector.
    pub fn z(&self) -> &DVector<f64> {
        &self.z
    }

    /// The measurement noise covariance.
    pub fn r(&self) -> &DMatrix<f64> {
        &self.r
    }

    pub fn sensor(&self) -> SensorHandle {
        self.sensor
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    /// Lidar object extent; `None` for camera measurements.
    pub fn geometry(&self) -> Option<&ObjectGeometry> {
        self.geometry.as_ref()
    }

    /// Looks up the model that produced this measurement.
    pub fn sensor_model<'a>(
        &self,
        sensors: &'a SensorTable,
    ) -> Result<&'a dyn SensorModel, SensorError> {
        sensors.get(self.sensor)
    }
}
