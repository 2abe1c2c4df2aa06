// objtrack_core/src/prelude.rs

// --- Core Abstractions ---
pub use crate::models::sensor::{SensorKind, SensorModel};
pub use crate::registry::SensorTable;
pub use crate::types::{SensorHandle, State};

// --- Core Data Structures ---
pub use crate::config::{CameraCalibration, FusionParams};
pub use crate::error::{ConfigError, SensorError};
pub use crate::frames::HomogeneousTransform;
pub use crate::measurements::{Measurement, ObjectGeometry};

// --- Concrete Model Implementations ---
pub use crate::models::sensor::{CameraIntrinsics, CameraModel, FieldOfView, LidarModel, Mounting};
