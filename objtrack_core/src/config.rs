// objtrack_core/src/config.rs

//! Tracking parameters shared by every sensor model and measurement.
//!
//! Values are layered with `figment`: built-in defaults first, then whatever a
//! TOML source overrides. Unknown keys are rejected so typos surface early.

use std::path::Path;

use figment::{
    providers::{Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

/// Noise, timing and dimensionality settings for the measurement models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct FusionParams {
    /// Time between two consecutive frames, in seconds.
    pub dt: f64,
    /// Lidar measurement noise standard deviations (meters).
    pub sigma_lidar_x: f64,
    pub sigma_lidar_y: f64,
    pub sigma_lidar_z: f64,
    /// Camera measurement noise standard deviations (pixels).
    pub sigma_camera_i: f64,
    pub sigma_camera_j: f64,
    /// Length of the tracked state vector; sizes the Jacobian's columns.
    pub dim_state: usize,
}

impl Default for FusionParams {
    fn default() -> Self {
        Self {
            dt: 0.1,
            sigma_lidar_x: 0.1,
            sigma_lidar_y: 0.1,
            sigma_lidar_z: 0.1,
            sigma_camera_i: 5.0,
            sigma_camera_j: 5.0,
            dim_state: 6,
        }
    }
}

impl FusionParams {
    /// Loads parameters from a TOML file on top of the defaults.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        info!("Loading fusion parameters from: {}", path.display());
        Self::extract(Self::figment().merge(Toml::file(path)))
    }

    /// Loads parameters from an in-memory TOML document on top of the defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Self::extract(Self::figment().merge(Toml::string(source)))
    }

    /// The base figment holding the defaults. Callers can merge further
    /// providers onto it before extracting.
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(FusionParams::default()))
    }

    /// Extracts and validates parameters from an arbitrary figment.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let params: FusionParams = figment.extract()?;
        params.validate()?;
        Ok(params)
    }

    /// Checks that the values describe a usable configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "dt",
                reason: format!("must be a positive number of seconds, got {}", self.dt),
            });
        }

        let sigmas = [
            ("sigma_lidar_x", self.sigma_lidar_x),
            ("sigma_lidar_y", self.sigma_lidar_y),
            ("sigma_lidar_z", self.sigma_lidar_z),
            ("sigma_camera_i", self.sigma_camera_i),
            ("sigma_camera_j", self.sigma_camera_j),
        ];
        for (name, sigma) in sigmas {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("standard deviation must be positive, got {sigma}"),
                });
            }
        }

        if self.dim_state < crate::types::POSITION_DIM {
            return Err(ConfigError::InvalidParameter {
                name: "dim_state",
                reason: format!(
                    "state must hold at least a 3D position, got {}",
                    self.dim_state
                ),
            });
        }

        Ok(())
    }

    /// Timestamp of a frame; frame indices start at 1.
    pub fn frame_timestamp(&self, frame_index: u32) -> f64 {
        (f64::from(frame_index) - 1.0) * self.dt
    }
}

/// Calibration data for one camera as delivered by the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CameraCalibration {
    /// Sensor-to-vehicle transform, flattened row-major 4x4.
    pub extrinsic: [f64; 16],
    /// `[fx, fy, cx, cy]` in pixels.
    pub intrinsic: [f64; 4],
}
