// objtrack_core/src/error.rs

use thiserror::Error;

use crate::models::sensor::SensorKind;
use crate::types::SensorHandle;

/// Faults raised by sensor models and measurement construction.
///
/// `DivisionByZero` and `JacobianUndefined` are frame-local: the caller should
/// skip the update for that measurement and carry on with the rest.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    #[error("vehicle-from-sensor transform is singular and cannot be inverted")]
    SingularTransform,

    #[error("field of view ({min}, {max}) is empty; min must be below max")]
    InvalidFieldOfView { min: f64, max: f64 },

    #[error("division by zero in camera projection (sensor-frame depth {depth})")]
    DivisionByZero { depth: f64 },

    #[error("Jacobian not defined at this state (sensor-frame depth {depth})")]
    JacobianUndefined { depth: f64 },

    #[error("state vector has {found} entries, need at least {expected}")]
    StateTooShort { expected: usize, found: usize },

    #[error("{kind} detection has {found} fields, need at least {expected}")]
    MalformedDetection {
        kind: SensorKind,
        expected: usize,
        found: usize,
    },

    #[error("no sensor registered under {0}")]
    UnknownSensor(SensorHandle),
}

impl SensorError {
    /// True for the degenerate-geometry faults that only invalidate the
    /// current measurement update.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            SensorError::DivisionByZero { .. } | SensorError::JacobianUndefined { .. }
        )
    }
}

/// Failures while loading or validating `FusionParams`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load(Box::new(err))
    }
}
