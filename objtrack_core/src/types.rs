// objtrack_core/src/types.rs

use nalgebra::{DVector, Vector3};

use crate::error::SensorError;

// --- Core Type Aliases ---
/// A track's state vector. Position occupies the first three entries.
pub type State = DVector<f64>;

/// Number of leading state entries that hold the object's position.
pub const POSITION_DIM: usize = 3;

// --- Core Identifier ---
/// A generic, framework-agnostic identifier for a physical sensor.
/// Measurements carry this instead of owning their sensor model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct SensorHandle(pub u32);

impl std::fmt::Display for SensorHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sensor#{}", self.0)
    }
}

/// Extracts the position block (first three entries) of a state vector.
pub fn position_of(state: &State) -> Result<Vector3<f64>, SensorError> {
    if state.len() < POSITION_DIM {
        return Err(SensorError::StateTooShort {
            expected: POSITION_DIM,
            found: state.len(),
        });
    }
    Ok(state.fixed_rows::<3>(0).into_owned())
}
