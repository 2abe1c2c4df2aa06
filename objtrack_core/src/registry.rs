// objtrack_core/src/registry.rs

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::FusionParams;
use crate::error::SensorError;
use crate::measurements::Measurement;
use crate::models::sensor::SensorModel;
use crate::types::SensorHandle;

/// Owns every sensor model for the run. Measurements refer back into this
/// table by `SensorHandle`.
#[derive(Debug, Clone, Default)]
pub struct SensorTable {
    // A map from a sensor's handle to its specific measurement model.
    sensors: HashMap<SensorHandle, Box<dyn SensorModel>>,
}

impl SensorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a sensor under its own handle, returning any model that was
    /// previously registered there.
    pub fn insert(&mut self, sensor: Box<dyn SensorModel>) -> Option<Box<dyn SensorModel>> {
        let handle = sensor.handle();
        info!(sensor = %handle, kind = %sensor.kind(), "registering sensor");
        let previous = self.sensors.insert(handle, sensor);
        if previous.is_some() {
            warn!(sensor = %handle, "replaced an already registered sensor");
        }
        previous
    }

    pub fn get(&self, handle: SensorHandle) -> Result<&dyn SensorModel, SensorError> {
        self.sensors
            .get(&handle)
            .map(|sensor| sensor.as_ref())
            .ok_or(SensorError::UnknownSensor(handle))
    }

    pub fn contains(&self, handle: SensorHandle) -> bool {
        self.sensors.contains_key(&handle)
    }

    pub fn len(&self) -> usize {
        self.sensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sensors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn SensorModel> {
        self.sensors.values().map(|sensor| sensor.as_ref())
    }

    /// Appends one measurement per raw detection of a frame from one sensor.
    ///
    /// Malformed detections are logged and skipped so the rest of the frame
    /// still makes it into the list. Returns how many measurements were added.
    pub fn generate_measurements<'d, I>(
        &self,
        handle: SensorHandle,
        frame_index: u32,
        raw_detections: I,
        params: &FusionParams,
        measurements: &mut Vec<Measurement>,
    ) -> Result<usize, SensorError>
    where
        I: IntoIterator<Item = &'d [f64]>,
    {
        let sensor = self.get(handle)?;
        let start_len = measurements.len();
        for (idx, raw) in raw_detections.into_iter().enumerate() {
            if let Err(err) = sensor.generate_measurement(frame_index, raw, params, measurements) {
                warn!(sensor = %handle, frame_index, detection = idx, "skipping detection: {err}");
            }
        }
        Ok(measurements.len() - start_len)
    }
}
