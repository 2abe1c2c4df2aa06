// objtrack_core/src/lib.rs

//! Sensor measurement models for multi-sensor EKF object tracking.
//!
//! Each physical sensor is a `SensorModel` that answers three questions for a
//! track's state: can the sensor see it (`in_fov`), what should it measure
//! (`get_hx`), and how does that measurement change with the state (`get_h`).
//! Raw detections become `Measurement`s through `generate_measurement`.

pub mod config;
pub mod error;
pub mod frames;
pub mod measurements;
pub mod models;
pub mod prelude;
pub mod registry;
pub mod types;
