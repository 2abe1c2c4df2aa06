// objtrack_core/tests/scenarios.rs

use approx::assert_abs_diff_eq;
use nalgebra::{DMatrix, DVector, Vector3};
use objtrack_core::prelude::*;

fn identity_calibration() -> CameraCalibration {
    #[rustfmt::skip]
    let extrinsic = [
        1.0, 0.0, 0.0, 0.0,
        0.0, 1.0, 0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    ];
    CameraCalibration {
        extrinsic,
        intrinsic: [500.0, 500.0, 320.0, 240.0],
    }
}

fn sensor_table(params: &FusionParams) -> SensorTable {
    let mut sensors = SensorTable::new();
    sensors.insert(Box::new(LidarModel::new(SensorHandle(0), params)));
    sensors.insert(Box::new(
        CameraModel::new(SensorHandle(1), &identity_calibration(), params).unwrap(),
    ));
    sensors
}

#[test]
fn lidar_identity_mounting_sees_vehicle_frame_position() {
    let params = FusionParams::default();
    let sensors = sensor_table(&params);
    let lidar = sensors.get(SensorHandle(0)).unwrap();

    let state = State::from_vec(vec![5.0, 2.0, 1.0, 0.0, 0.0, 0.0]);
    assert!(lidar.in_fov(&Vector3::new(5.0, 2.0, 1.0)));
    assert_eq!(lidar.get_hx(&state).unwrap(), DVector::from_vec(vec![5.0, 2.0, 1.0]));
}

#[test]
fn camera_identity_mounting_projects_to_pixels() {
    let params = FusionParams::default();
    let sensors = sensor_table(&params);
    let camera = sensors.get(SensorHandle(1)).unwrap();

    let state = State::from_vec(vec![10.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
    let hx = camera.get_hx(&state).unwrap();
    assert_abs_diff_eq!(hx[0], 2820.0, epsilon = 1e-9);
    assert_abs_diff_eq!(hx[1], 490.0, epsilon = 1e-9);
}

#[test]
fn camera_image_plane_is_a_skippable_fault() {
    let params = FusionParams::default();
    let sensors = sensor_table(&params);
    let camera = sensors.get(SensorHandle(1)).unwrap();

    let degenerate = State::from_vec(vec![0.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
    let hx_err = camera.get_hx(&degenerate).unwrap_err();
    let h_err = camera.get_h(&degenerate).unwrap_err();
    assert!(matches!(hx_err, SensorError::DivisionByZero { .. }));
    assert!(matches!(h_err, SensorError::JacobianUndefined { .. }));
    assert!(hx_err.is_frame_local() && h_err.is_frame_local());

    // The same sensor keeps working for other tracks.
    let healthy = State::from_vec(vec![10.0, 1.0, 2.0, 0.0, 0.0, 0.0]);
    assert!(camera.get_hx(&healthy).is_ok());
    assert!(camera.get_h(&healthy).is_ok());
}

#[test]
fn lidar_detection_becomes_measurement() {
    let params = FusionParams::from_toml_str(
        r#"
        dt = 0.1
        sigma_lidar_x = 0.1
        sigma_lidar_y = 0.1
        sigma_lidar_z = 0.1
        "#,
    )
    .unwrap();
    let sensors = sensor_table(&params);

    let mut meas_list = Vec::new();
    sensors
        .get(SensorHandle(0))
        .unwrap()
        .generate_measurement(11, &[3.0, 1.5, 0.2, 1.7, 2.0, 4.5, 0.3], &params, &mut meas_list)
        .unwrap();

    let meas = &meas_list[0];
    assert_abs_diff_eq!(meas.timestamp(), 1.0, epsilon = 1e-12);
    assert_eq!(meas.z(), &DVector::from_vec(vec![3.0, 1.5, 0.2]));
    assert_abs_diff_eq!(
        *meas.r(),
        DMatrix::from_diagonal(&DVector::from_vec(vec![0.01, 0.01, 0.01])),
        epsilon = 1e-15
    );
    let geometry = meas.geometry().unwrap();
    assert_eq!(geometry.height, 1.7);
    assert_eq!(geometry.width, 2.0);
    assert_eq!(geometry.length, 4.5);
    assert_eq!(geometry.yaw, 0.3);
}

#[test]
fn frame_with_mixed_sensors_feeds_filter_callbacks() {
    let params = FusionParams::default();
    let sensors = sensor_table(&params);
    let lidar_dets: Vec<Vec<f64>> = vec![
        vec![12.0, 0.5, 0.0, 1.6, 1.9, 4.4, 0.0],
        vec![20.0, -3.0, 0.1, 1.5, 2.0, 4.8, 0.05],
    ];
    let camera_dets: Vec<Vec<f64>> = vec![vec![700.0, 260.0]];

    let mut meas_list = Vec::new();
    let n_lidar = sensors
        .generate_measurements(
            SensorHandle(0),
            7,
            lidar_dets.iter().map(Vec::as_slice),
            &params,
            &mut meas_list,
        )
        .unwrap();
    let n_camera = sensors
        .generate_measurements(
            SensorHandle(1),
            7,
            camera_dets.iter().map(Vec::as_slice),
            &params,
            &mut meas_list,
        )
        .unwrap();
    assert_eq!((n_lidar, n_camera), (2, 1));

    let track_state = State::from_vec(vec![12.0, 0.5, 1.0, 5.0, 0.0, 0.0]);
    for meas in &meas_list {
        let sensor = meas.sensor_model(&sensors).unwrap();
        assert_eq!(sensor.kind(), meas.kind());

        let hx = sensor.get_hx(&track_state).unwrap();
        let h_jac = sensor.get_h(&track_state).unwrap();
        assert_eq!(hx.len(), meas.z().len());
        assert_eq!((h_jac.nrows(), h_jac.ncols()), (meas.z().len(), params.dim_state));
        assert_eq!(meas.r().nrows(), sensor.measurement_dim());
        assert_abs_diff_eq!(meas.timestamp(), 0.6, epsilon = 1e-12);
    }
}

#[test]
fn sensors_are_shared_across_worker_threads() {
    let params = FusionParams::default();
    let sensors = sensor_table(&params);

    let per_worker: Vec<Vec<Measurement>> = std::thread::scope(|scope| {
        let workers: Vec<_> = (0..4u32)
            .map(|worker| {
                let sensors = &sensors;
                let params = &params;
                scope.spawn(move || {
                    let mut local = Vec::new();
                    let raw = [600.0 + f64::from(worker), 300.0];
                    sensors
                        .get(SensorHandle(1))
                        .unwrap()
                        .generate_measurement(worker + 1, &raw, params, &mut local)
                        .unwrap();
                    let state = State::from_vec(vec![10.0, f64::from(worker), 2.0, 0.0, 0.0, 0.0]);
                    assert!(sensors.get(SensorHandle(1)).unwrap().get_h(&state).is_ok());
                    local
                })
            })
            .collect();
        workers.into_iter().map(|w| w.join().unwrap()).collect()
    });

    for (worker, local) in per_worker.iter().enumerate() {
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].z()[0], 600.0 + worker as f64);
    }
}
