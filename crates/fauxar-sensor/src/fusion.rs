use crate::types::{OrientationSample, RawImuSample};
use ahrs::{Ahrs, Madgwick};
use glam::{Quat, Vec3};
use nalgebra::Vector3;
use std::f32::consts::FRAC_PI_2;

/// Gyroscope bias estimate from a stationary window.
#[derive(Debug, Clone)]
struct GyroCalibration {
    remaining: usize,
    sum: Vec3,
    count: usize,
}

impl GyroCalibration {
    fn new(samples: u32) -> Self {
        Self {
            remaining: samples as usize,
            sum: Vec3::ZERO,
            count: 0,
        }
    }

    /// Accumulate one reading. Returns the bias once the window is full.
    fn push(&mut self, gyro: Vec3) -> Option<Vec3> {
        self.sum += gyro;
        self.count += 1;
        self.remaining = self.remaining.saturating_sub(1);
        (self.remaining == 0).then(|| self.sum / self.count as f32)
    }
}

/// Madgwick fusion for sources that only expose raw gyro + accelerometer data.
///
/// Output is withheld until the gyro bias is known, then re-expressed in the
/// y-up world frame the camera uses.
pub struct SensorFusion {
    filter: Madgwick<f64>,
    gyro_bias: Vec3,
    /// `Some` while the bias is still being estimated.
    calibration: Option<GyroCalibration>,
}

impl SensorFusion {
    pub fn new(beta: f32, sample_rate_hz: f32, calibration_samples: u32) -> Self {
        let sample_period = 1.0 / f64::from(sample_rate_hz.max(1.0));
        Self {
            filter: Madgwick::new(sample_period, f64::from(beta)),
            gyro_bias: Vec3::ZERO,
            calibration: Some(GyroCalibration::new(calibration_samples)),
        }
    }

    /// Feed one raw sample. `None` while calibrating or if the filter rejects it.
    pub fn update(&mut self, sample: &RawImuSample) -> Option<OrientationSample> {
        if let Some(calibration) = &mut self.calibration {
            if let Some(bias) = calibration.push(sample.gyro) {
                self.gyro_bias = bias;
                self.calibration = None;
                tracing::info!(?bias, "Gyro bias estimated");
            }
            return None;
        }

        let gyro = to_vector(sample.gyro - self.gyro_bias);
        let accel = to_vector(sample.accel);
        self.filter.update_imu(&gyro, &accel).ok()?;

        Some(OrientationSample {
            quaternion: self.world_attitude(),
        })
    }

    /// Filter output (z up) turned into the y-up world frame.
    fn world_attitude(&self) -> Quat {
        let [x, y, z, w] = [0, 1, 2, 3].map(|i| self.filter.quat.coords[i] as f32);
        (Quat::from_rotation_x(-FRAC_PI_2) * Quat::from_xyzw(x, y, z, w)).normalize()
    }

    /// Discard the bias and estimate it again over `samples` readings.
    pub fn recalibrate(&mut self, samples: u32) {
        self.gyro_bias = Vec3::ZERO;
        self.calibration = Some(GyroCalibration::new(samples));
        tracing::info!(samples, "Gyro recalibration started");
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibration.is_none()
    }
}

fn to_vector(v: Vec3) -> Vector3<f64> {
    Vector3::new(f64::from(v.x), f64::from(v.y), f64::from(v.z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resting(gyro: Vec3) -> RawImuSample {
        RawImuSample {
            gyro,
            accel: Vec3::new(0.0, 0.0, 9.81),
        }
    }

    #[test]
    fn no_output_until_calibrated() {
        let mut fusion = SensorFusion::new(0.1, 100.0, 3);
        assert!(fusion.update(&resting(Vec3::ZERO)).is_none());
        assert!(fusion.update(&resting(Vec3::ZERO)).is_none());
        assert!(fusion.update(&resting(Vec3::ZERO)).is_none());
        assert!(fusion.is_calibrated());
        assert!(fusion.update(&resting(Vec3::ZERO)).is_some());
    }

    #[test]
    fn bias_is_removed() {
        let bias = Vec3::new(0.02, -0.01, 0.03);
        let mut fusion = SensorFusion::new(0.1, 100.0, 10);
        for _ in 0..10 {
            fusion.update(&resting(bias));
        }
        assert!((fusion.gyro_bias - bias).length() < 1e-6);
    }

    #[test]
    fn resting_flat_device_stays_near_identity_frame() {
        let mut fusion = SensorFusion::new(0.1, 100.0, 1);
        fusion.update(&resting(Vec3::ZERO));
        let mut last = None;
        for _ in 0..200 {
            last = fusion.update(&resting(Vec3::ZERO));
        }
        // Flat on a table the back camera points at the floor.
        let forward = last.unwrap().quaternion * Vec3::NEG_Z;
        assert!(forward.y < -0.99, "{forward}");
    }

    #[test]
    fn recalibrate_resets_bias() {
        let mut fusion = SensorFusion::new(0.1, 100.0, 1);
        fusion.update(&resting(Vec3::ONE));
        assert!(fusion.is_calibrated());
        fusion.recalibrate(5);
        assert!(!fusion.is_calibrated());
        assert_eq!(fusion.gyro_bias, Vec3::ZERO);
    }
}
