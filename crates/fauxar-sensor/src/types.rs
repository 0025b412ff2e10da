use glam::{Quat, Vec3};

/// Raw reading from a device IMU.
#[derive(Debug, Clone, Copy)]
pub struct RawImuSample {
    /// Gyroscope angular velocity (rad/s).
    pub gyro: Vec3,
    /// Accelerometer linear acceleration (m/s^2).
    pub accel: Vec3,
}

/// Attitude reported by a device-orientation API, in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DeviceOrientationEvent {
    /// Rotation around the device z axis (compass heading), 0..360.
    pub alpha: f32,
    /// Front-to-back tilt around the device x axis, -180..180.
    pub beta: f32,
    /// Left-to-right tilt around the device y axis, -90..90.
    pub gamma: f32,
    /// Screen rotation relative to the device's natural orientation: 0, 90, -90 or 180.
    pub screen_orientation: f32,
}

/// Input delivered by the platform sensor glue.
#[derive(Debug, Clone, Copy)]
pub enum SensorEvent {
    DeviceOrientation(DeviceOrientationEvent),
    RawImu(RawImuSample),
}

/// Device attitude in world space (y up, camera looking out of the back of the device).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationSample {
    pub quaternion: Quat,
}

impl Default for OrientationSample {
    fn default() -> Self {
        Self {
            quaternion: Quat::IDENTITY,
        }
    }
}
