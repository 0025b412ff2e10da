//! Conversion of device-orientation Euler angles into a camera quaternion.

use crate::types::{DeviceOrientationEvent, OrientationSample};
use glam::{EulerRot, Quat};
use std::f32::consts::FRAC_PI_2;

/// Convert an `(alpha, beta, gamma)` reading into world-space camera attitude.
///
/// The device frame is rotated by `Y(alpha) X(beta) Z(-gamma)`, then tipped
/// -90 degrees about X so the camera looks out of the back of the device, then
/// rolled by the current screen orientation.
pub fn quat_from_device_orientation(event: &DeviceOrientationEvent) -> Quat {
    let device = Quat::from_euler(
        EulerRot::YXZ,
        event.alpha.to_radians(),
        event.beta.to_radians(),
        -event.gamma.to_radians(),
    );
    let back_camera = Quat::from_rotation_x(-FRAC_PI_2);
    let screen = Quat::from_rotation_z(-event.screen_orientation.to_radians());

    (device * back_camera * screen).normalize()
}

impl From<DeviceOrientationEvent> for OrientationSample {
    fn from(event: DeviceOrientationEvent) -> Self {
        Self {
            quaternion: quat_from_device_orientation(&event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn approx(a: Vec3, b: Vec3) {
        assert!((a - b).length() < 1e-5, "{a} != {b}");
    }

    #[test]
    fn flat_device_looks_down() {
        let q = quat_from_device_orientation(&DeviceOrientationEvent::default());
        approx(q * Vec3::NEG_Z, Vec3::NEG_Y);
    }

    #[test]
    fn upright_device_looks_forward() {
        let q = quat_from_device_orientation(&DeviceOrientationEvent {
            beta: 90.0,
            ..Default::default()
        });
        approx(q * Vec3::NEG_Z, Vec3::NEG_Z);
        approx(q * Vec3::Y, Vec3::Y);
    }

    #[test]
    fn heading_turns_view_left() {
        let q = quat_from_device_orientation(&DeviceOrientationEvent {
            alpha: 90.0,
            beta: 90.0,
            ..Default::default()
        });
        approx(q * Vec3::NEG_Z, Vec3::NEG_X);
    }

    #[test]
    fn landscape_screen_rolls_camera() {
        let q = quat_from_device_orientation(&DeviceOrientationEvent {
            beta: 90.0,
            screen_orientation: 90.0,
            ..Default::default()
        });
        approx(q * Vec3::NEG_Z, Vec3::NEG_Z);
        approx(q * Vec3::Y, Vec3::X);
    }
}
