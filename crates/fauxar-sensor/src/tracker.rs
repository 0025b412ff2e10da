use glam::{EulerRot, Quat};

/// Maps raw sensor attitude into camera space.
///
/// When tracking is enabled the tracker captures an offset so that the first
/// target equals the camera orientation at that moment; later samples rotate
/// the target relative to it instead of snapping to the sensor's own zero.
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    offset: Quat,
    manual: Quat,
    enabled: bool,
}

impl OrientationTracker {
    pub fn new() -> Self {
        Self {
            offset: Quat::IDENTITY,
            manual: Quat::IDENTITY,
            enabled: false,
        }
    }

    /// Start (or restart) tracking from the current camera orientation.
    pub fn enable(&mut self, camera: Quat, sensor: Quat) {
        self.offset = (camera * (sensor * self.manual).inverse()).normalize();
        self.enabled = true;
        tracing::info!(offset = ?self.offset, "Orientation tracking enabled");
    }

    pub fn disable(&mut self) {
        if self.enabled {
            tracing::info!("Orientation tracking disabled");
        }
        self.enabled = false;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn offset(&self) -> Quat {
        self.offset
    }

    /// Manual yaw/pitch/roll trim in radians, applied on top of the sensor.
    pub fn set_manual_offset(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.manual = Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll);
    }

    /// Target orientation for a sensor sample, or `None` while disabled.
    pub fn target(&self, sensor: Quat) -> Option<Quat> {
        self.enabled
            .then(|| (self.offset * sensor * self.manual).normalize())
    }
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn same_rotation(a: Quat, b: Quat) -> bool {
        1.0 - a.dot(b).abs() < 1e-6
    }

    #[test]
    fn disabled_tracker_has_no_target() {
        let tracker = OrientationTracker::new();
        assert!(tracker.target(Quat::IDENTITY).is_none());
    }

    #[test]
    fn enable_then_read_has_zero_jump() {
        let camera = Quat::from_rotation_y(0.7) * Quat::from_rotation_x(-0.2);
        let sensor = Quat::from_rotation_z(1.1) * Quat::from_rotation_x(0.4);

        let mut tracker = OrientationTracker::new();
        tracker.enable(camera, sensor);

        assert!(same_rotation(tracker.target(sensor).unwrap(), camera));
    }

    #[test]
    fn zero_jump_holds_with_manual_trim() {
        let camera = Quat::from_rotation_y(-0.3);
        let sensor = Quat::from_rotation_x(0.9);

        let mut tracker = OrientationTracker::new();
        tracker.set_manual_offset(0.5, 0.1, -0.2);
        tracker.enable(camera, sensor);

        assert!(same_rotation(tracker.target(sensor).unwrap(), camera));
    }

    #[test]
    fn sensor_rotation_carries_over_to_target() {
        let camera = Quat::from_rotation_x(-0.3);
        let turn = Quat::from_rotation_y(0.25);

        let mut tracker = OrientationTracker::new();
        tracker.enable(camera, Quat::IDENTITY);

        let target = tracker.target(turn).unwrap();
        let forward = target * Vec3::NEG_Z;
        let expected = camera * turn * Vec3::NEG_Z;
        assert!((forward - expected).length() < 1e-5);
    }

    #[test]
    fn reenable_recomputes_offset() {
        let mut tracker = OrientationTracker::new();
        tracker.enable(Quat::IDENTITY, Quat::from_rotation_y(1.0));
        tracker.disable();
        assert!(!tracker.is_enabled());

        let camera = Quat::from_rotation_y(0.4);
        let sensor = Quat::from_rotation_x(-0.6);
        tracker.enable(camera, sensor);
        assert!(same_rotation(tracker.target(sensor).unwrap(), camera));
    }
}
