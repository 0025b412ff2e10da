//! Non-AR viewer camera: looks at a target from an adjustable distance.

use crate::camera::Camera;
use fauxar_config::ViewerConfig;
use glam::Vec3;

/// Closest the orbit camera may get to its target (meters).
const MIN_DISTANCE: f32 = 0.2;
/// Farthest the orbit camera may get from its target (meters).
const MAX_DISTANCE: f32 = 50.0;

#[derive(Debug, Clone)]
pub struct OrbitView {
    pub target: Vec3,
    /// Camera position relative to the target.
    offset: Vec3,
    zoom_in_factor: f32,
    zoom_out_factor: f32,
    fov_y_degrees: f32,
}

impl OrbitView {
    pub fn new(config: &ViewerConfig) -> Self {
        let mut offset = config.position - config.target;
        if offset.length_squared() < f32::EPSILON {
            offset = Vec3::Z * 3.0;
        }
        Self {
            target: config.target,
            offset,
            zoom_in_factor: config.zoom_in_factor,
            zoom_out_factor: config.zoom_out_factor,
            fov_y_degrees: config.fov_y_degrees,
        }
    }

    pub fn distance(&self) -> f32 {
        self.offset.length()
    }

    pub fn zoom_in(&mut self) {
        self.scale_distance(self.zoom_in_factor);
    }

    pub fn zoom_out(&mut self) {
        self.scale_distance(self.zoom_out_factor);
    }

    fn scale_distance(&mut self, factor: f32) {
        let distance = (self.distance() * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
        self.offset = self.offset.normalize() * distance;
        tracing::debug!(distance, "Viewer zoom");
    }

    /// Orbit around the target by yaw (around +Y) and pitch (around the camera's right axis).
    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        let radius = self.distance();
        let horizontal = Vec3::new(self.offset.x, 0.0, self.offset.z).length();
        let azimuth = self.offset.x.atan2(self.offset.z) + yaw;
        let limit = std::f32::consts::FRAC_PI_2 - 0.05;
        let elevation = (self.offset.y.atan2(horizontal) + pitch).clamp(-limit, limit);

        self.offset = Vec3::new(
            radius * elevation.cos() * azimuth.sin(),
            radius * elevation.sin(),
            radius * elevation.cos() * azimuth.cos(),
        );
    }

    /// Write the orbit pose into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.target + self.offset;
        camera.fov_y_degrees = self.fov_y_degrees;
        camera.look_at(self.target);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_scales_distance() {
        let mut orbit = OrbitView::new(&ViewerConfig::default());
        let start = orbit.distance();
        orbit.zoom_in();
        assert!((orbit.distance() - start * 0.9).abs() < 1e-5);
        orbit.zoom_out();
        assert!((orbit.distance() - start * 0.99).abs() < 1e-5);
    }

    #[test]
    fn zoom_is_bounded() {
        let mut orbit = OrbitView::new(&ViewerConfig::default());
        for _ in 0..200 {
            orbit.zoom_in();
        }
        assert!((orbit.distance() - MIN_DISTANCE).abs() < 1e-5);
    }

    #[test]
    fn orbit_keeps_radius_and_faces_target() {
        let mut orbit = OrbitView::new(&ViewerConfig::default());
        let radius = orbit.distance();
        orbit.orbit(0.8, 0.2);
        assert!((orbit.distance() - radius).abs() < 1e-4);

        let mut camera = Camera::new();
        orbit.apply(&mut camera);
        let expected = (orbit.target - camera.position).normalize();
        assert!((camera.forward() - expected).length() < 1e-5);
    }
}
