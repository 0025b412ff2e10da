use crate::projector::Ray;
use fauxar_config::CameraConfig;
use glam::{Mat4, Quat, Vec2, Vec3};

/// Perspective camera.
///
/// In passthrough mode the position stays at eye height and only the
/// orientation changes (from the orientation tracker).
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Aspect ratio (width / height).
    pub aspect_ratio: f32,
    /// Near clipping plane (meters).
    pub near: f32,
    /// Far clipping plane (meters).
    pub far: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            fov_y_degrees: 75.0,
            aspect_ratio: 1.0,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Passthrough camera at eye height, looking down -Z.
    pub fn passthrough(config: &CameraConfig, aspect_ratio: f32) -> Self {
        Self {
            position: Vec3::new(0.0, config.eye_height, 0.0),
            orientation: Quat::IDENTITY,
            fov_y_degrees: config.fov_y_degrees,
            aspect_ratio,
            near: config.near,
            far: config.far,
        }
    }

    /// Point the camera at `target` keeping +Y up.
    pub fn look_at(&mut self, target: Vec3) {
        if (target - self.position).length_squared() < f32::EPSILON {
            return;
        }
        let view = Mat4::look_at_rh(self.position, target, Vec3::Y);
        self.orientation = Quat::from_mat4(&view.inverse()).normalize();
    }

    /// World-space direction the camera looks along.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// View matrix (inverse of camera world transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the camera through a point in normalized device coordinates.
    ///
    /// Unprojects in view space through the frustum `projection_matrix` builds.
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let half_height = (self.fov_y_degrees.to_radians() * 0.5).tan();
        let view_dir = Vec3::new(
            ndc.x * half_height * self.aspect_ratio,
            ndc.y * half_height,
            -1.0,
        );

        Ray {
            origin: self.position,
            direction: (self.orientation * view_dir).normalize(),
        }
    }

    /// Project a world point to NDC. `None` if it lies behind the camera.
    pub fn world_to_ndc(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        Some(Vec2::new(clip.x / clip.w, clip.y / clip.w))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
