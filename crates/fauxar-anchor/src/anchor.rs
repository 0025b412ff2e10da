use fauxar_scene::scene::Transform;
use glam::{Quat, Vec3};

/// The frozen placement of the virtual object.
///
/// Exactly one exists per session. Position and orientation are only
/// meaningful while `placed`; scale survives relocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: f32,
    pub placed: bool,
}

impl Anchor {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            scale: 1.0,
            placed: false,
        }
    }

    pub fn place(&mut self, position: Vec3, orientation: Quat) {
        self.position = position;
        self.orientation = orientation;
        self.placed = true;
    }

    /// Forget position and orientation, keep scale.
    pub fn unplace(&mut self) {
        self.position = Vec3::ZERO;
        self.orientation = Quat::IDENTITY;
        self.placed = false;
    }

    /// Back to a fresh anchor.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Spin around the world vertical axis.
    pub fn rotate_yaw(&mut self, delta: f32) {
        self.orientation = (Quat::from_rotation_y(delta) * self.orientation).normalize();
    }

    pub fn transform(&self) -> Transform {
        Transform {
            position: self.position,
            rotation: self.orientation,
            scale: self.scale,
        }
    }
}

impl Default for Anchor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unplace_keeps_scale() {
        let mut anchor = Anchor::new();
        anchor.scale = 2.5;
        anchor.place(Vec3::new(0.0, 0.0, -2.0), Quat::from_rotation_y(1.0));
        anchor.unplace();
        assert!(!anchor.placed);
        assert_eq!(anchor.scale, 2.5);
        assert_eq!(anchor.position, Vec3::ZERO);
        assert_eq!(anchor.orientation, Quat::IDENTITY);
    }

    #[test]
    fn yaw_accumulates() {
        let mut anchor = Anchor::new();
        anchor.rotate_yaw(0.25);
        anchor.rotate_yaw(0.5);
        let expected = Quat::from_rotation_y(0.75);
        assert!(1.0 - anchor.orientation.dot(expected).abs() < 1e-6);
    }
}
