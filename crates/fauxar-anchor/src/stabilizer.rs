use crate::anchor::Anchor;
use fauxar_config::{SmoothingConfig, StabilizationMode};
use fauxar_scene::scene::Transform;
use glam::{Quat, Vec3};

/// Smooths the tracked orientation and derives the rendered transforms.
///
/// Each frame the smoothed orientation slerps toward the tracker target at a
/// rate picked from three tiers by the remaining angular error: small errors
/// move slowly to hide jitter, large ones catch up quickly to limit lag.
#[derive(Debug, Clone)]
pub struct Stabilizer {
    config: SmoothingConfig,
    mode: StabilizationMode,
    current: Quat,
    /// Last container position, kept only when position smoothing is on.
    smoothed_position: Option<Vec3>,
}

impl Stabilizer {
    pub fn new(config: &SmoothingConfig, mode: StabilizationMode) -> Self {
        Self {
            config: config.clone(),
            mode,
            current: Quat::IDENTITY,
            smoothed_position: None,
        }
    }

    pub fn mode(&self) -> StabilizationMode {
        self.mode
    }

    /// Smoothed device orientation.
    pub fn current(&self) -> Quat {
        self.current
    }

    /// Jump straight to `orientation` without smoothing.
    pub fn reset(&mut self, orientation: Quat) {
        self.current = orientation.normalize();
        self.smoothed_position = None;
    }

    pub fn rate_for(&self, angle: f32) -> f32 {
        if angle > self.config.fast_threshold {
            self.config.fast_rate
        } else if angle > self.config.mid_threshold {
            self.config.mid_rate
        } else {
            self.config.base_rate
        }
    }

    /// Advance one frame toward `target`.
    pub fn step(&mut self, target: Quat) -> Quat {
        let angle = self.current.angle_between(target);
        let rate = self.rate_for(angle).clamp(0.0, 1.0);
        self.current = self.current.slerp(target, rate).normalize();
        self.current
    }

    /// Orientation the renderer's camera should use.
    pub fn camera_orientation(&self) -> Quat {
        match self.mode {
            StabilizationMode::CameraRotates => self.current,
            StabilizationMode::WorldCounterRotates => Quat::IDENTITY,
        }
    }

    /// Map a world point into the frame the renderer draws in.
    pub fn to_render_frame(&self, point: Vec3, eye: Vec3) -> Vec3 {
        match self.mode {
            StabilizationMode::CameraRotates => point,
            StabilizationMode::WorldCounterRotates => eye + self.current.inverse() * (point - eye),
        }
    }

    /// Container transform for a placed anchor, seen from `eye`.
    ///
    /// Derived from the anchor and the current correction only; the optional
    /// position smoothing is the single piece of per-frame state.
    pub fn container_transform(&mut self, anchor: &Anchor, eye: Vec3) -> Transform {
        let mut transform = match self.mode {
            StabilizationMode::CameraRotates => anchor.transform(),
            StabilizationMode::WorldCounterRotates => Transform {
                position: self.to_render_frame(anchor.position, eye),
                rotation: (self.current.inverse() * anchor.orientation).normalize(),
                scale: anchor.scale,
            },
        };

        if let Some(rate) = self.config.position_smoothing {
            let position = match self.smoothed_position {
                Some(previous) => previous.lerp(transform.position, rate.clamp(0.0, 1.0)),
                None => transform.position,
            };
            self.smoothed_position = Some(position);
            transform.position = position;
        }
        transform
    }

    /// Drop position smoothing history (e.g. after the anchor moves).
    pub fn clear_position_history(&mut self) {
        self.smoothed_position = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stabilizer(mode: StabilizationMode) -> Stabilizer {
        Stabilizer::new(&SmoothingConfig::default(), mode)
    }

    #[test]
    fn rate_tiers() {
        let s = stabilizer(StabilizationMode::CameraRotates);
        assert_eq!(s.rate_for(0.05), 0.18);
        assert_eq!(s.rate_for(0.15), 0.18);
        assert_eq!(s.rate_for(0.3), 0.28);
        assert_eq!(s.rate_for(0.5), 0.28);
        assert_eq!(s.rate_for(1.2), 0.45);
    }

    #[test]
    fn step_moves_partway() {
        let mut s = stabilizer(StabilizationMode::CameraRotates);
        let target = Quat::from_rotation_y(1.0);
        s.step(target);
        // Large error uses the fast tier.
        let moved = s.current().angle_between(Quat::IDENTITY);
        assert!((moved - 0.45).abs() < 1e-2, "{moved}");
    }

    #[test]
    fn converges_to_target() {
        let mut s = stabilizer(StabilizationMode::CameraRotates);
        let target = Quat::from_rotation_x(-0.8) * Quat::from_rotation_y(2.0);
        for _ in 0..200 {
            s.step(target);
        }
        assert!(1.0 - s.current().dot(target).abs() < 1e-6);
    }

    #[test]
    fn camera_rotates_leaves_container_on_anchor() {
        let mut s = stabilizer(StabilizationMode::CameraRotates);
        s.reset(Quat::from_rotation_y(0.7));
        let mut anchor = Anchor::new();
        anchor.place(Vec3::new(0.0, 0.0, -2.0), Quat::IDENTITY);

        let t = s.container_transform(&anchor, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(t.position, anchor.position);
        assert_eq!(s.camera_orientation(), s.current());
    }

    #[test]
    fn counter_rotation_turns_world_about_eye() {
        let mut s = stabilizer(StabilizationMode::WorldCounterRotates);
        let eye = Vec3::new(0.0, 1.6, 0.0);
        s.reset(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));

        let mut anchor = Anchor::new();
        anchor.place(Vec3::new(-2.0, 1.6, 0.0), Quat::IDENTITY);

        let t = s.container_transform(&anchor, eye);
        // Device turned left to face the object, so it now sits straight ahead.
        assert!((t.position - Vec3::new(0.0, 1.6, -2.0)).length() < 1e-5);
        assert_eq!(s.camera_orientation(), Quat::IDENTITY);
    }

    #[test]
    fn position_smoothing_lerps() {
        let config = SmoothingConfig {
            position_smoothing: Some(0.5),
            ..Default::default()
        };
        let mut s = Stabilizer::new(&config, StabilizationMode::CameraRotates);
        let mut anchor = Anchor::new();
        anchor.place(Vec3::ZERO, Quat::IDENTITY);
        s.container_transform(&anchor, Vec3::ZERO);

        anchor.place(Vec3::new(2.0, 0.0, 0.0), Quat::IDENTITY);
        let t = s.container_transform(&anchor, Vec3::ZERO);
        assert!((t.position.x - 1.0).abs() < 1e-6);
    }
}
