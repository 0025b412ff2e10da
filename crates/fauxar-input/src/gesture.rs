use fauxar_config::GestureConfig;
use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Two-contact pinch/twist tracker.
///
/// Each update compares the contacts against the previous update (not the
/// gesture start), so scale compounds frame to frame and is re-clamped every
/// step.
#[derive(Debug, Clone)]
pub struct PinchTracker {
    min_scale: f32,
    max_scale: f32,
    rotate: bool,
    state: Option<PinchState>,
}

#[derive(Debug, Clone, Copy)]
struct PinchState {
    last_distance: f32,
    last_angle: f32,
}

/// Result of one pinch step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchUpdate {
    /// New uniform scale, already clamped.
    pub scale: f32,
    /// Yaw change in radians (zero when rotation is disabled).
    pub yaw_delta: f32,
}

impl PinchTracker {
    pub fn new(config: &GestureConfig) -> Self {
        Self {
            min_scale: config.min_scale,
            max_scale: config.max_scale.max(config.min_scale),
            rotate: config.rotate,
            state: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn begin(&mut self, a: Vec2, b: Vec2) {
        let (distance, angle) = contact_geometry(a, b);
        self.state = Some(PinchState {
            last_distance: distance,
            last_angle: angle,
        });
    }

    /// Advance the gesture. Returns `None` if no gesture is in progress.
    pub fn update(&mut self, a: Vec2, b: Vec2, current_scale: f32) -> Option<PinchUpdate> {
        let state = self.state.as_mut()?;
        let (distance, angle) = contact_geometry(a, b);

        let factor = if state.last_distance > f32::EPSILON {
            distance / state.last_distance
        } else {
            1.0
        };
        let scale = (current_scale * factor).clamp(self.min_scale, self.max_scale);

        let yaw_delta = if self.rotate {
            wrap_angle(angle - state.last_angle)
        } else {
            0.0
        };

        state.last_distance = distance;
        state.last_angle = angle;

        Some(PinchUpdate { scale, yaw_delta })
    }

    pub fn end(&mut self) {
        self.state = None;
    }
}

fn contact_geometry(a: Vec2, b: Vec2) -> (f32, f32) {
    let d = a - b;
    (d.length(), d.y.atan2(d.x))
}

/// Map an angle difference into (-PI, PI] so crossing the atan2 seam doesn't spin the model.
fn wrap_angle(delta: f32) -> f32 {
    let wrapped = (delta + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> PinchTracker {
        PinchTracker::new(&GestureConfig::default())
    }

    #[test]
    fn spreading_fingers_scales_up() {
        let mut pinch = tracker();
        pinch.begin(Vec2::new(100.0, 100.0), Vec2::new(200.0, 100.0));
        let update = pinch
            .update(Vec2::new(50.0, 100.0), Vec2::new(250.0, 100.0), 1.0)
            .unwrap();
        assert!((update.scale - 2.0).abs() < 1e-5);
        assert!(update.yaw_delta.abs() < 1e-6);
    }

    #[test]
    fn scale_is_clamped_regardless_of_speed() {
        let mut pinch = tracker();
        pinch.begin(Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0));
        let huge = pinch
            .update(Vec2::new(0.0, 0.0), Vec2::new(5000.0, 0.0), 1.0)
            .unwrap();
        assert!((huge.scale - 10.0).abs() < 1e-6);

        let tiny = pinch
            .update(Vec2::new(0.0, 0.0), Vec2::new(0.01, 0.0), huge.scale)
            .unwrap();
        assert!((tiny.scale - 0.05).abs() < 1e-6);

        let mut scale = 1.0;
        for step in 1..200 {
            let spread = if step % 2 == 0 { 3.0 } else { 900.0 };
            let update = pinch
                .update(Vec2::ZERO, Vec2::new(spread, 0.0), scale)
                .unwrap();
            scale = update.scale;
            assert!((0.05..=10.0).contains(&scale));
        }
    }

    #[test]
    fn twisting_adds_yaw() {
        let mut pinch = tracker();
        pinch.begin(Vec2::ZERO, Vec2::new(-100.0, 0.0));
        let update = pinch.update(Vec2::ZERO, Vec2::new(0.0, -100.0), 1.0).unwrap();
        assert!((update.yaw_delta - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((update.scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn crossing_the_seam_is_a_small_turn() {
        let mut pinch = tracker();
        // Angle just below +PI, then just above -PI.
        pinch.begin(Vec2::ZERO, Vec2::new(100.0, -1.0));
        let update = pinch.update(Vec2::ZERO, Vec2::new(100.0, 1.0), 1.0).unwrap();
        assert!(update.yaw_delta.abs() < 0.05);
    }

    #[test]
    fn rotation_can_be_disabled() {
        let mut pinch = PinchTracker::new(&GestureConfig {
            rotate: false,
            ..Default::default()
        });
        pinch.begin(Vec2::ZERO, Vec2::new(-100.0, 0.0));
        let update = pinch.update(Vec2::ZERO, Vec2::new(0.0, -100.0), 1.0).unwrap();
        assert_eq!(update.yaw_delta, 0.0);
    }

    #[test]
    fn coincident_contacts_leave_scale_alone() {
        let mut pinch = tracker();
        pinch.begin(Vec2::ONE, Vec2::ONE);
        let update = pinch.update(Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0).unwrap();
        assert!((update.scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn no_update_after_end() {
        let mut pinch = tracker();
        pinch.begin(Vec2::ZERO, Vec2::X);
        pinch.end();
        assert!(!pinch.is_active());
        assert!(pinch.update(Vec2::ZERO, Vec2::Y, 1.0).is_none());
    }
}
