pub mod gesture;
pub mod tap;
pub mod touch;

use glam::Vec2;

/// Describes an anchoring request derived from raw touch input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorAction {
    /// Move the placement indicator under the pointer (pixels).
    Preview(Vec2),
    /// Double-tap at a pixel position: confirm placement there.
    Place(Vec2),
    /// Two-finger pinch/twist: new uniform scale and yaw change (radians).
    Transform { scale: f32, yaw_delta: f32 },
}
