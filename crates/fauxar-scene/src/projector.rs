//! Screen-to-world projection for tap placement.

use crate::camera::Camera;
use fauxar_config::PlacementTarget;
use glam::{Vec2, Vec3};
use thiserror::Error;

/// Rays closer than this to parallel with the plane never hit it.
const PARALLEL_EPSILON: f32 = 1e-6;

#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    #[error("Tap ray does not intersect the placement plane")]
    NoIntersection,
    #[error("Viewport has zero area ({width}x{height})")]
    EmptyViewport { width: f32, height: f32 },
}

/// Viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn aspect_ratio(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Pixel coordinates (origin top-left) to NDC (-1..1, +Y up).
    pub fn to_ndc(&self, pixel: Vec2) -> Result<Vec2, ProjectionError> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ProjectionError::EmptyViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(Vec2::new(
            (pixel.x / self.width) * 2.0 - 1.0,
            1.0 - (pixel.y / self.height) * 2.0,
        ))
    }

    /// NDC back to pixel coordinates.
    pub fn to_pixel(&self, ndc: Vec2) -> Vec2 {
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.width,
            (1.0 - ndc.y) * 0.5 * self.height,
        )
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the horizontal plane `y = height`.
    ///
    /// Fails for rays parallel to the plane and for planes behind the origin.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Result<Vec3, ProjectionError> {
        if self.direction.y.abs() < PARALLEL_EPSILON {
            return Err(ProjectionError::NoIntersection);
        }
        let t = (height - self.origin.y) / self.direction.y;
        if t <= 0.0 {
            return Err(ProjectionError::NoIntersection);
        }
        Ok(self.at(t))
    }
}

/// Resolve a point in NDC into a world position for the given target.
pub fn project(camera: &Camera, ndc: Vec2, target: PlacementTarget) -> Result<Vec3, ProjectionError> {
    let ray = camera.ray_through(ndc);
    match target {
        PlacementTarget::FixedDistance { distance } => Ok(ray.at(distance)),
        PlacementTarget::GroundPlane { height } => ray.intersect_horizontal_plane(height),
    }
}

/// Pixel-space convenience over [`project`].
pub fn project_pixel(
    camera: &Camera,
    viewport: &Viewport,
    pixel: Vec2,
    target: PlacementTarget,
) -> Result<Vec3, ProjectionError> {
    project(camera, viewport.to_ndc(pixel)?, target)
}
