use crate::bounds::Aabb;
use glam::{Mat4, Quat, Vec3};

/// Position, rotation and uniform scale of a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: 1.0,
    };

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Fit of a loaded asset into a unit-ish box centered on the container origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelNormalization {
    /// Translation that moves the asset's bounds center to the origin.
    pub offset: Vec3,
    /// Uniform scale that makes the largest dimension `fit_size`.
    pub fit_scale: f32,
    /// Asset size after fitting.
    pub fitted_size: Vec3,
}

impl ModelNormalization {
    pub fn from_bounds(bounds: &Aabb, fit_size: f32) -> Self {
        let extent = bounds.max_extent();
        let fit_scale = if extent > f32::EPSILON {
            fit_size / extent
        } else {
            1.0
        };
        let offset = if bounds.is_empty() {
            Vec3::ZERO
        } else {
            -bounds.center()
        };
        Self {
            offset,
            fit_scale,
            fitted_size: bounds.size() * fit_scale,
        }
    }

    /// Asset space to container space: center first, then fit.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::splat(self.fit_scale)) * Mat4::from_translation(self.offset)
    }
}

/// Soft shadow blob under the model, sized with the user scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactShadow {
    /// Offset below the container origin (container space).
    pub offset_y: f32,
    /// Width and depth of the blob.
    pub footprint: f32,
}

const SHADOW_FOOTPRINT: f32 = 1.6;

/// The currently loaded model.
#[derive(Debug, Clone)]
pub struct ModelSlot {
    pub name: String,
    pub bounds: Aabb,
    pub normalization: ModelNormalization,
    pub visible: bool,
}

impl ModelSlot {
    pub fn new(name: impl Into<String>, bounds: Aabb, fit_size: f32) -> Self {
        Self {
            name: name.into(),
            bounds,
            normalization: ModelNormalization::from_bounds(&bounds, fit_size),
            visible: false,
        }
    }

    pub fn contact_shadow(&self, user_scale: f32) -> ContactShadow {
        let half_height = self.normalization.fitted_size.y * 0.5;
        let drop = if half_height > 0.0 { half_height } else { 0.5 };
        ContactShadow {
            offset_y: -drop,
            footprint: SHADOW_FOOTPRINT * user_scale,
        }
    }
}

/// Scene content the renderer consumes: one container holding at most one model.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    /// Container transform, derived every frame from the anchor.
    pub container: Transform,
    pub model: Option<ModelSlot>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new model, returning the previous one.
    pub fn replace_model(&mut self, slot: ModelSlot) -> Option<ModelSlot> {
        self.model.replace(slot)
    }

    pub fn set_model_visible(&mut self, visible: bool) {
        if let Some(model) = &mut self.model {
            model.visible = visible;
        }
    }

    /// Full model matrix (asset space to world), if a model is loaded.
    pub fn model_matrix(&self) -> Option<Mat4> {
        self.model
            .as_ref()
            .map(|m| self.container.matrix() * m.normalization.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_centers_and_fits() {
        let bounds = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(6.0, 2.0, 1.0));
        let norm = ModelNormalization::from_bounds(&bounds, 1.5);
        assert!((norm.fit_scale - 0.375).abs() < 1e-6);

        let m = norm.matrix();
        let center = m.transform_point3(bounds.center());
        assert!(center.length() < 1e-6);
        let corner = m.transform_point3(bounds.max);
        assert!((corner.x - 0.75).abs() < 1e-6);
    }

    #[test]
    fn degenerate_bounds_keep_unit_scale() {
        let bounds = Aabb::new(Vec3::ONE, Vec3::ONE);
        let norm = ModelNormalization::from_bounds(&bounds, 1.5);
        assert_eq!(norm.fit_scale, 1.0);
        assert_eq!(norm.offset, -Vec3::ONE);
    }

    #[test]
    fn shadow_tracks_scale() {
        let slot = ModelSlot::new(
            "Duck",
            Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0)),
            1.5,
        );
        let shadow = slot.contact_shadow(2.0);
        assert!((shadow.footprint - 3.2).abs() < 1e-6);
        assert!((shadow.offset_y + 0.75).abs() < 1e-6);
    }

    #[test]
    fn replacing_model_returns_previous() {
        let mut scene = Scene::new();
        let b = Aabb::new(Vec3::ZERO, Vec3::ONE);
        assert!(scene.replace_model(ModelSlot::new("Duck", b, 1.5)).is_none());
        let previous = scene.replace_model(ModelSlot::new("Helmet", b, 1.5)).unwrap();
        assert_eq!(previous.name, "Duck");
        assert_eq!(scene.model.as_ref().unwrap().name, "Helmet");
    }

    #[test]
    fn model_matrix_fits_then_places() {
        let mut scene = Scene::new();
        assert!(scene.model_matrix().is_none());

        let bounds = Aabb::new(Vec3::new(2.0, 0.0, 0.0), Vec3::new(4.0, 2.0, 2.0));
        scene.replace_model(ModelSlot::new("Duck", bounds, 1.5));
        scene.container = Transform {
            position: Vec3::new(0.0, 1.6, -2.0),
            rotation: Quat::IDENTITY,
            scale: 2.0,
        };

        let m = scene.model_matrix().unwrap();
        // Asset center lands on the container origin.
        assert!((m.transform_point3(bounds.center()) - scene.container.position).length() < 1e-5);
        // Fitted to 1.5, then doubled by the user scale.
        let top = m.transform_point3(Vec3::new(3.0, 2.0, 1.0));
        assert!((top.y - (1.6 + 1.5)).abs() < 1e-5);
    }
}
