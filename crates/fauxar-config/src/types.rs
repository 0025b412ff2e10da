use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Which stabilization architecture drives the placed object.
    pub stabilization: StabilizationMode,
    /// Passthrough camera parameters.
    pub camera: CameraConfig,
    /// Tap-to-place configuration.
    pub placement: PlacementConfig,
    /// Orientation smoothing tiers.
    pub smoothing: SmoothingConfig,
    /// Two-finger pinch/rotate limits.
    pub gesture: GestureConfig,
    /// Orientation sensor configuration.
    pub sensor: SensorConfig,
    /// Non-AR orbit viewer.
    pub viewer: ViewerConfig,
    /// Model catalog and normalization.
    pub models: ModelsConfig,
    /// Lifetime of transient user notices in milliseconds.
    pub notice_duration_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stabilization: StabilizationMode::CameraRotates,
            camera: CameraConfig::default(),
            placement: PlacementConfig::default(),
            smoothing: SmoothingConfig::default(),
            gesture: GestureConfig::default(),
            sensor: SensorConfig::default(),
            viewer: ViewerConfig::default(),
            models: ModelsConfig::default(),
            notice_duration_ms: 2200,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilizationMode {
    /// The model container stays put; the camera follows the tracked orientation.
    CameraRotates,
    /// The camera stays put; the model container is rotated by the inverse
    /// of the tracked orientation.
    WorldCounterRotates,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Near clipping plane (meters).
    pub near: f32,
    /// Far clipping plane (meters).
    pub far: f32,
    /// Height of the passthrough camera above the ground plane (meters).
    pub eye_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.01,
            far: 1000.0,
            eye_height: 1.6,
        }
    }
}

/// Where a tap ray is resolved into a world point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlacementTarget {
    /// Intersect with the horizontal plane `y = height`.
    GroundPlane { height: f32 },
    /// Advance a fixed distance along the ray.
    FixedDistance { distance: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    pub target: PlacementTarget,
    /// Two taps closer together than this confirm a placement.
    pub double_tap_window_ms: u64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            target: PlacementTarget::GroundPlane { height: 0.0 },
            double_tap_window_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Slerp rate while the orientation error is small.
    pub base_rate: f32,
    /// Slerp rate once the error exceeds `mid_threshold`.
    pub mid_rate: f32,
    /// Slerp rate once the error exceeds `fast_threshold`.
    pub fast_rate: f32,
    /// Angular error (radians) at which `mid_rate` kicks in.
    pub mid_threshold: f32,
    /// Angular error (radians) at which `fast_rate` kicks in.
    pub fast_threshold: f32,
    /// Per-frame lerp rate toward the anchor position. `None` snaps.
    pub position_smoothing: Option<f32>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.18,
            mid_rate: 0.28,
            fast_rate: 0.45,
            mid_threshold: 0.15,
            fast_threshold: 0.5,
            position_smoothing: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Whether twisting two fingers rotates the model around its vertical axis.
    pub rotate: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.05,
            max_scale: 10.0,
            rotate: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Madgwick filter beta parameter (convergence speed). Higher = more responsive, less smooth.
    pub madgwick_beta: f32,
    /// Number of stationary samples for gyro bias calibration.
    pub calibration_samples: u32,
    /// Raw IMU sample rate in Hz.
    pub sample_rate_hz: f32,
    /// Manual yaw trim in radians.
    pub yaw_offset: f32,
    /// Manual pitch trim in radians.
    pub pitch_offset: f32,
    /// Manual roll trim in radians.
    pub roll_offset: f32,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            madgwick_beta: 0.1,
            calibration_samples: 200,
            sample_rate_hz: 100.0,
            yaw_offset: 0.0,
            pitch_offset: 0.0,
            roll_offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub fov_y_degrees: f32,
    /// Initial orbit camera position.
    #[serde(with = "vec3_serde")]
    pub position: Vec3,
    /// Point the orbit camera looks at.
    #[serde(with = "vec3_serde")]
    pub target: Vec3,
    pub zoom_in_factor: f32,
    pub zoom_out_factor: f32,
    /// Yaw added to the model by the rotate button, in degrees.
    pub rotate_step_degrees: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            position: Vec3::new(0.0, 1.5, 3.0),
            target: Vec3::ZERO,
            zoom_in_factor: 0.9,
            zoom_out_factor: 1.1,
            rotate_step_degrees: 45.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Model loaded at startup.
    pub default_model: String,
    /// Largest dimension of a loaded model after normalization (meters).
    pub fit_size: f32,
    /// Model name to asset URL.
    pub catalog: BTreeMap<String, String>,
}

const SAMPLE_MODELS_BASE: &str =
    "https://cdn.jsdelivr.net/gh/KhronosGroup/glTF-Sample-Models@master/2.0";

impl Default for ModelsConfig {
    fn default() -> Self {
        let catalog = [
            ("Duck", "Duck/glTF/Duck.gltf"),
            ("Helmet", "DamagedHelmet/glTF/DamagedHelmet.gltf"),
            ("BoomBox", "BoomBox/glTF/BoomBox.gltf"),
        ]
        .into_iter()
        .map(|(name, path)| (name.to_string(), format!("{SAMPLE_MODELS_BASE}/{path}")))
        .collect();

        Self {
            default_model: "Duck".to_string(),
            fit_size: 1.5,
            catalog,
        }
    }
}

// glam's own serde output is fine for JSON but reads poorly in TOML;
// store vectors as plain arrays.

mod vec3_serde {
    use glam::Vec3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vec3, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y, v.z].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vec3, D::Error> {
        let [x, y, z] = <[f32; 3]>::deserialize(d)?;
        Ok(Vec3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            stabilization = "world_counter_rotates"

            [placement.target]
            kind = "fixed_distance"
            distance = 1.25

            [gesture]
            max_scale = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.stabilization, StabilizationMode::WorldCounterRotates);
        assert_eq!(
            config.placement.target,
            PlacementTarget::FixedDistance { distance: 1.25 }
        );
        assert_eq!(config.placement.double_tap_window_ms, 300);
        assert!((config.gesture.max_scale - 4.0).abs() < 1e-6);
        assert!((config.gesture.min_scale - 0.05).abs() < 1e-6);
        assert!(config.smoothing.position_smoothing.is_none());
    }

    #[test]
    fn viewer_position_reads_as_array() {
        let config: AppConfig = toml::from_str(
            r#"
            [viewer]
            position = [1.0, 2.0, 3.0]
            "#,
        )
        .unwrap();
        assert_eq!(config.viewer.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(config.viewer.target, Vec3::ZERO);
    }

    #[test]
    fn default_catalog_has_sample_models() {
        let models = ModelsConfig::default();
        assert!(models.catalog.contains_key(&models.default_model));
        assert!(models.catalog["Helmet"].ends_with("DamagedHelmet.gltf"));
        assert_eq!(models.catalog.len(), 3);
    }
}
