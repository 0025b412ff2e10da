use crate::anchor::Anchor;
use crate::notice::{Notice, NoticeKind, Notices};
use crate::placement::{Placement, PlacementError, PlacementState};
use crate::stabilizer::Stabilizer;
use fauxar_assets::{AssetError, AssetManager, LoadedAsset};
use fauxar_capture::{CameraFacing, CameraStream, PassthroughFrame};
use fauxar_config::AppConfig;
use fauxar_input::touch::InteractionManager;
use fauxar_input::AnchorAction;
use fauxar_scene::camera::Camera;
use fauxar_scene::orbit::OrbitView;
use fauxar_scene::projector::{self, ProjectionError, Viewport};
use fauxar_scene::scene::{ContactShadow, ModelSlot, Scene, Transform};
use fauxar_sensor::permission::{PermissionGate, PermissionStatus};
use fauxar_sensor::types::OrientationSample;
use fauxar_sensor::OrientationTracker;
use glam::{Quat, Vec2, Vec3};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Orbit viewer, no camera feed.
    Viewer,
    /// Camera passthrough with orientation-anchored placement.
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingState {
    Off,
    /// Permission granted, offset is captured on the first sample.
    AwaitingSample,
    On,
}

/// Everything one viewing session owns.
///
/// All operations take `&mut self`; the caller drives `frame` once per
/// display refresh and feeds input, sensor samples and load results in
/// between. Time is always passed in as the duration since session start.
pub struct Session {
    config: AppConfig,
    mode: ViewMode,
    viewport: Viewport,
    camera: Camera,
    orbit: OrbitView,
    scene: Scene,
    anchor: Anchor,
    placement: Placement,
    tracker: OrientationTracker,
    tracking: TrackingState,
    stabilizer: Stabilizer,
    input: InteractionManager,
    notices: Notices,
    last_sensor: Option<Quat>,
    stream: Box<dyn CameraStream>,
}

impl Session {
    pub fn new(config: AppConfig, viewport: Viewport, stream: Box<dyn CameraStream>) -> Self {
        let mut tracker = OrientationTracker::new();
        tracker.set_manual_offset(
            config.sensor.yaw_offset,
            config.sensor.pitch_offset,
            config.sensor.roll_offset,
        );

        let orbit = OrbitView::new(&config.viewer);
        let mut camera = viewer_camera(&config, viewport);
        orbit.apply(&mut camera);

        Self {
            mode: ViewMode::Viewer,
            viewport,
            camera,
            orbit,
            scene: Scene::new(),
            anchor: Anchor::new(),
            placement: Placement::new(),
            tracker,
            tracking: TrackingState::Off,
            stabilizer: Stabilizer::new(&config.smoothing, config.stabilization),
            input: InteractionManager::new(&config.gesture, &config.placement),
            notices: Notices::new(Duration::from_millis(config.notice_duration_ms)),
            last_sensor: None,
            stream,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn tracking_state(&self) -> TrackingState {
        self.tracking
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Camera as rendered this frame.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn anchor(&self) -> &Anchor {
        &self.anchor
    }

    pub fn placement_state(&self) -> PlacementState {
        self.placement.state()
    }

    /// Placement indicator position in the rendered frame, when shown.
    pub fn indicator(&self) -> Option<Vec3> {
        self.placement
            .indicator()
            .map(|p| self.stabilizer.to_render_frame(p, self.camera.position))
    }

    /// Placement indicator position in the world frame, when shown.
    pub fn indicator_world(&self) -> Option<Vec3> {
        self.placement.indicator()
    }

    pub fn stabilizer(&self) -> &Stabilizer {
        &self.stabilizer
    }

    pub fn current_notice(&self, now: Duration) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn passthrough_open(&self) -> bool {
        self.stream.is_open()
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.camera.aspect_ratio = self.viewport.aspect_ratio();
        debug!(width, height, "Viewport resized");
    }

    /// Camera with the smoothed device orientation applied.
    ///
    /// Anchors are stored in the world frame, so taps are projected through
    /// this camera whichever stabilization mode renders the frame.
    pub fn tracking_camera(&self) -> Camera {
        let mut camera = self.camera.clone();
        if self.mode == ViewMode::Passthrough {
            camera.orientation = self.stabilizer.current();
        }
        camera
    }

    /// Screen position to world position for the configured placement target.
    pub fn project(&self, pixel: Vec2) -> Result<Vec3, ProjectionError> {
        projector::project_pixel(
            &self.tracking_camera(),
            &self.viewport,
            pixel,
            self.config.placement.target,
        )
    }

    /// Open the camera and switch to passthrough. On failure the session
    /// stays in the viewer and a notice explains why.
    pub async fn enter_passthrough(&mut self, now: Duration) -> bool {
        if self.mode == ViewMode::Passthrough {
            return true;
        }

        match self.stream.open(CameraFacing::Environment).await {
            Ok(stream) => {
                info!(width = stream.width, height = stream.height, "Entering passthrough");
                self.mode = ViewMode::Passthrough;
                self.camera = Camera::passthrough(&self.config.camera, self.viewport.aspect_ratio());
                self.stabilizer.reset(Quat::IDENTITY);
                self.input.reset();
                self.placement.exit(&mut self.anchor);
                self.placement.begin();
                self.scene.set_model_visible(false);
                self.notices
                    .push(NoticeKind::Info, "Double-tap to place the model", now);
                true
            }
            Err(e) => {
                warn!(?e, "Camera stream unavailable, staying in viewer");
                self.notices
                    .push(NoticeKind::Error, format!("Camera unavailable: {e}"), now);
                false
            }
        }
    }

    /// Back to the viewer: camera released, tracking off, anchor discarded.
    pub fn exit_passthrough(&mut self, now: Duration) {
        if self.mode != ViewMode::Passthrough {
            return;
        }
        self.stream.stop();
        self.disable_tracking();
        self.placement.exit(&mut self.anchor);
        self.input.reset();
        self.stabilizer.reset(Quat::IDENTITY);

        self.mode = ViewMode::Viewer;
        self.camera = viewer_camera(&self.config, self.viewport);
        self.orbit.apply(&mut self.camera);
        self.scene.container = Transform::IDENTITY;
        self.scene.set_model_visible(true);
        info!("Exited passthrough");
        self.notices.push(NoticeKind::Info, "Exited AR", now);
    }

    /// Ask the platform for sensor access, then enable tracking.
    pub async fn request_tracking(&mut self, gate: &dyn PermissionGate, now: Duration) -> bool {
        match gate.request().await {
            Ok(status) => self.enable_tracking(status, now),
            Err(e) => {
                warn!(?e, "Sensor permission request failed");
                self.notices.push(NoticeKind::Warning, e.to_string(), now);
                false
            }
        }
    }

    /// Enable tracking after a permission answer.
    ///
    /// The offset is captured against the current effective camera
    /// orientation, immediately if a sample is already known, otherwise on
    /// the next `update_orientation`.
    pub fn enable_tracking(&mut self, status: PermissionStatus, now: Duration) -> bool {
        if !status.allows_tracking() {
            self.tracking = TrackingState::Off;
            self.notices
                .push(NoticeKind::Warning, "Motion sensor permission denied", now);
            return false;
        }

        match self.last_sensor {
            Some(sensor) => {
                self.tracker.enable(self.stabilizer.current(), sensor);
                self.tracking = TrackingState::On;
            }
            None => self.tracking = TrackingState::AwaitingSample,
        }
        true
    }

    /// Stop following the sensor. The last rendered orientation is kept.
    pub fn disable_tracking(&mut self) {
        self.tracker.disable();
        self.tracking = TrackingState::Off;
    }

    pub fn update_orientation(&mut self, sample: OrientationSample) {
        let sensor = sample.quaternion.normalize();
        self.last_sensor = Some(sensor);

        if self.tracking == TrackingState::AwaitingSample {
            self.tracker.enable(self.stabilizer.current(), sensor);
            self.tracking = TrackingState::On;
        }
    }

    /// Manual yaw/pitch/roll trim in radians.
    pub fn set_manual_offset(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.tracker.set_manual_offset(yaw, pitch, roll);
    }

    pub fn touch_start(&mut self, id: u64, position: Vec2, now: Duration) {
        let action = self.input.on_touch_start(id, position);
        self.apply(action, now);
    }

    pub fn touch_move(&mut self, id: u64, position: Vec2, now: Duration) {
        let action = self.input.on_touch_move(id, position, self.anchor.scale);
        self.apply(action, now);
    }

    pub fn touch_end(&mut self, id: u64, now: Duration) {
        let action = self.input.on_touch_end(id, now);
        self.apply(action, now);
    }

    pub fn click(&mut self, position: Vec2, now: Duration) {
        let action = self.input.on_click(position, now);
        self.apply(action, now);
    }

    /// Pointer hover without a press (desktop): moves the indicator.
    pub fn hover(&mut self, position: Vec2) {
        self.preview(position);
    }

    fn apply(&mut self, action: Option<AnchorAction>, now: Duration) {
        match action {
            Some(AnchorAction::Preview(pixel)) => self.preview(pixel),
            Some(AnchorAction::Place(pixel)) => {
                if let Err(e) = self.confirm_placement(pixel, now) {
                    debug!(?e, "Double tap did not place");
                }
            }
            Some(AnchorAction::Transform { scale, yaw_delta }) => {
                self.anchor.scale = scale;
                if yaw_delta != 0.0 {
                    self.anchor.rotate_yaw(yaw_delta);
                }
            }
            None => {}
        }
    }

    fn preview(&mut self, pixel: Vec2) {
        if self.placement.state() == PlacementState::Placing {
            let projected = self.project(pixel);
            self.placement.preview(projected);
        }
    }

    /// Freeze the anchor at the world point under `pixel`.
    pub fn confirm_placement(&mut self, pixel: Vec2, now: Duration) -> Result<Vec3, PlacementError> {
        if self.placement.state() != PlacementState::Placing {
            return Err(PlacementError::NotPlacing);
        }
        if self.scene.model.is_none() {
            self.notices
                .push(NoticeKind::Warning, "Load a model before placing", now);
            return Err(PlacementError::NoModel);
        }

        let projected = self.project(pixel);
        match self.placement.confirm(&mut self.anchor, projected) {
            Ok(position) => {
                self.stabilizer.clear_position_history();
                self.notices.push(NoticeKind::Info, "Model placed", now);
                Ok(position)
            }
            Err(e) => {
                debug!(?e, ?pixel, "Placement attempt ignored");
                self.notices
                    .push(NoticeKind::Warning, "No surface there, try again", now);
                Err(e)
            }
        }
    }

    /// Pick the placed model back up. Scale survives.
    pub fn relocate(&mut self, now: Duration) -> bool {
        if !self.placement.relocate(&mut self.anchor) {
            return false;
        }
        self.scene.set_model_visible(false);
        self.notices
            .push(NoticeKind::Info, "Double-tap to place the model", now);
        true
    }

    pub fn reset_scale(&mut self) {
        self.anchor.scale = 1.0;
    }

    /// Fixed-step yaw of the model ("rotate" button).
    pub fn rotate_model_step(&mut self) {
        self.anchor
            .rotate_yaw(self.config.viewer.rotate_step_degrees.to_radians());
    }

    pub fn zoom_in(&mut self) {
        self.orbit.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.orbit.zoom_out();
    }

    pub fn orbit(&mut self, yaw: f32, pitch: f32) {
        self.orbit.orbit(yaw, pitch);
    }

    /// Fetch a catalog model and swap it in.
    pub async fn load_model(&mut self, assets: &AssetManager, name: &str, now: Duration) -> bool {
        self.notices
            .push(NoticeKind::Info, format!("Loading {name}..."), now);
        let result = assets.load(name).await;
        self.finish_model_load(result, now)
    }

    /// Install a load result. A failure keeps whatever model was there.
    pub fn finish_model_load(&mut self, result: Result<LoadedAsset, AssetError>, now: Duration) -> bool {
        match result {
            Ok(asset) => {
                let mut slot = ModelSlot::new(asset.name, asset.bounds, self.config.models.fit_size);
                slot.visible = self.model_should_show();
                info!(name = %slot.name, fit_scale = slot.normalization.fit_scale, "Model ready");
                self.notices
                    .push(NoticeKind::Info, format!("{} loaded", slot.name), now);
                self.scene.replace_model(slot);
                true
            }
            Err(e) => {
                warn!(?e, "Model load failed");
                self.notices
                    .push(NoticeKind::Error, format!("Failed to load model: {e}"), now);
                false
            }
        }
    }

    /// Shadow blob for the visible model.
    pub fn contact_shadow(&self) -> Option<ContactShadow> {
        self.scene
            .model
            .as_ref()
            .filter(|m| m.visible)
            .map(|m| m.contact_shadow(self.anchor.scale))
    }

    /// Latest passthrough frame, if any.
    pub fn poll_passthrough(&mut self) -> Option<PassthroughFrame> {
        if self.mode != ViewMode::Passthrough {
            return None;
        }
        match self.stream.try_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(?e, "Passthrough frame unavailable");
                None
            }
        }
    }

    /// Advance one display frame.
    pub fn frame(&mut self, now: Duration) {
        match self.mode {
            ViewMode::Passthrough => {
                let target = self.last_sensor.and_then(|s| self.tracker.target(s));
                if let Some(target) = target {
                    self.stabilizer.step(target);
                }
                self.camera.orientation = self.stabilizer.camera_orientation();
                if self.anchor.placed {
                    self.scene.container =
                        self.stabilizer.container_transform(&self.anchor, self.camera.position);
                }
            }
            ViewMode::Viewer => {
                self.orbit.apply(&mut self.camera);
                self.scene.container = Transform {
                    position: self.orbit.target,
                    rotation: self.anchor.orientation,
                    scale: self.anchor.scale,
                };
            }
        }
        let visible = self.model_should_show();
        self.scene.set_model_visible(visible);
        self.notices.prune(now);
    }

    /// Pixel position of the placed anchor in the rendered frame.
    pub fn anchor_screen_position(&self) -> Option<Vec2> {
        if !self.anchor.placed {
            return None;
        }
        self.camera
            .world_to_ndc(self.scene.container.position)
            .map(|ndc| self.viewport.to_pixel(ndc))
    }

    fn model_should_show(&self) -> bool {
        self.mode == ViewMode::Viewer || self.anchor.placed
    }
}

fn viewer_camera(config: &AppConfig, viewport: Viewport) -> Camera {
    Camera {
        fov_y_degrees: config.viewer.fov_y_degrees,
        aspect_ratio: viewport.aspect_ratio(),
        near: config.camera.near,
        far: config.camera.far,
        ..Camera::new()
    }
}
