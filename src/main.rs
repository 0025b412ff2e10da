mod simulate;

use anyhow::Result;
use fauxar_anchor::{PlacementState, Session, ViewMode};
use fauxar_assets::{AssetManager, HttpLoader, ModelCatalog};
use fauxar_capture::test_pattern::TestPatternCamera;
use fauxar_config::AppConfig;
use fauxar_scene::projector::Viewport;
use fauxar_sensor::permission::NoPrompt;
use fauxar_sensor::SensorClient;
use glam::EulerRot;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{info, warn};

const VIEW_WIDTH: u32 = 1280;
const VIEW_HEIGHT: u32 = 720;
const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Frames between the two scripted taps of the demo double tap.
const DOUBLE_TAP_GAP_FRAMES: u64 = 8;
const PLACE_AT_FRAME: u64 = 90;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "fauxar=info,fauxar_anchor=info,fauxar_sensor=info,fauxar_assets=info,fauxar_capture=info"
                    .into()
            }),
        )
        .init();

    info!("fauxar starting");

    // Load config.
    let config = fauxar_config::load_config().unwrap_or_else(|e| {
        warn!(?e, "Failed to load config, using defaults");
        AppConfig::default()
    });

    info!(?config.stabilization, target = ?config.placement.target, "Config loaded");

    // Connect to the orientation sensor (fall back to mock if unavailable).
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let sensor = match SensorClient::connect(&NoPrompt, &config.sensor, event_rx).await {
        Ok(client) => {
            info!("Orientation sensor connected");
            client
        }
        Err(e) => {
            warn!(?e, "Orientation sensor not available, using mock (no tracking)");
            SensorClient::mock()
        }
    };
    let _sweep = simulate::spawn_sweep(event_tx, config.sensor.sample_rate_hz);

    let assets = AssetManager::new(
        ModelCatalog::from_config(&config.models),
        Box::new(HttpLoader::new()),
    );
    let default_model = assets.catalog().default_model().to_string();

    let mut session = Session::new(
        config,
        Viewport::new(VIEW_WIDTH as f32, VIEW_HEIGHT as f32),
        Box::new(TestPatternCamera::new(VIEW_WIDTH, VIEW_HEIGHT)),
    );

    let start = Instant::now();
    if !session.load_model(&assets, &default_model, start.elapsed()).await {
        warn!(model = %default_model, "Continuing without a model");
    }

    if session.enter_passthrough(start.elapsed()).await {
        session.request_tracking(&NoPrompt, start.elapsed()).await;
    }

    run(&mut session, &sensor, start).await;

    session.exit_passthrough(start.elapsed());
    info!("fauxar stopped");
    Ok(())
}

/// Frame loop: feed the latest sensor sample, advance the session, and
/// script a double tap at the screen center once tracking has settled.
async fn run(session: &mut Session, sensor: &SensorClient, start: Instant) {
    let mut interval = tokio::time::interval(FRAME_INTERVAL);
    let mut frame_count: u64 = 0;
    let center = session.viewport().center();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = &mut ctrl_c => {
                info!("Ctrl+C received, shutting down");
                break;
            }
        }

        let now = start.elapsed();
        if let Some(sample) = sensor.latest() {
            session.update_orientation(sample);
        }
        if let Some(frame) = session.poll_passthrough() {
            tracing::trace!(sequence = frame.sequence, "Passthrough frame");
        }

        if session.mode() == ViewMode::Passthrough
            && session.placement_state() == PlacementState::Placing
            && (frame_count == PLACE_AT_FRAME || frame_count == PLACE_AT_FRAME + DOUBLE_TAP_GAP_FRAMES)
        {
            session.click(center, now);
        }

        session.frame(now);
        frame_count += 1;

        if frame_count % 120 == 0 {
            let (yaw, pitch, roll) = session.stabilizer().current().to_euler(EulerRot::YXZ);
            info!(
                frame_count,
                yaw = yaw.to_degrees(),
                pitch = pitch.to_degrees(),
                roll = roll.to_degrees(),
                anchor_px = ?session.anchor_screen_position(),
                placement = ?session.placement_state(),
                "Frame stats"
            );
            if let Some(notice) = session.current_notice(now) {
                info!(kind = ?notice.kind, message = %notice.message, "Notice");
            }
        }
    }
}
