pub mod attitude;
pub mod fusion;
pub mod permission;
pub mod tracker;
pub mod types;

use fauxar_config::SensorConfig;
use fusion::SensorFusion;
use permission::{PermissionGate, SensorError};
use tokio::sync::{mpsc, watch};
use types::{OrientationSample, SensorEvent};

pub use tracker::OrientationTracker;

/// Commands sent to the sensor processing task.
enum SensorCommand {
    Recalibrate(u32),
}

/// Client for the device orientation sensor.
///
/// Consumes the platform's sensor events on a background task, converts them
/// into world-space attitude and publishes the latest sample.
pub struct SensorClient {
    sample_rx: watch::Receiver<Option<OrientationSample>>,
    command_tx: mpsc::UnboundedSender<SensorCommand>,
    _task: tokio::task::JoinHandle<()>,
}

impl SensorClient {
    /// Ask for sensor permission, then start processing `events`.
    pub async fn connect(
        gate: &dyn PermissionGate,
        config: &SensorConfig,
        events: mpsc::UnboundedReceiver<SensorEvent>,
    ) -> Result<Self, SensorError> {
        let status = gate.request().await?;
        if !status.allows_tracking() {
            tracing::warn!("Orientation sensor permission denied");
            return Err(SensorError::PermissionDenied);
        }
        tracing::info!(?status, "Orientation sensor available");
        Ok(Self::spawn(config, events))
    }

    /// Start processing `events` without a permission check.
    pub fn spawn(config: &SensorConfig, events: mpsc::UnboundedReceiver<SensorEvent>) -> Self {
        let (sample_tx, sample_rx) = watch::channel(None);
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let fusion = SensorFusion::new(
            config.madgwick_beta,
            config.sample_rate_hz,
            config.calibration_samples,
        );
        let task = tokio::spawn(sensor_read_loop(events, sample_tx, command_rx, fusion));

        Self {
            sample_rx,
            command_tx,
            _task: task,
        }
    }

    /// Create a mock client for devices without an orientation sensor.
    pub fn mock() -> Self {
        let (sample_tx, sample_rx) = watch::channel(None);
        let (command_tx, _) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            // Keep the sender alive.
            let _tx = sample_tx;
            tokio::signal::ctrl_c().await.ok();
        });
        Self {
            sample_rx,
            command_tx,
            _task: task,
        }
    }

    /// Latest attitude, or `None` before the first usable event (non-blocking).
    pub fn latest(&self) -> Option<OrientationSample> {
        *self.sample_rx.borrow()
    }

    /// Wait until a new sample has been published.
    pub async fn changed(&mut self) -> Result<(), SensorError> {
        self.sample_rx.changed().await.map_err(|_| SensorError::Closed)
    }

    /// Restart gyro bias calibration (raw IMU sources only).
    pub fn recalibrate(&self, samples: u32) {
        if self.command_tx.send(SensorCommand::Recalibrate(samples)).is_err() {
            tracing::warn!("Sensor task not running, recalibration dropped");
        }
    }
}

/// Background task: convert sensor events and publish the latest attitude.
async fn sensor_read_loop(
    mut events: mpsc::UnboundedReceiver<SensorEvent>,
    sample_tx: watch::Sender<Option<OrientationSample>>,
    mut command_rx: mpsc::UnboundedReceiver<SensorCommand>,
    mut fusion: SensorFusion,
) {
    let mut event_count: u64 = 0;

    loop {
        tokio::select! {
            // Commands queued before an event apply to it.
            biased;

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    SensorCommand::Recalibrate(n) => fusion.recalibrate(n),
                }
            }
            event = events.recv() => {
                let Some(event) = event else {
                    tracing::warn!("Sensor event stream closed");
                    break;
                };

                let sample = match event {
                    SensorEvent::DeviceOrientation(reading) => Some(OrientationSample::from(reading)),
                    SensorEvent::RawImu(raw) => fusion.update(&raw),
                };
                if let Some(sample) = sample {
                    let _ = sample_tx.send(Some(sample));
                }

                event_count += 1;
                if event_count % 1000 == 0 {
                    tracing::debug!(event_count, "Sensor events processed");
                }
            }
        }
    }
}
