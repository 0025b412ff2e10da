use fauxar_sensor::types::{DeviceOrientationEvent, SensorEvent};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Peak yaw of the simulated head sweep (degrees).
const SWEEP_YAW_DEG: f32 = 25.0;
/// Peak pitch wobble (degrees).
const SWEEP_PITCH_DEG: f32 = 6.0;

/// Feed a slow left/right sweep of a phone held upright, as the platform's
/// device-orientation events would report it.
pub fn spawn_sweep(events: mpsc::UnboundedSender<SensorEvent>, rate_hz: f32) -> JoinHandle<()> {
    let period = Duration::from_secs_f32(1.0 / rate_hz.max(1.0));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        let mut t = 0.0_f32;
        loop {
            interval.tick().await;
            t += period.as_secs_f32();

            let event = DeviceOrientationEvent {
                alpha: SWEEP_YAW_DEG * (t * 0.4).sin(),
                beta: 90.0 + SWEEP_PITCH_DEG * (t * 1.3).sin(),
                gamma: 0.0,
                screen_orientation: 0.0,
            };
            if events.send(SensorEvent::DeviceOrientation(event)).is_err() {
                tracing::debug!("Sensor consumer gone, stopping sweep");
                break;
            }
        }
    })
}
