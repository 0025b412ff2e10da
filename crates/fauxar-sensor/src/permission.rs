use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("Orientation sensor permission denied")]
    PermissionDenied,
    #[error("Sensor event stream closed")]
    Closed,
}

/// Outcome of a sensor permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The platform delivers orientation events without asking.
    NotRequired,
}

impl PermissionStatus {
    pub fn allows_tracking(self) -> bool {
        !matches!(self, PermissionStatus::Denied)
    }
}

/// Platform hook for the (possibly user-facing) sensor permission prompt.
#[async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request(&self) -> Result<PermissionStatus, SensorError>;
}

/// Gate for platforms that never prompt.
pub struct NoPrompt;

#[async_trait]
impl PermissionGate for NoPrompt {
    async fn request(&self) -> Result<PermissionStatus, SensorError> {
        Ok(PermissionStatus::NotRequired)
    }
}

/// Gate that always answers with a fixed status. Used for headless runs and tests.
pub struct FixedAnswer(pub PermissionStatus);

#[async_trait]
impl PermissionGate for FixedAnswer {
    async fn request(&self) -> Result<PermissionStatus, SensorError> {
        Ok(self.0)
    }
}
