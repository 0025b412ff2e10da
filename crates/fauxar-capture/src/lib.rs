pub mod test_pattern;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Camera access denied")]
    Denied,
    #[error("Camera unavailable: {0}")]
    Unavailable(String),
    #[error("Camera stream is not open")]
    NotOpen,
}

/// Which physical camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraFacing {
    /// Rear camera, the one passthrough wants.
    #[default]
    Environment,
    User,
}

/// Negotiated stream parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: u32,
    pub height: u32,
    pub facing: CameraFacing,
}

/// A frame of camera passthrough video.
pub struct PassthroughFrame {
    /// RGBA8 pixel data.
    pub data: Vec<u8>,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Monotonic frame counter.
    pub sequence: u64,
}

/// Permission-gated camera stream used as the passthrough background.
#[async_trait]
pub trait CameraStream: Send {
    /// Ask for the camera. May prompt the user; may be denied.
    async fn open(&mut self, facing: CameraFacing) -> Result<StreamInfo, CaptureError>;

    /// Latest frame if a new one is available.
    fn try_frame(&mut self) -> Result<Option<PassthroughFrame>, CaptureError>;

    /// Release the camera. Safe to call when not open.
    fn stop(&mut self);

    fn is_open(&self) -> bool;
}
