use crate::{CameraFacing, CameraStream, CaptureError, PassthroughFrame, StreamInfo};
use async_trait::async_trait;
use tracing::info;

/// Stand-in camera that serves a checkerboard.
///
/// `open` can be scripted to fail, which is how headless runs and tests
/// exercise the denied/unavailable paths.
pub struct TestPatternCamera {
    width: u32,
    height: u32,
    outcome: Result<(), CaptureError>,
    /// Pre-generated frame (avoids regenerating every poll).
    cached_frame: Vec<u8>,
    open: Option<StreamInfo>,
    sequence: u64,
}

impl TestPatternCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            outcome: Ok(()),
            cached_frame: checkerboard(width, height),
            open: None,
            sequence: 0,
        }
    }

    /// A camera whose `open` always fails with `error`.
    pub fn failing(error: CaptureError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::new(0, 0)
        }
    }
}

#[async_trait]
impl CameraStream for TestPatternCamera {
    async fn open(&mut self, facing: CameraFacing) -> Result<StreamInfo, CaptureError> {
        self.outcome.clone()?;
        let stream = StreamInfo {
            width: self.width,
            height: self.height,
            facing,
        };
        info!(width = self.width, height = self.height, ?facing, "Test pattern camera opened");
        self.open = Some(stream);
        Ok(stream)
    }

    fn try_frame(&mut self) -> Result<Option<PassthroughFrame>, CaptureError> {
        if self.open.is_none() {
            return Err(CaptureError::NotOpen);
        }
        self.sequence += 1;
        Ok(Some(PassthroughFrame {
            data: self.cached_frame.clone(),
            width: self.width,
            height: self.height,
            sequence: self.sequence,
        }))
    }

    fn stop(&mut self) {
        if self.open.take().is_some() {
            info!(frames = self.sequence, "Test pattern camera stopped");
        }
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

fn checkerboard(width: u32, height: u32) -> Vec<u8> {
    let (r, g, b) = (59u8, 66u8, 51u8);
    let checker_size = 32u32;
    let mut data = Vec::with_capacity((width * height * 4) as usize);

    for y in 0..height {
        for x in 0..width {
            let is_light = ((x / checker_size) + (y / checker_size)) % 2 == 0;
            let factor = if is_light { 1.0_f32 } else { 0.7 };
            data.push((r as f32 * factor) as u8);
            data.push((g as f32 * factor) as u8);
            data.push((b as f32 * factor) as u8);
            data.push(255);
        }
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frames_flow_after_open() {
        let mut camera = TestPatternCamera::new(64, 32);
        assert_eq!(camera.try_frame().err(), Some(CaptureError::NotOpen));

        let info = camera.open(CameraFacing::Environment).await.unwrap();
        assert_eq!((info.width, info.height), (64, 32));

        let frame = camera.try_frame().unwrap().unwrap();
        assert_eq!(frame.data.len(), 64 * 32 * 4);
        assert_eq!(frame.sequence, 1);

        camera.stop();
        assert!(!camera.is_open());
    }

    #[tokio::test]
    async fn denied_camera_never_opens() {
        let mut camera = TestPatternCamera::failing(CaptureError::Denied);
        assert_eq!(
            camera.open(CameraFacing::Environment).await.err(),
            Some(CaptureError::Denied)
        );
        assert!(!camera.is_open());
    }
}
