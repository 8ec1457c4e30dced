//! Camera capture.
//!
//! [`Camera`] owns the capture device for as long as it lives and releases it
//! on drop, so every way out of the main loop (including `?` on a failed
//! collaborator) gives the device back.

use crate::error::{Error, Result};
use log::{info, warn};
use opencv::{
    core::{self, Mat},
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE},
};

/// Webcam with optional horizontal mirroring
pub struct Camera {
    capture: VideoCapture,
    index: i32,
    mirror: bool,
}

impl Camera {
    /// Open the webcam at `index`
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureFailure`] if no device is available at that index
    pub fn open(index: i32, mirror: bool) -> Result<Self> {
        info!("Opening camera {}", index);
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(Error::CaptureFailure(format!("No camera device available at index {index}")));
        }

        // Low latency: keep at most one buffered frame
        if let Err(e) = capture.set(CAP_PROP_BUFFERSIZE, 1.0) {
            warn!("Could not reduce camera buffer size: {}", e);
        }

        Ok(Self {
            capture,
            index,
            mirror,
        })
    }

    /// Read the next frame, mirrored if configured.
    ///
    /// A frame that cannot be read is reported as `Ok(None)`; deciding when
    /// that becomes fatal is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns an error only if mirroring a successfully read frame fails
    pub fn read(&mut self) -> Result<Option<Mat>> {
        let mut frame = Mat::default();
        match self.capture.read(&mut frame) {
            Ok(true) if !frame.empty() => {}
            Ok(_) => return Ok(None),
            Err(e) => {
                warn!("Camera {} read error: {}", self.index, e);
                return Ok(None);
            }
        }

        if !self.mirror {
            return Ok(Some(frame));
        }

        let mut mirrored = Mat::default();
        core::flip(&frame, &mut mirrored, 1)?;
        Ok(Some(mirrored))
    }
}

impl Drop for Camera {
    fn drop(&mut self) {
        info!("Releasing camera {}", self.index);
        if let Err(e) = self.capture.release() {
            warn!("Failed to release camera {}: {}", self.index, e);
        }
    }
}

/// Counts consecutive failed reads and escalates past a limit
#[derive(Debug, Clone)]
pub struct CaptureFailureTracker {
    limit: u32,
    consecutive: u32,
}

impl CaptureFailureTracker {
    /// Tolerate up to `limit - 1` consecutive failures
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            limit,
            consecutive: 0,
        }
    }

    /// Consecutive failures so far
    #[must_use]
    pub const fn consecutive(&self) -> u32 {
        self.consecutive
    }

    /// A frame was read
    pub fn record_success(&mut self) {
        self.consecutive = 0;
    }

    /// A frame could not be read
    ///
    /// # Errors
    ///
    /// Returns [`Error::CaptureFailure`] once `limit` failures happen in a row
    pub fn record_failure(&mut self) -> Result<()> {
        self.consecutive = self.consecutive.saturating_add(1);
        if self.consecutive >= self.limit {
            return Err(Error::CaptureFailure(format!(
                "{} consecutive frames could not be read",
                self.consecutive
            )));
        }
        warn!(
            "Failed to read frame ({}/{} consecutive)",
            self.consecutive, self.limit
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_escalates_at_limit() {
        let mut tracker = CaptureFailureTracker::new(3);
        assert!(tracker.record_failure().is_ok());
        assert!(tracker.record_failure().is_ok());
        assert!(matches!(tracker.record_failure(), Err(Error::CaptureFailure(_))));
    }

    #[test]
    fn test_tracker_resets_on_success() {
        let mut tracker = CaptureFailureTracker::new(2);
        assert!(tracker.record_failure().is_ok());
        tracker.record_success();
        assert_eq!(tracker.consecutive(), 0);
        assert!(tracker.record_failure().is_ok());
    }

    #[test]
    fn test_tracker_limit_of_one_is_strict() {
        let mut tracker = CaptureFailureTracker::new(1);
        assert!(tracker.record_failure().is_err());
    }

    #[test]
    #[ignore] // Requires a webcam
    fn test_camera_reads_frame() {
        let mut camera = Camera::open(0, true).unwrap();
        assert!(camera.read().unwrap().is_some());
    }
}
