//! Facing coordinate extraction from camera frames.

use crate::{
    config::FacingLandmark,
    error::Result,
    face_detection::{FaceDetection, FaceDetector},
    switch::FaceSample,
};
use log::debug;
use opencv::core::Mat;

/// Produces at most one face sample per frame
pub trait FaceLocator {
    /// Locate the user's face in a (mirrored) frame
    ///
    /// # Errors
    ///
    /// Returns an error if inference fails
    fn locate(&mut self, frame: &Mat) -> Result<Option<FaceSample>>;

    /// Detection behind the last sample, for drawing
    fn last_detection(&self) -> Option<&FaceDetection> {
        None
    }
}

/// Horizontal facing coordinate of a detection
#[must_use]
pub fn facing_x(detection: &FaceDetection, landmark: FacingLandmark) -> f64 {
    let x = match landmark {
        FacingLandmark::NoseTip => detection
            .nose_tip()
            .map_or_else(|| detection.center_x(), |(x, _)| x),
        FacingLandmark::BoxCenter => detection.center_x(),
    };
    f64::from(x)
}

/// Face locator backed by the SCRFD detector; only the best face counts
pub struct ScrfdLocator {
    detector: FaceDetector,
    landmark: FacingLandmark,
    last: Option<FaceDetection>,
}

impl ScrfdLocator {
    /// Wrap a loaded detector
    #[must_use]
    pub fn new(detector: FaceDetector, landmark: FacingLandmark) -> Self {
        if landmark == FacingLandmark::NoseTip && !detector.has_keypoints() {
            log::warn!("Face model has no keypoints, using the face box center instead of the nose tip");
        }
        Self {
            detector,
            landmark,
            last: None,
        }
    }
}

impl FaceLocator for ScrfdLocator {
    fn locate(&mut self, frame: &Mat) -> Result<Option<FaceSample>> {
        let faces = self.detector.detect(frame)?;
        if faces.len() > 1 {
            debug!("{} faces detected, using the most confident", faces.len());
        }
        self.last = faces.into_iter().next();
        Ok(self
            .last
            .as_ref()
            .map(|face| FaceSample::new(facing_x(face, self.landmark))))
    }

    fn last_detection(&self) -> Option<&FaceDetection> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SCRFD_NUM_KEYPOINTS;

    fn detection(keypoints: bool) -> FaceDetection {
        let mut kps = [(0.0, 0.0); SCRFD_NUM_KEYPOINTS];
        kps[2] = (130.0, 90.0);
        FaceDetection {
            x1: 100.0,
            y1: 50.0,
            x2: 200.0,
            y2: 170.0,
            score: 0.9,
            keypoints: keypoints.then_some(kps),
        }
    }

    #[test]
    fn test_nose_tip_is_default_landmark() {
        assert_eq!(facing_x(&detection(true), FacingLandmark::NoseTip), 130.0);
    }

    #[test]
    fn test_box_center_landmark() {
        assert_eq!(facing_x(&detection(true), FacingLandmark::BoxCenter), 150.0);
    }

    #[test]
    fn test_nose_tip_falls_back_to_center() {
        assert_eq!(facing_x(&detection(false), FacingLandmark::NoseTip), 150.0);
    }
}
