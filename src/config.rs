//! Configuration management for the screen switch application

use crate::{
    constants::{
        DEFAULT_CAMERA_INDEX, DEFAULT_CONFIDENCE_THRESHOLD, DEFAULT_MAX_CAPTURE_FAILURES,
        DEFAULT_MODEL_PATH, DEFAULT_NMS_THRESHOLD, DEFAULT_WINDOW_NAME,
    },
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Camera configuration
    pub camera: CameraConfig,

    /// Face detection configuration
    pub detection: DetectionConfig,

    /// Display configuration
    pub display: DisplayConfig,

    /// Static monitor list; when absent, monitors are discovered through X11
    pub monitors: Option<Vec<MonitorGeometry>>,
}

/// Camera capture parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Webcam index
    pub index: i32,

    /// Mirror frames horizontally so moving your head left moves left on screen
    pub mirror: bool,

    /// Consecutive failed reads tolerated before the capture is declared dead
    pub max_consecutive_capture_failures: u32,
}

/// Face detection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Path to the SCRFD face detector ONNX model
    pub model: PathBuf,

    /// Confidence threshold for face detection (0.0-1.0)
    pub confidence_threshold: f32,

    /// IoU threshold for non-maximum suppression (0.0-1.0)
    pub nms_threshold: f32,

    /// Which point of the face is used as the facing coordinate
    pub landmark: FacingLandmark,
}

/// Point of the face used as the facing coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacingLandmark {
    /// Nose tip keypoint
    #[default]
    NoseTip,
    /// Horizontal center of the face bounding box
    BoxCenter,
}

/// Display configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the live camera preview
    pub show_preview: bool,

    /// Preview window title
    pub window_name: String,
}

/// Monitor rectangle in virtual desktop coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: DEFAULT_CAMERA_INDEX,
            mirror: true,
            max_consecutive_capture_failures: DEFAULT_MAX_CAPTURE_FAILURES,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            model: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
            nms_threshold: DEFAULT_NMS_THRESHOLD,
            landmark: FacingLandmark::NoseTip,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_preview: true,
            window_name: DEFAULT_WINDOW_NAME.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid YAML
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the text is not a valid configuration
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Configuration(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::Configuration(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.detection.confidence_threshold) {
            return Err(Error::Configuration(
                "Confidence threshold must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.nms_threshold) {
            return Err(Error::Configuration(
                "NMS threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.camera.max_consecutive_capture_failures == 0 {
            return Err(Error::Configuration(
                "max_consecutive_capture_failures must be greater than 0".to_string(),
            ));
        }

        if let Some(monitors) = &self.monitors {
            if monitors.is_empty() {
                return Err(Error::Configuration(
                    "Static monitor list is empty; remove it to use X11 discovery".to_string(),
                ));
            }
            if let Some((i, _)) = monitors
                .iter()
                .enumerate()
                .find(|(_, m)| m.width == 0 || m.height == 0)
            {
                return Err(Error::Configuration(format!("Monitor {i} has zero size")));
            }
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Screen Switch Configuration

camera:
  index: 0
  mirror: true
  max_consecutive_capture_failures: 30

detection:
  model: "assets/face_detector.onnx"
  confidence_threshold: 0.5
  nms_threshold: 0.4
  landmark: nose_tip   # or box_center

display:
  show_preview: true
  window_name: "Head Screen Switch"

# Optional: skip X11 discovery and use these monitors, in region order
# monitors:
#   - { x: 0, y: 0, width: 1920, height: 1080 }
#   - { x: 1920, y: 0, width: 2560, height: 1440 }
"#;
