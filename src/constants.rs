//! Constants used throughout the application

/// Default webcam index
pub const DEFAULT_CAMERA_INDEX: i32 = 0;

/// Default SCRFD face detector model path
pub const DEFAULT_MODEL_PATH: &str = "assets/face_detector.onnx";

/// Default face detection confidence threshold
pub const DEFAULT_CONFIDENCE_THRESHOLD: f32 = 0.5;

/// Default IoU threshold for non-maximum suppression
pub const DEFAULT_NMS_THRESHOLD: f32 = 0.4;

/// Consecutive failed frame reads tolerated before giving up
pub const DEFAULT_MAX_CAPTURE_FAILURES: u32 = 30;

/// Preview window title
pub const DEFAULT_WINDOW_NAME: &str = "Head Screen Switch";

/// SCRFD keypoint order: left eye, right eye, nose, left mouth, right mouth
pub const SCRFD_NUM_KEYPOINTS: usize = 5;
pub const SCRFD_NOSE_KEYPOINT: usize = 2;

/// SCRFD default input size when the model has dynamic dimensions
pub const SCRFD_DEFAULT_INPUT_SIZE: i32 = 640;

/// Image normalization constants for face detection
pub const IMAGE_NORMALIZATION_OFFSET: f32 = 127.5;
pub const IMAGE_NORMALIZATION_SCALE: f32 = 128.0;

/// Key codes that end the main loop
pub const KEY_ESCAPE: i32 = 27;
pub const KEY_QUIT: i32 = b'q' as i32;
