//! Hands-free cursor switching between monitors based on head direction.
//!
//! A webcam watches the user; each frame the position of the nose tip across
//! the (mirrored) camera image is mapped to one of the monitors, and the mouse
//! cursor jumps to that monitor's center whenever the mapping changes.
//!
//! The pipeline per frame:
//! 1. Capture and mirror a frame (`OpenCV`)
//! 2. Detect the face and its keypoints (SCRFD on ONNX Runtime)
//! 3. Map the facing coordinate to a screen region
//! 4. Debounce against the active region and warp the cursor on change (`X11`)
//!
//! # Examples
//!
//! ## Region mapping and switching
//!
//! ```
//! use head_screen_switch::{
//!     layout::ScreenLayout,
//!     monitor::MonitorDescriptor,
//!     switch::{FaceSample, FacingSwitch},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let layout = ScreenLayout::build(vec![
//!     MonitorDescriptor::new(0, 0, 0, 1920, 1080),
//!     MonitorDescriptor::new(1, 1920, 0, 1920, 1080),
//! ])?;
//! assert_eq!(layout.region_for(500.0, 640), 1);
//!
//! let mut switch = FacingSwitch::new(layout);
//! let event = switch.on_frame(Some(FaceSample::new(100.0)), 640).unwrap();
//! assert_eq!(event.cursor_position(), (960, 540));
//!
//! // Same screen again: debounced
//! assert!(switch.on_frame(Some(FaceSample::new(120.0)), 640).is_none());
//! // No face: nothing changes
//! assert!(switch.on_frame(None, 640).is_none());
//! # Ok(())
//! # }
//! ```
//!
//! ## Full application
//!
//! ```no_run
//! use head_screen_switch::{app::SwitchApp, config::Config, shutdown::ShutdownFlag};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut app = SwitchApp::new(Config::default(), ShutdownFlag::install()?)?;
//! app.run()?;
//! # Ok(())
//! # }
//! ```

/// Screen layout resolver: frame width to region mapping
pub mod layout;

/// Facing-direction switch: debounced region transitions
pub mod switch;

/// Monitor descriptors and discovery
pub mod monitor;

/// SCRFD face detection
pub mod face_detection;

/// Facing coordinate extraction
pub mod facing;

/// Camera capture
pub mod capture;

/// Preview window
pub mod display;

/// Cursor control module for X11 systems
pub mod cursor_control;

/// Main application module
pub mod app;

/// Shutdown signal handling
pub mod shutdown;

/// Utility functions for frame geometry and coordinate conversions
pub mod utils;

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// Configuration management
pub mod config;

pub use error::{Error, Result};
