//! Main application module: the per-frame capture, inference and switch loop.

use crate::{
    capture::{Camera, CaptureFailureTracker},
    config::Config,
    constants::{KEY_ESCAPE, KEY_QUIT},
    cursor_control::{CursorController, CursorSink},
    display::{Overlay, PreviewWindow},
    error::Result,
    face_detection::FaceDetector,
    facing::{FaceLocator, ScrfdLocator},
    layout::ScreenLayout,
    monitor::{log_monitors, MonitorDescriptor, MonitorSource, StaticMonitorSource, X11MonitorSource},
    shutdown::ShutdownFlag,
    switch::{FaceSample, FacingSwitch, SwitchEvent},
    utils::safe_cast::i32_to_u32,
};
use log::{debug, info};

/// Discover monitors from the configured list, or from X11 when none is given
///
/// # Errors
///
/// Returns an error if X11 cannot be queried
pub fn discover_monitors(config: &Config) -> Result<Vec<MonitorDescriptor>> {
    match &config.monitors {
        Some(geometries) => {
            info!("Using {} monitor(s) from configuration", geometries.len());
            StaticMonitorSource::new(geometries.clone()).discover()
        }
        None => X11MonitorSource::new().discover(),
    }
}

/// Run one sample through the switch and move the cursor if it fired
///
/// # Errors
///
/// Returns an error if the cursor cannot be moved
pub fn apply_sample(
    switch: &mut FacingSwitch,
    cursor: &mut dyn CursorSink,
    sample: Option<FaceSample>,
    frame_width: u32,
) -> Result<Option<SwitchEvent>> {
    let Some(event) = switch.on_frame(sample, frame_width) else {
        return Ok(None);
    };

    cursor.move_to(event.cursor_x, event.cursor_y)?;
    info!(
        "Switched to screen {} (cursor at {}, {})",
        event.region, event.cursor_x, event.cursor_y
    );
    Ok(Some(event))
}

/// Head-facing screen switch application
pub struct SwitchApp {
    camera: Camera,
    locator: Box<dyn FaceLocator>,
    switch: FacingSwitch,
    cursor: Box<dyn CursorSink>,
    preview: Option<PreviewWindow>,
    failures: CaptureFailureTracker,
    shutdown: ShutdownFlag,
}

impl SwitchApp {
    /// Set up every collaborator.
    ///
    /// Monitors are resolved before the camera is opened so that an impossible
    /// layout fails without touching any device.
    ///
    /// # Errors
    ///
    /// Returns an error if no monitors are found or any device or model fails
    /// to initialize
    pub fn new(config: Config, shutdown: ShutdownFlag) -> Result<Self> {
        info!("Initializing head screen switch");
        config.validate()?;

        let monitors = discover_monitors(&config)?;
        let layout = ScreenLayout::build(monitors)?;
        log_monitors(layout.monitors());

        let detector = FaceDetector::new(
            &config.detection.model,
            config.detection.confidence_threshold,
            config.detection.nms_threshold,
        )?;
        let locator = ScrfdLocator::new(detector, config.detection.landmark);

        let cursor = CursorController::new()?;
        let camera = Camera::open(config.camera.index, config.camera.mirror)?;

        let preview = if config.display.show_preview {
            Some(PreviewWindow::open(&config.display.window_name)?)
        } else {
            info!("Running headless; press Ctrl-C to stop");
            None
        };

        Ok(Self {
            camera,
            locator: Box::new(locator),
            switch: FacingSwitch::new(layout),
            cursor: Box::new(cursor),
            preview,
            failures: CaptureFailureTracker::new(config.camera.max_consecutive_capture_failures),
            shutdown,
        })
    }

    /// Run until the user quits or a collaborator fails
    ///
    /// # Errors
    ///
    /// Returns an error if the camera stays unreadable, inference fails or
    /// the cursor cannot be moved
    pub fn run(&mut self) -> Result<()> {
        info!("Starting main loop");
        let mut frame_count: u64 = 0;

        loop {
            if self.shutdown.is_requested() {
                info!("Shutdown signal received");
                break;
            }

            let Some(frame) = self.camera.read()? else {
                self.failures.record_failure()?;
                // A lost frame counts as a frame without a face
                self.switch.on_frame(None, 0);
                continue;
            };
            self.failures.record_success();
            frame_count += 1;

            let frame_width = i32_to_u32(frame.cols())?;
            let sample = self.locator.locate(&frame)?;
            debug!("Frame {}: {:?}", frame_count, sample);

            apply_sample(&mut self.switch, self.cursor.as_mut(), sample, frame_width)?;

            if let Some(preview) = &self.preview {
                let regions = self.switch.layout().region_table(frame_width);
                let overlay = Overlay {
                    regions: Some(&regions),
                    active_region: self.switch.current_region(),
                    face: self.locator.last_detection(),
                    facing_x: sample.map(|s| s.facing_x),
                };
                preview.show(&frame, &overlay)?;

                let key = preview.poll_key()?;
                if key == KEY_ESCAPE || key == KEY_QUIT {
                    info!("Exit requested by user");
                    break;
                }
            }
        }

        info!("Application shutting down after {} frames", frame_count);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MonitorGeometry;

    #[derive(Default)]
    struct RecordingCursor {
        moves: Vec<(i32, i32)>,
    }

    impl CursorSink for RecordingCursor {
        fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
            self.moves.push((x, y));
            Ok(())
        }
    }

    #[test]
    fn test_apply_sample_moves_once_per_region() {
        let layout = ScreenLayout::build(vec![
            MonitorDescriptor::new(0, 0, 0, 1920, 1080),
            MonitorDescriptor::new(1, 1920, 0, 1920, 1080),
        ])
        .unwrap();
        let mut switch = FacingSwitch::new(layout);
        let mut cursor = RecordingCursor::default();

        for x in [100.0, 120.0, 500.0, 510.0] {
            apply_sample(&mut switch, &mut cursor, Some(FaceSample::new(x)), 640).unwrap();
        }
        apply_sample(&mut switch, &mut cursor, None, 640).unwrap();

        assert_eq!(cursor.moves, vec![(960, 540), (2880, 540)]);
    }

    #[test]
    fn test_discover_monitors_prefers_config() {
        let config = Config {
            monitors: Some(vec![MonitorGeometry { x: 0, y: 0, width: 1280, height: 720 }]),
            ..Config::default()
        };
        let monitors = discover_monitors(&config).unwrap();
        assert_eq!(monitors, vec![MonitorDescriptor::new(0, 0, 0, 1280, 720)]);
    }
}
