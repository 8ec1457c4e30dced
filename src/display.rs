//! Live preview window.

use crate::{
    error::Result,
    face_detection::FaceDetection,
    layout::RegionTable,
    utils::safe_cast::f64_to_i32_clamp,
};
use log::{info, warn};
use opencv::{
    core::{Mat, Point, Scalar},
    highgui::{self, WINDOW_NORMAL},
    imgproc::{self, FONT_HERSHEY_SIMPLEX, LINE_8},
    prelude::*,
};

/// What to draw on top of a frame
#[derive(Debug, Clone, Copy, Default)]
pub struct Overlay<'a> {
    /// Region boundaries for the current frame width
    pub regions: Option<&'a RegionTable>,
    /// Active region, highlighted
    pub active_region: Option<usize>,
    /// Detected face
    pub face: Option<&'a FaceDetection>,
    /// Facing coordinate of this frame
    pub facing_x: Option<f64>,
}

/// Preview window, destroyed when dropped
pub struct PreviewWindow {
    name: String,
}

impl PreviewWindow {
    /// Create the window
    ///
    /// # Errors
    ///
    /// Returns an error if `HighGUI` cannot create a window (e.g. no display)
    pub fn open(name: &str) -> Result<Self> {
        highgui::named_window(name, WINDOW_NORMAL)?;
        info!("Preview window \"{}\" opened", name);
        Ok(Self { name: name.to_string() })
    }

    /// Draw the overlay on a copy of `frame` and show it
    ///
    /// # Errors
    ///
    /// Returns an error if drawing or showing fails
    pub fn show(&self, frame: &Mat, overlay: &Overlay<'_>) -> Result<()> {
        let mut canvas = frame.clone();
        draw_overlay(&mut canvas, overlay)?;
        highgui::imshow(&self.name, &canvas)?;
        Ok(())
    }

    /// Poll the keyboard for 1 ms, returning the key code or -1
    ///
    /// # Errors
    ///
    /// Returns an error if `HighGUI` fails
    pub fn poll_key(&self) -> Result<i32> {
        Ok(highgui::wait_key(1)?)
    }
}

impl Drop for PreviewWindow {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_window(&self.name) {
            warn!("Failed to destroy window \"{}\": {}", self.name, e);
        }
    }
}

fn draw_overlay(frame: &mut Mat, overlay: &Overlay<'_>) -> Result<()> {
    let height = frame.rows();
    let width = frame.cols();

    if let Some(table) = overlay.regions {
        for bin in table.bins().iter().take(table.bins().len().saturating_sub(1)) {
            let x = f64_to_i32_clamp(bin.upper_bound, 0, width);
            imgproc::line(
                frame,
                Point::new(x, 0),
                Point::new(x, height),
                Scalar::new(200.0, 200.0, 200.0, 0.0),
                1,
                LINE_8,
                0,
            )?;
        }

        if let Some(active) = overlay.active_region {
            let left = table.lower_bound(active).unwrap_or(0.0);
            imgproc::put_text(
                frame,
                &format!("Screen {active}"),
                Point::new(f64_to_i32_clamp(left, 0, width) + 10, 30),
                FONT_HERSHEY_SIMPLEX,
                0.8,
                Scalar::new(0.0, 255.0, 0.0, 0.0),
                2,
                LINE_8,
                false,
            )?;
        }
    }

    if let Some(face) = overlay.face {
        imgproc::rectangle(frame, face.rect(), Scalar::new(0.0, 255.0, 0.0, 0.0), 2, LINE_8, 0)?;
    }

    if let Some(x) = overlay.facing_x {
        imgproc::circle(
            frame,
            Point::new(f64_to_i32_clamp(x, 0, width), height / 2),
            6,
            Scalar::new(0.0, 0.0, 255.0, 0.0),
            -1,
            LINE_8,
            0,
        )?;
    }

    Ok(())
}
