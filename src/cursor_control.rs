//! Cursor control module for X11-based systems.
//!
//! Warps the pointer to absolute positions on the root window, which spans
//! every monitor of the X screen.

use crate::{
    error::{Error, Result},
    utils::safe_cast::i32_to_i16_clamp,
};
use log::{debug, info};
use x11rb::{
    connection::Connection,
    protocol::xproto::{ConnectionExt, Window},
    rust_connection::RustConnection,
};

/// Anything that can place the cursor at an absolute desktop position
pub trait CursorSink {
    /// Move the cursor to `(x, y)` in virtual desktop coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if the windowing system rejects the request
    fn move_to(&mut self, x: i32, y: i32) -> Result<()>;
}

/// Cursor control implementation for X11
pub struct CursorController {
    connection: RustConnection,
    root: Window,
    screen_width: u16,
    screen_height: u16,
}

impl CursorController {
    /// Connect to the X server named by `$DISPLAY`
    ///
    /// # Errors
    ///
    /// Returns an error if no X server is reachable
    pub fn new() -> Result<Self> {
        info!("Initializing X11 cursor controller");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::CursorControl(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::CursorControl("Failed to get screen".to_string()))?;

        let root = screen.root;
        let screen_width = screen.width_in_pixels;
        let screen_height = screen.height_in_pixels;

        info!("Connected to X11 display, root window: {}x{}", screen_width, screen_height);

        Ok(Self {
            connection,
            root,
            screen_width,
            screen_height,
        })
    }

    /// Get current cursor position
    ///
    /// # Errors
    ///
    /// Returns an error if the pointer query fails
    pub fn position(&self) -> Result<(i16, i16)> {
        let reply = self
            .connection
            .query_pointer(self.root)
            .map_err(|e| Error::CursorControl(format!("Failed to send query pointer: {e}")))?
            .reply()
            .map_err(|e| Error::CursorControl(format!("Failed to query pointer: {e}")))?;

        Ok((reply.root_x, reply.root_y))
    }

    /// Root window dimensions
    #[must_use]
    pub const fn screen_size(&self) -> (u16, u16) {
        (self.screen_width, self.screen_height)
    }

    /// Clamp a desktop position into the root window
    #[must_use]
    pub fn clamp_to_root(&self, x: i32, y: i32) -> (i16, i16) {
        clamp_to_bounds(x, y, self.screen_width, self.screen_height)
    }
}

impl CursorSink for CursorController {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        let (x, y) = self.clamp_to_root(x, y);
        debug!("Warping cursor to ({}, {})", x, y);

        self.connection
            .warp_pointer(x11rb::NONE, self.root, 0, 0, 0, 0, x, y)
            .map_err(|e| Error::CursorControl(format!("Failed to warp pointer: {e}")))?;

        self.connection
            .flush()
            .map_err(|e| Error::CursorControl(format!("Failed to flush connection: {e}")))?;

        Ok(())
    }
}

fn clamp_to_bounds(x: i32, y: i32, width: u16, height: u16) -> (i16, i16) {
    let max_x = i32::from(width.saturating_sub(1));
    let max_y = i32::from(height.saturating_sub(1));
    (
        i32_to_i16_clamp(x.clamp(0, max_x)),
        i32_to_i16_clamp(y.clamp(0, max_y)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore] // Requires X11 display
    fn test_cursor_controller_creation() {
        let mut controller = CursorController::new().unwrap();
        let (w, h) = controller.screen_size();
        controller.move_to(i32::from(w / 2), i32::from(h / 2)).unwrap();
    }

    #[test]
    fn test_clamp_inside_bounds() {
        assert_eq!(clamp_to_bounds(960, 540, 3840, 1080), (960, 540));
    }

    #[test]
    fn test_clamp_outside_bounds() {
        assert_eq!(clamp_to_bounds(-10, 5000, 1920, 1080), (0, 1079));
        assert_eq!(clamp_to_bounds(100_000, -1, 40_000, 1080), (i16::MAX, 0));
    }

    #[test]
    fn test_clamp_zero_sized_root() {
        assert_eq!(clamp_to_bounds(10, 10, 0, 0), (0, 0));
    }
}
