//! Monitor topology discovery.
//!
//! Monitors are reported in the order the display server lists them and are
//! indexed in that order. The index, not the physical x offset, decides which
//! facing region a monitor is assigned to.

use crate::{
    config::MonitorGeometry,
    error::{Error, Result},
};
use log::{debug, info, warn};
use x11rb::{
    connection::{Connection, RequestConnection},
    protocol::randr::{self, ConnectionExt as _},
    rust_connection::RustConnection,
};

/// One physical monitor in discovery order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorDescriptor {
    /// Ordinal position in discovery order
    pub index: usize,
    /// Left edge in virtual desktop coordinates
    pub x: i32,
    /// Top edge in virtual desktop coordinates
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl MonitorDescriptor {
    /// Create a descriptor
    #[must_use]
    pub const fn new(index: usize, x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            index,
            x,
            y,
            width,
            height,
        }
    }

    /// Absolute center of the monitor, rounded down like integer division
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        (
            offset_by_half(self.x, self.width),
            offset_by_half(self.y, self.height),
        )
    }
}

fn offset_by_half(origin: i32, extent: u32) -> i32 {
    let half = i32::try_from(extent / 2).unwrap_or(i32::MAX);
    origin.saturating_add(half)
}

/// Source of the monitor list, queried once at startup
pub trait MonitorSource {
    /// Discover monitors in their intrinsic order
    ///
    /// # Errors
    ///
    /// Returns an error if the display server cannot be queried
    fn discover(&self) -> Result<Vec<MonitorDescriptor>>;
}

/// Monitors listed in the configuration file
#[derive(Debug, Clone)]
pub struct StaticMonitorSource {
    geometries: Vec<MonitorGeometry>,
}

impl StaticMonitorSource {
    /// Wrap a configured monitor list
    #[must_use]
    pub fn new(geometries: Vec<MonitorGeometry>) -> Self {
        Self { geometries }
    }
}

impl MonitorSource for StaticMonitorSource {
    fn discover(&self) -> Result<Vec<MonitorDescriptor>> {
        Ok(self
            .geometries
            .iter()
            .enumerate()
            .map(|(index, g)| MonitorDescriptor::new(index, g.x, g.y, g.width, g.height))
            .collect())
    }
}

/// Monitors reported by the X server through `RandR`
#[derive(Debug, Default, Clone, Copy)]
pub struct X11MonitorSource;

impl X11MonitorSource {
    /// Create a new X11 monitor source
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl MonitorSource for X11MonitorSource {
    fn discover(&self) -> Result<Vec<MonitorDescriptor>> {
        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::X11(format!("Failed to connect to X11: {e}")))?;

        let screen = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::X11("Failed to get screen".to_string()))?;
        let root = screen.root;
        let root_size = (screen.width_in_pixels, screen.height_in_pixels);

        if !supports_monitor_query(&connection)? {
            warn!("RandR 1.5 not available, treating the root window as a single monitor");
            return Ok(vec![MonitorDescriptor::new(
                0,
                0,
                0,
                u32::from(root_size.0),
                u32::from(root_size.1),
            )]);
        }

        let reply = connection
            .randr_get_monitors(root, true)
            .map_err(|e| Error::X11(format!("Failed to send RandR GetMonitors: {e}")))?
            .reply()
            .map_err(|e| Error::X11(format!("RandR GetMonitors failed: {e}")))?;

        let monitors: Vec<MonitorDescriptor> = reply
            .monitors
            .iter()
            .enumerate()
            .map(|(index, m)| {
                debug!(
                    "RandR monitor {}: {}x{}+{}+{} primary={}",
                    index, m.width, m.height, m.x, m.y, m.primary
                );
                MonitorDescriptor::new(
                    index,
                    i32::from(m.x),
                    i32::from(m.y),
                    u32::from(m.width),
                    u32::from(m.height),
                )
            })
            .collect();

        Ok(monitors)
    }
}

fn supports_monitor_query(connection: &RustConnection) -> Result<bool> {
    let present = connection
        .extension_information(randr::X11_EXTENSION_NAME)
        .map_err(|e| Error::X11(format!("Failed to query RandR extension: {e}")))?
        .is_some();
    if !present {
        return Ok(false);
    }

    let version = connection
        .randr_query_version(1, 5)
        .map_err(|e| Error::X11(format!("Failed to send RandR QueryVersion: {e}")))?
        .reply()
        .map_err(|e| Error::X11(format!("RandR QueryVersion failed: {e}")))?;

    Ok(version.major_version > 1 || (version.major_version == 1 && version.minor_version >= 5))
}

/// Log the discovered monitors at startup
pub fn log_monitors(monitors: &[MonitorDescriptor]) {
    info!("Discovered {} monitor(s)", monitors.len());
    for m in monitors {
        let (cx, cy) = m.center();
        info!(
            "  screen {}: {}x{} at ({}, {}), center ({}, {})",
            m.index, m.width, m.height, m.x, m.y, cx, cy
        );
    }
}
