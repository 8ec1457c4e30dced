//! Screen layout resolver.
//!
//! Splits the camera frame width into one contiguous region per monitor.
//! Regions follow monitor-list order from left to right; the physical position
//! of a monitor plays no part in which slice of the frame it gets.

use crate::{
    error::{Error, Result},
    monitor::MonitorDescriptor,
};

/// Immutable partition of the frame width into per-monitor regions
#[derive(Debug, Clone)]
pub struct ScreenLayout {
    monitors: Vec<MonitorDescriptor>,
}

impl ScreenLayout {
    /// Build a layout from the discovered monitors
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the monitor list is empty
    pub fn build(monitors: Vec<MonitorDescriptor>) -> Result<Self> {
        if monitors.is_empty() {
            return Err(Error::Configuration(
                "No monitors discovered; at least one is required".to_string(),
            ));
        }
        Ok(Self { monitors })
    }

    /// Number of regions (one per monitor)
    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    /// Always false: a built layout holds at least one monitor
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    /// Monitors in region order
    #[must_use]
    pub fn monitors(&self) -> &[MonitorDescriptor] {
        &self.monitors
    }

    /// Monitor assigned to a region
    #[must_use]
    pub fn monitor(&self, region: usize) -> Option<&MonitorDescriptor> {
        self.monitors.get(region)
    }

    /// Map a horizontal frame coordinate to a region index.
    ///
    /// Returns the smallest `i` with `x < frame_width / n * (i + 1)`. The
    /// coordinate is clamped into `[0, frame_width]` first, and anything that
    /// clears every boundary lands in the last region.
    #[must_use]
    pub fn region_for(&self, x: f64, frame_width: u32) -> usize {
        let count = self.monitors.len();
        let width = f64::from(frame_width);
        let bin_width = width / count as f64;
        let x = clamp_to_frame(x, width);

        (0..count)
            .find(|&i| x < bin_width * (i + 1) as f64)
            .unwrap_or(count - 1)
    }

    /// Region boundaries for a given frame width
    #[must_use]
    pub fn region_table(&self, frame_width: u32) -> RegionTable {
        let count = self.monitors.len();
        let width = f64::from(frame_width);
        let bin_width = width / count as f64;

        let bins = (0..count)
            .map(|index| RegionBin {
                index,
                upper_bound: if index + 1 == count {
                    width
                } else {
                    bin_width * (index + 1) as f64
                },
            })
            .collect();

        RegionTable { frame_width, bins }
    }
}

fn clamp_to_frame(x: f64, width: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.clamp(0.0, width)
}

/// One region and its exclusive upper boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionBin {
    /// Region (and monitor) index
    pub index: usize,
    /// Exclusive upper bound, except the last bin which includes `frame_width`
    pub upper_bound: f64,
}

/// Region bins covering `[0, frame_width]`
#[derive(Debug, Clone, PartialEq)]
pub struct RegionTable {
    frame_width: u32,
    bins: Vec<RegionBin>,
}

impl RegionTable {
    /// Frame width the table was computed for
    #[must_use]
    pub const fn frame_width(&self) -> u32 {
        self.frame_width
    }

    /// Bins in region order
    #[must_use]
    pub fn bins(&self) -> &[RegionBin] {
        &self.bins
    }

    /// Lower bound of a region
    #[must_use]
    pub fn lower_bound(&self, region: usize) -> Option<f64> {
        if region >= self.bins.len() {
            return None;
        }
        match region {
            0 => Some(0.0),
            _ => self.bins.get(region - 1).map(|b| b.upper_bound),
        }
    }

    /// Look up the region containing `x`, with the top boundary inclusive
    #[must_use]
    pub fn region_for(&self, x: f64) -> usize {
        let x = clamp_to_frame(x, f64::from(self.frame_width));
        let last = self.bins.len().saturating_sub(1);
        self.bins
            .iter()
            .find(|b| x < b.upper_bound)
            .map_or(last, |b| b.index)
    }
}
