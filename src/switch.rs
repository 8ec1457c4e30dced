//! Facing-direction switch.
//!
//! Turns one optional face sample per frame into at most one cursor
//! relocation. The switch remembers the region it last activated and only
//! fires when a sample maps somewhere else, so a steady head never re-triggers
//! and frames without a face leave everything as it was.

use crate::{layout::ScreenLayout, monitor::MonitorDescriptor};
use log::debug;

/// Horizontal facing coordinate of the detected face, in frame pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceSample {
    /// Pixel column the user is facing, nominally in `[0, frame_width)`
    pub facing_x: f64,
}

impl FaceSample {
    /// Create a sample from a pixel coordinate
    #[must_use]
    pub const fn new(facing_x: f64) -> Self {
        Self { facing_x }
    }

    /// Create a sample from a coordinate normalized to `[0, 1)`
    #[must_use]
    pub fn from_normalized(normalized_x: f64, frame_width: u32) -> Self {
        Self::new(normalized_x * f64::from(frame_width))
    }
}

/// Which region, if any, the switch last activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingState {
    /// No face seen yet
    #[default]
    Unset,
    /// Cursor was last sent to this region's monitor
    Active(usize),
}

/// Instruction to relocate the cursor onto another monitor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchEvent {
    /// Region that was entered
    pub region: usize,
    /// Monitor assigned to that region
    pub target_monitor: MonitorDescriptor,
    /// Absolute cursor x (monitor center)
    pub cursor_x: i32,
    /// Absolute cursor y (monitor center)
    pub cursor_y: i32,
}

impl SwitchEvent {
    /// Cursor target as `(x, y)`
    #[must_use]
    pub const fn cursor_position(&self) -> (i32, i32) {
        (self.cursor_x, self.cursor_y)
    }
}

/// Debounced mapping from face samples to monitor switches
#[derive(Debug, Clone)]
pub struct FacingSwitch {
    layout: ScreenLayout,
    state: FacingState,
}

impl FacingSwitch {
    /// Create a switch in the `Unset` state
    #[must_use]
    pub fn new(layout: ScreenLayout) -> Self {
        Self {
            layout,
            state: FacingState::Unset,
        }
    }

    /// Layout used for region lookups
    #[must_use]
    pub const fn layout(&self) -> &ScreenLayout {
        &self.layout
    }

    /// Current state
    #[must_use]
    pub const fn state(&self) -> FacingState {
        self.state
    }

    /// Currently active region, if any
    #[must_use]
    pub const fn current_region(&self) -> Option<usize> {
        match self.state {
            FacingState::Unset => None,
            FacingState::Active(region) => Some(region),
        }
    }

    /// Feed one frame's worth of input.
    ///
    /// Returns an event only when the sample maps to a region other than the
    /// active one. Missing or non-finite samples never change the state.
    pub fn on_frame(&mut self, sample: Option<FaceSample>, frame_width: u32) -> Option<SwitchEvent> {
        let sample = sample?;
        if !sample.facing_x.is_finite() {
            debug!("Ignoring non-finite facing coordinate {}", sample.facing_x);
            return None;
        }

        let region = self.layout.region_for(sample.facing_x, frame_width);
        if self.state == FacingState::Active(region) {
            return None;
        }

        // region_for never exceeds len - 1, so the lookup always succeeds
        let target_monitor = *self.layout.monitor(region)?;
        self.state = FacingState::Active(region);

        let (cursor_x, cursor_y) = target_monitor.center();
        debug!(
            "Facing x={:.1} of {} -> region {}",
            sample.facing_x, frame_width, region
        );

        Some(SwitchEvent {
            region,
            target_monitor,
            cursor_x,
            cursor_y,
        })
    }
}
