//! Helper functions and utilities for tests

#![allow(dead_code)]

use head_screen_switch::{
    cursor_control::CursorSink, layout::ScreenLayout, monitor::MonitorDescriptor, switch::FacingSwitch, Result,
};

/// `count` side-by-side 1920x1080 monitors
pub fn side_by_side(count: usize) -> Vec<MonitorDescriptor> {
    (0..count)
        .map(|i| MonitorDescriptor::new(i, 1920 * i32::try_from(i).unwrap_or(0), 0, 1920, 1080))
        .collect()
}

/// Switch over `count` side-by-side monitors
pub fn create_test_switch(count: usize) -> Result<FacingSwitch> {
    Ok(FacingSwitch::new(ScreenLayout::build(side_by_side(count))?))
}

/// Cursor sink that records every move
#[derive(Debug, Default)]
pub struct RecordingCursor {
    pub moves: Vec<(i32, i32)>,
}

impl CursorSink for RecordingCursor {
    fn move_to(&mut self, x: i32, y: i32) -> Result<()> {
        self.moves.push((x, y));
        Ok(())
    }
}
