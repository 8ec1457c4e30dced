//! Scenario tests for the facing-direction switch driving a cursor

mod test_helpers;

use head_screen_switch::{
    app::apply_sample,
    layout::ScreenLayout,
    monitor::MonitorDescriptor,
    switch::{FaceSample, FacingState, FacingSwitch},
};
use test_helpers::{create_test_switch, RecordingCursor};

#[test]
fn test_two_monitor_walkthrough() {
    let layout = ScreenLayout::build(vec![
        MonitorDescriptor::new(0, 0, 0, 1920, 1080),
        MonitorDescriptor::new(1, 1920, 0, 1280, 1024),
    ])
    .unwrap();
    let mut switch = FacingSwitch::new(layout);

    let event = switch.on_frame(Some(FaceSample::new(100.0)), 640).unwrap();
    assert_eq!(event.region, 0);
    assert_eq!(event.target_monitor.index, 0);
    assert_eq!(event.cursor_position(), (960, 540));

    let event = switch.on_frame(Some(FaceSample::new(500.0)), 640).unwrap();
    assert_eq!(event.region, 1);
    assert_eq!(event.cursor_position(), (1920 + 640, 512));

    assert!(switch.on_frame(Some(FaceSample::new(550.0)), 640).is_none());

    assert!(switch.on_frame(None, 640).is_none());
    assert_eq!(switch.state(), FacingState::Active(1));
}

#[test]
fn test_three_monitor_boundaries_through_switch() {
    let mut switch = create_test_switch(3).unwrap();
    assert_eq!(switch.on_frame(Some(FaceSample::new(99.999)), 300).unwrap().region, 0);
    assert_eq!(switch.on_frame(Some(FaceSample::new(100.0)), 300).unwrap().region, 1);
    assert_eq!(switch.on_frame(Some(FaceSample::new(300.0)), 300).unwrap().region, 2);
}

#[test]
fn test_repeated_region_emits_once() {
    let mut switch = create_test_switch(2).unwrap();
    let events: Vec<_> = [10.0, 20.0, 30.0, 300.0]
        .iter()
        .filter_map(|&x| switch.on_frame(Some(FaceSample::new(x)), 640))
        .collect();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].region, 0);
}

#[test]
fn test_no_face_never_changes_state() {
    let mut switch = create_test_switch(3).unwrap();
    for _ in 0..10 {
        assert!(switch.on_frame(None, 640).is_none());
    }
    assert_eq!(switch.state(), FacingState::Unset);

    switch.on_frame(Some(FaceSample::new(600.0)), 640);
    for _ in 0..10 {
        assert!(switch.on_frame(None, 640).is_none());
    }
    assert_eq!(switch.current_region(), Some(2));
}

#[test]
fn test_returning_to_previous_screen_switches_again() {
    let mut switch = create_test_switch(2).unwrap();
    let mut cursor = RecordingCursor::default();

    for x in [100.0, 500.0, 100.0, 110.0, 105.0] {
        apply_sample(&mut switch, &mut cursor, Some(FaceSample::new(x)), 640).unwrap();
    }

    assert_eq!(cursor.moves, vec![(960, 540), (2880, 540), (960, 540)]);
}

#[test]
fn test_jitter_near_boundary_is_clamped_not_rejected() {
    let mut switch = create_test_switch(2).unwrap();
    let mut cursor = RecordingCursor::default();

    for x in [-3.0, -0.5, 640.2, 641.0] {
        apply_sample(&mut switch, &mut cursor, Some(FaceSample::new(x)), 640).unwrap();
    }

    assert_eq!(cursor.moves, vec![(960, 540), (2880, 540)]);
}

#[test]
fn test_event_target_is_valid_monitor() {
    let mut switch = create_test_switch(5).unwrap();
    for x in (0..1000).map(|i| f64::from(i) * 0.7 - 20.0) {
        if let Some(event) = switch.on_frame(Some(FaceSample::new(x)), 640) {
            assert!(event.region < 5);
            assert_eq!(event.target_monitor.index, event.region);
        }
        if let Some(region) = switch.current_region() {
            assert!(region < switch.layout().len());
        }
    }
}
