//! Tests for the screen layout resolver

mod test_helpers;

use head_screen_switch::{layout::ScreenLayout, monitor::MonitorDescriptor, Error};
use test_helpers::side_by_side;

#[test]
fn test_empty_monitor_list_is_a_configuration_error() {
    match ScreenLayout::build(Vec::new()) {
        Err(Error::Configuration(msg)) => assert!(msg.contains("monitor")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_three_monitors_300px_scenario() {
    let layout = ScreenLayout::build(side_by_side(3)).unwrap();
    assert_eq!(layout.region_for(99.999, 300), 0);
    assert_eq!(layout.region_for(100.0, 300), 1);
    assert_eq!(layout.region_for(300.0, 300), 2);
}

#[test]
fn test_bins_are_contiguous_and_cover_frame() {
    for n in 1..=6 {
        for w in [64u32, 300, 640, 1280, 1921] {
            let layout = ScreenLayout::build(side_by_side(n)).unwrap();
            let table = layout.region_table(w);

            assert_eq!(table.bins().len(), n);
            assert_eq!(table.frame_width(), w);
            assert_eq!(table.bins().last().unwrap().upper_bound, f64::from(w));

            let mut previous = 0.0;
            for (i, bin) in table.bins().iter().enumerate() {
                assert_eq!(bin.index, i);
                assert_eq!(table.lower_bound(i), Some(previous));
                assert!(bin.upper_bound > previous, "n={n} w={w} bin {i} is empty");
                previous = bin.upper_bound;
            }

            assert_eq!(layout.region_for(f64::from(w - 1), w), n - 1);
            assert_eq!(layout.region_for(0.0, w), 0);
        }
    }
}

#[test]
fn test_every_pixel_maps_to_exactly_one_ordered_region() {
    let layout = ScreenLayout::build(side_by_side(4)).unwrap();
    let regions: Vec<usize> = (0..640).map(|x| layout.region_for(f64::from(x), 640)).collect();

    assert!(regions.windows(2).all(|w| w[0] <= w[1]));
    for region in 0..4 {
        assert_eq!(regions.iter().filter(|&&r| r == region).count(), 160);
    }
}

#[test]
fn test_regions_follow_list_order_not_position() {
    let layout = ScreenLayout::build(vec![
        MonitorDescriptor::new(0, 3840, 0, 1920, 1080),
        MonitorDescriptor::new(1, 0, 0, 1920, 1080),
        MonitorDescriptor::new(2, 1920, 0, 1920, 1080),
    ])
    .unwrap();

    let xs: Vec<i32> = [10.0, 320.0, 630.0]
        .iter()
        .map(|&x| layout.monitor(layout.region_for(x, 640)).unwrap().x)
        .collect();
    assert_eq!(xs, vec![3840, 0, 1920]);
}
