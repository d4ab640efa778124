//! Unit tests for SplitPaneLayout.
//!
//! Covers initial placement, drag clamping, orientation changes with
//! per-orientation memory, frame geometry and the drag hint lifecycle.

use rstest::rstest;

use splitscreen::managers::split_layout::SplitPaneLayout;
use splitscreen::types::layout::{HintState, LayoutConfig, Orientation, Rect};

/// Portrait container 300 wide, 400 tall; divider starts at 200.
fn portrait_layout() -> SplitPaneLayout {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(300.0, 400.0);
    layout
}

#[test]
fn test_first_bounds_place_divider_at_midpoint() {
    let layout = portrait_layout();
    assert_eq!(layout.orientation(), Orientation::Portrait);
    assert_eq!(layout.total_extent(), 400.0);
    assert_eq!(layout.divider_position(), 200.0);
    assert_eq!(layout.divider_range(), (100.0, 300.0));
}

#[test]
fn test_square_container_is_portrait() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(500.0, 500.0);
    assert_eq!(layout.orientation(), Orientation::Portrait);
}

#[rstest]
#[case(0.0, 200.0)]
#[case(50.0, 250.0)]
#[case(100.0, 300.0)]
#[case(150.0, 300.0)]
#[case(10_000.0, 300.0)]
#[case(-100.0, 100.0)]
#[case(-150.0, 100.0)]
#[case(f64::NAN, 200.0)]
#[case(f64::INFINITY, 200.0)]
fn test_drag_is_clamped_to_min_pane(#[case] delta: f64, #[case] expected: f64) {
    let mut layout = portrait_layout();
    assert_eq!(layout.drag_by(delta), expected, "delta={delta}");
    assert_eq!(layout.divider_position(), expected);
}

#[test]
fn test_drags_accumulate() {
    let mut layout = portrait_layout();
    layout.begin_drag();
    layout.drag_by(30.0);
    layout.drag_by(30.0);
    assert_eq!(layout.drag_by(-10.0), 250.0);
    assert!(layout.is_dragging());
    layout.end_drag();
    assert!(!layout.is_dragging());
    assert_eq!(layout.divider_position(), 250.0);
}

#[test]
fn test_set_divider_position_clamps() {
    let mut layout = portrait_layout();
    layout.set_divider_position(5.0);
    assert_eq!(layout.divider_position(), 100.0);
    layout.set_divider_position(260.0);
    assert_eq!(layout.divider_position(), 260.0);
}

#[test]
fn test_resize_same_orientation_keeps_ratio() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(400.0, 800.0);
    layout.drag_by(-200.0);
    assert_eq!(layout.divider_position(), 200.0);

    layout.set_bounds(400.0, 1000.0);
    assert_eq!(layout.divider_position(), 250.0);
}

#[test]
fn test_rotation_scales_then_restores_remembered_positions() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(400.0, 800.0);
    layout.drag_by(-200.0);
    assert_eq!(layout.divider_position(), 200.0);

    // First landscape visit: no memory yet, so the ratio carries over.
    layout.set_bounds(800.0, 400.0);
    assert_eq!(layout.orientation(), Orientation::Landscape);
    assert_eq!(layout.total_extent(), 800.0);
    assert_eq!(layout.divider_position(), 200.0);

    layout.drag_by(400.0);
    assert_eq!(layout.divider_position(), 600.0);

    layout.set_bounds(400.0, 800.0);
    assert_eq!(layout.orientation(), Orientation::Portrait);
    assert_eq!(layout.divider_position(), 200.0);

    layout.set_bounds(800.0, 400.0);
    assert_eq!(layout.divider_position(), 600.0);
}

#[test]
fn test_remembered_position_is_clamped_to_new_extent() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(400.0, 800.0);
    layout.drag_by(300.0);
    assert_eq!(layout.divider_position(), 700.0);

    layout.set_bounds(800.0, 400.0);
    // Portrait shrinks while the device is rotated.
    layout.set_bounds(300.0, 400.0);
    assert_eq!(layout.divider_position(), 300.0);
}

#[test]
fn test_empty_first_bounds_do_not_count_as_layout() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(0.0, 0.0);
    assert_eq!(layout.divider_position(), 0.0);

    layout.set_bounds(800.0, 400.0);
    assert_eq!(layout.orientation(), Orientation::Landscape);
    assert_eq!(layout.divider_position(), 400.0);

    // Nothing real was remembered for portrait, so it starts at the midpoint.
    layout.set_bounds(400.0, 800.0);
    assert_eq!(layout.divider_position(), 400.0);
}

#[test]
fn test_tiny_extent_is_not_remembered_on_rotation() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(400.0, 800.0);
    layout.drag_by(-200.0);

    layout.set_bounds(100.0, 150.0);
    assert_eq!(layout.divider_position(), 75.0);

    layout.set_bounds(800.0, 400.0);
    assert_eq!(layout.divider_position(), 400.0);

    layout.set_bounds(400.0, 800.0);
    assert_eq!(layout.divider_position(), 400.0);
}

#[test]
fn test_invalid_bounds_are_ignored() {
    let mut layout = portrait_layout();
    layout.set_bounds(f64::NAN, 400.0);
    layout.set_bounds(300.0, -1.0);
    layout.set_bounds(f64::INFINITY, f64::INFINITY);
    assert_eq!(layout.total_extent(), 400.0);
    assert_eq!(layout.divider_position(), 200.0);
}

#[test]
fn test_container_too_small_for_two_panes_uses_midpoint() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(120.0, 180.0);
    assert_eq!(layout.divider_range(), (90.0, 90.0));
    assert_eq!(layout.drag_by(-50.0), 90.0);

    layout.set_bounds(0.0, 0.0);
    assert_eq!(layout.divider_position(), 0.0);
}

#[test]
fn test_custom_min_pane() {
    let config = LayoutConfig {
        min_pane: 50.0,
        ..LayoutConfig::default()
    };
    let mut layout = SplitPaneLayout::new(config, true);
    layout.set_bounds(300.0, 400.0);
    assert_eq!(layout.drag_by(-1000.0), 50.0);
    assert_eq!(layout.drag_by(1000.0), 350.0);
}

#[test]
fn test_portrait_frames() {
    let layout = portrait_layout();
    let frames = layout.frames();

    assert_eq!(frames.orientation, Orientation::Portrait);
    assert_eq!(frames.divider_position, 200.0);
    assert_eq!(frames.first_pane, Rect { x: 0.0, y: 0.0, width: 300.0, height: 200.0 });
    assert_eq!(frames.second_pane, Rect { x: 0.0, y: 200.0, width: 300.0, height: 200.0 });
    assert_eq!(frames.divider_handle, Rect { x: 0.0, y: 190.5, width: 300.0, height: 19.0 });
}

#[test]
fn test_landscape_frames() {
    let mut layout = SplitPaneLayout::default();
    layout.set_bounds(800.0, 400.0);
    layout.drag_by(-100.0);
    let frames = layout.frames();

    assert_eq!(frames.orientation, Orientation::Landscape);
    assert_eq!(frames.total_extent, 800.0);
    assert_eq!(frames.first_pane, Rect { x: 0.0, y: 0.0, width: 300.0, height: 400.0 });
    assert_eq!(frames.second_pane, Rect { x: 300.0, y: 0.0, width: 500.0, height: 400.0 });
    assert_eq!(frames.divider_handle, Rect { x: 290.5, y: 0.0, width: 19.0, height: 400.0 });
}

// ─── Drag hint ───

#[test]
fn test_hint_shown_once_then_dismissed_by_drag() {
    let mut layout = portrait_layout();
    assert_eq!(layout.hint(), HintState::Pending);

    assert!(layout.enter());
    assert_eq!(layout.hint(), HintState::Visible);
    assert!(!layout.enter());

    assert!(layout.begin_drag());
    assert_eq!(layout.hint(), HintState::Dismissed);
    layout.end_drag();

    assert!(!layout.begin_drag());
    assert!(!layout.enter());
}

#[test]
fn test_hint_dismissed_by_timeout() {
    let mut layout = portrait_layout();
    layout.enter();
    assert!(layout.hint_timed_out());
    assert_eq!(layout.hint(), HintState::Dismissed);
    assert!(!layout.hint_timed_out());
}

#[test]
fn test_drag_before_hint_shown_dismisses_it() {
    let mut layout = portrait_layout();
    assert!(layout.begin_drag());
    assert!(!layout.enter());
}

#[test]
fn test_persisted_dismissal_never_shows_hint() {
    let mut layout = SplitPaneLayout::new(LayoutConfig::default(), true);
    assert_eq!(layout.hint(), HintState::Dismissed);
    assert!(!layout.enter());
    assert!(!layout.begin_drag());
}
