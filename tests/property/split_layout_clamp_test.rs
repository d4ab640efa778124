//! Property-based tests for SplitPaneLayout clamping.
//!
//! For any sequence of resizes, rotations and drags the divider must stay
//! inside `[min_pane, total_extent - min_pane]`, or sit at the midpoint
//! when the container cannot fit two minimum panes.

use proptest::prelude::*;

use splitscreen::managers::split_layout::SplitPaneLayout;
use splitscreen::types::layout::Orientation;

#[derive(Debug, Clone)]
enum Step {
    Bounds(f64, f64),
    Drag(f64),
    Set(f64),
}

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0.0f64..2000.0, 0.0f64..2000.0).prop_map(|(w, h)| Step::Bounds(w, h)),
        (-3000.0f64..3000.0).prop_map(Step::Drag),
        (-500.0f64..2500.0).prop_map(Step::Set),
    ]
}

fn assert_in_range(layout: &SplitPaneLayout) -> Result<(), TestCaseError> {
    let extent = layout.total_extent();
    let min = layout.config().min_pane;
    let p = layout.divider_position();
    if extent >= 2.0 * min {
        prop_assert!(p >= min - 1e-9, "divider {} below min {} (extent {})", p, min, extent);
        prop_assert!(p <= extent - min + 1e-9, "divider {} above {} (extent {})", p, extent - min, extent);
    } else {
        prop_assert!((p - extent / 2.0).abs() < 1e-9, "divider {} not at midpoint of {}", p, extent);
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn divider_always_within_range(
        width in 0.0f64..2000.0,
        height in 0.0f64..2000.0,
        steps in prop::collection::vec(arb_step(), 0..32),
    ) {
        let mut layout = SplitPaneLayout::default();
        layout.set_bounds(width, height);
        assert_in_range(&layout)?;

        for step in steps {
            match step {
                Step::Bounds(w, h) => layout.set_bounds(w, h),
                Step::Drag(d) => {
                    layout.drag_by(d);
                }
                Step::Set(p) => layout.set_divider_position(p),
            }
            assert_in_range(&layout)?;
        }
    }

    #[test]
    fn frames_tile_the_container(
        width in 0.0f64..2000.0,
        height in 0.0f64..2000.0,
        delta in -2000.0f64..2000.0,
    ) {
        let mut layout = SplitPaneLayout::default();
        layout.set_bounds(width, height);
        layout.drag_by(delta);
        let frames = layout.frames();

        match frames.orientation {
            Orientation::Portrait => {
                prop_assert!((frames.first_pane.height + frames.second_pane.height - height).abs() < 1e-9);
                prop_assert_eq!(frames.second_pane.y, frames.first_pane.height);
            }
            Orientation::Landscape => {
                prop_assert!((frames.first_pane.width + frames.second_pane.width - width).abs() < 1e-9);
                prop_assert_eq!(frames.second_pane.x, frames.first_pane.width);
            }
        }
    }
}
