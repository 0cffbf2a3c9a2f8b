//! Assertion helpers for container state.

use nestscroll_ui::NestedScrollLayout;

/// Assert that a value is within `tolerance` of `expected`.
pub fn assert_approx_eq(actual: f32, expected: f32, tolerance: f32, msg: &str) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "{msg}: expected {expected} (±{tolerance}), got {actual} (diff: {diff})"
    );
}

pub fn assert_scroll_y(layout: &NestedScrollLayout, expected: i32) {
    assert_eq!(layout.current_scroll_y(), expected, "scroll position");
}

/// Header and scroll child tops, in that order.
pub fn tops(layout: &NestedScrollLayout) -> (i32, i32) {
    (
        layout.header().borrow().top(),
        layout.scroll_child().borrow().top(),
    )
}

/// Assert the scroll child never ends up above the top padding or below its
/// expanded position.
pub fn assert_within_scroll_range(layout: &NestedScrollLayout) {
    let y = layout.current_scroll_y();
    let header_height = layout.header().borrow().measured_size().height;
    assert!(
        (0..=header_height).contains(&y),
        "scroll position {y} outside [0, {header_height}]"
    );
}
