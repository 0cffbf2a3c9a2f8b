//! Drives a container with scripted touches and frames and checks how the
//! header, the scroll child and the container share each gesture.

use nestscroll_testing::prelude::*;
use nestscroll_ui::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const WIDTH: i32 = 400;
const HEIGHT: i32 = 1000;
const HEADER: i32 = 400;

struct Scene {
    header: Rc<RefCell<FakeView>>,
    child: Rc<RefCell<FakeView>>,
    robot: NestedScrollRobot,
}

fn scene(config: NestedScrollConfig) -> Scene {
    let header = FakeView::new(WIDTH, HEADER).shared();
    let child = FakeView::new(WIDTH, HEIGHT)
        .with_kind(ScrollableKind::Recycler)
        .consuming_touches()
        .shared();
    let children: Vec<ViewRef> = vec![header.clone() as ViewRef, child.clone() as ViewRef];
    let mut layout = NestedScrollLayout::new(config, children).expect("valid children");
    layout.measure(WIDTH, HEIGHT);
    layout.layout();
    Scene {
        header,
        child,
        robot: NestedScrollRobot::new(layout),
    }
}

fn scene_with_release_velocity(velocity: f32) -> Scene {
    let velocity = Rc::new(Cell::new(velocity));
    scene(
        NestedScrollConfig::default()
            .with_velocity_tracker(FixedVelocityTracker::factory(velocity)),
    )
}

#[test]
fn layout_starts_expanded() {
    let scene = scene(NestedScrollConfig::default());
    let layout = scene.robot.layout();
    assert_scroll_y(layout, 0);
    assert_eq!(scene.header.borrow().frame(), IntRect::new(0, 0, WIDTH, HEADER));
    assert_eq!(
        scene.child.borrow().frame(),
        IntRect::new(0, HEADER, WIDTH, HEADER + HEIGHT)
    );
}

#[test]
fn child_that_can_scroll_up_owns_the_gesture() {
    let mut scene = scene(NestedScrollConfig::default());
    scene.child.borrow_mut().can_scroll_up = true;

    scene.robot.drag(100.0, 600.0, 100.0, 300.0, 6);

    assert_eq!(tops(scene.robot.layout()), (0, HEADER));
    let actions = scene.child.borrow().touch_actions();
    assert_eq!(actions.first(), Some(&TouchAction::Down));
    assert_eq!(actions.last(), Some(&TouchAction::Up));
    assert!(!actions.contains(&TouchAction::Cancel));
    assert_eq!(actions.len(), 8);
}

#[test]
fn container_claims_drag_only_past_slop() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;

    assert!(robot.touch_down(100.0, 600.0));
    robot.touch_move(100.0, 598.0);
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Watching);
    assert_scroll_y(robot.layout(), 0);

    assert!(robot.touch_move(100.0, 597.0));
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Dragging);
    assert_eq!(
        scene.child.borrow().touch_actions(),
        vec![TouchAction::Down, TouchAction::Move, TouchAction::Cancel]
    );
    assert_scroll_y(robot.layout(), 0);

    robot.touch_move(100.0, 590.0);
    assert_scroll_y(robot.layout(), 7);
}

#[test]
fn horizontal_swipe_stays_with_child() {
    let mut scene = scene(NestedScrollConfig::default());
    scene.robot.drag(300.0, 600.0, 50.0, 580.0, 5);
    assert_scroll_y(scene.robot.layout(), 0);
    assert!(!scene
        .child
        .borrow()
        .touch_actions()
        .contains(&TouchAction::Cancel));
}

#[test]
fn collapsed_header_hands_gesture_back_to_child() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;

    robot.touch_down(100.0, 600.0);
    for y in (150..=550).rev().step_by(50) {
        robot.touch_move(100.0, y as f32);
    }
    assert_scroll_y(robot.layout(), HEADER);
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Watching);

    robot.touch_move(100.0, 100.0);
    robot.touch_up();

    assert_scroll_y(robot.layout(), HEADER);
    assert_eq!(
        scene.child.borrow().touch_actions(),
        vec![
            TouchAction::Down,
            TouchAction::Cancel,
            TouchAction::Down,
            TouchAction::Move,
            TouchAction::Up,
        ]
    );
}

#[test]
fn pulling_down_expands_collapsed_header() {
    let mut scene = scene(NestedScrollConfig::default());
    scene.robot.layout_mut().scroll_to(HEADER);
    assert_eq!(tops(scene.robot.layout()), (-HEADER / 2, 0));

    let robot = &mut scene.robot;
    robot.touch_down(100.0, 200.0);
    robot.swipe_to(100.0, 350.0, 3);
    assert_scroll_y(robot.layout(), HEADER - 100);
    robot.swipe_to(100.0, 900.0, 4);
    assert_scroll_y(robot.layout(), 0);
    assert_eq!(tops(robot.layout()), (0, HEADER));
}

#[test]
fn drag_never_leaves_scroll_range() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;
    robot.touch_down(100.0, 500.0);
    for y in [480.0, 900.0, 100.0, 20.0, 700.0, 450.0, 999.0] {
        robot.touch_move(100.0, y);
        assert_within_scroll_range(robot.layout());
    }
    robot.touch_up();
}

#[test]
fn collapsing_fling_hands_residual_velocity_to_child() {
    let mut scene = scene_with_release_velocity(-2000.0);
    let robot = &mut scene.robot;

    robot.touch_down(100.0, 600.0);
    for y in [590.0, 500.0, 400.0] {
        robot.touch_move(100.0, y);
    }
    assert_scroll_y(robot.layout(), 190);
    robot.touch_up();
    assert!(robot.layout().is_flinging());

    robot.wait_for_idle();

    let flings = scene.child.borrow().flings.clone();
    assert_eq!(flings.len(), 1, "exactly one hand-off: {flings:?}");
    assert!(matches!(flings[0], FlingCall::TwoAxis(0, velocity) if velocity > 0));
    assert_scroll_y(robot.layout(), HEADER);

    let settled = tops(robot.layout());
    for _ in 0..10 {
        assert!(!robot.advance_frame());
    }
    assert_eq!(tops(robot.layout()), settled);
}

#[test]
fn expanding_fling_settles_at_top_without_hand_off() {
    let mut scene = scene_with_release_velocity(3000.0);
    scene.robot.layout_mut().scroll_to(300);
    let robot = &mut scene.robot;

    robot.touch_down(100.0, 600.0);
    robot.touch_move(100.0, 610.0);
    robot.touch_move(100.0, 700.0);
    assert_scroll_y(robot.layout(), 210);
    robot.touch_up();

    let frames = robot.wait_for_idle();
    assert!(frames > 1);
    assert_scroll_y(robot.layout(), 0);
    assert!(scene.child.borrow().flings.is_empty());
}

#[test]
fn slow_release_does_not_fling() {
    let mut scene = scene_with_release_velocity(0.0);
    scene.robot.drag(100.0, 600.0, 100.0, 500.0, 4);
    assert!(!scene.robot.layout().is_flinging());
    assert!(!scene.robot.layout().has_pending_work());
}

#[test]
fn new_touch_stops_running_fling() {
    let mut scene = scene_with_release_velocity(-2000.0);
    let robot = &mut scene.robot;
    robot.touch_down(100.0, 600.0);
    robot.swipe_to(100.0, 550.0, 2);
    robot.touch_up();
    robot.advance_frame();
    robot.advance_frame();
    assert!(robot.layout().is_flinging());

    robot.touch_down(100.0, 700.0);
    assert!(!robot.layout().is_flinging());
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Watching);

    let frozen = tops(robot.layout());
    for _ in 0..5 {
        robot.advance_frame();
    }
    assert_eq!(tops(robot.layout()), frozen);
    assert!(scene.child.borrow().flings.is_empty());
}

#[test]
fn touch_in_header_is_claimed() {
    let mut scene = scene(NestedScrollConfig::default());
    assert!(scene.robot.touch_down(100.0, 100.0));
    assert!(scene.child.borrow().touches.is_empty());

    scene.robot.touch_move(100.0, 80.0);
    scene.robot.touch_move(100.0, 60.0);
    assert_scroll_y(scene.robot.layout(), 20);
}

#[test]
fn header_hit_test_uses_screen_position() {
    let header = FakeView::new(WIDTH, HEADER).with_screen_offset(0, 1000).shared();
    let child = FakeView::new(WIDTH, HEIGHT).shared();
    let children: Vec<ViewRef> = vec![header.clone() as ViewRef, child as ViewRef];
    let mut layout = NestedScrollLayout::new(NestedScrollConfig::default(), children).unwrap();
    layout.measure(WIDTH, HEIGHT);
    layout.layout();
    let mut robot = NestedScrollRobot::new(layout).with_screen_origin(0.0, 1000.0);
    assert!(robot.touch_down(100.0, 100.0));

    let mut robot = NestedScrollRobot::new(robot.into_layout());
    assert!(!robot.touch_down(100.0, 100.0));
}

#[test]
fn second_finger_takes_over_and_hands_back() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;

    robot.pointer_down(0, 100.0, 300.0);
    robot.move_pointer(0, 100.0, 290.0);
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Dragging);
    assert_scroll_y(robot.layout(), 0);

    robot.pointer_down(1, 200.0, 350.0);
    robot.move_pointer(1, 200.0, 330.0);
    assert_scroll_y(robot.layout(), 20);

    // The passive finger moving does nothing.
    robot.move_pointer(0, 100.0, 200.0);
    assert_scroll_y(robot.layout(), 20);

    robot.pointer_up(1);
    robot.move_pointer(0, 100.0, 190.0);
    assert_scroll_y(robot.layout(), 30);

    robot.pointer_up(0);
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Idle);
}

#[test]
fn lifting_passive_finger_keeps_active_one() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;

    robot.pointer_down(0, 100.0, 300.0);
    robot.move_pointer(0, 100.0, 290.0);
    robot.pointer_down(1, 200.0, 350.0);
    robot.pointer_up(0);
    robot.move_pointer(1, 200.0, 340.0);
    assert_scroll_y(robot.layout(), 10);
}

#[test]
fn stale_pointer_is_ignored() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;
    robot.touch_down(100.0, 100.0);

    let stranger = TouchEvent::new(
        TouchAction::Move,
        0,
        robot.time_ms(),
        [PointerSample::new(9, Point::new(100.0, 20.0))],
    );
    assert!(!robot.layout_mut().on_touch_event(&stranger));
    assert!(!robot.layout_mut().on_intercept_touch_event(&stranger));
    assert_scroll_y(robot.layout(), 0);
}

#[test]
fn disabled_container_lets_everything_through() {
    let mut scene = scene(NestedScrollConfig::default());
    scene.robot.layout_mut().set_enabled(false);
    scene.robot.drag(100.0, 600.0, 100.0, 300.0, 5);
    assert_scroll_y(scene.robot.layout(), 0);
    assert!(!scene
        .child
        .borrow()
        .touch_actions()
        .contains(&TouchAction::Cancel));
}

#[test]
fn disallow_intercept_requests_are_ignored() {
    let mut scene = scene(NestedScrollConfig::default());
    scene
        .robot
        .layout_mut()
        .request_disallow_intercept_touch_event(true);
    scene.robot.touch_down(100.0, 600.0);
    scene.robot.touch_move(100.0, 580.0);
    assert_eq!(scene.robot.layout().gesture_phase(), GesturePhase::Dragging);
}

#[test]
fn out_of_range_ratio_is_ignored() {
    let mut scene = scene(NestedScrollConfig::default());
    let layout = scene.robot.layout_mut();
    for ratio in [1.5, -0.1, f32::NAN] {
        layout.set_header_scroll_ratio(ratio);
        assert_eq!(layout.header_scroll_ratio(), DEFAULT_HEADER_SCROLL_RATIO);
    }

    layout.set_header_scroll_ratio(0.25);
    layout.scroll_to(200);
    assert_eq!(tops(layout), (-50, 200));

    let config = NestedScrollConfig::default().with_header_scroll_ratio(2.0);
    assert_eq!(config.header_scroll_ratio, DEFAULT_HEADER_SCROLL_RATIO);
}

#[test]
fn scroll_to_child_top_waits_for_next_frame() {
    let mut scene = scene(NestedScrollConfig::default());
    let robot = &mut scene.robot;
    robot.layout_mut().scroll_to(300);
    robot.layout_mut().scroll_to_nested_child_top();
    assert_scroll_y(robot.layout(), 300);
    assert!(robot.layout().has_pending_work());

    robot.advance_frame();
    assert_scroll_y(robot.layout(), 0);
    assert!(!robot.layout().has_pending_work());
}

#[test]
fn scroll_by_moves_content() {
    let mut scene = scene(NestedScrollConfig::default());
    let layout = scene.robot.layout_mut();
    layout.scroll_by(-120);
    assert_scroll_y(layout, 120);
    layout.scroll_by(500);
    assert_scroll_y(layout, 0);
}

#[test]
fn moves_request_redraw() {
    let mut scene = scene(NestedScrollConfig::default());
    let layout = scene.robot.layout_mut();
    layout.take_invalidation();
    layout.scroll_to(0);
    assert!(!layout.take_invalidation());
    layout.scroll_to(40);
    assert!(layout.take_invalidation());
    assert!(!layout.take_invalidation());
}

#[test]
fn padding_shifts_resting_positions() {
    let header = FakeView::new(WIDTH, HEADER).shared();
    let child = FakeView::new(WIDTH, HEIGHT).shared();
    let children: Vec<ViewRef> = vec![header.clone() as ViewRef, child.clone() as ViewRef];
    let config =
        NestedScrollConfig::default().with_padding(EdgeInsets::from_components(8, 24, 8, 16));
    let mut layout = NestedScrollLayout::new(config, children).unwrap();
    layout.measure(WIDTH, HEIGHT);
    layout.layout();

    assert_eq!(header.borrow().frame(), IntRect::new(8, 24, WIDTH - 8, 24 + HEADER));
    assert_eq!(child.borrow().frame().top, 24 + HEADER);
    assert_eq!(child.borrow().frame().bottom, HEADER + HEIGHT - 16);
    assert_scroll_y(&layout, 0);

    layout.scroll_to(HEADER);
    assert_eq!(child.borrow().top(), 24);
}

#[test]
fn custom_callback_replaces_default() {
    struct Locked {
        flings: RefCell<Vec<f32>>,
    }
    impl ChildScrollCallback for Locked {
        fn can_child_scroll_up(&self, _child: &ViewRef) -> bool {
            true
        }
        fn dispatch_fling_velocity(&self, _child: &ViewRef, velocity: f32) {
            self.flings.borrow_mut().push(velocity);
        }
    }

    let mut scene = scene(NestedScrollConfig::default());
    let locked = Rc::new(Locked {
        flings: RefCell::new(Vec::new()),
    });
    let callback: Rc<dyn ChildScrollCallback> = locked.clone();
    scene
        .robot
        .layout_mut()
        .set_child_scroll_callback(Some(callback));
    scene.robot.drag(100.0, 600.0, 100.0, 300.0, 5);
    assert_scroll_y(scene.robot.layout(), 0);

    scene.robot.layout_mut().set_child_scroll_callback(None);
    scene.robot.drag(100.0, 600.0, 100.0, 500.0, 5);
    assert!(scene.robot.layout().current_scroll_y() > 0);
}

/// Collapses the header by dragging and lets the scroll child finish the
/// gesture after the hand-back.
fn collapse_and_hand_back(robot: &mut NestedScrollRobot) {
    robot.touch_down(100.0, 600.0);
    for y in (150..=550).rev().step_by(50) {
        robot.touch_move(100.0, y as f32);
    }
    robot.touch_move(100.0, 100.0);
    robot.touch_up();
}

/// A short, slow pull that should barely expand the header.
fn short_pull(robot: &mut NestedScrollRobot) -> i32 {
    robot.touch_down(100.0, 300.0);
    robot.swipe_to(100.0, 306.0, 3);
    robot.touch_up();
    robot.wait_for_idle();
    robot.layout().current_scroll_y()
}

#[test]
fn each_gesture_gets_its_own_velocity_tracker() {
    let created = Rc::new(Cell::new(0));
    let mut scene = scene(
        NestedScrollConfig::default()
            .with_velocity_tracker(counting_trackers(pointer_trackers(), created.clone())),
    );

    collapse_and_hand_back(&mut scene.robot);
    assert_scroll_y(scene.robot.layout(), HEADER);
    assert_eq!(created.get(), 1);

    short_pull(&mut scene.robot);
    assert_eq!(created.get(), 2);
}

#[test]
fn release_velocity_ignores_previous_gesture() {
    let mut fresh = scene(NestedScrollConfig::default());
    fresh.robot.layout_mut().scroll_to(HEADER);
    let expected = short_pull(&mut fresh.robot);

    let mut reused = scene(NestedScrollConfig::default());
    collapse_and_hand_back(&mut reused.robot);
    assert_eq!(tops(reused.robot.layout()), (-HEADER / 2, 0));

    assert_eq!(short_pull(&mut reused.robot), expected);
    assert!(expected > HEADER - 10);
}

#[test]
fn cancel_ends_drag_without_fling() {
    let created = Rc::new(Cell::new(0));
    let velocity = Rc::new(Cell::new(-2000.0));
    let mut scene = scene(NestedScrollConfig::default().with_velocity_tracker(
        counting_trackers(FixedVelocityTracker::factory(velocity), created.clone()),
    ));
    let robot = &mut scene.robot;

    robot.touch_down(100.0, 600.0);
    robot.swipe_to(100.0, 550.0, 3);
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Dragging);
    let scrolled = robot.layout().current_scroll_y();
    assert!(scrolled > 0);

    assert!(!robot.cancel());
    assert_eq!(robot.layout().gesture_phase(), GesturePhase::Idle);
    assert!(!robot.layout().is_flinging());
    assert!(!robot.layout().has_pending_work());
    robot.wait_for_idle();
    assert_scroll_y(robot.layout(), scrolled);
    assert!(scene.child.borrow().flings.is_empty());

    // The cancelled gesture's tracker is gone; the next drag starts a new one.
    assert_eq!(created.get(), 1);
    robot.drag(100.0, 600.0, 100.0, 560.0, 3);
    assert_eq!(created.get(), 2);
}
