//! Robot-style driver for a [`NestedScrollLayout`].
//!
//! The robot owns the container, keeps the set of pointers that are down and
//! a clock for event and frame times, so a test reads as a sequence of
//! finger actions:
//!
//! ```ignore
//! let mut robot = NestedScrollRobot::new(layout);
//! robot.drag(100.0, 600.0, 100.0, 300.0, 10);
//! robot.wait_for_idle();
//! ```

use nestscroll_foundation::{PointerId, PointerSample, TouchAction, TouchEvent};
use nestscroll_graphics::Point;
use nestscroll_ui::NestedScrollLayout;

const FRAME_NANOS: u64 = 16_000_000;
const MAX_IDLE_FRAMES: usize = 2_000;

pub struct NestedScrollRobot {
    layout: NestedScrollLayout,
    pointers: Vec<PointerSample>,
    screen_origin: Point,
    time_ms: i64,
    step_ms: i64,
    frame_nanos: u64,
}

impl NestedScrollRobot {
    pub fn new(layout: NestedScrollLayout) -> Self {
        Self {
            layout,
            pointers: Vec::new(),
            screen_origin: Point::ZERO,
            time_ms: 0,
            step_ms: 16,
            frame_nanos: 0,
        }
    }

    /// Milliseconds between consecutive touch events.
    pub fn with_step_ms(mut self, step_ms: i64) -> Self {
        self.step_ms = step_ms;
        self
    }

    /// Screen position of the container's origin, used for global positions.
    pub fn with_screen_origin(mut self, x: f32, y: f32) -> Self {
        self.screen_origin = Point::new(x, y);
        self
    }

    pub fn layout(&self) -> &NestedScrollLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut NestedScrollLayout {
        &mut self.layout
    }

    pub fn into_layout(self) -> NestedScrollLayout {
        self.layout
    }

    pub fn time_ms(&self) -> i64 {
        self.time_ms
    }

    /// Lets `ms` pass without any event.
    pub fn pause(&mut self, ms: i64) {
        self.time_ms += ms;
    }

    fn sample(&self, id: PointerId, x: f32, y: f32) -> PointerSample {
        let position = Point::new(x, y);
        PointerSample::new(id, position).with_global_position(
            position.translate(self.screen_origin.x, self.screen_origin.y),
        )
    }

    fn send(&mut self, action: TouchAction, action_index: usize) -> bool {
        let event = TouchEvent::new(
            action,
            action_index,
            self.time_ms,
            self.pointers.iter().copied(),
        );
        self.time_ms += self.step_ms;
        self.layout.dispatch_touch_event(&event)
    }

    /// Sends an arbitrary event as is.
    pub fn send_event(&mut self, event: &TouchEvent) -> bool {
        self.layout.dispatch_touch_event(event)
    }

    /// Puts pointer `id` down. The first pointer starts a gesture.
    pub fn pointer_down(&mut self, id: PointerId, x: f32, y: f32) -> bool {
        let action = if self.pointers.is_empty() {
            TouchAction::Down
        } else {
            TouchAction::PointerDown
        };
        self.pointers.push(self.sample(id, x, y));
        self.send(action, self.pointers.len() - 1)
    }

    pub fn move_pointer(&mut self, id: PointerId, x: f32, y: f32) -> bool {
        let sample = self.sample(id, x, y);
        match self.pointers.iter_mut().find(|pointer| pointer.id == id) {
            Some(pointer) => *pointer = sample,
            None => panic!("pointer {id} is not down"),
        }
        self.send(TouchAction::Move, 0)
    }

    /// Lifts pointer `id`. The last pointer ends the gesture.
    pub fn pointer_up(&mut self, id: PointerId) -> bool {
        let Some(index) = self.pointers.iter().position(|pointer| pointer.id == id) else {
            panic!("pointer {id} is not down");
        };
        let action = if self.pointers.len() == 1 {
            TouchAction::Up
        } else {
            TouchAction::PointerUp
        };
        let handled = self.send(action, index);
        self.pointers.remove(index);
        handled
    }

    pub fn cancel(&mut self) -> bool {
        let handled = self.send(TouchAction::Cancel, 0);
        self.pointers.clear();
        handled
    }

    pub fn touch_down(&mut self, x: f32, y: f32) -> bool {
        self.pointer_down(0, x, y)
    }

    pub fn touch_move(&mut self, x: f32, y: f32) -> bool {
        self.move_pointer(0, x, y)
    }

    pub fn touch_up(&mut self) -> bool {
        self.pointer_up(0)
    }

    /// Moves pointer `0` from its current position to `(x, y)` in `steps`
    /// equal moves.
    pub fn swipe_to(&mut self, x: f32, y: f32, steps: usize) {
        let Some(start) = self.pointers.iter().find(|pointer| pointer.id == 0).copied() else {
            panic!("pointer 0 is not down");
        };
        let steps = steps.max(1);
        for step in 1..=steps {
            let t = step as f32 / steps as f32;
            self.touch_move(
                start.position.x + (x - start.position.x) * t,
                start.position.y + (y - start.position.y) * t,
            );
        }
    }

    /// Down, `steps` moves, up.
    pub fn drag(&mut self, from_x: f32, from_y: f32, to_x: f32, to_y: f32, steps: usize) {
        self.touch_down(from_x, from_y);
        self.swipe_to(to_x, to_y, steps);
        self.touch_up();
    }

    /// Runs one display frame. Returns `true` while more frames are needed.
    pub fn advance_frame(&mut self) -> bool {
        self.frame_nanos += FRAME_NANOS;
        self.layout.on_frame(self.frame_nanos)
    }

    /// Runs frames until the container has nothing left to animate.
    /// Returns the number of frames run.
    pub fn wait_for_idle(&mut self) -> usize {
        let mut frames = 0;
        while self.layout.has_pending_work() {
            assert!(frames < MAX_IDLE_FRAMES, "container never became idle");
            self.advance_frame();
            frames += 1;
        }
        log::trace!("idle after {frames} frames");
        frames
    }
}
