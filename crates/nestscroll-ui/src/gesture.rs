//! Per-gesture touch state of the container.
//!
//! One [`GestureState`] value carries everything the interception and touch
//! passes share: which pointer owns the gesture, where it went down, the last
//! consumed y and whether a drag is in progress.

use nestscroll_foundation::{PointerId, PointerSample, TouchEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GesturePhase {
    /// No pointer is down.
    Idle,
    /// A pointer is down but has not crossed the drag threshold.
    Watching,
    /// The container consumes vertical moves.
    Dragging,
}

/// Layout facts the drag classifier reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DragContext {
    pub child_top: i32,
    pub padding_top: i32,
}

impl DragContext {
    /// The scroll child still sits below the top padding, so the header is at
    /// least partly shown.
    pub fn header_visible(&self) -> bool {
        self.child_top > self.padding_top
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GestureState {
    pub active_pointer: Option<PointerId>,
    pub phase: GesturePhase,
    pub initial_down_x: f32,
    pub initial_down_y: f32,
    pub last_motion_y: f32,
    pub touch_slop: f32,
}

impl GestureState {
    pub fn new(touch_slop: f32) -> Self {
        Self {
            active_pointer: None,
            phase: GesturePhase::Idle,
            initial_down_x: 0.0,
            initial_down_y: 0.0,
            last_motion_y: 0.0,
            touch_slop,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.phase == GesturePhase::Dragging
    }

    /// A new gesture starts with `pointer`.
    pub fn on_down(&mut self, pointer: &PointerSample) {
        self.active_pointer = Some(pointer.id);
        self.phase = GesturePhase::Watching;
        self.rebaseline(pointer);
    }

    /// Position of the active pointer inside `event`.
    ///
    /// `None` when no pointer is active or the event no longer carries it.
    pub fn active_position(&self, event: &TouchEvent) -> Option<(f32, f32)> {
        let index = event.find_pointer_index(self.active_pointer?)?;
        let sample = event.pointer(index)?;
        Some((sample.position.x, sample.position.y))
    }

    /// Enters [`GesturePhase::Dragging`] when the move from the initial down
    /// point is mostly vertical, beyond the slop, and either pulls down or
    /// happens while the header is visible.
    ///
    /// Returns `true` on the transition.
    pub fn start_dragging_if_needed(&mut self, x: f32, y: f32, context: DragContext) -> bool {
        if self.is_dragging() {
            return false;
        }
        let x_diff = (x - self.initial_down_x).abs();
        let y_diff = (y - self.initial_down_y).abs();
        let vertical = y_diff > x_diff && y_diff > self.touch_slop;
        if vertical && (y > self.initial_down_y || context.header_visible()) {
            self.phase = GesturePhase::Dragging;
            self.last_motion_y = y;
            return true;
        }
        false
    }

    /// An additional pointer takes over the gesture.
    pub fn on_pointer_down(&mut self, pointer: &PointerSample) {
        self.active_pointer = Some(pointer.id);
        self.rebaseline(pointer);
    }

    /// A non-final pointer lifted. If it was the active one, the other
    /// remaining pointer takes over.
    pub fn on_secondary_pointer_up(&mut self, event: &TouchEvent) {
        let Some(lifted) = event.action_pointer() else {
            return;
        };
        if Some(lifted.id) != self.active_pointer {
            return;
        }
        let new_index = if event.action_index == 0 { 1 } else { 0 };
        match event.pointer(new_index) {
            Some(replacement) => {
                log::trace!("pointer {} takes over from {}", replacement.id, lifted.id);
                let replacement = *replacement;
                self.active_pointer = Some(replacement.id);
                self.rebaseline(&replacement);
            }
            None => self.active_pointer = None,
        }
    }

    /// Gesture ended or was abandoned.
    pub fn reset(&mut self) {
        self.active_pointer = None;
        self.phase = GesturePhase::Idle;
    }

    fn rebaseline(&mut self, pointer: &PointerSample) {
        self.initial_down_x = pointer.position.x;
        self.initial_down_y = pointer.position.y;
        self.last_motion_y = pointer.position.y;
    }
}
