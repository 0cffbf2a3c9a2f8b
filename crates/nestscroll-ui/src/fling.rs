//! Container fling with hand-off to the scroll child.

use nestscroll_animation::DecayScroller;

/// Drives the container's own fling and decides when the remaining momentum
/// belongs to the scroll child.
pub struct FlingController {
    scroller: DecayScroller,
}

impl FlingController {
    pub fn new(density: f32) -> Self {
        Self {
            scroller: DecayScroller::new(density),
        }
    }

    /// Starts a fling for a release `velocity` in px/sec, positive when the
    /// finger moved down.
    ///
    /// A downward release expands the header toward position `0`. An upward
    /// release collapses it and may keep going past the header height, where
    /// the hand-off takes over. Returns `false` when there is nothing to do.
    pub fn start(&mut self, velocity: f32, current_scroll_y: i32) -> bool {
        if velocity > 0.0 {
            if current_scroll_y <= 0 {
                return false;
            }
            self.scroller.fling(current_scroll_y, -velocity, 0, current_scroll_y);
        } else if velocity < 0.0 {
            self.scroller
                .fling(current_scroll_y, -velocity, current_scroll_y, i32::MAX);
        } else {
            return false;
        }
        log::debug!("fling started at {current_scroll_y} with release velocity {velocity}");
        !self.scroller.is_finished()
    }

    pub fn is_running(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// Stops a running fling. Returns `true` if one was running.
    pub fn abort(&mut self) -> bool {
        if self.scroller.is_finished() {
            return false;
        }
        self.scroller.abort_animation();
        true
    }

    /// Scroll position for this frame, `None` once the fling is over.
    pub fn advance(&mut self, frame_time_nanos: u64) -> Option<i32> {
        self.scroller
            .compute_scroll_offset(frame_time_nanos)
            .then(|| self.scroller.curr_y())
    }

    /// Once `current_y` reaches `header_height` the header is fully
    /// collapsed: the fling stops and any remaining speed is returned for
    /// the scroll child.
    pub fn take_hand_off(&mut self, current_y: i32, header_height: i32) -> Option<f32> {
        if current_y < header_height {
            return None;
        }
        self.scroller.abort_animation();
        let residual = self.scroller.curr_velocity();
        (residual > 0.0).then_some(residual)
    }
}
