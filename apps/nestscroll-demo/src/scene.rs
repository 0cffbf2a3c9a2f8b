//! Simulated screen content: a fixed header and a list that scrolls and
//! flings its own content.

use nestscroll_animation::DecayScroller;
use nestscroll_foundation::{TouchAction, TouchEvent};
use nestscroll_graphics::{IntRect, IntSize};
use nestscroll_ui::{Constraints, ScrollableKind, VerticalDirection, View, ViewId};

pub const HEADER_ID: ViewId = 1;
pub const LIST_ID: ViewId = 2;

pub struct Banner {
    height: i32,
    measured: IntSize,
    frame: IntRect,
}

impl Banner {
    pub fn new(height: i32) -> Self {
        Self {
            height,
            measured: IntSize::default(),
            frame: IntRect::default(),
        }
    }
}

impl View for Banner {
    fn view_id(&self) -> Option<ViewId> {
        Some(HEADER_ID)
    }

    fn frame(&self) -> IntRect {
        self.frame
    }

    fn set_frame(&mut self, frame: IntRect) {
        self.frame = frame;
    }

    fn measured_size(&self) -> IntSize {
        self.measured
    }

    fn measure(&mut self, constraints: Constraints) {
        self.measured = constraints.constrain(IntSize::new(constraints.max_width, self.height));
    }

    fn global_visible_rect(&self) -> Option<IntRect> {
        Some(self.frame)
    }
}

/// A recycling list with `content_height` pixels of rows.
pub struct FeedList {
    content_height: i32,
    scroll_offset: i32,
    last_touch_y: Option<f32>,
    scroller: DecayScroller,
    measured: IntSize,
    frame: IntRect,
}

impl FeedList {
    pub fn new(content_height: i32, density: f32) -> Self {
        Self {
            content_height,
            scroll_offset: 0,
            last_touch_y: None,
            scroller: DecayScroller::new(density),
            measured: IntSize::default(),
            frame: IntRect::default(),
        }
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    fn max_offset(&self) -> i32 {
        (self.content_height - self.measured.height).max(0)
    }

    pub fn is_flinging(&self) -> bool {
        !self.scroller.is_finished()
    }

    /// Advances the list's own fling.
    pub fn tick(&mut self, frame_time_nanos: u64) {
        if self.scroller.compute_scroll_offset(frame_time_nanos) {
            self.scroll_offset = self.scroller.curr_y();
        }
    }
}

impl View for FeedList {
    fn view_id(&self) -> Option<ViewId> {
        Some(LIST_ID)
    }

    fn frame(&self) -> IntRect {
        self.frame
    }

    fn set_frame(&mut self, frame: IntRect) {
        self.frame = frame;
    }

    fn measured_size(&self) -> IntSize {
        self.measured
    }

    fn measure(&mut self, constraints: Constraints) {
        self.measured = constraints.constrain(IntSize::new(
            constraints.max_width,
            constraints.max_height,
        ));
    }

    fn global_visible_rect(&self) -> Option<IntRect> {
        Some(self.frame)
    }

    fn scrollable_kind(&self) -> Option<ScrollableKind> {
        Some(ScrollableKind::Recycler)
    }

    fn can_scroll_vertically(&self, direction: VerticalDirection) -> bool {
        match direction {
            VerticalDirection::Up => self.scroll_offset > 0,
            VerticalDirection::Down => self.scroll_offset < self.max_offset(),
        }
    }

    fn fling(&mut self, velocity_y: i32) {
        log::info!("list fling at {velocity_y} px/s from offset {}", self.scroll_offset);
        self.scroller
            .fling(self.scroll_offset, velocity_y as f32, 0, self.max_offset());
    }

    fn fling_xy(&mut self, _velocity_x: i32, velocity_y: i32) {
        self.fling(velocity_y);
    }

    fn dispatch_touch_event(&mut self, event: &TouchEvent) -> bool {
        let Some(y) = event.y(0) else {
            return false;
        };
        match event.action {
            TouchAction::Down => {
                self.scroller.abort_animation();
                self.last_touch_y = Some(y);
            }
            TouchAction::Move => {
                if let Some(last) = self.last_touch_y.replace(y) {
                    self.scroll_offset =
                        (self.scroll_offset - (y - last) as i32).clamp(0, self.max_offset());
                }
            }
            TouchAction::Up | TouchAction::Cancel => self.last_touch_y = None,
            TouchAction::PointerDown | TouchAction::PointerUp => {}
        }
        true
    }
}
