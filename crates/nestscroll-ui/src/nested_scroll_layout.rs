//! Header plus scroll child container.
//!
//! [`NestedScrollLayout`] stacks a header above a scroll child. Vertical
//! drags first collapse or expand the header by moving both views; once the
//! header is gone the scroll child keeps the gesture, and a collapsing fling
//! that runs past the header continues inside the scroll child.
//!
//! The host drives it like a view group: [`measure`](NestedScrollLayout::measure)
//! and [`layout`](NestedScrollLayout::layout) after size changes, every touch
//! through [`dispatch_touch_event`](NestedScrollLayout::dispatch_touch_event),
//! and [`on_frame`](NestedScrollLayout::on_frame) once per display frame while
//! [`has_pending_work`](NestedScrollLayout::has_pending_work) is `true`.

use crate::child_scroll::{ChildScrollCallback, DefaultChildScroll};
use crate::error::NestedScrollError;
use crate::fling::FlingController;
use crate::gesture::{DragContext, GesturePhase, GestureState};
use crate::offset_model::ScrollGeometry;
use crate::view::{find_view_by_id, Constraints, ViewId, ViewRef};
use nestscroll_foundation::{
    GestureConfig, PointerVelocityTracker, TouchAction, TouchEvent, VelocityTracking,
};
use nestscroll_graphics::{EdgeInsets, IntRect, IntSize};
use smallvec::SmallVec;
use std::rc::Rc;

pub const DEFAULT_HEADER_SCROLL_RATIO: f32 = 0.5;

pub type VelocityTrackerFactory = Rc<dyn Fn() -> Box<dyn VelocityTracking>>;

/// Where the header comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderSource {
    /// Any descendant with this id.
    ById(ViewId),
    /// The first direct child.
    FirstChild,
}

/// Where the scroll child comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollChildSource {
    ById(ViewId),
    /// The second direct child.
    SecondChild,
}

#[derive(Clone)]
pub struct NestedScrollConfig {
    pub header: HeaderSource,
    pub scroll_child: ScrollChildSource,
    pub header_scroll_ratio: f32,
    pub padding: EdgeInsets,
    pub gesture: GestureConfig,
    pub child_scroll: Option<Rc<dyn ChildScrollCallback>>,
    pub velocity_tracker: Option<VelocityTrackerFactory>,
}

impl Default for NestedScrollConfig {
    fn default() -> Self {
        Self {
            header: HeaderSource::FirstChild,
            scroll_child: ScrollChildSource::SecondChild,
            header_scroll_ratio: DEFAULT_HEADER_SCROLL_RATIO,
            padding: EdgeInsets::default(),
            gesture: GestureConfig::default(),
            child_scroll: None,
            velocity_tracker: None,
        }
    }
}

impl NestedScrollConfig {
    pub fn with_header(mut self, header: HeaderSource) -> Self {
        self.header = header;
        self
    }

    pub fn with_scroll_child(mut self, scroll_child: ScrollChildSource) -> Self {
        self.scroll_child = scroll_child;
        self
    }

    /// Values outside `[0, 1]` are ignored.
    pub fn with_header_scroll_ratio(mut self, ratio: f32) -> Self {
        if is_valid_ratio(ratio) {
            self.header_scroll_ratio = ratio;
        } else {
            log::debug!("ignoring header scroll ratio {ratio}");
        }
        self
    }

    pub fn with_padding(mut self, padding: EdgeInsets) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureConfig) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_child_scroll(mut self, callback: Rc<dyn ChildScrollCallback>) -> Self {
        self.child_scroll = Some(callback);
        self
    }

    pub fn with_velocity_tracker(mut self, factory: VelocityTrackerFactory) -> Self {
        self.velocity_tracker = Some(factory);
        self
    }
}

fn default_velocity_tracker() -> Box<dyn VelocityTracking> {
    Box::new(PointerVelocityTracker::new())
}

fn is_valid_ratio(ratio: f32) -> bool {
    (0.0..=1.0).contains(&ratio)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingTask {
    MoveTo(i32),
}

pub struct NestedScrollLayout {
    children: Vec<ViewRef>,
    header: ViewRef,
    scroll_child: ViewRef,
    padding: EdgeInsets,
    size: IntSize,
    enabled: bool,
    header_scroll_ratio: f32,
    gesture_config: GestureConfig,
    gesture: GestureState,
    fling: FlingController,
    velocity_tracker: Option<Box<dyn VelocityTracking>>,
    velocity_tracker_factory: VelocityTrackerFactory,
    child_scroll: Rc<dyn ChildScrollCallback>,
    touch_target: Option<ViewRef>,
    pending: SmallVec<[PendingTask; 2]>,
    invalidated: bool,
}

impl NestedScrollLayout {
    /// Resolves header and scroll child among `children` once.
    pub fn new(
        config: NestedScrollConfig,
        children: Vec<ViewRef>,
    ) -> Result<Self, NestedScrollError> {
        let header = match config.header {
            HeaderSource::ById(id) => find_view_by_id(&children, id)
                .ok_or(NestedScrollError::HeaderNotFound { id: Some(id) })?,
            HeaderSource::FirstChild => children
                .first()
                .cloned()
                .ok_or(NestedScrollError::HeaderNotFound { id: None })?,
        };
        let scroll_child = match config.scroll_child {
            ScrollChildSource::ById(id) => find_view_by_id(&children, id)
                .ok_or(NestedScrollError::ScrollChildNotFound { id: Some(id) })?,
            ScrollChildSource::SecondChild => children
                .get(1)
                .cloned()
                .ok_or(NestedScrollError::ScrollChildNotFound { id: None })?,
        };
        if Rc::ptr_eq(&header, &scroll_child) {
            return Err(NestedScrollError::HeaderIsScrollChild);
        }

        let gesture_config = config.gesture;
        let velocity_tracker_factory: VelocityTrackerFactory = match config.velocity_tracker {
            Some(factory) => factory,
            None => Rc::new(default_velocity_tracker),
        };
        let child_scroll: Rc<dyn ChildScrollCallback> = match config.child_scroll {
            Some(callback) => callback,
            None => Rc::new(DefaultChildScroll::default()),
        };
        Ok(Self {
            children,
            header,
            scroll_child,
            padding: config.padding,
            size: IntSize::default(),
            enabled: true,
            header_scroll_ratio: config.header_scroll_ratio,
            gesture_config,
            gesture: GestureState::new(gesture_config.touch_slop),
            fling: FlingController::new(gesture_config.density),
            velocity_tracker: None,
            velocity_tracker_factory,
            child_scroll,
            touch_target: None,
            pending: SmallVec::new(),
            invalidated: false,
        })
    }

    pub fn children(&self) -> &[ViewRef] {
        &self.children
    }

    pub fn header(&self) -> &ViewRef {
        &self.header
    }

    pub fn scroll_child(&self) -> &ViewRef {
        &self.scroll_child
    }

    pub fn size(&self) -> IntSize {
        self.size
    }

    // Measurement and layout

    /// Measures both children against the content box. The scroll child
    /// always fills it, so it can cover the whole area once the header is
    /// collapsed.
    pub fn measure(&mut self, width: i32, height: i32) {
        self.size = IntSize::new(width, height);
        let content_width = (width - self.padding.horizontal_sum()).max(0);
        let content_height = (height - self.padding.vertical_sum()).max(0);
        self.header
            .borrow_mut()
            .measure(Constraints::loose(content_width, content_height));
        self.scroll_child
            .borrow_mut()
            .measure(Constraints::tight(content_width, content_height));
    }

    /// Places the header at the top padding and the scroll child right below
    /// it. This is the expanded state, scroll position `0`.
    pub fn layout(&mut self) {
        let left = self.padding.left;
        let top = self.padding.top;
        let header_size = self.header.borrow().measured_size();
        let child_width = self.scroll_child.borrow().measured_size().width;

        self.header
            .borrow_mut()
            .set_frame(IntRect::from_origin_size(left, top, header_size));
        self.scroll_child.borrow_mut().set_frame(IntRect::new(
            left,
            top + header_size.height,
            left + child_width,
            header_size.height + self.size.height - self.padding.bottom,
        ));
        self.invalidate();
    }

    // Scroll position

    fn geometry(&self) -> ScrollGeometry {
        ScrollGeometry {
            padding_top: self.padding.top,
            header_height: self.header.borrow().measured_size().height,
            header_top: self.header.borrow().top(),
            child_top: self.scroll_child.borrow().top(),
        }
    }

    /// `0` with the header expanded, the header height once it is collapsed.
    pub fn current_scroll_y(&self) -> i32 {
        self.geometry().current_scroll_y()
    }

    pub fn scroll_to(&mut self, y: i32) {
        self.move_children_to(y);
    }

    /// Moves content by `dy` pixels; positive values expand the header.
    pub fn scroll_by(&mut self, dy: i32) {
        self.offset_children(dy as f32);
    }

    /// Queues a move back to the expanded position for the next frame.
    pub fn scroll_to_nested_child_top(&mut self) {
        self.pending.push(PendingTask::MoveTo(0));
        self.invalidate();
    }

    fn offset_children(&mut self, dy: f32) {
        let target = self.current_scroll_y() - dy as i32;
        self.move_children_to(target);
    }

    fn move_children_to(&mut self, y: i32) {
        let offsets = self.geometry().offsets_for(y, self.header_scroll_ratio);
        if offsets.header == 0 && offsets.child == 0 {
            return;
        }
        self.header.borrow_mut().offset_top_and_bottom(offsets.header);
        self.scroll_child
            .borrow_mut()
            .offset_top_and_bottom(offsets.child);
        log::trace!(
            "moved to {y}: header {:+}, child {:+}",
            offsets.header,
            offsets.child
        );
        self.invalidate();
    }

    // Configuration

    /// Values outside `[0, 1]` are ignored.
    pub fn set_header_scroll_ratio(&mut self, ratio: f32) {
        if is_valid_ratio(ratio) {
            self.header_scroll_ratio = ratio;
        } else {
            log::debug!("ignoring header scroll ratio {ratio}");
        }
    }

    pub fn header_scroll_ratio(&self) -> f32 {
        self.header_scroll_ratio
    }

    /// Replaces the scroll capability. `None` restores the default one.
    pub fn set_child_scroll_callback(&mut self, callback: Option<Rc<dyn ChildScrollCallback>>) {
        self.child_scroll = match callback {
            Some(callback) => callback,
            None => Rc::new(DefaultChildScroll::default()),
        };
    }

    /// A disabled container lets every touch through to its children.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn gesture_config(&self) -> GestureConfig {
        self.gesture_config
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase
    }

    pub fn is_flinging(&self) -> bool {
        self.fling.is_running()
    }

    // Frames

    fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Returns and clears the redraw request.
    pub fn take_invalidation(&mut self) -> bool {
        std::mem::take(&mut self.invalidated)
    }

    /// Whether [`on_frame`](Self::on_frame) has something to do.
    pub fn has_pending_work(&self) -> bool {
        !self.pending.is_empty() || self.fling.is_running()
    }

    /// Runs queued moves, then advances the fling. Returns `true` while
    /// another frame is needed.
    pub fn on_frame(&mut self, frame_time_nanos: u64) -> bool {
        let pending = std::mem::take(&mut self.pending);
        for task in pending {
            match task {
                PendingTask::MoveTo(y) => self.move_children_to(y),
            }
        }
        self.compute_scroll(frame_time_nanos)
    }

    /// Advances the fling by one frame and hands residual momentum to the
    /// scroll child once the header is collapsed.
    pub fn compute_scroll(&mut self, frame_time_nanos: u64) -> bool {
        let Some(y) = self.fling.advance(frame_time_nanos) else {
            return false;
        };
        self.move_children_to(y);
        let header_height = self.header.borrow().measured_size().height;
        if let Some(velocity) = self.fling.take_hand_off(y, header_height) {
            log::debug!("handing {velocity} px/s to the scroll child");
            self.child_scroll
                .dispatch_fling_velocity(&self.scroll_child, velocity);
        }
        self.invalidate();
        self.fling.is_running()
    }

    fn start_fling_if_needed(&mut self, velocity: f32) {
        if self.fling.start(velocity, self.current_scroll_y()) {
            self.invalidate();
        }
    }

    fn abort_fling(&mut self) {
        if self.fling.abort() {
            log::debug!("fling interrupted by a new gesture");
        }
    }

    // Touch routing

    fn can_child_scroll_up(&self) -> bool {
        self.child_scroll.can_child_scroll_up(&self.scroll_child)
    }

    fn drag_context(&self) -> DragContext {
        DragContext {
            child_top: self.scroll_child.borrow().top(),
            padding_top: self.padding.top,
        }
    }

    fn is_touch_in_header(&self, event: &TouchEvent) -> bool {
        let Some(raw) = event.raw_position() else {
            return false;
        };
        self.header
            .borrow()
            .global_visible_rect()
            .is_some_and(|rect| rect.contains_point(raw))
    }

    /// Scroll child first since it is drawn over the header while collapsing.
    fn child_under(&self, event: &TouchEvent) -> Option<ViewRef> {
        let position = event.action_pointer()?.position;
        [&self.scroll_child, &self.header]
            .into_iter()
            .find(|view| view.borrow().frame().contains_point(position))
            .cloned()
    }

    fn deliver_to_child(&self, child: &ViewRef, event: &TouchEvent) -> bool {
        let frame = child.borrow().frame();
        let local = event.offset_location(-frame.left as f32, -frame.top as f32);
        child.borrow_mut().dispatch_touch_event(&local)
    }

    /// Entry point for every touch event, in container coordinates.
    ///
    /// Mirrors view-group routing: the container watches events bound for a
    /// child through [`on_intercept_touch_event`](Self::on_intercept_touch_event)
    /// and takes the gesture over, sending the child a cancel, as soon as
    /// that returns `true`.
    pub fn dispatch_touch_event(&mut self, event: &TouchEvent) -> bool {
        if event.action == TouchAction::Down {
            // The previous gesture may have ended inside the scroll child,
            // out of sight of `on_touch_event`.
            self.release_velocity_tracker();
        }
        self.route_touch_event(event)
    }

    fn route_touch_event(&mut self, event: &TouchEvent) -> bool {
        if event.action == TouchAction::Down {
            self.touch_target = None;
        }

        let intercepted = if event.action == TouchAction::Down || self.touch_target.is_some() {
            self.on_intercept_touch_event(event)
        } else {
            true
        };

        if let Some(target) = self.touch_target.clone() {
            if intercepted {
                self.touch_target = None;
                self.deliver_to_child(&target, &event.with_action(TouchAction::Cancel));
                log::debug!("taking the gesture over from the scroll child");
                return true;
            }
            let handled = self.deliver_to_child(&target, event);
            if matches!(event.action, TouchAction::Up | TouchAction::Cancel) {
                self.touch_target = None;
            }
            return handled;
        }

        if !intercepted && event.action == TouchAction::Down {
            if let Some(child) = self.child_under(event) {
                if self.deliver_to_child(&child, event) {
                    self.touch_target = Some(child);
                    return true;
                }
            }
        }
        self.on_touch_event(event)
    }

    /// Accepted for view-group compatibility; the container never gives up
    /// its right to intercept.
    pub fn request_disallow_intercept_touch_event(&mut self, disallow: bool) {
        log::trace!("ignoring disallow-intercept request ({disallow})");
    }

    /// Watches events headed for a child. Returns `true` to take the gesture.
    pub fn on_intercept_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.enabled || self.can_child_scroll_up() {
            return false;
        }

        match event.action {
            TouchAction::Down => {
                self.abort_fling();
                let Some(pointer) = event.pointer(0).copied() else {
                    return false;
                };
                self.gesture.on_down(&pointer);
            }
            TouchAction::Move => {
                let Some((x, y)) = self.gesture.active_position(event) else {
                    log::warn!("move without a tracked pointer {:?}", self.gesture.active_pointer);
                    return false;
                };
                let context = self.drag_context();
                self.gesture.start_dragging_if_needed(x, y, context);
            }
            TouchAction::PointerUp => self.gesture.on_secondary_pointer_up(event),
            TouchAction::Up | TouchAction::Cancel => self.gesture.reset(),
            TouchAction::PointerDown => {}
        }

        self.gesture.is_dragging()
    }

    /// Handles events the container owns. Returns `true` while it wants the
    /// rest of the gesture.
    pub fn on_touch_event(&mut self, event: &TouchEvent) -> bool {
        if !self.enabled || self.can_child_scroll_up() {
            return false;
        }

        let factory = &self.velocity_tracker_factory;
        self.velocity_tracker
            .get_or_insert_with(|| factory())
            .add_movement(event);

        match event.action {
            TouchAction::Down => {
                self.abort_fling();
                let Some(pointer) = event.pointer(0).copied() else {
                    return false;
                };
                self.gesture.on_down(&pointer);
                if self.is_touch_in_header(event) {
                    log::trace!("down inside the header");
                    return true;
                }
            }
            TouchAction::Move => {
                let Some((x, y)) = self.gesture.active_position(event) else {
                    log::warn!("move without a tracked pointer {:?}", self.gesture.active_pointer);
                    return false;
                };
                let context = self.drag_context();
                self.gesture.start_dragging_if_needed(x, y, context);
                if self.gesture.is_dragging() {
                    let dy = y - self.gesture.last_motion_y;
                    if dy != 0.0 {
                        self.offset_children(dy);
                    }
                    if dy < 0.0 && self.scroll_child.borrow().top() <= self.padding.top {
                        // Header is gone: let the scroll child start its own
                        // gesture from here.
                        self.route_touch_event(&event.with_action(TouchAction::Down));
                    }
                }
                self.gesture.last_motion_y = y;
            }
            TouchAction::PointerDown => {
                let Some(pointer) = event.action_pointer().copied() else {
                    return false;
                };
                self.gesture.on_pointer_down(&pointer);
            }
            TouchAction::PointerUp => self.gesture.on_secondary_pointer_up(event),
            TouchAction::Up => {
                let active = self.gesture.active_pointer;
                let was_dragging = self.gesture.is_dragging();
                match (active, self.velocity_tracker.as_ref()) {
                    (Some(pointer), Some(tracker)) if was_dragging => {
                        let velocity = tracker
                            .y_velocity(pointer, self.gesture_config.max_fling_velocity)
                            .trunc();
                        self.start_fling_if_needed(velocity);
                    }
                    (None, _) => log::warn!("release without a tracked pointer"),
                    _ => {}
                }
                self.end_gesture();
                return false;
            }
            TouchAction::Cancel => {
                self.end_gesture();
                return false;
            }
        }

        self.gesture.is_dragging()
    }

    fn end_gesture(&mut self) {
        self.gesture.reset();
        self.release_velocity_tracker();
    }

    fn release_velocity_tracker(&mut self) {
        if let Some(mut tracker) = self.velocity_tracker.take() {
            log::trace!("releasing velocity tracker");
            tracker.clear();
        }
    }
}
