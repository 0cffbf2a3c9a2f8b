//! In-memory views for driving a container without a host toolkit.

use nestscroll_foundation::{
    PointerId, PointerVelocityTracker, TouchAction, TouchEvent, VelocityTracking,
};
use nestscroll_graphics::{IntRect, IntSize};
use nestscroll_ui::{
    Constraints, Pager, ScrollableKind, VelocityTrackerFactory, VerticalDirection, View, ViewId,
    ViewRef,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// What [`FakeView::global_visible_rect`] reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenRect {
    /// The frame, shifted by the view's screen offset.
    FollowFrame,
    Hidden,
    Fixed(IntRect),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlingCall {
    OneAxis(i32),
    TwoAxis(i32, i32),
}

impl FlingCall {
    pub fn velocity_y(&self) -> i32 {
        match *self {
            FlingCall::OneAxis(velocity) | FlingCall::TwoAxis(_, velocity) => velocity,
        }
    }
}

/// A view that records what the container does to it.
pub struct FakeView {
    id: Option<ViewId>,
    preferred: IntSize,
    measured: IntSize,
    frame: IntRect,
    kind: Option<ScrollableKind>,
    screen_offset: (i32, i32),
    screen_rect: ScreenRect,
    children: Vec<Rc<RefCell<FakeView>>>,
    pub can_scroll_up: bool,
    pub consumes_touches: bool,
    pub flings: Vec<FlingCall>,
    pub touches: Vec<TouchEvent>,
}

impl FakeView {
    /// A view that wants `width` x `height` when measured loosely.
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            id: None,
            preferred: IntSize::new(width, height),
            measured: IntSize::default(),
            frame: IntRect::default(),
            kind: None,
            screen_offset: (0, 0),
            screen_rect: ScreenRect::FollowFrame,
            children: Vec::new(),
            can_scroll_up: false,
            consumes_touches: false,
            flings: Vec::new(),
            touches: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: ViewId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_kind(mut self, kind: ScrollableKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn consuming_touches(mut self) -> Self {
        self.consumes_touches = true;
        self
    }

    pub fn with_child(mut self, child: Rc<RefCell<FakeView>>) -> Self {
        self.children.push(child);
        self
    }

    /// Screen position of the parent's origin.
    pub fn with_screen_offset(mut self, dx: i32, dy: i32) -> Self {
        self.screen_offset = (dx, dy);
        self
    }

    /// Measures to `frame`'s size and places the view there.
    pub fn placed(mut self, frame: IntRect) -> Self {
        self.measured = frame.size();
        self.frame = frame;
        self
    }

    pub fn shared(self) -> Rc<RefCell<FakeView>> {
        Rc::new(RefCell::new(self))
    }

    pub fn set_screen_rect(&mut self, rect: ScreenRect) {
        self.screen_rect = rect;
    }

    /// Shows or hides this view and all of its descendants.
    pub fn set_shown(&mut self, shown: bool) {
        self.screen_rect = if shown {
            ScreenRect::FollowFrame
        } else {
            ScreenRect::Hidden
        };
        for child in &self.children {
            child.borrow_mut().set_shown(shown);
        }
    }

    pub fn touch_actions(&self) -> Vec<TouchAction> {
        self.touches.iter().map(|event| event.action).collect()
    }

    pub fn clear_records(&mut self) {
        self.flings.clear();
        self.touches.clear();
    }
}

impl View for FakeView {
    fn view_id(&self) -> Option<ViewId> {
        self.id
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
        self.measured = constraints.constrain(self.preferred);
    }

    fn global_visible_rect(&self) -> Option<IntRect> {
        match self.screen_rect {
            ScreenRect::FollowFrame => Some(
                self.frame
                    .translate(self.screen_offset.0, self.screen_offset.1),
            ),
            ScreenRect::Hidden => None,
            ScreenRect::Fixed(rect) => Some(rect),
        }
    }

    fn children(&self) -> Vec<ViewRef> {
        self.children
            .iter()
            .map(|child| Rc::clone(child) as ViewRef)
            .collect()
    }

    fn scrollable_kind(&self) -> Option<ScrollableKind> {
        self.kind
    }

    fn can_scroll_vertically(&self, direction: VerticalDirection) -> bool {
        direction == VerticalDirection::Up && self.can_scroll_up
    }

    fn fling(&mut self, velocity_y: i32) {
        self.flings.push(FlingCall::OneAxis(velocity_y));
    }

    fn fling_xy(&mut self, velocity_x: i32, velocity_y: i32) {
        self.flings.push(FlingCall::TwoAxis(velocity_x, velocity_y));
    }

    fn dispatch_touch_event(&mut self, event: &TouchEvent) -> bool {
        self.touches.push(event.clone());
        self.consumes_touches
    }
}

/// A pager whose pages are [`FakeView`]s. Only the current page is shown.
pub struct FakePager {
    inner: FakeView,
    pages: Vec<Rc<RefCell<FakeView>>>,
    current: usize,
}

impl FakePager {
    pub fn new(frame: IntRect, pages: Vec<Rc<RefCell<FakeView>>>) -> Self {
        let mut pager = Self {
            inner: FakeView::new(frame.width(), frame.height()).placed(frame),
            pages,
            current: 0,
        };
        pager.set_current_item(0);
        pager
    }

    pub fn shared(self) -> Rc<RefCell<FakePager>> {
        Rc::new(RefCell::new(self))
    }

    pub fn set_current_item(&mut self, index: usize) {
        self.current = index;
        for (page_index, page) in self.pages.iter().enumerate() {
            page.borrow_mut().set_shown(page_index == index);
        }
    }
}

impl Pager for FakePager {
    fn current_item(&self) -> usize {
        self.current
    }
}

impl View for FakePager {
    fn view_id(&self) -> Option<ViewId> {
        self.inner.view_id()
    }

    fn frame(&self) -> IntRect {
        self.inner.frame()
    }

    fn set_frame(&mut self, frame: IntRect) {
        self.inner.set_frame(frame);
    }

    fn measured_size(&self) -> IntSize {
        self.inner.measured_size()
    }

    fn measure(&mut self, constraints: Constraints) {
        self.inner.measure(constraints);
    }

    fn global_visible_rect(&self) -> Option<IntRect> {
        self.inner.global_visible_rect()
    }

    fn children(&self) -> Vec<ViewRef> {
        self.pages
            .iter()
            .map(|page| Rc::clone(page) as ViewRef)
            .collect()
    }

    fn as_pager(&self) -> Option<&dyn Pager> {
        Some(self)
    }
}

/// Velocity tracker that always reports the same y velocity.
pub struct FixedVelocityTracker {
    velocity: Rc<Cell<f32>>,
    movements: Rc<Cell<usize>>,
}

impl FixedVelocityTracker {
    /// Factory whose trackers read `velocity` at release time.
    pub fn factory(velocity: Rc<Cell<f32>>) -> VelocityTrackerFactory {
        Self::counting_factory(velocity, Rc::new(Cell::new(0)))
    }

    /// Like [`factory`](Self::factory), also counting recorded movements.
    pub fn counting_factory(
        velocity: Rc<Cell<f32>>,
        movements: Rc<Cell<usize>>,
    ) -> VelocityTrackerFactory {
        Rc::new(move || {
            Box::new(FixedVelocityTracker {
                velocity: Rc::clone(&velocity),
                movements: Rc::clone(&movements),
            }) as Box<dyn VelocityTracking>
        })
    }
}

impl VelocityTracking for FixedVelocityTracker {
    fn add_movement(&mut self, _event: &TouchEvent) {
        self.movements.set(self.movements.get() + 1);
    }

    fn y_velocity(&self, _pointer: PointerId, max_velocity: f32) -> f32 {
        self.velocity.get().clamp(-max_velocity, max_velocity)
    }

    fn clear(&mut self) {}
}

/// Wraps `factory`, counting the trackers it hands out in `created`.
pub fn counting_trackers(
    factory: VelocityTrackerFactory,
    created: Rc<Cell<usize>>,
) -> VelocityTrackerFactory {
    Rc::new(move || {
        created.set(created.get() + 1);
        factory()
    })
}

/// Factory for the real per-pointer tracker.
pub fn pointer_trackers() -> VelocityTrackerFactory {
    Rc::new(|| Box::new(PointerVelocityTracker::new()) as Box<dyn VelocityTracking>)
}
