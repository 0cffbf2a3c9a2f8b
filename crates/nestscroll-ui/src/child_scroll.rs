//! How the container asks its scroll child about scroll state and hands it
//! residual fling velocity.

use crate::view::{ScrollableKind, VerticalDirection, View, ViewRef};
use rustc_hash::FxHashMap;
use std::rc::Rc;

/// Scroll capability of the container's scroll child.
///
/// The container holds one implementation at a time. [`DefaultChildScroll`]
/// covers the built-in scrollable categories; paged layouts use
/// [`crate::PagerChildScroll`].
pub trait ChildScrollCallback {
    /// Whether `child` still has content above its current position. While
    /// this is `true` the container ignores touches entirely.
    fn can_child_scroll_up(&self, child: &ViewRef) -> bool;

    /// Continues a fling inside `child` with the container's residual
    /// `velocity` (px/sec, positive toward the end of the content).
    fn dispatch_fling_velocity(&self, child: &ViewRef, velocity: f32);
}

/// Starts a fling on a view of one scrollable category.
pub trait FlingDelegate {
    fn fling(&self, view: &mut dyn View, velocity: f32);
}

impl<F> FlingDelegate for F
where
    F: Fn(&mut dyn View, f32),
{
    fn fling(&self, view: &mut dyn View, velocity: f32) {
        self(view, velocity)
    }
}

/// Adapter-backed lists fling through the single-axis entry point.
pub struct ListFling;

impl FlingDelegate for ListFling {
    fn fling(&self, view: &mut dyn View, velocity: f32) {
        view.fling(velocity as i32);
    }
}

/// Recycling lists fling through the two-axis entry point.
pub struct RecyclerFling;

impl FlingDelegate for RecyclerFling {
    fn fling(&self, view: &mut dyn View, velocity: f32) {
        view.fling_xy(0, velocity as i32);
    }
}

pub struct ScrollViewFling;

impl FlingDelegate for ScrollViewFling {
    fn fling(&self, view: &mut dyn View, velocity: f32) {
        view.fling(velocity as i32);
    }
}

/// Routes a residual fling to the delegate registered for the view's
/// [`ScrollableKind`]. Views of unregistered kinds are left alone.
#[derive(Clone)]
pub struct FlingDispatcher {
    delegates: FxHashMap<ScrollableKind, Rc<dyn FlingDelegate>>,
}

impl Default for FlingDispatcher {
    fn default() -> Self {
        Self::standard()
    }
}

impl FlingDispatcher {
    pub fn empty() -> Self {
        Self {
            delegates: FxHashMap::default(),
        }
    }

    /// Delegates for every built-in category that can fling. Web content has
    /// no fling entry point and is not registered.
    pub fn standard() -> Self {
        let scroll_view: Rc<dyn FlingDelegate> = Rc::new(ScrollViewFling);
        Self::empty()
            .with_delegate(ScrollableKind::List, Rc::new(ListFling))
            .with_delegate(ScrollableKind::Recycler, Rc::new(RecyclerFling))
            .with_delegate(ScrollableKind::ScrollView, Rc::clone(&scroll_view))
            .with_delegate(ScrollableKind::NestedScrollView, scroll_view)
    }

    pub fn with_delegate(mut self, kind: ScrollableKind, delegate: Rc<dyn FlingDelegate>) -> Self {
        self.delegates.insert(kind, delegate);
        self
    }

    /// Returns `true` if a delegate received the fling.
    pub fn dispatch(&self, view: &ViewRef, velocity: f32) -> bool {
        let kind = view.borrow().scrollable_kind();
        let Some(delegate) = kind.and_then(|kind| self.delegates.get(&kind)) else {
            log::trace!("no fling delegate for {kind:?}, dropping {velocity} px/s");
            return false;
        };
        delegate.fling(&mut *view.borrow_mut(), velocity);
        true
    }
}

/// Upward scroll query matching the view's category.
pub fn can_scroll_up(view: &dyn View) -> bool {
    match view.scrollable_kind() {
        Some(ScrollableKind::List) => view.can_scroll_list(VerticalDirection::Up),
        _ => view.can_scroll_vertically(VerticalDirection::Up),
    }
}

/// Capability used when the container has no custom callback.
#[derive(Clone, Default)]
pub struct DefaultChildScroll {
    dispatcher: FlingDispatcher,
}

impl DefaultChildScroll {
    pub fn new(dispatcher: FlingDispatcher) -> Self {
        Self { dispatcher }
    }
}

impl ChildScrollCallback for DefaultChildScroll {
    fn can_child_scroll_up(&self, child: &ViewRef) -> bool {
        can_scroll_up(&*child.borrow())
    }

    fn dispatch_fling_velocity(&self, child: &ViewRef, velocity: f32) {
        self.dispatcher.dispatch(child, velocity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Constraints;
    use nestscroll_graphics::{IntRect, IntSize};
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct Probe {
        kind: Option<ScrollableKind>,
        list_up: bool,
        vertical_up: bool,
        flings: Vec<i32>,
        two_axis_flings: Cell<u32>,
    }

    impl View for Probe {
        fn frame(&self) -> IntRect {
            IntRect::default()
        }
        fn set_frame(&mut self, _frame: IntRect) {}
        fn measured_size(&self) -> IntSize {
            IntSize::default()
        }
        fn measure(&mut self, _constraints: Constraints) {}
        fn scrollable_kind(&self) -> Option<ScrollableKind> {
            self.kind
        }
        fn can_scroll_vertically(&self, _direction: VerticalDirection) -> bool {
            self.vertical_up
        }
        fn can_scroll_list(&self, _direction: VerticalDirection) -> bool {
            self.list_up
        }
        fn fling(&mut self, velocity_y: i32) {
            self.flings.push(velocity_y);
        }
        fn fling_xy(&mut self, velocity_x: i32, velocity_y: i32) {
            assert_eq!(velocity_x, 0);
            self.two_axis_flings.set(self.two_axis_flings.get() + 1);
            self.flings.push(velocity_y);
        }
    }

    fn probe(kind: Option<ScrollableKind>) -> Rc<RefCell<Probe>> {
        Rc::new(RefCell::new(Probe {
            kind,
            ..Probe::default()
        }))
    }

    #[test]
    fn lists_use_their_own_query() {
        let list = probe(Some(ScrollableKind::List));
        list.borrow_mut().vertical_up = true;
        let view: ViewRef = list.clone();
        assert!(!DefaultChildScroll::default().can_child_scroll_up(&view));

        list.borrow_mut().list_up = true;
        assert!(DefaultChildScroll::default().can_child_scroll_up(&view));
    }

    #[test]
    fn other_kinds_use_vertical_query() {
        let web = probe(Some(ScrollableKind::WebContent));
        web.borrow_mut().vertical_up = true;
        let view: ViewRef = web;
        assert!(DefaultChildScroll::default().can_child_scroll_up(&view));
    }

    #[test]
    fn recycler_flings_on_two_axes() {
        let recycler = probe(Some(ScrollableKind::Recycler));
        let view: ViewRef = recycler.clone();
        DefaultChildScroll::default().dispatch_fling_velocity(&view, 1234.9);
        assert_eq!(recycler.borrow().flings, vec![1234]);
        assert_eq!(recycler.borrow().two_axis_flings.get(), 1);
    }

    #[test]
    fn scroll_views_fling_on_one_axis() {
        for kind in [ScrollableKind::ScrollView, ScrollableKind::NestedScrollView] {
            let scroll = probe(Some(kind));
            let view: ViewRef = scroll.clone();
            DefaultChildScroll::default().dispatch_fling_velocity(&view, 800.0);
            assert_eq!(scroll.borrow().flings, vec![800]);
            assert_eq!(scroll.borrow().two_axis_flings.get(), 0);
        }
    }

    #[test]
    fn unknown_kinds_are_ignored() {
        let dispatcher = FlingDispatcher::standard();
        for kind in [Some(ScrollableKind::WebContent), None] {
            let target = probe(kind);
            let view: ViewRef = target.clone();
            assert!(!dispatcher.dispatch(&view, 500.0));
            assert!(target.borrow().flings.is_empty());
        }
    }

    #[test]
    fn custom_delegate_replaces_builtin() {
        let hits = Rc::new(Cell::new(0.0));
        let seen = Rc::clone(&hits);
        let dispatcher = FlingDispatcher::standard().with_delegate(
            ScrollableKind::WebContent,
            Rc::new(move |_view: &mut dyn View, velocity: f32| seen.set(velocity)),
        );
        let view: ViewRef = probe(Some(ScrollableKind::WebContent));
        assert!(dispatcher.dispatch(&view, 42.0));
        assert_eq!(hits.get(), 42.0);
    }
}
