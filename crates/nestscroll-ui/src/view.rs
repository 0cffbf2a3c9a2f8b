//! The host view contract.
//!
//! The container never owns its children. The host layout tree hands out
//! shared [`ViewRef`] handles and the container moves them, queries their
//! scroll capability, and forwards touches and residual flings to them.

use nestscroll_foundation::TouchEvent;
use nestscroll_graphics::{IntRect, IntSize};
use std::cell::RefCell;
use std::rc::Rc;

pub type ViewId = u32;

pub type ViewRef = Rc<RefCell<dyn View>>;

/// Scrollable widget categories the default capability knows about.
///
/// The set is closed. Custom widgets either report one of these categories
/// or are handled through a custom `ChildScrollCallback`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScrollableKind {
    /// Adapter-backed list or grid.
    List,
    /// Recycling list with a two-axis fling entry point.
    Recycler,
    ScrollView,
    NestedScrollView,
    /// Embedded web content. Has no fling entry point.
    WebContent,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VerticalDirection {
    /// Toward the start of the content.
    Up,
    /// Toward the end of the content.
    Down,
}

/// Size bounds passed down during measurement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Constraints {
    pub min_width: i32,
    pub max_width: i32,
    pub min_height: i32,
    pub max_height: i32,
}

impl Constraints {
    pub fn tight(width: i32, height: i32) -> Self {
        Self {
            min_width: width,
            max_width: width,
            min_height: height,
            max_height: height,
        }
    }

    pub fn loose(max_width: i32, max_height: i32) -> Self {
        Self {
            min_width: 0,
            max_width,
            min_height: 0,
            max_height,
        }
    }

    pub fn constrain(&self, size: IntSize) -> IntSize {
        IntSize::new(
            size.width.clamp(self.min_width, self.max_width.max(self.min_width)),
            size.height.clamp(self.min_height, self.max_height.max(self.min_height)),
        )
    }
}

/// A node of the host layout tree.
pub trait View {
    fn view_id(&self) -> Option<ViewId> {
        None
    }

    /// Position in the parent's coordinates.
    fn frame(&self) -> IntRect;

    fn set_frame(&mut self, frame: IntRect);

    fn measured_size(&self) -> IntSize;

    fn measure(&mut self, constraints: Constraints);

    fn top(&self) -> i32 {
        self.frame().top
    }

    /// Moves the view vertically without changing its height.
    fn offset_top_and_bottom(&mut self, offset: i32) {
        if offset != 0 {
            let frame = self.frame().offset_vertical(offset);
            self.set_frame(frame);
        }
    }

    /// Visible part of the view in screen coordinates, `None` when hidden.
    fn global_visible_rect(&self) -> Option<IntRect> {
        None
    }

    fn children(&self) -> Vec<ViewRef> {
        Vec::new()
    }

    fn scrollable_kind(&self) -> Option<ScrollableKind> {
        None
    }

    fn can_scroll_vertically(&self, _direction: VerticalDirection) -> bool {
        false
    }

    /// List widgets answer through their own query.
    fn can_scroll_list(&self, direction: VerticalDirection) -> bool {
        self.can_scroll_vertically(direction)
    }

    /// Single-axis fling entry point.
    fn fling(&mut self, _velocity_y: i32) {}

    /// Two-axis fling entry point.
    fn fling_xy(&mut self, _velocity_x: i32, velocity_y: i32) {
        self.fling(velocity_y);
    }

    /// Delivers a touch in this view's coordinates. Returns `true` when the
    /// view wants the rest of the gesture.
    fn dispatch_touch_event(&mut self, _event: &TouchEvent) -> bool {
        false
    }

    /// Returns this view as a pager if it implements the trait.
    fn as_pager(&self) -> Option<&dyn Pager> {
        None
    }
}

/// A view showing one page of children at a time.
pub trait Pager {
    fn current_item(&self) -> usize;
}

/// Depth-first search for `id` among `roots` and their descendants.
pub fn find_view_by_id(roots: &[ViewRef], id: ViewId) -> Option<ViewRef> {
    for view in roots {
        if view.borrow().view_id() == Some(id) {
            return Some(Rc::clone(view));
        }
        let children = view.borrow().children();
        if let Some(found) = find_view_by_id(&children, id) {
            return Some(found);
        }
    }
    None
}

/// Whether the whole measured area of `view` is on screen.
pub fn is_fully_shown(view: &dyn View) -> bool {
    let measured = view.measured_size();
    view.global_visible_rect().is_some_and(|visible| {
        visible.width() >= measured.width && visible.height() >= measured.height
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_constraints_force_size() {
        let constraints = Constraints::tight(320, 480);
        assert_eq!(
            constraints.constrain(IntSize::new(10, 2000)),
            IntSize::new(320, 480)
        );
    }

    #[test]
    fn loose_constraints_cap_size() {
        let constraints = Constraints::loose(320, 480);
        assert_eq!(
            constraints.constrain(IntSize::new(100, 2000)),
            IntSize::new(100, 480)
        );
    }
}
