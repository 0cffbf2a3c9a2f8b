//! Nested scroll container: a collapsible header above one scroll child.

pub mod child_scroll;
mod error;
pub mod fling;
pub mod gesture;
mod nested_scroll_layout;
pub mod offset_model;
pub mod pager;
pub mod view;

pub use child_scroll::{
    can_scroll_up, ChildScrollCallback, DefaultChildScroll, FlingDelegate, FlingDispatcher,
    ListFling, RecyclerFling, ScrollViewFling,
};
pub use error::NestedScrollError;
pub use fling::FlingController;
pub use gesture::{DragContext, GesturePhase, GestureState};
pub use nested_scroll_layout::{
    HeaderSource, NestedScrollConfig, NestedScrollLayout, ScrollChildSource,
    VelocityTrackerFactory, DEFAULT_HEADER_SCROLL_RATIO,
};
pub use offset_model::{ScrollGeometry, ScrollOffsets};
pub use pager::PagerChildScroll;
pub use view::{
    find_view_by_id, is_fully_shown, Constraints, Pager, ScrollableKind, VerticalDirection, View,
    ViewId, ViewRef,
};

pub use nestscroll_foundation::{
    GestureConfig, PointerId, PointerSample, PointerVelocityTracker, TouchAction, TouchEvent,
    VelocityTracking,
};
pub use nestscroll_graphics::{EdgeInsets, IntRect, IntSize, Point};

pub mod prelude {
    pub use crate::{
        ChildScrollCallback, GesturePhase, HeaderSource, NestedScrollConfig, NestedScrollLayout,
        ScrollChildSource, ScrollableKind, TouchAction, TouchEvent, View, ViewRef,
    };
}
