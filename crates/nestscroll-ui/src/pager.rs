//! Scroll capability for a pager whose pages each hold a scrollable view.

use crate::child_scroll::{can_scroll_up, ChildScrollCallback, FlingDispatcher};
use crate::error::NestedScrollError;
use crate::view::{is_fully_shown, ViewRef};
use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Routes scroll queries and flings to the scrollable view of the pager's
/// current page instead of to the pager itself.
///
/// The scrollable view of each page is looked up once and cached by page
/// index.
pub struct PagerChildScroll {
    pager: ViewRef,
    page_children: RefCell<FxHashMap<usize, ViewRef>>,
    dispatcher: FlingDispatcher,
}

impl PagerChildScroll {
    pub fn new(pager: ViewRef) -> Result<Self, NestedScrollError> {
        Self::with_dispatcher(pager, FlingDispatcher::standard())
    }

    pub fn with_dispatcher(
        pager: ViewRef,
        dispatcher: FlingDispatcher,
    ) -> Result<Self, NestedScrollError> {
        if pager.borrow().as_pager().is_none() {
            return Err(NestedScrollError::NotAPager);
        }
        Ok(Self {
            pager,
            page_children: RefCell::new(FxHashMap::default()),
            dispatcher,
        })
    }

    /// Scrollable view of the current page, if one is on screen.
    pub fn current_scroll_child(&self) -> Option<ViewRef> {
        let page = self.pager.borrow().as_pager()?.current_item();
        if let Some(cached) = self.page_children.borrow().get(&page) {
            return Some(Rc::clone(cached));
        }
        let found = find_shown_scrollable(&self.pager)?;
        log::debug!("caching scroll child for page {page}");
        self.page_children
            .borrow_mut()
            .insert(page, Rc::clone(&found));
        Some(found)
    }

    /// Forgets cached page children, e.g. after the pager's pages changed.
    pub fn invalidate(&self) {
        self.page_children.borrow_mut().clear();
    }

    pub fn cached_pages(&self) -> usize {
        self.page_children.borrow().len()
    }
}

impl ChildScrollCallback for PagerChildScroll {
    fn can_child_scroll_up(&self, _child: &ViewRef) -> bool {
        self.current_scroll_child()
            .is_some_and(|target| can_scroll_up(&*target.borrow()))
    }

    fn dispatch_fling_velocity(&self, _child: &ViewRef, velocity: f32) {
        if let Some(target) = self.current_scroll_child() {
            self.dispatcher.dispatch(&target, velocity);
        }
    }
}

/// First view in depth-first order that is scrollable and fully on screen.
fn find_shown_scrollable(view: &ViewRef) -> Option<ViewRef> {
    {
        let current = view.borrow();
        if current.scrollable_kind().is_some() && is_fully_shown(&*current) {
            return Some(Rc::clone(view));
        }
    }
    let children = view.borrow().children();
    children.iter().find_map(find_shown_scrollable)
}
