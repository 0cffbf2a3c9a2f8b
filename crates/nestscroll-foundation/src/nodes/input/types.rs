use nestscroll_graphics::Point;
use smallvec::SmallVec;

pub type PointerId = u32;

/// What happened to the pointer at [`TouchEvent::action_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TouchAction {
    /// First pointer of a gesture went down.
    Down,
    /// One or more pointers moved.
    Move,
    /// Last pointer of a gesture went up.
    Up,
    /// The gesture was taken away from the receiver.
    Cancel,
    /// An additional pointer went down.
    PointerDown,
    /// A non-final pointer went up.
    PointerUp,
}

/// Position of one pointer inside a touch event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    pub id: PointerId,
    /// Position in the receiving view's coordinates.
    pub position: Point,
    /// Position in screen coordinates; unchanged while the event is routed.
    pub global_position: Point,
}

impl PointerSample {
    pub fn new(id: PointerId, position: Point) -> Self {
        Self {
            id,
            position,
            global_position: position,
        }
    }

    pub fn with_global_position(mut self, global_position: Point) -> Self {
        self.global_position = global_position;
        self
    }
}

/// A multi-pointer touch event.
///
/// Every event carries all pointers that are currently down. Lookups by
/// index or id return `None` instead of panicking so stale pointer ids can be
/// handled by the receiver.
#[derive(Clone, Debug, PartialEq)]
pub struct TouchEvent {
    pub action: TouchAction,
    /// Index into the pointer list of the pointer that changed state.
    pub action_index: usize,
    /// Event time in milliseconds.
    pub time_ms: i64,
    pointers: SmallVec<[PointerSample; 4]>,
}

impl TouchEvent {
    pub fn new(
        action: TouchAction,
        action_index: usize,
        time_ms: i64,
        pointers: impl IntoIterator<Item = PointerSample>,
    ) -> Self {
        Self {
            action,
            action_index,
            time_ms,
            pointers: pointers.into_iter().collect(),
        }
    }

    /// Single-pointer event with pointer id `0` at `(x, y)`.
    pub fn single(action: TouchAction, time_ms: i64, x: f32, y: f32) -> Self {
        Self::new(action, 0, time_ms, [PointerSample::new(0, Point::new(x, y))])
    }

    pub fn pointer_count(&self) -> usize {
        self.pointers.len()
    }

    pub fn pointers(&self) -> &[PointerSample] {
        &self.pointers
    }

    pub fn pointer(&self, index: usize) -> Option<&PointerSample> {
        self.pointers.get(index)
    }

    pub fn find_pointer_index(&self, id: PointerId) -> Option<usize> {
        self.pointers.iter().position(|sample| sample.id == id)
    }

    pub fn y(&self, index: usize) -> Option<f32> {
        self.pointer(index).map(|sample| sample.position.y)
    }

    /// Sample of the pointer that changed state.
    pub fn action_pointer(&self) -> Option<&PointerSample> {
        self.pointer(self.action_index)
    }

    /// Screen position of the first pointer.
    pub fn raw_position(&self) -> Option<Point> {
        self.pointer(0).map(|sample| sample.global_position)
    }

    /// Copy of this event with a different action, keeping all pointers.
    pub fn with_action(&self, action: TouchAction) -> Self {
        Self {
            action,
            ..self.clone()
        }
    }

    /// Copy of this event with local positions shifted by `(dx, dy)`.
    pub fn offset_location(&self, dx: f32, dy: f32) -> Self {
        Self {
            pointers: self
                .pointers
                .iter()
                .map(|sample| PointerSample {
                    position: sample.position.translate(dx, dy),
                    ..*sample
                })
                .collect(),
            ..self.clone()
        }
    }
}
