//! Logical scroll position to header/child offsets.
//!
//! The scroll position is `0` when the header is fully expanded and equals the
//! header height when the scroll child covers it completely. Offsets are
//! relative moves to apply to the current tops.

/// Vertical layout facts the offset model reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollGeometry {
    pub padding_top: i32,
    pub header_height: i32,
    pub header_top: i32,
    pub child_top: i32,
}

/// Relative vertical moves for header and scroll child.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScrollOffsets {
    pub header: i32,
    pub child: i32,
}

/// Rounds half up, matching integer pixel snapping of the host toolkit.
fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl ScrollGeometry {
    pub fn current_scroll_y(&self) -> i32 {
        self.header_height - self.child_top + self.padding_top
    }

    /// Offsets that bring the layout to `target_y`.
    ///
    /// The two ends snap exactly. In between, the header follows the child
    /// scaled by `ratio` but never moves below its resting top.
    pub fn offsets_for(&self, target_y: i32, ratio: f32) -> ScrollOffsets {
        let Self {
            padding_top,
            header_height,
            header_top,
            child_top,
        } = *self;

        if target_y <= 0 {
            return ScrollOffsets {
                child: header_height + padding_top - child_top,
                header: padding_top - header_top,
            };
        }

        if target_y >= header_height {
            let child = padding_top - child_top;
            return ScrollOffsets {
                child,
                header: round_half_up(child as f32 * ratio),
            };
        }

        let child = padding_top + header_height - child_top - target_y;
        let mut header = round_half_up(child as f32 * ratio);
        if padding_top - header_top - header < 0 {
            header = 0;
        }
        ScrollOffsets { child, header }
    }

    /// Geometry after applying `offsets`.
    pub fn shifted(&self, offsets: ScrollOffsets) -> Self {
        Self {
            header_top: self.header_top + offsets.header,
            child_top: self.child_top + offsets.child,
            ..*self
        }
    }
}
