//! Input foundation for nestscroll: touch events, gesture thresholds and
//! release-velocity tracking.

pub mod gesture_constants;
pub mod nodes;
pub mod velocity_tracker;

pub use gesture_constants::GestureConfig;
pub use nestscroll_graphics::Point;
pub use nodes::input::{PointerId, PointerSample, TouchAction, TouchEvent};
pub use velocity_tracker::{PointerVelocityTracker, VelocityTracker1D, VelocityTracking};

pub mod prelude {
    pub use crate::gesture_constants::*;
    pub use crate::nodes::input::prelude::*;
    pub use crate::velocity_tracker::{PointerVelocityTracker, VelocityTracking};
}
