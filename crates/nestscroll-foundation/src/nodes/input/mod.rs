pub mod types;

pub use types::{PointerId, PointerSample, TouchAction, TouchEvent};

pub mod prelude {
    pub use super::types::{PointerId, PointerSample, TouchAction, TouchEvent};
}
