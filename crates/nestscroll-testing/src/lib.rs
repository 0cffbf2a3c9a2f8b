//! Testing utilities for nestscroll: a touch robot, fake views and a few
//! assertions on container state.

pub mod assertions;
pub mod fakes;
pub mod robot;

pub use fakes::{
    counting_trackers, pointer_trackers, FakePager, FakeView, FixedVelocityTracker, FlingCall,
    ScreenRect,
};
pub use robot::NestedScrollRobot;

pub mod prelude {
    pub use crate::assertions::*;
    pub use crate::fakes::*;
    pub use crate::robot::NestedScrollRobot;
}
