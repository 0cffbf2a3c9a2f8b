//! Fling physics for nestscroll
//!
//! [`spline`] holds the deceleration curve and the calculator that turns a
//! release velocity into a distance and a duration. [`DecayScroller`] runs
//! that curve frame by frame between two bounds.

pub mod scroller;
pub mod spline;

pub use scroller::DecayScroller;
pub use spline::{FlingCalculator, FlingInfo, FlingSpline, SplineSample};
