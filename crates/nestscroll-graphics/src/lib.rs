//! Pixel geometry for nestscroll
//!
//! Views are positioned on an integer pixel grid while pointer samples carry
//! sub-pixel float coordinates. This crate holds both families of types.

mod geometry;

pub use geometry::*;

pub mod prelude {
    pub use crate::geometry::{EdgeInsets, IntRect, IntSize, Point};
}
