//! Gesture thresholds shared by the nested scroll container.
//!
//! Values are in logical pixels and logical pixels per second.

/// Platform drag threshold. A pointer must travel further than this before a
/// touch is treated as a drag by ordinary scroll containers.
pub const DRAG_THRESHOLD: f32 = 8.0;

/// The nested container claims drags at a quarter of the platform threshold
/// so the header starts moving before the nested child reacts.
pub const NESTED_SLOP_FACTOR: f32 = 0.25;

/// Maximum release velocity in logical pixels per second.
pub const MAX_FLING_VELOCITY: f32 = 8_000.0;

/// Display density at 160 dpi.
pub const BASELINE_DENSITY: f32 = 1.0;

/// Per-container gesture tuning.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureConfig {
    /// Minimum vertical travel before the container claims a drag.
    pub touch_slop: f32,
    /// Release velocities are clamped to `±max_fling_velocity`.
    pub max_fling_velocity: f32,
    /// Display density used by the fling physics.
    pub density: f32,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            touch_slop: DRAG_THRESHOLD * NESTED_SLOP_FACTOR,
            max_fling_velocity: MAX_FLING_VELOCITY,
            density: BASELINE_DENSITY,
        }
    }
}

impl GestureConfig {
    /// Scales the pixel thresholds for a display density.
    pub fn for_density(density: f32) -> Self {
        Self {
            touch_slop: DRAG_THRESHOLD * NESTED_SLOP_FACTOR * density,
            max_fling_velocity: MAX_FLING_VELOCITY * density,
            density,
        }
    }

    pub fn with_touch_slop(mut self, touch_slop: f32) -> Self {
        self.touch_slop = touch_slop;
        self
    }

    pub fn with_max_fling_velocity(mut self, max_fling_velocity: f32) -> Self {
        self.max_fling_velocity = max_fling_velocity;
        self
    }
}
