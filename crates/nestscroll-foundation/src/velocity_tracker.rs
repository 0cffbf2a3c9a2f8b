//! Release-velocity tracking.
//!
//! [`VelocityTracker1D`] estimates velocity from one axis of samples with the
//! impulse strategy: each segment between two samples adds the kinetic energy
//! it would impart, and the total energy is converted back to a velocity.
//! [`PointerVelocityTracker`] keeps one vertical tracker per pointer id.

use crate::nodes::input::{PointerId, TouchAction, TouchEvent};
use rustc_hash::FxHashMap;

const HISTORY_SIZE: usize = 20;

/// Samples older than this, relative to the newest, are ignored.
const HORIZON_MS: i64 = 100;

/// A gap this long between samples means the pointer had stopped.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy, Default)]
struct Sample {
    time_ms: i64,
    value: f32,
}

/// One-axis velocity estimator over a ring buffer of absolute positions.
#[derive(Clone)]
pub struct VelocityTracker1D {
    samples: [Option<Sample>; HISTORY_SIZE],
    newest: usize,
}

impl Default for VelocityTracker1D {
    fn default() -> Self {
        Self::new()
    }
}

impl VelocityTracker1D {
    pub fn new() -> Self {
        Self {
            samples: [None; HISTORY_SIZE],
            newest: 0,
        }
    }

    pub fn add_data_point(&mut self, time_ms: i64, position: f32) {
        self.newest = (self.newest + 1) % HISTORY_SIZE;
        self.samples[self.newest] = Some(Sample {
            time_ms,
            value: position,
        });
    }

    /// Velocity in units per second, `0.0` with fewer than two usable samples.
    pub fn calculate_velocity(&self) -> f32 {
        let Some(newest) = self.samples[self.newest] else {
            return 0.0;
        };

        // Walk backwards from the newest sample, stopping at the horizon or
        // at the first gap that means the pointer was at rest.
        let mut positions = [0.0f32; HISTORY_SIZE];
        let mut ages = [0.0f32; HISTORY_SIZE];
        let mut count = 0;
        let mut index = self.newest;
        let mut later = newest;

        while let Some(sample) = self.samples[index] {
            let age = newest.time_ms - sample.time_ms;
            let gap = (later.time_ms - sample.time_ms).abs();
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }

            positions[count] = sample.value;
            ages[count] = -(age as f32);
            later = sample;
            count += 1;
            if count == HISTORY_SIZE {
                break;
            }
            index = (index + HISTORY_SIZE - 1) % HISTORY_SIZE;
        }

        if count < 2 {
            return 0.0;
        }

        impulse_velocity(&positions[..count], &ages[..count]) * 1000.0
    }

    /// Velocity in units per second, clamped to `±max_velocity`.
    pub fn calculate_velocity_with_max(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.calculate_velocity();
        if velocity == 0.0 || velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }

    pub fn reset(&mut self) {
        self.samples = [None; HISTORY_SIZE];
        self.newest = 0;
    }
}

/// `positions` and `times` run newest first; the result is in units per ms.
fn impulse_velocity(positions: &[f32], times: &[f32]) -> f32 {
    let oldest = positions.len() - 1;
    let mut work = 0.0f32;

    for i in (1..=oldest).rev() {
        let (t_from, t_to) = (times[i], times[i - 1]);
        if t_from == t_to {
            continue;
        }
        let v_curr = (positions[i - 1] - positions[i]) / (t_to - t_from);
        let v_prev = energy_to_velocity(work);
        work += (v_curr - v_prev) * v_curr.abs();
        if i == oldest {
            work *= 0.5;
        }
    }

    energy_to_velocity(work)
}

#[inline]
fn energy_to_velocity(energy: f32) -> f32 {
    energy.signum() * (2.0 * energy.abs()).sqrt()
}

/// Release-velocity source consumed by the nested scroll container.
///
/// One instance lives for exactly one gesture: it is created on the first
/// touch event and dropped on release or cancel.
pub trait VelocityTracking {
    fn add_movement(&mut self, event: &TouchEvent);

    /// Vertical velocity of `pointer` in px/sec, clamped to `±max_velocity`.
    fn y_velocity(&self, pointer: PointerId, max_velocity: f32) -> f32;

    fn clear(&mut self);
}

/// Default [`VelocityTracking`] with one vertical tracker per pointer.
#[derive(Default)]
pub struct PointerVelocityTracker {
    trackers: FxHashMap<PointerId, VelocityTracker1D>,
}

impl PointerVelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl VelocityTracking for PointerVelocityTracker {
    fn add_movement(&mut self, event: &TouchEvent) {
        if event.action == TouchAction::Down && !self.trackers.is_empty() {
            log::trace!("down, dropping {} pointer tracks", self.trackers.len());
            self.trackers.clear();
        }
        for sample in event.pointers() {
            self.trackers
                .entry(sample.id)
                .or_default()
                .add_data_point(event.time_ms, sample.position.y);
        }
    }

    fn y_velocity(&self, pointer: PointerId, max_velocity: f32) -> f32 {
        self.trackers
            .get(&pointer)
            .map(|tracker| tracker.calculate_velocity_with_max(max_velocity))
            .unwrap_or(0.0)
    }

    fn clear(&mut self) {
        self.trackers.clear();
    }
}
