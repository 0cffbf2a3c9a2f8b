//! Deceleration spline and fling calculator.
//!
//! The curve is the classic touch-scroller spline: a cubic bezier with an
//! inflection at 35% of the distance, sampled into two lookup tables. One maps
//! elapsed time to travelled distance, the other maps travelled distance back
//! to elapsed time so a fling can be cut short at a bound.

use std::sync::LazyLock;

const INFLECTION: f32 = 0.35;
const START_TENSION: f32 = 0.5;
const END_TENSION: f32 = 1.0;
const P1: f32 = START_TENSION * INFLECTION;
const P2: f32 = 1.0 - END_TENSION * (1.0 - INFLECTION);

const NB_SAMPLES: usize = 100;

struct SplineTables {
    /// Distance fraction indexed by time fraction.
    positions: [f32; NB_SAMPLES + 1],
    /// Time fraction indexed by distance fraction.
    times: [f32; NB_SAMPLES + 1],
}

/// Finds `t` in `[lo, 1]` with `curve(t) == alpha` and returns `(t, 3t(1-t))`.
///
/// `lo` only ever grows across calls because `alpha` is increasing.
fn solve_bezier(lo: &mut f32, alpha: f32, curve: impl Fn(f32, f32) -> f32) -> (f32, f32) {
    let mut hi = 1.0f32;
    loop {
        let mid = *lo + (hi - *lo) / 2.0;
        let coef = 3.0 * mid * (1.0 - mid);
        let value = curve(mid, coef);
        if (value - alpha).abs() < 1e-5 {
            return (mid, coef);
        }
        if value > alpha {
            hi = mid;
        } else {
            *lo = mid;
        }
    }
}

static TABLES: LazyLock<SplineTables> = LazyLock::new(|| {
    let mut positions = [0.0f32; NB_SAMPLES + 1];
    let mut times = [0.0f32; NB_SAMPLES + 1];
    let mut x_lo = 0.0f32;
    let mut y_lo = 0.0f32;

    for i in 0..NB_SAMPLES {
        let alpha = i as f32 / NB_SAMPLES as f32;

        let (x, coef) = solve_bezier(&mut x_lo, alpha, |t, c| {
            c * ((1.0 - t) * P1 + t * P2) + t * t * t
        });
        positions[i] = coef * ((1.0 - x) * START_TENSION + x) + x * x * x;

        let (y, coef) = solve_bezier(&mut y_lo, alpha, |t, c| {
            c * ((1.0 - t) * START_TENSION + t) + t * t * t
        });
        times[i] = coef * ((1.0 - y) * P1 + y * P2) + y * y * y;
    }

    positions[NB_SAMPLES] = 1.0;
    times[NB_SAMPLES] = 1.0;

    SplineTables { positions, times }
});

/// One sample of the spline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineSample {
    /// Fraction of the total distance travelled, `0.0..=1.0`.
    pub distance: f32,
    /// Slope of the distance curve at this point.
    pub velocity: f32,
}

/// Linear interpolation over a spline table at `fraction` in `[0, 1]`.
fn interpolate(table: &[f32; NB_SAMPLES + 1], fraction: f32) -> (f32, f32) {
    let fraction = fraction.clamp(0.0, 1.0);
    let index = (NB_SAMPLES as f32 * fraction) as usize;
    if index >= NB_SAMPLES {
        return (1.0, 0.0);
    }
    let x_inf = index as f32 / NB_SAMPLES as f32;
    let x_sup = (index + 1) as f32 / NB_SAMPLES as f32;
    let slope = (table[index + 1] - table[index]) / (x_sup - x_inf);
    (table[index] + (fraction - x_inf) * slope, slope)
}

pub struct FlingSpline;

impl FlingSpline {
    /// Samples the curve at a time fraction of the full fling.
    pub fn sample(time: f32) -> SplineSample {
        let (distance, velocity) = interpolate(&TABLES.positions, time);
        SplineSample { distance, velocity }
    }

    /// Time fraction at which `distance` (a fraction of the full fling) is reached.
    pub fn time_for_distance(distance: f32) -> f32 {
        interpolate(&TABLES.times, distance).0
    }

    fn deceleration(velocity: f32, friction: f32) -> f64 {
        (INFLECTION as f64 * velocity.abs() as f64 / friction as f64).ln()
    }
}

const GRAVITY_EARTH: f32 = 9.80665;
const INCHES_PER_METER: f32 = 39.37;
/// `ln(0.78) / ln(0.9)`
const DECELERATION_RATE: f32 = 2.358_201_6;

fn physical_coefficient(density: f32) -> f32 {
    GRAVITY_EARTH * INCHES_PER_METER * density * 160.0 * 0.84
}

/// Distance and duration of one fling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlingInfo {
    /// Signed release velocity in px/sec.
    pub initial_velocity: f32,
    /// Unsigned distance of the complete fling in px.
    pub distance: f32,
    /// Duration of the complete fling in milliseconds.
    pub duration_ms: i64,
}

impl FlingInfo {
    /// Signed offset from the start after `time_ms`.
    pub fn position(&self, time_ms: i64) -> f32 {
        self.distance * self.initial_velocity.signum() * self.sample(time_ms).distance
    }

    /// Unsigned speed in px/sec after `time_ms`.
    pub fn speed(&self, time_ms: i64) -> f32 {
        if self.duration_ms <= 0 {
            return 0.0;
        }
        self.sample(time_ms).velocity * self.distance / self.duration_ms as f32 * 1000.0
    }

    fn sample(&self, time_ms: i64) -> SplineSample {
        if self.duration_ms > 0 {
            FlingSpline::sample(time_ms as f32 / self.duration_ms as f32)
        } else {
            FlingSpline::sample(1.0)
        }
    }
}

/// Turns release velocities into fling distance and duration.
#[derive(Debug, Clone, Copy)]
pub struct FlingCalculator {
    friction: f32,
    physical_coefficient: f32,
}

impl FlingCalculator {
    /// Platform scroll friction.
    pub const DEFAULT_FRICTION: f32 = 0.015;

    /// `density` is the display scale, 1.0 at 160 dpi.
    pub fn new(friction: f32, density: f32) -> Self {
        Self {
            friction,
            physical_coefficient: physical_coefficient(density),
        }
    }

    pub fn with_density(density: f32) -> Self {
        Self::new(Self::DEFAULT_FRICTION, density)
    }

    fn spline_deceleration(&self, velocity: f32) -> f64 {
        FlingSpline::deceleration(velocity, self.friction * self.physical_coefficient)
    }

    pub fn fling_duration(&self, velocity: f32) -> i64 {
        if velocity == 0.0 {
            return 0;
        }
        let l = self.spline_deceleration(velocity);
        (1000.0 * (l / (DECELERATION_RATE as f64 - 1.0)).exp()) as i64
    }

    pub fn fling_distance(&self, velocity: f32) -> f32 {
        if velocity == 0.0 {
            return 0.0;
        }
        let l = self.spline_deceleration(velocity);
        let rate = DECELERATION_RATE as f64;
        self.friction * self.physical_coefficient * (rate / (rate - 1.0) * l).exp() as f32
    }

    pub fn fling_info(&self, velocity: f32) -> FlingInfo {
        FlingInfo {
            initial_velocity: velocity,
            distance: self.fling_distance(velocity),
            duration_ms: self.fling_duration(velocity),
        }
    }
}
