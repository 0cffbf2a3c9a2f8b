//! Bounded one-axis fling scroller.
//!
//! A [`DecayScroller`] follows the fling spline from a start position and
//! stops early when the curve would leave `[min, max]`. It is ticked with frame
//! timestamps; the first tick after [`DecayScroller::fling`] becomes time zero
//! so the first frame always reports the start position.

use crate::spline::{FlingCalculator, FlingInfo, FlingSpline};

struct ScrollerRun {
    start: i32,
    final_position: i32,
    min: i32,
    max: i32,
    info: FlingInfo,
    /// Duration after bound clamping, never longer than `info.duration_ms`.
    duration_ms: i64,
    start_frame_nanos: Option<u64>,
}

pub struct DecayScroller {
    calculator: FlingCalculator,
    run: Option<ScrollerRun>,
    current: i32,
    speed: f32,
    finished: bool,
}

impl DecayScroller {
    pub fn new(density: f32) -> Self {
        Self::with_calculator(FlingCalculator::with_density(density))
    }

    pub fn with_calculator(calculator: FlingCalculator) -> Self {
        Self {
            calculator,
            run: None,
            current: 0,
            speed: 0.0,
            finished: true,
        }
    }

    /// Starts a fling at `start` with a signed `velocity` in px/sec.
    ///
    /// Any running fling is replaced. A zero velocity, or a start outside the
    /// bounds, leaves the scroller finished at the (clamped) start.
    pub fn fling(&mut self, start: i32, velocity: f32, min: i32, max: i32) {
        self.run = None;
        self.speed = velocity.abs();
        self.current = start;

        if min > max {
            log::warn!("empty fling bounds [{min}, {max}]");
            self.speed = 0.0;
            self.finished = true;
            return;
        }

        if velocity == 0.0 || !velocity.is_finite() || start < min || start > max {
            if start < min || start > max {
                log::warn!("fling start {start} outside bounds [{min}, {max}]");
            }
            self.current = start.clamp(min, max);
            self.speed = 0.0;
            self.finished = true;
            return;
        }

        let info = self.calculator.fling_info(velocity);
        let travel = (info.distance * velocity.signum()).round() as i64;
        let unclamped_final = start as i64 + travel;
        let bounded_final = unclamped_final.clamp(min as i64, max as i64);

        let duration_ms = if bounded_final != unclamped_final && travel != 0 {
            let fraction = ((bounded_final - start as i64) as f32 / travel as f32).abs();
            (info.duration_ms as f32 * FlingSpline::time_for_distance(fraction)) as i64
        } else {
            info.duration_ms
        };

        log::trace!(
            "fling from {start} at {velocity} px/s, final {bounded_final} in {duration_ms}ms"
        );

        self.run = Some(ScrollerRun {
            start,
            final_position: bounded_final as i32,
            min,
            max,
            info,
            duration_ms,
            start_frame_nanos: None,
        });
        self.finished = false;
    }

    /// Advances to `frame_time_nanos`.
    ///
    /// Returns `true` while the scroller produced a position for this frame.
    /// The frame that reaches the end still returns `true` with the final
    /// position and zero speed; every later call returns `false`.
    pub fn compute_scroll_offset(&mut self, frame_time_nanos: u64) -> bool {
        if self.finished {
            return false;
        }
        let Some(run) = self.run.as_mut() else {
            self.finished = true;
            return false;
        };

        let start_nanos = *run.start_frame_nanos.get_or_insert(frame_time_nanos);
        let elapsed_ms = (frame_time_nanos.saturating_sub(start_nanos) / 1_000_000) as i64;

        if elapsed_ms < run.duration_ms {
            let offset = run.info.position(elapsed_ms).round() as i64;
            self.current =
                (run.start as i64 + offset).clamp(run.min as i64, run.max as i64) as i32;
            self.speed = run.info.speed(elapsed_ms);
        } else {
            self.current = run.final_position;
            self.speed = 0.0;
            self.finished = true;
        }
        true
    }

    /// Stops the fling where it is. The last computed speed stays readable.
    pub fn abort_animation(&mut self) {
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn curr_y(&self) -> i32 {
        self.current
    }

    /// Unsigned speed in px/sec at the last computed frame.
    pub fn curr_velocity(&self) -> f32 {
        self.speed
    }

    pub fn final_y(&self) -> Option<i32> {
        self.run.as_ref().map(|run| run.final_position)
    }
}
