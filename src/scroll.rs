//! Time-driven scroll animation.
//!
//! [`ScrollAnimation`] is a pure state machine: it owns no clock and no
//! framebuffer. The caller feeds it a millisecond timestamp on every
//! [`tick`](ScrollAnimation::tick) and receives the pixel delta to apply
//! to the frame since the previous tick. Keeping it side-effect free lets
//! the chain orchestrator own the frame exclusively and lets tests drive
//! the animation with a synthetic clock.
//!
//! Progress is eased with the smoothstep curve `t²(3 − 2t)`, so motion
//! accelerates from rest and decelerates into the endpoint instead of
//! jumping at constant speed.

/// Scroll direction across the extended frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Content moves toward negative x.
    Left,
    /// Content moves toward positive x.
    Right,
    /// Content moves toward negative y.
    Up,
    /// Content moves toward positive y.
    Down,
}

impl Direction {
    /// Unit step `(dx, dy)` for one pixel of travel in this direction.
    #[must_use]
    pub const fn step(self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }
}

/// Outcome of one animation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Tick {
    /// No animation is running.
    Idle,
    /// Apply this shift to the frame; the animation continues.
    Shift {
        /// Horizontal delta since the previous tick.
        dx: i32,
        /// Vertical delta since the previous tick.
        dy: i32,
    },
    /// Apply this final shift; the animation has landed on its endpoint.
    Finished {
        /// Horizontal delta since the previous tick.
        dx: i32,
        /// Vertical delta since the previous tick.
        dy: i32,
    },
}

#[derive(Debug, Clone, Copy)]
struct Active {
    total_x: i32,
    total_y: i32,
    applied_x: i32,
    applied_y: i32,
    start_ms: u32,
    duration_ms: u32,
}

/// One in-flight scroll between two frame positions.
#[derive(Debug, Default)]
pub struct ScrollAnimation {
    active: Option<Active>,
}

impl ScrollAnimation {
    /// Create an idle animation.
    #[must_use]
    pub const fn new() -> Self {
        Self { active: None }
    }

    /// Begin a scroll at `now_ms`, completing `duration_ms` later.
    ///
    /// The travel distance is `pixels`, or, when `pixels` is zero, the
    /// span between the start and end coordinates along the scroll axis
    /// (`x` for [`Direction::Left`]/[`Direction::Right`], `y` otherwise).
    /// The direction supplies the sign.
    ///
    /// Returns `false` without disturbing the current animation if one is
    /// already running; a scroll is never preempted mid-flight.
    #[allow(clippy::too_many_arguments)]
    pub fn start(
        &mut self,
        direction: Direction,
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
        duration_ms: u32,
        pixels: u32,
        now_ms: u32,
    ) -> bool {
        if self.active.is_some() {
            return false;
        }
        let span = if pixels != 0 {
            pixels as i32
        } else {
            match direction {
                Direction::Left | Direction::Right => (end_x - start_x).abs(),
                Direction::Up | Direction::Down => (end_y - start_y).abs(),
            }
        };
        let (sx, sy) = direction.step();
        self.active = Some(Active {
            total_x: sx * span,
            total_y: sy * span,
            applied_x: 0,
            applied_y: 0,
            start_ms: now_ms,
            duration_ms,
        });
        true
    }

    /// Whether a scroll is currently running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Advance the animation to `now_ms`.
    ///
    /// Timestamps use wrapping `u32` milliseconds, so a rollover mid-scroll
    /// still yields the correct elapsed time. The returned delta is the
    /// shift to apply now; on [`Tick::Finished`] the cumulative shifts
    /// across all ticks sum exactly to the requested travel.
    pub fn tick(&mut self, now_ms: u32) -> Tick {
        let Some(mut active) = self.active else {
            return Tick::Idle;
        };
        let elapsed = now_ms.wrapping_sub(active.start_ms);
        if elapsed >= active.duration_ms {
            self.active = None;
            return Tick::Finished {
                dx: active.total_x - active.applied_x,
                dy: active.total_y - active.applied_y,
            };
        }
        let t = elapsed as f32 / active.duration_ms as f32;
        let eased = t * t * (3.0 - 2.0 * t);
        let target_x = round_travel(eased, active.total_x);
        let target_y = round_travel(eased, active.total_y);
        let dx = target_x - active.applied_x;
        let dy = target_y - active.applied_y;
        active.applied_x = target_x;
        active.applied_y = target_y;
        self.active = Some(active);
        Tick::Shift { dx, dy }
    }
}

fn round_travel(eased: f32, total: i32) -> i32 {
    let exact = eased * total as f32;
    if exact >= 0.0 {
        (exact + 0.5) as i32
    } else {
        (exact - 0.5) as i32
    }
}
