//! Host-side timing helpers.
//!
//! The simulation itself never reads a clock: the host passes `dt` into
//! [`Simulation::advance`](crate::Simulation::advance). These helpers cover the
//! two jobs a host loop usually needs:
//!
//! - [`Time`]: a frame clock reporting millisecond deltas, elapsed time, frame
//!   count, and FPS, with pause, time scale, and a fixed-delta mode.
//! - [`TickPacer`]: caps logical updates to a fixed rate (30 Hz by default)
//!   while rendering may run faster.
//!
//! # Example
//!
//! ```ignore
//! let mut time = Time::new();
//! let mut pacer = TickPacer::new(30.0);
//!
//! loop {
//!     time.update();
//!     if let Some(dt_ms) = pacer.poll(time.elapsed_ms()) {
//!         sim.advance(dt_ms as f32, camera)?;
//!     }
//!     renderer.draw(sim.buffers());
//! }
//! ```

use std::time::{Duration, Instant};

/// Default logical update rate.
pub const DEFAULT_TICK_RATE: f64 = 30.0;

/// Frame clock for a host loop.
///
/// Elapsed time is the running sum of frame deltas, so it only moves forward
/// and honors pause, time scale, and fixed delta the same way `delta_ms` does.
#[derive(Debug)]
pub struct Time {
    /// When the last frame occurred (or the clock last resumed).
    last_frame: Instant,
    /// Accumulated scaled time in milliseconds.
    elapsed_ms: f64,
    /// Time since last frame in milliseconds, after scaling.
    delta_ms: f64,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    /// Whether time is paused.
    paused: bool,
    /// Fixed frame delta in milliseconds, replacing wall-clock deltas.
    fixed_delta_ms: Option<f64>,
    /// Multiplier applied to every delta (1.0 = normal speed).
    time_scale: f64,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            elapsed_ms: 0.0,
            delta_ms: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta_ms: None,
            time_scale: 1.0,
        }
    }

    /// Clock that advances by `delta_ms` per [`update`](Self::update),
    /// whatever the wall clock does. Handy for headless and replayed runs.
    pub fn fixed(delta_ms: f64) -> Self {
        let mut time = Self::new();
        time.set_fixed_delta(Some(delta_ms));
        time
    }

    /// Update timing values. Call once per rendered frame.
    ///
    /// Returns the delta in milliseconds.
    pub fn update(&mut self) -> f64 {
        let now = Instant::now();

        if self.paused {
            self.delta_ms = 0.0;
            return self.delta_ms;
        }

        self.delta_ms = self.scaled_since(now);
        self.elapsed_ms += self.delta_ms;
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_ms
    }

    fn scaled_since(&self, now: Instant) -> f64 {
        let raw = now.duration_since(self.last_frame).as_secs_f64() * 1000.0;
        self.fixed_delta_ms.unwrap_or(raw) * self.time_scale
    }

    /// Scaled milliseconds accumulated up to the last update, or up to the
    /// pause while paused.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    /// Milliseconds between the last two frames, after scaling.
    #[inline]
    pub fn delta_ms(&self) -> f64 {
        self.delta_ms
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Fixed frame delta, if one is set.
    #[inline]
    pub fn fixed_delta_ms(&self) -> Option<f64> {
        self.fixed_delta_ms
    }

    /// Pause time progression. While paused, `update()` reports a zero delta
    /// and `elapsed_ms()` holds still.
    ///
    /// Wall time run since the last update is banked first, so elapsed time
    /// never falls behind what it would have read at the pause.
    pub fn pause(&mut self) {
        if self.paused {
            return;
        }
        let now = Instant::now();
        if self.fixed_delta_ms.is_none() {
            self.elapsed_ms += self.scaled_since(now);
        }
        self.last_frame = now;
        self.paused = true;
    }

    /// Resume time progression after pausing. The paused span is skipped.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Use a fixed frame delta in milliseconds, or `None` for wall-clock
    /// deltas. Non-finite or negative deltas are ignored.
    pub fn set_fixed_delta(&mut self, delta_ms: Option<f64>) {
        match delta_ms {
            Some(d) if !d.is_finite() || d < 0.0 => {
                log::warn!("ignoring invalid fixed delta {} ms", d);
            }
            _ => self.fixed_delta_ms = delta_ms,
        }
    }

    /// Set the time scale multiplier. Negative scales clamp to zero.
    pub fn set_time_scale(&mut self, scale: f64) {
        self.time_scale = if scale.is_finite() { scale.max(0.0) } else { 1.0 };
    }

    /// Reset counters to zero and restart from now.
    ///
    /// Time scale and fixed delta are kept.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_frame = now;
        self.elapsed_ms = 0.0;
        self.delta_ms = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
        self.paused = false;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Throttles logical ticks to a fixed rate.
///
/// Feed it the host clock in milliseconds every frame. It yields a delta
/// whenever more than one interval has passed since the last tick, and
/// otherwise carries the remainder so the cadence does not drift.
#[derive(Debug, Clone, Copy)]
pub struct TickPacer {
    interval_ms: f64,
    reference_ms: Option<f64>,
}

impl TickPacer {
    /// Pacer for `rate` ticks per second.
    ///
    /// A non-positive or non-finite rate falls back to [`DEFAULT_TICK_RATE`].
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            DEFAULT_TICK_RATE
        };
        Self {
            interval_ms: 1000.0 / rate,
            reference_ms: None,
        }
    }

    /// Milliseconds between ticks.
    #[inline]
    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Poll the pacer at host time `now_ms`.
    ///
    /// The first poll only establishes the reference time.
    pub fn poll(&mut self, now_ms: f64) -> Option<f64> {
        let Some(reference) = self.reference_ms else {
            self.reference_ms = Some(now_ms);
            return None;
        };

        let delta = now_ms - reference;
        if delta > self.interval_ms {
            self.reference_ms = Some(now_ms);
            return Some(delta);
        }
        self.reference_ms = Some(now_ms - delta.rem_euclid(self.interval_ms));
        None
    }

    /// Forget the reference time.
    pub fn reset(&mut self) {
        self.reference_ms = None;
    }
}

impl Default for TickPacer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE)
    }
}
