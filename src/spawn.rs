//! Spawn context for particle initialization.
//!
//! Wraps the emitter's RNG with the draws the emitter needs: uniform ranges,
//! box offsets, rotations, and a center-biased draw for flame footprints.

use crate::Vec3;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;
use std::ops::Range;

/// Retry cap for [`SpawnContext::center_biased`].
pub const MAX_BIASED_ATTEMPTS: u32 = 16;

/// Random source handed to the emitter for every spawned particle.
///
/// ```ignore
/// let mut ctx = SpawnContext::seeded(7);
/// let life = ctx.random_range(0.25..1.0);
/// let x = (ctx.center_biased() - 0.5) * 300.0;
/// ```
#[derive(Debug)]
pub struct SpawnContext {
    rng: SmallRng,
    /// Set once a biased draw has hit the retry cap.
    exhausted_biased: bool,
}

impl SpawnContext {
    /// Context with a fixed seed, reproducible across runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            exhausted_biased: false,
        }
    }

    /// Context seeded from the system clock, different each execution.
    pub fn from_clock() -> Self {
        let seed = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(42);
        Self::seeded(seed)
    }

    /// Seeded if a seed is given, clock-seeded otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_clock(),
        }
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 between `range.start` and `range.end`.
    ///
    /// An empty range (`start == end`) returns `start`.
    #[inline]
    pub fn random_range(&mut self, range: Range<f32>) -> f32 {
        range.start + self.random() * (range.end - range.start)
    }

    /// Random angle in `[0, 2π)`.
    #[inline]
    pub fn random_angle(&mut self) -> f32 {
        self.random() * TAU
    }

    /// Uniform offset within `±half_extents` on each axis.
    ///
    /// A zero half extent pins that axis to 0.
    pub fn random_in_box(&mut self, half_extents: Vec3) -> Vec3 {
        Vec3::new(
            (self.random() * 2.0 - 1.0) * half_extents.x,
            (self.random() * 2.0 - 1.0) * half_extents.y,
            (self.random() * 2.0 - 1.0) * half_extents.z,
        )
    }

    /// Uniform per-channel color between `min` and `max`.
    pub fn random_color(&mut self, min: Vec3, max: Vec3) -> Vec3 {
        Vec3::new(
            self.random_range(min.x..max.x),
            self.random_range(min.y..max.y),
            self.random_range(min.z..max.z),
        )
    }

    /// Normal draw (mean 0.5, σ 0.1) restricted to `[0, 1]`.
    ///
    /// Box-Muller with rejection resampling. After [`MAX_BIASED_ATTEMPTS`]
    /// rejected draws it returns the mean.
    pub fn center_biased(&mut self) -> f32 {
        for _ in 0..MAX_BIASED_ATTEMPTS {
            // (0, 1]: ln(u) stays finite.
            let u = 1.0 - self.random();
            let v = self.random();
            let normal = (-2.0 * u.ln()).sqrt() * (TAU * v).cos();
            let sample = normal / 10.0 + 0.5;
            if sample.is_finite() && (0.0..=1.0).contains(&sample) {
                return sample;
            }
        }

        if !self.exhausted_biased {
            self.exhausted_biased = true;
            log::warn!(
                "center-biased draw rejected {} times in a row, using the mean",
                MAX_BIASED_ATTEMPTS
            );
        }
        0.5
    }
}
