//! Visual fading over a particle's lifetime.
//!
//! Every particle is driven by its lifetime fraction `t` (0.0 at birth,
//! 1.0 at death). The [`Lifecycle`] turns `t` into the three derived visual
//! attributes:
//!
//! | Attribute | Formula |
//! |-----------|---------|
//! | alpha | `start_alpha * alpha_curve(t)` |
//! | size | `(1 - t) * base_size * size_scale` |
//! | color | `base_color * (1 - t)` |
//!
//! Color darkens toward black instead of only turning transparent, so dying
//! embers dim the way glowing material does under additive blending.
//!
//! # Example
//!
//! ```ignore
//! let lifecycle = Lifecycle::new()
//!     .start_alpha(0.08)
//!     .size_scale(500.0)
//!     .alpha_curve(FadeCurve::Linear);
//! ```

use crate::error::ConfigError;
use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shape of the alpha fade over the lifetime fraction.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum FadeCurve {
    /// `1 - t`: full opacity at birth, fully transparent at death.
    #[default]
    Linear,
    /// Alpha never fades.
    Constant,
    /// Piecewise-linear curve through `(t, value)` keys, sorted by `t`.
    ///
    /// Values before the first key and after the last are held flat.
    Keyframes(Vec<(f32, f32)>),
}

impl FadeCurve {
    /// The ramp-hold-fade envelope `(0, 0) (0.1, 1) (0.6, 1) (1, 0)`.
    pub fn flicker_envelope() -> Self {
        FadeCurve::Keyframes(vec![(0.0, 0.0), (0.1, 1.0), (0.6, 1.0), (1.0, 0.0)])
    }

    /// Evaluate the curve at lifetime fraction `t`.
    pub fn sample(&self, t: f32) -> f32 {
        match self {
            FadeCurve::Linear => 1.0 - t,
            FadeCurve::Constant => 1.0,
            FadeCurve::Keyframes(keys) => sample_keys(keys, t),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let FadeCurve::Keyframes(keys) = self else {
            return Ok(());
        };
        if keys.is_empty() {
            return Err(ConfigError::InvalidCurve("at least one keyframe is required"));
        }
        if keys.iter().any(|&(t, _)| !(0.0..=1.0).contains(&t)) {
            return Err(ConfigError::InvalidCurve("keyframe times must be within 0..=1"));
        }
        if keys.iter().any(|&(_, v)| !(0.0..=1.0).contains(&v)) {
            return Err(ConfigError::InvalidCurve("keyframe values must be within 0..=1"));
        }
        if keys.windows(2).any(|w| w[0].0 > w[1].0) {
            return Err(ConfigError::InvalidCurve("keyframes must be sorted by time"));
        }
        Ok(())
    }
}

fn sample_keys(keys: &[(f32, f32)], t: f32) -> f32 {
    let Some(&(first_t, first_v)) = keys.first() else {
        return 0.0;
    };
    if t <= first_t {
        return first_v;
    }
    for pair in keys.windows(2) {
        let (t0, v0) = pair[0];
        let (t1, v1) = pair[1];
        if t <= t1 {
            let span = t1 - t0;
            if span <= f32::EPSILON {
                return v1;
            }
            return v0 + (v1 - v0) * (t - t0) / span;
        }
    }
    keys[keys.len() - 1].1
}

/// Lifecycle configuration: how alpha, size, and color evolve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Alpha at birth.
    pub start_alpha: f32,
    /// Multiplier from spawn size to rendered size.
    pub size_scale: f32,
    /// Alpha fade shape.
    #[serde(default)]
    pub alpha_curve: FadeCurve,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self {
            start_alpha: 1.0,
            size_scale: 1.0,
            alpha_curve: FadeCurve::Linear,
        }
    }
}

impl Lifecycle {
    /// Create a lifecycle with full start alpha, unit size scale, linear fade.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set alpha at birth.
    pub fn start_alpha(mut self, alpha: f32) -> Self {
        self.start_alpha = alpha;
        self
    }

    /// Set the spawn-size multiplier.
    pub fn size_scale(mut self, scale: f32) -> Self {
        self.size_scale = scale;
        self
    }

    /// Set the alpha fade shape.
    pub fn alpha_curve(mut self, curve: FadeCurve) -> Self {
        self.alpha_curve = curve;
        self
    }

    /// Alpha at lifetime fraction `t`.
    #[inline]
    pub fn alpha_at(&self, t: f32) -> f32 {
        self.start_alpha * self.alpha_curve.sample(t)
    }

    /// Rendered size at lifetime fraction `t`.
    #[inline]
    pub fn size_at(&self, base_size: f32, t: f32) -> f32 {
        (1.0 - t) * base_size * self.size_scale
    }

    /// Faded color at lifetime fraction `t`.
    #[inline]
    pub fn color_at(&self, base_color: Vec3, t: f32) -> Vec3 {
        base_color * (1.0 - t)
    }

    /// Recompute a particle's derived visual fields from its current life.
    pub(crate) fn apply(&self, particle: &mut Particle) {
        let t = particle.lifetime_fraction();
        particle.alpha = self.alpha_at(t);
        particle.size = self.size_at(particle.base_size, t);
        particle.color = self.color_at(particle.base_color, t);
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.start_alpha) {
            return Err(ConfigError::InvalidAlpha(self.start_alpha));
        }
        if !self.size_scale.is_finite() || self.size_scale < 0.0 {
            return Err(ConfigError::InvalidSizeScale(self.size_scale));
        }
        self.alpha_curve.validate()
    }
}
