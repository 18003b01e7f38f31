//! Particle system configuration.
//!
//! A [`ParticleSystemConfig`] bundles everything a [`Simulation`](crate::Simulation)
//! needs at construction: the emitter, the lifecycle fades, the integrator
//! time scale and drag, and the draw-order switch. Configurations are
//! validated once, when the simulation is built, never during a tick.
//!
//! # Presets
//!
//! | Preset | Variant |
//! |--------|---------|
//! | [`ParticleSystemConfig::flame_billboards`] | 3D shader billboards, sorted back-to-front |
//! | [`ParticleSystemConfig::sprite_flames`] | 2D additive sprites, unsorted |
//!
//! # Example
//!
//! ```ignore
//! let config = ParticleSystemConfig::flame_billboards()
//!     .with_max_particles(5_000)
//!     .with_seed(7);
//! let json = config.to_json()?;
//! let restored = ParticleSystemConfig::from_json(&json)?;
//! ```

use crate::emitter::{ColorRange, Emitter, Footprint, VelocityModel};
use crate::error::ConfigError;
use crate::integrator::Integrator;
use crate::lifecycle::Lifecycle;
use crate::sort::DepthSort;
use crate::visuals::BlendMode;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Complete construction-time configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleSystemConfig {
    /// Spawn limits and initial particle state.
    pub emitter: Emitter,
    /// Alpha, size, and color fades.
    #[serde(default)]
    pub lifecycle: Lifecycle,
    /// Host-to-simulation time factor (`dt_sim = dt * time_scale`).
    pub time_scale: f32,
    /// Drag coefficient (0 disables).
    #[serde(default)]
    pub drag: f32,
    /// Draw-order switch.
    #[serde(default)]
    pub depth_sort: DepthSort,
    /// Blend mode the renderer should use.
    #[serde(default)]
    pub blend_mode: BlendMode,
    /// RNG seed; `None` seeds from the clock.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for ParticleSystemConfig {
    fn default() -> Self {
        Self {
            emitter: Emitter::default(),
            lifecycle: Lifecycle::default(),
            time_scale: 1.0,
            drag: 0.0,
            depth_sort: DepthSort::default(),
            blend_mode: BlendMode::default(),
            seed: None,
        }
    }
}

impl ParticleSystemConfig {
    /// Blue flame billboards rising from a square footprint (3D variant).
    ///
    /// Host deltas are milliseconds; lifetimes are in units of 10 seconds.
    pub fn flame_billboards() -> Self {
        Self {
            emitter: Emitter {
                max_particles: 25_000,
                rate_per_tick: 300,
                lifetime: 0.25..1.0,
                size_range: 0.005..0.010,
                colors: ColorRange {
                    min: Vec3::new(0.04, 0.08, 0.5),
                    max: Vec3::new(0.04, 0.08, 1.0),
                },
                footprint: Footprint::Box {
                    center: Vec3::new(0.0, -2.0, 0.0),
                    half_extents: Vec3::new(0.5, 0.0, 0.5),
                },
                velocity: VelocityModel::Fixed(Vec3::new(0.0, 5.0, 0.0)),
            },
            lifecycle: Lifecycle::new().start_alpha(0.08).size_scale(500.0),
            time_scale: 1.0 / 10_000.0,
            drag: 0.1,
            depth_sort: DepthSort::BackToFront,
            blend_mode: BlendMode::Additive,
            seed: None,
        }
    }

    /// Flame sprites drifting up the screen from a centered strip (2D variant).
    ///
    /// Host deltas are ticker frames; lifetimes are in frames.
    pub fn sprite_flames() -> Self {
        Self {
            emitter: Emitter {
                max_particles: 15_000,
                rate_per_tick: 3_000,
                lifetime: 100.0..200.0,
                size_range: 0.1..0.1,
                colors: ColorRange::solid(Vec3::ONE),
                footprint: Footprint::CenterBiased {
                    center: Vec3::new(0.0, 200.0, 0.0),
                    width: 300.0,
                },
                velocity: VelocityModel::Vertical { speed: -0.8..0.0 },
            },
            lifecycle: Lifecycle::new().start_alpha(0.03).size_scale(1.0),
            time_scale: 1.0,
            drag: 0.0,
            depth_sort: DepthSort::Unsorted,
            blend_mode: BlendMode::Additive,
            seed: None,
        }
    }

    /// Set the population ceiling.
    pub fn with_max_particles(mut self, max_particles: u32) -> Self {
        self.emitter.max_particles = max_particles;
        self
    }

    /// Set particles offered per tick.
    pub fn with_rate_per_tick(mut self, rate: u32) -> Self {
        self.emitter.rate_per_tick = rate;
        self
    }

    /// Set the lifetime range (simulation units).
    pub fn with_lifetime(mut self, lifetime: Range<f32>) -> Self {
        self.emitter.lifetime = lifetime;
        self
    }

    /// Set the spawn size range.
    pub fn with_size_range(mut self, size_range: Range<f32>) -> Self {
        self.emitter.size_range = size_range;
        self
    }

    /// Set the spawn color range.
    pub fn with_colors(mut self, colors: ColorRange) -> Self {
        self.emitter.colors = colors;
        self
    }

    /// Set the spawn position model.
    pub fn with_footprint(mut self, footprint: Footprint) -> Self {
        self.emitter.footprint = footprint;
        self
    }

    /// Set the spawn velocity model.
    pub fn with_velocity(mut self, velocity: VelocityModel) -> Self {
        self.emitter.velocity = velocity;
        self
    }

    /// Set the lifecycle fades.
    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    /// Set the host-to-simulation time factor.
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }

    /// Set the drag coefficient.
    pub fn with_drag(mut self, drag: f32) -> Self {
        self.drag = drag;
        self
    }

    /// Set the draw-order switch.
    pub fn with_depth_sort(mut self, depth_sort: DepthSort) -> Self {
        self.depth_sort = depth_sort;
        self
    }

    /// Set the blend mode hint.
    pub fn with_blend_mode(mut self, blend_mode: BlendMode) -> Self {
        self.blend_mode = blend_mode;
        self
    }

    /// Fix the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The integrator described by this configuration.
    pub fn integrator(&self) -> Integrator {
        Integrator::new(self.time_scale, self.drag)
    }

    /// Check every bound. Called by [`Simulation::new`](crate::Simulation::new).
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Range { start, end } = self.emitter.lifetime;
        if !start.is_finite() || !end.is_finite() || start <= 0.0 || start > end {
            return Err(ConfigError::InvalidLifetime { min: start, max: end });
        }

        let Range { start, end } = self.emitter.size_range;
        if !start.is_finite() || !end.is_finite() || start < 0.0 || start > end {
            return Err(ConfigError::InvalidSizeRange { min: start, max: end });
        }

        let ColorRange { min, max } = self.emitter.colors;
        for channel in 0..3 {
            let (lo, hi) = (min[channel], max[channel]);
            if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
                return Err(ConfigError::InvalidColorRange { channel });
            }
        }

        self.emitter.footprint.validate()?;
        self.emitter.velocity.validate()?;

        if !self.time_scale.is_finite() || self.time_scale < 0.0 {
            return Err(ConfigError::InvalidTimeScale(self.time_scale));
        }
        if !self.drag.is_finite() || self.drag < 0.0 {
            return Err(ConfigError::InvalidDrag(self.drag));
        }

        self.lifecycle.validate()?;

        if self.depth_sort == DepthSort::Unsorted
            && self.blend_mode.required_sort() == DepthSort::BackToFront
        {
            log::warn!(
                "{:?} blending is order dependent but depth sorting is disabled",
                self.blend_mode
            );
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
