//! Particle emitters for per-tick spawning.
//!
//! The emitter offers up to `rate_per_tick` new particles every tick and
//! stops as soon as the population reaches `max_particles`, even in the
//! middle of a burst.
//!
//! # Spawn Models
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Footprint::Box`] | Uniform offset within a box around a center |
//! | [`Footprint::CenterBiased`] | Horizontal offset biased toward the center |
//! | [`VelocityModel::Fixed`] | Every particle drifts with the same velocity |
//! | [`VelocityModel::Vertical`] | Random vertical speed, no horizontal motion |
//!
//! # Example
//!
//! ```ignore
//! let emitter = Emitter {
//!     footprint: Footprint::Box {
//!         center: Vec3::new(0.0, -2.0, 0.0),
//!         half_extents: Vec3::new(0.5, 0.0, 0.5),
//!     },
//!     velocity: VelocityModel::Fixed(Vec3::new(0.0, 5.0, 0.0)),
//!     ..Emitter::default()
//! };
//! ```

use crate::error::ConfigError;
use crate::lifecycle::Lifecycle;
use crate::particle::{Particle, ParticleStore};
use crate::spawn::SpawnContext;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Where new particles appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    /// Uniform offset within `±half_extents` around `center`.
    Box {
        /// Footprint center.
        center: Vec3,
        /// Half size on each axis. Zero pins the axis to the center.
        half_extents: Vec3,
    },

    /// Horizontal offset `(biased - 0.5) * width` around `center`, where
    /// `biased` is a normal draw clustered on 0.5. `y` and `z` stay fixed.
    CenterBiased {
        /// Footprint center.
        center: Vec3,
        /// Full horizontal spread.
        width: f32,
    },
}

impl Default for Footprint {
    fn default() -> Self {
        Footprint::Box {
            center: Vec3::ZERO,
            half_extents: Vec3::ZERO,
        }
    }
}

impl Footprint {
    fn sample(&self, ctx: &mut SpawnContext) -> Vec3 {
        match self {
            Footprint::Box {
                center,
                half_extents,
            } => *center + ctx.random_in_box(*half_extents),
            Footprint::CenterBiased { center, width } => {
                *center + Vec3::new((ctx.center_biased() - 0.5) * width, 0.0, 0.0)
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let finite = match self {
            Footprint::Box {
                center,
                half_extents,
            } => center.is_finite() && half_extents.is_finite(),
            Footprint::CenterBiased { center, width } => center.is_finite() && width.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(ConfigError::NonFinite { field: "footprint" })
        }
    }
}

/// Initial velocity of new particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VelocityModel {
    /// Same velocity for every particle.
    Fixed(Vec3),
    /// `(0, uniform(speed), 0)`.
    Vertical {
        /// Vertical speed range.
        speed: Range<f32>,
    },
}

impl Default for VelocityModel {
    fn default() -> Self {
        VelocityModel::Fixed(Vec3::ZERO)
    }
}

impl VelocityModel {
    fn sample(&self, ctx: &mut SpawnContext) -> Vec3 {
        match self {
            VelocityModel::Fixed(v) => *v,
            VelocityModel::Vertical { speed } => {
                Vec3::new(0.0, ctx.random_range(speed.clone()), 0.0)
            }
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let finite = match self {
            VelocityModel::Fixed(v) => v.is_finite(),
            VelocityModel::Vertical { speed } => speed.start.is_finite() && speed.end.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(ConfigError::NonFinite { field: "velocity" })
        }
    }
}

/// Per-channel color range for spawn colors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorRange {
    /// Lower bound per channel.
    pub min: Vec3,
    /// Upper bound per channel.
    pub max: Vec3,
}

impl ColorRange {
    /// A single fixed color.
    pub fn solid(color: Vec3) -> Self {
        Self {
            min: color,
            max: color,
        }
    }
}

impl Default for ColorRange {
    fn default() -> Self {
        Self::solid(Vec3::ONE)
    }
}

/// Spawn configuration and the per-tick spawning step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    /// Hard population ceiling.
    pub max_particles: u32,
    /// Particles offered per tick.
    pub rate_per_tick: u32,
    /// Lifetime range in simulation time units.
    pub lifetime: Range<f32>,
    /// Spawn size range, before the lifecycle size scale.
    pub size_range: Range<f32>,
    /// Spawn color range.
    pub colors: ColorRange,
    /// Spawn position model.
    pub footprint: Footprint,
    /// Spawn velocity model.
    pub velocity: VelocityModel,
}

impl Default for Emitter {
    fn default() -> Self {
        Self {
            max_particles: 10_000,
            rate_per_tick: 100,
            lifetime: 1.0..1.0,
            size_range: 1.0..1.0,
            colors: ColorRange::default(),
            footprint: Footprint::default(),
            velocity: VelocityModel::default(),
        }
    }
}

impl Emitter {
    /// How many particles the next [`emit`](Self::emit) will create for a
    /// store holding `population` particles.
    #[inline]
    pub fn budget(&self, population: usize) -> usize {
        let headroom = (self.max_particles as usize).saturating_sub(population);
        headroom.min(self.rate_per_tick as usize)
    }

    /// Build one fully-initialized particle at birth (`t = 0`).
    pub fn spawn(&self, ctx: &mut SpawnContext, lifecycle: &Lifecycle) -> Particle {
        let life = ctx.random_range(self.lifetime.clone());
        let base_color = ctx.random_color(self.colors.min, self.colors.max);
        let base_size = ctx.random_range(self.size_range.clone());

        Particle {
            position: self.footprint.sample(ctx),
            velocity: self.velocity.sample(ctx),
            rotation: ctx.random_angle(),
            base_color,
            base_size,
            life,
            max_life: life,
            color: lifecycle.color_at(base_color, 0.0),
            alpha: lifecycle.alpha_at(0.0),
            size: lifecycle.size_at(base_size, 0.0),
        }
    }

    /// Append this tick's new particles to the store.
    ///
    /// Returns the number of particles born.
    pub fn emit(
        &self,
        store: &mut ParticleStore,
        ctx: &mut SpawnContext,
        lifecycle: &Lifecycle,
    ) -> usize {
        let count = self.budget(store.len());
        for _ in 0..count {
            store.push(self.spawn(ctx, lifecycle));
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitter(max_particles: u32, rate_per_tick: u32) -> Emitter {
        Emitter {
            max_particles,
            rate_per_tick,
            lifetime: 0.25..1.0,
            ..Emitter::default()
        }
    }

    #[test]
    fn test_emit_respects_rate() {
        let mut store = ParticleStore::new();
        let mut ctx = SpawnContext::seeded(1);
        let born = emitter(100, 7).emit(&mut store, &mut ctx, &Lifecycle::new());
        assert_eq!(born, 7);
        assert_eq!(store.len(), 7);
    }

    #[test]
    fn test_emit_stops_at_cap_mid_burst() {
        let mut store = ParticleStore::new();
        let mut ctx = SpawnContext::seeded(2);
        let e = emitter(5, 10);
        assert_eq!(e.emit(&mut store, &mut ctx, &Lifecycle::new()), 5);
        assert_eq!(e.emit(&mut store, &mut ctx, &Lifecycle::new()), 0);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_zero_cap_never_spawns() {
        let mut store = ParticleStore::new();
        let mut ctx = SpawnContext::seeded(3);
        assert_eq!(emitter(0, 10).emit(&mut store, &mut ctx, &Lifecycle::new()), 0);
    }

    #[test]
    fn test_spawned_particle_is_at_birth_values() {
        let mut ctx = SpawnContext::seeded(4);
        let lifecycle = Lifecycle::new().start_alpha(0.08).size_scale(500.0);
        let e = Emitter {
            size_range: 0.005..0.010,
            colors: ColorRange {
                min: Vec3::new(0.04, 0.08, 0.5),
                max: Vec3::new(0.04, 0.08, 1.0),
            },
            ..emitter(10, 10)
        };

        for _ in 0..100 {
            let p = e.spawn(&mut ctx, &lifecycle);
            assert_eq!(p.life(), p.max_life());
            assert!((0.25..1.0).contains(&p.max_life()));
            assert!((0.0..std::f32::consts::TAU).contains(&p.rotation));
            assert_eq!(p.alpha(), 0.08);
            assert_eq!(p.size(), p.base_size() * 500.0);
            assert_eq!(p.color(), p.base_color());
            assert!((0.04 - p.base_color().x).abs() < 1e-6);
            assert!((0.5..=1.0).contains(&p.base_color().z));
        }
    }

    #[test]
    fn test_box_footprint_pins_axis() {
        let mut ctx = SpawnContext::seeded(5);
        let footprint = Footprint::Box {
            center: Vec3::new(0.0, -2.0, 0.0),
            half_extents: Vec3::new(0.5, 0.0, 0.5),
        };
        for _ in 0..100 {
            let p = footprint.sample(&mut ctx);
            assert_eq!(p.y, -2.0);
            assert!(p.x.abs() <= 0.5 && p.z.abs() <= 0.5);
        }
    }

    #[test]
    fn test_center_biased_footprint_spread() {
        let mut ctx = SpawnContext::seeded(6);
        let footprint = Footprint::CenterBiased {
            center: Vec3::new(0.0, 200.0, 0.0),
            width: 300.0,
        };
        for _ in 0..500 {
            let p = footprint.sample(&mut ctx);
            assert_eq!(p.y, 200.0);
            assert!(p.x.abs() <= 150.0);
        }
    }

    #[test]
    fn test_non_finite_motion_rejected() {
        let footprint = Footprint::CenterBiased {
            center: Vec3::ZERO,
            width: f32::NAN,
        };
        assert!(matches!(
            footprint.validate(),
            Err(ConfigError::NonFinite { field: "footprint" })
        ));
        let footprint = Footprint::Box {
            center: Vec3::new(0.0, f32::INFINITY, 0.0),
            half_extents: Vec3::ONE,
        };
        assert!(footprint.validate().is_err());
        assert!(Footprint::default().validate().is_ok());

        let velocity = VelocityModel::Vertical {
            speed: f32::NEG_INFINITY..0.0,
        };
        assert!(matches!(
            velocity.validate(),
            Err(ConfigError::NonFinite { field: "velocity" })
        ));
        assert!(VelocityModel::Fixed(Vec3::NAN).validate().is_err());
        assert!(VelocityModel::default().validate().is_ok());
    }

    #[test]
    fn test_vertical_velocity_range() {
        let mut ctx = SpawnContext::seeded(7);
        let model = VelocityModel::Vertical { speed: -0.8..0.0 };
        for _ in 0..100 {
            let v = model.sample(&mut ctx);
            assert_eq!(v.x, 0.0);
            assert_eq!(v.z, 0.0);
            assert!(v.y > -0.8 - 1e-6 && v.y <= 0.0);
        }
    }
}
