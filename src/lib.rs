//! # emberfx - Emissive Particle Effects
//!
//! A CPU particle simulation core for embers and flame billboards.
//!
//! emberfx owns particle spawning, aging, fading, and depth ordering, and
//! hands the host four flat attribute buffers per frame. Rendering (shaders,
//! textures, GPU resources) stays with the host, which only needs the
//! buffers and a live count to issue its draw call.
//!
//! ## Quick Start
//!
//! ```ignore
//! use emberfx::prelude::*;
//!
//! let mut sim = Simulation::new(ParticleSystemConfig::flame_billboards())?;
//! sim.start()?;
//!
//! let mut pacer = TickPacer::new(30.0);
//! loop {
//!     if let Some(dt_ms) = pacer.poll(host_clock_ms()) {
//!         let buffers = sim.advance(dt_ms as f32, camera_position)?;
//!         upload(buffers.position_bytes(), buffers.size_bytes(),
//!                buffers.color_bytes(), buffers.rotation_bytes());
//!     }
//! }
//! ```
//!
//! ## Tick Pipeline
//!
//! Every [`Simulation::advance`] runs, in order:
//!
//! | Step | Module | Effect |
//! |------|--------|--------|
//! | Emit | [`emitter`] | up to `rate_per_tick` new particles, never past `max_particles` |
//! | Integrate | [`integrator`] | age, fade ([`lifecycle`]), move, apply drag |
//! | Cull | [`particle`] | drop particles with no life left |
//! | Sort | [`sort`] | back-to-front from the viewpoint (3D variant) |
//! | Publish | [`buffers`] | rewrite position/size/color/rotation buffers |
//!
//! ## Variants
//!
//! | Preset | Blend | Sort | Time units |
//! |--------|-------|------|------------|
//! | [`ParticleSystemConfig::flame_billboards`] | additive | back-to-front | host ms / 10000 |
//! | [`ParticleSystemConfig::sprite_flames`] | additive | none | ticker frames |

pub mod buffers;
pub mod config;
pub mod emitter;
mod error;
pub mod integrator;
pub mod lifecycle;
pub mod particle;
mod simulation;
pub mod sort;
pub mod spawn;
pub mod time;
pub mod visuals;

pub use buffers::FrameBuffers;
pub use config::ParticleSystemConfig;
pub use emitter::{ColorRange, Emitter, Footprint, VelocityModel};
pub use error::{ConfigError, SimulationError};
pub use glam::Vec3;
pub use integrator::Integrator;
pub use lifecycle::{FadeCurve, Lifecycle};
pub use particle::{Particle, ParticleStore};
pub use simulation::{Simulation, SimulationState, TickStats};
pub use sort::DepthSort;
pub use spawn::SpawnContext;
pub use time::{TickPacer, Time};
pub use visuals::BlendMode;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use emberfx::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffers::FrameBuffers;
    pub use crate::config::ParticleSystemConfig;
    pub use crate::emitter::{ColorRange, Emitter, Footprint, VelocityModel};
    pub use crate::error::{ConfigError, SimulationError};
    pub use crate::lifecycle::{FadeCurve, Lifecycle};
    pub use crate::simulation::{Simulation, SimulationState, TickStats};
    pub use crate::sort::DepthSort;
    pub use crate::time::{TickPacer, Time};
    pub use crate::visuals::BlendMode;
    pub use crate::Vec3;
}
