//! Simulation driver: lifecycle state machine and per-tick pipeline.
//!
//! ```text
//! Idle ──start()──▶ Running ──stop()──▶ Stopped
//!                     │  ▲
//!                     └──┘ advance(dt, viewpoint)
//! ```
//!
//! Each tick runs to completion before control returns to the host:
//!
//! 1. **Emit**: offer up to `rate_per_tick` new particles, capped by `max_particles`
//! 2. **Integrate**: age, fade, and move the particles that existed before this tick
//! 3. **Cull**: drop every particle whose life has run out
//! 4. **Sort**: back-to-front from the viewpoint, if the variant needs it
//! 5. **Publish**: rewrite the flat render buffers and mark them dirty
//!
//! Particles emitted in a tick are born at the end of its time window, so
//! they keep their full lifetime until the next tick ages them.

use crate::buffers::FrameBuffers;
use crate::config::ParticleSystemConfig;
use crate::error::SimulationError;
use crate::integrator::Integrator;
use crate::particle::{Particle, ParticleStore};
use crate::spawn::SpawnContext;
use glam::Vec3;

/// Driver state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationState {
    /// Constructed, no resources allocated yet.
    Idle,
    /// Accepting ticks.
    Running,
    /// Torn down. Terminal.
    Stopped,
}

/// Counters for the most recent tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks completed since start.
    pub tick: u64,
    /// Particles born this tick.
    pub spawned: usize,
    /// Particles removed this tick.
    pub expired: usize,
    /// Live particles after the tick.
    pub live: usize,
}

/// A running particle system.
///
/// # Example
///
/// ```ignore
/// let mut sim = Simulation::new(ParticleSystemConfig::flame_billboards())?;
/// sim.start()?;
/// loop {
///     let buffers = sim.advance(frame_ms, camera_position)?;
///     renderer.upload(buffers.position_bytes(), buffers.color_bytes());
/// }
/// ```
#[derive(Debug)]
pub struct Simulation {
    config: ParticleSystemConfig,
    integrator: Integrator,
    state: SimulationState,
    store: ParticleStore,
    buffers: FrameBuffers,
    rng: SpawnContext,
    stats: TickStats,
    saturated: bool,
}

impl Simulation {
    /// Validate `config` and create an idle simulation.
    pub fn new(config: ParticleSystemConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        log::debug!(
            "particle system configured: max {} particles, {} per tick, {:?}",
            config.emitter.max_particles,
            config.emitter.rate_per_tick,
            config.depth_sort
        );

        Ok(Self {
            integrator: config.integrator(),
            rng: SpawnContext::new(config.seed),
            config,
            state: SimulationState::Idle,
            store: ParticleStore::new(),
            buffers: FrameBuffers::new(),
            stats: TickStats::default(),
            saturated: false,
        })
    }

    /// Allocate the store and buffers and begin accepting ticks.
    ///
    /// A no-op when already running.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        match self.state {
            SimulationState::Running => Ok(()),
            SimulationState::Stopped => Err(SimulationError::Stopped),
            SimulationState::Idle => {
                let capacity = self.config.emitter.max_particles as usize;
                self.store = ParticleStore::with_capacity(capacity);
                self.buffers = FrameBuffers::with_capacity(capacity);
                self.state = SimulationState::Running;
                log::info!("particle simulation started (capacity {})", capacity);
                Ok(())
            }
        }
    }

    /// Run one tick and return the freshly published buffers.
    ///
    /// `dt` is in host units and is converted with the configured time
    /// scale. `viewpoint` is only used when depth sorting is enabled.
    pub fn advance(
        &mut self,
        dt: f32,
        viewpoint: Vec3,
    ) -> Result<&FrameBuffers, SimulationError> {
        match self.state {
            SimulationState::Idle => return Err(SimulationError::NotStarted),
            SimulationState::Stopped => return Err(SimulationError::Stopped),
            SimulationState::Running => {}
        }

        let spawned = self
            .config
            .emitter
            .emit(&mut self.store, &mut self.rng, &self.config.lifecycle);
        let expired = self
            .integrator
            .advance(&mut self.store, &self.config.lifecycle, dt, spawned);
        self.config
            .depth_sort
            .apply(self.store.as_mut_slice(), viewpoint);
        self.buffers.publish(self.store.as_slice());

        self.record(spawned, expired);
        Ok(&self.buffers)
    }

    fn record(&mut self, spawned: usize, expired: usize) {
        self.stats = TickStats {
            tick: self.stats.tick + 1,
            spawned,
            expired,
            live: self.store.len(),
        };
        log::trace!(
            "tick {}: +{} -{} = {} live",
            self.stats.tick,
            spawned,
            expired,
            self.stats.live
        );

        let saturated = self.store.len() >= self.config.emitter.max_particles as usize;
        if saturated != self.saturated {
            self.saturated = saturated;
            if saturated {
                log::debug!("population cap of {} reached", self.config.emitter.max_particles);
            } else {
                log::debug!("population dropped below cap ({} live)", self.store.len());
            }
        }
    }

    /// Release the store and buffers. Terminal and idempotent.
    pub fn stop(&mut self) {
        if self.state == SimulationState::Stopped {
            return;
        }
        self.store.release();
        self.buffers.release();
        self.state = SimulationState::Stopped;
        log::info!("particle simulation stopped after {} ticks", self.stats.tick);
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Number of live particles, for sizing the host's draw call.
    #[inline]
    pub fn live_count(&self) -> usize {
        self.store.len()
    }

    /// Buffers published by the last tick.
    #[inline]
    pub fn buffers(&self) -> &FrameBuffers {
        &self.buffers
    }

    /// Mutable buffers, for acknowledging uploads.
    #[inline]
    pub fn buffers_mut(&mut self) -> &mut FrameBuffers {
        &mut self.buffers
    }

    /// Live particles in draw order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        self.store.as_slice()
    }

    /// Configuration the simulation was built with.
    #[inline]
    pub fn config(&self) -> &ParticleSystemConfig {
        &self.config
    }

    /// Counters for the most recent tick.
    #[inline]
    pub fn stats(&self) -> TickStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn config() -> ParticleSystemConfig {
        ParticleSystemConfig::default()
            .with_max_particles(20)
            .with_rate_per_tick(4)
            .with_lifetime(1.0..1.0)
            .with_seed(3)
    }

    #[test]
    fn test_state_transitions() {
        let mut sim = Simulation::new(config()).unwrap();
        assert_eq!(sim.state(), SimulationState::Idle);

        sim.start().unwrap();
        assert_eq!(sim.state(), SimulationState::Running);
        sim.start().unwrap();
        assert_eq!(sim.state(), SimulationState::Running);

        sim.stop();
        assert_eq!(sim.state(), SimulationState::Stopped);
        sim.stop();
        assert!(matches!(sim.start(), Err(SimulationError::Stopped)));
    }

    #[test]
    fn test_advance_requires_running() {
        let mut sim = Simulation::new(config()).unwrap();
        assert!(matches!(
            sim.advance(0.1, Vec3::ZERO),
            Err(SimulationError::NotStarted)
        ));

        sim.start().unwrap();
        assert!(sim.advance(0.1, Vec3::ZERO).is_ok());

        sim.stop();
        assert!(matches!(
            sim.advance(0.1, Vec3::ZERO),
            Err(SimulationError::Stopped)
        ));
    }

    #[test]
    fn test_stop_releases_everything() {
        let mut sim = Simulation::new(config()).unwrap();
        sim.start().unwrap();
        sim.advance(0.1, Vec3::ZERO).unwrap();
        assert_eq!(sim.live_count(), 4);

        sim.stop();
        assert_eq!(sim.live_count(), 0);
        assert!(sim.buffers().is_empty());
        assert!(!sim.buffers().is_dirty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = Simulation::new(config().with_lifetime(2.0..1.0));
        assert!(matches!(
            result,
            Err(SimulationError::Config(ConfigError::InvalidLifetime { .. }))
        ));
    }

    #[test]
    fn test_stats_track_ticks() {
        let mut sim = Simulation::new(config()).unwrap();
        sim.start().unwrap();
        sim.advance(0.5, Vec3::ZERO).unwrap();
        sim.advance(0.5, Vec3::ZERO).unwrap();
        let stats = sim.stats();
        assert_eq!(stats.tick, 2);
        assert_eq!(stats.spawned, 4);
        assert_eq!(stats.expired, 0);
        assert_eq!(stats.live, 8);

        sim.advance(0.5, Vec3::ZERO).unwrap();
        assert_eq!(sim.stats().expired, 4);
    }

    #[test]
    fn test_zero_population_publishes_empty_buffers() {
        let mut sim = Simulation::new(config().with_max_particles(0)).unwrap();
        sim.start().unwrap();
        let buffers = sim.advance(1.0, Vec3::ZERO).unwrap();
        assert!(buffers.is_empty());
        assert!(buffers.is_dirty());
    }
}
