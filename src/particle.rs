//! Particle state and the store that owns it.
//!
//! Every particle is a fixed-layout [`Particle`] stored contiguously in a
//! [`ParticleStore`]. The store is the single owner of particle state; each
//! pipeline stage borrows it mutably for the duration of its step.

use glam::Vec3;

/// A single simulated ember / flame billboard.
///
/// Spawn-time fields (`velocity`, `rotation`, `base_color`, `base_size`,
/// `max_life`) are set by the emitter. The derived visual fields (`color`,
/// `alpha`, `size`) are recomputed from the lifetime fraction every tick and
/// can only be read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Current position (2D simulations keep `z = 0`).
    pub position: Vec3,
    /// Current velocity. Only drag changes it after spawn.
    pub velocity: Vec3,
    /// Billboard texture rotation in radians, fixed at spawn.
    pub rotation: f32,
    pub(crate) base_color: Vec3,
    pub(crate) base_size: f32,
    pub(crate) life: f32,
    pub(crate) max_life: f32,
    pub(crate) color: Vec3,
    pub(crate) alpha: f32,
    pub(crate) size: f32,
}

impl Particle {
    /// Remaining lifetime in simulation time units.
    #[inline]
    pub fn life(&self) -> f32 {
        self.life
    }

    /// Lifetime assigned at spawn.
    #[inline]
    pub fn max_life(&self) -> f32 {
        self.max_life
    }

    /// Color chosen at spawn.
    #[inline]
    pub fn base_color(&self) -> Vec3 {
        self.base_color
    }

    /// Size chosen at spawn, before the lifecycle size scale.
    #[inline]
    pub fn base_size(&self) -> f32 {
        self.base_size
    }

    /// Current (faded) color.
    #[inline]
    pub fn color(&self) -> Vec3 {
        self.color
    }

    /// Current alpha.
    #[inline]
    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    /// Current rendered size.
    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Lifetime fraction: 0.0 at birth, 1.0 at death.
    #[inline]
    pub fn lifetime_fraction(&self) -> f32 {
        1.0 - self.life / self.max_life
    }

    /// Whether the particle still has lifetime left.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }
}

/// Owned, growable collection of live particles.
///
/// Order is only meaningful after a depth sort; removal preserves the order of
/// the survivors.
#[derive(Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
}

impl ParticleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store able to hold `capacity` particles without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            particles: Vec::with_capacity(capacity),
        }
    }

    /// Number of live particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether the store holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Append a fully initialized particle.
    #[inline]
    pub fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    /// Read-only view in current order.
    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view in current order.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Particles that existed before the newest `newborn` were appended.
    ///
    /// Returns the whole store if `newborn` exceeds its length.
    pub fn settled_mut(&mut self, newborn: usize) -> &mut [Particle] {
        let settled = self.particles.len().saturating_sub(newborn);
        &mut self.particles[..settled]
    }

    /// Iterate in current order.
    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    /// Remove every particle with no lifetime left, keeping survivor order.
    ///
    /// Returns the number of particles removed.
    pub fn remove_dead(&mut self) -> usize {
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        before - self.particles.len()
    }

    /// Drop all particles and release the backing allocation.
    pub fn release(&mut self) {
        self.particles = Vec::new();
    }
}

impl<'a> IntoIterator for &'a ParticleStore {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.particles.iter()
    }
}

#[cfg(test)]
pub(crate) fn test_particle(position: Vec3, life: f32, max_life: f32) -> Particle {
    Particle {
        position,
        velocity: Vec3::ZERO,
        rotation: 0.0,
        base_color: Vec3::ONE,
        base_size: 1.0,
        life,
        max_life,
        color: Vec3::ONE,
        alpha: 1.0,
        size: 1.0,
    }
}
