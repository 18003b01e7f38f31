//! Per-tick aging, fading, and motion.

use crate::lifecycle::Lifecycle;
use crate::particle::{Particle, ParticleStore};
use glam::Vec3;

/// Advances particle state by one host time step.
///
/// `time_scale` converts the host's delta into simulation units
/// (`dt_sim = dt * time_scale`); lifetimes, velocities, and drag are all in
/// simulation units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    /// Host-to-simulation time conversion factor.
    pub time_scale: f32,
    /// Drag coefficient. 0 disables drag.
    pub drag: f32,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            drag: 0.0,
        }
    }
}

impl Integrator {
    /// Create an integrator.
    pub fn new(time_scale: f32, drag: f32) -> Self {
        Self { time_scale, drag }
    }

    /// Convert a host delta into simulation time.
    #[inline]
    pub fn normalize(&self, dt: f32) -> f32 {
        dt * self.time_scale
    }

    /// Age, fade, and move every particle in `particles` by host delta `dt`.
    pub fn integrate(&self, particles: &mut [Particle], lifecycle: &Lifecycle, dt: f32) {
        let dt = self.normalize(dt);
        for particle in particles {
            self.step(particle, lifecycle, dt);
        }
    }

    fn step(&self, p: &mut Particle, lifecycle: &Lifecycle, dt: f32) {
        debug_assert!(
            p.max_life > 0.0 && p.life <= p.max_life,
            "emitter produced an invalid particle: life {} / max_life {}",
            p.life,
            p.max_life
        );

        p.life = (p.life - dt).max(0.0);
        lifecycle.apply(p);

        let displacement = p.velocity * dt;
        p.position += displacement;
        p.velocity -= clamped_drag(p.velocity, displacement * self.drag);
    }

    /// Integrate then cull: the `life <= 0` particles are gone on return.
    ///
    /// Only the first `len - newborn` particles are integrated; the newest
    /// `newborn` were spawned this tick and start aging on the next one.
    /// Returns the number of particles removed.
    pub fn advance(
        &self,
        store: &mut ParticleStore,
        lifecycle: &Lifecycle,
        dt: f32,
        newborn: usize,
    ) -> usize {
        self.integrate(store.settled_mut(newborn), lifecycle, dt);
        store.remove_dead()
    }
}

/// Clamp each axis of `drag` to the magnitude of `velocity` on that axis,
/// keeping the sign of `velocity`.
fn clamped_drag(velocity: Vec3, drag: Vec3) -> Vec3 {
    let clamp = |v: f32, d: f32| v.signum() * d.abs().min(v.abs());
    Vec3::new(
        clamp(velocity.x, drag.x),
        clamp(velocity.y, drag.y),
        clamp(velocity.z, drag.z),
    )
}
