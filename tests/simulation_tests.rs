//! End-to-end tests driving a `Simulation` through whole ticks.

use emberfx::prelude::*;
use std::collections::HashMap;

fn fixed_lifetime(max: u32, rate: u32, lifetime: f32) -> ParticleSystemConfig {
    ParticleSystemConfig::default()
        .with_max_particles(max)
        .with_rate_per_tick(rate)
        .with_lifetime(lifetime..lifetime)
        .with_depth_sort(DepthSort::Unsorted)
        .with_seed(17)
}

fn running(config: ParticleSystemConfig) -> Simulation {
    let mut sim = Simulation::new(config).unwrap();
    sim.start().unwrap();
    sim
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_cap_then_full_expiry() {
    let mut sim = running(fixed_lifetime(5, 10, 1.0));

    sim.advance(1.0, Vec3::ZERO).unwrap();
    assert_eq!(sim.live_count(), 5);

    sim.advance(1.0, Vec3::ZERO).unwrap();
    assert_eq!(sim.live_count(), 0);
    assert!(sim.buffers().is_empty());
}

#[test]
fn test_rate_limited_growth() {
    let mut sim = running(fixed_lifetime(100, 1, 1.0));
    for _ in 0..50 {
        sim.advance(1e-6, Vec3::ZERO).unwrap();
    }
    assert_eq!(sim.live_count(), 50);
}

#[test]
fn test_cap_holds_under_pressure() {
    let mut sim = running(fixed_lifetime(50, 1_000, 10.0));
    for _ in 0..20 {
        sim.advance(0.1, Vec3::ZERO).unwrap();
        assert!(sim.live_count() <= 50);
    }
    assert_eq!(sim.live_count(), 50);
}

// ============================================================================
// Invariants over real runs
// ============================================================================

#[test]
fn test_buffers_match_live_population() {
    let config = ParticleSystemConfig::flame_billboards()
        .with_max_particles(2_000)
        .with_seed(5);
    let mut sim = running(config);

    for _ in 0..120 {
        let n = {
            let buffers = sim.advance(33.0, Vec3::new(2.5, -2.5, 2.5)).unwrap();
            assert_eq!(buffers.positions().len(), 3 * buffers.len());
            assert_eq!(buffers.sizes().len(), buffers.len());
            assert_eq!(buffers.colors().len(), 4 * buffers.len());
            assert_eq!(buffers.rotations().len(), buffers.len());
            assert!(buffers.is_dirty());
            buffers.len()
        };
        assert_eq!(n, sim.live_count());
    }
}

#[test]
fn test_no_expired_particle_is_published() {
    let config = ParticleSystemConfig::default()
        .with_max_particles(500)
        .with_rate_per_tick(40)
        .with_lifetime(0.1..0.6)
        .with_seed(8);
    let mut sim = running(config);

    for _ in 0..60 {
        sim.advance(0.07, Vec3::ZERO).unwrap();
        assert!(sim.particles().iter().all(|p| p.life() > 0.0));
        assert!(sim.particles().iter().all(|p| p.life() <= p.max_life()));
    }
}

#[test]
fn test_life_is_monotonic_per_particle() {
    let config = fixed_lifetime(300, 25, 1.0).with_lifetime(0.3..1.0);
    let mut sim = running(config);

    // Rotation is drawn per particle and works as an identity here.
    let mut previous: HashMap<u32, f32> = HashMap::new();
    for _ in 0..40 {
        sim.advance(0.05, Vec3::ZERO).unwrap();
        let current: HashMap<u32, f32> = sim
            .particles()
            .iter()
            .map(|p| (p.rotation.to_bits(), p.life()))
            .collect();
        for (id, life) in &current {
            if let Some(before) = previous.get(id) {
                assert!(life <= before, "life grew from {} to {}", before, life);
            }
        }
        previous = current;
    }
}

#[test]
fn test_flame_buffers_are_back_to_front() {
    let camera = Vec3::new(2.5, -2.5, 2.5);
    let config = ParticleSystemConfig::flame_billboards()
        .with_max_particles(3_000)
        .with_seed(21);
    let mut sim = running(config);

    for _ in 0..30 {
        let buffers = sim.advance(33.0, camera).unwrap();
        let distances: Vec<f32> = buffers
            .positions()
            .chunks_exact(3)
            .map(|p| camera.distance_squared(Vec3::new(p[0], p[1], p[2])))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] >= w[1]));
    }
}

#[test]
fn test_embers_darken_as_they_age() {
    let config =
        fixed_lifetime(1, 1, 1.0).with_colors(ColorRange::solid(Vec3::new(0.2, 0.4, 0.8)));
    let mut sim = running(config);

    sim.advance(0.0, Vec3::ZERO).unwrap();
    let birth = sim.particles()[0];
    assert_eq!(birth.color(), Vec3::new(0.2, 0.4, 0.8));

    sim.advance(0.5, Vec3::ZERO).unwrap();
    let aged = sim.particles()[0];
    assert!((aged.color() - Vec3::new(0.1, 0.2, 0.4)).length() < 1e-6);
    assert!((aged.alpha() - 0.5).abs() < 1e-6);
    assert!((aged.size() - 0.5).abs() < 1e-6);
}

#[test]
fn test_sprite_flames_rise_without_sorting() {
    let config = ParticleSystemConfig::sprite_flames()
        .with_max_particles(200)
        .with_rate_per_tick(50)
        .with_seed(2);
    let mut sim = running(config);

    sim.advance(1.0, Vec3::ZERO).unwrap();
    sim.advance(1.0, Vec3::ZERO).unwrap();

    for p in sim.particles() {
        assert!(p.position.y <= 200.0);
        assert!(p.position.x.abs() <= 150.0);
        assert_eq!(p.position.z, 0.0);
        assert!((p.alpha() - 0.03).abs() < 0.001);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let run = || {
        let mut sim = running(ParticleSystemConfig::flame_billboards().with_seed(99));
        for _ in 0..10 {
            sim.advance(33.0, Vec3::new(2.5, -2.5, 2.5)).unwrap();
        }
        sim.buffers().positions().to_vec()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_json_config_drives_simulation() {
    let json = ParticleSystemConfig::sprite_flames()
        .with_seed(4)
        .to_json()
        .unwrap();
    let config = ParticleSystemConfig::from_json(&json).unwrap();
    let mut sim = running(config);
    sim.advance(1.0, Vec3::ZERO).unwrap();
    assert_eq!(sim.live_count(), 3_000);
}

// ============================================================================
// Host clock
// ============================================================================

#[test]
fn test_fixed_clock_paces_ticks() {
    let mut sim = running(fixed_lifetime(10_000, 1, 1.0e6));
    let mut time = Time::fixed(1000.0 / 120.0);
    let mut pacer = TickPacer::default();
    pacer.poll(time.elapsed_ms());

    // One simulated second of 120 Hz frames.
    for _ in 0..120 {
        time.update();
        if let Some(dt_ms) = pacer.poll(time.elapsed_ms()) {
            assert!(dt_ms > pacer.interval_ms());
            sim.advance(dt_ms as f32, Vec3::ZERO).unwrap();
        }
    }

    assert_eq!(time.frame(), 120);
    let ticks = sim.stats().tick;
    assert!((20..=30).contains(&ticks), "ticked {} times", ticks);
    assert_eq!(sim.live_count() as u64, ticks);
}

#[test]
fn test_paused_clock_holds_simulation() {
    let mut sim = running(fixed_lifetime(10_000, 1, 1.0e6));
    let mut time = Time::fixed(1000.0 / 120.0);
    let mut pacer = TickPacer::default();
    pacer.poll(time.elapsed_ms());

    for _ in 0..60 {
        time.update();
        if let Some(dt_ms) = pacer.poll(time.elapsed_ms()) {
            sim.advance(dt_ms as f32, Vec3::ZERO).unwrap();
        }
    }
    let ticks_before = sim.stats().tick;

    time.pause();
    for _ in 0..60 {
        time.update();
        assert!(pacer.poll(time.elapsed_ms()).is_none());
    }
    assert_eq!(sim.stats().tick, ticks_before);

    time.resume();
    for _ in 0..60 {
        time.update();
        if let Some(dt_ms) = pacer.poll(time.elapsed_ms()) {
            sim.advance(dt_ms as f32, Vec3::ZERO).unwrap();
        }
    }
    assert!(sim.stats().tick > ticks_before);
}
