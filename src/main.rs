//! Headless demo runner.
//!
//! ```text
//! emberfx [flame|sprite|<config.json>] [ticks]
//! ```
//!
//! Drives a simulation from a fixed-delta 120 Hz host clock, paced to 30
//! logical ticks per second, and logs population stats. Set `RUST_LOG=debug`
//! (or `trace` for per-tick counters) for more detail.

use emberfx::prelude::*;
use std::process::ExitCode;

const HOST_FRAME_MS: f64 = 1000.0 / 120.0;

fn load(source: &str) -> Result<(ParticleSystemConfig, f64), Box<dyn std::error::Error>> {
    match source {
        // Host deltas are milliseconds.
        "flame" => Ok((ParticleSystemConfig::flame_billboards(), 1.0)),
        // Host deltas are 60 Hz ticker frames.
        "sprite" => Ok((ParticleSystemConfig::sprite_flames(), 60.0 / 1000.0)),
        path => {
            let json = std::fs::read_to_string(path)?;
            Ok((ParticleSystemConfig::from_json(&json)?, 1.0))
        }
    }
}

fn run(source: &str, ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    let (config, units_per_ms) = load(source)?;
    let mut sim = Simulation::new(config)?;
    sim.start()?;

    let camera = Vec3::new(2.5, -2.5, 2.5);
    let mut time = Time::fixed(HOST_FRAME_MS);
    let mut pacer = TickPacer::default();
    pacer.poll(time.elapsed_ms());

    while sim.stats().tick < ticks {
        time.update();
        let Some(dt_ms) = pacer.poll(time.elapsed_ms()) else {
            continue;
        };

        let buffers = sim.advance((dt_ms * units_per_ms) as f32, camera)?;
        let uploaded = buffers.position_bytes().len()
            + buffers.size_bytes().len()
            + buffers.color_bytes().len()
            + buffers.rotation_bytes().len();
        sim.buffers_mut().mark_uploaded();

        let stats = sim.stats();
        if stats.tick % 30 == 0 {
            log::info!(
                "t={:.1}s frame {} tick {}: {} live (+{} -{}), {} bytes uploaded",
                time.elapsed_ms() / 1000.0,
                time.frame(),
                stats.tick,
                stats.live,
                stats.spawned,
                stats.expired,
                uploaded
            );
        }
    }

    sim.stop();
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let source = args.next().unwrap_or_else(|| "flame".to_string());
    let ticks = args.next().and_then(|s| s.parse().ok()).unwrap_or(300);

    match run(&source, ticks) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
