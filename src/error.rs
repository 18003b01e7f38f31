//! Error types for emberfx.
//!
//! Nothing inside a simulation tick can fail. Errors only come from
//! configuration (rejected when a [`Simulation`](crate::Simulation) is built)
//! and from driving a simulation outside its `Running` state.

use thiserror::Error;

/// Errors produced while validating or loading a
/// [`ParticleSystemConfig`](crate::ParticleSystemConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Lifetime range is empty, inverted, non-positive, or not finite.
    #[error("invalid lifetime range {min}..{max}: bounds must be finite with 0 < min <= max")]
    InvalidLifetime {
        /// Lower bound as configured.
        min: f32,
        /// Upper bound as configured.
        max: f32,
    },

    /// Size range is inverted, negative, or not finite.
    #[error("invalid size range {min}..{max}: bounds must be finite with 0 <= min <= max")]
    InvalidSizeRange {
        /// Lower bound as configured.
        min: f32,
        /// Upper bound as configured.
        max: f32,
    },

    /// Size scale must be finite and non-negative.
    #[error("invalid size scale {0}: must be finite and >= 0")]
    InvalidSizeScale(f32),

    /// A spawn position or velocity parameter is NaN or infinite.
    #[error("emitter {field} must be finite")]
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
    },

    /// A color channel has min > max or lies outside 0.0-1.0.
    #[error("invalid color range on channel {channel}: expected 0 <= min <= max <= 1")]
    InvalidColorRange {
        /// Channel index (0 = r, 1 = g, 2 = b).
        channel: usize,
    },

    /// Time scale must be finite and non-negative.
    #[error("invalid time scale {0}: must be finite and >= 0")]
    InvalidTimeScale(f32),

    /// Drag coefficient must be finite and non-negative.
    #[error("invalid drag coefficient {0}: must be finite and >= 0")]
    InvalidDrag(f32),

    /// Start alpha must lie in 0.0-1.0.
    #[error("invalid start alpha {0}: must be within 0..=1")]
    InvalidAlpha(f32),

    /// Fade curve keyframes are empty, unsorted, or have times or values outside 0.0-1.0.
    #[error("invalid fade curve: {0}")]
    InvalidCurve(&'static str),

    /// JSON could not be parsed into a configuration.
    #[error("failed to parse particle system config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur when driving a [`Simulation`](crate::Simulation).
#[derive(Debug, Error)]
pub enum SimulationError {
    /// `advance` was called before `start`.
    #[error("simulation has not been started; call start() first")]
    NotStarted,
    /// The simulation was stopped and accepts no further calls.
    #[error("simulation has been stopped")]
    Stopped,
    /// Configuration was rejected.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
