//! Render-ready flat buffers.
//!
//! The renderer never sees particle structs. Each tick the simulation
//! rewrites four parallel attribute arrays, in draw order:
//!
//! | Buffer | Components per particle | Contents |
//! |--------|-------------------------|----------|
//! | `positions` | 3 | x, y, z |
//! | `sizes` | 1 | rendered size |
//! | `colors` | 4 | r, g, b, alpha |
//! | `rotations` | 1 | billboard rotation (radians) |
//!
//! The buffers are rebuilt from scratch every tick (population changes every
//! tick, so there is nothing to patch) and flagged dirty until the host
//! acknowledges the upload with [`FrameBuffers::mark_uploaded`].

use crate::particle::Particle;

/// Components per particle in the position buffer.
pub const POSITION_COMPONENTS: usize = 3;
/// Components per particle in the color buffer.
pub const COLOR_COMPONENTS: usize = 4;

/// Four parallel attribute buffers plus an upload flag.
#[derive(Debug, Default, Clone)]
pub struct FrameBuffers {
    positions: Vec<f32>,
    sizes: Vec<f32>,
    colors: Vec<f32>,
    rotations: Vec<f32>,
    dirty: bool,
}

impl FrameBuffers {
    /// Empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty buffers with room for `particles` particles.
    pub fn with_capacity(particles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(particles * POSITION_COMPONENTS),
            sizes: Vec::with_capacity(particles),
            colors: Vec::with_capacity(particles * COLOR_COMPONENTS),
            rotations: Vec::with_capacity(particles),
            dirty: false,
        }
    }

    /// Rewrite every buffer from `particles` and mark them dirty.
    pub fn publish(&mut self, particles: &[Particle]) {
        self.positions.clear();
        self.sizes.clear();
        self.colors.clear();
        self.rotations.clear();

        for p in particles {
            self.positions.extend_from_slice(&p.position.to_array());
            self.sizes.push(p.size);
            self.colors.extend_from_slice(&p.color.extend(p.alpha).to_array());
            self.rotations.push(p.rotation);
        }

        self.dirty = true;
    }

    /// Number of particles described by the buffers.
    #[inline]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether the buffers describe no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Positions, 3 floats per particle.
    #[inline]
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Sizes, 1 float per particle.
    #[inline]
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    /// Colors with alpha, 4 floats per particle.
    #[inline]
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Rotations, 1 float per particle.
    #[inline]
    pub fn rotations(&self) -> &[f32] {
        &self.rotations
    }

    /// Positions as raw bytes for GPU upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Sizes as raw bytes for GPU upload.
    pub fn size_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.sizes)
    }

    /// Colors as raw bytes for GPU upload.
    pub fn color_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Rotations as raw bytes for GPU upload.
    pub fn rotation_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.rotations)
    }

    /// Whether the buffers changed since the last [`mark_uploaded`](Self::mark_uploaded).
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Acknowledge that the host has uploaded the current contents.
    #[inline]
    pub fn mark_uploaded(&mut self) {
        self.dirty = false;
    }

    /// Drop all contents and release the allocations.
    pub fn release(&mut self) {
        *self = Self::default();
    }
}
