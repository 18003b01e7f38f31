//! Back-to-front depth ordering.
//!
//! Overlapping translucent billboards only blend correctly when drawn from
//! farthest to nearest. The 3D billboard variant sorts every tick; the 2D
//! sprite variant uses order-independent additive blending and skips it.

use crate::particle::Particle;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Per-variant draw-order switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DepthSort {
    /// Farthest from the viewpoint first.
    #[default]
    BackToFront,
    /// Keep store order.
    Unsorted,
}

impl DepthSort {
    /// Reorder `particles` for drawing from `viewpoint`.
    pub fn apply(self, particles: &mut [Particle], viewpoint: Vec3) {
        if self == DepthSort::BackToFront {
            sort_back_to_front(particles, viewpoint);
        }
    }
}

/// Stable sort by descending squared distance from `viewpoint`.
///
/// Equal distances keep their relative order; NaN positions never panic.
pub fn sort_back_to_front(particles: &mut [Particle], viewpoint: Vec3) {
    particles.sort_by_cached_key(|p| {
        std::cmp::Reverse(DistanceKey(viewpoint.distance_squared(p.position)))
    });
}

#[derive(PartialEq)]
struct DistanceKey(f32);

impl Eq for DistanceKey {}

impl PartialOrd for DistanceKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DistanceKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
