//! Rendering hints passed through to the host renderer.
//!
//! The simulation does not render. It only records which blend mode its
//! output was tuned for, which in turn decides whether draw order matters.

use crate::sort::DepthSort;
use serde::{Deserialize, Serialize};

/// How the renderer should blend particles into the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlendMode {
    /// Additive blending.
    ///
    /// Colors add up, so overlapping embers glow brighter. Order-independent.
    #[default]
    Additive,

    /// Standard alpha blending.
    ///
    /// Result depends on draw order; particles must be depth sorted.
    Alpha,
}

impl BlendMode {
    /// Whether the result depends on draw order.
    pub fn is_order_dependent(self) -> bool {
        matches!(self, BlendMode::Alpha)
    }

    /// The least depth ordering that draws this blend mode correctly.
    pub fn required_sort(self) -> DepthSort {
        if self.is_order_dependent() {
            DepthSort::BackToFront
        } else {
            DepthSort::Unsorted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_sort() {
        assert_eq!(BlendMode::Alpha.required_sort(), DepthSort::BackToFront);
        assert_eq!(BlendMode::Additive.required_sort(), DepthSort::Unsorted);
    }
}
