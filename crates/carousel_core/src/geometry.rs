//! Geometry of the clone-padded strip.
//!
//! Padded indices run `0..N+4`:
//!
//! ```text
//! [ clone(N-1), clone(N), real_1, ..., real_N, clone(1), clone(2) ]
//! [     0,          1,       2,   ...,  N+1,     N+2,      N+3    ]
//! ```
//!
//! An offset of `index * pitch + center_offset` centers item `index` in the viewport.

use crate::surface::LayoutMetricsProvider;
use crate::{InitError, CLONES_PER_SIDE, MIN_REAL_ITEMS};
use serde::{Deserialize, Serialize};

/// Side of the strip a jump relocates the user from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpDirection {
    /// Scrolled past the last real item into the trailing clones; offset decreases.
    Forward,
    /// Scrolled before the first real item into the leading clones; offset increases.
    Backward,
}

/// Derived measurements of one carousel, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarouselGeometry {
    /// Number of real (non-clone) items.
    pub real_items: usize,
    /// Content width of one item.
    pub item_width: f64,
    /// Item width plus horizontal margins.
    pub item_full_width: f64,
    /// Visible width of the viewport.
    pub container_width: f64,
    /// Added to an item's leading edge to center it in the viewport. May be negative.
    pub item_center_offset: f64,
    /// Offset that centers the first real item.
    pub initial_position: f64,
    /// Exactly `real_items * item_full_width`.
    pub jump_distance: f64,
    /// Midpoint between the last real item and the first trailing clone.
    pub trigger_point_forward: f64,
    /// Midpoint between the last leading clone and the first real item.
    pub trigger_point_backward: f64,
}

impl CarouselGeometry {
    /// Sample layout metrics and derive the geometry for `real_items` items.
    pub fn compute<M: LayoutMetricsProvider + ?Sized>(
        metrics: &M,
        real_items: usize,
    ) -> Result<Self, InitError> {
        if real_items < MIN_REAL_ITEMS {
            return Err(InitError::InsufficientItems {
                count: real_items,
                min: MIN_REAL_ITEMS,
            });
        }

        let item_width = metrics.item_width().unwrap_or(0.0);
        let margin = metrics.item_margins().horizontal();
        Self::from_metrics(item_width, margin, metrics.viewport_width(), real_items)
    }

    /// Derive the geometry from raw measurements.
    pub fn from_metrics(
        item_width: f64,
        margin: f64,
        container_width: f64,
        real_items: usize,
    ) -> Result<Self, InitError> {
        if real_items < MIN_REAL_ITEMS {
            return Err(InitError::InsufficientItems {
                count: real_items,
                min: MIN_REAL_ITEMS,
            });
        }

        let item_full_width = item_width + margin;
        if !item_full_width.is_finite() || item_full_width <= 0.0 {
            return Err(InitError::LayoutNotReady {
                pitch: item_full_width,
            });
        }

        let n = real_items as f64;
        let item_center_offset = item_width / 2.0 - container_width / 2.0;

        Ok(Self {
            real_items,
            item_width,
            item_full_width,
            container_width,
            item_center_offset,
            initial_position: CLONES_PER_SIDE as f64 * item_full_width + item_center_offset,
            jump_distance: n * item_full_width,
            trigger_point_forward: (n + 1.5) * item_full_width + item_center_offset,
            trigger_point_backward: 1.5 * item_full_width + item_center_offset,
        })
    }

    /// Total item count of the padded strip.
    pub fn total_items(&self) -> usize {
        self.real_items + 2 * CLONES_PER_SIDE
    }

    /// Offset that centers the item at padded `index`.
    pub fn item_offset(&self, index: usize) -> f64 {
        index as f64 * self.item_full_width + self.item_center_offset
    }

    /// Decide whether `offset` needs a jump and where it lands.
    ///
    /// Offsets exactly on a trigger point stay put.
    pub fn normalize(&self, offset: f64) -> Option<(JumpDirection, f64)> {
        if offset > self.trigger_point_forward {
            Some((JumpDirection::Forward, offset - self.jump_distance))
        } else if offset < self.trigger_point_backward {
            Some((JumpDirection::Backward, offset + self.jump_distance))
        } else {
            None
        }
    }
}
