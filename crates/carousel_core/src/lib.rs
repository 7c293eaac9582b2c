//! Infiniscroll Core Engine
//!
//! Platform-agnostic engine behind an "infinite" horizontal carousel.
//!
//! The host renders a strip padded with clones:
//! - Two leading clones mirroring the last two real items
//! - The N real items
//! - Two trailing clones mirroring the first two real items
//!
//! The controller watches the scroll offset of that strip and, once scrolling
//! settles inside a clone region, shifts the offset by exactly `N * pitch` so the
//! user lands on the identical real item without any visible discontinuity.

mod controller;
mod geometry;
mod registry;
mod schedule;
mod surface;

pub use controller::{CarouselInstance, ControllerConfig, InfiniteScrollController, JumpState};
pub use geometry::{CarouselGeometry, JumpDirection};
pub use registry::CarouselRegistry;
pub use schedule::{DeferredAction, Scheduler, TimerToken};
pub use surface::{LayoutMetricsProvider, Margins, ScrollContainer};

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minimum number of real items for the loop to activate.
pub const MIN_REAL_ITEMS: usize = 3;

/// Number of clones rendered on each side of the real items.
pub const CLONES_PER_SIDE: usize = 2;

/// Reasons initialization did not activate the carousel.
///
/// Neither variant is surfaced by [`InfiniteScrollController::init_infinite_scroll`];
/// both degrade to a plain finite scroller.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InitError {
    #[error("carousel needs at least {min} real items, got {count}")]
    InsufficientItems { count: usize, min: usize },

    #[error("item pitch is {pitch}px; layout is not ready")]
    LayoutNotReady { pitch: f64 },
}

/// Stable identifier of a scroll container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(String);

impl ContainerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContainerId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Handle of a scroll listener attached to a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListenerId(pub u64);

/// Scroll animation mode of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    /// Offset writes take effect instantly.
    #[default]
    Auto,
    /// Offset changes are animated.
    Smooth,
}
