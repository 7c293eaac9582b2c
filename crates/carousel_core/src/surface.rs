//! Capabilities the host must provide for a scrollable carousel container.

use crate::{ContainerId, ListenerId, ScrollBehavior};
use serde::{Deserialize, Serialize};

/// Horizontal margins of a carousel item in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
}

impl Margins {
    pub fn new(left: f64, right: f64) -> Self {
        Self { left, right }
    }

    /// Both margins split evenly from a total.
    pub fn symmetric(total: f64) -> Self {
        Self::new(total / 2.0, total / 2.0)
    }

    /// Sum of left and right margins.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

/// Read-only layout metrics sampled from the rendered strip.
///
/// All items are assumed to share the same width and margins, so a single
/// sample describes the whole strip.
pub trait LayoutMetricsProvider {
    /// Rendered width of one item, or `None` if the container holds no item.
    fn item_width(&self) -> Option<f64>;

    /// Margins of the sampled item.
    fn item_margins(&self) -> Margins;

    /// Visible width of the scroll viewport.
    fn viewport_width(&self) -> f64;
}

/// A horizontally scrollable element hosting the clone-padded strip.
pub trait ScrollContainer: LayoutMetricsProvider {
    /// Identifier currently assigned to the element, if any.
    fn id(&self) -> Option<ContainerId>;

    fn set_id(&mut self, id: ContainerId);

    /// Current horizontal scroll offset.
    fn scroll_left(&self) -> f64;

    /// Write the scroll offset. Hosts may clamp to their scrollable range.
    fn set_scroll_left(&mut self, offset: f64);

    fn set_scroll_behavior(&mut self, behavior: ScrollBehavior);

    fn add_scroll_listener(&mut self, listener: ListenerId);

    fn remove_scroll_listener(&mut self, listener: ListenerId);
}
