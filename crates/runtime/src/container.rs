//! In-memory scroll container behaving like a browser scroll viewport.

use infiniscroll_core::{
    ContainerId, LayoutMetricsProvider, ListenerId, Margins, ScrollBehavior, ScrollContainer,
    CLONES_PER_SIDE, MIN_REAL_ITEMS,
};
use infiniscroll_trace::CarouselSpec;

/// A simulated horizontal strip of uniform items.
///
/// Offset writes are clamped to the scrollable range and, like a browser,
/// queue a scroll event whenever the offset actually changes.
#[derive(Debug, Clone)]
pub struct SimContainer {
    name: String,
    id: Option<ContainerId>,
    real_items: usize,
    item_count: usize,
    item_width: f64,
    margins: Margins,
    viewport_width: f64,
    scroll_left: f64,
    behavior: ScrollBehavior,
    listeners: Vec<ListenerId>,
    scroll_pending: bool,
}

impl SimContainer {
    pub fn from_spec(spec: &CarouselSpec) -> Self {
        // The host only renders clones when the loop can activate.
        let item_count = if spec.real_items >= MIN_REAL_ITEMS {
            spec.real_items + 2 * CLONES_PER_SIDE
        } else {
            spec.real_items
        };

        Self {
            name: spec.name.clone(),
            id: spec.preset_id.clone().map(ContainerId::new),
            real_items: spec.real_items,
            item_count,
            item_width: spec.item_width,
            margins: Margins::new(spec.margin_left, spec.margin_right),
            viewport_width: spec.viewport_width,
            scroll_left: 0.0,
            behavior: ScrollBehavior::Auto,
            listeners: Vec::new(),
            scroll_pending: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn real_items(&self) -> usize {
        self.real_items
    }

    pub fn behavior(&self) -> ScrollBehavior {
        self.behavior
    }

    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Largest reachable offset.
    pub fn max_scroll(&self) -> f64 {
        let content = self.item_count as f64 * (self.item_width + self.margins.horizontal());
        (content - self.viewport_width).max(0.0)
    }

    /// Consume the queued scroll event, if any.
    pub fn take_scroll_event(&mut self) -> bool {
        std::mem::take(&mut self.scroll_pending)
    }
}

impl LayoutMetricsProvider for SimContainer {
    fn item_width(&self) -> Option<f64> {
        (self.item_count > 0).then_some(self.item_width)
    }

    fn item_margins(&self) -> Margins {
        self.margins
    }

    fn viewport_width(&self) -> f64 {
        self.viewport_width
    }
}

impl ScrollContainer for SimContainer {
    fn id(&self) -> Option<ContainerId> {
        self.id.clone()
    }

    fn set_id(&mut self, id: ContainerId) {
        self.id = Some(id);
    }

    fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    fn set_scroll_left(&mut self, offset: f64) {
        let clamped = offset.clamp(0.0, self.max_scroll());
        if clamped != self.scroll_left {
            self.scroll_left = clamped;
            self.scroll_pending = true;
        }
    }

    fn set_scroll_behavior(&mut self, behavior: ScrollBehavior) {
        self.behavior = behavior;
    }

    fn add_scroll_listener(&mut self, listener: ListenerId) {
        if !self.listeners.contains(&listener) {
            self.listeners.push(listener);
        }
    }

    fn remove_scroll_listener(&mut self, listener: ListenerId) {
        self.listeners.retain(|&l| l != listener);
    }
}
