//! Jump detection and repositioning for infinite carousels.
//!
//! Every raw scroll event restarts a debounce timer. When the timer fires the
//! offset is compared against the trigger points and, if the user has settled
//! inside a clone region, shifted by exactly one jump distance with animation
//! disabled. Animation is re-armed after a short cool-down; scroll events seen
//! while jumping are dropped so the correction cannot feed back into itself.

use crate::geometry::{CarouselGeometry, JumpDirection};
use crate::registry::CarouselRegistry;
use crate::schedule::{DeferredAction, Scheduler, TimerToken};
use crate::surface::ScrollContainer;
use crate::{ContainerId, InitError, ListenerId, ScrollBehavior, MIN_REAL_ITEMS};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info, trace};

/// Default quiet period before a jump evaluation.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(50);

/// Default time between an offset correction and re-arming smooth scrolling.
pub const DEFAULT_JUMP_COOLDOWN: Duration = Duration::from_millis(50);

/// Default delay between the instant initial positioning and smooth scrolling.
pub const DEFAULT_SMOOTH_ENABLE_DELAY: Duration = Duration::from_millis(50);

/// Tunable timing of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Quiet period after the last scroll event before evaluating a jump.
    pub debounce: Duration,
    /// Cool-down after a jump before smooth scrolling returns and jumping ends.
    pub jump_cooldown: Duration,
    /// Delay after initialization before smooth scrolling is enabled.
    pub smooth_enable_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            jump_cooldown: DEFAULT_JUMP_COOLDOWN,
            smooth_enable_delay: DEFAULT_SMOOTH_ENABLE_DELAY,
        }
    }
}

/// Jump state machine of one carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpState {
    /// Waiting for scrolling to settle.
    #[default]
    Idle,
    /// Offset corrected; waiting for the cool-down to end.
    Jumping,
}

/// Live record of one initialized carousel.
#[derive(Debug, Clone)]
pub struct CarouselInstance {
    /// Identifier of the container this instance drives.
    pub id: ContainerId,
    /// Geometry computed at initialization.
    pub geometry: CarouselGeometry,
    /// Listener attached to the container for this instance.
    pub listener: ListenerId,
    pub state: JumpState,
    /// Pending debounced jump evaluation.
    pub scroll_timer: Option<TimerToken>,
    /// Pending smooth-scroll re-arm (after init or after a jump).
    pub settle_timer: Option<TimerToken>,
    /// Number of jump evaluations performed.
    pub evaluations: u64,
    pub forward_jumps: u64,
    pub backward_jumps: u64,
}

impl CarouselInstance {
    pub fn new(id: ContainerId, geometry: CarouselGeometry, listener: ListenerId) -> Self {
        Self {
            id,
            geometry,
            listener,
            state: JumpState::Idle,
            scroll_timer: None,
            settle_timer: None,
            evaluations: 0,
            forward_jumps: 0,
            backward_jumps: 0,
        }
    }

    pub fn is_jumping(&self) -> bool {
        self.state == JumpState::Jumping
    }

    /// Total jumps in either direction.
    pub fn jumps(&self) -> u64 {
        self.forward_jumps + self.backward_jumps
    }

    fn cancel_timers<S: Scheduler + ?Sized>(&mut self, scheduler: &mut S) {
        if let Some(token) = self.scroll_timer.take() {
            scheduler.cancel(token);
        }
        if let Some(token) = self.settle_timer.take() {
            scheduler.cancel(token);
        }
    }
}

/// Drives every infinite carousel registered with it.
#[derive(Debug, Default)]
pub struct InfiniteScrollController {
    config: ControllerConfig,
    registry: CarouselRegistry,
    next_listener: u64,
}

impl InfiniteScrollController {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            registry: CarouselRegistry::new(),
            next_listener: 0,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn registry(&self) -> &CarouselRegistry {
        &self.registry
    }

    pub fn instance(&self, id: &ContainerId) -> Option<&CarouselInstance> {
        self.registry.get(id)
    }

    /// Activate the infinite loop on `container`.
    ///
    /// Never fails towards the caller: too few items is a silent no-op and an
    /// unmeasurable layout is logged. In both cases the container is left as a
    /// plain finite scroller and `None` is returned.
    pub fn init_infinite_scroll<C, S>(
        &mut self,
        container: &mut C,
        real_items: usize,
        scheduler: &mut S,
    ) -> Option<ContainerId>
    where
        C: ScrollContainer + ?Sized,
        S: Scheduler + ?Sized,
    {
        match self.try_init(container, real_items, scheduler) {
            Ok(id) => Some(id),
            Err(InitError::InsufficientItems { count, .. }) => {
                debug!("Infinite scroll not activated: {} real items", count);
                None
            }
            Err(e) => {
                error!("Infinite scroll initialization failed: {}", e);
                None
            }
        }
    }

    /// Same as [`init_infinite_scroll`](Self::init_infinite_scroll) but reports why
    /// activation did not happen.
    ///
    /// Too few items returns before anything is touched. Otherwise any previous
    /// registration for the container is dropped first, so a layout that can no
    /// longer be measured leaves it deactivated rather than running on stale
    /// geometry.
    pub fn try_init<C, S>(
        &mut self,
        container: &mut C,
        real_items: usize,
        scheduler: &mut S,
    ) -> Result<ContainerId, InitError>
    where
        C: ScrollContainer + ?Sized,
        S: Scheduler + ?Sized,
    {
        if real_items < MIN_REAL_ITEMS {
            return Err(InitError::InsufficientItems {
                count: real_items,
                min: MIN_REAL_ITEMS,
            });
        }

        let id = match container.id() {
            Some(id) => id,
            None => {
                let id = self.registry.generate_id();
                container.set_id(id.clone());
                id
            }
        };

        if let Some(mut previous) = self.registry.remove(&id) {
            container.remove_scroll_listener(previous.listener);
            previous.cancel_timers(scheduler);
            debug!("Dropped previous registration of {}", id);
        }

        let geometry = CarouselGeometry::compute(&*container, real_items)?;

        debug!(
            "Carousel {}: {} real items, pitch {:.2}px, initial {:.2}px, jump {:.2}px, \
             triggers {:.2}px / {:.2}px",
            id,
            geometry.real_items,
            geometry.item_full_width,
            geometry.initial_position,
            geometry.jump_distance,
            geometry.trigger_point_backward,
            geometry.trigger_point_forward,
        );

        container.set_scroll_behavior(ScrollBehavior::Auto);
        container.set_scroll_left(geometry.initial_position);

        self.next_listener += 1;
        let listener = ListenerId(self.next_listener);
        let mut instance = CarouselInstance::new(id.clone(), geometry, listener);
        instance.settle_timer = Some(scheduler.schedule(
            self.config.smooth_enable_delay,
            DeferredAction::EnableSmoothScroll { id: id.clone() },
        ));

        container.add_scroll_listener(listener);
        self.registry.insert(instance);

        info!("Infinite scroll active on {}", id);
        Ok(id)
    }

    /// React to a raw scroll event delivered to `listener`.
    ///
    /// Restarts the debounce timer and returns `true`, unless the instance is
    /// jumping, unknown, or the listener has been superseded.
    pub fn handle_scroll<S: Scheduler + ?Sized>(
        &mut self,
        id: &ContainerId,
        listener: ListenerId,
        scheduler: &mut S,
    ) -> bool {
        let Some(instance) = self.registry.get_mut(id) else {
            return false;
        };
        if instance.listener != listener {
            trace!("Ignoring scroll from stale listener {:?} on {}", listener, id);
            return false;
        }
        if instance.is_jumping() {
            return false;
        }

        if let Some(token) = instance.scroll_timer.take() {
            scheduler.cancel(token);
        }
        instance.scroll_timer = Some(scheduler.schedule(
            self.config.debounce,
            DeferredAction::EvaluateJump { id: id.clone() },
        ));
        true
    }

    /// Run a fired deferred action.
    ///
    /// Actions whose token is no longer the instance's current one are stale
    /// and ignored. Returns the jump performed, if any.
    pub fn handle_deferred<C, S>(
        &mut self,
        token: TimerToken,
        action: &DeferredAction,
        container: &mut C,
        scheduler: &mut S,
    ) -> Option<JumpDirection>
    where
        C: ScrollContainer + ?Sized,
        S: Scheduler + ?Sized,
    {
        let id = action.container_id();
        let instance = self.registry.get_mut(id)?;

        match action {
            DeferredAction::EvaluateJump { .. } => {
                if instance.scroll_timer != Some(token) {
                    trace!("Dropping stale jump evaluation for {}", id);
                    return None;
                }
                instance.scroll_timer = None;
                let id = id.clone();
                self.handle_infinite_jump(&id, container, scheduler)
            }
            DeferredAction::EnableSmoothScroll { .. } => {
                if instance.settle_timer != Some(token) {
                    return None;
                }
                instance.settle_timer = None;
                container.set_scroll_behavior(ScrollBehavior::Smooth);
                None
            }
            DeferredAction::FinishJump { .. } => {
                if instance.settle_timer != Some(token) {
                    return None;
                }
                instance.settle_timer = None;
                container.set_scroll_behavior(ScrollBehavior::Smooth);
                instance.state = JumpState::Idle;
                None
            }
        }
    }

    /// Check the current offset against the trigger points and jump if needed.
    ///
    /// At most one jump per call; nothing happens while already jumping.
    pub fn handle_infinite_jump<C, S>(
        &mut self,
        id: &ContainerId,
        container: &mut C,
        scheduler: &mut S,
    ) -> Option<JumpDirection>
    where
        C: ScrollContainer + ?Sized,
        S: Scheduler + ?Sized,
    {
        let instance = self.registry.get_mut(id)?;
        if instance.is_jumping() {
            return None;
        }
        instance.evaluations += 1;

        let offset = container.scroll_left();
        let (direction, target) = instance.geometry.normalize(offset)?;

        instance.state = JumpState::Jumping;
        container.set_scroll_behavior(ScrollBehavior::Auto);
        container.set_scroll_left(target);

        match direction {
            JumpDirection::Forward => instance.forward_jumps += 1,
            JumpDirection::Backward => instance.backward_jumps += 1,
        }

        if let Some(token) = instance.settle_timer.take() {
            scheduler.cancel(token);
        }
        instance.settle_timer = Some(scheduler.schedule(
            self.config.jump_cooldown,
            DeferredAction::FinishJump { id: id.clone() },
        ));

        debug!(
            "Carousel {} jumped {:?}: {:.2}px -> {:.2}px",
            id, direction, offset, target
        );
        Some(direction)
    }

    /// Detach `id` from its container and drop its record.
    pub fn teardown<C, S>(&mut self, id: &ContainerId, container: &mut C, scheduler: &mut S) -> bool
    where
        C: ScrollContainer + ?Sized,
        S: Scheduler + ?Sized,
    {
        let Some(mut instance) = self.registry.remove(id) else {
            return false;
        };
        container.remove_scroll_listener(instance.listener);
        instance.cancel_timers(scheduler);
        info!("Infinite scroll removed from {}", id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LayoutMetricsProvider, Margins};

    #[derive(Debug, Default)]
    struct FakeContainer {
        id: Option<ContainerId>,
        item_width: Option<f64>,
        margins: Margins,
        viewport: f64,
        scroll_left: f64,
        behavior: ScrollBehavior,
        listeners: Vec<ListenerId>,
    }

    impl FakeContainer {
        /// Scenario container: 200px items, 20px margins, 600px viewport.
        fn scenario() -> Self {
            Self {
                item_width: Some(200.0),
                margins: Margins::symmetric(20.0),
                viewport: 600.0,
                ..Default::default()
            }
        }
    }

    impl LayoutMetricsProvider for FakeContainer {
        fn item_width(&self) -> Option<f64> {
            self.item_width
        }

        fn item_margins(&self) -> Margins {
            self.margins
        }

        fn viewport_width(&self) -> f64 {
            self.viewport
        }
    }

    impl ScrollContainer for FakeContainer {
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
            self.scroll_left = offset;
        }

        fn set_scroll_behavior(&mut self, behavior: ScrollBehavior) {
            self.behavior = behavior;
        }

        fn add_scroll_listener(&mut self, listener: ListenerId) {
            self.listeners.push(listener);
        }

        fn remove_scroll_listener(&mut self, listener: ListenerId) {
            self.listeners.retain(|&l| l != listener);
        }
    }

    #[derive(Debug, Default)]
    struct RecordingScheduler {
        next: u64,
        scheduled: usize,
        pending: Vec<(TimerToken, Duration, DeferredAction)>,
        cancelled: Vec<TimerToken>,
    }

    impl RecordingScheduler {
        /// Remove and return the oldest pending action matching `pred`.
        fn take(
            &mut self,
            pred: impl Fn(&DeferredAction) -> bool,
        ) -> Option<(TimerToken, DeferredAction)> {
            let pos = self.pending.iter().position(|(_, _, a)| pred(a))?;
            let (token, _, action) = self.pending.remove(pos);
            Some((token, action))
        }

        fn pending_evaluations(&self) -> usize {
            self.pending
                .iter()
                .filter(|(_, _, a)| matches!(a, DeferredAction::EvaluateJump { .. }))
                .count()
        }
    }

    impl Scheduler for RecordingScheduler {
        fn schedule(&mut self, delay: Duration, action: DeferredAction) -> TimerToken {
            self.next += 1;
            self.scheduled += 1;
            let token = TimerToken(self.next);
            self.pending.push((token, delay, action));
            token
        }

        fn cancel(&mut self, token: TimerToken) {
            self.pending.retain(|(t, _, _)| *t != token);
            self.cancelled.push(token);
        }
    }

    fn is_eval(a: &DeferredAction) -> bool {
        matches!(a, DeferredAction::EvaluateJump { .. })
    }

    fn is_finish(a: &DeferredAction) -> bool {
        matches!(a, DeferredAction::FinishJump { .. })
    }

    fn is_smooth(a: &DeferredAction) -> bool {
        matches!(a, DeferredAction::EnableSmoothScroll { .. })
    }

    struct Harness {
        controller: InfiniteScrollController,
        scheduler: RecordingScheduler,
        container: FakeContainer,
        id: ContainerId,
    }

    impl Harness {
        fn new() -> Self {
            let mut controller = InfiniteScrollController::default();
            let mut scheduler = RecordingScheduler::default();
            let mut container = FakeContainer::scenario();
            let id = controller
                .init_infinite_scroll(&mut container, 5, &mut scheduler)
                .unwrap();
            Self {
                controller,
                scheduler,
                container,
                id,
            }
        }

        fn listener(&self) -> ListenerId {
            self.controller.instance(&self.id).unwrap().listener
        }

        fn scroll(&mut self) -> bool {
            let listener = self.listener();
            self.controller
                .handle_scroll(&self.id, listener, &mut self.scheduler)
        }

        fn fire(&mut self, pred: impl Fn(&DeferredAction) -> bool) -> Option<JumpDirection> {
            let (token, action) = self.scheduler.take(pred).expect("no matching action pending");
            self.controller
                .handle_deferred(token, &action, &mut self.container, &mut self.scheduler)
        }

        fn scroll_to_and_settle(&mut self, offset: f64) -> Option<JumpDirection> {
            self.container.scroll_left = offset;
            assert!(self.scroll());
            self.fire(is_eval)
        }

        fn state(&self) -> JumpState {
            self.controller.instance(&self.id).unwrap().state
        }
    }

    #[test]
    fn test_init_positions_instantly_then_enables_smooth() {
        let mut h = Harness::new();

        assert_eq!(h.container.scroll_left, 240.0);
        assert_eq!(h.container.behavior, ScrollBehavior::Auto);
        assert_eq!(h.container.listeners.len(), 1);
        assert_eq!(h.container.id, Some(h.id.clone()));
        assert_eq!(h.state(), JumpState::Idle);

        h.fire(is_smooth);
        assert_eq!(h.container.behavior, ScrollBehavior::Smooth);
    }

    #[test]
    fn test_init_keeps_existing_id() {
        let mut controller = InfiniteScrollController::default();
        let mut scheduler = RecordingScheduler::default();
        let mut container = FakeContainer::scenario();
        container.id = Some(ContainerId::new("featured"));

        let id = controller
            .init_infinite_scroll(&mut container, 5, &mut scheduler)
            .unwrap();
        assert_eq!(id.as_str(), "featured");
        assert!(controller.registry().contains(&id));
    }

    #[test]
    fn test_init_with_two_items_is_noop() {
        let mut controller = InfiniteScrollController::default();
        let mut scheduler = RecordingScheduler::default();
        let mut container = FakeContainer::scenario();
        container.scroll_left = 17.0;

        assert!(controller
            .init_infinite_scroll(&mut container, 2, &mut scheduler)
            .is_none());
        assert_eq!(container.scroll_left, 17.0);
        assert_eq!(container.behavior, ScrollBehavior::Auto);
        assert!(container.listeners.is_empty());
        assert!(container.id.is_none());
        assert!(controller.registry().is_empty());
        assert_eq!(scheduler.scheduled, 0);
    }

    #[test]
    fn test_init_with_zero_width_is_layout_not_ready() {
        let mut controller = InfiniteScrollController::default();
        let mut scheduler = RecordingScheduler::default();
        let mut container = FakeContainer::scenario();
        container.item_width = Some(0.0);
        container.margins = Margins::default();

        let err = controller
            .try_init(&mut container, 5, &mut scheduler)
            .unwrap_err();
        assert!(matches!(err, InitError::LayoutNotReady { .. }));
        assert_eq!(container.scroll_left, 0.0);
        assert!(container.listeners.is_empty());
        assert!(controller.registry().is_empty());

        assert!(controller
            .init_infinite_scroll(&mut container, 5, &mut scheduler)
            .is_none());
    }

    #[test]
    fn test_reinit_is_idempotent() {
        let mut h = Harness::new();
        let first_listener = h.listener();
        assert!(h.scroll());
        let first_eval = h.controller.instance(&h.id).unwrap().scroll_timer.unwrap();

        let id = h
            .controller
            .init_infinite_scroll(&mut h.container, 5, &mut h.scheduler)
            .unwrap();

        assert_eq!(id, h.id);
        assert_eq!(h.container.listeners.len(), 1);
        assert_ne!(h.container.listeners[0], first_listener);
        assert_eq!(h.controller.registry().len(), 1);
        assert!(h.scheduler.cancelled.contains(&first_eval));
        assert_eq!(h.scheduler.pending_evaluations(), 0);
    }

    #[test]
    fn test_reinit_ignores_superseded_listener() {
        let mut h = Harness::new();
        let old = h.listener();
        h.controller
            .init_infinite_scroll(&mut h.container, 5, &mut h.scheduler)
            .unwrap();

        assert!(!h.controller.handle_scroll(&h.id, old, &mut h.scheduler));
        assert_eq!(h.scheduler.pending_evaluations(), 0);
    }

    #[test]
    fn test_failed_reinit_deactivates_carousel() {
        let mut h = Harness::new();
        let old = h.listener();
        assert!(h.scroll());
        let pending_eval = h.controller.instance(&h.id).unwrap().scroll_timer.unwrap();

        // Layout collapses before the host re-initializes.
        h.container.item_width = Some(0.0);
        h.container.margins = Margins::default();
        assert!(h
            .controller
            .init_infinite_scroll(&mut h.container, 5, &mut h.scheduler)
            .is_none());

        assert!(h.container.listeners.is_empty());
        assert!(h.controller.registry().is_empty());
        assert!(h.scheduler.cancelled.contains(&pending_eval));
        assert!(h.scheduler.pending.is_empty());

        // The old listener is dead and the clone regions no longer wrap.
        h.container.scroll_left = 1250.0;
        assert!(!h.controller.handle_scroll(&h.id, old, &mut h.scheduler));
        assert!(h
            .controller
            .handle_infinite_jump(&h.id, &mut h.container, &mut h.scheduler)
            .is_none());
        assert_eq!(h.container.scroll_left, 1250.0);
    }

    #[test]
    fn test_forward_jump() {
        let mut h = Harness::new();
        h.fire(is_smooth);

        assert_eq!(h.scroll_to_and_settle(1250.0), Some(JumpDirection::Forward));
        assert_eq!(h.container.scroll_left, 150.0);
        assert_eq!(h.container.behavior, ScrollBehavior::Auto);
        assert_eq!(h.state(), JumpState::Jumping);

        h.fire(is_finish);
        assert_eq!(h.state(), JumpState::Idle);
        assert_eq!(h.container.behavior, ScrollBehavior::Smooth);
        assert_eq!(h.controller.instance(&h.id).unwrap().forward_jumps, 1);
    }

    #[test]
    fn test_backward_jump() {
        let mut h = Harness::new();

        assert_eq!(h.scroll_to_and_settle(100.0), Some(JumpDirection::Backward));
        assert_eq!(h.container.scroll_left, 1200.0);

        h.fire(is_finish);
        assert_eq!(h.state(), JumpState::Idle);
        assert_eq!(h.controller.instance(&h.id).unwrap().backward_jumps, 1);
    }

    #[test]
    fn test_steady_offset_does_not_jump() {
        let mut h = Harness::new();

        assert_eq!(h.scroll_to_and_settle(700.0), None);
        assert_eq!(h.container.scroll_left, 700.0);
        assert_eq!(h.state(), JumpState::Idle);

        let instance = h.controller.instance(&h.id).unwrap();
        assert_eq!(instance.evaluations, 1);
        assert_eq!(instance.jumps(), 0);
    }

    #[test]
    fn test_jump_cancels_pending_smooth_enable() {
        let mut h = Harness::new();
        let smooth = h.controller.instance(&h.id).unwrap().settle_timer.unwrap();

        h.scroll_to_and_settle(1250.0);

        assert!(h.scheduler.cancelled.contains(&smooth));
        assert!(h.scheduler.take(is_smooth).is_none());
    }

    #[test]
    fn test_burst_collapses_to_one_evaluation() {
        let mut h = Harness::new();
        h.container.scroll_left = 1300.0;

        for _ in 0..50 {
            assert!(h.scroll());
        }

        assert_eq!(h.scheduler.pending_evaluations(), 1);
        assert_eq!(h.fire(is_eval), Some(JumpDirection::Forward));
        assert_eq!(h.scheduler.pending_evaluations(), 0);
        assert_eq!(h.controller.instance(&h.id).unwrap().evaluations, 1);
    }

    #[test]
    fn test_scroll_while_jumping_is_ignored() {
        let mut h = Harness::new();
        h.scroll_to_and_settle(1250.0);
        let scheduled = h.scheduler.scheduled;

        for _ in 0..10 {
            assert!(!h.scroll());
        }
        assert_eq!(h.scheduler.scheduled, scheduled);
        assert_eq!(h.scheduler.pending_evaluations(), 0);

        // Direct evaluation is guarded as well.
        h.container.scroll_left = 5000.0;
        assert_eq!(
            h.controller
                .handle_infinite_jump(&h.id, &mut h.container, &mut h.scheduler),
            None
        );
        assert_eq!(h.container.scroll_left, 5000.0);
    }

    #[test]
    fn test_stale_evaluation_token_is_ignored() {
        let mut h = Harness::new();
        h.container.scroll_left = 1250.0;
        h.scroll();
        let stale = h.controller.instance(&h.id).unwrap().scroll_timer.unwrap();
        h.scroll();

        let action = DeferredAction::EvaluateJump { id: h.id.clone() };
        assert_eq!(
            h.controller
                .handle_deferred(stale, &action, &mut h.container, &mut h.scheduler),
            None
        );
        assert_eq!(h.container.scroll_left, 1250.0);
        assert_eq!(h.controller.instance(&h.id).unwrap().evaluations, 0);
    }

    #[test]
    fn test_forward_then_backward_restores_offset() {
        let mut h = Harness::new();
        let start = 1262.75;

        h.scroll_to_and_settle(start);
        h.fire(is_finish);
        assert!((h.container.scroll_left - (start - 1100.0)).abs() < 1e-9);

        let drift = 40.0;
        let offset = h.container.scroll_left - drift;
        assert_eq!(h.scroll_to_and_settle(offset), Some(JumpDirection::Backward));
        h.fire(is_finish);

        assert!((h.container.scroll_left - (start - drift)).abs() < 1e-9);
        assert_eq!(h.controller.instance(&h.id).unwrap().jumps(), 2);
    }

    #[test]
    fn test_teardown() {
        let mut h = Harness::new();
        h.scroll();

        assert!(h
            .controller
            .teardown(&h.id, &mut h.container, &mut h.scheduler));
        assert!(h.container.listeners.is_empty());
        assert!(h.controller.registry().is_empty());
        assert!(h.scheduler.pending.is_empty());

        assert!(!h
            .controller
            .teardown(&h.id, &mut h.container, &mut h.scheduler));
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut controller = InfiniteScrollController::default();
        let mut scheduler = RecordingScheduler::default();
        let mut container = FakeContainer::scenario();
        let id = ContainerId::new("missing");

        assert!(!controller.handle_scroll(&id, ListenerId(1), &mut scheduler));
        assert!(controller
            .handle_infinite_jump(&id, &mut container, &mut scheduler)
            .is_none());
        assert_eq!(scheduler.scheduled, 0);
    }

    #[test]
    fn test_configured_delays_are_used() {
        let config = ControllerConfig {
            debounce: Duration::from_millis(150),
            jump_cooldown: Duration::from_millis(30),
            smooth_enable_delay: Duration::from_millis(10),
        };
        let mut controller = InfiniteScrollController::new(config);
        let mut scheduler = RecordingScheduler::default();
        let mut container = FakeContainer::scenario();
        let id = controller
            .init_infinite_scroll(&mut container, 5, &mut scheduler)
            .unwrap();
        let listener = controller.instance(&id).unwrap().listener;

        container.scroll_left = 2000.0;
        controller.handle_scroll(&id, listener, &mut scheduler);

        let delays: Vec<Duration> = scheduler.pending.iter().map(|(_, d, _)| *d).collect();
        assert_eq!(
            delays,
            vec![Duration::from_millis(10), Duration::from_millis(150)]
        );

        let (token, action) = scheduler.take(is_eval).unwrap();
        controller.handle_deferred(token, &action, &mut container, &mut scheduler);
        assert_eq!(scheduler.pending.last().unwrap().1, Duration::from_millis(30));
    }

    #[test]
    fn test_config_serialization() {
        let config = ControllerConfig {
            debounce: Duration::from_millis(150),
            ..ControllerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ControllerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
