//! Event loop that replays a scroll trace against the controller.
//!
//! Trace steps and fired timers arrive on one channel and are processed in
//! order, mirroring the single-threaded UI loop a carousel normally lives on.

use crate::container::SimContainer;
use crate::scheduler::TokioScheduler;
use anyhow::{Context, Result};
use infiniscroll_core::{
    ContainerId, ControllerConfig, DeferredAction, InfiniteScrollController, JumpState,
    ScrollBehavior, ScrollContainer, TimerToken,
};
use infiniscroll_trace::{CarouselReport, ScrollTrace, SimulationReport, TraceStep};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Capacity of the runtime event channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events the runtime loop processes.
#[derive(Debug)]
pub enum RuntimeEvent {
    /// A trace step to apply.
    Step(TraceStep),
    /// A scheduled controller action came due.
    Timer {
        token: TimerToken,
        action: DeferredAction,
    },
    /// All steps delivered and pending work has settled.
    Shutdown,
}

/// Carousels, controller and scheduler of one run.
#[derive(Debug)]
pub struct Simulation {
    controller: InfiniteScrollController,
    scheduler: TokioScheduler,
    containers: BTreeMap<String, SimContainer>,
}

impl Simulation {
    /// Build containers for every carousel in `trace`. Must run inside a tokio runtime.
    pub fn new(
        config: ControllerConfig,
        trace: &ScrollTrace,
        event_tx: mpsc::Sender<RuntimeEvent>,
    ) -> Self {
        let containers = trace
            .carousels
            .iter()
            .map(|spec| (spec.name.clone(), SimContainer::from_spec(spec)))
            .collect();

        Self {
            controller: InfiniteScrollController::new(config),
            scheduler: TokioScheduler::new(event_tx),
            containers,
        }
    }

    pub fn controller(&self) -> &InfiniteScrollController {
        &self.controller
    }

    pub fn container(&self, name: &str) -> Option<&SimContainer> {
        self.containers.get(name)
    }

    /// Run initialization on every carousel, as the host does after rendering.
    pub fn init_all(&mut self) {
        let names: Vec<String> = self.containers.keys().cloned().collect();
        for name in names {
            self.init_carousel(&name);
        }
        self.dispatch_scroll_events();
    }

    fn init_carousel(&mut self, name: &str) {
        let Some(container) = self.containers.get_mut(name) else {
            return;
        };
        let real_items = container.real_items();
        match self
            .controller
            .init_infinite_scroll(container, real_items, &mut self.scheduler)
        {
            Some(id) => debug!("Carousel '{}' initialized as {}", name, id),
            None => info!("Carousel '{}' left as a finite scroller", name),
        }
    }

    /// Process one event. Returns `false` when the loop should stop.
    pub fn handle_event(&mut self, event: RuntimeEvent) -> bool {
        match event {
            RuntimeEvent::Step(step) => self.apply_step(step),
            RuntimeEvent::Timer { token, action } => self.fire_timer(token, action),
            RuntimeEvent::Shutdown => return false,
        }
        self.dispatch_scroll_events();
        true
    }

    fn apply_step(&mut self, step: TraceStep) {
        match step {
            TraceStep::ScrollTo { carousel, offset } => {
                if let Some(container) = self.containers.get_mut(&carousel) {
                    container.set_scroll_left(offset);
                }
            }
            TraceStep::ScrollBy { carousel, delta } => {
                if let Some(container) = self.containers.get_mut(&carousel) {
                    let offset = container.scroll_left() + delta;
                    container.set_scroll_left(offset);
                }
            }
            // Timed steps are expanded by the driver before reaching the loop.
            TraceStep::Wait { .. } | TraceStep::Burst { .. } => {}
            TraceStep::Reinit { carousel } => {
                self.init_carousel(&carousel);
            }
            TraceStep::Teardown { carousel } => {
                let Some(container) = self.containers.get_mut(&carousel) else {
                    return;
                };
                if let Some(id) = container.id() {
                    self.controller.teardown(&id, container, &mut self.scheduler);
                }
            }
        }
    }

    fn fire_timer(&mut self, token: TimerToken, action: DeferredAction) {
        self.scheduler.fired(token);

        let target = action.container_id();
        let Some(container) = self
            .containers
            .values_mut()
            .find(|c| c.id().as_ref() == Some(target))
        else {
            warn!("Timer fired for unknown container {}", target);
            return;
        };

        if let Some(direction) =
            self.controller
                .handle_deferred(token, &action, container, &mut self.scheduler)
        {
            info!("Carousel '{}' jumped {:?}", container.name(), direction);
        }
    }

    /// Deliver queued scroll events to every listener attached to each container.
    fn dispatch_scroll_events(&mut self) {
        for container in self.containers.values_mut() {
            if !container.take_scroll_event() {
                continue;
            }
            let Some(id) = container.id() else {
                continue;
            };
            for listener in container.listeners().to_vec() {
                self.controller
                    .handle_scroll(&id, listener, &mut self.scheduler);
            }
        }
    }

    /// Snapshot the final state of every carousel.
    pub fn report(&self) -> SimulationReport {
        let carousels = self
            .containers
            .values()
            .map(|container| {
                let id = container.id();
                let instance = id.as_ref().and_then(|id| self.controller.instance(id));

                CarouselReport {
                    name: container.name().to_string(),
                    container_id: id.as_ref().map(ContainerId::to_string),
                    active: instance.is_some(),
                    scroll_left: container.scroll_left(),
                    scroll_behavior: behavior_name(container.behavior()).to_string(),
                    listeners: container.listeners().len(),
                    state: instance.map(|i| state_name(i.state).to_string()),
                    evaluations: instance.map_or(0, |i| i.evaluations),
                    forward_jumps: instance.map_or(0, |i| i.forward_jumps),
                    backward_jumps: instance.map_or(0, |i| i.backward_jumps),
                }
            })
            .collect();

        SimulationReport { carousels }
    }

    /// Abort outstanding timers.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }
}

fn behavior_name(behavior: ScrollBehavior) -> &'static str {
    match behavior {
        ScrollBehavior::Auto => "auto",
        ScrollBehavior::Smooth => "smooth",
    }
}

fn state_name(state: JumpState) -> &'static str {
    match state {
        JumpState::Idle => "idle",
        JumpState::Jumping => "jumping",
    }
}

/// Time to wait after the last step so every pending evaluation and cool-down completes.
pub fn settle_time(config: &ControllerConfig) -> Duration {
    2 * (config.debounce + config.jump_cooldown + config.smooth_enable_delay)
        + Duration::from_millis(10)
}

/// Feed trace steps into the loop in real (or paused) time, then request shutdown.
async fn drive_steps(
    steps: Vec<TraceStep>,
    settle: Duration,
    event_tx: mpsc::Sender<RuntimeEvent>,
) {
    for step in steps {
        match step {
            TraceStep::Wait { ms } => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
            }
            TraceStep::Burst {
                carousel,
                count,
                delta,
                interval_ms,
            } => {
                for i in 0..count {
                    let event = RuntimeEvent::Step(TraceStep::ScrollBy {
                        carousel: carousel.clone(),
                        delta,
                    });
                    if event_tx.send(event).await.is_err() {
                        return;
                    }
                    if interval_ms > 0 && i + 1 < count {
                        tokio::time::sleep(Duration::from_millis(interval_ms)).await;
                    }
                }
            }
            step => {
                if event_tx.send(RuntimeEvent::Step(step)).await.is_err() {
                    return;
                }
            }
        }
    }

    tokio::time::sleep(settle).await;
    let _ = event_tx.send(RuntimeEvent::Shutdown).await;
}

/// Replay `trace` and report the final state of each carousel.
pub async fn run_trace(config: ControllerConfig, trace: ScrollTrace) -> Result<SimulationReport> {
    trace.validate().context("Invalid scroll trace")?;

    let (event_tx, mut event_rx) = mpsc::channel::<RuntimeEvent>(EVENT_CHANNEL_CAPACITY);
    let mut simulation = Simulation::new(config, &trace, event_tx.clone());
    simulation.init_all();

    info!(
        "Replaying {} steps across {} carousels",
        trace.steps.len(),
        trace.carousels.len()
    );
    let driver = tokio::spawn(drive_steps(trace.steps, settle_time(&config), event_tx));

    while let Some(event) = event_rx.recv().await {
        if !simulation.handle_event(event) {
            break;
        }
    }

    driver.await.context("Trace driver task failed")?;
    simulation.shutdown();

    Ok(simulation.report())
}
