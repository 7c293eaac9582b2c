//! Infiniscroll Runtime
//!
//! Hosts simulated carousel containers on a tokio event loop:
//! - Builds browser-like scroll containers from a trace
//! - Runs the jump controller's deferred actions as tokio timers
//! - Replays scripted scroll activity and reports the outcome

pub mod config;
pub mod container;
pub mod scheduler;
pub mod sim;

pub use container::SimContainer;
pub use scheduler::TokioScheduler;
pub use sim::{run_trace, RuntimeEvent, Simulation};
