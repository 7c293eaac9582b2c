//! Deferred actions and the scheduler capability used to run them.
//!
//! The controller never sleeps. It asks the host to fire a [`DeferredAction`]
//! after a delay and keeps the returned [`TimerToken`] on the instance, so a
//! superseded action can be cancelled and a late firing can be recognised.

use crate::ContainerId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cancellation token for a scheduled action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerToken(pub u64);

/// Work the controller wants performed later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeferredAction {
    /// Scrolling has been quiet for the debounce period; check the thresholds.
    EvaluateJump { id: ContainerId },
    /// Re-arm animated scrolling after the instant initial positioning.
    EnableSmoothScroll { id: ContainerId },
    /// End the jump cool-down: re-arm animated scrolling and return to idle.
    FinishJump { id: ContainerId },
}

impl DeferredAction {
    /// Container the action targets.
    pub fn container_id(&self) -> &ContainerId {
        match self {
            Self::EvaluateJump { id }
            | Self::EnableSmoothScroll { id }
            | Self::FinishJump { id } => id,
        }
    }
}

/// Host timer facility.
pub trait Scheduler {
    /// Fire `action` back into the controller after `delay`.
    fn schedule(&mut self, delay: Duration, action: DeferredAction) -> TimerToken;

    /// Cancel a pending action. Unknown or already-fired tokens are ignored.
    fn cancel(&mut self, token: TimerToken);
}
