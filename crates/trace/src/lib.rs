//! Infiniscroll Trace Format
//!
//! Shared types for feeding recorded or scripted scroll activity into the
//! runtime and reading back what the controller did with it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// Errors raised while loading or validating a trace.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Invalid trace JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Carousel '{0}' is declared more than once")]
    DuplicateCarousel(String),

    #[error("Container id '{0}' is preset on more than one carousel")]
    DuplicatePresetId(String),

    #[error("Step {step} references unknown carousel '{name}'")]
    UnknownCarousel { step: usize, name: String },

    #[error("Carousel '{name}': {field} must be a finite, non-negative number")]
    InvalidDimension { name: String, field: &'static str },
}

/// A simulated carousel container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselSpec {
    /// Name used by trace steps to address this carousel.
    pub name: String,
    /// Number of real (non-clone) items.
    pub real_items: usize,
    /// Content width of each item in pixels.
    pub item_width: f64,
    /// Left margin of each item in pixels.
    #[serde(default)]
    pub margin_left: f64,
    /// Right margin of each item in pixels.
    #[serde(default)]
    pub margin_right: f64,
    /// Visible width of the scroll viewport in pixels.
    pub viewport_width: f64,
    /// Identifier already present on the element, if any.
    #[serde(default)]
    pub preset_id: Option<String>,
}

/// One step of a scroll trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceStep {
    /// User moves the viewport to an absolute offset.
    ScrollTo {
        carousel: String,
        offset: f64,
    },
    /// User moves the viewport by a relative amount.
    ScrollBy {
        carousel: String,
        delta: f64,
    },
    /// A run of scroll events, e.g. momentum scrolling.
    Burst {
        carousel: String,
        /// Number of scroll events.
        count: usize,
        /// Offset change per event.
        delta: f64,
        /// Pause between events in milliseconds.
        #[serde(default)]
        interval_ms: u64,
    },
    /// Let time pass without input.
    Wait {
        ms: u64,
    },
    /// Run initialization again on an already initialized carousel.
    Reinit {
        carousel: String,
    },
    /// Detach the controller from a carousel.
    Teardown {
        carousel: String,
    },
}

impl TraceStep {
    /// Carousel addressed by this step, if any.
    pub fn carousel(&self) -> Option<&str> {
        match self {
            Self::ScrollTo { carousel, .. }
            | Self::ScrollBy { carousel, .. }
            | Self::Burst { carousel, .. }
            | Self::Reinit { carousel }
            | Self::Teardown { carousel } => Some(carousel),
            Self::Wait { .. } => None,
        }
    }
}

/// A complete scripted session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollTrace {
    pub carousels: Vec<CarouselSpec>,
    #[serde(default)]
    pub steps: Vec<TraceStep>,
}

impl ScrollTrace {
    /// Parse and validate a trace from JSON text.
    pub fn from_json(json: &str) -> Result<Self, TraceError> {
        let trace: ScrollTrace = serde_json::from_str(json)?;
        trace.validate()?;
        Ok(trace)
    }

    /// Check carousel names and preset ids are unique and every step addresses a known carousel.
    pub fn validate(&self) -> Result<(), TraceError> {
        let mut names = HashSet::new();
        let mut preset_ids = HashSet::new();
        for spec in &self.carousels {
            if !names.insert(spec.name.as_str()) {
                return Err(TraceError::DuplicateCarousel(spec.name.clone()));
            }
            if let Some(id) = &spec.preset_id {
                if !preset_ids.insert(id.as_str()) {
                    return Err(TraceError::DuplicatePresetId(id.clone()));
                }
            }
            for (field, value) in [
                ("item_width", spec.item_width),
                ("margin_left", spec.margin_left),
                ("margin_right", spec.margin_right),
                ("viewport_width", spec.viewport_width),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(TraceError::InvalidDimension {
                        name: spec.name.clone(),
                        field,
                    });
                }
            }
        }

        for (step, entry) in self.steps.iter().enumerate() {
            if let Some(name) = entry.carousel() {
                if !names.contains(name) {
                    return Err(TraceError::UnknownCarousel {
                        step,
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Final state of one carousel after a simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarouselReport {
    pub name: String,
    /// Identifier assigned to the container, if initialization ran.
    pub container_id: Option<String>,
    /// Whether the infinite loop is active on the container.
    pub active: bool,
    pub scroll_left: f64,
    /// `auto` or `smooth`.
    pub scroll_behavior: String,
    /// Scroll listeners attached to the container.
    pub listeners: usize,
    /// `idle` or `jumping`; absent when inactive.
    pub state: Option<String>,
    pub evaluations: u64,
    pub forward_jumps: u64,
    pub backward_jumps: u64,
}

/// Result of running a trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub carousels: Vec<CarouselReport>,
}

impl SimulationReport {
    pub fn carousel(&self, name: &str) -> Option<&CarouselReport> {
        self.carousels.iter().find(|c| c.name == name)
    }
}
