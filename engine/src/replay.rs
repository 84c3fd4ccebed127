//! Scripted replays
//!
//! A [`Scenario`] is a box course, a start position and a list of input
//! steps. Running it drives a [`PlayerMovementController`] at a fixed time
//! step and records every [`MovementEvent`] with the frame it happened on.
//! The same scenario and config always produce the same outcome.
//!
//! ```json
//! {
//!   "name": "triple jump",
//!   "boxes": [{ "min": [-50, -1, -50], "max": [50, 0, 50] }],
//!   "steps": [
//!     { "move_axis_z": 1.0, "repeat": 60 },
//!     { "move_axis_z": 1.0, "jump_pressed": true, "repeat": 10 }
//!   ]
//! }
//! ```

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::input::InputSnapshot;
use crate::physics::{Aabb, StaticWorld};
use crate::player::{Character, ConfigError, MovementConfig, MovementEvent, PlayerMovementController, Telemetry};

fn one() -> u32 {
    1
}

/// One input held for `repeat` frames.
///
/// Press requests (`jump_pressed`, `ground_pound_requested`) only fire on the
/// first of those frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(flatten)]
    pub input: InputSnapshot,
    #[serde(default = "one")]
    pub repeat: u32,
}

impl ScriptStep {
    pub fn new(input: InputSnapshot, repeat: u32) -> Self {
        Self { input, repeat }
    }
}

/// A box course plus an input script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub name: String,
    /// Fixed frame time in seconds
    pub dt: f32,
    /// Body center at frame zero
    pub start: Vec3,
    pub boxes: Vec<Aabb>,
    pub steps: Vec<ScriptStep>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            name: String::from("unnamed"),
            dt: 1.0 / 60.0,
            start: Vec3::new(0.0, 0.8, 0.0),
            boxes: Vec::new(),
            steps: Vec::new(),
        }
    }
}

/// An event tagged with the frame it fired on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub frame: u32,
    #[serde(flatten)]
    pub event: MovementEvent,
    pub position: Vec3,
}

/// Everything a replay produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub scenario: String,
    pub frames: u32,
    pub events: Vec<RecordedEvent>,
    pub final_state: Telemetry,
}

impl ReplayOutcome {
    pub fn count(&self, event: MovementEvent) -> usize {
        self.events.iter().filter(|recorded| recorded.event == event).count()
    }
}

impl Scenario {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(ConfigError::Invalid {
                field: "dt",
                reason: "must be a positive number",
            });
        }
        if !self.start.is_finite() {
            return Err(ConfigError::Invalid {
                field: "start",
                reason: "must be finite",
            });
        }
        Ok(())
    }

    /// Total number of frames the script runs for.
    pub fn frame_count(&self) -> u32 {
        self.steps.iter().map(|step| step.repeat).sum()
    }

    /// Flat floor, run up, then three chained jumps and a ground pound.
    pub fn demo() -> Self {
        let run = InputSnapshot::default().with_axes(0.0, 1.0);
        Self {
            name: String::from("demo"),
            boxes: vec![Aabb::new(Vec3::new(-100.0, -1.0, -100.0), Vec3::new(100.0, 0.0, 100.0))],
            steps: vec![
                ScriptStep::new(run, 60),
                ScriptStep::new(run.with_jump(), 8),
                ScriptStep::new(run.with_jump(), 8),
                ScriptStep::new(run.with_jump(), 20),
                ScriptStep::new(run.with_ground_pound(), 60),
                ScriptStep::new(InputSnapshot::default(), 60),
            ],
            ..Self::default()
        }
    }

    /// Run the script with `config`.
    pub fn run(&self, config: MovementConfig) -> ReplayOutcome {
        let world = StaticWorld::from_boxes(self.boxes.iter().copied());
        let mut controller =
            PlayerMovementController::with_character(Character::new(self.start), config);

        let mut events = Vec::new();
        let mut frame_events: Vec<(MovementEvent, Vec3)> = Vec::new();
        let mut frame = 0u32;

        for step in &self.steps {
            for i in 0..step.repeat {
                let input = if i == 0 {
                    step.input
                } else {
                    InputSnapshot {
                        jump_pressed: false,
                        ground_pound_requested: false,
                        ..step.input
                    }
                };

                controller.update(self.dt, &input, &world, &mut frame_events);
                events.extend(frame_events.drain(..).map(|(event, position)| RecordedEvent {
                    frame,
                    event,
                    position,
                }));
                frame += 1;
            }
        }

        debug!(scenario = %self.name, frames = frame, events = events.len(), "replay finished");

        ReplayOutcome {
            scenario: self.name.clone(),
            frames: frame,
            events,
            final_state: controller.telemetry(),
        }
    }
}
