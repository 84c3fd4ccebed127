//! Movement events
//!
//! The core never spawns particles, shakes cameras or plays sounds. It
//! reports what happened through an [`EventSink`] and lets the host decide
//! how to present it. Events are fire-and-forget: one call per occurrence.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::config::MovementConfig;

/// Discrete things the character did this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MovementEvent {
    /// A staged jump left the ground or the air, `count` in `1..=3`
    JumpPerformed { count: u8 },
    /// The third jump reached full height (follows `JumpPerformed { count: 3 }`)
    TripleJumpPerformed,
    LongJumpStarted,
    WallKickPerformed,
    GroundPoundStarted,
    GroundPoundImpact,
    Landed { hard_impact: bool },
    /// Emitted at most every `speed_trail_interval` seconds while running fast
    SpeedTrailTick,
}

/// Receives movement events together with the character position.
pub trait EventSink {
    fn emit(&mut self, event: MovementEvent, position: Vec3);
}

impl EventSink for Vec<MovementEvent> {
    fn emit(&mut self, event: MovementEvent, _position: Vec3) {
        self.push(event);
    }
}

impl EventSink for Vec<(MovementEvent, Vec3)> {
    fn emit(&mut self, event: MovementEvent, position: Vec3) {
        self.push((event, position));
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: MovementEvent, _position: Vec3) {}
}

/// Forwards events to a closure.
pub struct FnSink<F>(pub F);

impl<F: FnMut(MovementEvent, Vec3)> EventSink for FnSink<F> {
    fn emit(&mut self, event: MovementEvent, position: Vec3) {
        (self.0)(event, position);
    }
}

/// Throttle for [`MovementEvent::SpeedTrailTick`].
///
/// Accumulates time only while the character is above the speed threshold.
/// The accumulator is kept (not reset) when the character slows down, so a
/// brief dip does not restart the interval.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedTrail {
    elapsed: f32,
}

impl SpeedTrail {
    /// Returns `true` when a trail tick should be emitted this frame.
    pub fn tick(&mut self, dt: f32, horizontal_speed: f32, config: &MovementConfig) -> bool {
        if horizontal_speed <= config.max_speed * config.speed_trail_threshold {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed > config.speed_trail_interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}
