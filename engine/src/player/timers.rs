//! Grace-window timers
//!
//! All movement scheduling is done with countdowns: each timer is set to a
//! window length when something happens and ticks toward zero every frame.
//! A timer above zero means its window is open.

use serde::{Deserialize, Serialize};

/// The three countdowns owned by a character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MovementTimers {
    /// Time left on a buffered jump press
    pub jump_buffer: f32,
    /// Time left to jump after walking off a ledge
    pub coyote: f32,
    /// Time left to kick off the last wall touched
    pub wall_kick: f32,
}

impl MovementTimers {
    /// Count every timer down by `dt`, flooring at zero.
    pub fn tick(&mut self, dt: f32) {
        self.jump_buffer = countdown(self.jump_buffer, dt);
        self.coyote = countdown(self.coyote, dt);
        self.wall_kick = countdown(self.wall_kick, dt);
    }

    pub fn jump_buffered(&self) -> bool {
        self.jump_buffer > 0.0
    }

    pub fn coyote_active(&self) -> bool {
        self.coyote > 0.0
    }

    pub fn wall_kick_open(&self) -> bool {
        self.wall_kick > 0.0
    }

    pub fn all_non_negative(&self) -> bool {
        self.jump_buffer >= 0.0 && self.coyote >= 0.0 && self.wall_kick >= 0.0
    }
}

fn countdown(value: f32, dt: f32) -> f32 {
    (value - dt).max(0.0)
}
