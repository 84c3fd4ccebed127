//! Jump Subsystem
//!
//! Decides what a jump press turns into. Checks run in a fixed order and the
//! first match wins:
//!
//! 1. **Wall kick** - a wall was touched while falling and its window is open,
//!    even in the middle of a ground pound
//! 2. **Availability** - grounded, inside coyote time, or mid-chain
//!    (`0 < jump_count < max_jumps`); otherwise the press is dropped
//! 3. **Long jump** - grounded, crouching and running faster than 3 m/s
//! 4. **Staged jump** - the next link of the single/double/triple chain
//!
//! Ground pounds are not jumps: they come from their own request and are
//! started by [`start_ground_pound`].

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::MovementConfig;
use super::events::{EventSink, MovementEvent};
use super::state::{Character, MovementMode};

/// What a jump request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpOutcome {
    WallKick,
    LongJump,
    /// A link of the jump chain with the vertical impulse that was applied
    Staged { count: u8, impulse: f32 },
}

/// Availability gate: grounded, coyote time, or an unfinished chain.
pub fn can_jump(character: &Character, config: &MovementConfig) -> bool {
    character.is_grounded()
        || character.timers.coyote_active()
        || (character.jump_count > 0 && character.jump_count < config.max_jumps)
}

/// Run the jump decision for one request.
///
/// Returns `None` when the request was dropped. A ground pound commits the
/// character until impact; only a wall kick can break out of it.
pub fn request_jump(
    character: &mut Character,
    config: &MovementConfig,
    sink: &mut dyn EventSink,
) -> Option<JumpOutcome> {
    if character.can_wall_kick() {
        wall_kick(character, config, sink);
        return Some(JumpOutcome::WallKick);
    }

    if character.mode == MovementMode::GroundPounding {
        debug!("jump ignored while ground pounding");
        return None;
    }

    if !can_jump(character, config) {
        debug!(jump_count = character.jump_count, "jump unavailable, request dropped");
        return None;
    }

    if character.is_grounded()
        && character.is_crouching
        && character.horizontal_speed() > config.long_jump_min_speed
    {
        long_jump(character, config, sink);
        return Some(JumpOutcome::LongJump);
    }

    Some(staged_jump(character, config, sink))
}

/// Next link of the single/double/triple chain.
fn staged_jump(
    character: &mut Character,
    config: &MovementConfig,
    sink: &mut dyn EventSink,
) -> JumpOutcome {
    debug_assert!(character.jump_count < config.max_jumps || character.timers.coyote_active());
    let speed = character.horizontal_speed();

    character.jump_count = (character.jump_count + 1).min(config.max_jumps);

    // The third jump needs a running start; without it the chain stays on
    // the double jump.
    let mut triple = false;
    if character.jump_count == 3 {
        if speed >= config.min_triple_jump_speed {
            triple = true;
        } else {
            character.jump_count = 2;
        }
    }

    let impulse = config.jump_height * config.jump_multiplier(character.jump_count);
    character.velocity.y = impulse;
    character.timers.coyote = 0.0;
    if character.mode == MovementMode::Grounded {
        character.mode = MovementMode::Airborne;
    }

    debug!(count = character.jump_count, impulse, speed, "staged jump");
    sink.emit(MovementEvent::JumpPerformed { count: character.jump_count }, character.position);
    if triple {
        sink.emit(MovementEvent::TripleJumpPerformed, character.position);
    }

    JumpOutcome::Staged { count: character.jump_count, impulse }
}

/// Crouch + jump while running: lower arc, boosted and capped momentum.
fn long_jump(character: &mut Character, config: &MovementConfig, sink: &mut dyn EventSink) {
    character.mode = MovementMode::LongJumping;
    character.jump_count = 1;
    character.timers.coyote = 0.0;
    character.velocity.y = config.jump_height * config.long_jump_height_factor;

    let boosted = character.momentum * config.long_jump_boost;
    character.momentum = boosted.clamp_length_max(config.max_speed * config.long_jump_speed_cap);

    debug!(momentum = ?character.momentum, "long jump");
    sink.emit(MovementEvent::LongJumpStarted, character.position);
}

/// Kick away from the remembered wall.
fn wall_kick(character: &mut Character, config: &MovementConfig, sink: &mut dyn EventSink) {
    let normal = character.wall_contact.map(|wall| wall.normal).unwrap_or(Vec3::ZERO);
    let away = Vec3::new(normal.x, 0.0, normal.z).normalize_or_zero();

    character.momentum = away * config.max_speed * config.wall_kick_boost;
    character.velocity.y = config.jump_height * config.wall_kick_height_factor;
    character.jump_count = 1;
    character.timers.coyote = 0.0;
    character.mode = MovementMode::Airborne;
    character.clear_wall_contact();

    debug!(normal = ?normal, "wall kick");
    sink.emit(MovementEvent::WallKickPerformed, character.position);
}

/// Begin a ground pound. Only airborne characters can pound, and a second
/// request while already pounding changes nothing.
///
/// Returns `true` if a pound started.
pub fn start_ground_pound(
    character: &mut Character,
    config: &MovementConfig,
    sink: &mut dyn EventSink,
) -> bool {
    match character.mode {
        MovementMode::GroundPounding | MovementMode::Grounded => false,
        MovementMode::Airborne | MovementMode::LongJumping => {
            character.mode = MovementMode::GroundPounding;
            character.velocity.y = config.ground_pound_velocity;
            character.momentum *= config.ground_pound_momentum_keep;

            debug!("ground pound started");
            sink.emit(MovementEvent::GroundPoundStarted, character.position);
            true
        }
    }
}

/// Resolve a ground pound hitting the floor: impact event, then a small
/// bounce back into the air.
///
/// The bounce is not a jump. The chain is reset to zero and coyote time is
/// granted, so a press during the bounce is a fresh first jump.
pub(crate) fn ground_pound_impact(
    character: &mut Character,
    config: &MovementConfig,
    sink: &mut dyn EventSink,
) {
    sink.emit(MovementEvent::GroundPoundImpact, character.position);

    character.jump_count = 0;
    character.velocity.y = config.jump_height * config.ground_pound_bounce_factor;
    character.mode = MovementMode::Airborne;
    character.timers.coyote = config.coyote_duration;

    debug!(bounce = character.velocity.y, "ground pound impact");
}
