//! Player Movement Controller
//!
//! Drives one [`Character`] through a frame of platformer movement: run,
//! staged jumps, long jumps, wall kicks and ground pounds. Movement direction
//! is relative to the camera yaw carried in the [`InputSnapshot`].
//!
//! # Frame order
//!
//! 1. Clamp `dt` and tick the timers
//! 2. Handle this frame's requests (ground pound, then jump)
//! 3. Ground probe: snap, land, or start coyote time when walking off a ledge
//! 4. Mode update (ground pound, long jump, or normal running)
//! 5. Gravity and terminal velocity
//! 6. Wall probe
//! 7. Horizontal movement, then vertical movement unless the feet touched
//!    ground this frame
//! 8. Speed trail feedback
//!
//! # Usage
//!
//! ```rust,ignore
//! use sky_hop_engine::input::InputSnapshot;
//! use sky_hop_engine::physics::StaticWorld;
//! use sky_hop_engine::player::{MovementEvent, PlayerMovementController};
//!
//! let mut controller = PlayerMovementController::new();
//! let mut events: Vec<MovementEvent> = Vec::new();
//!
//! // Each frame:
//! let report = controller.update(delta_time, &input, &world, &mut events);
//! render_player_at(controller.get_position());
//! ```

use glam::Vec3;
use tracing::{debug, trace, warn};

use super::config::MovementConfig;
use super::events::{EventSink, MovementEvent, SpeedTrail};
use super::jump::{self, JumpOutcome};
use super::resolver::{self, HorizontalStep};
use super::state::{Character, MovementMode, Telemetry, WallContact};
use crate::input::InputSnapshot;
use crate::physics::GeometryQuery;

/// Summary of one [`PlayerMovementController::update`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameReport {
    /// `dt` after clamping
    pub dt: f32,
    /// Jump performed this frame, from a press or a buffered press on landing
    pub jump: Option<JumpOutcome>,
    pub ground_pound_started: bool,
    pub ground_pound_impact: bool,
    /// The feet reached the ground this frame after being in the air
    pub landed: bool,
    /// Normal of the surface that cancelled horizontal movement
    pub blocked_by: Option<Vec3>,
}

/// Platformer movement state machine for a single character.
#[derive(Debug, Clone)]
pub struct PlayerMovementController {
    character: Character,
    config: MovementConfig,
    trail: SpeedTrail,
}

impl Default for PlayerMovementController {
    fn default() -> Self {
        Self::with_config(MovementConfig::default())
    }
}

impl PlayerMovementController {
    /// Create a controller with default tuning, standing at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MovementConfig) -> Self {
        Self::with_character(Character::default(), config)
    }

    pub fn with_character(character: Character, config: MovementConfig) -> Self {
        Self {
            character,
            config,
            trail: SpeedTrail::default(),
        }
    }

    /// Create a controller standing at `position`.
    pub fn at_position(position: Vec3) -> Self {
        Self::with_character(Character::new(position), MovementConfig::default())
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Direct access for hosts that teleport or knock back the character.
    pub fn character_mut(&mut self) -> &mut Character {
        &mut self.character
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MovementConfig) {
        self.config = config;
    }

    pub fn get_position(&self) -> Vec3 {
        self.character.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.character.position = position;
    }

    pub fn get_velocity(&self) -> Vec3 {
        self.character.velocity
    }

    pub fn get_momentum(&self) -> Vec3 {
        self.character.momentum
    }

    /// Get the horizontal speed (XZ plane only).
    pub fn get_horizontal_speed(&self) -> f32 {
        self.character.horizontal_speed()
    }

    pub fn is_grounded(&self) -> bool {
        self.character.is_grounded()
    }

    pub fn mode(&self) -> MovementMode {
        self.character.mode
    }

    pub fn jump_count(&self) -> u8 {
        self.character.jump_count
    }

    pub fn facing_degrees(&self) -> f32 {
        self.character.facing_degrees
    }

    pub fn can_jump(&self) -> bool {
        jump::can_jump(&self.character, &self.config)
    }

    pub fn telemetry(&self) -> Telemetry {
        self.character.telemetry()
    }

    /// Put the character back at `position`, standing still.
    pub fn reset(&mut self, position: Vec3) {
        let body = self.character.body;
        let combat = self.character.combat;
        self.character = Character::new(position);
        self.character.body = body;
        self.character.combat = combat;
        self.trail.reset();
    }

    /// Press jump outside of [`update`](Self::update). The press is buffered,
    /// so a failed attempt can still fire on the next landing.
    pub fn request_jump(&mut self, sink: &mut dyn EventSink) -> Option<JumpOutcome> {
        self.character.timers.jump_buffer = self.config.jump_buffer_duration;
        self.try_jump(sink)
    }

    /// Request a ground pound outside of [`update`](Self::update).
    pub fn start_ground_pound(&mut self, sink: &mut dyn EventSink) -> bool {
        jump::start_ground_pound(&mut self.character, &self.config, sink)
    }

    /// Advance the simulation by one frame.
    pub fn update(
        &mut self,
        dt: f32,
        input: &InputSnapshot,
        world: &dyn GeometryQuery,
        sink: &mut dyn EventSink,
    ) -> FrameReport {
        let dt = self.sanitize_dt(dt);
        let input = input.sanitized();
        let mut report = FrameReport {
            dt,
            ..FrameReport::default()
        };

        self.character.timers.tick(dt);
        self.character.is_crouching = input.crouch_held;

        // Requests
        if input.ground_pound_requested {
            report.ground_pound_started = self.start_ground_pound(sink);
        }
        if input.jump_pressed {
            report.jump = self.request_jump(sink);
        }

        // Ground
        let touched_ground = self.resolve_ground(dt, world, sink, &mut report);

        // Mode
        match self.character.mode {
            MovementMode::GroundPounding => {
                self.update_ground_pound(touched_ground, sink, &mut report)
            }
            MovementMode::LongJumping => self.update_long_jump(dt, &input),
            MovementMode::Grounded | MovementMode::Airborne => self.update_normal(dt, &input),
        }

        resolver::apply_gravity(&mut self.character, &self.config, dt);

        self.resolve_wall(world);

        if let HorizontalStep::Blocked { normal } =
            resolver::integrate_horizontal(&mut self.character, &self.config, world, dt)
        {
            report.blocked_by = Some(normal);
        }
        if !touched_ground {
            resolver::integrate_vertical(&mut self.character, dt);
        }

        if self.trail.tick(dt, self.character.horizontal_speed(), &self.config) {
            sink.emit(MovementEvent::SpeedTrailTick, self.character.position);
        }

        self.character.debug_check_invariants(&self.config);
        report
    }

    fn sanitize_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt < 0.0 {
            warn!(dt, "invalid frame time, treating as zero");
            return 0.0;
        }
        if dt > self.config.max_frame_dt {
            trace!(dt, max = self.config.max_frame_dt, "long frame clamped");
        }
        dt.clamp(0.0, self.config.max_frame_dt)
    }

    /// Jump attempt that consumes the buffered press when it succeeds.
    fn try_jump(&mut self, sink: &mut dyn EventSink) -> Option<JumpOutcome> {
        let outcome = jump::request_jump(&mut self.character, &self.config, sink);
        if outcome.is_some() {
            self.character.timers.jump_buffer = 0.0;
        }
        outcome
    }

    /// Probe the ground and apply the snap and mode transitions.
    ///
    /// Returns `true` when the feet are on the ground this frame.
    fn resolve_ground(
        &mut self,
        dt: f32,
        world: &dyn GeometryQuery,
        sink: &mut dyn EventSink,
        report: &mut FrameReport,
    ) -> bool {
        let landing_velocity = self.character.velocity.y;
        let ground = resolver::probe_ground(&self.character, &self.config, world, dt);

        let touched = match ground {
            Some(ground_y) if self.character.velocity.y <= 0.0 => {
                resolver::snap_to_ground(&mut self.character, &self.config, ground_y);
                true
            }
            _ => false,
        };

        match (touched, self.character.mode) {
            (true, MovementMode::Airborne | MovementMode::LongJumping) => {
                self.character.mode = MovementMode::Grounded;
                self.land(landing_velocity, sink, report);
            }
            (false, MovementMode::Grounded) => {
                self.character.mode = MovementMode::Airborne;
                self.character.timers.coyote = self.config.coyote_duration;
                debug!(position = ?self.character.position, "left the ground, coyote time started");
            }
            // Ground pounds resolve their own impact in the mode update
            _ => {}
        }

        touched
    }

    fn land(&mut self, landing_velocity: f32, sink: &mut dyn EventSink, report: &mut FrameReport) {
        let hard_impact = landing_velocity < -self.config.hard_landing_speed;
        self.character.jump_count = 0;
        self.character.clear_wall_contact();
        report.landed = true;

        debug!(landing_velocity, hard_impact, "landed");
        sink.emit(MovementEvent::Landed { hard_impact }, self.character.position);

        if self.character.timers.jump_buffered() {
            debug!("buffered jump fired on landing");
            if let Some(outcome) = self.try_jump(sink) {
                report.jump = Some(outcome);
            }
        }
    }

    fn update_ground_pound(
        &mut self,
        touched_ground: bool,
        sink: &mut dyn EventSink,
        report: &mut FrameReport,
    ) {
        self.character.momentum *= self.config.ground_pound_damping;
        self.character.sync_horizontal_velocity();

        if touched_ground {
            jump::ground_pound_impact(&mut self.character, &self.config, sink);
            sink.emit(
                MovementEvent::Landed { hard_impact: true },
                self.character.position,
            );
            report.ground_pound_impact = true;
            report.landed = true;
        }
    }

    /// Long jumps keep their takeoff momentum with only light air steering.
    fn update_long_jump(&mut self, dt: f32, input: &InputSnapshot) {
        let direction = input.world_direction();
        if direction != Vec3::ZERO {
            let steering = self.config.air_acceleration * self.config.long_jump_steering * dt;
            self.character.momentum += direction * steering;
        }
        self.character.sync_horizontal_velocity();
    }

    /// Camera-relative running with smoothing, friction and facing.
    fn update_normal(&mut self, dt: f32, input: &InputSnapshot) {
        let config = &self.config;
        let character = &mut self.character;
        let grounded = character.mode.is_grounded();
        let direction = input.world_direction();

        if direction != Vec3::ZERO {
            let rate = if grounded {
                config.acceleration
            } else {
                config.air_acceleration
            };
            let target = direction * config.max_speed;
            character.momentum = character.momentum.lerp(target, (rate * dt).min(1.0));

            if character.momentum.length() > config.stop_speed {
                let target_facing = character.momentum.x.atan2(character.momentum.z).to_degrees();
                character.facing_degrees = lerp_angle_degrees(
                    character.facing_degrees,
                    target_facing,
                    (config.turn_rate * dt).min(1.0),
                );
            }
        } else {
            character.momentum *= if grounded {
                config.friction
            } else {
                config.air_friction
            };
            if character.momentum.length() < config.stop_speed {
                character.momentum = Vec3::ZERO;
            }
        }

        character.sync_horizontal_velocity();
    }

    /// Refresh the wall contact from this frame's probe.
    ///
    /// Walls only count while falling. Each frame the wall is seen reopens
    /// the kick window; once the probe loses it, the last contact stays
    /// usable until the window runs out.
    fn resolve_wall(&mut self, world: &dyn GeometryQuery) {
        if self.character.is_grounded() || self.character.velocity.y > 0.0 {
            self.character.clear_wall_contact();
            return;
        }

        match resolver::probe_wall(&self.character, &self.config, world) {
            Some(hit) => {
                if self.character.wall_contact.is_none() {
                    trace!(normal = ?hit.normal, "wall contact");
                }
                self.character.wall_contact = Some(WallContact { normal: hit.normal });
                self.character.timers.wall_kick = self.config.wall_kick_window;
            }
            None if self.character.timers.wall_kick_open() => {}
            None => self.character.clear_wall_contact(),
        }
    }
}

/// Interpolate between two yaw angles in degrees along the shorter arc.
///
/// The result is wrapped into `[-180, 180)`.
pub fn lerp_angle_degrees(from: f32, to: f32, t: f32) -> f32 {
    let mut diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 {
        diff -= 360.0;
    }
    wrap_degrees(from + diff * t)
}

fn wrap_degrees(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}
