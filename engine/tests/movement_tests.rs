//! Movement Tests - Jump Chains, Landing, Walls and Ground Pounds
//!
//! Drives the full controller frame by frame against box worlds.

use glam::Vec3;
use sky_hop_engine::input::InputSnapshot;
use sky_hop_engine::physics::{EmptyWorld, FnGeometry, RayHit, StaticWorld};
use sky_hop_engine::player::resolver::{self, HorizontalStep};
use sky_hop_engine::player::{
    Character, JumpOutcome, MovementConfig, MovementEvent, MovementMode,
    PlayerMovementController, JUMP_HEIGHT, TERMINAL_VELOCITY,
};

const DT: f32 = 1.0 / 60.0;

fn floor() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_box(Vec3::new(0.0, -0.5, 0.0), Vec3::new(400.0, 1.0, 400.0));
    world
}

fn run_forward() -> InputSnapshot {
    InputSnapshot::default().with_axes(0.0, 1.0)
}

fn idle() -> InputSnapshot {
    InputSnapshot::default()
}

fn airborne_at(position: Vec3, vertical_velocity: f32) -> PlayerMovementController {
    let mut character = Character::new(position);
    character.mode = MovementMode::Airborne;
    character.velocity.y = vertical_velocity;
    PlayerMovementController::with_character(character, MovementConfig::default())
}

// ============================================================================
// Jump chain
// ============================================================================

#[test]
fn test_triple_jump_sequence() {
    let world = floor();
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    // Build up speed well past the triple-jump threshold
    for _ in 0..40 {
        controller.update(DT, &run_forward(), &world, &mut events);
    }
    assert!(controller.get_horizontal_speed() >= 4.0);
    events.clear();

    let mut impulses = Vec::new();
    for _ in 0..3 {
        let report = controller.update(DT, &run_forward().with_jump(), &world, &mut events);
        match report.jump {
            Some(JumpOutcome::Staged { impulse, .. }) => impulses.push(impulse),
            other => panic!("expected a staged jump, got {other:?}"),
        }
        for _ in 0..3 {
            controller.update(DT, &run_forward(), &world, &mut events);
        }
        assert!(controller.get_horizontal_speed() >= 4.0);
    }

    assert!((impulses[0] - JUMP_HEIGHT).abs() < 1e-5);
    assert!((impulses[1] - JUMP_HEIGHT * 1.2).abs() < 1e-5);
    assert!((impulses[2] - JUMP_HEIGHT * 1.8).abs() < 1e-5);
    assert_eq!(controller.jump_count(), 3);

    let jumps: Vec<_> = events
        .iter()
        .filter(|event| !matches!(event, MovementEvent::SpeedTrailTick))
        .copied()
        .collect();
    assert_eq!(
        jumps,
        vec![
            MovementEvent::JumpPerformed { count: 1 },
            MovementEvent::JumpPerformed { count: 2 },
            MovementEvent::JumpPerformed { count: 3 },
            MovementEvent::TripleJumpPerformed,
        ]
    );
}

#[test]
fn test_finished_chain_ignores_more_presses() {
    let mut controller = airborne_at(Vec3::new(0.0, 20.0, 0.0), 1.0);
    controller.character_mut().jump_count = 3;
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_jump(), &EmptyWorld, &mut events);
    assert_eq!(report.jump, None);
    assert_eq!(controller.jump_count(), 3);
    assert!(events.is_empty());
}

#[test]
fn test_slow_third_jump_is_a_double() {
    let mut controller = airborne_at(Vec3::new(0.0, 20.0, 0.0), 0.5);
    controller.character_mut().jump_count = 2;
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_jump(), &EmptyWorld, &mut events);
    assert_eq!(
        report.jump,
        Some(JumpOutcome::Staged {
            count: 2,
            impulse: JUMP_HEIGHT * 1.2
        })
    );
    assert_eq!(controller.jump_count(), 2);
    assert!(!events.contains(&MovementEvent::TripleJumpPerformed));
}

// ============================================================================
// Ground contact
// ============================================================================

#[test]
fn test_fast_fall_snaps_to_ground() {
    // Only downward rays see the ground plane at y = 0
    let world = FnGeometry(|origin: Vec3, direction: Vec3, max: f32| {
        let reaches = origin.y >= 0.0 && origin.y <= max;
        (direction.y < -0.5 && reaches)
            .then(|| RayHit::new(Vec3::new(origin.x, 0.0, origin.z), Vec3::Y, origin.y))
    });
    let mut controller = airborne_at(Vec3::new(0.0, 0.95, 0.0), -12.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle(), &world, &mut events);

    assert!(report.landed);
    assert!((controller.get_position().y - 0.8).abs() < 1e-5);
    assert_eq!(controller.get_velocity().y, 0.0);
    assert!(controller.is_grounded());
    assert_eq!(events, vec![MovementEvent::Landed { hard_impact: true }]);
}

#[test]
fn test_landing_resets_chain_before_buffered_jump() {
    let world = floor();
    // Chain finished, feet 0.4 above the floor, falling
    let mut controller = airborne_at(Vec3::new(0.0, 1.2, 0.0), -3.0);
    controller.character_mut().jump_count = 3;
    let mut events: Vec<MovementEvent> = Vec::new();

    // Too late for another jump: dropped but buffered
    let report = controller.update(DT, &idle().with_jump(), &world, &mut events);
    assert_eq!(report.jump, None);

    let mut landing = None;
    for _ in 0..10 {
        let report = controller.update(DT, &idle(), &world, &mut events);
        if report.landed {
            landing = Some(report);
            break;
        }
    }
    let landing = landing.expect("character should land inside the buffer window");

    assert_eq!(
        landing.jump,
        Some(JumpOutcome::Staged {
            count: 1,
            impulse: JUMP_HEIGHT
        })
    );
    assert_eq!(controller.jump_count(), 1);
    assert_eq!(controller.mode(), MovementMode::Airborne);
    assert_eq!(
        events,
        vec![
            MovementEvent::Landed { hard_impact: false },
            MovementEvent::JumpPerformed { count: 1 },
        ]
    );
}

#[test]
fn test_stale_buffer_does_not_fire() {
    let world = floor();
    let mut controller = airborne_at(Vec3::new(0.0, 3.0, 0.0), 0.0);
    controller.character_mut().jump_count = 3;
    let mut events: Vec<MovementEvent> = Vec::new();

    controller.update(DT, &idle().with_jump(), &world, &mut events);
    for _ in 0..120 {
        controller.update(DT, &idle(), &world, &mut events);
    }

    assert!(controller.is_grounded());
    assert_eq!(controller.jump_count(), 0);
    assert!(!events.iter().any(|e| matches!(e, MovementEvent::JumpPerformed { .. })));
}

#[test]
fn test_coyote_jump_counts_as_grounded() {
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 10.0, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    // Nothing underneath: the character walks off into coyote time
    controller.update(DT, &idle(), &EmptyWorld, &mut events);
    assert_eq!(controller.mode(), MovementMode::Airborne);
    assert!(controller.character().timers.coyote > 0.0);

    let report = controller.update(DT, &idle().with_jump(), &EmptyWorld, &mut events);
    assert_eq!(
        report.jump,
        Some(JumpOutcome::Staged {
            count: 1,
            impulse: JUMP_HEIGHT
        })
    );
    assert_eq!(controller.jump_count(), 1);
}

#[test]
fn test_terminal_velocity_holds_every_frame() {
    let mut controller = airborne_at(Vec3::new(0.0, 500.0, 0.0), 0.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    for _ in 0..300 {
        controller.update(DT, &idle(), &EmptyWorld, &mut events);
        assert!(controller.get_velocity().y >= TERMINAL_VELOCITY);
    }
    assert_eq!(controller.get_velocity().y, TERMINAL_VELOCITY);
}

// ============================================================================
// Walls
// ============================================================================

#[test]
fn test_slide_along_wall_halves_speed() {
    let config = MovementConfig::default();
    let mut world = StaticWorld::new();
    world.add_aabb(sky_hop_engine::physics::Aabb::new(
        Vec3::new(0.45, 0.0, -2.0),
        Vec3::new(1.45, 4.0, 2.0),
    ));

    let mut character = Character::new(Vec3::new(0.0, 0.8, 0.0));
    character.momentum = Vec3::new(5.0, 0.0, 0.0);
    character.velocity = character.momentum;

    let step = resolver::integrate_horizontal(&mut character, &config, &world, DT);

    assert_eq!(step, HorizontalStep::Blocked { normal: Vec3::NEG_X });
    assert!(character.momentum.x.abs() < 1e-6);
    assert!((character.momentum.z.abs() - 2.5).abs() < 1e-5);
    assert_eq!(character.position, Vec3::new(0.0, 0.8, 0.0));
}

#[test]
fn test_running_into_wall_never_penetrates() {
    let mut world = floor();
    world.add_aabb(sky_hop_engine::physics::Aabb::new(
        Vec3::new(-100.0, 0.0, 3.0),
        Vec3::new(100.0, 4.0, 4.0),
    ));
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    for _ in 0..180 {
        controller.update(DT, &run_forward(), &world, &mut events);
        assert!(controller.get_position().z < 3.0);
    }
}

#[test]
fn test_wall_kick_beats_staged_jump() {
    let mut world = StaticWorld::new();
    world.add_aabb(sky_hop_engine::physics::Aabb::new(
        Vec3::new(0.6, -20.0, -5.0),
        Vec3::new(1.6, 20.0, 5.0),
    ));
    let mut controller = airborne_at(Vec3::new(0.3, 5.0, 0.0), -1.0);
    controller.character_mut().jump_count = 1;
    let mut events: Vec<MovementEvent> = Vec::new();

    // Falling beside the wall: contact recorded
    controller.update(DT, &idle(), &world, &mut events);
    assert!(controller.character().can_wall_kick());

    let report = controller.update(DT, &idle().with_jump(), &world, &mut events);
    assert_eq!(report.jump, Some(JumpOutcome::WallKick));
    assert_eq!(controller.jump_count(), 1);
    assert!(controller.get_velocity().x < -9.0);
    assert!(controller.get_velocity().y > 0.0);
    assert!(!controller.character().can_wall_kick());
    assert_eq!(events, vec![MovementEvent::WallKickPerformed]);
}

#[test]
fn test_wall_ignored_while_ascending() {
    let mut world = StaticWorld::new();
    world.add_aabb(sky_hop_engine::physics::Aabb::new(
        Vec3::new(0.6, -20.0, -5.0),
        Vec3::new(1.6, 20.0, 5.0),
    ));
    let mut controller = airborne_at(Vec3::new(0.3, 5.0, 0.0), 6.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    controller.update(DT, &idle(), &world, &mut events);
    assert!(!controller.character().can_wall_kick());
    assert!(controller.character().wall_contact.is_none());
}

fn wall_at_positive_x() -> StaticWorld {
    let mut world = StaticWorld::new();
    world.add_aabb(sky_hop_engine::physics::Aabb::new(
        Vec3::new(0.6, -20.0, -5.0),
        Vec3::new(1.6, 20.0, 5.0),
    ));
    world
}

/// Falls beside the wall while drifting away from it, with the jump chain
/// spent, and returns on the last frame the wall is still in reach.
fn drifting_off_wall(world: &StaticWorld) -> PlayerMovementController {
    let mut controller = airborne_at(Vec3::new(0.3, 5.0, 0.0), -1.0);
    {
        let character = controller.character_mut();
        character.jump_count = 3;
        character.momentum = Vec3::new(-8.0, 0.0, 0.0);
        character.velocity.x = -8.0;
    }
    let mut events: Vec<MovementEvent> = Vec::new();

    for _ in 0..30 {
        controller.update(DT, &idle(), world, &mut events);
        let next = resolver::probe_wall(controller.character(), controller.config(), world);
        if next.is_none() {
            break;
        }
    }
    assert!(controller.character().can_wall_kick());
    assert!(!controller.can_jump());
    controller
}

#[test]
fn test_wall_kick_grace_after_leaving_wall() {
    let world = wall_at_positive_x();

    for frames_after_contact in [2, 8] {
        let mut controller = drifting_off_wall(&world);
        let mut events: Vec<MovementEvent> = Vec::new();

        for _ in 1..frames_after_contact {
            controller.update(DT, &idle(), &world, &mut events);
            assert!(controller.character().wall_contact.is_some());
        }
        let report = controller.update(DT, &idle().with_jump(), &world, &mut events);

        assert_eq!(report.jump, Some(JumpOutcome::WallKick), "{frames_after_contact} frames");
        assert!(controller.get_velocity().y > 0.0);
        assert!(events.contains(&MovementEvent::WallKickPerformed));
    }
}

#[test]
fn test_wall_kick_window_expires() {
    let world = wall_at_positive_x();
    let mut controller = drifting_off_wall(&world);
    let mut events: Vec<MovementEvent> = Vec::new();

    // 12 frames is 0.2 s, past the 0.15 s window
    for _ in 0..12 {
        controller.update(DT, &idle(), &world, &mut events);
    }
    assert!(controller.character().wall_contact.is_none());
    assert!(!controller.character().can_wall_kick());

    let report = controller.update(DT, &idle().with_jump(), &world, &mut events);
    assert_eq!(report.jump, None);
    assert!(controller.get_velocity().y < 0.0);
    assert!(!events.contains(&MovementEvent::WallKickPerformed));
}

// ============================================================================
// Long jump
// ============================================================================

#[test]
fn test_long_jump_from_run() {
    let world = floor();
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    for _ in 0..40 {
        controller.update(DT, &run_forward(), &world, &mut events);
    }
    let speed_before = controller.get_horizontal_speed();
    events.clear();

    let report = controller.update(DT, &run_forward().with_crouch().with_jump(), &world, &mut events);
    assert_eq!(report.jump, Some(JumpOutcome::LongJump));
    assert_eq!(controller.mode(), MovementMode::LongJumping);
    assert!(controller.get_horizontal_speed() > speed_before);
    // Capped at 1.5x run speed, plus one frame of air steering
    assert!(controller.get_horizontal_speed() < 8.0 * 1.5 + 0.1);
    assert!(events.contains(&MovementEvent::LongJumpStarted));

    let mut landed = false;
    for _ in 0..120 {
        if controller.update(DT, &run_forward(), &world, &mut events).landed {
            landed = true;
            break;
        }
    }
    assert!(landed);
    assert_eq!(controller.mode(), MovementMode::Grounded);
    assert_eq!(controller.jump_count(), 0);
}

#[test]
fn test_standing_crouch_jump_is_normal() {
    let world = floor();
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_crouch().with_jump(), &world, &mut events);
    assert!(matches!(report.jump, Some(JumpOutcome::Staged { count: 1, .. })));
    assert_eq!(controller.mode(), MovementMode::Airborne);
}

// ============================================================================
// Ground pound
// ============================================================================

#[test]
fn test_ground_pound_is_idempotent() {
    let world = floor();
    let mut controller = airborne_at(Vec3::new(0.0, 10.0, 0.0), 1.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_ground_pound(), &world, &mut events);
    assert!(report.ground_pound_started);
    assert_eq!(controller.mode(), MovementMode::GroundPounding);
    let velocity = controller.get_velocity();

    let report = controller.update(DT, &idle().with_ground_pound(), &world, &mut events);
    assert!(!report.ground_pound_started);
    assert_eq!(controller.get_velocity().y, velocity.y);
    assert_eq!(
        events
            .iter()
            .filter(|e| **e == MovementEvent::GroundPoundStarted)
            .count(),
        1
    );
}

#[test]
fn test_ground_pound_needs_air() {
    let world = floor();
    let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_ground_pound(), &world, &mut events);
    assert!(!report.ground_pound_started);
    assert!(controller.is_grounded());
}

#[test]
fn test_ground_pound_impact_bounce_is_fresh() {
    let world = floor();
    let mut controller = airborne_at(Vec3::new(0.0, 4.0, 0.0), 0.0);
    controller.character_mut().jump_count = 2;
    let mut events: Vec<MovementEvent> = Vec::new();

    controller.update(DT, &idle().with_ground_pound(), &world, &mut events);

    let mut impact = false;
    for _ in 0..30 {
        if controller.update(DT, &idle(), &world, &mut events).ground_pound_impact {
            impact = true;
            break;
        }
    }
    assert!(impact);
    assert_eq!(controller.mode(), MovementMode::Airborne);
    assert_eq!(controller.jump_count(), 0);
    assert!(controller.get_velocity().y > 0.0);
    assert!(events.contains(&MovementEvent::GroundPoundImpact));
    assert!(events.contains(&MovementEvent::Landed { hard_impact: true }));

    // A press during the bounce is a first jump, not a continuation
    let report = controller.update(DT, &idle().with_jump(), &world, &mut events);
    assert!(matches!(report.jump, Some(JumpOutcome::Staged { count: 1, .. })));
    assert_eq!(controller.jump_count(), 1);
}

#[test]
fn test_jump_ignored_while_pounding() {
    let mut controller = airborne_at(Vec3::new(0.0, 50.0, 0.0), 0.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    controller.update(DT, &idle().with_ground_pound(), &EmptyWorld, &mut events);
    let report = controller.update(DT, &idle().with_jump(), &EmptyWorld, &mut events);

    assert_eq!(report.jump, None);
    assert_eq!(controller.mode(), MovementMode::GroundPounding);
}

#[test]
fn test_wall_kick_out_of_ground_pound() {
    let world = wall_at_positive_x();
    let mut controller = airborne_at(Vec3::new(0.3, 10.0, 0.0), -1.0);
    let mut events: Vec<MovementEvent> = Vec::new();

    let report = controller.update(DT, &idle().with_ground_pound(), &world, &mut events);
    assert!(report.ground_pound_started);
    assert!(controller.character().can_wall_kick());

    let report = controller.update(DT, &idle().with_jump(), &world, &mut events);
    assert_eq!(report.jump, Some(JumpOutcome::WallKick));
    assert_eq!(controller.mode(), MovementMode::Airborne);
    assert!(controller.get_velocity().y > 0.0);
    assert!(controller.get_velocity().x < -9.0);
    assert_eq!(
        events,
        vec![MovementEvent::GroundPoundStarted, MovementEvent::WallKickPerformed]
    );
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_same_inputs_same_result() {
    let world = floor();
    let script: Vec<InputSnapshot> = (0..400)
        .map(|frame| {
            let mut input = run_forward().with_camera_yaw((frame as f32) * 0.7);
            if frame % 50 == 10 || frame % 50 == 18 {
                input = input.with_jump();
            }
            if frame % 97 == 40 {
                input = input.with_ground_pound();
            }
            input
        })
        .collect();

    let run = || {
        let mut controller = PlayerMovementController::at_position(Vec3::new(0.0, 0.8, 0.0));
        let mut events: Vec<(MovementEvent, Vec3)> = Vec::new();
        for input in &script {
            controller.update(DT, input, &world, &mut events);
        }
        (controller.character().clone(), events)
    };

    let (first_state, first_events) = run();
    let (second_state, second_events) = run();
    assert_eq!(first_state, second_state);
    assert_eq!(first_events, second_events);
}
