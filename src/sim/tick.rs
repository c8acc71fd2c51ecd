//! Simulation tick
//!
//! Core game loop that advances the run by one host frame. Movement is per
//! tick; only the spawn timer consumes the frame's elapsed milliseconds.

use glam::Vec2;
use rand::Rng;

use super::state::{
    FallingObject, GameEvent, GamePhase, GameState, ObjectKind, Particle, ParticleColor,
};
use crate::consts::*;
use crate::tuning;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Pause toggle (one-shot)
    pub pause: bool,
}

impl TickInput {
    /// Unit direction from the held keys (opposites cancel)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    // Pause toggle consumes the tick
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                let _ = state.pause();
                return;
            }
            GamePhase::Paused => {
                let _ = state.resume();
                return;
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    // Zero, negative and NaN deltas are no-op ticks
    if !(dt_ms > 0.0) {
        return;
    }

    move_basket(state, input);
    advance_objects(state);

    // Catches later in the same pass still count toward the final score
    let run_ended = state.phase == GamePhase::GameOver;

    if let Some(level) = state.stats.refresh_level() {
        log::debug!(
            "Level {} (speed x{:.1}, spawn every {}ms)",
            level,
            state.stats.speed_multiplier,
            state.stats.spawn_interval
        );
        if !run_ended {
            state.emit(GameEvent::LevelUp { level });
        }
    }

    if run_ended {
        let final_score = state.stats.score;
        log::info!("Game over with {} points", final_score);
        state.emit(GameEvent::GameOver { final_score });
    }

    advance_particles(state);

    // A run that just ended spawns nothing more
    if state.phase == GamePhase::Playing {
        state.spawn_timer += dt_ms;
        if state.spawn_timer >= state.stats.spawn_interval {
            spawn_object(state);
            state.spawn_timer = 0.0;
        }
    }
}

fn move_basket(state: &mut GameState, input: &TickInput) {
    let basket = &mut state.basket;
    basket.pos += input.direction() * basket.speed;
    basket.clamp_to(state.field);
}

/// Move every object, then resolve catches and misses
fn advance_objects(state: &mut GameState) {
    let basket = state.basket.rect();
    let multiplier = state.stats.speed_multiplier;

    for id in state.objects.ids() {
        let Some(object) = state.objects.get_mut(id) else {
            continue;
        };
        object.pos.y += object.speed * multiplier;
        object.rotation += object.rotation_speed;

        if object.rect().overlaps(&basket) {
            let (kind, center) = (object.kind, object.center());
            state.objects.remove(id);
            resolve_catch(state, kind, center);
            continue;
        }

        if object.pos.y > state.field.y {
            state.objects.remove(id);
        }
    }
}

fn resolve_catch(state: &mut GameState, kind: ObjectKind, at: Vec2) {
    match kind {
        ObjectKind::Collectible => {
            state.stats.score += POINTS_PER_CATCH;
            let score = state.stats.score;
            state.emit(GameEvent::ScorePoint {
                score,
                pitch: tuning::score_pitch(score),
            });
            spawn_burst(state, at, COLLECT_BURST, ParticleColor::Positive);
        }
        ObjectKind::Hazard => {
            // The run already ended earlier in this pass
            if state.stats.lives == 0 {
                return;
            }
            state.stats.lives -= 1;
            let lives = state.stats.lives;
            state.emit(GameEvent::LifeLost { lives });
            spawn_burst(state, at, HAZARD_BURST, ParticleColor::Negative);

            // GameOver is announced once the whole pass is resolved
            if lives == 0 {
                state.phase = GamePhase::GameOver;
            }
        }
    }
}

fn spawn_burst(state: &mut GameState, at: Vec2, count: usize, color: ParticleColor) {
    for _ in 0..count {
        if state.particles.len() >= state.particle_cap {
            break;
        }
        let rng = &mut state.rng;
        let vel = Vec2::new(
            rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
            rng.random_range(-PARTICLE_MAX_SPEED..PARTICLE_MAX_SPEED),
        );
        let size = PARTICLE_MIN_SIZE + rng.random::<f32>() * PARTICLE_SIZE_RANGE;
        state.particles.insert(Particle {
            pos: at,
            vel,
            life: 1.0,
            decay: PARTICLE_DECAY,
            color,
            size,
        });
    }
}

fn advance_particles(state: &mut GameState) {
    state.particles.retain(|particle| {
        particle.pos += particle.vel;
        particle.vel.y += PARTICLE_GRAVITY;
        particle.life -= particle.decay;
        particle.life > 0.0
    });
}

/// Drop one new object above the top of the field
pub fn spawn_object(state: &mut GameState) {
    let rng = &mut state.rng;
    let kind = if rng.random_bool(COLLECTIBLE_CHANCE) {
        ObjectKind::Collectible
    } else {
        ObjectKind::Hazard
    };
    let max_x = (state.field.x - OBJECT_SIZE).max(0.0);
    let x = rng.random::<f32>() * max_x;
    let speed = tuning::object_speed(state.stats.level, rng.random::<f32>());
    let rotation_speed = rng.random_range(-MAX_ROTATION_SPEED..MAX_ROTATION_SPEED);

    let mut object = FallingObject::new(Vec2::new(x, -OBJECT_SIZE), kind, speed);
    object.rotation_speed = rotation_speed;
    state.objects.insert(object);
}

/// Idle/demo mode: steer under the nearest collectible, away from hazards
pub fn demo_input(state: &GameState) -> TickInput {
    let basket = state.basket.rect();
    let basket_center = basket.center().x;

    // Hazards about to land on the basket take priority
    let threat = state
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Hazard)
        .filter(|o| o.pos.y + o.size.y > basket.y - 120.0 && o.pos.y < basket.bottom())
        .find(|o| o.pos.x < basket.right() + 10.0 && o.pos.x + o.size.x > basket.x - 10.0);

    if let Some(hazard) = threat {
        let dodge_right = hazard.center().x < basket_center;
        let blocked = if dodge_right {
            basket.right() >= state.field.x - 1.0
        } else {
            basket.x <= 1.0
        };
        let go_right = dodge_right != blocked;
        return TickInput {
            left: !go_right,
            right: go_right,
            ..Default::default()
        };
    }

    // Lowest collectible that is still above the basket
    let target = state
        .objects
        .iter()
        .filter(|o| o.kind == ObjectKind::Collectible && o.pos.y < basket.bottom())
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let mut input = TickInput::default();
    if let Some(object) = target {
        let dx = object.center().x - basket_center;
        if dx.abs() > state.basket.speed / 2.0 {
            input.left = dx < 0.0;
            input.right = dx > 0.0;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::RunStats;
    use proptest::prelude::*;

    const FRAME_MS: f32 = 16.0;

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345);
        state.start();
        state
    }

    /// Object parked on top of the basket so it is caught on the next tick
    fn drop_on_basket(state: &mut GameState, kind: ObjectKind) {
        let mut object = FallingObject::new(state.basket.pos, kind, 0.0);
        object.rotation_speed = 0.05;
        state.objects.insert(object);
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut state = GameState::new(12345);
        tick(&mut state, &TickInput::default(), 5000.0);
        assert_eq!(state.phase, GamePhase::Menu);
        assert!(state.objects.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_non_positive_dt_is_noop() {
        let mut state = playing_state();
        drop_on_basket(&mut state, ObjectKind::Collectible);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        let before = state.basket.pos;

        tick(&mut state, &input, 0.0);
        tick(&mut state, &input, -16.0);
        tick(&mut state, &input, f32::NAN);

        assert_eq!(state.basket.pos, before);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);
    }

    #[test]
    fn test_catch_collectible_scores() {
        let mut state = playing_state();
        drop_on_basket(&mut state, ObjectKind::Collectible);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.stats.score, 10);
        assert!(state.objects.is_empty());
        // Burst is advanced once in the same tick but none has decayed yet
        assert_eq!(state.particles.len(), 8);
        assert!(
            state
                .particles
                .iter()
                .all(|p| p.color == ParticleColor::Positive)
        );
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::ScorePoint {
                score: 10,
                pitch: 660.0
            }]
        );
    }

    #[test]
    fn test_catch_hazard_costs_life() {
        let mut state = playing_state();
        drop_on_basket(&mut state, ObjectKind::Hazard);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.stats.lives, 2);
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.particles.len(), 12);
        assert!(
            state
                .particles
                .iter()
                .all(|p| p.color == ParticleColor::Negative)
        );
        assert_eq!(state.drain_events(), vec![GameEvent::LifeLost { lives: 2 }]);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_three_hazards_end_the_run() {
        let mut state = playing_state();
        for _ in 0..3 {
            drop_on_basket(&mut state, ObjectKind::Hazard);
            tick(&mut state, &TickInput::default(), FRAME_MS);
        }
        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);

        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver { final_score: 0 })
        );

        // Nothing moves once the run is over
        drop_on_basket(&mut state, ObjectKind::Collectible);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.stats.score, 0);
    }

    #[test]
    fn test_simultaneous_catches_all_count() {
        let mut state = playing_state();
        drop_on_basket(&mut state, ObjectKind::Collectible);
        drop_on_basket(&mut state, ObjectKind::Collectible);
        drop_on_basket(&mut state, ObjectKind::Hazard);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.stats.score, 20);
        assert_eq!(state.stats.lives, 2);
        assert!(state.objects.is_empty());
        assert_eq!(state.particles.len(), 8 + 8 + 12);
    }

    #[test]
    fn test_game_over_reports_score_from_whole_pass() {
        let mut state = playing_state();
        state.stats.lives = 1;
        state.stats.score = 90;
        drop_on_basket(&mut state, ObjectKind::Hazard);
        drop_on_basket(&mut state, ObjectKind::Collectible);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.stats.score, 100);
        assert_eq!(state.stats.level, 2);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::LifeLost { lives: 0 },
                GameEvent::ScorePoint {
                    score: 100,
                    pitch: tuning::score_pitch(100)
                },
                GameEvent::GameOver { final_score: 100 },
            ]
        );
    }

    #[test]
    fn test_hazards_after_last_life_are_ignored() {
        let mut state = playing_state();
        state.stats.lives = 1;
        drop_on_basket(&mut state, ObjectKind::Hazard);
        drop_on_basket(&mut state, ObjectKind::Hazard);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.stats.lives, 0);
        assert_eq!(state.particles.len(), 12);
        assert!(state.objects.is_empty());
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::LifeLost { lives: 0 },
                GameEvent::GameOver { final_score: 0 },
            ]
        );
    }

    #[test]
    fn test_objects_fall_and_leave_the_field() {
        let mut state = playing_state();
        let mut object = FallingObject::new(Vec2::new(0.0, 100.0), ObjectKind::Hazard, 4.0);
        object.rotation_speed = 0.1;
        let id = state.objects.insert(object);
        // Keep the basket away from the object's column
        state.basket.pos.x = 700.0;

        tick(&mut state, &TickInput::default(), FRAME_MS);
        let moved = state.objects.get(id).map(|o| (o.pos.y, o.rotation));
        assert_eq!(moved, Some((104.0, 0.1)));

        if let Some(o) = state.objects.get_mut(id) {
            o.pos.y = state.field.y - 1.0;
        }
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(!state.objects.contains(id));
        assert_eq!(state.stats.lives, 3);
    }

    #[test]
    fn test_speed_multiplier_applies_to_fall() {
        let mut state = playing_state();
        state.stats.speed_multiplier = 2.0;
        state.basket.pos.x = 700.0;
        let id = state.objects.insert(FallingObject::new(
            Vec2::new(0.0, 0.0),
            ObjectKind::Collectible,
            3.0,
        ));
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.objects.get(id).map(|o| o.pos.y), Some(6.0));
    }

    #[test]
    fn test_level_up_event() {
        let mut state = playing_state();
        state.stats.score = 90;
        drop_on_basket(&mut state, ObjectKind::Collectible);

        tick(&mut state, &TickInput::default(), FRAME_MS);

        assert_eq!(state.stats.level, 2);
        assert!((state.stats.speed_multiplier - 1.2).abs() < 1e-6);
        assert_eq!(state.stats.spawn_interval, 1900.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_particles_fall_decay_and_expire() {
        let mut state = playing_state();
        state.particles.insert(Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -2.0),
            life: 0.05,
            decay: 0.02,
            color: ParticleColor::Positive,
            size: 3.0,
        });

        tick(&mut state, &TickInput::default(), FRAME_MS);
        let Some(p) = state.particles.iter().next().cloned() else {
            panic!("particle expired too early");
        };
        assert_eq!(p.pos, Vec2::new(1.0, -2.0));
        assert!((p.vel.y - -1.7).abs() < 1e-5);
        assert!((p.life - 0.03).abs() < 1e-5);

        tick(&mut state, &TickInput::default(), FRAME_MS);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_particle_cap_limits_bursts() {
        let mut state = playing_state();
        state.particle_cap = 5;
        drop_on_basket(&mut state, ObjectKind::Hazard);
        tick(&mut state, &TickInput::default(), FRAME_MS);
        assert_eq!(state.particles.len(), 5);
        assert_eq!(state.stats.lives, 2);
    }

    #[test]
    fn test_spawn_accumulator() {
        let mut state = playing_state();
        tick(&mut state, &TickInput::default(), 1500.0);
        assert!(state.objects.is_empty());
        assert_eq!(state.spawn_timer, 1500.0);

        tick(&mut state, &TickInput::default(), 500.0);
        assert_eq!(state.objects.len(), 1);
        assert_eq!(state.spawn_timer, 0.0);

        let object = state.objects.iter().next().cloned();
        let Some(object) = object else {
            panic!("spawned object missing");
        };
        assert_eq!(object.pos.y, -OBJECT_SIZE);
        assert!(object.pos.x >= 0.0 && object.pos.x < FIELD_WIDTH - OBJECT_SIZE);
        assert!(object.speed >= 2.5 && object.speed < 5.5);
        assert!(object.rotation_speed.abs() <= MAX_ROTATION_SPEED);
    }

    #[test]
    fn test_spawn_mix_is_mostly_collectibles() {
        let mut state = playing_state();
        for _ in 0..1000 {
            spawn_object(&mut state);
        }
        let collectibles = state
            .objects
            .iter()
            .filter(|o| o.kind == ObjectKind::Collectible)
            .count();
        assert!((720..=880).contains(&collectibles), "got {collectibles}");
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = playing_state();
        state.basket.pos.x = 700.0;
        let id = state.objects.insert(FallingObject::new(
            Vec2::new(0.0, 50.0),
            ObjectKind::Collectible,
            3.0,
        ));
        tick(&mut state, &TickInput::default(), 700.0);
        let frozen_y = state.objects.get(id).map(|o| o.pos.y);
        let frozen_timer = state.spawn_timer;

        let toggle = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Paused);

        for _ in 0..50 {
            tick(&mut state, &TickInput::default(), 1000.0);
        }
        assert_eq!(state.objects.get(id).map(|o| o.pos.y), frozen_y);
        assert_eq!(state.spawn_timer, frozen_timer);
        assert_eq!(state.objects.len(), 1);

        tick(&mut state, &toggle, FRAME_MS);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.spawn_timer, frozen_timer);

        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.spawn_timer, frozen_timer + 100.0);
        assert_eq!(
            state.objects.get(id).map(|o| o.pos.y),
            frozen_y.map(|y| y + 3.0)
        );
    }

    #[test]
    fn test_restart_after_game_over_resets_run() {
        let mut state = playing_state();
        state.stats.score = 340;
        state.stats.refresh_level();
        for _ in 0..3 {
            drop_on_basket(&mut state, ObjectKind::Hazard);
            tick(&mut state, &TickInput::default(), 900.0);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.particles.is_empty());

        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats, RunStats::new());
        assert!(state.objects.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.spawn_timer, 0.0);
        assert_eq!(state.basket.pos, Vec2::new(360.0, 520.0));
    }

    #[test]
    fn test_basket_moves_and_clamps() {
        // 1ms frames keep the spawner quiet
        const FRAME_MS: f32 = 1.0;
        let mut state = playing_state();
        let right = TickInput {
            right: true,
            up: true,
            ..Default::default()
        };
        tick(&mut state, &right, FRAME_MS);
        assert_eq!(state.basket.pos, Vec2::new(368.0, 512.0));

        for _ in 0..200 {
            tick(&mut state, &right, FRAME_MS);
        }
        assert_eq!(state.basket.pos, Vec2::new(720.0, 300.0));

        let down_left = TickInput {
            left: true,
            down: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &down_left, FRAME_MS);
        }
        assert_eq!(state.basket.pos, Vec2::new(0.0, 540.0));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start();
        state2.start();

        for i in 0..600 {
            let input = TickInput {
                left: i % 7 < 3,
                right: i % 5 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, 100.0);
            tick(&mut state2, &input, 100.0);
        }

        assert_eq!(state1.stats, state2.stats);
        assert_eq!(state1.objects.len(), state2.objects.len());
        assert_eq!(state1.basket.pos, state2.basket.pos);
    }

    #[test]
    fn test_demo_input_chases_collectible() {
        let mut state = playing_state();
        state.objects.insert(FallingObject::new(
            Vec2::new(50.0, 100.0),
            ObjectKind::Collectible,
            2.0,
        ));
        let input = demo_input(&state);
        assert!(input.left && !input.right);
    }

    #[test]
    fn test_demo_input_dodges_hazard() {
        let mut state = playing_state();
        // Hazard just above the basket, slightly left of its centre
        let basket = state.basket.rect();
        state.objects.insert(FallingObject::new(
            Vec2::new(basket.x, basket.y - 50.0),
            ObjectKind::Hazard,
            2.0,
        ));
        let input = demo_input(&state);
        assert!(input.right && !input.left);
    }

    proptest! {
        #[test]
        fn basket_stays_in_bounds(
            moves in proptest::collection::vec((any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()), 1..300),
            speed in 1.0f32..500.0,
        ) {
            let mut state = playing_state();
            state.basket.speed = speed;
            for (left, right, up, down) in moves {
                let input = TickInput { left, right, up, down, pause: false };
                tick(&mut state, &input, FRAME_MS);
                if state.phase != GamePhase::Playing {
                    break;
                }
                let b = &state.basket;
                prop_assert!(b.pos.x >= 0.0 && b.pos.x <= state.field.x - b.size.x);
                prop_assert!(b.pos.y >= state.field.y / 2.0 && b.pos.y <= state.field.y - b.size.y);
            }
        }

        #[test]
        fn score_and_lives_move_in_fixed_steps(kinds in proptest::collection::vec(any::<bool>(), 1..10)) {
            let mut state = playing_state();
            for collectible in kinds {
                if state.phase != GamePhase::Playing {
                    break;
                }
                let before = state.stats.clone();
                let kind = if collectible { ObjectKind::Collectible } else { ObjectKind::Hazard };
                drop_on_basket(&mut state, kind);
                tick(&mut state, &TickInput::default(), FRAME_MS);
                if collectible {
                    prop_assert_eq!(state.stats.score, before.score + 10);
                    prop_assert_eq!(state.stats.lives, before.lives);
                } else {
                    prop_assert_eq!(state.stats.score, before.score);
                    prop_assert_eq!(state.stats.lives, before.lives - 1);
                }
                prop_assert!(state.stats.level >= before.level);
            }
        }
    }
}
