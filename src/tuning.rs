//! Difficulty curve
//!
//! Level, fall speed and spawn cadence are pure functions of the score so a
//! run can be reasoned about (and tested) without running the loop.

use crate::consts::*;

/// Points needed per level
pub const POINTS_PER_LEVEL: u64 = 100;
/// Speed multiplier gained per level above 1
pub const SPEED_STEP_PER_LEVEL: f32 = 0.2;
/// Spawn interval shaved off per level above 1 (ms)
pub const SPAWN_STEP_PER_LEVEL_MS: f32 = 100.0;

/// Base fall speed (pixels per tick) before jitter and level bonus
pub const OBJECT_BASE_SPEED: f32 = 2.0;
/// Random extra fall speed, scaled by a jitter in [0, 1)
pub const OBJECT_SPEED_JITTER: f32 = 3.0;
/// Extra fall speed per level
pub const OBJECT_SPEED_PER_LEVEL: f32 = 0.5;

/// Level reached at a given score (starts at 1)
pub fn level_for_score(score: u64) -> u32 {
    (score / POINTS_PER_LEVEL) as u32 + 1
}

/// Global fall speed multiplier, capped at 3x
pub fn speed_multiplier_for_level(level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (1.0 + steps * SPEED_STEP_PER_LEVEL).min(MAX_SPEED_MULTIPLIER)
}

/// Milliseconds between spawns, floored at 800
pub fn spawn_interval_for_level(level: u32) -> f32 {
    let steps = level.saturating_sub(1) as f32;
    (BASE_SPAWN_INTERVAL_MS - steps * SPAWN_STEP_PER_LEVEL_MS).max(MIN_SPAWN_INTERVAL_MS)
}

/// Fall speed of a freshly spawned object
pub fn object_speed(level: u32, jitter: f32) -> f32 {
    OBJECT_BASE_SPEED + jitter * OBJECT_SPEED_JITTER + level as f32 * OBJECT_SPEED_PER_LEVEL
}

/// Pitch (Hz) of the catch chime for the score just reached
pub fn score_pitch(score: u64) -> f32 {
    440.0 + (score % 8) as f32 * 110.0
}
