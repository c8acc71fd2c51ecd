//! Basket Catch - a falling-object arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, game state)
//! - `game`: Host driver wiring the simulation to its collaborators
//! - `platform`: Collaborator seams plus browser implementations
//! - `persistence`: Key/value storage backends
//! - `tuning`: Difficulty curve and score tuning

pub mod audio;
pub mod game;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScores;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
///
/// Distances are in play-field pixels, movement is per tick, timers are in
/// milliseconds.
pub mod consts {
    /// Play-field dimensions
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Basket defaults
    pub const BASKET_WIDTH: f32 = 80.0;
    pub const BASKET_HEIGHT: f32 = 60.0;
    pub const BASKET_SPEED: f32 = 8.0;
    /// Distance of the basket's top edge from the field bottom at start
    pub const BASKET_START_OFFSET: f32 = 80.0;

    /// Falling object size (square)
    pub const OBJECT_SIZE: f32 = 40.0;
    /// Probability that a spawned object is a collectible
    pub const COLLECTIBLE_CHANCE: f64 = 0.8;
    /// Maximum rotation speed magnitude (radians per tick)
    pub const MAX_ROTATION_SPEED: f32 = 0.1;

    /// Particle physics
    pub const PARTICLE_GRAVITY: f32 = 0.3;
    pub const PARTICLE_DECAY: f32 = 0.02;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    pub const PARTICLE_MIN_SIZE: f32 = 2.0;
    pub const PARTICLE_SIZE_RANGE: f32 = 6.0;
    pub const COLLECT_BURST: usize = 8;
    pub const HAZARD_BURST: usize = 12;

    /// Run defaults
    pub const STARTING_LIVES: u32 = 3;
    pub const POINTS_PER_CATCH: u64 = 10;
    pub const BASE_SPAWN_INTERVAL_MS: f32 = 2000.0;
    pub const MIN_SPAWN_INTERVAL_MS: f32 = 800.0;
    pub const MAX_SPEED_MULTIPLIER: f32 = 3.0;

    /// Host loop: longest frame delta fed into the simulation
    pub const MAX_FRAME_MS: f32 = 250.0;
}
