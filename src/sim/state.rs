//! Game state and core simulation types
//!
//! Everything a run mutates lives in [`GameState`]; the host only reads it
//! (snapshots, events) between ticks.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::Arena;
use super::collision::Rect;
use crate::consts::*;
use crate::tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Start menu, nothing simulated yet
    Menu,
    /// Active gameplay
    Playing,
    /// Frozen mid-run, fully resumable
    Paused,
    /// Run ended (lives exhausted)
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game over",
        }
    }
}

/// Requested transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    Pause,
    Resume,
}

/// A transition that is not valid from the current phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidTransition {
    pub from: GamePhase,
    pub action: PhaseAction,
}

impl fmt::Display for InvalidTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            PhaseAction::Pause => "pause",
            PhaseAction::Resume => "resume",
        };
        write!(f, "cannot {} while {}", action, self.from.as_str())
    }
}

impl std::error::Error for InvalidTransition {}

/// The player's basket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Basket {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels moved per tick per held direction
    pub speed: f32,
}

impl Basket {
    /// Basket centred horizontally near the bottom of the field
    pub fn new(field: Vec2) -> Self {
        Self {
            pos: Self::start_pos(field),
            size: Vec2::new(BASKET_WIDTH, BASKET_HEIGHT),
            speed: BASKET_SPEED,
        }
    }

    fn start_pos(field: Vec2) -> Vec2 {
        Vec2::new(
            field.x / 2.0 - BASKET_WIDTH / 2.0,
            field.y - BASKET_START_OFFSET,
        )
    }

    pub fn reset(&mut self, field: Vec2) {
        self.pos = Self::start_pos(field);
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    /// Clamp into the full width and the lower half of the field
    pub fn clamp_to(&mut self, field: Vec2) {
        let max_x = (field.x - self.size.x).max(0.0);
        let max_y = (field.y - self.size.y).max(field.y / 2.0);
        self.pos.x = self.pos.x.clamp(0.0, max_x);
        self.pos.y = self.pos.y.clamp(field.y / 2.0, max_y);
    }
}

/// What a falling object does when caught
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Worth points
    Collectible,
    /// Costs a life
    Hazard,
}

/// An object falling toward the bottom of the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per tick before the global speed multiplier
    pub speed: f32,
    pub kind: ObjectKind,
    /// Radians
    pub rotation: f32,
    /// Radians per tick
    pub rotation_speed: f32,
}

impl FallingObject {
    pub fn new(pos: Vec2, kind: ObjectKind, speed: f32) -> Self {
        Self {
            pos,
            size: Vec2::splat(OBJECT_SIZE),
            speed,
            kind,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Particle colour tag, resolved to a real colour by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    /// Catch burst
    Positive,
    /// Hazard burst
    Negative,
}

/// A short-lived visual particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 when spawned, removed at or below 0
    pub life: f32,
    pub decay: f32,
    pub color: ParticleColor,
    pub size: f32,
}

/// Per-run counters and the difficulty derived from them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub speed_multiplier: f32,
    /// Milliseconds between spawns
    pub spawn_interval: f32,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            level: 1,
            speed_multiplier: tuning::speed_multiplier_for_level(1),
            spawn_interval: tuning::spawn_interval_for_level(1),
        }
    }

    /// Recompute level from score. Returns the new level if it went up.
    pub fn refresh_level(&mut self) -> Option<u32> {
        let level = tuning::level_for_score(self.score);
        if level <= self.level {
            return None;
        }
        self.level = level;
        self.speed_multiplier = tuning::speed_multiplier_for_level(level);
        self.spawn_interval = tuning::spawn_interval_for_level(level);
        Some(level)
    }
}

/// Something the host should react to (sound, HUD, menus, persistence)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A collectible was caught; `pitch` is the chime frequency in Hz
    ScorePoint { score: u64, pitch: f32 },
    /// A hazard was caught
    LifeLost { lives: u32 },
    LevelUp { level: u32 },
    GameOver { final_score: u64 },
}

/// Particle cap until the host applies settings (the Medium preset's cap)
pub const MAX_PARTICLES: usize = 256;

/// Complete simulation state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the rng was created from
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    pub stats: RunStats,
    /// Play-field size
    pub field: Vec2,
    pub basket: Basket,
    pub objects: Arena<FallingObject>,
    pub particles: Arena<Particle>,
    /// Milliseconds accumulated toward the next spawn
    pub spawn_timer: f32,
    /// Particle bursts stop adding particles past this many
    pub particle_cap: usize,
    events: Vec<GameEvent>,
}

impl GameState {
    /// New session on the default field, waiting in the menu
    pub fn new(seed: u64) -> Self {
        Self::with_field(seed, Vec2::new(FIELD_WIDTH, FIELD_HEIGHT))
    }

    pub fn with_field(seed: u64, field: Vec2) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            stats: RunStats::new(),
            field,
            basket: Basket::new(field),
            objects: Arena::new(),
            particles: Arena::new(),
            spawn_timer: 0.0,
            particle_cap: MAX_PARTICLES,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run from any phase (also used for restart)
    pub fn start(&mut self) {
        self.stats = RunStats::new();
        self.objects.clear();
        self.particles.clear();
        self.spawn_timer = 0.0;
        self.basket.reset(self.field);
        self.events.clear();
        self.phase = GamePhase::Playing;
    }

    pub fn pause(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != GamePhase::Playing {
            return Err(InvalidTransition {
                from: self.phase,
                action: PhaseAction::Pause,
            });
        }
        self.phase = GamePhase::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), InvalidTransition> {
        if self.phase != GamePhase::Paused {
            return Err(InvalidTransition {
                from: self.phase,
                action: PhaseAction::Resume,
            });
        }
        self.phase = GamePhase::Playing;
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events produced since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
