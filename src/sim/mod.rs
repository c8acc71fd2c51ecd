//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (arena slot order)
//! - No rendering, audio or platform dependencies

pub mod arena;
pub mod collision;
pub mod frame;
pub mod state;
pub mod tick;

pub use arena::{Arena, EntityId};
pub use collision::{Rect, aabb_overlap};
pub use frame::Frame;
pub use state::{
    Basket, FallingObject, GameEvent, GamePhase, GameState, InvalidTransition, ObjectKind,
    Particle, ParticleColor, PhaseAction, RunStats, MAX_PARTICLES,
};
pub use tick::{TickInput, demo_input, spawn_object, tick};
