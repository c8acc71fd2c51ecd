//! Read-only view of the state handed to renderers

use super::arena::Arena;
use super::collision::Rect;
use super::state::{FallingObject, GamePhase, GameState, Particle, RunStats};

/// Everything a renderer may look at for one frame
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub phase: GamePhase,
    pub field_width: f32,
    pub field_height: f32,
    pub basket: Rect,
    pub stats: &'a RunStats,
    objects: &'a Arena<FallingObject>,
    particles: &'a Arena<Particle>,
}

impl<'a> Frame<'a> {
    pub fn objects(&self) -> impl Iterator<Item = &'a FallingObject> + 'a {
        self.objects.iter()
    }

    pub fn particles(&self) -> impl Iterator<Item = &'a Particle> + 'a {
        self.particles.iter()
    }

    /// Basket and entities are only drawn while a run is on screen
    pub fn shows_playfield(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::Paused)
    }
}

impl GameState {
    pub fn snapshot(&self) -> Frame<'_> {
        Frame {
            phase: self.phase,
            field_width: self.field.x,
            field_height: self.field.y,
            basket: self.basket.rect(),
            stats: &self.stats,
            objects: &self.objects,
            particles: &self.particles,
        }
    }
}
