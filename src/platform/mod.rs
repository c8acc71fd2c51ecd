//! Platform abstraction layer
//!
//! The simulation never talks to the outside world. Everything it feeds or
//! is fed by sits behind one of these seams:
//! - Input (`KeyboardState` turns key events into `TickInput`)
//! - Rendering (`RenderSink`)
//! - Stats bar, menus and scoreboard (`StatsDisplay`, `MenuOverlay`, `HighScoreBoard`)
//!
//! Browser implementations live in `web` (wasm32 only).

pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::KeyboardState;

use crate::highscores::HighScores;
use crate::sim::Frame;
use crate::ui::{HudStats, Overlay};

/// Draws a frame. Called after the tick, never during it.
pub trait RenderSink {
    fn draw(&mut self, frame: &Frame<'_>);
}

/// Score / lives / level display
pub trait StatsDisplay {
    fn show_stats(&mut self, stats: HudStats);
}

/// Start, pause and game-over menus
pub trait MenuOverlay {
    fn show(&mut self, overlay: Overlay);
    fn hide(&mut self);
}

/// High score list display
pub trait HighScoreBoard {
    fn show_high_scores(&mut self, scores: &HighScores);
}

/// Collaborator that ignores everything (headless runs)
#[derive(Debug, Default)]
pub struct Headless;

impl RenderSink for Headless {
    fn draw(&mut self, _frame: &Frame<'_>) {}
}

impl StatsDisplay for Headless {
    fn show_stats(&mut self, stats: HudStats) {
        log::trace!(
            "score {} lives {} level {}",
            stats.score,
            stats.lives,
            stats.level
        );
    }
}

impl MenuOverlay for Headless {
    fn show(&mut self, overlay: Overlay) {
        log::debug!("overlay: {:?}", overlay);
    }

    fn hide(&mut self) {}
}

impl HighScoreBoard for Headless {
    fn show_high_scores(&mut self, scores: &HighScores) {
        log::debug!("high scores: {:?}", scores.scores());
    }
}
