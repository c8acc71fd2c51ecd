//! Host-side game driver
//!
//! Owns the simulation plus the collaborators around it, runs one tick per
//! host frame and turns the tick's events into sound, HUD updates, menus and
//! high-score persistence.

use crate::audio::{AudioSink, SilentAudio, tones_for_event};
use crate::highscores::HighScores;
use crate::persistence::KeyValueStore;
use crate::platform::{Headless, HighScoreBoard, MenuOverlay, RenderSink, StatsDisplay};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::ui::{HudStats, Overlay, ScoreBanner};

/// Everything outside the simulation the game talks to
pub struct Collaborators {
    pub audio: Box<dyn AudioSink>,
    pub stats: Box<dyn StatsDisplay>,
    pub overlay: Box<dyn MenuOverlay>,
    pub scoreboard: Box<dyn HighScoreBoard>,
    pub store: Box<dyn KeyValueStore>,
}

impl Collaborators {
    /// No audio and no display, only storage
    pub fn headless(store: Box<dyn KeyValueStore>) -> Self {
        Self {
            audio: Box::new(SilentAudio),
            stats: Box::new(Headless),
            overlay: Box::new(Headless),
            scoreboard: Box::new(Headless),
            store,
        }
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunResult {
    pub final_score: u64,
    pub is_high_score: bool,
    pub banner: ScoreBanner,
}

/// Game instance holding all state
pub struct Game {
    state: GameState,
    high_scores: HighScores,
    settings: Settings,
    platform: Collaborators,
    shown_stats: Option<HudStats>,
    last_result: Option<RunResult>,
}

impl Game {
    /// Load persisted data and show the start menu
    pub fn new(seed: u64, mut platform: Collaborators) -> Self {
        let settings = Settings::load(platform.store.as_ref());
        let high_scores = HighScores::load(platform.store.as_ref());

        let mut state = GameState::new(seed);
        state.particle_cap = settings.max_particles();
        platform.audio.set_volume(settings.effective_volume());
        platform.scoreboard.show_high_scores(&high_scores);
        platform.overlay.show(Overlay::StartMenu);

        log::info!("Game initialized with seed: {}", seed);
        Self {
            state,
            high_scores,
            settings,
            platform,
            shown_stats: None,
            last_result: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.platform.store.as_ref()
    }

    /// Result of the most recent finished run
    pub fn last_result(&self) -> Option<RunResult> {
        self.last_result
    }

    /// Start a new run (also restart after game over)
    pub fn start(&mut self) {
        self.state.start();
        self.last_result = None;
        self.platform.overlay.hide();
        self.publish_stats();
        log::info!("Run started");
    }

    pub fn restart(&mut self) {
        self.start();
    }

    pub fn pause(&mut self) {
        if self.state.pause().is_ok() {
            self.platform.overlay.show(Overlay::PauseMenu);
        }
    }

    pub fn resume(&mut self) {
        if self.state.resume().is_ok() {
            self.platform.overlay.hide();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state.phase {
            GamePhase::Playing => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Run one tick and react to what happened
    pub fn frame(&mut self, dt_ms: f32, input: &TickInput) {
        let before = self.state.phase;
        tick(&mut self.state, input, dt_ms);

        match (before, self.state.phase) {
            (GamePhase::Playing, GamePhase::Paused) => {
                self.platform.overlay.show(Overlay::PauseMenu)
            }
            (GamePhase::Paused, GamePhase::Playing) => self.platform.overlay.hide(),
            _ => {}
        }

        for event in self.state.drain_events() {
            self.handle_event(&event);
        }
        self.publish_stats();
    }

    /// Hand the current state to a renderer
    pub fn render(&self, sink: &mut dyn RenderSink) {
        sink.draw(&self.state.snapshot());
    }

    /// Apply and persist new settings
    pub fn update_settings(&mut self, settings: Settings) {
        self.state.particle_cap = settings.max_particles();
        self.platform.audio.set_volume(settings.effective_volume());
        if let Err(err) = settings.save(self.platform.store.as_mut()) {
            log::warn!("Failed to save settings: {}", err);
        }
        self.settings = settings;
    }

    fn handle_event(&mut self, event: &GameEvent) {
        for tone in tones_for_event(event) {
            self.platform.audio.play(&tone);
        }
        match *event {
            GameEvent::LevelUp { level } => log::info!("Level up: {}", level),
            GameEvent::GameOver { final_score } => self.finish_run(final_score),
            _ => {}
        }
    }

    fn finish_run(&mut self, final_score: u64) {
        let is_high_score = self.high_scores.record_if_high_score(final_score);
        if is_high_score {
            // Fire-and-forget: a failed save must not affect the game
            if let Err(err) = self.high_scores.save(self.platform.store.as_mut()) {
                log::warn!("Failed to save high scores: {}", err);
            }
            self.platform.scoreboard.show_high_scores(&self.high_scores);
        }

        let banner = ScoreBanner::for_result(final_score, is_high_score);
        self.last_result = Some(RunResult {
            final_score,
            is_high_score,
            banner,
        });
        self.platform.overlay.show(Overlay::GameOver {
            final_score,
            banner,
        });
    }

    fn publish_stats(&mut self) {
        let stats = HudStats::from(&self.state.stats);
        if self.shown_stats != Some(stats) {
            self.platform.stats.show_stats(stats);
            self.shown_stats = Some(stats);
        }
    }
}
