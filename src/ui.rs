//! HUD and menu models
//!
//! Plain data describing what the stats bar and the menu overlay should
//! show. Platform code turns these into DOM updates.

use crate::sim::RunStats;

/// Score at or above which the run earns the top banner
pub const MASTER_SCORE: u64 = 500;
/// Score at or above which the run earns the middle banner
pub const GOOD_SCORE: u64 = 200;

/// Numbers shown in the stats bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HudStats {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
}

impl From<&RunStats> for HudStats {
    fn from(stats: &RunStats) -> Self {
        Self {
            score: stats.score,
            lives: stats.lives,
            level: stats.level,
        }
    }
}

/// Game-over message tier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBanner {
    NewHighScore,
    Master,
    GoodJob,
    KeepTrying,
}

impl ScoreBanner {
    /// A new high score beats every score band
    pub fn for_result(score: u64, is_high_score: bool) -> Self {
        if is_high_score {
            ScoreBanner::NewHighScore
        } else if score >= MASTER_SCORE {
            ScoreBanner::Master
        } else if score >= GOOD_SCORE {
            ScoreBanner::GoodJob
        } else {
            ScoreBanner::KeepTrying
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ScoreBanner::NewHighScore => "NEW HIGH SCORE!",
            ScoreBanner::Master => "CATCH MASTER!",
            ScoreBanner::GoodJob => "Good Job!",
            ScoreBanner::KeepTrying => "Keep trying!",
        }
    }

    /// CSS class the web overlay uses for the banner background
    pub fn css_class(&self) -> &'static str {
        match self {
            ScoreBanner::NewHighScore => "banner-high-score",
            ScoreBanner::Master => "banner-master",
            ScoreBanner::GoodJob => "banner-good",
            ScoreBanner::KeepTrying => "banner-default",
        }
    }
}

/// Menu currently covering the play-field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    StartMenu,
    PauseMenu,
    GameOver { final_score: u64, banner: ScoreBanner },
}

impl Overlay {
    /// DOM id of the menu element
    pub fn element_id(&self) -> &'static str {
        match self {
            Overlay::StartMenu => "startMenu",
            Overlay::PauseMenu => "pauseMenu",
            Overlay::GameOver { .. } => "gameOverMenu",
        }
    }
}
