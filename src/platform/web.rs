//! Browser collaborators: DOM stats bar, menu overlay, scoreboard and a
//! canvas 2D renderer.
//!
//! Missing elements are tolerated. A page without a scoreboard simply shows
//! no scoreboard.

use std::f64::consts::TAU;

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement};

use super::{HighScoreBoard, MenuOverlay, RenderSink, StatsDisplay};
use crate::highscores::HighScores;
use crate::sim::{FallingObject, Frame, GamePhase, ObjectKind, ParticleColor};
use crate::ui::{HudStats, Overlay};

const MENU_IDS: [&str; 3] = ["startMenu", "pauseMenu", "gameOverMenu"];
const HIDDEN: &str = "hidden";

const BACKGROUND: &str = "#1d1b3a";
const BASKET_FILL: &str = "#ffd700";
const OUTLINE: &str = "#333";
const COLLECTIBLE_FILL: &str = "#4a90e2";
const COLLECTIBLE_OUTLINE: &str = "#2d1b69";
const FUSE: &str = "#ff6b6b";

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

fn set_text(el: &Option<Element>, text: &str) {
    if let Some(el) = el {
        el.set_text_content(Some(text));
    }
}

/// `#score`, `#lives` and `#level` spans
pub struct DomStats {
    score: Option<Element>,
    lives: Option<Element>,
    level: Option<Element>,
}

impl DomStats {
    pub fn new(document: &Document) -> Self {
        Self {
            score: document.get_element_by_id("score"),
            lives: document.get_element_by_id("lives"),
            level: document.get_element_by_id("level"),
        }
    }
}

impl StatsDisplay for DomStats {
    fn show_stats(&mut self, stats: HudStats) {
        set_text(&self.score, &stats.score.to_string());
        set_text(&self.lives, &stats.lives.to_string());
        set_text(&self.level, &stats.level.to_string());
    }
}

/// `#gameOverlay` with one child menu visible at a time
pub struct DomOverlay {
    container: Option<HtmlElement>,
    menus: Vec<(&'static str, Element)>,
    final_score: Option<Element>,
    message: Option<Element>,
}

impl DomOverlay {
    pub fn new(document: &Document) -> Self {
        let container = document
            .get_element_by_id("gameOverlay")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let menus = MENU_IDS
            .iter()
            .filter_map(|&id| document.get_element_by_id(id).map(|el| (id, el)))
            .collect();
        Self {
            container,
            menus,
            final_score: document.get_element_by_id("finalScore"),
            message: document.get_element_by_id("scoreMessage"),
        }
    }

    fn set_container_display(&self, value: &str) {
        if let Some(container) = &self.container {
            let _ = container.style().set_property("display", value);
        }
    }
}

impl MenuOverlay for DomOverlay {
    fn show(&mut self, overlay: Overlay) {
        if let Overlay::GameOver {
            final_score,
            banner,
        } = overlay
        {
            set_text(&self.final_score, &final_score.to_string());
            if let Some(message) = &self.message {
                message.set_text_content(Some(banner.message()));
                message.set_class_name(banner.css_class());
            }
        }

        let target = overlay.element_id();
        for (id, menu) in &self.menus {
            let classes = menu.class_list();
            if *id == target {
                let _ = classes.remove_1(HIDDEN);
            } else {
                let _ = classes.add_1(HIDDEN);
            }
        }
        self.set_container_display("flex");
    }

    fn hide(&mut self) {
        self.set_container_display("none");
    }
}

/// `#highScores` list of `.score-entry` rows
pub struct DomScoreBoard {
    document: Document,
    container: Option<Element>,
}

impl DomScoreBoard {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            container: document.get_element_by_id("highScores"),
        }
    }
}

impl HighScoreBoard for DomScoreBoard {
    fn show_high_scores(&mut self, scores: &HighScores) {
        let Some(container) = &self.container else {
            return;
        };
        container.set_inner_html("");
        for line in scores.display_lines() {
            let Ok(entry) = self.document.create_element("div") else {
                continue;
            };
            entry.set_class_name("score-entry");
            entry.set_text_content(Some(&line));
            let _ = container.append_child(&entry);
        }
    }
}

/// Canvas 2D renderer
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
}

impl CanvasRenderer {
    /// Size the canvas to the play-field and grab its 2D context
    pub fn new(canvas: &HtmlCanvasElement, width: u32, height: u32) -> Option<Self> {
        canvas.set_width(width);
        canvas.set_height(height);
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { ctx })
    }

    fn draw_basket(&self, frame: &Frame<'_>) {
        let b = frame.basket;
        let (x, y, w, h) = (b.x as f64, b.y as f64, b.width as f64, b.height as f64);
        let ctx = &self.ctx;

        ctx.save();
        ctx.set_fill_style_str(BASKET_FILL);
        ctx.set_stroke_style_str(OUTLINE);
        ctx.set_line_width(3.0);
        ctx.fill_rect(x, y, w, h);
        ctx.stroke_rect(x, y, w, h);

        // Weave
        ctx.set_line_width(2.0);
        for i in 1..4 {
            let row = y + h / 4.0 * i as f64;
            ctx.begin_path();
            ctx.move_to(x, row);
            ctx.line_to(x + w, row);
            ctx.stroke();
        }
        ctx.restore();
    }

    fn draw_object(&self, object: &FallingObject) {
        let ctx = &self.ctx;
        let center = object.center();
        let radius = (object.size.x.min(object.size.y) * 0.375) as f64;

        ctx.save();
        let _ = ctx.translate(center.x as f64, center.y as f64);
        let _ = ctx.rotate(object.rotation as f64);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        let _ = ctx.arc(0.0, 0.0, radius, 0.0, TAU);

        match object.kind {
            ObjectKind::Collectible => {
                ctx.set_fill_style_str(COLLECTIBLE_FILL);
                ctx.set_stroke_style_str(COLLECTIBLE_OUTLINE);
                ctx.fill();
                ctx.stroke();
                ctx.set_fill_style_str("white");
                ctx.fill_rect(-radius * 0.5, -radius * 0.4, radius * 0.35, radius * 0.35);
                ctx.fill_rect(radius * 0.15, -radius * 0.4, radius * 0.35, radius * 0.35);
            }
            ObjectKind::Hazard => {
                ctx.set_fill_style_str(OUTLINE);
                ctx.set_stroke_style_str("#000");
                ctx.fill();
                ctx.stroke();

                ctx.set_stroke_style_str(FUSE);
                ctx.set_line_width(3.0);
                ctx.begin_path();
                ctx.move_to(0.0, -radius);
                ctx.line_to(radius / 3.0, -radius * 5.0 / 3.0);
                ctx.stroke();

                ctx.set_fill_style_str(BASKET_FILL);
                ctx.begin_path();
                let _ = ctx.arc(radius / 3.0, -radius * 5.0 / 3.0, 3.0, 0.0, TAU);
                ctx.fill();
            }
        }
        ctx.restore();
    }

    fn draw_particles(&self, frame: &Frame<'_>) {
        let ctx = &self.ctx;
        ctx.save();
        for p in frame.particles() {
            ctx.set_global_alpha(p.life.clamp(0.0, 1.0) as f64);
            ctx.set_fill_style_str(match p.color {
                ParticleColor::Positive => BASKET_FILL,
                ParticleColor::Negative => FUSE,
            });
            ctx.begin_path();
            let _ = ctx.arc(p.pos.x as f64, p.pos.y as f64, p.size as f64, 0.0, TAU);
            ctx.fill();
        }
        ctx.restore();
    }

    fn draw_pause_shade(&self, frame: &Frame<'_>) {
        let ctx = &self.ctx;
        let (w, h) = (frame.field_width as f64, frame.field_height as f64);
        ctx.save();
        ctx.set_fill_style_str("rgba(0, 0, 0, 0.5)");
        ctx.fill_rect(0.0, 0.0, w, h);
        ctx.set_fill_style_str("white");
        ctx.set_font("48px sans-serif");
        ctx.set_text_align("center");
        let _ = ctx.fill_text("PAUSED", w / 2.0, h / 2.0);
        ctx.restore();
    }
}

impl RenderSink for CanvasRenderer {
    fn draw(&mut self, frame: &Frame<'_>) {
        let (w, h) = (frame.field_width as f64, frame.field_height as f64);
        self.ctx.set_fill_style_str(BACKGROUND);
        self.ctx.fill_rect(0.0, 0.0, w, h);

        if !frame.shows_playfield() {
            return;
        }

        self.draw_basket(frame);
        for object in frame.objects() {
            self.draw_object(object);
        }
        self.draw_particles(frame);

        if frame.phase == GamePhase::Paused {
            self.draw_pause_shade(frame);
        }
    }
}
